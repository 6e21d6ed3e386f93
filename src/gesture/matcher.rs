//! Rotate-away-and-back gesture matcher
//!
//! Compares the newest orientation in the history with every older one,
//! walking backwards in time. The gesture is recognised when some older
//! sample is more than `far_threshold` away from the newest orientation and a
//! sample older still is less than `near_threshold` away from it: the device
//! was resting here, was turned far away, and has now come back.
//!
//! The scan is stateless. Every call starts over in [`MatchState::SeekingFar`]
//! so a partial match is never carried from one sample to the next.

use crate::config::GestureConfig;

use super::{OrientationHistory, OrientationSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Looking for an orientation far from the current one
    SeekingFar,
    /// Far orientation found, looking for an earlier one near the current one
    SeekingNear,
    Matched,
}

/// Details of a recognised gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMatch {
    /// Newest sample, the orientation the device came back to
    pub reference: OrientationSample,
    /// First sample (scanning backwards) beyond the far threshold
    pub far: OrientationSample,
    pub far_distance: f64,
    /// First sample before `far` within the near threshold
    pub near: OrientationSample,
    pub near_distance: f64,
    /// Number of older samples compared before the match completed
    pub samples_scanned: usize,
}

impl GestureMatch {
    /// Time from the matched resting orientation to the return
    pub fn duration_ns(&self) -> i64 {
        self.reference.timestamp_ns.saturating_sub(self.near.timestamp_ns)
    }
}

pub struct GestureMatcher {
    far_threshold: f64,
    near_threshold: f64,
}

impl GestureMatcher {
    pub fn new(config: &GestureConfig) -> Self {
        Self::with_thresholds(
            config.far_threshold.as_radians(),
            config.near_threshold.as_radians(),
        )
    }

    /// # Arguments
    /// * `far_threshold` - Distance in radians that must be exceeded (strictly)
    /// * `near_threshold` - Distance in radians that must be undercut (strictly)
    pub fn with_thresholds(far_threshold: f64, near_threshold: f64) -> Self {
        Self {
            far_threshold,
            near_threshold,
        }
    }

    /// Whether the history ends with a completed gesture
    pub fn check_gesture(&self, history: &OrientationHistory) -> bool {
        self.find_match(history).is_some()
    }

    pub fn find_match(&self, history: &OrientationHistory) -> Option<GestureMatch> {
        let mut samples = history.iter_newest_first();
        let reference = *samples.next()?;

        let mut state = MatchState::SeekingFar;
        let mut far: Option<(OrientationSample, f64)> = None;
        let mut near: Option<(OrientationSample, f64, usize)> = None;

        for (scanned, sample) in samples.enumerate() {
            let distance = reference.orientation.distance(&sample.orientation);

            if state == MatchState::SeekingFar {
                if distance > self.far_threshold {
                    state = MatchState::SeekingNear;
                    far = Some((*sample, distance));
                }
            } else if distance < self.near_threshold {
                state = MatchState::Matched;
                near = Some((*sample, distance, scanned + 1));
                break;
            }
        }

        match (state, far, near) {
            (MatchState::Matched, Some((far, far_distance)), Some((near, near_distance, scanned))) => {
                Some(GestureMatch {
                    reference,
                    far,
                    far_distance,
                    near,
                    near_distance,
                    samples_scanned: scanned,
                })
            }
            _ => {
                log::trace!("No gesture in {} samples (ended {:?})", history.len(), state);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FAR_THRESHOLD_RAD, NEAR_THRESHOLD_RAD};
    use crate::orientation::Orientation;
    use approx::assert_relative_eq;

    const SEC: i64 = 1_000_000_000;

    fn matcher() -> GestureMatcher {
        GestureMatcher::new(&GestureConfig::default())
    }

    fn history(samples: &[(i64, [f64; 3])]) -> OrientationHistory {
        let mut history = OrientationHistory::new(3 * SEC);
        for &(t, o) in samples {
            history.push(OrientationSample::new(t, Orientation::from(o)));
        }
        history
    }

    #[test]
    fn test_sparse_history_never_matches() {
        assert!(!matcher().check_gesture(&history(&[])));
        assert!(!matcher().check_gesture(&history(&[(0, [0.0, 0.0, 0.0])])));
    }

    #[test]
    fn test_away_and_back_matches() {
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC, [1.3, 0.0, 0.0]),
            (2 * SEC, [0.05, 0.0, 0.0]),
        ]);
        let m = matcher().find_match(&h).expect("gesture should match");

        assert_eq!(m.far.timestamp_ns, SEC);
        assert_eq!(m.near.timestamp_ns, 0);
        assert_relative_eq!(m.far_distance, 1.25, epsilon = 1e-12);
        assert_relative_eq!(m.near_distance, 0.05, epsilon = 1e-12);
        assert_eq!(m.samples_scanned, 2);
        assert_eq!(m.duration_ns(), 2 * SEC);
    }

    #[test]
    fn test_scan_stops_at_newest_near_sample() {
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC / 2, [0.1, 0.0, 0.0]),
            (SEC, [1.3, 0.0, 0.0]),
            (3 * SEC / 2, [1.4, 0.0, 0.0]),
            (2 * SEC, [0.05, 0.0, 0.0]),
        ]);
        let m = matcher().find_match(&h).expect("gesture should match");

        assert_eq!(m.far.timestamp_ns, 3 * SEC / 2);
        assert_eq!(m.near.timestamp_ns, SEC / 2);
        assert_eq!(m.samples_scanned, 3);
    }

    #[test]
    fn test_away_without_return_does_not_match() {
        let h = history(&[(0, [0.0, 0.0, 0.0]), (SEC, [1.3, 0.0, 0.0])]);
        assert!(!matcher().check_gesture(&h));
    }

    #[test]
    fn test_jitter_does_not_match() {
        let ten = 10f64.to_radians();
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC / 2, [ten * 0.5, 0.0, 0.0]),
            (SEC, [0.0, ten * 0.7, 0.0]),
            (3 * SEC / 2, [0.0, 0.0, ten]),
            (2 * SEC, [ten * 0.3, ten * 0.3, ten * 0.3]),
        ]);
        assert!(!matcher().check_gesture(&h));
    }

    #[test]
    fn test_far_must_come_after_near_in_time() {
        // Rested, then turned away and stayed: the newest sample is the far one
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC, [0.0, 0.0, 0.0]),
            (2 * SEC, [1.3, 0.0, 0.0]),
        ]);
        assert!(!matcher().check_gesture(&h));
    }

    #[test]
    fn test_distance_exactly_far_does_not_transition() {
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC, [FAR_THRESHOLD_RAD, 0.0, 0.0]),
            (2 * SEC, [0.0, 0.0, 0.0]),
        ]);
        assert!(!matcher().check_gesture(&h));
    }

    #[test]
    fn test_distance_exactly_near_does_not_match() {
        let h = history(&[
            (0, [NEAR_THRESHOLD_RAD, 0.0, 0.0]),
            (SEC, [1.5, 0.0, 0.0]),
            (2 * SEC, [0.0, 0.0, 0.0]),
        ]);
        assert!(!matcher().check_gesture(&h));

        // Just inside the threshold the same path matches
        let h = history(&[
            (0, [NEAR_THRESHOLD_RAD * 0.999, 0.0, 0.0]),
            (SEC, [1.5, 0.0, 0.0]),
            (2 * SEC, [0.0, 0.0, 0.0]),
        ]);
        assert!(matcher().check_gesture(&h));
    }

    #[test]
    fn test_match_across_axes() {
        // Pitch and roll both contribute to the distance
        let h = history(&[
            (0, [0.0, 0.0, 0.0]),
            (SEC, [0.0, 1.0, 1.0]),
            (2 * SEC, [0.0, 0.1, 0.0]),
        ]);
        assert!(matcher().check_gesture(&h));
    }
}
