use crate::config::{GestureConfig, SensorConfig};
use crate::error::Result;
use crate::orientation::{Orientation, OrientationConverter};
use crate::sensor::{SensorAccuracy, SensorEvent};

use super::{OrientationHistory, OrientationSample};

/// What happened to a sensor event offered to the ingestor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ingested {
    /// Converted and appended to the history
    Accepted {
        orientation: Orientation,
        evicted: usize,
    },
    /// Accuracy below the trusted minimum
    Untrusted(SensorAccuracy),
    /// Timestamp older than the newest retained sample
    OutOfOrder { newest_ns: i64 },
    /// Reading converted to non-finite angles
    Invalid,
}

impl Ingested {
    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            Self::Accepted { orientation, .. } => Some(*orientation),
            _ => None,
        }
    }
}

/// Converts trusted sensor readings into orientation samples and keeps the
/// retention-windowed history they are matched against.
pub struct SampleIngestor {
    converter: OrientationConverter,
    min_accuracy: SensorAccuracy,
    history: OrientationHistory,
}

impl SampleIngestor {
    pub fn new(sensor: &SensorConfig, gesture: &GestureConfig) -> Result<Self> {
        Ok(Self {
            converter: OrientationConverter::new(sensor.remap_x, sensor.remap_y)?,
            min_accuracy: sensor.min_accuracy,
            history: OrientationHistory::new(gesture.retention_window.as_nanos()),
        })
    }

    /// Offer one sensor event. Untrusted, out-of-order and invalid readings
    /// leave the history untouched.
    pub fn ingest(&mut self, event: &SensorEvent) -> Ingested {
        if !event.accuracy.is_trusted(self.min_accuracy) {
            return Ingested::Untrusted(event.accuracy);
        }

        if let Some(newest) = self.history.newest()
            && event.timestamp_ns < newest.timestamp_ns
        {
            log::warn!(
                "Dropping out-of-order sample @{} (newest @{})",
                event.timestamp_ns,
                newest.timestamp_ns
            );
            return Ingested::OutOfOrder {
                newest_ns: newest.timestamp_ns,
            };
        }

        let orientation = self.converter.convert(&event.reading);
        if !(orientation.azimuth.is_finite()
            && orientation.pitch.is_finite()
            && orientation.roll.is_finite())
        {
            log::debug!("Dropping non-finite reading @{}", event.timestamp_ns);
            return Ingested::Invalid;
        }

        let evicted = self
            .history
            .push(OrientationSample::new(event.timestamp_ns, orientation));
        log::trace!(
            "Orientation {} @{} ({} retained)",
            orientation,
            event.timestamp_ns,
            self.history.len()
        );

        Ingested::Accepted {
            orientation,
            evicted,
        }
    }

    pub fn history(&self) -> &OrientationHistory {
        &self.history
    }

    /// Forget every retained sample
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Quaternion;
    use crate::sensor::RotationReading;

    const SEC: i64 = 1_000_000_000;

    fn ingestor() -> SampleIngestor {
        SampleIngestor::new(&SensorConfig::default(), &GestureConfig::default()).unwrap()
    }

    fn upright(t: i64, accuracy: SensorAccuracy) -> SensorEvent {
        let q = Quaternion::from_axis_angle([1.0, 0.0, 0.0], std::f64::consts::FRAC_PI_2);
        SensorEvent::new(t, accuracy, q.to_reading())
    }

    #[test]
    fn test_unreliable_is_dropped() {
        let mut ingestor = ingestor();
        let outcome = ingestor.ingest(&upright(0, SensorAccuracy::Unreliable));
        assert_eq!(outcome, Ingested::Untrusted(SensorAccuracy::Unreliable));
        assert!(ingestor.history().is_empty());
    }

    #[test]
    fn test_all_trusted_levels_are_accepted() {
        let mut ingestor = ingestor();
        for (i, accuracy) in [SensorAccuracy::Low, SensorAccuracy::Medium, SensorAccuracy::High]
            .into_iter()
            .enumerate()
        {
            let outcome = ingestor.ingest(&upright(i as i64, accuracy));
            assert!(outcome.orientation().is_some());
        }
        assert_eq!(ingestor.history().len(), 3);
    }

    #[test]
    fn test_eviction_on_ingest() {
        let mut ingestor = ingestor();
        for i in 0..8 {
            ingestor.ingest(&upright(i * SEC, SensorAccuracy::High));
            let newest = ingestor.history().newest().unwrap().timestamp_ns;
            for sample in ingestor.history().iter() {
                assert!(newest - sample.timestamp_ns <= 3 * SEC);
            }
        }
        assert_eq!(ingestor.history().len(), 4);
    }

    #[test]
    fn test_out_of_order_is_dropped() {
        let mut ingestor = ingestor();
        ingestor.ingest(&upright(2 * SEC, SensorAccuracy::High));
        let outcome = ingestor.ingest(&upright(SEC, SensorAccuracy::High));
        assert_eq!(outcome, Ingested::OutOfOrder { newest_ns: 2 * SEC });
        assert_eq!(ingestor.history().len(), 1);

        // Equal timestamps keep the order intact and are accepted
        let outcome = ingestor.ingest(&upright(2 * SEC, SensorAccuracy::High));
        assert!(outcome.orientation().is_some());
    }

    #[test]
    fn test_non_finite_reading_is_dropped() {
        let mut ingestor = ingestor();
        let event = SensorEvent::new(
            0,
            SensorAccuracy::High,
            RotationReading::new(f64::NAN, 0.0, 0.0),
        );
        assert_eq!(ingestor.ingest(&event), Ingested::Invalid);
        assert!(ingestor.history().is_empty());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ingestor = ingestor();
        ingestor.ingest(&upright(0, SensorAccuracy::High));
        ingestor.reset();
        assert!(ingestor.history().is_empty());
    }
}
