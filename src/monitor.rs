use crossbeam_channel::Sender;

use crate::config::KioskConfig;
use crate::error::Result;
use crate::gesture::{GestureMatch, GestureMatcher, Ingested, OrientationHistory, SampleIngestor};
use crate::orientation::Orientation;
use crate::sensor::{SensorEvent, SensorSource};

/// A recognised shake-to-clear gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    /// 1-based count of gestures seen by the monitor
    pub sequence: u64,
    /// Sensor time of the sample that completed the gesture
    pub timestamp_ns: i64,
    /// Orientation the device came back to
    pub orientation: Orientation,
    pub far_distance: f64,
    pub near_distance: f64,
    pub duration_ns: i64,
    pub samples_scanned: usize,
}

impl GestureEvent {
    fn from_match(sequence: u64, m: &GestureMatch) -> Self {
        Self {
            sequence,
            timestamp_ns: m.reference.timestamp_ns,
            orientation: m.reference.orientation,
            far_distance: m.far_distance,
            near_distance: m.near_distance,
            duration_ns: m.duration_ns(),
            samples_scanned: m.samples_scanned,
        }
    }
}

/// Receiver of "clear now" requests
pub trait GestureListener {
    fn on_gesture_detected(&mut self, event: &GestureEvent);
}

impl<F: FnMut(&GestureEvent)> GestureListener for F {
    fn on_gesture_detected(&mut self, event: &GestureEvent) {
        self(event)
    }
}

/// Forwards gestures to the thread that owns the drawing surface
pub struct ChannelListener {
    tx: Sender<GestureEvent>,
}

impl ChannelListener {
    pub fn new(tx: Sender<GestureEvent>) -> Self {
        Self { tx }
    }
}

impl GestureListener for ChannelListener {
    fn on_gesture_detected(&mut self, event: &GestureEvent) {
        if self.tx.send(*event).is_err() {
            log::warn!("Gesture receiver dropped");
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub accepted: u64,
    pub untrusted: u64,
    pub out_of_order: u64,
    pub invalid: u64,
    pub ignored: u64,
    pub gestures: u64,
}

impl MonitorStats {
    pub fn dropped(&self) -> u64 {
        self.untrusted + self.out_of_order + self.invalid
    }
}

/// Ingest-then-match loop for one orientation sensor
///
/// Samples must be fed from a single context, one at a time. Each call
/// completes the whole ingest, match and reset cycle before returning.
pub struct GestureMonitor {
    ingestor: SampleIngestor,
    matcher: GestureMatcher,
    monitoring: bool,
    stats: MonitorStats,
}

impl GestureMonitor {
    pub fn new(config: &KioskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ingestor: SampleIngestor::new(&config.sensor, &config.gesture)?,
            matcher: GestureMatcher::new(&config.gesture),
            monitoring: true,
            stats: MonitorStats::default(),
        })
    }

    pub fn start(&mut self) {
        if !self.monitoring {
            log::debug!("Orientation monitoring started");
        }
        self.monitoring = true;
    }

    /// Stop reacting to samples and forget the history.
    pub fn stop(&mut self) {
        if self.monitoring {
            log::debug!("Orientation monitoring stopped");
        }
        self.monitoring = false;
        self.ingestor.reset();
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Feed one sensor sample. Returns the gesture it completed, if any; the
    /// history is already cleared when this returns `Some`.
    pub fn on_orientation_sample(&mut self, event: &SensorEvent) -> Option<GestureEvent> {
        if !self.monitoring {
            self.stats.ignored += 1;
            return None;
        }

        match self.ingestor.ingest(event) {
            Ingested::Accepted { .. } => self.stats.accepted += 1,
            Ingested::Untrusted(_) => {
                self.stats.untrusted += 1;
                return None;
            }
            Ingested::OutOfOrder { .. } => {
                self.stats.out_of_order += 1;
                return None;
            }
            Ingested::Invalid => {
                self.stats.invalid += 1;
                return None;
            }
        }

        let m = self.matcher.find_match(self.ingestor.history())?;

        self.stats.gestures += 1;
        let gesture = GestureEvent::from_match(self.stats.gestures, &m);
        log::info!(
            "Gesture #{} detected @{}: away {:.0}°, back within {:.0}° after {:.2}s",
            gesture.sequence,
            gesture.timestamp_ns,
            gesture.far_distance.to_degrees(),
            gesture.near_distance.to_degrees(),
            gesture.duration_ns as f64 / 1e9
        );
        log::debug!(
            "Rest {} -> away {} -> back {} ({} samples scanned)",
            m.near.orientation,
            m.far.orientation,
            m.reference.orientation,
            m.samples_scanned
        );

        self.ingestor.reset();
        Some(gesture)
    }

    /// Feed one sample and notify `listener` when it completes a gesture.
    pub fn process_event<L: GestureListener + ?Sized>(
        &mut self,
        event: &SensorEvent,
        listener: &mut L,
    ) -> bool {
        match self.on_orientation_sample(event) {
            Some(gesture) => {
                listener.on_gesture_detected(&gesture);
                true
            }
            None => false,
        }
    }

    /// Drain `source`, notifying `listener` of every gesture. Returns the
    /// number of gestures detected.
    pub fn run<S, L>(&mut self, source: &mut S, listener: &mut L) -> anyhow::Result<u64>
    where
        S: SensorSource + ?Sized,
        L: GestureListener + ?Sized,
    {
        let before = self.stats.gestures;
        while let Some(event) = source.next_event()? {
            self.process_event(&event, listener);
        }
        Ok(self.stats.gestures - before)
    }

    pub fn history(&self) -> &OrientationHistory {
        self.ingestor.history()
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Quaternion;
    use crate::sensor::SensorAccuracy;
    use std::f64::consts::FRAC_PI_2;

    const SEC: i64 = 1_000_000_000;

    /// Upright device turned by `yaw_deg` about the vertical
    fn turned(t: i64, yaw_deg: f64) -> SensorEvent {
        let upright = Quaternion::from_axis_angle([1.0, 0.0, 0.0], FRAC_PI_2);
        let turn = Quaternion::from_axis_angle([0.0, 0.0, 1.0], yaw_deg.to_radians());
        SensorEvent::new(t, SensorAccuracy::High, turn.multiply(&upright).to_reading())
    }

    fn monitor() -> GestureMonitor {
        GestureMonitor::new(&KioskConfig::default()).unwrap()
    }

    #[test]
    fn test_gesture_fires_and_resets_history() {
        let mut monitor = monitor();
        assert!(monitor.on_orientation_sample(&turned(0, 0.0)).is_none());
        assert!(monitor.on_orientation_sample(&turned(SEC, 80.0)).is_none());

        let gesture = monitor
            .on_orientation_sample(&turned(2 * SEC, 3.0))
            .expect("gesture");
        assert_eq!(gesture.sequence, 1);
        assert_eq!(gesture.timestamp_ns, 2 * SEC);
        assert!(monitor.history().is_empty());

        // The pre-clear samples are gone, so a single return sample cannot match
        assert!(monitor.on_orientation_sample(&turned(2 * SEC + 1, 0.0)).is_none());
        assert_eq!(monitor.history().len(), 1);
        assert_eq!(monitor.stats().gestures, 1);
    }

    #[test]
    fn test_listener_is_notified() {
        let mut monitor = monitor();
        let mut seen = Vec::new();
        let mut listener = |e: &GestureEvent| seen.push(e.timestamp_ns);

        for (t, yaw) in [(0, 0.0), (SEC / 2, 45.0), (SEC, 90.0), (3 * SEC / 2, 5.0)] {
            monitor.process_event(&turned(t, yaw), &mut listener);
        }
        assert_eq!(seen, vec![3 * SEC / 2]);
    }

    #[test]
    fn test_stopped_monitor_ignores_samples() {
        let mut monitor = monitor();
        monitor.on_orientation_sample(&turned(0, 0.0));
        monitor.stop();
        assert!(monitor.history().is_empty());

        monitor.on_orientation_sample(&turned(SEC, 80.0));
        assert!(monitor.history().is_empty());
        assert_eq!(monitor.stats().ignored, 1);

        monitor.start();
        monitor.on_orientation_sample(&turned(2 * SEC, 0.0));
        assert_eq!(monitor.history().len(), 1);
    }

    #[test]
    fn test_stats_count_drops() {
        let mut monitor = monitor();
        let mut unreliable = turned(0, 0.0);
        unreliable.accuracy = SensorAccuracy::Unreliable;

        monitor.on_orientation_sample(&unreliable);
        monitor.on_orientation_sample(&turned(SEC, 0.0));
        monitor.on_orientation_sample(&turned(SEC / 2, 0.0));

        let stats = monitor.stats();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.untrusted, 1);
        assert_eq!(stats.out_of_order, 1);
        assert_eq!(stats.dropped(), 2);
    }

    #[test]
    fn test_channel_listener_forwards() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut listener = ChannelListener::new(tx);
        let mut monitor = monitor();

        for (t, yaw) in [(0, 0.0), (SEC, -85.0), (2 * SEC, 0.0)] {
            monitor.process_event(&turned(t, yaw), &mut listener);
        }
        let gesture = rx.try_recv().unwrap();
        assert_eq!(gesture.sequence, 1);
        assert!(rx.try_recv().is_err());
    }
}
