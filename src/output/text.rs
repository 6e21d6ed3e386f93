use super::{Formatter, sensor_seconds};
use crate::monitor::GestureEvent;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, event: &GestureEvent) -> String {
        let base = format!(
            "Gesture #{} at {:.3}s: away {:.1}°, back {:.1}°",
            event.sequence,
            sensor_seconds(event.timestamp_ns),
            event.far_distance.to_degrees(),
            event.near_distance.to_degrees()
        );
        if self.verbose {
            format!(
                "{} [took {:.2}s, {} samples, rest {}]",
                base,
                sensor_seconds(event.duration_ns),
                event.samples_scanned,
                event.orientation
            )
        } else {
            base
        }
    }
}
