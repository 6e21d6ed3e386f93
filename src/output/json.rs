use serde::Serialize;

use super::{Formatter, iso8601_timestamp, sensor_seconds};
use crate::monitor::GestureEvent;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonRecord {
    ts: String,
    sequence: u64,
    sensor_time_s: f64,
    far_degrees: f64,
    near_degrees: f64,
    duration_s: f64,
    samples_scanned: usize,
    orientation_degrees: [f64; 3],
}

impl Formatter for JsonFormatter {
    fn format(&self, event: &GestureEvent) -> String {
        let record = JsonRecord {
            ts: iso8601_timestamp(),
            sequence: event.sequence,
            sensor_time_s: sensor_seconds(event.timestamp_ns),
            far_degrees: event.far_distance.to_degrees(),
            near_degrees: event.near_distance.to_degrees(),
            duration_s: sensor_seconds(event.duration_ns),
            samples_scanned: event.samples_scanned,
            orientation_degrees: event.orientation.to_degrees(),
        };
        // Plain numbers and strings always serialize
        serde_json::to_string(&record).unwrap_or_default()
    }
}
