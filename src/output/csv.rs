use super::{Formatter, iso8601_timestamp, sensor_seconds};
use crate::monitor::GestureEvent;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, event: &GestureEvent) -> String {
        let [azimuth, pitch, roll] = event.orientation.to_degrees();
        format!(
            "{},{},{:.6},{:.1},{:.1},{:.3},{},{:.1},{:.1},{:.1}",
            iso8601_timestamp(),
            event.sequence,
            sensor_seconds(event.timestamp_ns),
            event.far_distance.to_degrees(),
            event.near_distance.to_degrees(),
            sensor_seconds(event.duration_ns),
            event.samples_scanned,
            azimuth,
            pitch,
            roll
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,sequence,sensor_time_s,far_degrees,near_degrees,duration_s,samples_scanned,azimuth,pitch,roll",
        )
    }
}
