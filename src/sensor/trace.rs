//! Recorded sensor traces
//!
//! A trace is a plain CSV file with one reading per line:
//!
//! ```text
//! timestamp_ns,accuracy,x,y,z[,w]
//! ```
//!
//! `accuracy` is a status code (`0`..`3`) or a level name. Blank lines, lines
//! starting with `#` and a leading header line are ignored.

use std::io::Write;

use super::{RotationReading, SensorAccuracy, SensorEvent};
use crate::error::{GestureError, Result};

pub const TRACE_HEADER: &str = "timestamp_ns,accuracy,x,y,z,w";

/// Parse one trace line. Returns `Ok(None)` for lines that carry no reading.
pub fn parse_trace_line(line: &str, line_number: usize) -> Result<Option<SensorEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with("timestamp") {
        return Ok(None);
    }

    let err = |message: String| GestureError::TraceParse {
        line: line_number,
        message,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 5 && fields.len() != 6 {
        return Err(err(format!("expected 5 or 6 fields, got {}", fields.len())));
    }

    let timestamp_ns: i64 = fields[0]
        .parse()
        .map_err(|_| err(format!("invalid timestamp: {}", fields[0])))?;
    let accuracy: SensorAccuracy = fields[1].parse().map_err(err)?;

    let component = |idx: usize| -> Result<f64> {
        fields[idx]
            .parse::<f64>()
            .map_err(|_| err(format!("invalid component: {}", fields[idx])))
    };

    let (x, y, z) = (component(2)?, component(3)?, component(4)?);
    let reading = if fields.len() == 6 {
        RotationReading::with_scalar(x, y, z, component(5)?)
    } else {
        RotationReading::new(x, y, z)
    };

    Ok(Some(SensorEvent::new(timestamp_ns, accuracy, reading)))
}

/// Writes sensor events in trace format
pub struct TraceWriter<W: Write> {
    out: W,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", TRACE_HEADER)?;
        Ok(Self { out })
    }

    pub fn write_event(&mut self, event: &SensorEvent) -> Result<()> {
        let r = &event.reading;
        match r.w {
            Some(w) => writeln!(
                self.out,
                "{},{},{:.9},{:.9},{:.9},{:.9}",
                event.timestamp_ns,
                event.accuracy.status(),
                r.x,
                r.y,
                r.z,
                w
            )?,
            None => writeln!(
                self.out,
                "{},{},{:.9},{:.9},{:.9}",
                event.timestamp_ns,
                event.accuracy.status(),
                r.x,
                r.y,
                r.z
            )?,
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
