pub mod event;
pub mod source;
pub mod trace;

pub use event::{RotationReading, SensorAccuracy, SensorEvent};
pub use source::{ChannelSource, SensorSource, TraceSource};
pub use trace::{TraceWriter, parse_trace_line};
