pub mod history;
pub mod ingest;
pub mod matcher;

pub use history::{OrientationHistory, OrientationSample};
pub use ingest::{Ingested, SampleIngestor};
pub use matcher::{GestureMatch, GestureMatcher, MatchState};
