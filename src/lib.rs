pub mod archive;
pub mod config;
pub mod constants;
pub mod error;
pub mod gesture;
pub mod monitor;
pub mod orientation;
pub mod output;
pub mod sensor;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::KioskConfig;
pub use error::{GestureError, Result};
pub use monitor::{GestureEvent, GestureListener, GestureMonitor};
