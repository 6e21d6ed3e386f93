pub mod generate;

pub use generate::{SEC, at_yaw, flat, replay_yaw, yaw_trace};
