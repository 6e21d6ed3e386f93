mod measure;
mod noise;
mod path;

pub use measure::{ReplayResult, detection_rate, replay};
pub use noise::{NoiseConfig, generate_trace};
pub use path::{
    Keyframe, OrientationPath, handling_jitter, pose_quaternion, shake_gesture, slow_round_trip,
    turn_and_keep,
};

/// Canned scenarios for the trace generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Turn away and back within the window (one gesture)
    Shake,
    /// Turn and stay turned (no gesture)
    TurnAndKeep,
    /// Turn away and back too slowly (no gesture)
    SlowRoundTrip,
    /// Small wobble while drawing (no gesture)
    Jitter,
}

impl Scenario {
    pub fn path(&self) -> OrientationPath {
        match self {
            Self::Shake => shake_gesture(),
            Self::TurnAndKeep => turn_and_keep(),
            Self::SlowRoundTrip => slow_round_trip(),
            Self::Jitter => handling_jitter(),
        }
    }

    /// Gestures one run of the scenario should produce
    pub fn expected_gestures(&self) -> usize {
        match self {
            Self::Shake => 1,
            Self::TurnAndKeep | Self::SlowRoundTrip | Self::Jitter => 0,
        }
    }
}
