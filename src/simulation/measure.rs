use crate::config::KioskConfig;
use crate::error::Result;
use crate::monitor::{GestureEvent, GestureMonitor, MonitorStats};
use crate::sensor::SensorEvent;

/// Gestures found in a trace, plus the monitor counters after replaying it
#[derive(Debug, Clone, Default)]
pub struct ReplayResult {
    pub gestures: Vec<GestureEvent>,
    pub stats: MonitorStats,
}

/// Replay `events` through a fresh monitor.
pub fn replay(events: &[SensorEvent], config: &KioskConfig) -> Result<ReplayResult> {
    let mut monitor = GestureMonitor::new(config)?;
    let gestures = events
        .iter()
        .filter_map(|e| monitor.on_orientation_sample(e))
        .collect();
    Ok(ReplayResult {
        gestures,
        stats: monitor.stats(),
    })
}

/// Fraction of `trials` traces in which exactly `expected` gestures fire.
pub fn detection_rate<F>(trials: u64, expected: usize, config: &KioskConfig, make_trace: F) -> f64
where
    F: Fn(u64) -> Vec<SensorEvent>,
{
    if trials == 0 {
        return 0.0;
    }
    let hits = (0..trials)
        .filter(|&seed| {
            replay(&make_trace(seed), config)
                .map(|r| r.gestures.len() == expected)
                .unwrap_or(false)
        })
        .count();
    hits as f64 / trials as f64
}
