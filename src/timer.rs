//! Tick counter used to gate periodic actions (attacks, spawns, cleanup).

use std::time::Duration;

/// Simulation ticks per second. Every frame advances timers by one tick.
pub const TICKS_PER_SECOND: u32 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    pub current_ticks: u32,
    pub target_ticks: u32,
}

impl Timer {
    pub fn new(target_ticks: u32) -> Self {
        Timer {
            current_ticks: 0,
            target_ticks,
        }
    }

    /// Timer whose target is `duration` expressed in ticks (rounded down).
    pub fn from_duration(duration: Duration) -> Self {
        let ticks = duration.as_millis() * TICKS_PER_SECOND as u128 / 1000;
        Self::new(ticks.min(u32::MAX as u128) as u32)
    }

    /// Cooldown timer for an action fired `rate_hz` times per second.
    /// Non-positive rates never become ready on their own.
    pub fn from_rate(rate_hz: f64) -> Self {
        if rate_hz <= 0.0 || !rate_hz.is_finite() {
            return Self::new(u32::MAX);
        }
        Self::from_duration(Duration::from_millis((1000.0 / rate_hz) as u64))
    }

    pub fn update(&mut self) {
        self.current_ticks = self.current_ticks.saturating_add(1);
    }

    pub fn is_ready(&self) -> bool {
        self.current_ticks >= self.target_ticks
    }

    pub fn reset(&mut self) {
        self.current_ticks = 0;
    }

    /// Make the next `is_ready` check fire immediately.
    pub fn trigger_now(&mut self) {
        self.current_ticks = self.target_ticks;
    }
}
