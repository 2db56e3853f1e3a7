//! Ambient load indicator with `high/critical/dying` water levels
//! (glossary). Only the dying level changes fan-out behavior today (spec
//! §4.7 step 1); the others are exposed for callers that want to shed load
//! earlier.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterLevel {
    #[default]
    Normal,
    High,
    Critical,
    Dying,
}

#[derive(Debug, Default)]
pub struct CircuitBreaker {
    level: Mutex<WaterLevel>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> WaterLevel {
        *self.level.lock().unwrap()
    }

    pub fn set_level(&self, level: WaterLevel) {
        *self.level.lock().unwrap() = level;
    }

    pub fn is_dying(&self) -> bool {
        self.level() == WaterLevel::Dying
    }
}
