use crate::input::InputSnapshot;

/// Reference simulation rate. Every per-tick quantity scales by the fixed
/// delta, never by wall-clock variance.
pub const TICKS_PER_SECOND: u32 = 60;

/// Everything a behavior may read during one simulation tick. Passed
/// explicitly into every update call; there is no global clock or input
/// state.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub fixed_dt_seconds: f32,
    pub input: InputSnapshot,
}

impl TickContext {
    pub fn new(input: InputSnapshot) -> Self {
        Self {
            fixed_dt_seconds: 1.0 / TICKS_PER_SECOND as f32,
            input,
        }
    }

    pub fn with_dt(input: InputSnapshot, fixed_dt_seconds: f32) -> Self {
        Self {
            fixed_dt_seconds,
            input,
        }
    }
}
