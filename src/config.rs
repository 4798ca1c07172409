//! Front-end defaults and timing constants.

use mental_math::settings::EnabledOperators;

// Countdown
pub const TICK_INTERVAL_MS: u32 = 1_000;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;

// Default ranges, as (min, max)
pub const DEFAULT_ADD_LEFT: (i32, i32) = (2, 100);
pub const DEFAULT_ADD_RIGHT: (i32, i32) = (2, 100);
pub const DEFAULT_MUL_LEFT: (i32, i32) = (2, 12);
pub const DEFAULT_MUL_RIGHT: (i32, i32) = (2, 100);

pub const DEFAULT_ENABLED: EnabledOperators = EnabledOperators::ALL;
