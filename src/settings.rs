//! Resolution of raw settings-form values into a [`DrillConfig`].
//!
//! Only the `add` and `mul` ranges are configurable. `sub` reuses the `add`
//! ranges and `div` reuses the `mul` ranges; any operator whose checkbox is
//! unset is removed from the resulting bounds.

use crate::utils::{parse_operand, parse_time_limit, TimeLimitError};
use crate::{DrillConfig, OperandBounds, OperandRange, Operator, OperatorBounds};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which side of the operator a range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Errors that keep a session from starting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Select at least one operation")]
    NoOperatorSelected,
    #[error("{0}")]
    MalformedNumber(String),
    #[error("{operator} {side} range is inverted: min {min} is greater than max {max}")]
    InvertedRange {
        operator: Operator,
        side: Side,
        min: i32,
        max: i32,
    },
    #[error(transparent)]
    InvalidTimeLimit(#[from] TimeLimitError),
    #[error("Division needs a divisor range without zero, got {min} to {max}")]
    ZeroDivisor { min: i32, max: i32 },
    #[error("Subtraction needs non-negative answers, but the answer range starts at {min}")]
    NegativeDifference { min: i32 },
}

/// The operator checkboxes of the settings form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledOperators {
    pub add: bool,
    pub sub: bool,
    pub mul: bool,
    pub div: bool,
}

impl EnabledOperators {
    pub const ALL: EnabledOperators = EnabledOperators {
        add: true,
        sub: true,
        mul: true,
        div: true,
    };

    pub fn is_enabled(&self, op: Operator) -> bool {
        match op {
            Operator::Add => self.add,
            Operator::Sub => self.sub,
            Operator::Mul => self.mul,
            Operator::Div => self.div,
        }
    }

    pub fn set(&mut self, op: Operator, enabled: bool) {
        match op {
            Operator::Add => self.add = enabled,
            Operator::Sub => self.sub = enabled,
            Operator::Mul => self.mul = enabled,
            Operator::Div => self.div = enabled,
        }
    }

    pub fn any(&self) -> bool {
        self.add || self.sub || self.mul || self.div
    }
}

/// The four raw range fields of one configurable operator family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFields {
    pub left_min: String,
    pub left_max: String,
    pub right_min: String,
    pub right_max: String,
}

/// Everything the settings form submits, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    pub enabled: EnabledOperators,
    pub add: RangeFields,
    pub mul: RangeFields,
    pub time_limit: String,
}

fn parse_range(
    operator: Operator,
    side: Side,
    min: &str,
    max: &str,
) -> Result<OperandRange, ConfigError> {
    let field = |bound: &str| format!("{} {} {}", operator.label(), side, bound);
    let min = parse_operand(min, &field("min"))
        .map_err(ConfigError::MalformedNumber)?;
    let max = parse_operand(max, &field("max"))
        .map_err(ConfigError::MalformedNumber)?;
    OperandRange::new(min, max).ok_or(ConfigError::InvertedRange {
        operator,
        side,
        min,
        max,
    })
}

fn parse_bounds(operator: Operator, fields: &RangeFields) -> Result<OperandBounds, ConfigError> {
    Ok(OperandBounds {
        left: parse_range(operator, Side::Left, &fields.left_min, &fields.left_max)?,
        right: parse_range(operator, Side::Right, &fields.right_min, &fields.right_max)?,
    })
}

fn resolve_inner(raw: &RawSettings) -> Result<DrillConfig, ConfigError> {
    let enabled = raw.enabled;
    if !enabled.any() {
        return Err(ConfigError::NoOperatorSelected);
    }

    // Range fields of a family nobody uses are ignored rather than validated.
    let add = if enabled.add || enabled.sub {
        Some(parse_bounds(Operator::Add, &raw.add)?)
    } else {
        None
    };
    let mul = if enabled.mul || enabled.div {
        Some(parse_bounds(Operator::Mul, &raw.mul)?)
    } else {
        None
    };

    let mut bounds = OperatorBounds::derive(add, mul);
    bounds.retain(|op| enabled.is_enabled(op));

    let time_limit_secs = parse_time_limit(&raw.time_limit)?;
    DrillConfig::new(bounds, time_limit_secs)
}

/// Turn a settings submission into a validated configuration.
pub fn resolve(raw: &RawSettings) -> Result<DrillConfig, ConfigError> {
    match resolve_inner(raw) {
        Ok(config) => {
            info!(
                "Resolved settings: operators {:?}, time limit {}s",
                config.active().as_slice(),
                config.time_limit_secs()
            );
            Ok(config)
        }
        Err(e) => {
            warn!("Rejected settings: {}", e);
            Err(e)
        }
    }
}
