//! Core of the mental math drill: operators, operand bounds, question
//! generation and answer checking.
//!
//! The browser front-end in `main.rs` only forwards DOM events into
//! [`session::DrillSession`] and renders what it reports back.

use log::debug;
use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod clock;
pub mod session;
pub mod settings;
pub mod utils;

use settings::ConfigError;

/// Limits applied while resolving user settings.
pub mod limits {
    pub const MIN_TIME_LIMIT_SECS: u32 = 1;
}

/// One of the four supported arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    /// Identifier used in form field names and serialized settings.
    pub fn id(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
        }
    }

    /// Symbol shown between the operands of a question.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '\u{2013}',
            Operator::Mul => '\u{00D7}',
            Operator::Div => '\u{00F7}',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operator::Add => "Addition",
            Operator::Sub => "Subtraction",
            Operator::Mul => "Multiplication",
            Operator::Div => "Division",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Inclusive integer range an operand is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperandRange {
    min: i32,
    max: i32,
}

impl OperandRange {
    /// Returns `None` when `max < min`.
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min as i64..=self.max as i64).contains(&value)
    }
}

impl Distribution<i64> for OperandRange {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.min..=self.max) as i64
    }
}

/// Left and right operand ranges for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperandBounds {
    pub left: OperandRange,
    pub right: OperandRange,
}

/// Operand bounds keyed by operator. Only enabled operators are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorBounds(BTreeMap<Operator, OperandBounds>);

impl OperatorBounds {
    /// Build bounds for all four operators from the two configurable
    /// families: `sub` copies `add` and `div` copies `mul`. A missing family
    /// leaves both of its operators out.
    pub fn derive(add: Option<OperandBounds>, mul: Option<OperandBounds>) -> Self {
        let mut map = BTreeMap::new();
        if let Some(add) = add {
            map.insert(Operator::Add, add);
            map.insert(Operator::Sub, add);
        }
        if let Some(mul) = mul {
            map.insert(Operator::Mul, mul);
            map.insert(Operator::Div, mul);
        }
        Self(map)
    }

    /// Drop every operator for which `enabled` returns false.
    pub fn retain(&mut self, mut enabled: impl FnMut(Operator) -> bool) {
        self.0.retain(|op, _| enabled(*op));
    }

    pub fn get(&self, op: Operator) -> Option<&OperandBounds> {
        self.0.get(&op)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.0.keys().copied()
    }
}

/// The operators a session may draw from, in canonical order. Never empty
/// once part of a [`DrillConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveOperators(Vec<Operator>);

impl ActiveOperators {
    pub fn as_slice(&self) -> &[Operator] {
        &self.0
    }
}

/// A validated configuration a session can run with.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillConfig {
    bounds: OperatorBounds,
    active: ActiveOperators,
    time_limit_secs: u32,
}

impl DrillConfig {
    pub fn new(bounds: OperatorBounds, time_limit_secs: u32) -> Result<Self, ConfigError> {
        if bounds.is_empty() {
            return Err(ConfigError::NoOperatorSelected);
        }
        if time_limit_secs < limits::MIN_TIME_LIMIT_SECS {
            return Err(utils::TimeLimitError::TooShort {
                value: time_limit_secs,
                min: limits::MIN_TIME_LIMIT_SECS,
            }
            .into());
        }
        // The divisor is drawn from the left range, the difference from the right.
        if let Some(div) = bounds.get(Operator::Div) {
            if div.left.contains(0) {
                return Err(ConfigError::ZeroDivisor {
                    min: div.left.min(),
                    max: div.left.max(),
                });
            }
        }
        if let Some(sub) = bounds.get(Operator::Sub) {
            if sub.right.min() < 0 {
                return Err(ConfigError::NegativeDifference {
                    min: sub.right.min(),
                });
            }
        }

        let active = ActiveOperators(bounds.operators().collect());
        Ok(Self {
            bounds,
            active,
            time_limit_secs,
        })
    }

    pub fn bounds(&self) -> &OperatorBounds {
        &self.bounds
    }

    pub fn active(&self) -> &ActiveOperators {
        &self.active
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }
}

/// A question as displayed to the player together with its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub operator: Operator,
    pub left: i64,
    pub right: i64,
    pub answer: i64,
}

impl Question {
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.symbol(), self.right)
    }
}

impl Distribution<Question> for DrillConfig {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        let ops = self.active.as_slice();
        let operator = ops[rng.random_range(0..ops.len())];
        // Every active operator has bounds; both come from the same map.
        let bounds = self.bounds.0[&operator];
        let left_arg = bounds.left.sample(rng);
        let right_arg = bounds.right.sample(rng);

        // Subtraction and division are generated backwards from the answer so
        // the result is always a non-negative integer.
        let question = match operator {
            Operator::Add => Question {
                operator,
                left: left_arg,
                right: right_arg,
                answer: left_arg + right_arg,
            },
            Operator::Mul => Question {
                operator,
                left: left_arg,
                right: right_arg,
                answer: left_arg * right_arg,
            },
            Operator::Sub => Question {
                operator,
                left: left_arg + right_arg,
                right: left_arg,
                answer: right_arg,
            },
            Operator::Div => Question {
                operator,
                left: left_arg * right_arg,
                right: left_arg,
                answer: right_arg,
            },
        };

        debug!("Generated question {} = {}", question, question.answer);
        question
    }
}

/// Draw a random question from the active operators of `config`.
pub fn generate_question<R: Rng + ?Sized>(config: &DrillConfig, rng: &mut R) -> Question {
    config.sample(rng)
}

/// True when `input` is exactly the decimal form of `answer`. No trimming
/// and no numeric parsing: `"007"` does not match 7.
pub fn check_answer(input: &str, answer: i64) -> bool {
    input == answer.to_string()
}

/// What `generate_question_js` hands back to JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPayload {
    pub text: String,
    pub answer: i64,
}

/// Resolve `raw` and draw one question from it.
pub fn question_for_settings<R: Rng + ?Sized>(
    raw: &settings::RawSettings,
    rng: &mut R,
) -> Result<QuestionPayload, ConfigError> {
    let config = settings::resolve(raw)?;
    let question = generate_question(&config, rng);
    Ok(QuestionPayload {
        text: question.text(),
        answer: question.answer,
    })
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// JavaScript entry point: resolve a settings object and draw one question.
///
/// Resolves to `{ text, answer }`; invalid or undecodable settings throw an
/// `Error` on the JavaScript side.
#[wasm_bindgen]
pub fn generate_question_js(settings_js: JsValue) -> Result<JsValue, JsValue> {
    let raw: settings::RawSettings = serde_wasm_bindgen::from_value(settings_js)
        .map_err(|e| js_error(format!("Failed to deserialize settings: {}", e)))?;
    let payload = question_for_settings(&raw, &mut rand::rng())
        .map_err(|e| js_error(format!("Invalid configuration: {}", e)))?;
    serde_wasm_bindgen::to_value(&payload)
        .map_err(|e| js_error(format!("Failed to serialize question: {}", e)))
}
