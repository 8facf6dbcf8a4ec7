//! The calculator state machine.
//!
//! The whole state round-trips through the page so that the server does not
//! need to remember anything between key presses.

use std::{fmt::Display, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Shown in place of a number after a division or modulo by zero.
pub const ERROR_DISPLAY: &str = "Error";

/// The maximum number of characters that can be typed into the display.
const MAX_INPUT_LENGTH: usize = 16;

/// The number of decimal places results are rounded to.
const RESULT_DECIMAL_PLACES: u32 = 10;

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
    #[serde(rename = "mod")]
    Modulo,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Modulo => "mod",
        }
    }

    /// Apply the operator, `None` on division by zero or overflow.
    fn apply(self, lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Subtract => lhs.checked_sub(rhs),
            Operator::Multiply => lhs.checked_mul(rhs),
            Operator::Divide => lhs.checked_div(rhs),
            Operator::Modulo => lhs.checked_rem(rhs),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A key on the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Clear,
    ToggleSign,
    Percent,
}

impl FromStr for Key {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parsed = match key {
            "." | "," => Key::DecimalPoint,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "×" | "*" => Key::Operator(Operator::Multiply),
            "÷" | "/" => Key::Operator(Operator::Divide),
            "mod" => Key::Operator(Operator::Modulo),
            "=" => Key::Equals,
            "C" => Key::Clear,
            "+/-" => Key::ToggleSign,
            "%" => Key::Percent,
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                Key::Digit(digit.as_bytes()[0] - b'0')
            }
            other => return Err(Error::InvalidCalculatorKey(other.to_owned())),
        };

        Ok(parsed)
    }
}

/// The state of the calculator between key presses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculator {
    /// The number being typed or the last result.
    pub display: String,
    /// The pending operation or the last calculation, e.g. "12 +".
    #[serde(default)]
    pub secondary_display: String,
    /// The operator waiting for its right hand side.
    #[serde(default)]
    pub operation: Option<Operator>,
    /// The left hand side of the pending operation.
    #[serde(default)]
    pub previous_value: Option<Decimal>,
    /// Whether the next digit starts a new number instead of extending the display.
    #[serde(default)]
    pub should_reset: bool,
    /// Whether the last key was an operator, so the display still shows the
    /// left hand side.
    #[serde(default)]
    pub awaiting_operand: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            display: "0".to_owned(),
            secondary_display: String::new(),
            operation: None,
            previous_value: None,
            should_reset: false,
            awaiting_operand: false,
        }
    }
}

/// Format a number without trailing zeros, e.g. "2.5" rather than "2.50".
pub fn format_value(value: Decimal) -> String {
    let normalized = value.normalize();

    if normalized.is_zero() {
        "0".to_owned()
    } else {
        normalized.to_string()
    }
}

impl Calculator {
    /// The value on the display, `None` when the display shows an error.
    pub fn value(&self) -> Option<Decimal> {
        let display = self.display.trim_end_matches('.');

        if display.is_empty() || display == "-" {
            return Some(Decimal::ZERO);
        }

        Decimal::from_str(display).ok()
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Apply `key` to the calculator.
    ///
    /// After an error, any key starts again from a cleared calculator.
    pub fn press(&mut self, key: Key) {
        if self.is_error() || self.value().is_none() {
            *self = Self::default();
        }

        if !matches!(key, Key::Operator(_)) {
            self.awaiting_operand = false;
        }

        match key {
            Key::Digit(digit) => self.push_digit(digit),
            Key::DecimalPoint => self.push_decimal_point(),
            Key::Operator(operator) => self.press_operator(operator),
            Key::Equals => self.press_equals(),
            Key::Clear => *self = Self::default(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Percent => self.percent(),
        }
    }

    fn push_digit(&mut self, digit: u8) {
        let digit = char::from(b'0' + digit.min(9));

        if self.display == "0" || self.should_reset {
            self.display = digit.to_string();
            self.should_reset = false;
        } else if self.display.len() < MAX_INPUT_LENGTH {
            self.display.push(digit);
        }
    }

    fn push_decimal_point(&mut self) {
        if self.should_reset {
            self.display = "0.".to_owned();
            self.should_reset = false;
        } else if !self.display.contains('.') && self.display.len() < MAX_INPUT_LENGTH {
            self.display.push('.');
        }
    }

    fn press_operator(&mut self, operator: Operator) {
        // Pressing another operator straight after the first one replaces it.
        if self.awaiting_operand && self.operation.is_some() {
            if let Some(previous_value) = self.previous_value {
                self.secondary_display = format!("{} {operator}", format_value(previous_value));
            }
            self.operation = Some(operator);
            return;
        }

        let Some(current_value) = self.value() else {
            return self.show_error();
        };

        let left_hand_side = match (self.previous_value, self.operation) {
            (Some(previous_value), Some(pending)) => {
                match pending.apply(previous_value, current_value) {
                    Some(result) => round_result(result),
                    None => return self.show_error(),
                }
            }
            _ => current_value,
        };

        self.display = format_value(left_hand_side);
        self.secondary_display = format!("{} {operator}", format_value(left_hand_side));
        self.previous_value = Some(left_hand_side);
        self.operation = Some(operator);
        self.should_reset = true;
        self.awaiting_operand = true;
    }

    fn press_equals(&mut self) {
        let (Some(previous_value), Some(operation)) = (self.previous_value, self.operation) else {
            return;
        };
        let Some(current_value) = self.value() else {
            return self.show_error();
        };

        let Some(result) = operation.apply(previous_value, current_value) else {
            return self.show_error();
        };
        let result = round_result(result);

        self.secondary_display = format!(
            "{} {operation} {} =",
            format_value(previous_value),
            format_value(current_value)
        );
        self.display = format_value(result);
        self.previous_value = None;
        self.operation = None;
        self.should_reset = true;
    }

    fn toggle_sign(&mut self) {
        if self.display == "0" {
            return;
        }

        match self.display.strip_prefix('-') {
            Some(positive) => self.display = positive.to_owned(),
            None => self.display.insert(0, '-'),
        }
    }

    fn percent(&mut self) {
        if let Some(value) = self.value() {
            self.display = format_value(value / Decimal::ONE_HUNDRED);
            self.should_reset = true;
        }
    }

    fn show_error(&mut self) {
        tracing::debug!("calculator error: {self:?}");

        *self = Self {
            display: ERROR_DISPLAY.to_owned(),
            should_reset: true,
            ..Self::default()
        };
    }
}

fn round_result(result: Decimal) -> Decimal {
    result.round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
