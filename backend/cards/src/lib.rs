//! Card number validation and masking.
//!
//! The full PAN only ever lives inside a [`StrongSecret`]; anything that is
//! persisted or logged goes through the last-four masking strategy.

use std::{fmt, ops::Deref, str::FromStr};

use error_stack::Report;
use hyperswitch_masking::{PeekInterface, Strategy, StrongSecret, WithType};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CardNumberValidationErr(&'static str);

/// A validated payment card number. Deserialization goes through the same
/// validation as [`FromStr`], so an invalid PAN cannot enter via JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CardNumber(StrongSecret<String, CardNumberStrategy>);

impl CardNumber {
    /// Digits the gateway is allowed to echo back and the only part of the
    /// PAN that may be stored locally.
    pub fn last4(&self) -> String {
        let number = self.0.peek();
        number
            .chars()
            .skip(number.len().saturating_sub(4))
            .collect()
    }
}

impl FromStr for CardNumber {
    type Err = Report<CardNumberValidationErr>;

    fn from_str(card_number: &str) -> Result<Self, Self::Err> {
        let number = card_number.split_whitespace().collect::<String>();
        if !luhn(&number) {
            return Err(Report::new(CardNumberValidationErr(
                "card number invalid",
            )));
        }
        Ok(Self(StrongSecret::new(number)))
    }
}

impl TryFrom<String> for CardNumber {
    type Error = Report<CardNumberValidationErr>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl Deref for CardNumber {
    type Target = StrongSecret<String, CardNumberStrategy>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

pub enum CardNumberStrategy {}

impl<T> Strategy<T> for CardNumberStrategy
where
    T: AsRef<str>,
{
    fn fmt(val: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = val.as_ref();
        if value.len() < 13 || value.len() > 19 {
            return WithType::fmt(val, f);
        }
        let unmasked = value.len() - 4;
        write!(f, "{}{}", "*".repeat(unmasked), &value[unmasked..])
    }
}

/// Standard mod-10 checksum over the digits of `number`.
fn luhn(number: &str) -> bool {
    if number.len() < 13 || number.len() > 19 {
        return false;
    }
    let mut digits = Vec::with_capacity(number.len());
    for c in number.chars() {
        match c.to_digit(10) {
            Some(d) => digits.push(d),
            None => return false,
        }
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &d)| {
            if idx % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
