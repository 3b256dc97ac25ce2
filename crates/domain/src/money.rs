// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monetary amounts.
//!
//! Amounts are held as `i64` minor units (cents), two decimal places of the
//! agreement currency. The currency itself lives on the commission agreement;
//! an `Amount` never mixes currencies.
//!
//! On the wire an amount is a JSON number in major units: `1500.5` or
//! `150000`. Decimal strings such as `"1500.50"` are accepted as input. More
//! than two decimal places is rejected rather than rounded.

use crate::error::DomainError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole currency units.
    ///
    /// Saturates at the `i64` range; use `FromStr` for checked parsing.
    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Creates an amount from minor units (cents).
    #[must_use]
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(DomainError::AmountOverflow)
    }

    /// Subtracts `other` from this amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the difference does not fit.
    pub fn checked_sub(self, other: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(DomainError::AmountOverflow)
    }

    const fn whole_units(self) -> u64 {
        self.0.unsigned_abs() / MINOR_PER_MAJOR.unsigned_abs()
    }

    const fn cents(self) -> u64 {
        self.0.unsigned_abs() % MINOR_PER_MAJOR.unsigned_abs()
    }

    /// Plain decimal form without grouping, e.g. `1500.5` or `-20`.
    fn to_plain_decimal(self) -> String {
        let sign: &str = if self.0 < 0 { "-" } else { "" };
        match self.cents() {
            0 => format!("{sign}{}", self.whole_units()),
            cents if cents % 10 == 0 => {
                format!("{sign}{}.{}", self.whole_units(), cents / 10)
            }
            cents => format!("{sign}{}.{cents:02}", self.whole_units()),
        }
    }
}

fn invalid(value: &str, reason: &str) -> DomainError {
    DomainError::InvalidAmount {
        field: "amount",
        reason: format!("'{value}' {reason}"),
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    /// Parses a decimal amount in major units with at most two decimals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed: &str = s.trim();
        let (negative, unsigned) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(s, "is not a decimal number"));
        }
        if unsigned.contains('.') && fraction.is_empty() {
            return Err(invalid(s, "is not a decimal number"));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(s, "is not a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid(s, "has more than two decimal places"));
        }

        let units: i64 = whole
            .parse()
            .map_err(|_| invalid(s, "is out of range"))?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid(s, "is out of range"))? * 10,
            _ => fraction.parse().map_err(|_| invalid(s, "is out of range"))?,
        };
        let minor: i64 = units
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|minor| minor.checked_add(cents))
            .ok_or_else(|| invalid(s, "is out of range"))?;

        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl std::fmt::Display for Amount {
    /// Formats with comma thousands separators, e.g. `30,000` or `1,500.50`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits: String = self.whole_units().to_string();
        let mut grouped: String = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            f.write_str("-")?;
        }
        match self.cents() {
            0 => write!(f, "{grouped}"),
            cents => write!(f, "{grouped}.{cents:02}"),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.cents() == 0 {
            return serializer.serialize_i64(self.0 / MINOR_PER_MAJOR);
        }
        let value: f64 = self
            .to_plain_decimal()
            .parse()
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_f64(value)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a decimal amount with at most two decimal places")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        value
            .checked_mul(MINOR_PER_MAJOR)
            .map(Amount)
            .ok_or_else(|| E::custom(invalid(&value.to_string(), "is out of range")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        i64::try_from(value)
            .map_err(|_| E::custom(invalid(&value.to_string(), "is out of range")))
            .and_then(|value| self.visit_i64(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        if !value.is_finite() {
            return Err(E::custom(invalid(&value.to_string(), "is not finite")));
        }
        // Display yields the shortest decimal that round-trips the float.
        value.to_string().parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
