use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

/// Text that is not a whole number of cents, or is too large to represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid amount")]
pub struct AmountParseError(pub String);

impl Amount {
    const SCALE: i64 = 10_000;
    const DIGITS: usize = 4;
    const CENT: i64 = Self::SCALE / 100;

    pub const ZERO: Amount = Amount(0);

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    /// Whole cents, e.g. `Amount::from_cents(125)` is 1.25.
    pub fn from_cents(cents: i64) -> Self {
        Amount(cents * Self::CENT)
    }

    pub fn scaled(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True when the amount has no fraction of a cent.
    pub fn is_whole_cents(self) -> bool {
        self.0 % Self::CENT == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    /// Accepts `[$][-]digits[.d[d]]`: at most two decimals, no exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountParseError(s.to_string());

        let text = s.trim();
        let text = text.strip_prefix('$').unwrap_or(text).trim_start();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) if !frac.is_empty() => (whole, frac),
            Some(_) => return Err(invalid()),
            None => (text, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !all_digits(whole)
            || !all_digits(frac)
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(invalid)?;
        let scaled = cents.checked_mul(Self::CENT).ok_or_else(invalid)?;
        Ok(Amount(if negative { -scaled } else { scaled }))
    }
}

impl fmt::Display for Amount {
    /// Four decimals by default; `{:.2}` rounds to cents.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(Self::DIGITS).min(Self::DIGITS);
        let divisor = 10u64.pow((Self::DIGITS - digits) as u32);
        let unit = 10u64.pow(digits as u32);

        let sign = if self.0 < 0 { "-" } else { "" };
        let rounded = (self.0.unsigned_abs() + divisor / 2) / divisor;
        let whole = rounded / unit;
        let frac = rounded % unit;

        if digits == 0 {
            write!(f, "{sign}{whole}")
        } else {
            write!(f, "{sign}{whole}.{frac:0digits$}")
        }
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}
