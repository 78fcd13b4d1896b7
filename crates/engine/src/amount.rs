use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use crate::{EngineError, ResultEngine};

/// Number of millionths in one unit.
const SCALE: i64 = 1_000_000;
const DECIMALS: usize = 6;

/// Signed decimal quantity represented as **integer millionths**.
///
/// Used for every amount, price and ledger value so that sums and
/// differences never drift. Six fractional digits match what the business
/// records for weights and prices.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_micros(12_500_000);
/// assert_eq!(amount.to_string(), "12.5");
/// assert_eq!("0.000001".parse::<Amount>().unwrap().micros(), 1);
/// assert!("1.0000001".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from integer millionths.
    #[must_use]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Returns the raw value in millionths.
    #[must_use]
    pub const fn micros(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a JSON number into an amount.
    ///
    /// Rejects non-finite values and values with more than six decimals.
    pub fn from_f64(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        value.to_string().parse()
    }

    /// Same as [`Amount::from_f64`] but also rejects negative values.
    pub fn non_negative(value: f64, label: &str) -> ResultEngine<Self> {
        let amount = Self::from_f64(value)?;
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "{label} must not be negative"
            )));
        }
        Ok(amount)
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Product of two quantities, truncated toward zero at six decimals.
    #[must_use]
    pub fn checked_mul(self, rhs: Amount) -> Option<Amount> {
        i64::try_from(self.wide_mul(rhs)).ok().map(Amount)
    }

    /// Product in millionths as `i128`. Never overflows for two `Amount`s.
    #[must_use]
    pub fn wide_mul(self, rhs: Amount) -> i128 {
        i128::from(self.0) * i128::from(rhs.0) / i128::from(SCALE)
    }

    /// Converts a value in millionths, such as [`Amount::wide_mul`]'s
    /// result, into a float.
    #[must_use]
    pub fn micros_to_f64(micros: i128) -> f64 {
        micros as f64 / SCALE as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if frac == 0 {
            return write!(f, "{sign}{units}");
        }
        let frac = format!("{frac:06}");
        write!(f, "{sign}{units}.{}", frac.trim_end_matches('0'))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into millionths.
    ///
    /// Accepts an optional leading `+`/`-` and at most six fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if rest.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (units_str, frac_str) = rest.split_once('.').unwrap_or((rest, ""));
        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_str.len() > DECIMALS {
            return Err(EngineError::InvalidAmount(
                "Should be a number with at most 6 decimal places".to_string(),
            ));
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;
        let frac: i64 = if frac_str.is_empty() {
            0
        } else {
            let padded = format!("{frac_str:0<width$}", width = DECIMALS);
            padded.parse().map_err(|_| invalid())?
        };

        let total = units
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::from_micros(0).to_string(), "0");
        assert_eq!(Amount::from_micros(1).to_string(), "0.000001");
        assert_eq!(Amount::from_micros(50_250_000).to_string(), "50.25");
        assert_eq!(Amount::from_micros(-1_500_000).to_string(), "-1.5");
    }

    #[test]
    fn parse_accepts_up_to_six_decimals() {
        assert_eq!("10".parse::<Amount>().unwrap().micros(), 10_000_000);
        assert_eq!("10.5".parse::<Amount>().unwrap().micros(), 10_500_000);
        assert_eq!("-0.000001".parse::<Amount>().unwrap().micros(), -1);
        assert_eq!("+1.000000".parse::<Amount>().unwrap().micros(), 1_000_000);
        assert!("12.3456789".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn from_f64_round_trips_json_numbers() {
        let amount = Amount::from_f64(50.123456).unwrap();
        assert_eq!(amount.micros(), 50_123_456);
        assert_eq!(amount.to_f64(), 50.123456);
        assert!(Amount::from_f64(f64::INFINITY).is_err());
        assert!(Amount::non_negative(-1.0, "amount").is_err());
    }

    #[test]
    fn multiplication_truncates_at_six_places() {
        let amount = Amount::from_micros(2_500_000);
        let price = Amount::from_micros(3_000_001);
        assert_eq!(amount.checked_mul(price).unwrap().micros(), 7_500_002);
    }

    #[test]
    fn wide_mul_holds_products_past_i64() {
        let amount = Amount::from_f64(2_000_000.0).unwrap();
        let price = Amount::from_f64(5_000_000.0).unwrap();
        assert_eq!(amount.checked_mul(price), None);
        assert_eq!(amount.wide_mul(price), 10_000_000_000_000_000_000);
        assert_eq!(Amount::micros_to_f64(amount.wide_mul(price)), 1e13);
    }

    #[test]
    fn sum_adds_every_item() {
        let total: Amount = [1_000_000, 2_500_000, 500_000]
            .into_iter()
            .map(Amount::from_micros)
            .sum();
        assert_eq!(total.to_string(), "4");
    }
}
