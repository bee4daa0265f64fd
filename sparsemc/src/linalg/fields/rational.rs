use std::{
    fmt::Display,
    ops::{Add, Mul},
};

use rug::{Integer, ops::Pow};

use super::{Almost, FromRational, PseudoField};

/// An arbitrary-precision rational number implementing [`PseudoField`].
///
/// Currently this is based on [`rug::Rational`]. Decimal tokens are converted exactly,
/// i.e., `0.1` becomes $\frac{1}{10}$ and not the closest double.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Rational(rug::Rational);

impl Rational {
    pub fn numer(&self) -> String {
        self.0.numer().to_string()
    }

    pub fn denom(&self) -> String {
        self.0.denom().to_string()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }
}

/// Parses a decimal number with optional sign, fraction and exponent exactly.
fn parse_decimal(text: &str) -> Option<rug::Rational> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (integral, fractional) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integral.is_empty() && fractional.is_empty() {
        return None;
    }
    if !integral
        .chars()
        .chain(fractional.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let digits = Integer::from_str_radix(&format!("{integral}{fractional}"), 10).ok()?;
    let mut value = rug::Rational::from(digits);
    let scale = exponent.checked_sub(i64::try_from(fractional.len()).ok()?)?;
    let power = Integer::from(10).pow(u32::try_from(scale.unsigned_abs()).ok()?);
    if scale < 0 {
        value /= power;
    } else {
        value *= power;
    }
    if negative {
        value = -value;
    }
    Some(value)
}

impl FromRational for Rational {
    fn from_rational(numerator: &str, denominator: &str) -> Option<Self> {
        let numerator = parse_decimal(numerator)?;
        let denominator = parse_decimal(denominator)?;
        if denominator == 0 {
            return None;
        }
        Some(Self(numerator / denominator))
    }
}

impl Almost for Rational {
    fn cmp_eq(&self, other: &Self) -> bool {
        self.eq(other)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denom() == *"1" {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

impl From<Rational> for f64 {
    fn from(rational: Rational) -> Self {
        rational.0.to_f64()
    }
}

impl num_traits::One for Rational {
    fn one() -> Self {
        Self(rug::Rational::from(1))
    }

    fn is_one(&self) -> bool {
        self.0 == 1
    }
}

impl num_traits::Zero for Rational {
    fn zero() -> Self {
        Self(rug::Rational::new())
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Rational {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul for Rational {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl PseudoField for Rational {
    fn add_assign(&mut self, rhs: &Self) {
        self.0 += &rhs.0;
    }

    fn mul_assign(&mut self, rhs: &Self) {
        self.0 *= &rhs.0;
    }

    fn less_than(&self, other: &Self) -> bool {
        self.0 < other.0
    }
}
