use super::{Almost, FromRational, PseudoField};

/// Relative tolerance used by [`Almost::cmp_eq`] on doubles.
const RELATIVE_TOLERANCE: f64 = 1e-12;

impl FromRational for f64 {
    fn from_rational(numerator: &str, denominator: &str) -> Option<Self> {
        let numerator = numerator.parse::<f64>().ok()?;
        let denominator = denominator.parse::<f64>().ok()?;
        let value = numerator / denominator;
        value.is_finite().then_some(value)
    }
}

impl Almost for f64 {
    fn cmp_eq(&self, other: &Self) -> bool {
        let scale = self.abs().max(other.abs()).max(1.0);
        (self - other).abs() <= RELATIVE_TOLERANCE * scale
    }
}

impl PseudoField for f64 {
    fn add_assign(&mut self, rhs: &Self) {
        *self += *rhs;
    }

    fn mul_assign(&mut self, rhs: &Self) {
        *self *= *rhs;
    }

    fn less_than(&self, other: &Self) -> bool {
        *self < *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_tokens() {
        assert_eq!(f64::from_rational("0.25", "1"), Some(0.25));
        assert_eq!(f64::from_rational("1e-3", "1"), Some(0.001));
        assert_eq!(f64::from_rational("1", "4"), Some(0.25));
    }

    #[test]
    fn rejects_malformed_and_non_finite_tokens() {
        assert_eq!(f64::from_rational("0,5", "1"), None);
        assert_eq!(f64::from_rational("1", "0"), None);
        assert_eq!(f64::from_rational("NaN", "1"), None);
        assert_eq!(f64::from_rational("inf", "1"), None);
    }

    #[test]
    fn probability_bounds() {
        assert!(0.0_f64.is_probability());
        assert!(1.0_f64.is_probability());
        assert!(!1.5_f64.is_probability());
        assert!(!(-0.1_f64).is_probability());
        assert!((-0.1_f64).is_negative());
    }

    #[test]
    fn almost_equal_sums() {
        let mut sum = 0.0_f64;
        for _ in 0..10 {
            PseudoField::add_assign(&mut sum, &0.1);
        }
        assert!(sum != 1.0);
        assert!(sum.cmp_eq(&1.0));
        assert!(!0.9_f64.cmp_eq(&1.0));
    }
}
