//! Traits for the numeric types stored in matrices.
//!
//! Transition matrices of probabilistic models are filled with probabilities, rewards
//! or rates. Depending on the analysis these are floating-point numbers, exact
//! arbitrary-precision rationals, or symbolic rational functions of model parameters.
//! The latter cannot be totally ordered, they only support equality and a strict
//! *less than* comparison. Hence, the numeric contract of this crate, [`PseudoField`],
//! asks for exactly that:
//!
//! - an additive identity and a multiplicative identity,
//! - in-place addition and multiplication,
//! - equality and [`PseudoField::less_than`].
//!
//! Nothing in this crate ever relies on `<=` or `>=`. Derived predicates such as
//! [`PseudoField::is_probability`] are spelled out in terms of `less_than`.
//!
//! Two implementations are provided:
//!
//! - [`f64`] for plain floating-point models (see [`float64`]),
//! - [`Rational`](rational::Rational) for exact arbitrary-precision rationals backed
//!   by [`rug`].

use std::fmt::{Debug, Display};

pub mod float64;
pub mod rational;

/// Fallible construction from the textual form `numerator/denominator`.
///
/// Both parts are decimal numbers in the `C` locale, i.e., with `.` as the decimal
/// separator and an optional exponent, for instance `0.25`, `1e-3` or `3`.
pub trait FromRational: Sized {
    /// Returns [`None`] if either part is malformed or the quotient is not a finite
    /// number.
    fn from_rational(numerator: &str, denominator: &str) -> Option<Self>;
}

/// Equality up to the precision of the numeric type.
pub trait Almost: Sized {
    fn cmp_eq(&self, other: &Self) -> bool;
}

/// The minimal numeric contract for matrix entries.
pub trait PseudoField:
    Debug
    + Display
    + Sized
    + Clone
    + PartialEq
    + FromRational
    + Almost
    + num_traits::Zero
    + num_traits::One
    + Send
    + Sync
{
    fn add_assign(&mut self, rhs: &Self);
    fn mul_assign(&mut self, rhs: &Self);

    /// Strict comparison `self < other`.
    fn less_than(&self, other: &Self) -> bool;

    /// Checks whether `self < 0`.
    fn is_negative(&self) -> bool {
        self.less_than(&Self::zero())
    }

    /// Checks whether `self` lies within $[0, 1]$.
    fn is_probability(&self) -> bool {
        !self.is_negative() && !Self::one().less_than(self)
    }
}
