//! Fixed-point scaled-integer arithmetic for prices, quantities, and volumes.
//!
//! [`Decimal`] is a newtype over a signed 64-bit integer scaled by a
//! compile-time factor. A phantom `Tag` parameter makes `Price`, `Quantity`,
//! and `Volume` distinct types even though they share a representation, so
//! e.g. adding a `Price` to a `Quantity` is a compile error. Cross-tag
//! multiplication (price × quantity → volume) is instead an explicit free
//! function, [`mul_price_quantity`].

use crate::error::ArithmeticError;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// Default scale factor: six decimal digits of precision.
pub const DEFAULT_SCALE: i64 = 1_000_000;

/// A fixed-point value scaled by `SCALE`, tagged with `Tag` so values of
/// different semantic kinds (price vs. quantity vs. volume) cannot be mixed
/// without an explicit conversion.
pub struct Decimal<Tag, const SCALE: i64 = DEFAULT_SCALE> {
    raw: i64,
    _tag: PhantomData<Tag>,
}

// Manual impls: `#[derive]` would require `Tag: Clone`/`Tag: Copy`/etc, but
// `Tag` is a marker type that never appears in `raw` and shouldn't need to
// satisfy those bounds.

impl<Tag, const SCALE: i64> Clone for Decimal<Tag, SCALE> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<Tag, const SCALE: i64> Copy for Decimal<Tag, SCALE> {}

impl<Tag, const SCALE: i64> fmt::Debug for Decimal<Tag, SCALE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self.to_double())
    }
}

impl<Tag, const SCALE: i64> fmt::Display for Decimal<Tag, SCALE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_double())
    }
}

impl<Tag, const SCALE: i64> PartialEq for Decimal<Tag, SCALE> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<Tag, const SCALE: i64> Eq for Decimal<Tag, SCALE> {}

impl<Tag, const SCALE: i64> PartialOrd for Decimal<Tag, SCALE> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<Tag, const SCALE: i64> Ord for Decimal<Tag, SCALE> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<Tag, const SCALE: i64> std::hash::Hash for Decimal<Tag, SCALE> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<Tag, const SCALE: i64> Default for Decimal<Tag, SCALE> {
    fn default() -> Self {
        Self::from_raw(0)
    }
}

impl<Tag, const SCALE: i64> Decimal<Tag, SCALE> {
    /// Wraps a raw scaled integer directly, with no conversion.
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self {
            raw,
            _tag: PhantomData,
        }
    }

    /// Converts a floating-point value, rounding half-away-from-zero.
    #[inline]
    pub fn from_double(value: f64) -> Self {
        let scaled = value * SCALE as f64;
        let raw = if value >= 0.0 {
            (scaled + 0.5).floor()
        } else {
            (scaled - 0.5).ceil()
        };
        Self::from_raw(raw as i64)
    }

    /// Returns the raw scaled integer.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.raw
    }

    /// Converts back to a floating-point value.
    #[inline]
    pub fn to_double(self) -> f64 {
        self.raw as f64 / SCALE as f64
    }

    /// `true` iff the raw value is exactly zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.raw == 0
    }

    /// Truncates to the nearest multiple of `tick_size` (in raw units),
    /// rounding toward zero.
    #[inline]
    pub fn round_to_tick(self, tick_size: i64) -> Self {
        debug_assert!(tick_size > 0, "tick_size must be positive");
        Self::from_raw((self.raw / tick_size) * tick_size)
    }

    /// Scalar multiplication by an integer.
    #[inline]
    pub fn mul_scalar(self, rhs: i64) -> Self {
        Self::from_raw(self.raw * rhs)
    }

    /// Scalar division by an integer.
    #[inline]
    pub fn div_scalar(self, rhs: i64) -> Result<Self, ArithmeticError> {
        if rhs == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Self::from_raw(self.raw / rhs))
    }

    /// Same-tag multiplication with a 128-bit intermediate to avoid
    /// overflow: `raw * other.raw / SCALE`.
    #[inline]
    pub fn mul(self, other: Self) -> Self {
        let product = self.raw as i128 * other.raw as i128 / SCALE as i128;
        Self::from_raw(product as i64)
    }

    /// Same-tag division with a 128-bit intermediate: `raw * SCALE / other.raw`.
    #[inline]
    pub fn div(self, other: Self) -> Result<Self, ArithmeticError> {
        if other.raw == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let quotient = self.raw as i128 * SCALE as i128 / other.raw as i128;
        Ok(Self::from_raw(quotient as i64))
    }
}

impl<Tag, const SCALE: i64> std::ops::Add for Decimal<Tag, SCALE> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.raw + rhs.raw)
    }
}

impl<Tag, const SCALE: i64> std::ops::Sub for Decimal<Tag, SCALE> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw - rhs.raw)
    }
}

impl<Tag, const SCALE: i64> std::ops::AddAssign for Decimal<Tag, SCALE> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl<Tag, const SCALE: i64> std::ops::SubAssign for Decimal<Tag, SCALE> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl<Tag, const SCALE: i64> std::ops::Neg for Decimal<Tag, SCALE> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::from_raw(-self.raw)
    }
}

// Serialized as the raw scaled integer rather than a float, so a round
// trip through JSON/TOML never loses the precision the fixed-point
// representation was chosen to guarantee. `Tag` never appears on the wire.

impl<Tag, const SCALE: i64> Serialize for Decimal<Tag, SCALE> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.raw)
    }
}

impl<'de, Tag, const SCALE: i64> Deserialize<'de> for Decimal<Tag, SCALE> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_raw)
    }
}

/// Marker tag for [`Price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTag;
/// Marker tag for [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityTag;
/// Marker tag for [`Volume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeTag;

/// A price, scaled by [`DEFAULT_SCALE`].
pub type Price = Decimal<PriceTag>;
/// A quantity, scaled by [`DEFAULT_SCALE`].
pub type Quantity = Decimal<QuantityTag>;
/// A volume (notional), scaled by [`DEFAULT_SCALE`].
pub type Volume = Decimal<VolumeTag>;

/// Cross-tag multiplication: `price * quantity -> volume`.
///
/// Kept as a free function rather than a trait impl so that same-tag
/// arithmetic remains the only operator-overloaded path, per spec.
#[inline]
pub fn mul_price_quantity(price: Price, quantity: Quantity) -> Volume {
    let product = price.raw() as i128 * quantity.raw() as i128 / DEFAULT_SCALE as i128;
    Volume::from_raw(product as i64)
}
