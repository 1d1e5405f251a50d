//! fixed-point numerical types

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// shared between Fixed and F26Dot6
//
// Both are stored in platform `long` fields, so the backing integer is
// always 64 bits wide; values read from 32-bit fields are sign extended.
macro_rules! fixed_impl {
    ($name:ident, $fract_bits:literal) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[doc = concat!("Signed fixed point number with ", stringify!($fract_bits), " bits of fraction.")]
        pub struct $name(i64);

        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(i64::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(i64::MAX);

            /// This type's smallest representable value
            pub const EPSILON: Self = Self(1);

            /// Representation of 0.0.
            pub const ZERO: Self = Self(0);

            /// Representation of 1.0.
            pub const ONE: Self = Self(1 << $fract_bits);

            const INT_MASK: i64 = !0 << $fract_bits;
            const ROUND: i64 = 1 << ($fract_bits - 1);
            const FRACT_BITS: u32 = $fract_bits;

            /// Creates a new fixed point value from the underlying bit representation.
            #[inline(always)]
            pub const fn from_bits(bits: i64) -> Self {
                Self(bits)
            }

            /// Returns the underlying bit representation of the value.
            #[inline(always)]
            pub const fn to_bits(self) -> i64 {
                self.0
            }

            /// Creates a fixed point value from an integer.
            pub const fn from_i32(x: i32) -> Self {
                Self((x as i64) << Self::FRACT_BITS)
            }

            /// Returns the nearest integer value.
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// Returns the absolute value of the number.
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Returns the largest integer less than or equal to the number.
            pub fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the smallest integer greater than or equal to the number.
            pub fn ceil(self) -> Self {
                Self(self.0.wrapping_add(!Self::INT_MASK) & Self::INT_MASK)
            }

            /// Returns the fractional part of the number.
            pub fn fract(self) -> Self {
                Self(self.0 - self.floor().0)
            }

            /// Returns the value rounded to the nearest integer.
            pub fn to_i64(self) -> i64 {
                self.round().0 >> Self::FRACT_BITS
            }

            #[doc = concat!("Creates a ", stringify!($name), " from an f64.")]
            ///
            /// This operation is lossy; the float will be rounded to the nearest
            /// representable value.
            pub fn from_f64(x: f64) -> Self {
                Self((x * Self::ONE.0 as f64).round() as i64)
            }

            /// Returns the value as an f64.
            pub fn to_f64(self) -> f64 {
                self.0 as f64 / Self::ONE.0 as f64
            }

            /// Wrapping addition.
            pub fn wrapping_add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }

            /// Saturating addition.
            pub fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }

            /// Wrapping substitution.
            pub fn wrapping_sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }

            /// Saturating substitution.
            pub fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                // same overflow semantics as std: panic in debug, wrap in release
                Self(self.0 + other.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self(self.0 - other.0)
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }
    };
}

fixed_impl!(Fixed, 16);
fixed_impl!(F26Dot6, 6);

impl Fixed {
    /// Multiplies two 16.16 values, rounding like `FT_MulFix`.
    pub fn mul_fix(self, other: Self) -> Self {
        let product = self.0 as i128 * other.0 as i128;
        let rounded = (product.abs() + 0x8000) >> 16;
        let signed = if product < 0 { -rounded } else { rounded };
        Self(signed as i64)
    }

    /// Scales a value in font units, producing 26.6 pixels.
    ///
    /// This is how the `x_scale`/`y_scale` fields of the size metrics are
    /// applied to unscaled outline or metric values.
    pub fn scale(self, font_units: i64) -> F26Dot6 {
        F26Dot6(Fixed(font_units).mul_fix(self).0)
    }
}

impl F26Dot6 {
    /// Converts to a 16.16 value.
    pub fn to_fixed(self) -> Fixed {
        Fixed(self.0 << 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_floats() {
        assert_eq!(Fixed(0x7fff_0000), Fixed::from_f64(32767.));
        assert_eq!(Fixed(0x7000_0001), Fixed::from_f64(28672.00001525879));
        assert_eq!(Fixed(0x0001_0000), Fixed::from_f64(1.0));
        assert_eq!(Fixed(0x0000_0000), Fixed::from_f64(0.0));
        assert_eq!(Fixed(-1), Fixed::from_f64(-0.000015259));
        assert_eq!(Fixed::from_bits(0x0002_8000).to_f64(), 2.5);
    }

    #[test]
    fn f26dot6_floats() {
        assert_eq!(F26Dot6::from_f64(1.0), F26Dot6::ONE);
        assert_eq!(F26Dot6::from_bits(96).to_f64(), 1.5);
        assert_eq!(F26Dot6::from_bits(-32).to_f64(), -0.5);
        assert_eq!(F26Dot6::from_i32(12).to_bits(), 768);
    }

    #[test]
    fn round_fixed() {
        assert_eq!(Fixed(0x0001_7FFE).round(), Fixed(0x0001_0000));
        assert_eq!(Fixed(0x0001_7FFF).round(), Fixed(0x0001_0000));
        assert_eq!(Fixed(0x0001_8000).round(), Fixed(0x0002_0000));
    }

    #[test]
    fn floor_ceil_26dot6() {
        let v = F26Dot6::from_bits(100);
        assert_eq!(v.floor().to_bits(), 64);
        assert_eq!(v.ceil().to_bits(), 128);
        assert_eq!(v.fract().to_bits(), 36);
        assert_eq!((-v).floor().to_bits(), -128);
        assert_eq!(v.to_i64(), 2);
    }

    #[test]
    fn mul_fix() {
        let half = Fixed::from_f64(0.5);
        assert_eq!(Fixed::from_i32(3).mul_fix(half), Fixed::from_f64(1.5));
        assert_eq!(Fixed::from_i32(-3).mul_fix(half), Fixed::from_f64(-1.5));
    }

    #[test]
    fn scale_font_units() {
        // 2048 upem at 16ppem: scale = 16 * 64 / 2048 in 16.16
        let scale = Fixed::from_bits(0x8000);
        assert_eq!(scale.scale(2048).to_bits(), 1024);
        assert_eq!(scale.scale(2048).to_f64(), 16.0);
    }

    #[test]
    fn to_fixed() {
        assert_eq!(F26Dot6::from_f64(2.25).to_fixed(), Fixed::from_f64(2.25));
    }
}
