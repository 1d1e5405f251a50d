//! Module class flags

use std::ops::{BitOr, BitOrAssign};

/// Bit flags describing a module (`FT_MODULE_*`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleFlags(u64);

impl ModuleFlags {
    pub const FONT_DRIVER: Self = Self(0x1);
    pub const RENDERER: Self = Self(0x2);
    pub const HINTER: Self = Self(0x4);
    pub const STYLER: Self = Self(0x8);
    /// The driver supports scalable fonts.
    pub const DRIVER_SCALABLE: Self = Self(0x100);
    /// The driver does not support vector outlines.
    pub const DRIVER_NO_OUTLINES: Self = Self(0x200);
    /// The driver provides its own hinter.
    pub const DRIVER_HAS_HINTER: Self = Self(0x400);
    pub const DRIVER_HINTS_LIGHTLY: Self = Self(0x800);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits_retain(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_font_driver(self) -> bool {
        self.contains(Self::FONT_DRIVER)
    }

    pub const fn is_renderer(self) -> bool {
        self.contains(Self::RENDERER)
    }
}

impl BitOr for ModuleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModuleFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}
