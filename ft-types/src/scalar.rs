//! Native-endian integer scalars

/// A trait for integer scalars stored in native memory.
///
/// Native records use the host's byte order and may be read from arbitrary
/// (possibly unaligned) offsets, so all reads and writes go through byte
/// slices.
pub trait NativeScalar: bytemuck::Pod + Sized {
    /// The size of the raw type. Essentially an alias for `std::mem::size_of`.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();

    /// The width and signedness of this type.
    const KIND: IntKind;

    /// Attempt to read a scalar from a slice.
    ///
    /// This will always succeed if `slice.len() == Self::RAW_BYTE_LEN`, and will
    /// always return `None` otherwise.
    fn read(slice: &[u8]) -> Option<Self> {
        (slice.len() == Self::RAW_BYTE_LEN).then(|| bytemuck::pod_read_unaligned(slice))
    }

    /// Write this value into the start of `slice`.
    ///
    /// Returns `None` if the slice is too short.
    fn write(self, slice: &mut [u8]) -> Option<()> {
        slice
            .get_mut(..Self::RAW_BYTE_LEN)?
            .copy_from_slice(bytemuck::bytes_of(&self));
        Some(())
    }

    /// Widen this value.
    fn to_int_value(self) -> IntValue;
}

macro_rules! native_scalar {
    ($ty:ty, $kind:ident, $variant:ident, $wide:ty) => {
        impl NativeScalar for $ty {
            const KIND: IntKind = IntKind::$kind;

            #[inline]
            fn to_int_value(self) -> IntValue {
                IntValue::$variant(self as $wide)
            }
        }
    };
}

native_scalar!(i8, I8, Signed, i64);
native_scalar!(u8, U8, Unsigned, u64);
native_scalar!(i16, I16, Signed, i64);
native_scalar!(u16, U16, Unsigned, u64);
native_scalar!(i32, I32, Signed, i64);
native_scalar!(u32, U32, Unsigned, u64);
native_scalar!(i64, I64, Signed, i64);
native_scalar!(u64, U64, Unsigned, u64);

/// The width and signedness of an integer in native memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntKind {
    /// Returns the kind with the given byte width and signedness.
    ///
    /// Only widths of 1, 2, 4 and 8 bytes exist.
    pub const fn new(bytes: usize, signed: bool) -> Option<Self> {
        Some(match (bytes, signed) {
            (1, true) => IntKind::I8,
            (1, false) => IntKind::U8,
            (2, true) => IntKind::I16,
            (2, false) => IntKind::U16,
            (4, true) => IntKind::I32,
            (4, false) => IntKind::U32,
            (8, true) => IntKind::I64,
            (8, false) => IntKind::U64,
            _ => return None,
        })
    }

    /// Width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            IntKind::I8 | IntKind::U8 => 1,
            IntKind::I16 | IntKind::U16 => 2,
            IntKind::I32 | IntKind::U32 => 4,
            IntKind::I64 | IntKind::U64 => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, IntKind::I8 | IntKind::I16 | IntKind::I32 | IntKind::I64)
    }

    /// Decode an integer of this kind from exactly `self.bytes()` bytes.
    pub fn read(self, bytes: &[u8]) -> Option<IntValue> {
        Some(match self {
            IntKind::I8 => i8::read(bytes)?.to_int_value(),
            IntKind::U8 => u8::read(bytes)?.to_int_value(),
            IntKind::I16 => i16::read(bytes)?.to_int_value(),
            IntKind::U16 => u16::read(bytes)?.to_int_value(),
            IntKind::I32 => i32::read(bytes)?.to_int_value(),
            IntKind::U32 => u32::read(bytes)?.to_int_value(),
            IntKind::I64 => i64::read(bytes)?.to_int_value(),
            IntKind::U64 => u64::read(bytes)?.to_int_value(),
        })
    }

    /// `true` if `value` can be stored in this kind without truncation.
    pub fn fits(self, value: IntValue) -> bool {
        match self {
            IntKind::I8 => value.to_i64().and_then(|v| i8::try_from(v).ok()).is_some(),
            IntKind::U8 => value.to_u64().and_then(|v| u8::try_from(v).ok()).is_some(),
            IntKind::I16 => value.to_i64().and_then(|v| i16::try_from(v).ok()).is_some(),
            IntKind::U16 => value.to_u64().and_then(|v| u16::try_from(v).ok()).is_some(),
            IntKind::I32 => value.to_i64().and_then(|v| i32::try_from(v).ok()).is_some(),
            IntKind::U32 => value.to_u64().and_then(|v| u32::try_from(v).ok()).is_some(),
            IntKind::I64 => value.to_i64().is_some(),
            IntKind::U64 => value.to_u64().is_some(),
        }
    }

    /// Encode `value` into the start of `bytes`.
    ///
    /// Returns `None` if the value does not fit this kind or the slice is
    /// too short; nothing is written in that case.
    pub fn write(self, value: IntValue, bytes: &mut [u8]) -> Option<()> {
        if !self.fits(value) || bytes.len() < self.bytes() {
            return None;
        }
        // fits() has checked the range, so these casts are exact
        match self {
            IntKind::I8 => (value.to_i64()? as i8).write(bytes),
            IntKind::U8 => (value.to_u64()? as u8).write(bytes),
            IntKind::I16 => (value.to_i64()? as i16).write(bytes),
            IntKind::U16 => (value.to_u64()? as u16).write(bytes),
            IntKind::I32 => (value.to_i64()? as i32).write(bytes),
            IntKind::U32 => (value.to_u64()? as u32).write(bytes),
            IntKind::I64 => value.to_i64()?.write(bytes),
            IntKind::U64 => value.to_u64()?.write(bytes),
        }
    }
}

impl std::fmt::Display for IntKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = if self.is_signed() { 'i' } else { 'u' };
        write!(f, "{prefix}{}", self.bytes() * 8)
    }
}

/// An integer decoded from native memory, widened to 64 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntValue {
    Signed(i64),
    Unsigned(u64),
}

impl IntValue {
    /// The value as an `i64`, if it is representable.
    pub fn to_i64(self) -> Option<i64> {
        match self {
            IntValue::Signed(v) => Some(v),
            IntValue::Unsigned(v) => i64::try_from(v).ok(),
        }
    }

    /// The value as a `u64`, if it is representable.
    pub fn to_u64(self) -> Option<u64> {
        match self {
            IntValue::Signed(v) => u64::try_from(v).ok(),
            IntValue::Unsigned(v) => Some(v),
        }
    }
}

impl From<i64> for IntValue {
    fn from(value: i64) -> Self {
        IntValue::Signed(value)
    }
}

impl From<u64> for IntValue {
    fn from(value: u64) -> Self {
        IntValue::Unsigned(value)
    }
}

impl std::fmt::Display for IntValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntValue::Signed(v) => write!(f, "{v}"),
            IntValue::Unsigned(v) => write!(f, "{v}"),
        }
    }
}
