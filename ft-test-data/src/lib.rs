//! test data shared between the ft-view crates.

use ft_types::{IntKind, IntValue, NativeScalar};

pub mod layouts;

/// A convenience type for building native-endian records in memory.
///
/// Values can either be appended (each one aligned to its own width, the
/// way a C compiler would lay out consecutive fields) or written at known
/// offsets into a zeroed buffer.
#[derive(Debug, Clone, Default)]
pub struct NativeBuffer {
    data: Vec<u8>,
}

impl NativeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// A buffer of `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        NativeBuffer { data: vec![0; len] }
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }

    fn align_to(&mut self, align: usize) {
        let padded = self.data.len().div_ceil(align) * align;
        self.data.resize(padded, 0);
    }

    /// Append a scalar, after padding to its natural alignment.
    pub fn push<T: NativeScalar>(mut self, item: T) -> Self {
        self.align_to(T::RAW_BYTE_LEN);
        let offset = self.data.len();
        self.data.resize(offset + T::RAW_BYTE_LEN, 0);
        item.write(&mut self.data[offset..]);
        self
    }

    /// Append an integer of a given kind, after padding to its width.
    pub fn push_int(mut self, kind: IntKind, value: IntValue) -> Self {
        self.align_to(kind.bytes());
        let offset = self.data.len();
        self.data.resize(offset + kind.bytes(), 0);
        self.write_int(offset, kind, value);
        self
    }

    /// Pad the end of the buffer to a multiple of `align`, like the
    /// trailing padding of a struct.
    pub fn finish(mut self, align: usize) -> Self {
        self.align_to(align);
        self
    }

    /// Write an integer of the given kind at `offset`.
    ///
    /// Panics if the value does not fit or the write is out of bounds.
    pub fn write_int(&mut self, offset: usize, kind: IntKind, value: IntValue) {
        let Some(dest) = self.data.get_mut(offset..) else {
            panic!("offset {offset} is past the end of a {} byte buffer", self.data.len());
        };
        if kind.write(value, dest).is_none() {
            panic!("cannot write {value} as {kind} at offset {offset}");
        }
    }
}

/// A distinctive value for the integer field at `index`.
///
/// Values differ between fields and set every byte of the field, so a field
/// read at the wrong offset or width does not decode back to its sentinel.
pub fn int_sentinel(index: usize, kind: IntKind) -> IntValue {
    let n = index as u64 + 1;
    match kind {
        IntKind::I8 => IntValue::Signed(-0x10 - n as i64),
        IntKind::U8 => IntValue::Unsigned(0xa0 + n),
        IntKind::I16 => IntValue::Signed(-0x1200 - n as i64),
        IntKind::U16 => IntValue::Unsigned(0xbe00 + n),
        IntKind::I32 => IntValue::Signed(-0x1234_5600 - n as i64),
        IntKind::U32 => IntValue::Unsigned(0xcafe_f000 + n),
        IntKind::I64 => IntValue::Signed(-0x1234_5678_9a00 - n as i64),
        IntKind::U64 => IntValue::Unsigned(0xfeed_face_cafe_0000 + n),
    }
}

/// A distinctive non-null address for the pointer field at `index`.
///
/// Fits in a 32-bit pointer.
pub fn address_sentinel(index: usize) -> u64 {
    0x4000_0000 + (index as u64 + 1) * 0x100
}

impl std::ops::Deref for NativeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
