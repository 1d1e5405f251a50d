//! raw native memory

use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};
use std::ptr::NonNull;

use ft_types::{IntKind, IntValue, NativeScalar};

use crate::ViewError;

/// The widest integer a field can hold.
const MAX_INT_BYTES: usize = 8;

/// A reference to a region of native memory.
///
/// Provides bounds checked, alignment-agnostic reads of native-endian
/// scalars. The region is never borrowed as a Rust slice: every read copies
/// the bytes out of memory at the time of the call, so a record that the
/// native library updates in place is observed as it is now.
#[derive(Clone, Copy)]
pub struct NativeData<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _bytes: PhantomData<&'a [u8]>,
}

impl<'a> NativeData<'a> {
    /// Create a new `NativeData` over these bytes.
    pub fn new(bytes: &'a [u8]) -> Self {
        NativeData {
            ptr: NonNull::from(bytes).cast(),
            len: bytes.len(),
            _bytes: PhantomData,
        }
    }

    /// Refer to `len` bytes of native memory starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` bytes for the lifetime `'a`.
    /// The memory may be modified between reads, for example by the native
    /// library during a call, but not concurrently with one.
    pub unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize) -> Self {
        NativeData {
            ptr,
            len,
            _bytes: PhantomData,
        }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The address of the first byte.
    pub fn address(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<NativeData<'a>> {
        let start = match range.start_bound() {
            Bound::Included(start) => *start,
            Bound::Excluded(start) => start.checked_add(1)?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(end) => end.checked_add(1)?,
            Bound::Excluded(end) => *end,
            Bound::Unbounded => self.len,
        };
        if start > end || end > self.len {
            return None;
        }
        Some(NativeData {
            // SAFETY: `start` is within the region
            ptr: unsafe { self.ptr.add(start) },
            len: end - start,
            _bytes: PhantomData,
        })
    }

    /// The address of `width` readable bytes at `offset`.
    fn checked_ptr(&self, offset: usize, width: usize) -> Result<*const u8, ViewError> {
        match offset.checked_add(width) {
            // SAFETY: `offset + width` is within the region
            Some(end) if end <= self.len => Ok(unsafe { self.ptr.as_ptr().add(offset) }),
            _ => Err(self.out_of_bounds(offset, width)),
        }
    }

    pub fn read_at<T: NativeScalar>(&self, offset: usize) -> Result<T, ViewError> {
        let ptr = self.checked_ptr(offset, T::RAW_BYTE_LEN)?;
        // SAFETY: the bytes are in bounds and any bit pattern is a valid `T`
        Ok(unsafe { ptr.cast::<T>().read_unaligned() })
    }

    /// Read an integer of the given width and signedness at `offset`.
    pub fn read_int_at(&self, offset: usize, kind: IntKind) -> Result<IntValue, ViewError> {
        let width = kind.bytes();
        let ptr = self.checked_ptr(offset, width)?;
        let mut raw = [0u8; MAX_INT_BYTES];
        let raw = raw
            .get_mut(..width)
            .ok_or_else(|| self.out_of_bounds(offset, width))?;
        // SAFETY: `width` bytes at `ptr` are in bounds and `raw` is a local
        unsafe { std::ptr::copy_nonoverlapping(ptr, raw.as_mut_ptr(), width) };
        kind.read(raw).ok_or_else(|| self.out_of_bounds(offset, width))
    }

    fn out_of_bounds(&self, offset: usize, width: usize) -> ViewError {
        ViewError::OutOfBounds {
            offset,
            width,
            size: self.len,
        }
    }
}

impl Default for NativeData<'_> {
    fn default() -> Self {
        NativeData::new(&[])
    }
}

impl std::fmt::Debug for NativeData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeData")
            .field("address", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

/// A mutable reference to a region of native memory.
#[derive(Debug)]
pub struct NativeDataMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> NativeDataMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        NativeDataMut { bytes }
    }

    /// Mutably borrow `len` bytes of native memory starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes for the
    /// lifetime `'a`, and no other reference to that memory may be used
    /// during that lifetime.
    pub unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize) -> Self {
        // SAFETY: upheld by the caller
        NativeDataMut {
            bytes: unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) },
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A read-only view of the same bytes.
    pub fn as_data(&self) -> NativeData<'_> {
        NativeData::new(self.bytes)
    }

    pub fn write_at<T: NativeScalar>(&mut self, offset: usize, value: T) -> Result<(), ViewError> {
        let size = self.bytes.len();
        self.bytes
            .get_mut(offset..offset.saturating_add(T::RAW_BYTE_LEN))
            .and_then(|bytes| value.write(bytes))
            .ok_or_else(|| ViewError::OutOfBounds {
                offset,
                width: T::RAW_BYTE_LEN,
                size,
            })
    }

    /// Write an integer of the given width and signedness at `offset`.
    pub fn write_int_at(
        &mut self,
        offset: usize,
        kind: IntKind,
        value: IntValue,
    ) -> Result<(), ViewError> {
        if !kind.fits(value) {
            return Err(ViewError::Overflow {
                value: value.to_string(),
                kind,
            });
        }
        let size = self.bytes.len();
        self.bytes
            .get_mut(offset..offset.saturating_add(kind.bytes()))
            .and_then(|bytes| kind.write(value, bytes))
            .ok_or_else(|| ViewError::OutOfBounds {
                offset,
                width: kind.bytes(),
                size,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_in_and_out_of_bounds() {
        let bytes = [1u8, 0, 0, 0, 2, 0];
        let data = NativeData::new(&bytes);
        assert_eq!(data.read_at::<u8>(4), Ok(2));
        assert_eq!(
            data.read_at::<u32>(4),
            Err(ViewError::OutOfBounds {
                offset: 4,
                width: 4,
                size: 6
            })
        );
        assert!(data.read_int_at(usize::MAX, IntKind::U16).is_err());
    }

    #[test]
    fn slicing() {
        let bytes = [0u8, 1, 2, 3, 4];
        let data = NativeData::new(&bytes);
        let middle = data.slice(1..3).unwrap();
        assert_eq!(middle.len(), 2);
        assert_eq!(middle.read_at::<u8>(1), Ok(2));
        assert!(middle.read_at::<u8>(2).is_err());
        assert_eq!(data.slice(3..).unwrap().read_at::<u8>(0), Ok(3));
        assert!(data.slice(4..9).is_none());
        assert!(data.slice(5..).unwrap().is_empty());
    }

    #[test]
    fn every_read_sees_current_memory() {
        let mut record = Box::new([16u8, 0, 0, 0]);
        let ptr = NonNull::new(record.as_mut_ptr()).unwrap();
        let data = unsafe { NativeData::from_raw_parts(ptr, 4) };
        assert_eq!(data.read_at::<u16>(0), Ok(u16::from_ne_bytes([16, 0])));
        // a native call rewrites the record in place
        unsafe { ptr.as_ptr().write(99) };
        assert_eq!(data.read_at::<u16>(0), Ok(u16::from_ne_bytes([99, 0])));
        assert_eq!(
            data.read_int_at(0, IntKind::U8),
            Ok(IntValue::Unsigned(99))
        );
    }

    #[test]
    fn write_then_read() {
        let mut bytes = [0u8; 8];
        let mut data = NativeDataMut::new(&mut bytes);
        data.write_at(2, -3i16).unwrap();
        data.write_int_at(4, IntKind::U32, IntValue::Unsigned(0xdead_beef))
            .unwrap();
        assert_eq!(data.as_data().read_at::<i16>(2), Ok(-3));
        assert_eq!(
            data.as_data().read_int_at(4, IntKind::U32),
            Ok(IntValue::Unsigned(0xdead_beef))
        );
        assert!(matches!(
            data.write_int_at(0, IntKind::I8, IntValue::Signed(300)),
            Err(ViewError::Overflow { .. })
        ));
        assert!(matches!(
            data.write_at(6, 1u32),
            Err(ViewError::OutOfBounds { .. })
        ));
    }
}
