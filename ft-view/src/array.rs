//! Contiguous arrays of native records

use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::data::NativeData;
use crate::records::NativeRecord;
use crate::{MemoryView, ViewError};

/// A view of `len` consecutive records of type `R`.
///
/// The stride is the record's size under the process target, trailing
/// padding included, which is what native code uses for `T array[n]`.
#[derive(Clone, Copy)]
pub struct RecordArray<'a, R> {
    data: Option<NativeData<'a>>,
    len: usize,
    native: bool,
    _record: PhantomData<R>,
}

impl<'a, R: NativeRecord<'a>> RecordArray<'a, R> {
    /// An array over a buffer holding copies of the records.
    pub fn new(bytes: &'a [u8], len: usize) -> Result<Self, ViewError> {
        let needed = Self::stride()
            .checked_mul(len)
            .ok_or(ViewError::Truncated {
                needed: usize::MAX,
                available: bytes.len(),
            })?;
        let bytes = bytes.get(..needed).ok_or(ViewError::Truncated {
            needed,
            available: bytes.len(),
        })?;
        Ok(RecordArray {
            data: Some(NativeData::new(bytes)),
            len,
            native: false,
            _record: PhantomData,
        })
    }

    /// An array of `len` records starting at `address`.
    ///
    /// A null address, or a length whose total size overflows, gives an
    /// empty array.
    ///
    /// # Safety
    ///
    /// Unless `address` is null, every record in the array must satisfy the
    /// requirements of [`MemoryView::from_address`].
    pub unsafe fn from_address(address: *const c_void, len: usize) -> Self {
        let size = Self::stride().checked_mul(len);
        let data = NonNull::new(address as *mut u8).zip(size).map(|(ptr, size)| {
            // SAFETY: the caller guarantees that `len` records are readable
            unsafe { NativeData::from_raw_parts(ptr, size) }
        });
        let len = if data.is_some() { len } else { 0 };
        RecordArray {
            data,
            len,
            native: true,
            _record: PhantomData,
        }
    }

    /// The distance in bytes between consecutive records.
    pub fn stride() -> usize {
        R::layout().size()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The record at `index`.
    pub fn get(&self, index: usize) -> Result<R, ViewError> {
        let data = self.data.ok_or(ViewError::NullReference)?;
        let stride = Self::stride();
        let start = index.saturating_mul(stride);
        let bytes = data
            .slice(start..start.saturating_add(stride))
            .filter(|_| index < self.len)
            .ok_or(ViewError::OutOfBounds {
                offset: start,
                width: stride,
                size: data.len(),
            })?;
        R::from_view(MemoryView::from_data(bytes, R::layout(), self.native))
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<R, ViewError>> + use<'_, 'a, R> {
        (0..self.len).map(|index| self.get(index))
    }
}
