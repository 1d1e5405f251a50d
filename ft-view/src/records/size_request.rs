//! `FT_Size_RequestRec`

use std::ffi::c_void;

use super::native_record;
use crate::layout::FieldType;
use crate::{MemoryViewMut, NativeRecord, ViewError};

/// How the width and height of a size request are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeRequestType {
    /// The nominal size: the EM square.
    Nominal,
    /// The real dimension: ascender plus descender.
    RealDim,
    /// The font bounding box.
    Bbox,
    /// The maximum advance width and ascender plus descender.
    Cell,
    /// Width and height are 16.16 scale values.
    Scales,
    /// A value this crate does not know about.
    Unknown(i32),
}

impl SizeRequestType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => SizeRequestType::Nominal,
            1 => SizeRequestType::RealDim,
            2 => SizeRequestType::Bbox,
            3 => SizeRequestType::Cell,
            4 => SizeRequestType::Scales,
            _ => SizeRequestType::Unknown(raw),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            SizeRequestType::Nominal => 0,
            SizeRequestType::RealDim => 1,
            SizeRequestType::Bbox => 2,
            SizeRequestType::Cell => 3,
            SizeRequestType::Scales => 4,
            SizeRequestType::Unknown(raw) => raw,
        }
    }
}

native_record! {
    /// A request to scale a face to a given size.
    ///
    /// Width and height are 26.6 values, except for
    /// [`SizeRequestType::Scales`]. A resolution of zero means 72 dpi.
    SizeRequest, SIZE_REQUEST = "FT_Size_RequestRec" {
        request_type as "type": FieldType::I32,
        width: FieldType::Long,
        height: FieldType::Long,
        hori_resolution: FieldType::U32,
        vert_resolution: FieldType::U32,
    }
}

impl SizeRequest<'_> {
    pub fn request_type(&self) -> Result<SizeRequestType, ViewError> {
        self.0
            .get(Field::request_type as usize)
            .map(SizeRequestType::from_raw)
    }

    pub fn width(&self) -> Result<i64, ViewError> {
        self.0.read_long(Field::width as usize)
    }

    pub fn height(&self) -> Result<i64, ViewError> {
        self.0.read_long(Field::height as usize)
    }

    pub fn hori_resolution(&self) -> Result<u32, ViewError> {
        self.0.get(Field::hori_resolution as usize)
    }

    pub fn vert_resolution(&self) -> Result<u32, ViewError> {
        self.0.get(Field::vert_resolution as usize)
    }
}

/// A writable size request, filled in before calling `FT_Request_Size`.
pub struct SizeRequestMut<'a>(MemoryViewMut<'a>);

impl<'a> SizeRequestMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Result<Self, ViewError> {
        MemoryViewMut::new(bytes, SizeRequest::layout()).map(Self)
    }

    /// A write view of the record at `address`.
    ///
    /// # Safety
    ///
    /// See [`MemoryViewMut::from_address`].
    pub unsafe fn from_address(address: *mut c_void) -> Result<Self, ViewError> {
        // SAFETY: upheld by the caller
        unsafe { MemoryViewMut::from_address(address, SizeRequest::layout()) }.map(Self)
    }

    pub fn as_request(&self) -> SizeRequest<'_> {
        SizeRequest(self.0.as_view())
    }

    pub fn set_request_type(&mut self, ty: SizeRequestType) -> Result<(), ViewError> {
        self.0.set(Field::request_type as usize, ty.to_raw())
    }

    /// Set the width; fails with [`ViewError::Overflow`] if it does not fit
    /// in an `FT_Long` on this target.
    pub fn set_width(&mut self, width: i64) -> Result<(), ViewError> {
        self.0.set_long(Field::width as usize, width)
    }

    pub fn set_height(&mut self, height: i64) -> Result<(), ViewError> {
        self.0.set_long(Field::height as usize, height)
    }

    pub fn set_hori_resolution(&mut self, dpi: u32) -> Result<(), ViewError> {
        self.0.set(Field::hori_resolution as usize, dpi)
    }

    pub fn set_vert_resolution(&mut self, dpi: u32) -> Result<(), ViewError> {
        self.0.set(Field::vert_resolution as usize, dpi)
    }
}
