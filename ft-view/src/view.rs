//! Read and write views over a single native record

use std::ffi::{c_void, CStr};
use std::fmt;
use std::ptr::NonNull;

use ft_types::{F26Dot6, Fixed, IntKind, IntValue, NativeScalar};

use crate::callbacks::Callback;
use crate::data::{NativeData, NativeDataMut};
use crate::layout::{FieldLayout, FieldType, RecordLayout, Signature};
use crate::ViewError;

/// Where the bytes behind a view came from.
///
/// Pointers stored in a record are only followed when the record itself was
/// attached from native memory; a view over an arbitrary buffer could
/// otherwise be used to dereference arbitrary addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Provenance {
    Native,
    Buffer,
}

/// A non-owning, lazily decoded view of a native record.
///
/// A view pairs a base address with a [`RecordLayout`]. Nothing is read
/// until a field is requested, and nothing is cached: every accessor reads
/// the underlying memory again, so values observed after the native library
/// mutates the record are always current.
///
/// A view may be detached (a null base address), in which case every read
/// fails with [`ViewError::NullReference`].
#[derive(Clone, Copy)]
pub struct MemoryView<'a> {
    data: Option<NativeData<'a>>,
    layout: &'a RecordLayout,
    provenance: Provenance,
}

impl<'a> MemoryView<'a> {
    /// A view that is not attached to any memory.
    pub fn detached(layout: &'a RecordLayout) -> Self {
        MemoryView {
            data: None,
            layout,
            provenance: Provenance::Buffer,
        }
    }

    /// A view over a buffer holding a copy of a record.
    ///
    /// Only the first `layout.size()` bytes are used. Pointer fields of a view
    /// created this way can be read as addresses but are never followed.
    pub fn new(bytes: &'a [u8], layout: &'a RecordLayout) -> Result<Self, ViewError> {
        let mut view = Self::detached(layout);
        view.attach_bytes(bytes)?;
        Ok(view)
    }

    /// A view of the record at `address`.
    ///
    /// # Safety
    ///
    /// Unless `address` is null, it must point to a live record laid out as
    /// described by `layout`, valid for reads of `layout.size()` bytes for
    /// the lifetime `'a`. The native library may update the record between
    /// reads, but not while one is in progress. Any string pointers stored in
    /// the record must be null or point to nul-terminated strings that live,
    /// unmodified, at least as long.
    pub unsafe fn from_address(address: *const c_void, layout: &'a RecordLayout) -> Self {
        let mut view = Self::detached(layout);
        // SAFETY: same contract as this function
        unsafe { view.attach(address) };
        view
    }

    /// Point this view at a new record.
    ///
    /// Attaching a null address detaches the view.
    ///
    /// # Safety
    ///
    /// See [`MemoryView::from_address`].
    pub unsafe fn attach(&mut self, address: *const c_void) {
        self.provenance = Provenance::Native;
        self.data = NonNull::new(address as *mut u8).map(|ptr| {
            log::trace!("attaching {} view at {ptr:p}", self.layout.name());
            // SAFETY: the caller guarantees that the record is readable
            unsafe { NativeData::from_raw_parts(ptr, self.layout.size()) }
        });
    }

    /// Point this view at a buffer holding a copy of a record.
    pub fn attach_bytes(&mut self, bytes: &'a [u8]) -> Result<(), ViewError> {
        let bytes = bytes
            .get(..self.layout.size())
            .ok_or(ViewError::Truncated {
                needed: self.layout.size(),
                available: bytes.len(),
            })?;
        self.provenance = Provenance::Buffer;
        self.data = Some(NativeData::new(bytes));
        Ok(())
    }

    /// A view over an already bounds-checked region.
    pub(crate) fn from_data(
        data: NativeData<'a>,
        layout: &'a RecordLayout,
        native: bool,
    ) -> Self {
        MemoryView {
            data: Some(data),
            layout,
            provenance: if native {
                Provenance::Native
            } else {
                Provenance::Buffer
            },
        }
    }

    pub fn detach(&mut self) {
        self.data = None;
    }

    pub fn is_attached(&self) -> bool {
        self.data.is_some()
    }

    /// The base address of the record, or zero if detached.
    pub fn address(&self) -> usize {
        self.data.map(|data| data.address()).unwrap_or_default()
    }

    pub fn layout(&self) -> &'a RecordLayout {
        self.layout
    }

    fn data(&self) -> Result<NativeData<'a>, ViewError> {
        self.data.ok_or(ViewError::NullReference)
    }

    /// Read an integer of the given width and signedness at `offset`.
    ///
    /// This is the primitive every other accessor is built on. The read must
    /// lie entirely within the record.
    pub fn read_int(&self, offset: usize, kind: IntKind) -> Result<IntValue, ViewError> {
        self.data()?.read_int_at(offset, kind)
    }

    /// Read a scalar of a concrete type at `offset`.
    pub fn read<T: NativeScalar>(&self, offset: usize) -> Result<T, ViewError> {
        self.data()?.read_at(offset)
    }

    /// Read a fixed-width integer field.
    ///
    /// Fails with [`ViewError::PlatformMismatch`] if the field's resolved
    /// width is not that of `T`, which is how a descriptor/accessor
    /// disagreement about a platform-sensitive field shows up.
    pub fn get<T: NativeScalar>(&self, index: usize) -> Result<T, ViewError> {
        let field = self.layout.field(index)?;
        if matches!(
            field.ty,
            FieldType::Pointer | FieldType::CString | FieldType::Callback(_)
        ) {
            return Err(type_mismatch(field, "integer"));
        }
        if field.size != T::RAW_BYTE_LEN {
            return Err(ViewError::PlatformMismatch {
                field: field.name,
                resolved: field.size,
                requested: T::RAW_BYTE_LEN,
            });
        }
        if field.kind != T::KIND {
            return Err(type_mismatch(field, kind_name(T::KIND)));
        }
        self.read(field.offset)
    }

    /// Read a signed `FT_Long`-style field, widened to 64 bits.
    pub fn read_long(&self, index: usize) -> Result<i64, ViewError> {
        let field = self.layout.field(index)?;
        if field.ty != FieldType::Long {
            return Err(type_mismatch(field, FieldType::Long.name()));
        }
        match self.read_int(field.offset, field.kind)? {
            IntValue::Signed(value) => Ok(value),
            IntValue::Unsigned(_) => Err(type_mismatch(field, FieldType::Long.name())),
        }
    }

    /// Read an unsigned `FT_ULong` field, widened to 64 bits.
    pub fn read_ulong(&self, index: usize) -> Result<u64, ViewError> {
        let field = self.layout.field(index)?;
        if field.ty != FieldType::ULong {
            return Err(type_mismatch(field, FieldType::ULong.name()));
        }
        match self.read_int(field.offset, field.kind)? {
            IntValue::Unsigned(value) => Ok(value),
            IntValue::Signed(_) => Err(type_mismatch(field, FieldType::ULong.name())),
        }
    }

    /// Read an `FT_Fixed` (16.16) field.
    pub fn read_fixed(&self, index: usize) -> Result<Fixed, ViewError> {
        self.read_long(index).map(Fixed::from_bits)
    }

    /// Read an `FT_Pos`/`FT_F26Dot6` (26.6) field.
    pub fn read_f26dot6(&self, index: usize) -> Result<F26Dot6, ViewError> {
        self.read_long(index).map(F26Dot6::from_bits)
    }

    /// Read the address stored in a pointer, string or callback field.
    pub fn read_pointer(&self, index: usize) -> Result<usize, ViewError> {
        let field = self.layout.field(index)?;
        if !matches!(
            field.ty,
            FieldType::Pointer | FieldType::CString | FieldType::Callback(_)
        ) {
            return Err(type_mismatch(field, FieldType::Pointer.name()));
        }
        self.read_address(field)
    }

    fn read_address(&self, field: &FieldLayout) -> Result<usize, ViewError> {
        self.read_int(field.offset, field.kind)?
            .to_u64()
            .and_then(|addr| usize::try_from(addr).ok())
            .ok_or(ViewError::ForeignPointer(field.name))
    }

    fn can_follow_pointers(&self) -> bool {
        self.provenance == Provenance::Native && self.layout.target().has_host_pointers()
    }

    /// Read a string field, returning `None` for a null pointer.
    pub fn read_c_str(&self, index: usize) -> Result<Option<&'a CStr>, ViewError> {
        let field = self.layout.field(index)?;
        if field.ty != FieldType::CString {
            return Err(type_mismatch(field, FieldType::CString.name()));
        }
        self.follow_c_str(field)
    }

    fn follow_c_str(&self, field: &FieldLayout) -> Result<Option<&'a CStr>, ViewError> {
        let address = self.read_address(field)?;
        if address == 0 {
            return Ok(None);
        }
        if !self.can_follow_pointers() {
            return Err(ViewError::ForeignPointer(field.name));
        }
        // SAFETY: the view was attached to native memory, and the attach
        // contract requires string fields to be null or valid C strings.
        Ok(Some(unsafe { CStr::from_ptr(address as *const _) }))
    }

    /// Read a callback field as a typed function pointer.
    ///
    /// The field must have been declared with `F`'s signature. Returns `None`
    /// if the slot is null.
    pub fn read_callback<F: Callback>(&self, index: usize) -> Result<Option<F>, ViewError> {
        let field = self.layout.field(index)?;
        if field.ty != FieldType::Callback(F::SIGNATURE) {
            return Err(type_mismatch(field, F::SIGNATURE.c_name()));
        }
        if !self.layout.target().has_host_pointers() {
            return Err(ViewError::ForeignPointer(field.name));
        }
        let address = self.read_address(field)?;
        // SAFETY: the slot was declared with this signature. Producing the
        // pointer is fine; calling it is unsafe and left to the caller.
        Ok(unsafe { F::from_address(address) })
    }

    /// Decode any field, using the type from the layout.
    pub fn field(&self, index: usize) -> Result<FieldValue<'a>, ViewError> {
        let field = self.layout.field(index)?;
        Ok(match field.ty {
            FieldType::Pointer => FieldValue::Pointer(self.read_address(field)?),
            FieldType::CString if self.can_follow_pointers() => {
                FieldValue::String(self.follow_c_str(field)?)
            }
            FieldType::CString => FieldValue::Pointer(self.read_address(field)?),
            FieldType::Callback(signature) => FieldValue::Callback {
                signature,
                address: self.read_address(field)?,
            },
            _ => FieldValue::Int(self.read_int(field.offset, field.kind)?),
        })
    }

    /// Decode a field by name.
    pub fn field_by_name(&self, name: &str) -> Result<FieldValue<'a>, ViewError> {
        let (index, _) = self.layout.field_by_name(name)?;
        self.field(index)
    }

    /// Iterate over every field and its current value.
    pub fn fields(
        &self,
    ) -> impl Iterator<Item = (&'static str, Result<FieldValue<'a>, ViewError>)> + '_ {
        self.layout
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name, self.field(index)))
    }
}

impl fmt::Debug for MemoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_attached() {
            return write!(f, "{} (detached)", self.layout.name());
        }
        let mut debug = f.debug_struct(self.layout.name());
        for (name, value) in self.fields() {
            match value {
                Ok(value) => debug.field(name, &value),
                Err(err) => debug.field(name, &err),
            };
        }
        debug.finish()
    }
}

/// A decoded field value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Any integer field, including the platform-sensitive ones.
    Int(IntValue),
    /// A data pointer, or a string pointer that cannot be followed.
    Pointer(usize),
    /// A followed string pointer; `None` if it was null.
    String(Option<&'a CStr>),
    Callback { signature: Signature, address: usize },
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Pointer(address) => write!(f, "{address:#x}"),
            FieldValue::String(Some(s)) => write!(f, "{s:?}"),
            FieldValue::String(None) => f.write_str("NULL"),
            FieldValue::Callback { address: 0, .. } => f.write_str("NULL"),
            FieldValue::Callback { signature, address } => {
                write!(f, "{}@{address:#x}", signature.c_name())
            }
        }
    }
}

fn type_mismatch(field: &FieldLayout, expected: &'static str) -> ViewError {
    ViewError::TypeMismatch {
        field: field.name,
        expected,
        found: field.ty.name(),
    }
}

fn kind_name(kind: IntKind) -> &'static str {
    match kind {
        IntKind::I8 => "i8",
        IntKind::U8 => "u8",
        IntKind::I16 => "i16",
        IntKind::U16 => "u16",
        IntKind::I32 => "i32",
        IntKind::U32 => "u32",
        IntKind::I64 => "i64",
        IntKind::U64 => "u64",
    }
}

/// A writable view of a native record.
///
/// Used for the records that are filled in on the Rust side and handed to
/// the native library, such as size requests and outline callback tables.
/// Unlike [`MemoryView`] a write view is never detached.
pub struct MemoryViewMut<'a> {
    data: NativeDataMut<'a>,
    layout: &'a RecordLayout,
    provenance: Provenance,
}

impl<'a> MemoryViewMut<'a> {
    /// A write view over a buffer; only the first `layout.size()` bytes are used.
    pub fn new(bytes: &'a mut [u8], layout: &'a RecordLayout) -> Result<Self, ViewError> {
        let available = bytes.len();
        let bytes = bytes.get_mut(..layout.size()).ok_or(ViewError::Truncated {
            needed: layout.size(),
            available,
        })?;
        Ok(MemoryViewMut {
            data: NativeDataMut::new(bytes),
            layout,
            provenance: Provenance::Buffer,
        })
    }

    /// A write view of the record at `address`.
    ///
    /// # Safety
    ///
    /// `address` must be null or point to memory laid out as described by
    /// `layout`, valid for reads and writes of `layout.size()` bytes for the
    /// lifetime `'a`, with no other live references to it.
    pub unsafe fn from_address(
        address: *mut c_void,
        layout: &'a RecordLayout,
    ) -> Result<Self, ViewError> {
        let ptr = NonNull::new(address as *mut u8).ok_or(ViewError::NullReference)?;
        log::trace!("attaching writable {} view at {ptr:p}", layout.name());
        Ok(MemoryViewMut {
            // SAFETY: upheld by the caller
            data: unsafe { NativeDataMut::from_raw_parts(ptr, layout.size()) },
            layout,
            provenance: Provenance::Native,
        })
    }

    pub fn layout(&self) -> &'a RecordLayout {
        self.layout
    }

    /// A read view of the same record.
    pub fn as_view(&self) -> MemoryView<'_> {
        MemoryView {
            data: Some(self.data.as_data()),
            layout: self.layout,
            provenance: self.provenance,
        }
    }

    /// Write an integer of the given width and signedness at `offset`.
    pub fn write_int(
        &mut self,
        offset: usize,
        kind: IntKind,
        value: IntValue,
    ) -> Result<(), ViewError> {
        self.data.write_int_at(offset, kind, value)
    }

    pub fn write<T: NativeScalar>(&mut self, offset: usize, value: T) -> Result<(), ViewError> {
        self.data.write_at(offset, value)
    }

    /// Write a fixed-width integer field.
    pub fn set<T: NativeScalar>(&mut self, index: usize, value: T) -> Result<(), ViewError> {
        let field = *self.layout.field(index)?;
        if field.size != T::RAW_BYTE_LEN {
            return Err(ViewError::PlatformMismatch {
                field: field.name,
                resolved: field.size,
                requested: T::RAW_BYTE_LEN,
            });
        }
        if matches!(
            field.ty,
            FieldType::Pointer | FieldType::CString | FieldType::Callback(_)
        ) {
            return Err(type_mismatch(&field, "integer"));
        }
        if field.kind != T::KIND {
            return Err(type_mismatch(&field, kind_name(T::KIND)));
        }
        self.write(field.offset, value)
    }

    /// Write a signed `FT_Long`-style field.
    ///
    /// Fails with [`ViewError::Overflow`] if the value does not fit the
    /// field's width on this target.
    pub fn set_long(&mut self, index: usize, value: i64) -> Result<(), ViewError> {
        let field = *self.layout.field(index)?;
        if field.ty != FieldType::Long {
            return Err(type_mismatch(&field, FieldType::Long.name()));
        }
        self.write_int(field.offset, field.kind, IntValue::Signed(value))
    }

    /// Write an unsigned `FT_ULong` field.
    pub fn set_ulong(&mut self, index: usize, value: u64) -> Result<(), ViewError> {
        let field = *self.layout.field(index)?;
        if field.ty != FieldType::ULong {
            return Err(type_mismatch(&field, FieldType::ULong.name()));
        }
        self.write_int(field.offset, field.kind, IntValue::Unsigned(value))
    }

    pub fn set_fixed(&mut self, index: usize, value: Fixed) -> Result<(), ViewError> {
        self.set_long(index, value.to_bits())
    }

    pub fn set_f26dot6(&mut self, index: usize, value: F26Dot6) -> Result<(), ViewError> {
        self.set_long(index, value.to_bits())
    }

    /// Store a raw address in a data pointer field.
    pub fn set_pointer(&mut self, index: usize, address: usize) -> Result<(), ViewError> {
        let field = *self.layout.field(index)?;
        if field.ty != FieldType::Pointer {
            return Err(type_mismatch(&field, FieldType::Pointer.name()));
        }
        self.write_int(field.offset, field.kind, IntValue::Unsigned(address as u64))
    }

    /// Store a function pointer (or null) in a callback field.
    pub fn set_callback<F: Callback>(
        &mut self,
        index: usize,
        callback: Option<F>,
    ) -> Result<(), ViewError> {
        let field = *self.layout.field(index)?;
        if field.ty != FieldType::Callback(F::SIGNATURE) {
            return Err(type_mismatch(&field, F::SIGNATURE.c_name()));
        }
        if !self.layout.target().has_host_pointers() {
            return Err(ViewError::ForeignPointer(field.name));
        }
        let address = callback.map(F::to_address).unwrap_or_default();
        self.write_int(field.offset, field.kind, IntValue::Unsigned(address as u64))
    }
}

impl fmt::Debug for MemoryViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_view().fmt(f)
    }
}
