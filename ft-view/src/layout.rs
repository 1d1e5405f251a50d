//! Record descriptors and the layout engine
//!
//! A [`RecordDescriptor`] lists the fields of a native struct in declaration
//! order, without any offsets. Resolving it against a [`Target`] produces a
//! [`RecordLayout`] with the offsets and sizes the C compiler would have
//! chosen for that data model.

use std::ops::Range;

use ft_types::{IntKind, Target};

use crate::ViewError;

/// The shape of a native callback stored in a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `FT_Module_Constructor`: `(module) -> error`
    ModuleConstructor,
    /// `FT_Module_Destructor`: `(module)`
    ModuleDestructor,
    /// `FT_Module_Requester`: `(module, name) -> interface`
    ModuleRequester,
    /// `FT_Outline_MoveToFunc`: `(to, user) -> status`
    MoveTo,
    /// `FT_Outline_LineToFunc`: `(to, user) -> status`
    LineTo,
    /// `FT_Outline_ConicToFunc`: `(control, to, user) -> status`
    ConicTo,
    /// `FT_Outline_CubicToFunc`: `(control1, control2, to, user) -> status`
    CubicTo,
}

impl Signature {
    /// The name of the FreeType typedef for this signature.
    pub const fn c_name(self) -> &'static str {
        match self {
            Signature::ModuleConstructor => "FT_Module_Constructor",
            Signature::ModuleDestructor => "FT_Module_Destructor",
            Signature::ModuleRequester => "FT_Module_Requester",
            Signature::MoveTo => "FT_Outline_MoveToFunc",
            Signature::LineTo => "FT_Outline_LineToFunc",
            Signature::ConicTo => "FT_Outline_ConicToFunc",
            Signature::CubicTo => "FT_Outline_CubicToFunc",
        }
    }
}

/// The type of a single field in a native record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// `FT_Long`, `FT_Pos`, `FT_Fixed` or `FT_F26Dot6`: a signed C `long`.
    Long,
    /// `FT_ULong`: an unsigned C `long`.
    ULong,
    /// An untyped data pointer.
    Pointer,
    /// A pointer to a nul-terminated string.
    CString,
    /// A function pointer with a known signature.
    Callback(Signature),
}

impl FieldType {
    /// The size of this field in bytes, under `target`.
    pub const fn size(self, target: Target) -> usize {
        match self {
            FieldType::I8 | FieldType::U8 => 1,
            FieldType::I16 | FieldType::U16 => 2,
            FieldType::I32 | FieldType::U32 => 4,
            FieldType::I64 | FieldType::U64 => 8,
            FieldType::Long | FieldType::ULong => target.long_bytes(),
            FieldType::Pointer | FieldType::CString | FieldType::Callback(_) => {
                target.pointer_bytes()
            }
        }
    }

    /// The alignment of this field in bytes, under `target`.
    ///
    /// Every field is aligned to its own width.
    pub const fn align(self, target: Target) -> usize {
        self.size(target)
    }

    /// `true` for the fields whose width depends on the target's long model.
    pub const fn is_platform_sensitive(self) -> bool {
        matches!(self, FieldType::Long | FieldType::ULong)
    }

    /// The integer representation of this field under `target`.
    ///
    /// Pointers are reported as unsigned integers of pointer width.
    pub const fn int_kind(self, target: Target) -> IntKind {
        let (bytes, signed) = match self {
            FieldType::I8 => (1, true),
            FieldType::U8 => (1, false),
            FieldType::I16 => (2, true),
            FieldType::U16 => (2, false),
            FieldType::I32 => (4, true),
            FieldType::U32 => (4, false),
            FieldType::I64 => (8, true),
            FieldType::U64 => (8, false),
            FieldType::Long => (target.long_bytes(), true),
            FieldType::ULong => (target.long_bytes(), false),
            FieldType::Pointer | FieldType::CString | FieldType::Callback(_) => {
                (target.pointer_bytes(), false)
            }
        };
        match IntKind::new(bytes, signed) {
            Some(kind) => kind,
            // long and pointer sizes are always 4 or 8
            None => IntKind::U64,
        }
    }

    /// A short human readable name, used in errors.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::I8 => "i8",
            FieldType::U8 => "u8",
            FieldType::I16 => "i16",
            FieldType::U16 => "u16",
            FieldType::I32 => "i32",
            FieldType::U32 => "u32",
            FieldType::I64 => "i64",
            FieldType::U64 => "u64",
            FieldType::Long => "FT_Long",
            FieldType::ULong => "FT_ULong",
            FieldType::Pointer => "pointer",
            FieldType::CString => "string",
            FieldType::Callback(sig) => sig.c_name(),
        }
    }
}

/// A single named field in a [`RecordDescriptor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        FieldDef { name, ty }
    }
}

/// The declaration of a native struct: its fields, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: &'static [FieldDef],
}

impl RecordDescriptor {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        RecordDescriptor { name, fields }
    }

    /// The C name of the record.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    /// The index of the field with this name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Compute the concrete layout of this record for `target`.
    pub fn layout(&self, target: Target) -> RecordLayout {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut pos = 0;
        let mut align = 1;
        for def in self.fields {
            let size = def.ty.size(target);
            let field_align = def.ty.align(target);
            pos = align_up(pos, field_align);
            fields.push(FieldLayout {
                name: def.name,
                ty: def.ty,
                kind: def.ty.int_kind(target),
                offset: pos,
                size,
            });
            pos += size;
            align = align.max(field_align);
        }
        RecordLayout {
            name: self.name,
            target,
            fields,
            size: align_up(pos, align),
            align,
        }
    }

    /// The size of the record for `target`, including trailing padding.
    ///
    /// This is the stride between consecutive records in a native array.
    pub fn size_of(&self, target: Target) -> usize {
        self.layout(target).size()
    }
}

/// The size of a record under the process-wide target.
///
/// See [`ft_types::process_target`].
pub fn size_of(descriptor: &RecordDescriptor) -> usize {
    descriptor.size_of(ft_types::process_target())
}

/// A field with its resolved position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub ty: FieldType,
    /// The integer representation of the field's bytes.
    pub kind: IntKind,
    pub offset: usize,
    pub size: usize,
}

impl FieldLayout {
    /// The byte range of this field within the record.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// A [`RecordDescriptor`] resolved against a [`Target`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    name: &'static str,
    target: Target,
    fields: Vec<FieldLayout>,
    size: usize,
    align: usize,
}

impl RecordLayout {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The target this layout was computed for.
    pub fn target(&self) -> Target {
        self.target
    }

    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Total size in bytes, including trailing padding.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The alignment of the record: that of its most aligned field.
    pub fn align(&self) -> usize {
        self.align
    }

    /// `true` if both layouts describe the same record with every field at the
    /// same offset and width, whichever targets they were computed for.
    pub fn same_shape(&self, other: &RecordLayout) -> bool {
        self.name == other.name && self.size == other.size && self.fields == other.fields
    }

    pub fn field(&self, index: usize) -> Result<&FieldLayout, ViewError> {
        self.fields
            .get(index)
            .ok_or_else(|| ViewError::NoSuchField(format!("#{index} of {}", self.name)))
    }

    /// Look up a field by name, returning its index and layout.
    pub fn field_by_name(&self, name: &str) -> Result<(usize, &FieldLayout), ViewError> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
            .ok_or_else(|| ViewError::NoSuchField(format!("'{name}' of {}", self.name)))
    }
}

fn align_up(pos: usize, align: usize) -> usize {
    pos.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use ft_types::{PointerSize, WidthClass};
    use pretty_assertions::assert_eq;

    use super::*;

    // four callbacks, an int, and a platform long: the shape of FT_Outline_Funcs
    static CALLBACKS_THEN_LONG: RecordDescriptor = RecordDescriptor::new(
        "CallbacksThenLong",
        &[
            FieldDef::new("a", FieldType::Callback(Signature::MoveTo)),
            FieldDef::new("b", FieldType::Callback(Signature::LineTo)),
            FieldDef::new("c", FieldType::Callback(Signature::ConicTo)),
            FieldDef::new("d", FieldType::Callback(Signature::CubicTo)),
            FieldDef::new("int", FieldType::I32),
            FieldDef::new("long", FieldType::Long),
        ],
    );

    fn offsets(layout: &RecordLayout) -> Vec<(&'static str, usize, usize)> {
        layout
            .fields()
            .iter()
            .map(|field| (field.name, field.offset, field.size))
            .collect()
    }

    #[test]
    fn fixed32_long_follows_int() {
        let layout = CALLBACKS_THEN_LONG.layout(Target::LLP64);
        let long = layout.field_by_name("long").unwrap().1;
        assert_eq!(long.offset, 4 * 8 + 4);
        assert_eq!(long.size, 4);
        assert_eq!(layout.size(), 40);

        let layout = CALLBACKS_THEN_LONG.layout(Target::ILP32);
        let long = layout.field_by_name("long").unwrap().1;
        assert_eq!(long.offset, 4 * 4 + 4);
        assert_eq!(long.size, 4);
        assert_eq!(layout.size(), 24);
    }

    #[test]
    fn pointer_width_long_is_aligned() {
        let fixed = CALLBACKS_THEN_LONG.layout(Target::LLP64);
        let native = CALLBACKS_THEN_LONG.layout(Target::LP64);
        // everything before the long is unchanged
        assert_eq!(offsets(&fixed)[..5], offsets(&native)[..5]);
        assert_eq!(offsets(&native)[4..], [("int", 32, 4), ("long", 40, 8)]);
        assert_eq!(native.size(), 48);
        assert_eq!(native.align(), 8);
    }

    #[test]
    fn trailing_padding() {
        static SHORT_AFTER_LONG: RecordDescriptor = RecordDescriptor::new(
            "ShortAfterLong",
            &[
                FieldDef::new("long", FieldType::Long),
                FieldDef::new("short", FieldType::U16),
            ],
        );
        assert_eq!(SHORT_AFTER_LONG.size_of(Target::LP64), 16);
        assert_eq!(SHORT_AFTER_LONG.size_of(Target::LLP64), 8);
        assert_eq!(SHORT_AFTER_LONG.size_of(Target::ILP32), 8);
    }

    #[test]
    fn packed_small_fields() {
        static BYTES: RecordDescriptor = RecordDescriptor::new(
            "Bytes",
            &[
                FieldDef::new("a", FieldType::U8),
                FieldDef::new("b", FieldType::I8),
                FieldDef::new("c", FieldType::I16),
                FieldDef::new("d", FieldType::U8),
            ],
        );
        let layout = BYTES.layout(Target::LP64);
        assert_eq!(
            offsets(&layout),
            [("a", 0, 1), ("b", 1, 1), ("c", 2, 2), ("d", 4, 1)]
        );
        assert_eq!(layout.size(), 6);
    }

    #[test]
    fn int_kinds_follow_target() {
        let ilp32 = Target::new(PointerSize::Four, WidthClass::Fixed32);
        assert_eq!(FieldType::Long.int_kind(ilp32), IntKind::I32);
        assert_eq!(FieldType::ULong.int_kind(Target::LP64), IntKind::U64);
        assert_eq!(FieldType::Pointer.int_kind(Target::LLP64), IntKind::U64);
        assert_eq!(FieldType::U16.int_kind(Target::LLP64), IntKind::U16);
        assert!(FieldType::Long.is_platform_sensitive());
        assert!(!FieldType::CString.is_platform_sensitive());
    }

    #[test]
    fn process_size_of_uses_host() {
        assert_eq!(
            size_of(&CALLBACKS_THEN_LONG),
            CALLBACKS_THEN_LONG.size_of(Target::host())
        );
    }

    #[test]
    fn equivalent_targets_share_a_shape() {
        // 32-bit Windows: four byte pointers and longs, like ILP32
        let win32 = Target::new(PointerSize::Four, WidthClass::Fixed32);
        let windows = CALLBACKS_THEN_LONG.layout(win32);
        let unix = CALLBACKS_THEN_LONG.layout(Target::ILP32);
        assert_ne!(windows, unix);
        assert!(windows.same_shape(&unix));
        assert!(!windows.same_shape(&CALLBACKS_THEN_LONG.layout(Target::LLP64)));
    }

    #[test]
    fn missing_fields() {
        let layout = CALLBACKS_THEN_LONG.layout(Target::LP64);
        assert!(matches!(layout.field(6), Err(ViewError::NoSuchField(_))));
        assert!(matches!(layout.field_by_name("delta"), Err(ViewError::NoSuchField(_))));
        assert_eq!(CALLBACKS_THEN_LONG.field_index("int"), Some(4));
    }
}
