//! Typed wrappers for FreeType's public records
//!
//! Each record is declared once, as a field list; its layout for the process
//! target is computed the first time it is needed and shared afterwards.

mod bitmap_size;
mod glyph_metrics;
mod module_class;
mod outline_funcs;
mod size_metrics;
mod size_request;

use crate::layout::{RecordDescriptor, RecordLayout};
use crate::{MemoryView, ViewError};

pub use bitmap_size::{BitmapSize, BITMAP_SIZE};
pub use glyph_metrics::{GlyphMetrics, GLYPH_METRICS};
pub use module_class::{ModuleClass, MODULE_CLASS};
pub use outline_funcs::{OutlineFuncs, OutlineFuncsMut, OutlineFuncsRec, OUTLINE_FUNCS};
pub use size_metrics::{SizeMetrics, SIZE_METRICS};
pub use size_request::{SizeRequest, SizeRequestMut, SizeRequestType, SIZE_REQUEST};

/// A typed view of a particular native record.
pub trait NativeRecord<'a>: Sized {
    /// The declaration of the record.
    fn descriptor() -> &'static RecordDescriptor;

    /// The layout of the record under the process target.
    fn layout() -> &'static RecordLayout;

    /// Wrap an untyped view.
    ///
    /// Fails if the view's layout is not that of this record under the
    /// process target. Layouts computed for an equivalent target are accepted.
    fn from_view(view: MemoryView<'a>) -> Result<Self, ViewError>;

    /// The untyped view of this record.
    fn view(&self) -> MemoryView<'a>;
}

/// Declares a record: its descriptor, a private `Field` index enum, and a
/// read-only wrapper implementing [`NativeRecord`].
///
/// A field whose C name is not a valid Rust identifier can be renamed with
/// `rust_name as "c_name": type`.
macro_rules! native_record {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $c_field:literal) => {
        $c_field
    };
    (
        $(#[$attr:meta])*
        $name:ident, $descriptor:ident = $c_name:literal {
            $($field:ident $(as $c_field:literal)?: $ty:expr),* $(,)?
        }
    ) => {
        #[doc = concat!("The field list of `", $c_name, "`.")]
        pub static $descriptor: $crate::layout::RecordDescriptor =
            $crate::layout::RecordDescriptor::new(
                $c_name,
                &[$(
                    $crate::layout::FieldDef::new(native_record!(@name $field $($c_field)?), $ty)
                ),*],
            );

        #[allow(non_camel_case_types, dead_code)]
        #[derive(Clone, Copy)]
        #[repr(usize)]
        enum Field {
            $($field),*
        }

        $(#[$attr])*
        #[derive(Clone, Copy)]
        pub struct $name<'a>($crate::MemoryView<'a>);

        impl<'a> $name<'a> {
            /// A view over a buffer holding a copy of the record.
            pub fn new(bytes: &'a [u8]) -> Result<Self, $crate::ViewError> {
                $crate::MemoryView::new(bytes, <Self as $crate::NativeRecord>::layout()).map(Self)
            }

            /// A view of the record at `address`; null gives a detached view.
            ///
            /// # Safety
            ///
            /// See [`MemoryView::from_address`]($crate::MemoryView::from_address).
            pub unsafe fn from_address(address: *const std::ffi::c_void) -> Self {
                // SAFETY: upheld by the caller
                Self(unsafe {
                    $crate::MemoryView::from_address(
                        address,
                        <Self as $crate::NativeRecord>::layout(),
                    )
                })
            }

            /// A view that is not attached to any record.
            pub fn detached() -> Self {
                Self($crate::MemoryView::detached(<Self as $crate::NativeRecord>::layout()))
            }

            pub fn is_attached(&self) -> bool {
                self.0.is_attached()
            }
        }

        impl<'a> $crate::NativeRecord<'a> for $name<'a> {
            fn descriptor() -> &'static $crate::layout::RecordDescriptor {
                &$descriptor
            }

            fn layout() -> &'static $crate::layout::RecordLayout {
                static LAYOUT: std::sync::OnceLock<$crate::layout::RecordLayout> =
                    std::sync::OnceLock::new();
                LAYOUT.get_or_init(|| $descriptor.layout(ft_types::process_target()))
            }

            fn from_view(view: $crate::MemoryView<'a>) -> Result<Self, $crate::ViewError> {
                let layout = <Self as $crate::NativeRecord>::layout();
                if !view.layout().same_shape(layout) {
                    return Err($crate::ViewError::TypeMismatch {
                        field: "<record>",
                        expected: $c_name,
                        found: view.layout().name(),
                    });
                }
                Ok(Self(view))
            }

            fn view(&self) -> $crate::MemoryView<'a> {
                self.0
            }
        }

        impl std::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

pub(crate) use native_record;
