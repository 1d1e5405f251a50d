//! Reading and writing FreeType's native records
//!
//! This crate provides typed, lazily decoded views over records owned by
//! a native FreeType library: structs such as `FT_Size_Metrics` or
//! `FT_Module_Class` that live in native memory and are only ever handed to
//! Rust as an address.
//!
//! Several of FreeType's integer types (`FT_Long`, `FT_Pos`, `FT_Fixed`,
//! `FT_F26Dot6`, `FT_ULong`) are C `long`s, which are 32 bits on Windows and
//! pointer sized elsewhere. Rather than declaring each record once per data
//! model, every record is described by a [`RecordDescriptor`] (its fields in
//! declaration order) which the layout engine resolves against a
//! [`Target`](types::Target) to produce the offsets the C compiler would
//! have chosen.
//!
//! A [`MemoryView`] pairs a base address with such a layout. Nothing is read
//! until a field is requested, and nothing is cached. Misuse, such as reading
//! through a detached view or reading a field with the wrong width, is
//! reported as a [`ViewError`] rather than defaulted.
//!
//! Callbacks stored in records are exposed as typed function pointers (see
//! [`callbacks`]); Rust implementations can be turned into native function
//! pointers with the generic trampolines in the same module.
//!
//! # Example
//!
//! ```
//! use ft_view::records::{SizeRequest, SizeRequestMut, SizeRequestType};
//! use ft_view::NativeRecord;
//!
//! let mut buf = vec![0u8; SizeRequest::layout().size()];
//! let mut request = SizeRequestMut::new(&mut buf).unwrap();
//! request.set_request_type(SizeRequestType::Nominal).unwrap();
//! request.set_height(12 * 64).unwrap();
//! request.set_vert_resolution(96).unwrap();
//!
//! let request = request.as_request();
//! assert_eq!(request.height(), Ok(12 * 64));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

mod array;
pub mod callbacks;
mod data;
mod error;
mod handle;
pub mod layout;
pub mod records;
mod view;

/// Public re-export of the ft-types crate.
pub extern crate ft_types as types;

pub use array::RecordArray;
pub use data::{NativeData, NativeDataMut};
pub use error::ViewError;
pub use handle::ModuleHandle;
pub use layout::{size_of, FieldDef, FieldType, RecordDescriptor, RecordLayout, Signature};
pub use records::NativeRecord;
pub use view::{FieldValue, MemoryView, MemoryViewMut};
