//! Common scalar types for reading FreeType's native records
//!
//! FreeType declares several of its integer types (`FT_Long`, `FT_ULong`,
//! `FT_Pos`, `FT_Fixed`, `FT_F26Dot6`) in terms of C `long`, whose width
//! depends on the data model of the platform. This crate provides the
//! vocabulary for describing that choice ([`Target`], [`WidthClass`]), for
//! decoding native-endian integers of any width ([`NativeScalar`],
//! [`IntKind`]), and for the fixed-point and enumerated values stored in
//! those records.

#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error_code;
mod fixed;
mod module_flags;
pub mod native;
mod render_mode;
mod scalar;
mod target;


pub use error_code::FtError;
pub use fixed::{F26Dot6, Fixed};
pub use module_flags::ModuleFlags;
pub use render_mode::{LoadTarget, RenderMode};
pub use scalar::{IntKind, IntValue, NativeScalar};
pub use target::{process_target, set_process_target, PointerSize, Target, WidthClass};
