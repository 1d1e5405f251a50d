//! Host aliases for the platform-sensitive FreeType integers.
//!
//! These follow the width of C `long` on the compilation target, which is
//! what FreeType itself uses. They are only meaningful for memory produced in
//! the current process; use a [`Target`](crate::Target) to describe others.

use std::ffi::{c_long, c_ulong};

pub type FtLong = c_long;
pub type FtULong = c_ulong;
pub type FtPos = c_long;
pub type FtFixed = c_long;
pub type FtF26Dot6 = c_long;
