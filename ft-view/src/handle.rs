//! Opaque handles to native objects

use std::ffi::c_void;

/// An `FT_Module`: an opaque pointer to a module record owned by the
/// native library.
///
/// The wrapper has the same ABI as the raw pointer, so it can appear
/// directly in callback signatures. It is never dereferenced on the Rust
/// side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ModuleHandle(*mut c_void);

impl ModuleHandle {
    /// The null handle.
    pub const NULL: ModuleHandle = ModuleHandle(std::ptr::null_mut());

    /// Wrap a raw `FT_Module` pointer.
    pub const fn from_raw(ptr: *mut c_void) -> Self {
        ModuleHandle(ptr)
    }

    /// Unwrap the raw pointer, for passing back to native code.
    pub const fn into_raw(self) -> *mut c_void {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// The address of the module, or zero.
    pub fn address(self) -> usize {
        self.0 as usize
    }
}

impl Default for ModuleHandle {
    fn default() -> Self {
        ModuleHandle::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unwrap() {
        let mut module = 0u64;
        let raw = &mut module as *mut u64 as *mut c_void;
        let handle = ModuleHandle::from_raw(raw);
        assert!(!handle.is_null());
        assert_eq!(handle.into_raw(), raw);
        assert_eq!(handle.address(), raw as usize);
        assert!(ModuleHandle::default().is_null());
        assert_eq!(
            std::mem::size_of::<ModuleHandle>(),
            std::mem::size_of::<*mut c_void>()
        );
    }
}
