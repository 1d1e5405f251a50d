//! Function pointer bindings for native callbacks
//!
//! Each callback shape FreeType uses is a transparent newtype around an
//! `unsafe extern "C" fn`, so `Option<Callback>` has exactly the layout of
//! the nullable C function pointer. Going the other way, Rust code is
//! exposed to the native library through generic trampolines: one
//! monomorphized `extern "C"` function per implementation, with no
//! allocation and no runtime registration.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::fmt;

use ft_types::native::FtPos;
use ft_types::FtError;

use crate::handle::ModuleHandle;
use crate::layout::Signature;

/// `FT_Vector`: a point in 26.6 or font units, with host `FT_Pos` fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vector {
    pub x: FtPos,
    pub y: FtPos,
}

impl Vector {
    pub const fn new(x: FtPos, y: FtPos) -> Self {
        Vector { x, y }
    }
}

/// A native function pointer with a known signature.
pub trait Callback: Copy {
    /// The signature a record field must declare to hold this callback.
    const SIGNATURE: Signature;

    /// The address of the function.
    fn to_address(self) -> usize;

    /// Reinterpret an address as a function of this type.
    ///
    /// Returns `None` for a null address.
    ///
    /// # Safety
    ///
    /// A non-zero `address` must be the entry point of a function with
    /// exactly this signature and the C calling convention.
    unsafe fn from_address(address: usize) -> Option<Self>;
}

macro_rules! callback {
    (
        $(#[$attr:meta])*
        $name:ident: $sig:ident,
        fn($($arg:ident: $ty:ty),*) $(-> $ret:ty)?
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy)]
        #[repr(transparent)]
        pub struct $name(pub unsafe extern "C" fn($($ty),*) $(-> $ret)?);

        impl $name {
            /// Call the function.
            ///
            /// # Safety
            ///
            /// The arguments must satisfy whatever contract the native
            /// implementation has for them.
            pub unsafe fn call(self, $($arg: $ty),*) $(-> $ret)? {
                // SAFETY: upheld by the caller
                unsafe { (self.0)($($arg),*) }
            }
        }

        impl Callback for $name {
            const SIGNATURE: Signature = Signature::$sig;

            fn to_address(self) -> usize {
                self.0 as usize
            }

            unsafe fn from_address(address: usize) -> Option<Self> {
                if address == 0 {
                    return None;
                }
                let ptr = address as *const ();
                // SAFETY: non-null, and the caller guarantees the signature
                Some($name(unsafe {
                    std::mem::transmute::<*const (), unsafe extern "C" fn($($ty),*) $(-> $ret)?>(ptr)
                }))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#x})", Signature::$sig.c_name(), self.to_address())
            }
        }
    };
}

callback! {
    /// `FT_Module_Constructor`: initializes a freshly allocated module.
    ModuleConstructor: ModuleConstructor,
    fn(module: ModuleHandle) -> FtError
}

callback! {
    /// `FT_Module_Destructor`: finalizes a module before it is freed.
    ModuleDestructor: ModuleDestructor,
    fn(module: ModuleHandle)
}

callback! {
    /// `FT_Module_Requester`: looks up a module-specific interface by name.
    ModuleRequester: ModuleRequester,
    fn(module: ModuleHandle, name: *const c_char) -> *const c_void
}

callback! {
    /// `FT_Outline_MoveToFunc`
    MoveToFunc: MoveTo,
    fn(to: *const Vector, user: *mut c_void) -> c_int
}

callback! {
    /// `FT_Outline_LineToFunc`
    LineToFunc: LineTo,
    fn(to: *const Vector, user: *mut c_void) -> c_int
}

callback! {
    /// `FT_Outline_ConicToFunc`
    ConicToFunc: ConicTo,
    fn(control: *const Vector, to: *const Vector, user: *mut c_void) -> c_int
}

callback! {
    /// `FT_Outline_CubicToFunc`
    CubicToFunc: CubicTo,
    fn(
        control1: *const Vector,
        control2: *const Vector,
        to: *const Vector,
        user: *mut c_void
    ) -> c_int
}

/// The lifecycle hooks of a module implemented in Rust.
///
/// Modules have no user data pointer, so the hooks are associated
/// functions; any per-module state must be looked up from the handle.
pub trait ModuleHooks {
    fn init(_module: ModuleHandle) -> Result<(), FtError> {
        Ok(())
    }

    fn done(_module: ModuleHandle) {}

    /// Returns the interface registered under `name`, or null.
    fn get_interface(_module: ModuleHandle, _name: &CStr) -> *const c_void {
        std::ptr::null()
    }
}

extern "C" fn module_init<H: ModuleHooks>(module: ModuleHandle) -> FtError {
    if module.is_null() {
        return FtError::INVALID_DRIVER_HANDLE;
    }
    FtError::from_result(H::init(module))
}

extern "C" fn module_done<H: ModuleHooks>(module: ModuleHandle) {
    if !module.is_null() {
        H::done(module)
    }
}

unsafe extern "C" fn module_get_interface<H: ModuleHooks>(
    module: ModuleHandle,
    name: *const c_char,
) -> *const c_void {
    if module.is_null() || name.is_null() {
        return std::ptr::null();
    }
    // SAFETY: the library passes a nul-terminated interface name
    let name = unsafe { CStr::from_ptr(name) };
    H::get_interface(module, name)
}

impl ModuleConstructor {
    /// The constructor that forwards to `H::init`.
    pub fn of<H: ModuleHooks>() -> Self {
        ModuleConstructor(module_init::<H>)
    }
}

impl ModuleDestructor {
    /// The destructor that forwards to `H::done`.
    pub fn of<H: ModuleHooks>() -> Self {
        ModuleDestructor(module_done::<H>)
    }
}

impl ModuleRequester {
    /// The requester that forwards to `H::get_interface`.
    pub fn of<H: ModuleHooks>() -> Self {
        ModuleRequester(module_get_interface::<H>)
    }
}

/// A consumer of outline segments.
///
/// This is the Rust side of `FT_Outline_Funcs`. An error stops the
/// decomposition and is reported back to the library as the callback's
/// status.
pub trait OutlineSink {
    fn move_to(&mut self, to: Vector) -> Result<(), FtError>;
    fn line_to(&mut self, to: Vector) -> Result<(), FtError>;
    fn conic_to(&mut self, control: Vector, to: Vector) -> Result<(), FtError>;
    fn cubic_to(&mut self, control1: Vector, control2: Vector, to: Vector)
        -> Result<(), FtError>;
}

// The user pointer handed to the library alongside the function table must
// be a `*mut S` for the `S` the table was built for.
unsafe fn sink<'a, S: OutlineSink>(user: *mut c_void) -> Option<&'a mut S> {
    // SAFETY: upheld by the caller
    unsafe { user.cast::<S>().as_mut() }
}

unsafe fn point(p: *const Vector) -> Option<Vector> {
    // SAFETY: the library passes null or a valid vector
    unsafe { p.as_ref().copied() }
}

fn status(result: Result<(), FtError>) -> c_int {
    FtError::from_result(result).code()
}

pub(crate) unsafe extern "C" fn sink_move_to<S: OutlineSink>(
    to: *const Vector,
    user: *mut c_void,
) -> c_int {
    // SAFETY: see `sink` and `point`
    match unsafe { (sink::<S>(user), point(to)) } {
        (Some(sink), Some(to)) => status(sink.move_to(to)),
        _ => FtError::INVALID_ARGUMENT.code(),
    }
}

pub(crate) unsafe extern "C" fn sink_line_to<S: OutlineSink>(
    to: *const Vector,
    user: *mut c_void,
) -> c_int {
    // SAFETY: see `sink` and `point`
    match unsafe { (sink::<S>(user), point(to)) } {
        (Some(sink), Some(to)) => status(sink.line_to(to)),
        _ => FtError::INVALID_ARGUMENT.code(),
    }
}

pub(crate) unsafe extern "C" fn sink_conic_to<S: OutlineSink>(
    control: *const Vector,
    to: *const Vector,
    user: *mut c_void,
) -> c_int {
    // SAFETY: see `sink` and `point`
    match unsafe { (sink::<S>(user), point(control), point(to)) } {
        (Some(sink), Some(control), Some(to)) => status(sink.conic_to(control, to)),
        _ => FtError::INVALID_ARGUMENT.code(),
    }
}

pub(crate) unsafe extern "C" fn sink_cubic_to<S: OutlineSink>(
    control1: *const Vector,
    control2: *const Vector,
    to: *const Vector,
    user: *mut c_void,
) -> c_int {
    // SAFETY: see `sink` and `point`
    match unsafe { (sink::<S>(user), point(control1), point(control2), point(to)) } {
        (Some(sink), Some(c1), Some(c2), Some(to)) => status(sink.cubic_to(c1, c2, to)),
        _ => FtError::INVALID_ARGUMENT.code(),
    }
}

/// An [`OutlineSink`] that forwards to a native callback table.
///
/// This lets Rust code that produces outline segments drive an
/// `FT_Outline_Funcs` table supplied by native code (or read back from
/// memory) through the same interface as a Rust sink.
#[derive(Clone, Copy, Debug)]
pub struct NativeOutlineSink {
    move_to: Option<MoveToFunc>,
    line_to: Option<LineToFunc>,
    conic_to: Option<ConicToFunc>,
    cubic_to: Option<CubicToFunc>,
    user: *mut c_void,
}

impl NativeOutlineSink {
    /// Drive the given callbacks, passing `user` through to each call.
    ///
    /// A missing callback fails the corresponding segment with
    /// [`FtError::INVALID_ARGUMENT`].
    ///
    /// # Safety
    ///
    /// Every callback must be safe to call with valid vectors and `user`,
    /// for as long as this sink is used.
    pub unsafe fn new(
        move_to: Option<MoveToFunc>,
        line_to: Option<LineToFunc>,
        conic_to: Option<ConicToFunc>,
        cubic_to: Option<CubicToFunc>,
        user: *mut c_void,
    ) -> Self {
        NativeOutlineSink {
            move_to,
            line_to,
            conic_to,
            cubic_to,
            user,
        }
    }

    pub fn user(&self) -> *mut c_void {
        self.user
    }
}

impl OutlineSink for NativeOutlineSink {
    fn move_to(&mut self, to: Vector) -> Result<(), FtError> {
        let func = self.move_to.ok_or(FtError::INVALID_ARGUMENT)?;
        // SAFETY: guaranteed when the sink was created
        FtError::from_code(unsafe { func.call(&to, self.user) }).into_result()
    }

    fn line_to(&mut self, to: Vector) -> Result<(), FtError> {
        let func = self.line_to.ok_or(FtError::INVALID_ARGUMENT)?;
        // SAFETY: guaranteed when the sink was created
        FtError::from_code(unsafe { func.call(&to, self.user) }).into_result()
    }

    fn conic_to(&mut self, control: Vector, to: Vector) -> Result<(), FtError> {
        let func = self.conic_to.ok_or(FtError::INVALID_ARGUMENT)?;
        // SAFETY: guaranteed when the sink was created
        FtError::from_code(unsafe { func.call(&control, &to, self.user) }).into_result()
    }

    fn cubic_to(
        &mut self,
        control1: Vector,
        control2: Vector,
        to: Vector,
    ) -> Result<(), FtError> {
        let func = self.cubic_to.ok_or(FtError::INVALID_ARGUMENT)?;
        // SAFETY: guaranteed when the sink was created
        FtError::from_code(unsafe { func.call(&control1, &control2, &to, self.user) })
            .into_result()
    }
}
