//! FreeType status codes

use std::ffi::c_int;

/// A FreeType error code, as returned by native functions and callbacks.
///
/// Zero means success. This is a transparent wrapper, so it can be used
/// directly as the return type of `extern "C"` callbacks.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FtError(c_int);

macro_rules! error_codes {
    ($($(#[$attr:meta])* $name:ident = $value:literal, $msg:literal;)*) => {
        impl FtError {
            $(
                $(#[$attr])*
                pub const $name: FtError = FtError($value);
            )*

            /// A short description of the error, if the code is known.
            pub fn message(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($msg),)*
                    _ => None,
                }
            }
        }
    };
}

error_codes! {
    /// No error.
    OK = 0x00, "no error";
    CANNOT_OPEN_RESOURCE = 0x01, "cannot open resource";
    UNKNOWN_FILE_FORMAT = 0x02, "unknown file format";
    INVALID_FILE_FORMAT = 0x03, "broken file";
    INVALID_VERSION = 0x04, "invalid FreeType version";
    LOWER_MODULE_VERSION = 0x05, "module version is too low";
    INVALID_ARGUMENT = 0x06, "invalid argument";
    UNIMPLEMENTED_FEATURE = 0x07, "unimplemented feature";
    INVALID_TABLE = 0x08, "broken table";
    INVALID_OFFSET = 0x09, "broken offset within table";
    ARRAY_TOO_LARGE = 0x0A, "array allocation size too large";
    MISSING_MODULE = 0x0B, "missing module";
    MISSING_PROPERTY = 0x0C, "missing property";
    INVALID_GLYPH_INDEX = 0x10, "invalid glyph index";
    INVALID_CHARACTER_CODE = 0x11, "invalid character code";
    INVALID_GLYPH_FORMAT = 0x12, "unsupported glyph image format";
    CANNOT_RENDER_GLYPH = 0x13, "cannot render this glyph format";
    INVALID_OUTLINE = 0x14, "invalid outline";
    INVALID_COMPOSITE = 0x15, "invalid composite glyph";
    TOO_MANY_HINTS = 0x16, "too many hints";
    INVALID_PIXEL_SIZE = 0x17, "invalid pixel size";
    INVALID_HANDLE = 0x20, "invalid object handle";
    INVALID_LIBRARY_HANDLE = 0x21, "invalid library handle";
    INVALID_DRIVER_HANDLE = 0x22, "invalid module handle";
    INVALID_FACE_HANDLE = 0x23, "invalid face handle";
    INVALID_SIZE_HANDLE = 0x24, "invalid size handle";
    INVALID_SLOT_HANDLE = 0x25, "invalid glyph slot handle";
    OUT_OF_MEMORY = 0x40, "out of memory";
    UNLISTED_OBJECT = 0x41, "unlisted object";
}

impl FtError {
    pub const fn from_code(code: c_int) -> Self {
        FtError(code)
    }

    pub const fn code(self) -> c_int {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// `Ok(())` for a zero code, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FtError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// The status code reported to native code for a callback result.
    ///
    /// An `Err` carrying a zero code is still a failure, and is reported as
    /// [`FtError::INVALID_ARGUMENT`].
    pub fn from_result(result: Result<(), FtError>) -> FtError {
        match result {
            Ok(()) => FtError::OK,
            Err(err) if err.is_ok() => FtError::INVALID_ARGUMENT,
            Err(err) => err,
        }
    }
}

impl std::fmt::Debug for FtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FtError(0x{:02X})", self.0)
    }
}

impl std::fmt::Display for FtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "{msg} (0x{:02X})", self.0),
            None => write!(f, "unknown FreeType error 0x{:02X}", self.0),
        }
    }
}

impl std::error::Error for FtError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_conversion() {
        assert_eq!(FtError::OK.into_result(), Ok(()));
        assert_eq!(
            FtError::from_code(6).into_result(),
            Err(FtError::INVALID_ARGUMENT)
        );
        assert_eq!(FtError::from_result(Ok(())), FtError::OK);
        assert_eq!(
            FtError::from_result(Err(FtError::OUT_OF_MEMORY)).code(),
            0x40
        );
    }

    #[test]
    fn failed_result_is_never_ok() {
        let status = FtError::from_result(Err(FtError::OK));
        assert!(!status.is_ok());
        assert_eq!(status, FtError::INVALID_ARGUMENT);
    }

    #[test]
    fn display() {
        assert_eq!(
            FtError::INVALID_OUTLINE.to_string(),
            "invalid outline (0x14)"
        );
        assert_eq!(
            FtError::from_code(0x7f).to_string(),
            "unknown FreeType error 0x7F"
        );
    }
}
