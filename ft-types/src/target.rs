//! Data models and the process-wide target

use std::sync::OnceLock;

/// The width of the platform-sensitive FreeType integer aliases.
///
/// `FT_Long`, `FT_ULong`, `FT_Pos`, `FT_Fixed` and `FT_F26Dot6` are all
/// declared in terms of C `long`. On Windows-style data models these are
/// always 32 bits; everywhere else they match the pointer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WidthClass {
    /// Always four bytes, regardless of pointer size.
    Fixed32,
    /// The same size as a pointer.
    PointerWidth,
}

/// The size of a data pointer in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerSize {
    Four,
    Eight,
}

impl PointerSize {
    /// The pointer size of the current compilation target.
    pub const HOST: PointerSize = match std::mem::size_of::<usize>() {
        4 => PointerSize::Four,
        _ => PointerSize::Eight,
    };

    /// The size in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            PointerSize::Four => 4,
            PointerSize::Eight => 8,
        }
    }
}

/// A C data model: everything needed to turn a record descriptor into
/// concrete offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub pointer_size: PointerSize,
    pub longs: WidthClass,
}

impl Target {
    /// 32-bit pointers, 32-bit longs (x86, arm, wasm32).
    pub const ILP32: Target = Target::new(PointerSize::Four, WidthClass::PointerWidth);
    /// 64-bit pointers, 64-bit longs (Linux, macOS and most other 64-bit unixes).
    pub const LP64: Target = Target::new(PointerSize::Eight, WidthClass::PointerWidth);
    /// 64-bit pointers, 32-bit longs (64-bit Windows).
    pub const LLP64: Target = Target::new(PointerSize::Eight, WidthClass::Fixed32);

    pub const fn new(pointer_size: PointerSize, longs: WidthClass) -> Self {
        Target {
            pointer_size,
            longs,
        }
    }

    /// The data model this crate was compiled for.
    pub const fn host() -> Self {
        let longs = if cfg!(windows) {
            WidthClass::Fixed32
        } else {
            WidthClass::PointerWidth
        };
        Target::new(PointerSize::HOST, longs)
    }

    /// Size of a data or function pointer, in bytes.
    pub const fn pointer_bytes(self) -> usize {
        self.pointer_size.bytes()
    }

    /// Size of `FT_Long` and friends, in bytes.
    pub const fn long_bytes(self) -> usize {
        match self.longs {
            WidthClass::Fixed32 => 4,
            WidthClass::PointerWidth => self.pointer_size.bytes(),
        }
    }

    /// `true` if pointers read through this target can be dereferenced
    /// in the current process.
    pub const fn has_host_pointers(self) -> bool {
        self.pointer_size.bytes() == PointerSize::HOST.bytes()
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::host()
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match (self.pointer_size, self.longs) {
            (PointerSize::Four, _) if self.long_bytes() == 4 => "ILP32",
            (PointerSize::Eight, WidthClass::PointerWidth) => "LP64",
            (PointerSize::Eight, WidthClass::Fixed32) => "LLP64",
            _ => "unknown",
        };
        write!(
            f,
            "{name} (pointer: {} bytes, long: {} bytes)",
            self.pointer_bytes(),
            self.long_bytes()
        )
    }
}

static PROCESS_TARGET: OnceLock<Target> = OnceLock::new();

/// Returns the target used for all record layouts in this process.
///
/// The first call fixes the value; unless [`set_process_target`] ran first,
/// this is [`Target::host`]. The value never changes afterwards.
pub fn process_target() -> Target {
    *PROCESS_TARGET.get_or_init(|| {
        let target = Target::host();
        log::debug!("resolved process target to host data model {target}");
        target
    })
}

/// Fixes the process-wide target before anything has resolved it.
///
/// This is only useful when the native memory being read was produced under
/// a different data model than the one this crate was compiled for. On
/// failure, returns the target that is already in effect.
pub fn set_process_target(target: Target) -> Result<(), Target> {
    match PROCESS_TARGET.set(target) {
        Ok(()) => {
            log::debug!("process target configured as {target}");
            Ok(())
        }
        Err(_) => {
            let current = process_target();
            if current != target {
                log::warn!("ignoring process target {target}: already resolved to {current}");
            }
            Err(current)
        }
    }
}
