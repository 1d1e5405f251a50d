//! Field offsets and sizes of FreeType's records, as laid out by a C
//! compiler for each data model.

use ft_types::Target;

/// The expected layout of a record.
#[derive(Clone, Copy, Debug)]
pub struct Golden {
    /// Offset of each field, in declaration order.
    pub offsets: &'static [usize],
    /// `sizeof`, including trailing padding.
    pub size: usize,
}

const fn golden(offsets: &'static [usize], size: usize) -> Golden {
    Golden { offsets, size }
}

pub static MODULE_CLASS: &[(Target, Golden)] = &[
    (
        Target::ILP32,
        golden(&[0, 4, 8, 12, 16, 20, 24, 28, 32], 36),
    ),
    (
        Target::LP64,
        golden(&[0, 8, 16, 24, 32, 40, 48, 56, 64], 72),
    ),
    // the two leading longs share the first pointer-sized slot
    (
        Target::LLP64,
        golden(&[0, 4, 8, 16, 20, 24, 32, 40, 48], 56),
    ),
];

pub static OUTLINE_FUNCS: &[(Target, Golden)] = &[
    (Target::ILP32, golden(&[0, 4, 8, 12, 16, 20], 24)),
    (Target::LP64, golden(&[0, 8, 16, 24, 32, 40], 48)),
    (Target::LLP64, golden(&[0, 8, 16, 24, 32, 36], 40)),
];

pub static SIZE_METRICS: &[(Target, Golden)] = &[
    (Target::ILP32, golden(&[0, 2, 4, 8, 12, 16, 20, 24], 28)),
    (Target::LP64, golden(&[0, 2, 8, 16, 24, 32, 40, 48], 56)),
    (Target::LLP64, golden(&[0, 2, 4, 8, 12, 16, 20, 24], 28)),
];

pub static SIZE_REQUEST: &[(Target, Golden)] = &[
    (Target::ILP32, golden(&[0, 4, 8, 12, 16], 20)),
    (Target::LP64, golden(&[0, 8, 16, 24, 28], 32)),
    (Target::LLP64, golden(&[0, 4, 8, 12, 16], 20)),
];

pub static BITMAP_SIZE: &[(Target, Golden)] = &[
    (Target::ILP32, golden(&[0, 2, 4, 8, 12], 16)),
    (Target::LP64, golden(&[0, 2, 8, 16, 24], 32)),
    (Target::LLP64, golden(&[0, 2, 4, 8, 12], 16)),
];

pub static GLYPH_METRICS: &[(Target, Golden)] = &[
    (Target::ILP32, golden(&[0, 4, 8, 12, 16, 20, 24, 28], 32)),
    (Target::LP64, golden(&[0, 8, 16, 24, 32, 40, 48, 56], 64)),
    (Target::LLP64, golden(&[0, 4, 8, 12, 16, 20, 24, 28], 32)),
];
