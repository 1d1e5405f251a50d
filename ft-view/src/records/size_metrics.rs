//! `FT_Size_Metrics`

use ft_types::{F26Dot6, Fixed};

use super::native_record;
use crate::layout::FieldType;
use crate::ViewError;

native_record! {
    /// The metrics of a scaled size object.
    ///
    /// The scales convert font units to 26.6 pixels; see [`Fixed::scale`].
    /// The remaining metrics are already scaled (and rounded, for
    /// hinted sizes).
    SizeMetrics, SIZE_METRICS = "FT_Size_Metrics" {
        x_ppem: FieldType::U16,
        y_ppem: FieldType::U16,
        x_scale: FieldType::Long,
        y_scale: FieldType::Long,
        ascender: FieldType::Long,
        descender: FieldType::Long,
        height: FieldType::Long,
        max_advance: FieldType::Long,
    }
}

impl SizeMetrics<'_> {
    /// Horizontal pixels per EM.
    pub fn x_ppem(&self) -> Result<u16, ViewError> {
        self.0.get(Field::x_ppem as usize)
    }

    /// Vertical pixels per EM.
    pub fn y_ppem(&self) -> Result<u16, ViewError> {
        self.0.get(Field::y_ppem as usize)
    }

    pub fn x_scale(&self) -> Result<Fixed, ViewError> {
        self.0.read_fixed(Field::x_scale as usize)
    }

    pub fn y_scale(&self) -> Result<Fixed, ViewError> {
        self.0.read_fixed(Field::y_scale as usize)
    }

    pub fn ascender(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::ascender as usize)
    }

    pub fn descender(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::descender as usize)
    }

    pub fn height(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::height as usize)
    }

    pub fn max_advance(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::max_advance as usize)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_long;

    use ft_test_data::{layouts, NativeBuffer};
    use ft_types::{IntValue, Target};

    use super::*;
    use crate::{MemoryView, NativeRecord};

    #[repr(C)]
    struct SizeMetricsRec {
        x_ppem: u16,
        y_ppem: u16,
        x_scale: c_long,
        y_scale: c_long,
        ascender: c_long,
        descender: c_long,
        height: c_long,
        max_advance: c_long,
    }

    #[test]
    fn golden_layouts() {
        for (target, expected) in layouts::SIZE_METRICS {
            let layout = SIZE_METRICS.layout(*target);
            let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
            pretty_assertions::assert_eq!(offsets, expected.offsets, "{target}");
            assert_eq!(layout.size(), expected.size, "{target}");
        }
    }

    #[test]
    fn host_layout_matches_repr_c() {
        let layout = SizeMetrics::layout();
        assert_eq!(layout.size(), std::mem::size_of::<SizeMetricsRec>());
        assert_eq!(
            layout.fields()[Field::x_scale as usize].offset,
            std::mem::offset_of!(SizeMetricsRec, x_scale)
        );
        assert_eq!(
            layout.fields()[Field::max_advance as usize].offset,
            std::mem::offset_of!(SizeMetricsRec, max_advance)
        );
    }

    #[test]
    fn read_native_metrics() {
        // 16ppem for a 2048 upem font
        let rec = SizeMetricsRec {
            x_ppem: 16,
            y_ppem: 16,
            x_scale: 0x8000,
            y_scale: 0x8000,
            ascender: 15 * 64,
            descender: -4 * 64,
            height: 19 * 64,
            max_advance: 1000,
        };
        let metrics = unsafe { SizeMetrics::from_address(&rec as *const _ as *const _) };
        assert_eq!(metrics.x_ppem(), Ok(16));
        assert_eq!(metrics.y_scale(), Ok(Fixed::from_f64(0.5)));
        assert_eq!(metrics.ascender(), Ok(F26Dot6::from_i32(15)));
        assert_eq!(metrics.descender(), Ok(F26Dot6::from_i32(-4)));
        assert_eq!(metrics.height().unwrap().to_i64(), 19);
        assert_eq!(metrics.max_advance().unwrap().to_bits(), 1000);
        assert_eq!(metrics.x_scale().unwrap().scale(2048), F26Dot6::from_i32(16));
    }

    #[test]
    fn sign_extends_fixed32_longs() {
        // a record captured from a windows process
        let layout = SIZE_METRICS.layout(Target::LLP64);
        let mut buf = NativeBuffer::zeroed(layout.size());
        let descender = layout.fields()[Field::descender as usize];
        buf.write_int(descender.offset, descender.kind, IntValue::Signed(-256));
        let view = MemoryView::new(buf.as_slice(), &layout).unwrap();
        assert_eq!(
            view.read_f26dot6(Field::descender as usize),
            Ok(F26Dot6::from_i32(-4))
        );
    }

    #[test]
    fn detached_metrics() {
        let metrics = SizeMetrics::detached();
        assert!(!metrics.is_attached());
        assert_eq!(metrics.x_ppem(), Err(ViewError::NullReference));
        assert_eq!(metrics.height(), Err(ViewError::NullReference));
    }
}
