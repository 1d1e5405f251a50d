//! `FT_Glyph_Metrics`

use ft_types::F26Dot6;

use super::native_record;
use crate::layout::FieldType;
use crate::ViewError;

native_record! {
    /// The metrics of a loaded glyph, in 26.6 pixels (or font units when
    /// the glyph was loaded unscaled).
    GlyphMetrics, GLYPH_METRICS = "FT_Glyph_Metrics" {
        width: FieldType::Long,
        height: FieldType::Long,
        hori_bearing_x as "horiBearingX": FieldType::Long,
        hori_bearing_y as "horiBearingY": FieldType::Long,
        hori_advance as "horiAdvance": FieldType::Long,
        vert_bearing_x as "vertBearingX": FieldType::Long,
        vert_bearing_y as "vertBearingY": FieldType::Long,
        vert_advance as "vertAdvance": FieldType::Long,
    }
}

macro_rules! metric {
    ($($(#[$attr:meta])* $name:ident),* $(,)?) => {
        impl GlyphMetrics<'_> {
            $(
                $(#[$attr])*
                pub fn $name(&self) -> Result<F26Dot6, ViewError> {
                    self.0.read_f26dot6(Field::$name as usize)
                }
            )*
        }
    };
}

metric! {
    width,
    height,
    /// Left side bearing for horizontal layout.
    hori_bearing_x,
    /// Top side bearing for horizontal layout.
    hori_bearing_y,
    hori_advance,
    vert_bearing_x,
    vert_bearing_y,
    vert_advance,
}

#[cfg(test)]
mod tests {
    use ft_test_data::{layouts, NativeBuffer};
    use ft_types::{IntValue, Target};

    use super::*;
    use crate::{FieldValue, MemoryView, NativeRecord};

    #[test]
    fn golden_layouts() {
        for (target, expected) in layouts::GLYPH_METRICS {
            let layout = GLYPH_METRICS.layout(*target);
            let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
            pretty_assertions::assert_eq!(offsets, expected.offsets, "{target}");
            assert_eq!(layout.size(), expected.size, "{target}");
        }
    }

    #[test]
    fn host_size() {
        assert_eq!(
            GlyphMetrics::layout().size(),
            8 * std::mem::size_of::<std::ffi::c_long>()
        );
    }

    #[test]
    fn read_metrics() {
        let layout = GlyphMetrics::layout();
        let mut buf = NativeBuffer::zeroed(layout.size());
        for (i, field) in layout.fields().iter().enumerate() {
            buf.write_int(field.offset, field.kind, IntValue::Signed(64 * i as i64 - 128));
        }
        let metrics = GlyphMetrics::new(buf.as_slice()).unwrap();
        assert_eq!(metrics.width(), Ok(F26Dot6::from_i32(-2)));
        assert_eq!(metrics.hori_advance(), Ok(F26Dot6::from_i32(2)));
        assert_eq!(metrics.vert_advance(), Ok(F26Dot6::from_i32(5)));
    }

    #[test]
    fn c_field_names() {
        let layout = GLYPH_METRICS.layout(Target::ILP32);
        let buf = NativeBuffer::zeroed(layout.size());
        let view = MemoryView::new(buf.as_slice(), &layout).unwrap();
        assert_eq!(
            view.field_by_name("horiAdvance"),
            Ok(FieldValue::Int(IntValue::Signed(0)))
        );
        assert_eq!(GLYPH_METRICS.field_index("vertBearingY"), Some(6));
        assert!(view.field_by_name("hori_advance").is_err());
    }
}
