//! `FT_Bitmap_Size`

use ft_types::F26Dot6;

use super::native_record;
use crate::layout::FieldType;
use crate::ViewError;

native_record! {
    /// One of the bitmap strikes of a face.
    ///
    /// A face stores these as a contiguous array, see
    /// [`RecordArray`](crate::RecordArray).
    BitmapSize, BITMAP_SIZE = "FT_Bitmap_Size" {
        height: FieldType::I16,
        width: FieldType::I16,
        size: FieldType::Long,
        x_ppem: FieldType::Long,
        y_ppem: FieldType::Long,
    }
}

impl BitmapSize<'_> {
    /// The vertical distance between two consecutive baselines, in pixels.
    pub fn height(&self) -> Result<i16, ViewError> {
        self.0.get(Field::height as usize)
    }

    /// The average width of the strike, in pixels.
    pub fn width(&self) -> Result<i16, ViewError> {
        self.0.get(Field::width as usize)
    }

    /// The nominal size of the strike.
    pub fn size(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::size as usize)
    }

    pub fn x_ppem(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::x_ppem as usize)
    }

    pub fn y_ppem(&self) -> Result<F26Dot6, ViewError> {
        self.0.read_f26dot6(Field::y_ppem as usize)
    }
}
