//! `FT_Outline_Funcs`

use std::ffi::{c_int, c_void};

use ft_types::native::FtPos;

use super::native_record;
use crate::callbacks::{
    sink_conic_to, sink_cubic_to, sink_line_to, sink_move_to, ConicToFunc, CubicToFunc,
    LineToFunc, MoveToFunc, NativeOutlineSink, OutlineSink,
};
use crate::layout::{FieldType, Signature};
use crate::{MemoryViewMut, NativeRecord, ViewError};

native_record! {
    /// The callback table used to decompose an outline.
    ///
    /// `shift` and `delta` transform each point before it is passed to the
    /// callbacks: `x' = (x << shift) - delta`.
    OutlineFuncs, OUTLINE_FUNCS = "FT_Outline_Funcs" {
        move_to: FieldType::Callback(Signature::MoveTo),
        line_to: FieldType::Callback(Signature::LineTo),
        conic_to: FieldType::Callback(Signature::ConicTo),
        cubic_to: FieldType::Callback(Signature::CubicTo),
        shift: FieldType::I32,
        delta: FieldType::Long,
    }
}

impl<'a> OutlineFuncs<'a> {
    pub fn move_to(&self) -> Result<Option<MoveToFunc>, ViewError> {
        self.0.read_callback(Field::move_to as usize)
    }

    pub fn line_to(&self) -> Result<Option<LineToFunc>, ViewError> {
        self.0.read_callback(Field::line_to as usize)
    }

    pub fn conic_to(&self) -> Result<Option<ConicToFunc>, ViewError> {
        self.0.read_callback(Field::conic_to as usize)
    }

    pub fn cubic_to(&self) -> Result<Option<CubicToFunc>, ViewError> {
        self.0.read_callback(Field::cubic_to as usize)
    }

    pub fn shift(&self) -> Result<i32, ViewError> {
        self.0.get(Field::shift as usize)
    }

    pub fn delta(&self) -> Result<i64, ViewError> {
        self.0.read_long(Field::delta as usize)
    }

    /// A sink that invokes the callbacks in this table.
    ///
    /// # Safety
    ///
    /// The callbacks must accept `user` as their user data pointer.
    pub unsafe fn sink(&self, user: *mut c_void) -> Result<NativeOutlineSink, ViewError> {
        let (move_to, line_to) = (self.move_to()?, self.line_to()?);
        let (conic_to, cubic_to) = (self.conic_to()?, self.cubic_to()?);
        // SAFETY: upheld by the caller
        Ok(unsafe { NativeOutlineSink::new(move_to, line_to, conic_to, cubic_to, user) })
    }
}

/// A writable `FT_Outline_Funcs`, filled in before handing it to the
/// library.
pub struct OutlineFuncsMut<'a>(MemoryViewMut<'a>);

impl<'a> OutlineFuncsMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Result<Self, ViewError> {
        MemoryViewMut::new(bytes, OutlineFuncs::layout()).map(Self)
    }

    /// A write view of the record at `address`.
    ///
    /// # Safety
    ///
    /// See [`MemoryViewMut::from_address`].
    pub unsafe fn from_address(address: *mut c_void) -> Result<Self, ViewError> {
        // SAFETY: upheld by the caller
        unsafe { MemoryViewMut::from_address(address, OutlineFuncs::layout()) }.map(Self)
    }

    pub fn as_funcs(&self) -> OutlineFuncs<'_> {
        OutlineFuncs(self.0.as_view())
    }

    pub fn set_move_to(&mut self, func: Option<MoveToFunc>) -> Result<(), ViewError> {
        self.0.set_callback(Field::move_to as usize, func)
    }

    pub fn set_line_to(&mut self, func: Option<LineToFunc>) -> Result<(), ViewError> {
        self.0.set_callback(Field::line_to as usize, func)
    }

    pub fn set_conic_to(&mut self, func: Option<ConicToFunc>) -> Result<(), ViewError> {
        self.0.set_callback(Field::conic_to as usize, func)
    }

    pub fn set_cubic_to(&mut self, func: Option<CubicToFunc>) -> Result<(), ViewError> {
        self.0.set_callback(Field::cubic_to as usize, func)
    }

    pub fn set_shift(&mut self, shift: i32) -> Result<(), ViewError> {
        self.0.set(Field::shift as usize, shift)
    }

    pub fn set_delta(&mut self, delta: i64) -> Result<(), ViewError> {
        self.0.set_long(Field::delta as usize, delta)
    }

    /// Fill in the callbacks that forward to an `S`, with no transform.
    pub fn set_sink<S: OutlineSink>(&mut self) -> Result<(), ViewError> {
        let rec = OutlineFuncsRec::for_sink::<S>();
        self.set_move_to(rec.move_to)?;
        self.set_line_to(rec.line_to)?;
        self.set_conic_to(rec.conic_to)?;
        self.set_cubic_to(rec.cubic_to)?;
        self.set_shift(0)?;
        self.set_delta(0)
    }
}

/// The host declaration of `FT_Outline_Funcs`.
///
/// This is what gets passed to `FT_Outline_Decompose` together with a user
/// pointer.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct OutlineFuncsRec {
    pub move_to: Option<MoveToFunc>,
    pub line_to: Option<LineToFunc>,
    pub conic_to: Option<ConicToFunc>,
    pub cubic_to: Option<CubicToFunc>,
    pub shift: c_int,
    pub delta: FtPos,
}

impl OutlineFuncsRec {
    /// A table whose callbacks forward to an `S`.
    ///
    /// The user pointer passed along with this table must be a `*mut S`
    /// that is valid for the duration of the decomposition.
    pub fn for_sink<S: OutlineSink>() -> Self {
        OutlineFuncsRec {
            move_to: Some(MoveToFunc(sink_move_to::<S>)),
            line_to: Some(LineToFunc(sink_line_to::<S>)),
            conic_to: Some(ConicToFunc(sink_conic_to::<S>)),
            cubic_to: Some(CubicToFunc(sink_cubic_to::<S>)),
            shift: 0,
            delta: 0,
        }
    }

    /// A view of this table.
    pub fn view(&self) -> OutlineFuncs<'_> {
        // SAFETY: this is the host layout of the record, and it lives as long
        // as the returned view
        unsafe { OutlineFuncs::from_address(self as *const Self as *const c_void) }
    }
}

#[cfg(test)]
mod tests {
    use ft_test_data::layouts;
    use ft_types::{FtError, Target};

    use super::*;
    use crate::callbacks::{Callback, Vector};

    #[test]
    fn golden_layouts() {
        for (target, expected) in layouts::OUTLINE_FUNCS {
            let layout = OUTLINE_FUNCS.layout(*target);
            let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
            pretty_assertions::assert_eq!(offsets, expected.offsets, "{target}");
            assert_eq!(layout.size(), expected.size, "{target}");
        }
    }

    #[test]
    fn delta_width_follows_long_model() {
        let fixed = OUTLINE_FUNCS.layout(Target::LLP64);
        let delta = fixed.fields()[Field::delta as usize];
        assert_eq!((delta.offset, delta.size), (4 * 8 + 4, 4));

        let wide = OUTLINE_FUNCS.layout(Target::LP64);
        let delta = wide.fields()[Field::delta as usize];
        assert_eq!((delta.offset, delta.size), (40, 8));
        assert_eq!(fixed.fields()[..5], wide.fields()[..5]);
    }

    #[test]
    fn host_layout_matches_repr_c() {
        let layout = OutlineFuncs::layout();
        assert_eq!(layout.size(), std::mem::size_of::<OutlineFuncsRec>());
        let native = [
            std::mem::offset_of!(OutlineFuncsRec, move_to),
            std::mem::offset_of!(OutlineFuncsRec, line_to),
            std::mem::offset_of!(OutlineFuncsRec, conic_to),
            std::mem::offset_of!(OutlineFuncsRec, cubic_to),
            std::mem::offset_of!(OutlineFuncsRec, shift),
            std::mem::offset_of!(OutlineFuncsRec, delta),
        ];
        let computed: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(computed, native);
    }

    #[derive(Default)]
    struct Bounds {
        min: Option<Vector>,
        segments: usize,
    }

    impl OutlineSink for Bounds {
        fn move_to(&mut self, to: Vector) -> Result<(), FtError> {
            self.min = Some(to);
            Ok(())
        }

        fn line_to(&mut self, _to: Vector) -> Result<(), FtError> {
            self.segments += 1;
            Ok(())
        }

        fn conic_to(&mut self, _control: Vector, _to: Vector) -> Result<(), FtError> {
            Err(FtError::INVALID_OUTLINE)
        }

        fn cubic_to(&mut self, _c1: Vector, _c2: Vector, _to: Vector) -> Result<(), FtError> {
            self.segments += 1;
            Ok(())
        }
    }

    #[test]
    fn read_back_host_table() {
        let rec = OutlineFuncsRec {
            shift: 2,
            delta: -9,
            ..OutlineFuncsRec::for_sink::<Bounds>()
        };
        let funcs = rec.view();
        assert_eq!(funcs.shift(), Ok(2));
        assert_eq!(funcs.delta(), Ok(-9));
        assert_eq!(
            funcs.line_to().unwrap().map(Callback::to_address),
            rec.line_to.map(Callback::to_address)
        );

        let mut bounds = Bounds::default();
        let user = &mut bounds as *mut Bounds as *mut c_void;
        let mut sink = unsafe { funcs.sink(user) }.unwrap();
        sink.move_to(Vector::new(3, 4)).unwrap();
        sink.line_to(Vector::new(5, 6)).unwrap();
        assert_eq!(
            sink.conic_to(Vector::default(), Vector::default()),
            Err(FtError::INVALID_OUTLINE)
        );
        assert_eq!(bounds.min, Some(Vector::new(3, 4)));
        assert_eq!(bounds.segments, 1);
    }

    #[test]
    fn write_table() {
        let mut buf = vec![0u8; OutlineFuncs::layout().size()];
        let mut funcs = OutlineFuncsMut::new(&mut buf).unwrap();
        funcs.set_sink::<Bounds>().unwrap();
        funcs.set_delta(64).unwrap();
        funcs.set_cubic_to(None).unwrap();
        let read = funcs.as_funcs();
        assert!(read.move_to().unwrap().is_some());
        assert!(read.cubic_to().unwrap().is_none());
        assert_eq!(read.delta(), Ok(64));
        assert_eq!(read.shift(), Ok(0));
    }
}
