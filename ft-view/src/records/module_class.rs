//! `FT_Module_Class`

use std::ffi::{c_void, CStr};

use ft_types::{Fixed, ModuleFlags};

use super::native_record;
use crate::callbacks::{ModuleConstructor, ModuleDestructor, ModuleRequester};
use crate::layout::{FieldType, Signature};
use crate::ViewError;

native_record! {
    /// The class of a FreeType module: its name, version, flags and
    /// lifecycle callbacks.
    ///
    /// Module classes are static data in the library (or in the code that
    /// registers a module), so this record is read-only.
    ModuleClass, MODULE_CLASS = "FT_Module_Class" {
        module_flags: FieldType::ULong,
        module_size: FieldType::Long,
        module_name: FieldType::CString,
        module_version: FieldType::Long,
        module_requires: FieldType::Long,
        module_interface: FieldType::Pointer,
        module_init: FieldType::Callback(Signature::ModuleConstructor),
        module_done: FieldType::Callback(Signature::ModuleDestructor),
        get_interface: FieldType::Callback(Signature::ModuleRequester),
    }
}

impl<'a> ModuleClass<'a> {
    pub fn flags(&self) -> Result<ModuleFlags, ViewError> {
        self.0
            .read_ulong(Field::module_flags as usize)
            .map(ModuleFlags::from_bits_retain)
    }

    /// The size of the module's instance record, in bytes.
    pub fn size(&self) -> Result<i64, ViewError> {
        self.0.read_long(Field::module_size as usize)
    }

    /// The module name, or `None` if the pointer is null.
    pub fn name(&self) -> Result<Option<&'a CStr>, ViewError> {
        self.0.read_c_str(Field::module_name as usize)
    }

    /// The module version, as a 16.16 number.
    pub fn version(&self) -> Result<Fixed, ViewError> {
        self.0.read_fixed(Field::module_version as usize)
    }

    /// The minimum library version this module requires, as a 16.16 number.
    pub fn requires(&self) -> Result<Fixed, ViewError> {
        self.0.read_fixed(Field::module_requires as usize)
    }

    /// The address of the module-specific interface, or zero.
    pub fn interface(&self) -> Result<*const c_void, ViewError> {
        self.0
            .read_pointer(Field::module_interface as usize)
            .map(|address| address as *const c_void)
    }

    pub fn init(&self) -> Result<Option<ModuleConstructor>, ViewError> {
        self.0.read_callback(Field::module_init as usize)
    }

    pub fn done(&self) -> Result<Option<ModuleDestructor>, ViewError> {
        self.0.read_callback(Field::module_done as usize)
    }

    pub fn get_interface(&self) -> Result<Option<ModuleRequester>, ViewError> {
        self.0.read_callback(Field::get_interface as usize)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::c_long;

    use ft_test_data::layouts;
    use ft_types::FtError;

    use super::*;
    use crate::callbacks::{Callback, ModuleHooks};
    use crate::handle::ModuleHandle;
    use crate::NativeRecord;

    // the host declaration of FT_Module_Class
    #[repr(C)]
    struct ModuleClassRec {
        module_flags: std::ffi::c_ulong,
        module_size: c_long,
        module_name: *const std::ffi::c_char,
        module_version: c_long,
        module_requires: c_long,
        module_interface: *const c_void,
        module_init: Option<ModuleConstructor>,
        module_done: Option<ModuleDestructor>,
        get_interface: Option<ModuleRequester>,
    }

    #[test]
    fn golden_layouts() {
        for (target, expected) in layouts::MODULE_CLASS {
            let layout = MODULE_CLASS.layout(*target);
            let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
            pretty_assertions::assert_eq!(offsets, expected.offsets, "{target}");
            assert_eq!(layout.size(), expected.size, "{target}");
        }
    }

    #[test]
    fn host_layout_matches_repr_c() {
        let layout = ModuleClass::layout();
        assert_eq!(layout.size(), std::mem::size_of::<ModuleClassRec>());
        let native = [
            std::mem::offset_of!(ModuleClassRec, module_flags),
            std::mem::offset_of!(ModuleClassRec, module_size),
            std::mem::offset_of!(ModuleClassRec, module_name),
            std::mem::offset_of!(ModuleClassRec, module_version),
            std::mem::offset_of!(ModuleClassRec, module_requires),
            std::mem::offset_of!(ModuleClassRec, module_interface),
            std::mem::offset_of!(ModuleClassRec, module_init),
            std::mem::offset_of!(ModuleClassRec, module_done),
            std::mem::offset_of!(ModuleClassRec, get_interface),
        ];
        let computed: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(computed, native);
    }

    struct Hinter;

    impl ModuleHooks for Hinter {
        fn init(_module: ModuleHandle) -> Result<(), FtError> {
            Err(FtError::UNIMPLEMENTED_FEATURE)
        }
    }

    #[test]
    fn read_native_class() {
        let interface = 7u32;
        let class = ModuleClassRec {
            module_flags: 0x0000_0104,
            module_size: 96,
            module_name: c"autohinter".as_ptr(),
            module_version: 0x0001_8000,
            module_requires: 0x0002_0000,
            module_interface: &interface as *const u32 as *const c_void,
            module_init: Some(ModuleConstructor::of::<Hinter>()),
            module_done: None,
            get_interface: Some(ModuleRequester::of::<Hinter>()),
        };
        let view = unsafe { ModuleClass::from_address(&class as *const _ as *const c_void) };
        let flags = view.flags().unwrap();
        assert!(flags.contains(ModuleFlags::HINTER));
        assert!(flags.contains(ModuleFlags::DRIVER_SCALABLE));
        assert!(!flags.is_font_driver());
        assert_eq!(view.size(), Ok(96));
        assert_eq!(view.name(), Ok(Some(c"autohinter")));
        assert_eq!(view.version(), Ok(Fixed::from_f64(1.5)));
        assert_eq!(view.requires(), Ok(Fixed::from_i32(2)));
        assert_eq!(view.interface(), Ok(class.module_interface));
        assert!(view.done().unwrap().is_none());

        let init = view.init().unwrap().unwrap();
        assert_eq!(
            init.to_address(),
            class.module_init.map(Callback::to_address).unwrap()
        );
        let module = ModuleHandle::from_raw(&interface as *const u32 as *mut c_void);
        let status = unsafe { init.call(module) };
        assert_eq!(status, FtError::UNIMPLEMENTED_FEATURE);

        let requester = view.get_interface().unwrap().unwrap();
        let found = unsafe { requester.call(module, c"any".as_ptr()) };
        assert!(found.is_null());
    }

    #[test]
    fn copied_class_hides_pointers() {
        let layout = ModuleClass::layout();
        let mut buf = ft_test_data::NativeBuffer::zeroed(layout.size());
        let name = layout.fields()[Field::module_name as usize];
        buf.write_int(name.offset, name.kind, ft_types::IntValue::Unsigned(0x1000));
        let view = ModuleClass::new(buf.as_slice()).unwrap();
        assert_eq!(
            view.name(),
            Err(ViewError::ForeignPointer("module_name"))
        );
        assert_eq!(view.view().read_pointer(Field::module_name as usize), Ok(0x1000));
    }
}
