//! Configuring the process target before first use.
//!
//! This lives in its own test binary: the target can only be set once per
//! process, and must be set before any record layout is resolved.

use ft_test_data::NativeBuffer;
use ft_view::records::SizeMetrics;
use ft_view::types::{self, F26Dot6, IntKind, IntValue, Target};
use ft_view::NativeRecord;

#[test]
fn configured_target_drives_record_layouts() {
    let _ = env_logger::builder().is_test(true).try_init();

    // a memory image captured from a 64-bit windows process
    assert_eq!(types::set_process_target(Target::LLP64), Ok(()));
    assert_eq!(types::process_target(), Target::LLP64);
    assert_eq!(
        types::set_process_target(Target::LP64),
        Err(Target::LLP64)
    );

    let layout = SizeMetrics::layout();
    assert_eq!(layout.size(), 28);
    assert_eq!(ft_view::size_of(SizeMetrics::descriptor()), 28);

    let buf = NativeBuffer::new()
        .push(12u16)
        .push(12u16)
        .push_int(IntKind::I32, IntValue::Signed(0x6000))
        .push_int(IntKind::I32, IntValue::Signed(0x6000))
        .push_int(IntKind::I32, IntValue::Signed(11 * 64))
        .push_int(IntKind::I32, IntValue::Signed(-3 * 64))
        .push_int(IntKind::I32, IntValue::Signed(14 * 64))
        .push_int(IntKind::I32, IntValue::Signed(12 * 64))
        .finish(layout.align());
    assert_eq!(buf.len(), 28);

    let metrics = SizeMetrics::new(buf.as_slice()).unwrap();
    assert_eq!(metrics.y_ppem(), Ok(12));
    assert_eq!(metrics.descender(), Ok(F26Dot6::from_i32(-3)));
    assert_eq!(metrics.max_advance(), Ok(F26Dot6::from_i32(12)));
}
