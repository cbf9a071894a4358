mod common;

use common::{decode16, try_decode16};
use tracing_subscriber::filter::LevelFilter;

#[test]
fn decoding_emits_trace_events_without_affecting_results() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .try_init();

    let inst = decode16(&[0x83, 0xE8, 0xFF]);
    assert_eq!(inst.node_name().to_string(), "SubSigned16");
    assert!(try_decode16(&[0xFF, 0xF8]).is_err());
}
