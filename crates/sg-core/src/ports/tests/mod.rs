
use mock_ports::{MockClock, MockHasher};

use crate::slot::Slot;
use crate::ports::ClockPort;

#[test]
fn now_secs_floors_milliseconds() {
    let mut clock = MockClock::new();
    clock.expect_now_ms().return_const(1_700_000_000_999_i64);
    assert_eq!(clock.now_secs(), 1_700_000_000);
}

#[test]
fn text_slot_without_hash_skips_dedup() {
    let mut hasher = MockHasher::new();
    hasher
        .expect_hash_bytes()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("hasher offline")));

    let slot = Slot::with_text("anything", 1);
    assert_eq!(slot.content_hash(&hasher), None);
}

#[test]
fn file_slot_hash_does_not_consult_hasher() {
    let mut hasher = MockHasher::new();
    hasher.expect_hash_bytes().never();

    let name = format!("{}.png", "0f".repeat(32));
    let slot = Slot::with_file(name, 1);
    assert!(slot.content_hash(&hasher).is_some());
}
