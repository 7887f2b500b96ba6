use super::SettleOnce;

#[test]
fn first_settle_wins() {
  let slot = SettleOnce::new();
  assert!(slot.settle(1_u32));
  assert!(!slot.settle(2_u32));
  assert_eq!(slot.try_take(), Some(1));
}

#[test]
fn taking_keeps_the_slot_settled() {
  let slot = SettleOnce::new();
  assert!(!slot.is_settled());
  assert!(slot.settle("done"));
  assert_eq!(slot.try_take(), Some("done"));
  assert!(slot.is_settled());
  assert_eq!(slot.try_take(), None);
  assert!(!slot.settle("again"));
}

#[test]
fn clones_share_the_slot() {
  let slot = SettleOnce::new();
  let observer = slot.clone();
  assert!(slot.settle(9_i64));
  assert!(observer.is_settled());
  assert_eq!(observer.try_take(), Some(9));
}
