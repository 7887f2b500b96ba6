use super::PipeOptions;

#[test]
fn propagation_is_enabled_by_default() {
  let options = PipeOptions::default();
  assert!(options.propagate_end());
  assert!(options.propagate_error());
}

#[test]
fn builders_toggle_each_flag_independently() {
  let options = PipeOptions::new().with_propagate_end(false);
  assert!(!options.propagate_end());
  assert!(options.propagate_error());
  assert!(!options.with_propagate_error(false).propagate_error());
}
