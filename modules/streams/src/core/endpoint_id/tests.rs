use alloc::string::ToString;

use super::EndpointId;

#[test]
fn identifiers_are_unique_and_increasing() {
  let first = EndpointId::next();
  let second = EndpointId::next();
  assert_ne!(first, second);
  assert!(second.value() > first.value());
}

#[test]
fn display_uses_the_ep_prefix() {
  let id = EndpointId::next();
  assert_eq!(id.to_string(), alloc::format!("ep-{}", id.value()));
}
