mod local_shared;
mod local_weak;
mod settle_once;
mod settle_once_listener;
mod shared_access;

pub use local_shared::LocalShared;
pub use local_weak::LocalWeak;
pub use settle_once::SettleOnce;
pub use settle_once_listener::SettleOnceListener;
pub use shared_access::SharedAccess;
