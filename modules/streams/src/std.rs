mod drive_until;

pub use drive_until::drive_until;
