pub mod breakdown;
pub mod summary;
pub mod version;
pub mod watch;
