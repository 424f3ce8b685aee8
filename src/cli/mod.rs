//! CLI command implementations

pub mod collection;
pub mod init;
pub mod rewards;
