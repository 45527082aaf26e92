//! Command implementations that need more than a store call.

pub mod init;
