pub mod browser;
pub mod config;
pub mod error;
pub mod mcws;
pub mod platform;
pub mod protocol;
