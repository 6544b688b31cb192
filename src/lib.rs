//! LG Gram Manager: reads and writes the lg-laptop driver's sysfs attributes,
//! escalating through pkexec when direct writes are denied.

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod elevate;
pub mod error;
pub mod rows;
pub mod sysfs;
pub mod types;
