//! Adapters for services outside the process
//!
//! Currently only the image store used by the dashboard.

pub mod storage;
