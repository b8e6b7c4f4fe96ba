//! Feature modules, one per API resource

pub mod categories;
pub mod messages;
pub mod products;
