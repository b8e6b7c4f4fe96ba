//! LIPCI storefront backend: dashboard category and message endpoints,
//! public product search, and the storefront client state behind the
//! search widget and the contact form.

pub mod client;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
