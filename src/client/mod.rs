//! Storefront client side: the debounced product search widget and the
//! contact form state, talking to the HTTP API through [`StorefrontClient`].

mod api_client;
mod contact_form;
mod search;

pub use api_client::{MessageSender, ProductLookup, StorefrontClient};
pub use contact_form::{Alert, ContactForm, Severity};
pub use search::{DebouncedSearch, InputEffect, SearchPhase, SearchRequest, SearchWidget};

use thiserror::Error;

/// Errors seen by storefront clients
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status and an `{ error }` body
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}
