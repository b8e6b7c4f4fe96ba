//! Contact messages sent from the public contact form.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/dashboard/messages` | Submit a contact message |
//! | GET | `/api/dashboard/messages` | List received messages, newest first |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgMessageRepository;
pub use services::MessageService;
