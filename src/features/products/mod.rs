//! Public product catalog reads: search-as-you-type and product detail.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/public/products/search?query=&limit=` | Case-insensitive search by name or code |
//! | GET | `/api/public/products/{code}` | Product detail by code |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgProductRepository;
pub use services::ProductService;
