//! Web application: routes, shared state, request decoding, rendering.

pub mod error;
pub mod form;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::router;
pub use state::AppState;
