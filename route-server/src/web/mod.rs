//! Web layer for the route server.
//!
//! JSON endpoints for route search and for maintaining the locations and
//! transportations it searches over.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppService, AppState};
