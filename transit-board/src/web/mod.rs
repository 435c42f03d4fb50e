//! Web layer for the transit board.
//!
//! Serves the cached boards, frontend configuration and health as JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
