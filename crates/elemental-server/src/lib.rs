//! Elemental Server - HTTP front-end for the recipe path finder
//!
//! Translates JSON requests into searches and streams progress over SSE.

pub mod error;
pub mod handlers;
pub mod payload;
pub mod server;
pub mod sse;

pub use error::ApiError;
pub use server::{run_server, AppState, ServerConfig};
pub use sse::create_router;
