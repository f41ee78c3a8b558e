//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → handlers.rs (decode form, call feed service / collaborators)
//!     → response.rs (JSON body or mapped error status)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::{ApiError, ChangelogResponse, MessageResponse};
pub use server::{build_router, AppState, HttpServer};
