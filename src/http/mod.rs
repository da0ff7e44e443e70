//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request id, trace, timeout)
//!     → request.rs (request id assignment)
//!     → server.rs handler: extract trace context, run pipeline
//!     → response.rs (status + JSON body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ProblemDetail;
pub use server::{AppState, HttpServer, ServerError};
