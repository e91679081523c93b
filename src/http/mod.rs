//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, concurrency limit, timeout)
//!     → request.rs (assign request ID, trace span)
//!     → /_router/* → admin control API
//!     → anything else → dispatch: active route table resolves the path
//!     → response.rs (dispatch record or JSON error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ApiError, DispatchRecord, ErrorBody};
pub use server::{AppState, HttpServer, RouterState};
