//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers, graceful shutdown)
//!     → request.rs (deploy request shape, request ID generation)
//!     → [service handler validates and acts]
//!     → forward.rs (downstream hop with bounded timeout)
//!     → response.rs (envelope shaping, error → status mapping)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardClient, ForwardError, Forwarded};
pub use request::{DeployRequest, X_API_KEY};
pub use response::{ApiError, Envelope};
pub use server::HttpServer;
