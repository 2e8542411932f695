//! REST API server for Patta document processing.
//!
//! An axum HTTP server in front of [`crate::DocumentProcessor`].
//!
//! # Endpoints
//!
//! - `POST /ocr/process` - Process an uploaded document (multipart field `file`)
//! - `GET /health` - Health check endpoint
//! - `GET /info` - Server and backend information
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use patta_ocr::api::serve;
//!
//! #[tokio::main]
//! async fn main() -> patta_ocr::Result<()> {
//!     serve("0.0.0.0", 8000).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! curl -F "file=@patta.jpg" http://localhost:8000/ocr/process
//! curl http://localhost:8000/health
//! curl http://localhost:8000/info
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use handlers::FILE_FIELD;
pub use server::{
    create_router, create_router_with_limits, parse_size_limits_from_env, serve, serve_default, serve_with_config,
    serve_with_config_and_limits,
};
pub use types::{ApiSizeLimits, ApiState, DEFAULT_MAX_UPLOAD_MB, ErrorResponse, HealthResponse, InfoResponse};
