//! Client layer for chatline.
//!
//! Provides the transport seam and its HTTP implementation, the query
//! orchestrator, the request gate, and the session that ties them
//! together for a caller.

pub mod http;
pub mod orchestrator;
pub mod session;
pub mod throttle;
pub mod transport;

pub use http::HttpTransport;
pub use orchestrator::QueryOrchestrator;
pub use session::Session;
pub use throttle::RequestGate;
pub use transport::{ByteStream, Transport, TransportResponse};
