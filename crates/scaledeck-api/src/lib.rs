// scaledeck-api: Async Rust client for the Headscale REST API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod transport;

pub use client::HeadscaleClient;
pub use error::Error;
pub use transport::{ApiTransport, TlsMode, TransportConfig};
