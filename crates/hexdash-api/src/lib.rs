// hexdash-api: Async Rust client for the HexStrike process-management API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{ApiClient, ControlAction};
pub use error::Error;
pub use models::{DashboardSnapshot, ProcessRecord, ProcessStatus, SystemLoad};
pub use transport::TransportConfig;
