//! Adapters - concrete implementations behind the ports

pub mod auth;
pub mod drive_http;
pub mod memory;

pub use auth::Authenticator;
pub use drive_http::DriveHttpAdapter;
pub use memory::{FaultKind, MemoryDriveAdapter};
