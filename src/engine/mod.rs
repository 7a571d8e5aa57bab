//! Copy engine - tree traversal and retry handling

pub mod copier;
pub mod retry;

pub use copier::TreeCopier;
pub use retry::RetryPolicy;
