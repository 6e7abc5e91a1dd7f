//! Single-run token swap through the Odos router.

pub mod config;
pub mod net;

pub mod blockchain;
pub mod pipeline;
pub mod quoting;

pub mod lifecycle;
pub mod observability;

pub use config::schema::SwapConfig;
pub use lifecycle::Shutdown;
pub use pipeline::SwapPipeline;
