//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Account → RPC client (+ chain check) → routing client
//!     → SwapPipeline
//!
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → pipeline abandons the current step
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{cancelled, Shutdown};
pub use startup::{bootstrap, StartupError, StartupOptions};
