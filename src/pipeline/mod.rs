//! The six-step swap run.
//!
//! # Data Flow
//! ```text
//! SwapContext (account, tokens, router, amount in wei)
//!     → approve (if allowance == 0) → wrap → quote → assemble → swap → confirm
//!     → SwapReport
//! ```
//!
//! Chain access goes through `ChainRpc`, the routing API through
//! `SwapRouter`, and every wait through `Sleeper`, so a run can be driven
//! entirely by in-memory fakes.

pub mod context;
pub mod error;
pub mod runner;
pub mod steps;

pub use context::{PipelineSettings, SwapContext};
pub use error::{SwapError, SwapResult};
pub use runner::{SwapPipeline, SwapReport};
pub use steps::SwapStep;
