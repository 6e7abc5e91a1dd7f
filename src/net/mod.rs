//! Outbound network plumbing.
//!
//! Every HTTP request of a run (RPC and routing API) leaves through the same
//! optional proxy, parsed and probed here.

pub mod proxy;

pub use proxy::{ProxyEndpoint, ProxyError};
