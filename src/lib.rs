// Bayarcash MCP Library
//
// Exposes the Bayarcash payment gateway as MCP tools and resources.
// The checksum module carries the only real logic: signing outbound payment
// intents and verifying inbound webhook callbacks.

pub mod channels;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod validation;

// Re-export public types and functions
pub use checksum::{sign, verify, CallbackPayload, CallbackValue, ChecksumError, ChecksumSigner};
pub use client::BayarcashClient;
pub use config::{ApiVersion, BayarcashConfig};
pub use error::Error;
pub use mcp::MCPServer;
