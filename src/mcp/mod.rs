// MCP (Model Context Protocol) server for Bayarcash
//
// A small hand-written JSON-RPC implementation over stdio: one message per
// line in, one response per line out.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::MCPServer;
