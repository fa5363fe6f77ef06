// MCP Server Implementation
//
// Reads JSON-RPC messages from stdin line by line, dispatches them and
// writes each response as a single line on stdout. Logging goes to stderr so
// it never interleaves with protocol traffic.

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::client::BayarcashClient;
use crate::mcp::protocol::{dispatch, error_response, PARSE_ERROR};

/// MCP Server for handling Model Context Protocol requests
pub struct MCPServer {
    client: BayarcashClient,
}

impl MCPServer {
    pub fn new(client: BayarcashClient) -> Self {
        Self { client }
    }

    /// Run the MCP server with stdio transport
    pub async fn run(self) -> Result<()> {
        info!("Starting MCP server with stdio transport");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve until the reader reaches EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Err(e) = self.handle_line(trimmed, &mut writer).await {
                        error!("Error handling request: {}", e);
                    }
                }
                Err(e) => {
                    error!("Error reading from stdin: {}", e);
                    break;
                }
            }
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle a single MCP message
    async fn handle_line<W>(&self, line: &str, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let response = match serde_json::from_str::<Value>(line) {
            Ok(request) => match dispatch(&self.client, &request).await {
                Some(response) => response,
                None => return Ok(()),
            },
            Err(e) => {
                error!("Failed to parse JSON request: {}", e);
                error_response(&Value::Null, PARSE_ERROR, "Parse error")
            }
        };

        let response_str = serde_json::to_string(&response)?;
        writer.write_all(response_str.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        Ok(())
    }
}
