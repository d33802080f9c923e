//! Stdio session server.
//!
//! Reads newline-delimited JSON tool calls (`{"tool": "...", "arguments": {...}}`)
//! and answers each with exactly one JSON line. The server owns one dispatcher,
//! and through it one orchestrator, for the whole session.

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use whatif_shared::ToolCall;
use whatif_shared::protocol::error_json;

use super::dispatcher::CommandDispatcher;

pub struct SessionServer {
    dispatcher: CommandDispatcher,
}

impl SessionServer {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve the session over the process's stdin and stdout
    pub async fn serve_stdio(&mut self) -> Result<usize> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Answer requests until the reader reaches end of input.
    ///
    /// Returns the number of requests answered. Blank lines are skipped; a line
    /// that is not valid UTF-8 or JSON is answered with an error object.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Session started");
        let mut buf = Vec::new();
        let mut handled = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .context("Failed to read request line")?;
            if read == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim()),
                Err(e) => {
                    warn!("Rejected request that is not valid UTF-8: {}", e);
                    error_json(format!("Invalid request: {}", e))
                }
            };

            let mut encoded =
                serde_json::to_string(&response).context("Failed to encode response")?;
            encoded.push('\n');

            writer
                .write_all(encoded.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
            handled += 1;
        }

        info!("Session ended after {} request(s)", handled);
        Ok(handled)
    }

    /// Decode and dispatch one request line
    pub fn handle_line(&mut self, line: &str) -> Value {
        match serde_json::from_str::<ToolCall>(line) {
            Ok(call) => {
                debug!("Request for tool '{}'", call.tool);
                self.dispatcher.dispatch_tool(&call.tool, call.arguments)
            }
            Err(e) => {
                warn!("Rejected malformed request: {}", e);
                error_json(format!("Invalid request: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::stub_wiring;
    use crate::scenario::ScenarioOrchestrator;

    fn stub_server() -> SessionServer {
        let (repository, runner) = stub_wiring();
        SessionServer::new(CommandDispatcher::new(ScenarioOrchestrator::new(
            Box::new(runner),
            Box::new(repository),
        )))
    }

    #[test]
    fn test_malformed_line_yields_error_object() {
        let mut server = stub_server();

        let response = server.handle_line("not json");
        let message = response["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid request:"));
    }

    #[tokio::test]
    async fn test_one_response_line_per_request() {
        let mut server = stub_server();
        let input = b"{\"tool\": \"get_available_scenarios\"}\n\n{\"tool\": \"nope\"}\n";
        let mut output = Vec::new();

        let handled = server.serve(&input[..], &mut output).await.unwrap();

        assert_eq!(handled, 2);
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["scenarios"][0]["name"], "base");
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], "Unknown tool 'nope'.");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_keeps_session_alive() {
        let mut server = stub_server();
        let mut input = Vec::new();
        input.extend_from_slice(
            b"{\"tool\": \"override_input\", \"arguments\": {\"source\": \"rates\", \"field\": \"rate\", \"value\": 6.0}}\n",
        );
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"tool\": \"get_active_overrides\"}");
        let mut output = Vec::new();

        let handled = server.serve(&input[..], &mut output).await.unwrap();

        assert_eq!(handled, 3);
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1]["error"].as_str().unwrap().starts_with("Invalid request:"));
        assert_eq!(lines[2][0]["field"], "rate");
        assert_eq!(lines[2][0]["value"], 6.0);
    }
}
