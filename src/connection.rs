//! One-shot JSON exchanges with the editor plugin.
//!
//! Every command opens its own TCP connection, writes the JSON envelope,
//! reads until the accumulated bytes parse as one JSON document (the plugin
//! sends no length prefix or delimiter) and drops the connection. There is no
//! pooling and no retry: a command is delivered at most once.

use crate::command::{Command, JsonMap};
use crate::error_codes::{parse_error_response, RemoteError};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 55557;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
const READ_CHUNK_SIZE: usize = 4096;
const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Applied separately to connect, send and every read.
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Connect => "connecting",
            Phase::Send => "sending the command",
            Phase::Receive => "waiting for the response",
        })
    }
}

/// Failures that happen before a response could be read.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Command name must not be empty")]
    EmptyCommand,
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("Timed out after {after:?} while {phase}")]
    Timeout { phase: Phase, after: Duration },
    #[error("I/O error while {phase}: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },
    #[error("Connection closed without a response")]
    NoResponse,
    #[error("Connection closed after {received} bytes without a complete JSON response: {source}")]
    Truncated {
        received: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Response exceeded {limit} bytes without forming a complete JSON document")]
    Oversized { limit: usize },
    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of one exchange, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub command: String,
    pub params: JsonMap,
    /// `None` when the exchange failed before a response arrived.
    pub response: Option<JsonValue>,
    pub error: Option<String>,
    pub error_code: Option<i64>,
    pub duration_ms: f64,
}

impl CommandOutcome {
    fn from_response(command: Command, response: JsonValue, started: Instant) -> Self {
        let success = response.get("status").and_then(JsonValue::as_str) == Some(SUCCESS_STATUS);
        let (error, error_code) = if success {
            (None, None)
        } else {
            (
                response
                    .get("error")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                response.get("error_code").and_then(JsonValue::as_i64),
            )
        };
        Self {
            success,
            command: command.name,
            params: command.params,
            response: Some(response),
            error,
            error_code,
            duration_ms: elapsed_ms(started),
        }
    }

    fn from_transport_error(command: Command, error: &TransportError, started: Instant) -> Self {
        Self {
            success: false,
            command: command.name,
            params: command.params,
            response: None,
            error: Some(error.to_string()),
            error_code: None,
            duration_ms: elapsed_ms(started),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.response.is_none()
    }

    pub fn result(&self) -> Option<&JsonValue> {
        self.response.as_ref()?.get("result")
    }

    pub fn error_details(&self) -> Option<&JsonValue> {
        self.response.as_ref()?.get("details")
    }

    /// The plugin's classified failure, if the plugin answered with one.
    pub fn remote_error(&self) -> Option<RemoteError> {
        if self.success {
            return None;
        }
        parse_error_response(self.response.as_ref()?)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Client for the editor plugin. Holds configuration only, so it can be
/// shared freely between concurrent tool calls.
#[derive(Debug, Clone)]
pub struct UnrealConnection {
    config: ConnectionConfig,
}

impl UnrealConnection {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Sends one command and waits for its response. Never fails: transport
    /// problems come back as an unsuccessful outcome with no response.
    pub async fn send_command(&self, command: impl Into<String>, params: JsonMap) -> CommandOutcome {
        let started = Instant::now();
        let command = Command::new(command, params);
        tracing::debug!(command = %command.name, "Sending command to Unreal Engine");

        match self.exchange(&command).await {
            Ok(response) => {
                let outcome = CommandOutcome::from_response(command, response, started);
                tracing::debug!(
                    command = %outcome.command,
                    success = outcome.success,
                    duration_ms = outcome.duration_ms,
                    "Received response from Unreal Engine"
                );
                outcome
            }
            Err(err) => {
                tracing::warn!(command = %command.name, error = %err, "Command failed");
                CommandOutcome::from_transport_error(command, &err, started)
            }
        }
    }

    pub async fn ping(&self) -> CommandOutcome {
        self.send_command("ping", JsonMap::new()).await
    }

    async fn exchange(&self, command: &Command) -> Result<JsonValue, TransportError> {
        if command.name.is_empty() {
            return Err(TransportError::EmptyCommand);
        }
        let payload = command.to_bytes()?;
        let after = self.config.timeout;
        let addr = self.config.address();

        let mut stream = timeout(after, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::Timeout {
                phase: Phase::Connect,
                after,
            })?
            .map_err(|source| TransportError::Connect { addr, source })?;

        timeout(after, stream.write_all(&payload))
            .await
            .map_err(|_| TransportError::Timeout {
                phase: Phase::Send,
                after,
            })?
            .map_err(|source| TransportError::Io {
                phase: Phase::Send,
                source,
            })?;

        // `stream` is dropped, and the socket closed, however this returns.
        read_json_document(&mut stream, after, self.config.max_response_bytes).await
    }
}

/// Reads until the buffered bytes form one complete JSON document or the
/// peer closes the connection.
///
/// The plugin writes exactly one object per connection, so the first
/// successful parse ends the read. Each read waits at most `per_read`, and
/// the buffer never grows past `max_bytes`.
pub async fn read_json_document<R>(
    reader: &mut R,
    per_read: Duration,
    max_bytes: usize,
) -> Result<JsonValue, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = timeout(per_read, reader.read(&mut chunk))
            .await
            .map_err(|_| TransportError::Timeout {
                phase: Phase::Receive,
                after: per_read,
            })?
            .map_err(|source| TransportError::Io {
                phase: Phase::Receive,
                source,
            })?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Ok(value) = serde_json::from_slice::<JsonValue>(&buffer) {
            return Ok(value);
        }
        if buffer.len() >= max_bytes {
            return Err(TransportError::Oversized { limit: max_bytes });
        }
    }

    if buffer.is_empty() {
        return Err(TransportError::NoResponse);
    }
    serde_json::from_slice(&buffer).map_err(|source| TransportError::Truncated {
        received: buffer.len(),
        source,
    })
}
