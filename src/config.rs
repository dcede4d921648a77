use crate::connection::{ConnectionConfig, DEFAULT_HOST, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_PORT};
use crate::knowledge::{KnowledgeConfig, DEFAULT_RAG_URL};
use clap::Args;
use std::time::Duration;

/// Where the editor plugin listens and how long to wait on it.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Host the editor plugin listens on
    #[arg(long, global = true, env = "UNREAL_MCP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// TCP port the editor plugin listens on
    #[arg(long, global = true, env = "UNREAL_MCP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds to wait for connect, send and each read
    #[arg(
        long,
        global = true,
        env = "UNREAL_MCP_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Upper bound on a single response before the exchange is abandoned
    #[arg(
        long,
        global = true,
        env = "UNREAL_MCP_MAX_RESPONSE_BYTES",
        default_value_t = DEFAULT_MAX_RESPONSE_BYTES
    )]
    pub max_response_bytes: usize,
}

impl ConnectionArgs {
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout_secs),
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Optional knowledge base used for search and rationale recording.
#[derive(Args, Debug, Clone)]
pub struct KnowledgeArgs {
    /// Base URL of the knowledge (RAG) service
    #[arg(long, global = true, env = "RAG_SERVER_URL", default_value = DEFAULT_RAG_URL)]
    pub rag_url: String,

    /// Seconds to wait on the knowledge service
    #[arg(
        long,
        global = true,
        env = "RAG_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rag_timeout_secs: u64,
}

impl KnowledgeArgs {
    pub fn to_config(&self) -> KnowledgeConfig {
        KnowledgeConfig {
            base_url: self.rag_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.rag_timeout_secs),
        }
    }
}
