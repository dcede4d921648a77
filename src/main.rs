use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use error::Result;
use rmcp::ServiceExt;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{self, EnvFilter};

mod command;
mod config;
mod connection;
mod error;
mod error_codes;
mod harness;
mod install;
mod knowledge;
#[cfg(test)]
mod test_support;
mod tools;
mod unreal_server;

use config::{ConnectionArgs, KnowledgeArgs};
use connection::UnrealConnection;
use error_codes::ErrorCode;
use knowledge::KnowledgeClient;
use unreal_server::UnrealEditorServer;

/// MCP server bridging AI agents to the Unreal Editor plugin
/// Run without arguments to register it with installed MCP clients
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    knowledge: KnowledgeArgs,

    /// Run the MCP server using stdio transport (legacy flag maintained for backwards compatibility)
    #[arg(long = "stdio")]
    legacy_stdio: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server using stdio transport
    #[command(alias = "stdio")]
    Server,
    /// Send a single command to the editor plugin and print the outcome
    Send {
        /// Command name, e.g. ping or create_blueprint
        command: String,
        /// Parameters as a JSON object
        #[arg(long, default_value = "{}", value_parser = parse_params)]
        params: JsonMap<String, JsonValue>,
    },
    /// Run the smoke scenario against a live editor and clean up after it
    Smoke,
    /// Describe a plugin error code
    ExplainError {
        #[arg(allow_negative_numbers = true)]
        code: i64,
    },
    /// Interactively register this server with MCP clients
    Install,
}

fn parse_params(raw: &str) -> Result<JsonMap<String, JsonValue>, String> {
    match serde_json::from_str(raw) {
        Ok(JsonValue::Object(params)) => Ok(params),
        Ok(other) => Err(format!("params must be a JSON object, got {other}")),
        Err(error) => Err(format!("invalid JSON: {error}")),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let command = if args.legacy_stdio {
        Some(Command::Server)
    } else {
        args.command
    };
    let connection = || Arc::new(UnrealConnection::new(args.connection.to_config()));

    match command {
        Some(Command::Server) => {
            run_server(connection(), &args.knowledge).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Send { command, params }) => {
            let outcome = connection().send_command(command, params).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(exit_code(outcome.success))
        }
        Some(Command::Smoke) => {
            let summary = harness::run_smoke(connection()).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(exit_code(summary.failed == 0))
        }
        Some(Command::ExplainError { code }) => {
            println!("{}", explain_error(code));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Install) => {
            install::interactive_install().await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            install::install().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn explain_error(code: i64) -> String {
    let known = ErrorCode::from_code(code);
    let error = ErrorCode::from(code);
    let report = json!({
        "code": code,
        "known": known.is_some(),
        "name": error.name(),
        "category": error_codes::error_category(code).as_str(),
        "message": error.friendly_message(),
    });
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}

async fn run_server(connection: Arc<UnrealConnection>, knowledge: &KnowledgeArgs) -> Result<()> {
    tracing::debug!("Debug MCP tracing enabled");
    tracing::info!(
        plugin = %connection.config().address(),
        rag = %knowledge.rag_url,
        "Starting Unreal Editor MCP server"
    );

    let knowledge = KnowledgeClient::new(knowledge.to_config())
        .wrap_err("Failed to build knowledge client")?;

    let service = UnrealEditorServer::new(connection, Arc::new(knowledge))
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;
    service.waiting().await?;

    tracing::info!("Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_install() {
        let args = Args::try_parse_from(["unreal-editor-mcp"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.legacy_stdio);
    }

    #[test]
    fn stdio_alias_runs_server() {
        let args = Args::try_parse_from(["unreal-editor-mcp", "stdio"]).unwrap();
        assert!(matches!(args.command, Some(Command::Server)));
    }

    #[test]
    fn send_parses_params_object() {
        let args = Args::try_parse_from([
            "unreal-editor-mcp",
            "send",
            "create_blueprint",
            "--params",
            r#"{"name": "BP_Door", "parent_class": "Actor"}"#,
        ])
        .unwrap();
        let Some(Command::Send { command, params }) = args.command else {
            panic!("expected send");
        };
        assert_eq!(command, "create_blueprint");
        assert_eq!(params["name"], "BP_Door");
    }

    #[test]
    fn send_rejects_non_object_params() {
        assert!(Args::try_parse_from(["unreal-editor-mcp", "send", "ping", "--params", "[1]"]).is_err());
        assert!(Args::try_parse_from(["unreal-editor-mcp", "send", "ping", "--params", "{"]).is_err());
    }

    #[test]
    fn connection_flags_apply_after_subcommand() {
        let args =
            Args::try_parse_from(["unreal-editor-mcp", "smoke", "--port", "6001"]).unwrap();
        assert_eq!(args.connection.port, 6001);
    }

    #[test]
    fn explains_known_and_unknown_codes() {
        let known: JsonValue = serde_json::from_str(&explain_error(1200)).unwrap();
        assert_eq!(known["name"], "BLUEPRINT_NOT_FOUND");
        assert_eq!(known["category"], "Blueprint");
        assert_eq!(known["known"], true);

        let unknown: JsonValue = serde_json::from_str(&explain_error(42)).unwrap();
        assert_eq!(unknown["category"], "Unknown");
        assert_eq!(unknown["known"], false);
    }
}
