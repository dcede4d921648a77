//! Registers this binary as an MCP server in desktop client configs.

use color_eyre::eyre::{eyre, Result, WrapErr};
use color_eyre::Help;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under `mcpServers` this binary registers itself as.
pub const SERVER_NAME: &str = "Unreal Editor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpClient {
    Claude,
    Cursor,
}

impl McpClient {
    pub const ALL: [McpClient; 2] = [McpClient::Claude, McpClient::Cursor];

    pub fn label(self) -> &'static str {
        match self {
            McpClient::Claude => "Claude",
            McpClient::Cursor => "Cursor",
        }
    }

    /// Location of the client's MCP server table on this OS.
    pub fn config_path(self) -> Result<PathBuf> {
        match self {
            McpClient::Claude if cfg!(target_os = "windows") => {
                let roaming = env::var_os("APPDATA")
                    .ok_or_else(|| eyre!("APPDATA is not set"))?;
                Ok(PathBuf::from(roaming).join("Claude/claude_desktop_config.json"))
            }
            McpClient::Claude if cfg!(target_os = "macos") => Ok(home_dir()?
                .join("Library/Application Support/Claude/claude_desktop_config.json")),
            McpClient::Claude => Ok(home_dir()?.join(".config/Claude/claude_desktop_config.json")),
            McpClient::Cursor => Ok(home_dir()?.join(".cursor/mcp.json")),
        }
    }

    fn register(self, exe: &Path) -> Result<PathBuf> {
        let path = self.config_path()?;
        write_server_entry(&path, exe)
            .wrap_err_with(|| format!("Could not register with {}", self.label()))?;
        Ok(path)
    }
}

fn home_dir() -> Result<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .find_map(env::var_os)
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("Neither HOME nor USERPROFILE is set"))
}

/// Inserts or replaces our entry in the `mcpServers` table at `path`,
/// leaving every other key untouched. Missing files and folders are created.
pub fn write_server_entry(path: &Path, exe: &Path) -> Result<()> {
    let mut document = if path.exists() {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str::<JsonMap<String, JsonValue>>(&raw)
            .wrap_err_with(|| format!("{} does not hold a JSON object", path.display()))?
    } else {
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)
                .wrap_err_with(|| format!("Could not create {}", folder.display()))?;
        }
        JsonMap::new()
    };

    let servers = document
        .entry("mcpServers")
        .or_insert_with(|| json!({}));
    if !servers.is_object() {
        *servers = json!({});
    }
    servers[SERVER_NAME] = json!({
        "command": exe,
        "args": ["server"],
    });

    let rendered = serde_json::to_string_pretty(&document)?;
    fs::write(path, rendered).wrap_err_with(|| format!("Could not write {}", path.display()))?;
    tracing::debug!(config = %path.display(), "Registered {SERVER_NAME}");
    Ok(())
}

/// Registers with every supported client; fails only if none succeeded.
pub async fn install() -> Result<()> {
    let exe = env::current_exe()?;
    let mut registered = Vec::new();
    let mut failures = Vec::new();

    for client in McpClient::ALL {
        match client.register(&exe) {
            Ok(path) => {
                println!("{}: {}", client.label(), path.display());
                registered.push(client.label());
            }
            Err(error) => failures.push(error),
        }
    }

    if registered.is_empty() {
        return Err(failures
            .into_iter()
            .fold(eyre!("No MCP client could be configured"), |report, e| {
                report.note(e)
            }));
    }
    for failure in &failures {
        tracing::warn!("{failure:#}");
    }

    println!(
        "\nRegistered \"{SERVER_NAME}\" with: {}\n\
         Restart those clients to pick up the change. The editor plugin must be \
         enabled in your Unreal project and listening (default 127.0.0.1:55557).",
        registered.join(", ")
    );

    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("cmd.exe").args(["/c", "pause"]).status();
    }
    Ok(())
}

/// Menu-driven registration, one client at a time.
pub async fn interactive_install() -> Result<()> {
    use dialoguer::{theme::ColorfulTheme, Select};

    let exe = env::current_exe()?;
    let mut items: Vec<String> = McpClient::ALL
        .iter()
        .map(|client| format!("Register with {}", client.label()))
        .collect();
    items.push("Exit".to_string());

    let theme = ColorfulTheme::default();
    while let Some(choice) = Select::with_theme(&theme)
        .with_prompt("Which MCP client should launch the Unreal Editor server?")
        .items(&items[..])
        .default(0)
        .interact_opt()?
    {
        let Some(client) = McpClient::ALL.get(choice).copied() else {
            break;
        };
        match client.register(&exe) {
            Ok(path) => println!("Updated {}\n", path.display()),
            Err(error) => eprintln!("{error:#}\n"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> JsonValue {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn creates_missing_config_with_server_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mcp.json");

        write_server_entry(&path, Path::new("/opt/unreal-mcp")).unwrap();

        assert_eq!(
            read(&path),
            json!({"mcpServers": {"Unreal Editor": {"command": "/opt/unreal-mcp", "args": ["server"]}}})
        );
    }

    #[test]
    fn keeps_other_servers_and_replaces_own_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claude_desktop_config.json");
        fs::write(
            &path,
            json!({
                "theme": "dark",
                "mcpServers": {
                    "other": {"command": "other-server"},
                    "Unreal Editor": {"command": "/old/path", "args": ["--stdio"]},
                },
            })
            .to_string(),
        )
        .unwrap();

        write_server_entry(&path, Path::new("/new/path")).unwrap();

        let written = read(&path);
        assert_eq!(written["theme"], "dark");
        assert_eq!(written["mcpServers"]["other"]["command"], "other-server");
        assert_eq!(
            written["mcpServers"]["Unreal Editor"],
            json!({"command": "/new/path", "args": ["server"]})
        );
    }

    #[test]
    fn replaces_malformed_server_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcp.json");
        fs::write(&path, r#"{"mcpServers": []}"#).unwrap();

        write_server_entry(&path, Path::new("/bin/mcp")).unwrap();

        assert!(read(&path)["mcpServers"]["Unreal Editor"].is_object());
    }

    #[test]
    fn rejects_non_object_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mcp.json");
        fs::write(&path, "[1, 2]").unwrap();

        assert!(write_server_entry(&path, Path::new("/bin/mcp")).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2]");
    }

    #[test]
    fn cursor_config_lives_under_home() {
        temp_env::with_var("HOME", Some("/home/dev"), || {
            assert_eq!(
                McpClient::Cursor.config_path().unwrap(),
                PathBuf::from("/home/dev/.cursor/mcp.json")
            );
        });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn claude_config_on_linux_uses_xdg_layout() {
        temp_env::with_var("HOME", Some("/home/dev"), || {
            assert_eq!(
                McpClient::Claude.config_path().unwrap(),
                PathBuf::from("/home/dev/.config/Claude/claude_desktop_config.json")
            );
        });
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn missing_home_is_an_error() {
        temp_env::with_vars_unset(["HOME", "USERPROFILE"], || {
            assert!(McpClient::Cursor.config_path().is_err());
        });
    }
}
