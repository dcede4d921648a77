//! In-process stand-ins for the editor plugin and the knowledge service.

use crate::command::Command;
use crate::connection::{read_json_document, ConnectionConfig, UnrealConnection};
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use std::net::{Ipv4Addr, TcpListener as StdTcpListener};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

type Handler = dyn Fn(Command) -> JsonValue + Send + Sync;

/// Accepts one command per connection, answers with `handler`, closes.
pub struct MockPeer {
    port: u16,
    received: Arc<Mutex<Vec<Command>>>,
    task: JoinHandle<()>,
}

impl MockPeer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(Command) -> JsonValue + Send + Sync + 'static,
    {
        let handler: Arc<Handler> = Arc::new(handler);
        Self::spawn(Some(handler)).await
    }

    /// Accepts connections and never answers.
    pub async fn start_silent() -> Self {
        Self::spawn(None).await
    }

    async fn spawn(handler: Option<Arc<Handler>>) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind mock peer");
        let port = listener.local_addr().expect("mock peer addr").port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        let task = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let handler = handler.clone();
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let Some(handler) = handler else {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        return;
                    };
                    let Ok(request) =
                        read_json_document(&mut socket, Duration::from_secs(5), 1 << 20).await
                    else {
                        return;
                    };
                    let command: Command =
                        serde_json::from_value(request).expect("well-formed command envelope");
                    log.lock().await.push(command.clone());
                    let reply = serde_json::to_vec(&handler(command)).expect("encode reply");
                    let _ = socket.write_all(&reply).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            port,
            received,
            task,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn connection(&self) -> Arc<UnrealConnection> {
        Arc::new(UnrealConnection::new(
            ConnectionConfig::new("127.0.0.1", self.port).with_timeout(Duration::from_secs(2)),
        ))
    }

    pub async fn received(&self) -> Vec<Command> {
        self.received.lock().await.clone()
    }
}

impl Drop for MockPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A port with nothing listening on it.
pub fn refused_port() -> u16 {
    let listener = StdTcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind scratch listener");
    listener.local_addr().expect("scratch addr").port()
}

/// Answers every command with `{"status": "success", "result": {...}}`,
/// echoing the command name and params back.
pub fn echo_success(command: Command) -> JsonValue {
    json!({
        "status": "success",
        "result": {"success": true, "command": command.name, "params": command.params},
    })
}

#[derive(Default)]
struct KnowledgeState {
    requests: Vec<(String, JsonValue)>,
}

type SharedKnowledge = Arc<Mutex<KnowledgeState>>;

/// Minimal knowledge service recording every request it sees.
pub struct MockKnowledge {
    pub base_url: String,
    state: SharedKnowledge,
    task: JoinHandle<()>,
}

impl MockKnowledge {
    pub async fn start() -> Self {
        let state = SharedKnowledge::default();
        let app = Router::new()
            .route("/knowledge/search", post(search))
            .route("/knowledge/add", post(add))
            .route("/knowledge/list", get(list))
            .route("/knowledge/{id}", delete(remove))
            .with_state(Arc::clone(&state));
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind mock knowledge");
        let port = listener.local_addr().expect("mock knowledge addr").port();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock knowledge");
        });
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            state,
            task,
        }
    }

    pub async fn requests(&self) -> Vec<(String, JsonValue)> {
        self.state.lock().await.requests.clone()
    }

    /// Polls until `count` requests arrived or a second passed.
    pub async fn wait_for_requests(&self, count: usize) -> Vec<(String, JsonValue)> {
        for _ in 0..100 {
            let requests = self.requests().await;
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.requests().await
    }
}

impl Drop for MockKnowledge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn search(State(state): State<SharedKnowledge>, Json(body): Json<JsonValue>) -> Json<JsonValue> {
    let query = body["query"].clone();
    state
        .lock()
        .await
        .requests
        .push(("search".to_string(), body));
    Json(json!({
        "query": query,
        "results": {
            "ids": [["doc_1", "doc_2"]],
            "documents": [["Use AIMoveTo for chasing", "Blackboard keys hold the target"]],
            "metadatas": [[{"category": "ai"}, {"category": "ai", "tags": "blackboard"}]],
            "distances": [[0.25, 0.5]],
        },
    }))
}

async fn add(State(state): State<SharedKnowledge>, Json(body): Json<JsonValue>) -> Json<JsonValue> {
    let id = body
        .get("id")
        .cloned()
        .unwrap_or_else(|| json!("doc_generated"));
    state.lock().await.requests.push(("add".to_string(), body));
    Json(json!({"status": "added", "id": id}))
}

async fn list(State(state): State<SharedKnowledge>) -> Json<JsonValue> {
    state
        .lock()
        .await
        .requests
        .push(("list".to_string(), JsonValue::Null));
    Json(json!({
        "count": 1,
        "items": [{"id": "doc_1", "document": "Use AIMoveTo for chasing", "metadata": {"category": "ai"}}],
    }))
}

async fn remove(State(state): State<SharedKnowledge>, Path(id): Path<String>) -> Json<JsonValue> {
    state
        .lock()
        .await
        .requests
        .push(("delete".to_string(), json!(id)));
    Json(json!({"status": "deleted", "id": id}))
}
