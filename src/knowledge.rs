//! Client for the optional knowledge (RAG) service, plus the keyword tables
//! used to point callers at engine classes for a free-form request.

use crate::command::JsonMap;
use crate::connection::UnrealConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::Instrument;

pub const DEFAULT_RAG_URL: &str = "http://localhost:8100";
pub const DEFAULT_RAG_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RAG_URL.to_string(),
            timeout: DEFAULT_RAG_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Failed to connect to RAG server at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("RAG server request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("RAG server returned error: {0}")]
    Status(#[source] reqwest::Error),
    #[error("Failed to decode RAG server response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("RAG request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl KnowledgeError {
    fn classify(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_status() {
            Self::Status(err)
        } else if err.is_decode() {
            Self::Decode(err)
        } else {
            Self::Request(err)
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub n_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewKnowledge {
    pub document: String,
    pub category: String,
    /// Comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    results: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeHit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    pub category: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub hits: Vec<KnowledgeHit>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoredKnowledge {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KnowledgeListing {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub items: Vec<JsonValue>,
}

/// Design decision attached to a mutating tool call.
#[derive(Debug, Clone)]
pub struct Rationale {
    pub action: &'static str,
    pub category: &'static str,
    pub rationale: String,
    pub details: JsonValue,
}

impl Rationale {
    fn into_entry(self) -> NewKnowledge {
        NewKnowledge {
            document: format!(
                "Action: {}\nRationale: {}\nDetails: {}",
                self.action, self.rationale, self.details
            ),
            category: self.category.to_string(),
            tags: Some(format!("rationale,{}", self.action)),
            id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeClient {
    http: reqwest::Client,
    base_url: String,
}

impl KnowledgeClient {
    pub fn new(config: KnowledgeConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/knowledge/{path}", self.base_url)
    }

    async fn decode<T>(&self, request: reqwest::RequestBuilder) -> Result<T, KnowledgeError>
    where
        T: serde::de::DeserializeOwned,
    {
        let classify = |err| KnowledgeError::classify(&self.base_url, err);
        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(classify)?
            .json::<T>()
            .await
            .map_err(classify)
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, KnowledgeError> {
        tracing::info!(
            query = %query.query,
            n_results = query.n_results,
            category = ?query.category,
            "Searching knowledge base"
        );
        let raw: RawSearchResponse = self
            .decode(self.http.post(self.url("search")).json(query))
            .await?;
        let hits = hits_from(&raw.results);
        tracing::info!(count = hits.len(), "Knowledge search returned results");
        Ok(SearchOutcome {
            query: raw.query.unwrap_or_else(|| query.query.clone()),
            hits,
        })
    }

    pub async fn add(&self, entry: &NewKnowledge) -> Result<StoredKnowledge, KnowledgeError> {
        tracing::info!(category = %entry.category, tags = ?entry.tags, "Adding knowledge");
        self.decode(self.http.post(self.url("add")).json(entry)).await
    }

    pub async fn list(&self) -> Result<KnowledgeListing, KnowledgeError> {
        self.decode(self.http.get(self.url("list"))).await
    }

    pub async fn delete(&self, id: &str) -> Result<StoredKnowledge, KnowledgeError> {
        tracing::info!(id, "Deleting knowledge");
        let mut stored: StoredKnowledge = self.decode(self.http.delete(self.url(id))).await?;
        if stored.id.is_none() {
            stored.id = Some(id.to_string());
        }
        Ok(stored)
    }

    /// Stores `rationale` in the background. Failures are logged and
    /// otherwise ignored; the handle is only useful to tests.
    pub fn record_rationale(&self, rationale: Rationale) -> Option<JoinHandle<()>> {
        if rationale.rationale.trim().is_empty() {
            return None;
        }
        let client = self.clone();
        let action = rationale.action;
        let future = async move {
            match client.add(&rationale.into_entry()).await {
                Ok(stored) => tracing::debug!(action, id = ?stored.id, "Recorded rationale"),
                Err(err) => tracing::warn!(action, error = %err, "Failed to record rationale"),
            }
        };
        Some(tokio::spawn(future.instrument(tracing::Span::current())))
    }
}

/// Flattens search results into hits. Accepts a list of entries or the
/// column layout (`ids`/`documents`/`metadatas`/`distances`, each wrapped in
/// a per-query outer list).
pub fn hits_from(results: &JsonValue) -> Vec<KnowledgeHit> {
    match results {
        JsonValue::Array(entries) => entries.iter().filter_map(hit_from_entry).collect(),
        JsonValue::Object(columns) => {
            let documents = first_row(columns.get("documents"));
            let metadatas = first_row(columns.get("metadatas"));
            let distances = first_row(columns.get("distances"));
            let ids = first_row(columns.get("ids"));
            documents
                .iter()
                .enumerate()
                .filter_map(|(i, document)| {
                    Some(KnowledgeHit {
                        id: ids.get(i).and_then(JsonValue::as_str).map(str::to_string),
                        content: document.as_str()?.to_string(),
                        category: category_of(metadatas.get(i)),
                        relevance: relevance_of(distances.get(i).and_then(JsonValue::as_f64)),
                    })
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn first_row(column: Option<&JsonValue>) -> &[JsonValue] {
    match column.and_then(JsonValue::as_array) {
        Some(rows) => match rows.first() {
            Some(JsonValue::Array(row)) => row.as_slice(),
            _ => rows.as_slice(),
        },
        None => &[],
    }
}

fn hit_from_entry(entry: &JsonValue) -> Option<KnowledgeHit> {
    if let Some(content) = entry.as_str() {
        return Some(KnowledgeHit {
            id: None,
            content: content.to_string(),
            category: category_of(None),
            relevance: relevance_of(None),
        });
    }
    let content = entry
        .get("document")
        .or_else(|| entry.get("content"))
        .and_then(JsonValue::as_str)?;
    let category = match entry.get("category") {
        Some(JsonValue::String(category)) => category.clone(),
        _ => category_of(entry.get("metadata")),
    };
    Some(KnowledgeHit {
        id: entry.get("id").and_then(JsonValue::as_str).map(str::to_string),
        content: content.to_string(),
        category,
        relevance: relevance_of(entry.get("distance").and_then(JsonValue::as_f64)),
    })
}

fn category_of(metadata: Option<&JsonValue>) -> String {
    metadata
        .and_then(|m| m.get("category"))
        .and_then(JsonValue::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn relevance_of(distance: Option<f64>) -> f64 {
    distance.map_or(0.0, |d| ((1.0 - d) * 100.0).round() / 100.0)
}

const CLASS_KEYWORDS: &[(&str, &[&str])] = &[
    ("jump", &["Character", "CharacterMovementComponent", "Jump", "LaunchCharacter"]),
    ("move", &["CharacterMovementComponent", "MovementComponent", "NavMovementComponent"]),
    ("walk", &["CharacterMovementComponent", "MaxWalkSpeed"]),
    ("run", &["CharacterMovementComponent", "MaxWalkSpeed", "Sprint"]),
    ("sprint", &["CharacterMovementComponent", "MaxWalkSpeed"]),
    ("fly", &["CharacterMovementComponent", "Flying", "SetMovementMode"]),
    ("swim", &["CharacterMovementComponent", "Swimming", "SetMovementMode"]),
    ("crouch", &["CharacterMovementComponent", "Crouch", "UnCrouch"]),
    ("damage", &["ApplyDamage", "TakeDamage", "DamageType", "HealthComponent"]),
    ("health", &["HealthComponent", "TakeDamage", "Heal"]),
    ("attack", &["PlayAnimMontage", "AnimMontage", "MeleeAttack"]),
    ("shoot", &["SpawnActor", "ProjectileMovementComponent", "LineTrace"]),
    ("projectile", &["ProjectileMovementComponent", "SpawnActor"]),
    ("hit", &["LineTrace", "SweepTrace", "OnHit", "HitResult"]),
    ("ai", &["AIController", "BehaviorTree", "BlackboardComponent", "BTTask"]),
    ("chase", &["AIMoveTo", "MoveToActor", "MoveToLocation"]),
    ("patrol", &["AIMoveTo", "Waypoint", "SplineComponent"]),
    ("follow", &["AIMoveTo", "MoveToActor"]),
    ("enemy", &["AIController", "BehaviorTree", "Pawn"]),
    ("physics", &["PrimitiveComponent", "SimulatePhysics", "AddForce", "AddImpulse"]),
    ("collision", &["CollisionComponent", "OnComponentBeginOverlap", "OnComponentHit"]),
    ("overlap", &["OnComponentBeginOverlap", "OnComponentEndOverlap"]),
    ("trigger", &["BoxComponent", "SphereComponent", "OnComponentBeginOverlap"]),
    ("animation", &["AnimInstance", "PlayAnimMontage", "AnimBlueprint"]),
    ("anim", &["AnimInstance", "PlayAnimMontage", "AnimBlueprint"]),
    ("montage", &["PlayAnimMontage", "AnimMontage", "OnMontageEnded"]),
    ("input", &["EnhancedInputComponent", "InputAction", "InputMappingContext"]),
    ("key", &["InputAction", "EnhancedInputComponent", "BindAction"]),
    ("controller", &["PlayerController", "AIController", "GetController"]),
    ("ui", &["UserWidget", "CreateWidget", "AddToViewport"]),
    ("widget", &["UserWidget", "CreateWidget", "AddToViewport"]),
    ("hud", &["HUD", "UserWidget", "DrawText"]),
    ("sound", &["AudioComponent", "PlaySound", "USoundBase"]),
    ("music", &["AudioComponent", "PlaySound", "FadeIn", "FadeOut"]),
    ("spawn", &["SpawnActor", "SpawnActorDeferred", "BeginDeferredActorSpawnFromClass"]),
    ("create", &["SpawnActor", "NewObject", "CreateDefaultSubobject"]),
    ("destroy", &["DestroyActor", "DestroyComponent", "SetLifeSpan"]),
    ("camera", &["CameraComponent", "SpringArmComponent", "SetViewTarget"]),
    ("view", &["CameraComponent", "SetViewTarget", "PlayerCameraManager"]),
    ("save", &["SaveGame", "SaveGameToSlot", "AsyncSaveGameToSlot"]),
    ("load", &["LoadGameFromSlot", "AsyncLoadGameFromSlot"]),
    ("timer", &["SetTimer", "ClearTimer", "GetWorldTimerManager"]),
    ("delay", &["Delay", "SetTimer", "RetriggerableDelay"]),
    ("replicate", &["Replicated", "ReplicatedUsing", "ServerRPC", "ClientRPC"]),
    ("network", &["Replicated", "NetMulticast", "HasAuthority"]),
];

/// Japanese phrases mapped onto the English keys above.
const JAPANESE_KEYWORDS: &[(&str, &str)] = &[
    ("ジャンプ", "jump"),
    ("移動", "move"),
    ("歩く", "walk"),
    ("走る", "run"),
    ("スプリント", "sprint"),
    ("飛ぶ", "fly"),
    ("泳ぐ", "swim"),
    ("しゃがむ", "crouch"),
    ("ダメージ", "damage"),
    ("体力", "health"),
    ("攻撃", "attack"),
    ("撃つ", "shoot"),
    ("弾", "projectile"),
    ("当たり", "hit"),
    ("敵", "enemy"),
    ("追いかける", "chase"),
    ("巡回", "patrol"),
    ("ついていく", "follow"),
    ("物理", "physics"),
    ("衝突", "collision"),
    ("重なり", "overlap"),
    ("トリガー", "trigger"),
    ("アニメ", "animation"),
    ("アニメーション", "animation"),
    ("入力", "input"),
    ("キー", "key"),
    ("UI", "ui"),
    ("ウィジェット", "widget"),
    ("音", "sound"),
    ("音楽", "music"),
    ("生成", "spawn"),
    ("作成", "create"),
    ("削除", "destroy"),
    ("破壊", "destroy"),
    ("カメラ", "camera"),
    ("視点", "view"),
    ("保存", "save"),
    ("読み込み", "load"),
    ("タイマー", "timer"),
    ("遅延", "delay"),
    ("ネットワーク", "network"),
    ("同期", "replicate"),
];

/// Keywords found in `query`, Japanese matches first, without duplicates.
/// Matching is by substring, so "running" yields "run".
pub fn extract_keywords(query: &str) -> Vec<&'static str> {
    let lower = query.to_lowercase();
    let japanese = JAPANESE_KEYWORDS
        .iter()
        .filter(|(phrase, _)| query.contains(phrase))
        .map(|(_, key)| *key);
    let english = CLASS_KEYWORDS
        .iter()
        .filter(|(key, _)| lower.contains(key))
        .map(|(key, _)| *key);

    let mut keywords = Vec::new();
    for key in japanese.chain(english) {
        if !keywords.contains(&key) {
            keywords.push(key);
        }
    }
    keywords
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedClass {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub keyword: &'static str,
}

pub fn suggested_classes(keywords: &[&str]) -> Vec<SuggestedClass> {
    let mut suggestions: Vec<SuggestedClass> = Vec::new();
    for keyword in keywords {
        let Some((key, classes)) = CLASS_KEYWORDS.iter().find(|(key, _)| key == keyword) else {
            continue;
        };
        for class in *classes {
            if !suggestions.iter().any(|s| s.name == *class) {
                suggestions.push(SuggestedClass {
                    name: class,
                    kind: "engine",
                    keyword: key,
                });
            }
        }
    }
    suggestions
}

const MAX_PARENT_FILTERS: usize = 3;

/// Parent classes worth scanning the project for, at most three.
pub fn parent_filters(keywords: &[&str]) -> Vec<&'static str> {
    let mut filters = Vec::new();
    for keyword in keywords {
        let parents: &[&'static str] = match *keyword {
            "jump" | "move" | "walk" | "run" | "sprint" | "crouch" => &["Character"],
            "ai" | "chase" | "patrol" | "follow" | "enemy" => &["AIController", "Character"],
            "ui" | "widget" | "hud" => &["UserWidget"],
            "animation" | "anim" | "montage" => &["AnimInstance"],
            _ => &[],
        };
        for parent in parents {
            if !filters.contains(parent) {
                filters.push(*parent);
            }
        }
    }
    filters.truncate(MAX_PARENT_FILTERS);
    filters
}

#[derive(Debug, Clone)]
pub struct RelevantNodesQuery {
    pub query: String,
    pub include_rag: bool,
    pub include_project: bool,
    pub max_rag_results: u32,
    pub max_project_results: usize,
    pub module_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMatch {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelevantNodes {
    pub query: String,
    pub keywords: Vec<&'static str>,
    pub rag_results: Vec<KnowledgeHit>,
    pub suggested_classes: Vec<SuggestedClass>,
    pub project_matches: Vec<ProjectMatch>,
}

/// Combines keyword suggestions, a knowledge search and a project class scan.
/// The search and the scan are both optional and degrade to empty lists.
pub async fn find_relevant_nodes(
    connection: &UnrealConnection,
    knowledge: &KnowledgeClient,
    request: &RelevantNodesQuery,
) -> RelevantNodes {
    let keywords = extract_keywords(&request.query);
    tracing::info!(?keywords, "Extracted keywords");

    let rag_results = if request.include_rag {
        let search = SearchQuery {
            query: request.query.clone(),
            n_results: request.max_rag_results,
            category: None,
        };
        match knowledge.search(&search).await {
            Ok(outcome) => outcome.hits,
            Err(err) => {
                tracing::warn!(error = %err, "Knowledge search failed");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let project_matches = if request.include_project {
        scan_project(connection, &keywords, request).await
    } else {
        Vec::new()
    };

    RelevantNodes {
        query: request.query.clone(),
        suggested_classes: suggested_classes(&keywords),
        keywords,
        rag_results,
        project_matches,
    }
}

async fn scan_project(
    connection: &UnrealConnection,
    keywords: &[&str],
    request: &RelevantNodesQuery,
) -> Vec<ProjectMatch> {
    let limit = request.max_project_results;
    let filters = parent_filters(keywords);
    let scans: Vec<JsonValue> = if filters.is_empty() {
        let mut scan = json!({"class_type": "cpp", "exclude_reinst": true});
        if let Some(module) = &request.module_filter {
            scan["module_filter"] = json!(module);
        }
        vec![scan]
    } else {
        filters
            .iter()
            .map(|parent| json!({"parent_class": parent, "exclude_reinst": true}))
            .collect()
    };

    let mut matches: Vec<ProjectMatch> = Vec::new();
    for scan in scans {
        let params = match scan {
            JsonValue::Object(map) => map,
            _ => JsonMap::new(),
        };
        let outcome = connection.send_command("scan_project_classes", params).await;
        let Some(response) = outcome.response.as_ref().filter(|_| outcome.success) else {
            tracing::warn!(error = ?outcome.error, "Project class scan failed");
            continue;
        };
        let payload = response.get("result").unwrap_or(response);
        for found in classes_in(payload, "cpp_classes", "cpp", limit)
            .chain(classes_in(payload, "blueprints", "blueprint", limit))
        {
            if !matches.iter().any(|m| m.path == found.path) {
                matches.push(found);
            }
        }
    }
    matches.truncate(limit);
    matches
}

fn classes_in<'a>(
    payload: &'a JsonValue,
    key: &str,
    kind: &'static str,
    limit: usize,
) -> impl Iterator<Item = ProjectMatch> + 'a {
    let field = |entry: &JsonValue, name: &str| {
        entry
            .get(name)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
    };
    payload
        .get(key)
        .and_then(JsonValue::as_array)
        .map(|entries| entries.as_slice())
        .unwrap_or_default()
        .iter()
        .take(limit)
        .filter_map(move |entry| {
            Some(ProjectMatch {
                name: field(entry, "name").unwrap_or_default(),
                path: field(entry, "path")?,
                kind,
                parent: field(entry, "parent").unwrap_or_default(),
                module: if kind == "cpp" {
                    Some(field(entry, "module").unwrap_or_default())
                } else {
                    None
                },
            })
        })
}
