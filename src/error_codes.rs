//! Error codes reported by the editor plugin.
//!
//! Codes are partitioned into hundred-wide ranges, one per category. The
//! table mirrors the plugin's `ESpirrowErrorCode` namespace; codes this build
//! does not know about degrade to [`ErrorCode::UnknownError`] instead of
//! failing to parse.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::ops::Range;

macro_rules! error_codes {
    ($($variant:ident = $code:literal => $name:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "i64", into = "i64")]
        pub enum ErrorCode {
            $($variant,)+
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$variant,)+];

            pub fn code(self) -> i64 {
                match self {
                    $(ErrorCode::$variant => $code,)+
                }
            }

            /// Wire-stable upper snake case name, e.g. `BLUEPRINT_NOT_FOUND`.
            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$variant => $name,)+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(ErrorCode::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

error_codes! {
    Success = 0 => "SUCCESS",

    UnknownError = 1000 => "UNKNOWN_ERROR",
    UnknownCommand = 1001 => "UNKNOWN_COMMAND",
    InvalidParams = 1002 => "INVALID_PARAMS",
    MissingRequiredParam = 1003 => "MISSING_REQUIRED_PARAM",
    InvalidParamType = 1004 => "INVALID_PARAM_TYPE",
    InvalidParamValue = 1005 => "INVALID_PARAM_VALUE",
    InvalidParameter = 1006 => "INVALID_PARAMETER",
    OperationFailed = 1007 => "OPERATION_FAILED",
    SystemError = 1008 => "SYSTEM_ERROR",

    AssetNotFound = 1100 => "ASSET_NOT_FOUND",
    AssetLoadFailed = 1101 => "ASSET_LOAD_FAILED",
    AssetAlreadyExists = 1102 => "ASSET_ALREADY_EXISTS",
    AssetCreationFailed = 1103 => "ASSET_CREATION_FAILED",
    AssetDeleteFailed = 1104 => "ASSET_DELETE_FAILED",
    InvalidAssetPath = 1105 => "INVALID_ASSET_PATH",

    BlueprintNotFound = 1200 => "BLUEPRINT_NOT_FOUND",
    BlueprintCompileFailed = 1201 => "BLUEPRINT_COMPILE_FAILED",
    BlueprintInvalidClass = 1202 => "BLUEPRINT_INVALID_CLASS",
    EventGraphNotFound = 1203 => "EVENT_GRAPH_NOT_FOUND",
    NodeCreationFailed = 1204 => "NODE_CREATION_FAILED",
    NodeConnectionFailed = 1205 => "NODE_CONNECTION_FAILED",
    PinNotFound = 1206 => "PIN_NOT_FOUND",
    VariableNotFound = 1207 => "VARIABLE_NOT_FOUND",
    FunctionNotFound = 1208 => "FUNCTION_NOT_FOUND",
    GraphNotFound = 1209 => "GRAPH_NOT_FOUND",
    NodeNotFound = 1210 => "NODE_NOT_FOUND",
    ClassNotFound = 1211 => "CLASS_NOT_FOUND",
    InvalidOperation = 1212 => "INVALID_OPERATION",
    InvalidBlueprint = 1213 => "INVALID_BLUEPRINT",
    InvalidComponent = 1214 => "INVALID_COMPONENT",
    ConnectionFailed = 1215 => "CONNECTION_FAILED",
    NotSupported = 1216 => "NOT_SUPPORTED",

    WidgetNotFound = 1300 => "WIDGET_NOT_FOUND",
    WidgetElementNotFound = 1301 => "WIDGET_ELEMENT_NOT_FOUND",
    WidgetCreationFailed = 1302 => "WIDGET_CREATION_FAILED",
    WidgetTreeNotFound = 1303 => "WIDGET_TREE_NOT_FOUND",
    CanvasPanelNotFound = 1304 => "CANVAS_PANEL_NOT_FOUND",
    AnimationNotFound = 1305 => "ANIMATION_NOT_FOUND",

    ActorNotFound = 1400 => "ACTOR_NOT_FOUND",
    ActorSpawnFailed = 1401 => "ACTOR_SPAWN_FAILED",
    ComponentNotFound = 1402 => "COMPONENT_NOT_FOUND",
    PropertyNotFound = 1403 => "PROPERTY_NOT_FOUND",
    PropertySetFailed = 1404 => "PROPERTY_SET_FAILED",
    ComponentCreationFailed = 1405 => "COMPONENT_CREATION_FAILED",

    GameplayTagInvalid = 1500 => "GAMEPLAY_TAG_INVALID",
    GameplayEffectFailed = 1501 => "GAMEPLAY_EFFECT_FAILED",
    GameplayAbilityFailed = 1502 => "GAMEPLAY_ABILITY_FAILED",

    // Config and file failures have codes but no category range.
    ConfigKeyNotFound = 1600 => "CONFIG_KEY_NOT_FOUND",
    FileWriteFailed = 1601 => "FILE_WRITE_FAILED",
    FileReadFailed = 1602 => "FILE_READ_FAILED",
}

impl ErrorCode {
    pub fn category(self) -> ErrorCategory {
        error_category(self.code())
    }

    /// Human readable hint for the agent. Only the failures agents hit most
    /// often get a dedicated message.
    pub fn friendly_message(self) -> String {
        let message = match self {
            ErrorCode::BlueprintNotFound => {
                "The requested Blueprint could not be found. Check the name and path."
            }
            ErrorCode::WidgetNotFound => "The requested Widget Blueprint could not be found.",
            ErrorCode::MissingRequiredParam => "A required parameter is missing.",
            ErrorCode::AssetNotFound => "The requested asset could not be found.",
            ErrorCode::NodeCreationFailed => "Failed to create the node.",
            ErrorCode::ComponentNotFound => "The requested component could not be found.",
            ErrorCode::UnknownCommand => "The editor plugin does not know this command.",
            _ => return format!("An error occurred (code: {})", self.code()),
        };
        message.to_string()
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        ErrorCode::from_code(code).unwrap_or(ErrorCode::UnknownError)
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    General,
    Asset,
    Blueprint,
    Widget,
    Actor,
    Gas,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::General => "General",
            ErrorCategory::Asset => "Asset",
            ErrorCategory::Blueprint => "Blueprint",
            ErrorCategory::Widget => "Widget",
            ErrorCategory::Actor => "Actor",
            ErrorCategory::Gas => "GAS",
            ErrorCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CATEGORY_RANGES: [(Range<i64>, ErrorCategory); 6] = [
    (1000..1100, ErrorCategory::General),
    (1100..1200, ErrorCategory::Asset),
    (1200..1300, ErrorCategory::Blueprint),
    (1300..1400, ErrorCategory::Widget),
    (1400..1500, ErrorCategory::Actor),
    (1500..1600, ErrorCategory::Gas),
];

/// Total: any integer outside the known ranges maps to `Unknown`.
pub fn error_category(code: i64) -> ErrorCategory {
    CATEGORY_RANGES
        .iter()
        .find(|(range, _)| range.contains(&code))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Unknown)
}

/// A failure reported by the editor plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub code: ErrorCode,
    /// The code exactly as the plugin sent it; differs from `code` when the
    /// plugin is newer than this build.
    pub raw_code: i64,
    pub message: String,
    pub details: Option<JsonValue>,
}

impl RemoteError {
    pub fn new(raw_code: i64, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from(raw_code),
            raw_code,
            message: message.into(),
            details: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        error_category(self.raw_code)
    }

    pub fn to_json(&self) -> JsonValue {
        let mut value = json!({
            "error_code": self.raw_code,
            "error_name": self.code.name(),
            "error": self.message,
            "category": self.category().as_str(),
        });
        if let Some(details) = &self.details {
            value["details"] = details.clone();
        }
        value
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ({})] {}", self.code.name(), self.raw_code, self.message)
    }
}

impl std::error::Error for RemoteError {}

/// Extracts the plugin's failure from a response envelope, if it reports one.
///
/// Both the outer envelope (`"status": "error"`) and handler-level results
/// (`"success": false`) count as failures.
pub fn parse_error_response(response: &JsonValue) -> Option<RemoteError> {
    let failed = response.get("success").and_then(JsonValue::as_bool) == Some(false)
        || response.get("status").and_then(JsonValue::as_str) == Some("error");
    if !failed {
        return None;
    }

    let raw_code = response
        .get("error_code")
        .and_then(JsonValue::as_i64)
        .unwrap_or(ErrorCode::UnknownError.code());
    let message = response
        .get("error")
        .and_then(JsonValue::as_str)
        .unwrap_or("Unknown error");
    let mut error = RemoteError::new(raw_code, message);
    error.details = response.get("details").filter(|d| !d.is_null()).cloned();
    Some(error)
}
