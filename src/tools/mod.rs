//! Argument types for every tool exposed over MCP.
//!
//! Most tools map one-to-one onto an editor command: the argument struct
//! serializes straight into the command params. Tools that reshape their
//! arguments (vector validation, renamed fields, defaults derived from other
//! fields) override [`CommandArgs::to_params`].

pub mod ai;
pub mod blueprint;
pub mod editor;
pub mod gas;
pub mod knowledge;
pub mod nodes;
pub mod project;
pub mod umg;

use crate::command::{params_of, JsonMap, ParamError};
use crate::knowledge::Rationale;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub trait CommandArgs: Serialize + Sized {
    /// Editor command this tool sends.
    const COMMAND: &'static str;

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(self)
    }

    /// Rationale to store once the command succeeds.
    fn rationale(&self) -> Option<Rationale> {
        None
    }
}

/// Implements [`CommandArgs`] for types whose fields are the params verbatim.
macro_rules! plain_commands {
    ($($args:ty => $command:literal),* $(,)?) => {
        $(
            impl $crate::tools::CommandArgs for $args {
                const COMMAND: &'static str = $command;
            }
        )*
    };
}
pub(crate) use plain_commands;

pub(crate) fn rationale_for(
    action: &'static str,
    category: &'static str,
    rationale: &Option<String>,
    details: JsonValue,
) -> Option<Rationale> {
    rationale.as_ref().map(|rationale| Rationale {
        action,
        category,
        rationale: rationale.clone(),
        details,
    })
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn blueprints_path() -> String {
    "/Game/Blueprints".to_string()
}

pub(crate) fn widgets_path() -> String {
    "/Game/UI".to_string()
}

pub(crate) fn data_path() -> String {
    "/Game/Data".to_string()
}

pub(crate) fn input_path() -> String {
    "/Game/Input".to_string()
}

pub(crate) fn blackboards_path() -> String {
    "/Game/AI/Blackboards".to_string()
}

pub(crate) fn behavior_trees_path() -> String {
    "/Game/AI/BehaviorTrees".to_string()
}
