use super::{plain_commands, CommandArgs};
use crate::command::{params_of, JsonMap, ParamError};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddGameplayTags {
    #[schemars(description = "Hierarchical tags, e.g. [\"Ability.Attack.Melee\", \"Status.Buff.Speed\"]")]
    pub tags: Vec<String>,
    #[serde(default)]
    #[schemars(description = "Optional developer comment per tag")]
    pub comments: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListGameplayTags {
    #[serde(default)]
    #[schemars(description = "Only tags starting with this prefix, e.g. Ability")]
    pub filter_prefix: Option<String>,
}

impl CommandArgs for ListGameplayTags {
    const COMMAND: &'static str = "list_gameplay_tags";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(&json!({"filter_prefix": self.filter_prefix.as_deref().unwrap_or_default()}))
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct RemoveGameplayTag {
    #[schemars(description = "Tag to remove, e.g. Ability.Attack.Melee")]
    pub tag: String,
}

plain_commands! {
    AddGameplayTags => "add_gameplay_tags",
    RemoveGameplayTag => "remove_gameplay_tag",
}
