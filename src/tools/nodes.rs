//! Event graph editing inside Blueprints.

use super::{blueprints_path, plain_commands};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddEventNode {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Event to add, e.g. ReceiveBeginPlay or ReceiveTick")]
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] graph position")]
    pub node_position: Option<Vec<f64>>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddPrintStringNode {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[serde(default)]
    #[schemars(description = "Text printed at runtime")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] graph position")]
    pub node_position: Option<Vec<f64>>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ConnectNodes {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Id of the node providing the output pin")]
    pub source_node_id: String,
    #[schemars(description = "Output pin name, e.g. then")]
    pub source_pin: String,
    #[schemars(description = "Id of the node receiving the connection")]
    pub target_node_id: String,
    #[schemars(description = "Input pin name, e.g. execute")]
    pub target_pin: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct FindNodes {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Node kind filter, e.g. Event, Function or Variable")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Event name filter for Event nodes, e.g. ReceiveBeginPlay")]
    pub event_type: Option<String>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddBlueprintVariable {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the new variable")]
    pub variable_name: String,
    #[schemars(description = "Type, e.g. Boolean, Integer, Float, String or Vector")]
    pub variable_type: String,
    #[serde(default)]
    #[schemars(description = "Make the variable instance editable")]
    pub is_exposed: bool,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

plain_commands! {
    AddEventNode => "add_blueprint_event_node",
    AddPrintStringNode => "add_print_string_node",
    ConnectNodes => "connect_blueprint_nodes",
    FindNodes => "find_blueprint_nodes",
    AddBlueprintVariable => "add_blueprint_variable",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::CommandArgs;
    use serde_json::{json, Value as JsonValue};

    #[test]
    fn print_string_defaults() {
        let args: AddPrintStringNode =
            serde_json::from_value(json!({"blueprint_name": "BP_Smoke", "message": "hi"})).unwrap();
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({"blueprint_name": "BP_Smoke", "message": "hi", "path": "/Game/Blueprints"})
        );
    }

    #[test]
    fn find_nodes_sends_only_given_filters() {
        let args: FindNodes = serde_json::from_value(json!({
            "blueprint_name": "BP_Smoke",
            "node_type": "Event",
            "event_type": "ReceiveBeginPlay",
        }))
        .unwrap();
        let sent = args.to_params().unwrap();
        assert_eq!(sent["event_type"], "ReceiveBeginPlay");
        assert_eq!(sent.len(), 4);
    }
}
