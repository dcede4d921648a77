//! Blackboard and Behavior Tree authoring.

use super::{behavior_trees_path, blackboards_path, plain_commands, CommandArgs};
use crate::command::{params_of, JsonMap, ParamError};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

fn append() -> i32 {
    -1
}

fn all() -> String {
    "all".to_string()
}

fn horizontal_spacing() -> i32 {
    300
}

fn vertical_spacing() -> i32 {
    150
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateBlackboard {
    #[schemars(description = "Name of the Blackboard, e.g. BB_Enemy")]
    pub name: String,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddBlackboardKey {
    #[schemars(description = "Name of the target Blackboard")]
    pub blackboard_name: String,
    #[schemars(description = "Name of the new key")]
    pub key_name: String,
    #[schemars(
        description = "Key type: Bool, Int, Float, String, Name, Vector, Rotator, Object, Class or Enum"
    )]
    pub key_type: String,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Folder containing the Blackboard")]
    pub path: String,
    #[serde(default)]
    #[schemars(description = "Synchronize the value across all instances")]
    pub instance_synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Base class for Object and Class keys, e.g. Actor")]
    pub base_class: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListBlackboardKeys {
    #[schemars(description = "Name of the Blackboard")]
    pub blackboard_name: String,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Folder containing the Blackboard")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateBehaviorTree {
    #[schemars(description = "Name of the Behavior Tree, e.g. BT_Enemy")]
    pub name: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
    #[serde(default)]
    #[schemars(description = "Blackboard to assign")]
    pub blackboard_name: Option<String>,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Folder containing the Blackboard")]
    pub blackboard_path: String,
}

impl CommandArgs for CreateBehaviorTree {
    const COMMAND: &'static str = "create_behavior_tree";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(&json!({
            "name": self.name,
            "path": self.path,
            "blackboard_name": self.blackboard_name.as_deref().unwrap_or_default(),
            "blackboard_path": self.blackboard_path,
        }))
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddCompositeNode {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Composite kind: Selector, Sequence or SimpleParallel")]
    pub node_type: String,
    #[serde(default)]
    #[schemars(description = "Parent node id; empty makes the node the root")]
    pub parent_node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default = "append")]
    #[schemars(description = "Insert position among the parent's children; -1 appends")]
    pub child_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Display name for the node")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] graph position")]
    pub node_position: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddTaskNode {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Task class, e.g. BTTask_MoveTo or BTTask_Wait")]
    pub task_type: String,
    #[schemars(description = "Composite node the task is attached to")]
    pub parent_node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default = "append")]
    #[schemars(description = "Insert position among the parent's children; -1 appends")]
    pub child_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Display name for the node")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] graph position")]
    pub node_position: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ConnectBtNodes {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "New parent; Root makes the child the tree root")]
    pub parent_node_id: String,
    #[schemars(description = "Node to move under the parent")]
    pub child_node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default = "append")]
    #[schemars(description = "Insert position among the parent's children; -1 appends")]
    pub child_index: i32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetBtNodeProperty {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Node to modify, e.g. BTTask_Wait_0")]
    pub node_id: String,
    #[schemars(description = "Property name, e.g. WaitTime")]
    pub property_name: String,
    #[schemars(description = "Value; vectors as [x, y, z], colors as [r, g, b, a]")]
    pub property_value: JsonValue,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct DeleteBtNode {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Node to delete; deleting the root empties the tree")]
    pub node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListBtNodes {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct RemoveBlackboardKey {
    #[schemars(description = "Name of the Blackboard")]
    pub blackboard_name: String,
    #[schemars(description = "Key to remove")]
    pub key_name: String,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Folder containing the Blackboard")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetBehaviorTreeBlackboard {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Blackboard to assign")]
    pub blackboard_name: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub behavior_tree_path: String,
    #[serde(default = "blackboards_path")]
    #[schemars(description = "Folder containing the Blackboard")]
    pub blackboard_path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct GetBehaviorTreeStructure {
    #[schemars(description = "Name of the Behavior Tree")]
    pub name: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddDecoratorNode {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Decorator class, e.g. BTDecorator_Blackboard or BTDecorator_Cooldown")]
    pub decorator_type: String,
    #[schemars(description = "Node the condition guards")]
    pub target_node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Display name for the decorator")]
    pub node_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddServiceNode {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Service class, e.g. BTService_DefaultFocus")]
    pub service_type: String,
    #[schemars(description = "Composite node the service runs on")]
    pub target_node_id: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Display name for the service")]
    pub node_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListBtNodeTypes {
    #[serde(default = "all")]
    #[schemars(description = "composite, task, decorator, service or all")]
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetBtNodePosition {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[schemars(description = "Node to move")]
    pub node_id: String,
    #[schemars(description = "[x, y] graph position")]
    pub position: Vec<i32>,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AutoLayoutBt {
    #[schemars(description = "Name of the Behavior Tree")]
    pub behavior_tree_name: String,
    #[serde(default = "behavior_trees_path")]
    #[schemars(description = "Folder containing the Behavior Tree")]
    pub path: String,
    #[serde(default = "horizontal_spacing")]
    #[schemars(description = "Horizontal gap between siblings")]
    pub horizontal_spacing: i32,
    #[serde(default = "vertical_spacing")]
    #[schemars(description = "Vertical gap between levels")]
    pub vertical_spacing: i32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListAiAssets {
    #[serde(default = "all")]
    #[schemars(description = "behavior_tree, blackboard or all")]
    pub asset_type: String,
    #[serde(default)]
    #[schemars(description = "Only assets under this content path")]
    pub path_filter: Option<String>,
}

impl CommandArgs for ListAiAssets {
    const COMMAND: &'static str = "list_ai_assets";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(&json!({
            "asset_type": self.asset_type,
            "path_filter": self.path_filter.as_deref().unwrap_or_default(),
        }))
    }
}

plain_commands! {
    CreateBlackboard => "create_blackboard",
    AddBlackboardKey => "add_blackboard_key",
    ListBlackboardKeys => "list_blackboard_keys",
    AddCompositeNode => "add_bt_composite_node",
    AddTaskNode => "add_bt_task_node",
    ConnectBtNodes => "connect_bt_nodes",
    SetBtNodeProperty => "set_bt_node_property",
    DeleteBtNode => "delete_bt_node",
    ListBtNodes => "list_bt_nodes",
    RemoveBlackboardKey => "remove_blackboard_key",
    SetBehaviorTreeBlackboard => "set_behavior_tree_blackboard",
    GetBehaviorTreeStructure => "get_behavior_tree_structure",
    AddDecoratorNode => "add_bt_decorator_node",
    AddServiceNode => "add_bt_service_node",
    ListBtNodeTypes => "list_bt_node_types",
    SetBtNodePosition => "set_bt_node_position",
    AutoLayoutBt => "auto_layout_bt",
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<T: CommandArgs>(args: &T) -> JsonValue {
        JsonValue::Object(args.to_params().unwrap())
    }

    #[test]
    fn behavior_tree_without_blackboard_sends_empty_name() {
        let args: CreateBehaviorTree = serde_json::from_value(json!({"name": "BT_Enemy"})).unwrap();
        assert_eq!(
            params(&args),
            json!({
                "name": "BT_Enemy",
                "path": "/Game/AI/BehaviorTrees",
                "blackboard_name": "",
                "blackboard_path": "/Game/AI/Blackboards",
            })
        );
    }

    #[test]
    fn composite_defaults_to_root_and_append() {
        let args: AddCompositeNode = serde_json::from_value(json!({
            "behavior_tree_name": "BT_Enemy",
            "node_type": "Selector",
        }))
        .unwrap();
        assert_eq!(
            params(&args),
            json!({
                "behavior_tree_name": "BT_Enemy",
                "node_type": "Selector",
                "parent_node_id": "",
                "path": "/Game/AI/BehaviorTrees",
                "child_index": -1,
            })
        );
    }

    #[test]
    fn task_requires_parent() {
        let missing = serde_json::from_value::<AddTaskNode>(json!({
            "behavior_tree_name": "BT_Enemy",
            "task_type": "BTTask_Wait",
        }));
        assert!(missing.is_err());

        let args: AddTaskNode = serde_json::from_value(json!({
            "behavior_tree_name": "BT_Enemy",
            "task_type": "BTTask_Wait",
            "parent_node_id": "BTComposite_Sequence_0",
            "node_position": [200, 100],
        }))
        .unwrap();
        assert_eq!(params(&args)["node_position"], json!([200, 100]));
    }

    #[test]
    fn blackboard_key_base_class_is_optional() {
        let args: AddBlackboardKey = serde_json::from_value(json!({
            "blackboard_name": "BB_Enemy",
            "key_name": "Target",
            "key_type": "Object",
            "base_class": "Actor",
        }))
        .unwrap();
        let sent = params(&args);
        assert_eq!(sent["base_class"], "Actor");
        assert_eq!(sent["instance_synced"], false);
    }

    #[test]
    fn ai_asset_listing_sends_empty_filter_when_absent() {
        let args: ListAiAssets = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params(&args), json!({"asset_type": "all", "path_filter": ""}));
    }

    #[test]
    fn decorator_omits_missing_name() {
        let args: AddDecoratorNode = serde_json::from_value(json!({
            "behavior_tree_name": "BT_Enemy",
            "decorator_type": "BTDecorator_Blackboard",
            "target_node_id": "BTComposite_Sequence_0",
        }))
        .unwrap();
        assert_eq!(
            params(&args),
            json!({
                "behavior_tree_name": "BT_Enemy",
                "decorator_type": "BTDecorator_Blackboard",
                "target_node_id": "BTComposite_Sequence_0",
                "path": "/Game/AI/BehaviorTrees",
            })
        );
    }

    #[test]
    fn auto_layout_spacing_defaults() {
        let args: AutoLayoutBt =
            serde_json::from_value(json!({"behavior_tree_name": "BT_Enemy"})).unwrap();
        let sent = params(&args);
        assert_eq!(sent["horizontal_spacing"], 300);
        assert_eq!(sent["vertical_spacing"], 150);
    }
}
