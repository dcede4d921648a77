use super::{blueprints_path, data_path, default_true, plain_commands, rationale_for, CommandArgs};
use crate::command::{params_of, JsonMap, ParamError, Vector3};
use crate::knowledge::Rationale;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

fn default_static_mesh() -> String {
    "/Engine/BasicShapes/Cube.Cube".to_string()
}

fn default_mass() -> f64 {
    1.0
}

fn default_linear_damping() -> f64 {
    0.01
}

fn default_class_type() -> String {
    "all".to_string()
}

fn default_asset_type() -> String {
    "dataasset".to_string()
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateBlueprint {
    #[schemars(description = "Name of the Blueprint, e.g. BP_PlayerCharacter")]
    pub name: String,
    #[schemars(description = "Parent class, e.g. Actor, Character or a project class")]
    pub parent_class: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why this Blueprint is being created; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for CreateBlueprint {
    const COMMAND: &'static str = "create_blueprint";

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            Self::COMMAND,
            "blueprint",
            &self.rationale,
            json!({"name": self.name, "parent_class": self.parent_class, "path": self.path}),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddComponentToBlueprint {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Component class, e.g. StaticMeshComponent or PointLightComponent")]
    pub component_type: String,
    #[schemars(description = "Name for the new component")]
    pub component_name: String,
    #[serde(default)]
    #[schemars(description = "Relative [x, y, z] location")]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "Relative [pitch, yaw, roll] rotation")]
    pub rotation: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "Relative [x, y, z] scale, defaults to [1, 1, 1]")]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "Additional properties applied to the component")]
    pub component_properties: JsonMap,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why this component is being added; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for AddComponentToBlueprint {
    const COMMAND: &'static str = "add_component_to_blueprint";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let mut params = params_of(&json!({
            "blueprint_name": self.blueprint_name,
            "component_type": self.component_type,
            "component_name": self.component_name,
            "location": Vector3::or_default("location", self.location.as_deref(), Vector3::ZERO)?,
            "rotation": Vector3::or_default("rotation", self.rotation.as_deref(), Vector3::ZERO)?,
            "scale": Vector3::or_default("scale", self.scale.as_deref(), Vector3::ONE)?,
            "path": self.path,
        }))?;
        if !self.component_properties.is_empty() {
            params.insert(
                "component_properties".into(),
                JsonValue::Object(self.component_properties.clone()),
            );
        }
        Ok(params)
    }

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            Self::COMMAND,
            "component",
            &self.rationale,
            json!({
                "blueprint_name": self.blueprint_name,
                "component_type": self.component_type,
                "component_name": self.component_name,
            }),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetStaticMeshProperties {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the StaticMeshComponent")]
    pub component_name: String,
    #[serde(default = "default_static_mesh")]
    #[schemars(description = "Static mesh asset path")]
    pub static_mesh: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetComponentProperty {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the component")]
    pub component_name: String,
    #[schemars(description = "Name of the property to set")]
    pub property_name: String,
    #[schemars(description = "Value to assign; any JSON value")]
    pub property_value: JsonValue,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetPhysicsProperties {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the primitive component")]
    pub component_name: String,
    #[serde(default = "default_true")]
    #[schemars(description = "Whether the component simulates physics")]
    pub simulate_physics: bool,
    #[serde(default = "default_true")]
    #[schemars(description = "Whether gravity applies")]
    pub gravity_enabled: bool,
    #[serde(default = "default_mass")]
    #[schemars(description = "Mass in kilograms")]
    pub mass: f64,
    #[serde(default = "default_linear_damping")]
    #[schemars(description = "Linear damping")]
    pub linear_damping: f64,
    #[serde(default)]
    #[schemars(description = "Angular damping")]
    pub angular_damping: f64,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why these physics settings are used; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for SetPhysicsProperties {
    const COMMAND: &'static str = "set_physics_properties";

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            Self::COMMAND,
            "physics",
            &self.rationale,
            json!({
                "blueprint_name": self.blueprint_name,
                "component_name": self.component_name,
                "simulate_physics": self.simulate_physics,
                "mass": self.mass,
            }),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct BlueprintRef {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetBlueprintProperty {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the class default property")]
    pub property_name: String,
    #[schemars(description = "Value to assign; any JSON value")]
    pub property_value: JsonValue,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetPawnProperties {
    #[schemars(description = "Name of the Pawn or Character Blueprint")]
    pub blueprint_name: String,
    #[serde(default)]
    #[schemars(description = "Auto possess player setting, e.g. Player0 or Disabled")]
    pub auto_possess_player: Option<String>,
    #[serde(default)]
    #[schemars(description = "Use the controller's yaw rotation")]
    pub use_controller_rotation_yaw: Option<bool>,
    #[serde(default)]
    #[schemars(description = "Use the controller's pitch rotation")]
    pub use_controller_rotation_pitch: Option<bool>,
    #[serde(default)]
    #[schemars(description = "Use the controller's roll rotation")]
    pub use_controller_rotation_roll: Option<bool>,
    #[serde(default)]
    #[schemars(description = "Whether the pawn can be damaged")]
    pub can_be_damaged: Option<bool>,
}

impl SetPawnProperties {
    /// One `set_blueprint_property` param map per supplied field, keyed by
    /// the engine property name.
    pub fn property_commands(&self) -> Vec<(&'static str, JsonMap)> {
        let auto_possess = self
            .auto_possess_player
            .as_ref()
            .filter(|value| !value.is_empty())
            .map(|value| json!(value));
        let flags = [
            ("bUseControllerRotationYaw", self.use_controller_rotation_yaw),
            ("bUseControllerRotationPitch", self.use_controller_rotation_pitch),
            ("bUseControllerRotationRoll", self.use_controller_rotation_roll),
            ("bCanBeDamaged", self.can_be_damaged),
        ]
        .into_iter()
        .map(|(name, flag)| (name, flag.map(JsonValue::Bool)));

        std::iter::once(("auto_possess_player", auto_possess))
            .chain(flags)
            .filter_map(|(name, value)| {
                let value = value?;
                let mut params = JsonMap::new();
                params.insert("blueprint_name".into(), json!(self.blueprint_name));
                params.insert("property_name".into(), json!(name));
                params.insert("property_value".into(), value);
                Some((name, params))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct DuplicateBlueprint {
    #[schemars(description = "Name of the Blueprint to copy")]
    pub source_name: String,
    #[schemars(description = "Name of the copy")]
    pub new_name: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Folder containing the source Blueprint")]
    pub source_path: String,
    #[serde(default)]
    #[schemars(description = "Folder for the copy; defaults to the source folder")]
    pub destination_path: Option<String>,
}

impl CommandArgs for DuplicateBlueprint {
    const COMMAND: &'static str = "duplicate_blueprint";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(&json!({
            "source_name": self.source_name,
            "new_name": self.new_name,
            "source_path": self.source_path,
            "destination_path": self.destination_path.as_ref().unwrap_or(&self.source_path),
        }))
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ScanProjectClasses {
    #[serde(default = "default_class_type")]
    #[schemars(description = "Which classes to list: all, cpp or blueprint")]
    pub class_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only classes deriving from this parent")]
    pub parent_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only C++ classes from this module")]
    pub module_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only Blueprints under this content path")]
    pub path_filter: Option<String>,
    #[serde(default)]
    #[schemars(description = "Include engine classes")]
    pub include_engine: bool,
    #[serde(default = "default_true")]
    #[schemars(description = "Skip REINST_ classes left over from hot reload")]
    pub exclude_reinst: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Blueprint kind filter, e.g. actor, character or widget")]
    pub blueprint_type: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateDataAsset {
    #[schemars(description = "Name of the data asset")]
    pub name: String,
    #[schemars(description = "PrimaryDataAsset or DataAsset subclass")]
    pub parent_class: String,
    #[serde(default = "data_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    #[schemars(description = "Property values applied after creation")]
    pub initial_values: JsonMap,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct GetBlueprintProperties {
    #[schemars(description = "Name of the Blueprint")]
    pub blueprint_name: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
    #[serde(default = "default_true")]
    #[schemars(description = "Include properties inherited from parent classes")]
    pub include_inherited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only properties in this category")]
    pub category_filter: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetDataAssetProperty {
    #[schemars(description = "Name of the data asset")]
    pub asset_name: String,
    #[schemars(description = "Name of the property to set")]
    pub property_name: String,
    #[schemars(description = "Value to assign; any JSON value")]
    pub property_value: JsonValue,
    #[serde(default = "data_path")]
    #[schemars(description = "Content browser folder of the asset")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct BatchSetProperties {
    #[schemars(description = "Name of the asset")]
    pub asset_name: String,
    #[schemars(description = "Property name to value map")]
    pub properties: JsonMap,
    #[serde(default = "data_path")]
    #[schemars(description = "Content browser folder of the asset")]
    pub path: String,
    #[serde(default = "default_asset_type")]
    #[schemars(description = "Asset kind: dataasset or blueprint")]
    pub asset_type: String,
}

/// `compile_blueprint` and `get_blueprint_graph` share [`BlueprintRef`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CompileBlueprint(pub BlueprintRef);

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GetBlueprintGraph(pub BlueprintRef);

/// Class references are full paths; Blueprint classes end in `_C`, e.g.
/// `/Game/Traps/BP_Spike.BP_Spike_C`. Pass `None` or `""` to clear.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetBlueprintClassArray {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "TSubclassOf array property, e.g. DefaultAbilities")]
    pub property_name: String,
    #[schemars(description = "Class paths; Blueprint classes end in _C")]
    pub class_paths: Vec<String>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetStructArrayProperty {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Struct array property, e.g. TrapInventory")]
    pub property_name: String,
    #[schemars(description = "One object per element, keyed by struct field name")]
    pub values: Vec<JsonMap>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetClassProperty {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "TSubclassOf property, e.g. DefaultPawnClass")]
    pub property_name: String,
    #[schemars(description = "Class path, e.g. /Script/Engine.DefaultPawn; None clears it")]
    pub class_path: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetObjectProperty {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Object reference property")]
    pub property_name: String,
    #[schemars(description = "Asset path, e.g. /Game/Data/DA_Pistol.DA_Pistol; None clears it")]
    pub asset_path: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

/// Partial update of one element of a struct array.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetStructProperty {
    #[schemars(description = "Name of the target Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Struct array property")]
    pub property_name: String,
    #[schemars(description = "0-based element index")]
    pub index: i64,
    #[schemars(description = "Fields to change; others keep their values")]
    pub values: JsonMap,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

plain_commands! {
    SetStaticMeshProperties => "set_static_mesh_properties",
    SetComponentProperty => "set_component_property",
    CompileBlueprint => "compile_blueprint",
    GetBlueprintGraph => "get_blueprint_graph",
    SetBlueprintProperty => "set_blueprint_property",
    ScanProjectClasses => "scan_project_classes",
    CreateDataAsset => "create_data_asset",
    GetBlueprintProperties => "get_blueprint_properties",
    SetDataAssetProperty => "set_data_asset_property",
    BatchSetProperties => "batch_set_properties",
    SetBlueprintClassArray => "set_blueprint_class_array",
    SetStructArrayProperty => "set_struct_array_property",
    SetClassProperty => "set_class_property",
    SetObjectProperty => "set_object_property",
    SetStructProperty => "set_struct_property",
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<T: CommandArgs>(args: &T) -> JsonValue {
        JsonValue::Object(args.to_params().unwrap())
    }

    #[test]
    fn create_blueprint_defaults_path() {
        let args: CreateBlueprint =
            serde_json::from_value(json!({"name": "BP_Door", "parent_class": "Actor"})).unwrap();
        assert_eq!(
            params(&args),
            json!({"name": "BP_Door", "parent_class": "Actor", "path": "/Game/Blueprints"})
        );
        assert!(args.rationale().is_none());
    }

    #[test]
    fn component_vectors_default_and_properties_are_optional() {
        let args: AddComponentToBlueprint = serde_json::from_value(json!({
            "blueprint_name": "BP_Door",
            "component_type": "StaticMeshComponent",
            "component_name": "Mesh",
            "rotation": [],
        }))
        .unwrap();
        assert_eq!(
            params(&args),
            json!({
                "blueprint_name": "BP_Door",
                "component_type": "StaticMeshComponent",
                "component_name": "Mesh",
                "location": [0.0, 0.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
                "scale": [1.0, 1.0, 1.0],
                "path": "/Game/Blueprints",
            })
        );

        let args: AddComponentToBlueprint = serde_json::from_value(json!({
            "blueprint_name": "BP_Door",
            "component_type": "StaticMeshComponent",
            "component_name": "Mesh",
            "component_properties": {"bVisible": false},
        }))
        .unwrap();
        assert_eq!(params(&args)["component_properties"], json!({"bVisible": false}));
    }

    #[test]
    fn component_scale_arity_is_checked() {
        let args: AddComponentToBlueprint = serde_json::from_value(json!({
            "blueprint_name": "BP_Door",
            "component_type": "StaticMeshComponent",
            "component_name": "Mesh",
            "scale": [1.0, 1.0, 1.0, 1.0],
        }))
        .unwrap();
        assert_eq!(
            args.to_params().unwrap_err().to_string(),
            "Invalid scale format. Must be a list of 3 float values, got 4."
        );
    }

    #[test]
    fn physics_defaults() {
        let args: SetPhysicsProperties = serde_json::from_value(json!({
            "blueprint_name": "BP_Crate",
            "component_name": "Mesh",
            "rationale": "Crates should tumble",
        }))
        .unwrap();
        assert_eq!(
            params(&args),
            json!({
                "blueprint_name": "BP_Crate",
                "component_name": "Mesh",
                "simulate_physics": true,
                "gravity_enabled": true,
                "mass": 1.0,
                "linear_damping": 0.01,
                "angular_damping": 0.0,
                "path": "/Game/Blueprints",
            })
        );
        assert_eq!(args.rationale().unwrap().category, "physics");
    }

    #[test]
    fn pawn_properties_fan_out_per_supplied_field() {
        let args: SetPawnProperties = serde_json::from_value(json!({
            "blueprint_name": "BP_Hero",
            "auto_possess_player": "Player0",
            "use_controller_rotation_yaw": true,
            "can_be_damaged": false,
        }))
        .unwrap();
        let commands = args.property_commands();
        let names: Vec<_> = commands.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["auto_possess_player", "bUseControllerRotationYaw", "bCanBeDamaged"]);
        assert_eq!(
            JsonValue::Object(commands[2].1.clone()),
            json!({"blueprint_name": "BP_Hero", "property_name": "bCanBeDamaged", "property_value": false})
        );
    }

    #[test]
    fn pawn_properties_ignore_empty_possession() {
        let args: SetPawnProperties =
            serde_json::from_value(json!({"blueprint_name": "BP_Hero", "auto_possess_player": ""}))
                .unwrap();
        assert!(args.property_commands().is_empty());
    }

    #[test]
    fn duplicate_defaults_destination_to_source() {
        let args: DuplicateBlueprint = serde_json::from_value(json!({
            "source_name": "BP_Door",
            "new_name": "BP_Door2",
            "source_path": "/Game/Props",
        }))
        .unwrap();
        assert_eq!(params(&args)["destination_path"], "/Game/Props");
    }

    #[test]
    fn scan_omits_unset_filters() {
        let args: ScanProjectClasses =
            serde_json::from_value(json!({"parent_class": "Character"})).unwrap();
        assert_eq!(
            params(&args),
            json!({
                "class_type": "all",
                "parent_class": "Character",
                "include_engine": false,
                "exclude_reinst": true,
            })
        );
    }

    #[test]
    fn data_asset_initial_values_only_when_present() {
        let args: CreateDataAsset =
            serde_json::from_value(json!({"name": "DA_Loot", "parent_class": "LootTable"})).unwrap();
        assert!(!args.to_params().unwrap().contains_key("initial_values"));
    }

    #[test]
    fn shared_blueprint_ref_serializes_flat() {
        let args = CompileBlueprint(BlueprintRef {
            blueprint_name: "BP_Door".into(),
            path: "/Game/Test".into(),
        });
        assert_eq!(
            params(&args),
            json!({"blueprint_name": "BP_Door", "path": "/Game/Test"})
        );
    }

    #[test]
    fn struct_element_update_keeps_field_order() {
        let args: SetStructProperty = serde_json::from_value(json!({
            "blueprint_name": "BP_Hero",
            "property_name": "InventorySlots",
            "index": 0,
            "values": {"MaxCount": 10, "WeaponData": "/Game/Data/DA_Pistol.DA_Pistol"},
        }))
        .unwrap();
        let sent = params(&args);
        assert_eq!(sent["path"], "/Game/Blueprints");
        assert_eq!(sent["index"], 0);
        let fields: Vec<_> = sent["values"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(fields, ["MaxCount", "WeaponData"]);
        assert_eq!(SetStructProperty::COMMAND, "set_struct_property");
    }
}
