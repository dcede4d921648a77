use super::{blueprints_path, default_true, input_path, plain_commands};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

fn digital() -> String {
    "Digital".to_string()
}

fn trigger_down() -> String {
    "Down".to_string()
}

fn action_mapping() -> String {
    "Action".to_string()
}

fn textures_path() -> String {
    "/Game/Textures".to_string()
}

fn from_file() -> String {
    "file".to_string()
}

fn default_compression() -> String {
    "Default".to_string()
}

fn world_lod_group() -> String {
    "World".to_string()
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateInputAction {
    #[schemars(description = "Name of the Input Action, e.g. IA_Jump")]
    pub action_name: String,
    #[serde(default = "digital")]
    #[schemars(description = "Value type: Digital, Axis1D, Axis2D or Axis3D")]
    pub value_type: String,
    #[serde(default = "input_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateMappingContext {
    #[schemars(description = "Name of the Input Mapping Context, e.g. IMC_Default")]
    pub context_name: String,
    #[serde(default = "input_path")]
    #[schemars(description = "Content browser folder for the asset")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddActionToMappingContext {
    #[schemars(description = "Name of the mapping context")]
    pub context_name: String,
    #[schemars(description = "Name of the input action to map")]
    pub action_name: String,
    #[schemars(description = "Key to bind, e.g. SpaceBar, LeftShift, W or MouseX")]
    pub key: String,
    #[serde(default = "trigger_down")]
    #[schemars(description = "Trigger: Down, Pressed, Released, Hold or HoldAndRelease")]
    pub trigger_type: String,
    #[serde(default)]
    #[schemars(description = "Modifiers such as Negate, SwizzleYXZ or DeadZone")]
    pub modifiers: Vec<String>,
    #[serde(default = "input_path")]
    #[schemars(description = "Folder containing the mapping context")]
    pub context_path: String,
    #[serde(default = "input_path")]
    #[schemars(description = "Folder containing the input action")]
    pub action_path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AssetPath {
    #[schemars(description = "Full content path, e.g. /Game/Data/DA_Pistol.DA_Pistol")]
    pub asset_path: String,
}

/// `delete_asset`, `asset_exists` and `find_asset_references` all take a
/// single [`AssetPath`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DeleteAsset(pub AssetPath);

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AssetExists(pub AssetPath);

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FindAssetReferences(pub AssetPath);

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateContentFolder {
    #[schemars(description = "Content path to create; intermediate folders are created too")]
    pub folder_path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ListAssetsInFolder {
    #[schemars(description = "Content folder to list")]
    pub folder_path: String,
    #[serde(default)]
    #[schemars(description = "Include subfolders")]
    pub recursive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Only assets of this class, e.g. Texture2D")]
    pub class_filter: Option<String>,
}

/// Legacy project-settings input mapping, as opposed to Enhanced Input assets.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateInputMapping {
    #[schemars(description = "Action or axis name")]
    pub action_name: String,
    #[schemars(description = "Key to bind, e.g. SpaceBar")]
    pub key: String,
    #[serde(default = "action_mapping")]
    #[schemars(description = "Action or Axis")]
    pub input_type: String,
}

/// A mapping context hooked into a Blueprint at a given priority.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct MappingContextBinding {
    #[schemars(description = "PlayerController or Character Blueprint")]
    pub blueprint_name: String,
    #[schemars(description = "Name of the Input Mapping Context, e.g. IMC_Default")]
    pub context_name: String,
    #[serde(default)]
    #[schemars(description = "Higher priorities win over lower ones")]
    pub priority: i32,
    #[serde(default = "input_path")]
    #[schemars(description = "Folder containing the mapping context")]
    pub context_path: String,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content browser folder of the Blueprint")]
    pub path: String,
}

/// Wires AddMappingContext nodes into BeginPlay.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AddMappingContextToBlueprint(pub MappingContextBinding);

/// Sets the context through the Blueprint's DefaultMappingContext property.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SetDefaultMappingContext(pub MappingContextBinding);

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ImportTexture {
    #[schemars(description = "File path or URL of the image")]
    pub source: String,
    #[schemars(description = "Name of the new texture asset, e.g. T_Logo")]
    pub asset_name: String,
    #[serde(default = "textures_path")]
    #[schemars(description = "Content browser folder for the texture")]
    pub destination_path: String,
    #[serde(default = "from_file")]
    #[schemars(description = "file or url")]
    pub source_type: String,
    #[serde(default = "default_compression")]
    #[schemars(description = "Compression: Default, Normalmap, Grayscale, HDR or UserInterface2D")]
    pub compression: String,
    #[serde(default = "default_true")]
    #[schemars(description = "Treat the image as sRGB color data")]
    pub srgb: bool,
    #[serde(default = "world_lod_group")]
    #[schemars(description = "Texture LOD group, e.g. World or UI")]
    pub lod_group: String,
}

plain_commands! {
    CreateInputAction => "create_input_action",
    CreateMappingContext => "create_input_mapping_context",
    AddActionToMappingContext => "add_action_to_mapping_context",
    DeleteAsset => "delete_asset",
    AssetExists => "asset_exists",
    FindAssetReferences => "find_asset_references",
    CreateContentFolder => "create_content_folder",
    ListAssetsInFolder => "list_assets_in_folder",
    CreateInputMapping => "create_input_mapping",
    AddMappingContextToBlueprint => "add_mapping_context_to_blueprint",
    SetDefaultMappingContext => "set_default_mapping_context",
    ImportTexture => "import_texture",
}
