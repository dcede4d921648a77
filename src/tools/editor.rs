use super::{blueprints_path, plain_commands, rationale_for, CommandArgs};
use crate::command::{params_of, JsonMap, ParamError, Vector3};
use crate::knowledge::Rationale;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

fn default_focus_distance() -> f64 {
    1000.0
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct FindActorsByName {
    #[schemars(description = "Name pattern to match actors against")]
    pub pattern: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SpawnActor {
    #[schemars(description = "Name to give the new actor (must be unique)")]
    pub name: String,
    #[serde(rename = "type")]
    #[schemars(description = "Actor type to create, e.g. StaticMeshActor or PointLight")]
    pub actor_type: String,
    #[serde(default)]
    #[schemars(description = "[x, y, z] world location, defaults to the origin")]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "[pitch, yaw, roll] rotation in degrees")]
    pub rotation: Option<Vec<f64>>,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why this actor is being spawned; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for SpawnActor {
    const COMMAND: &'static str = "spawn_actor";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let location = Vector3::or_default("location", self.location.as_deref(), Vector3::ZERO)?;
        let rotation = Vector3::or_default("rotation", self.rotation.as_deref(), Vector3::ZERO)?;
        params_of(&json!({
            "name": self.name,
            "type": self.actor_type.to_uppercase(),
            "location": location,
            "rotation": rotation,
        }))
    }

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            Self::COMMAND,
            "level_design",
            &self.rationale,
            json!({"name": self.name, "type": self.actor_type, "location": self.location}),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct DeleteActor {
    #[schemars(description = "Name of the actor to delete")]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetActorTransform {
    #[schemars(description = "Name of the actor to move")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "New [x, y, z] location; unchanged when omitted")]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "New [pitch, yaw, roll] rotation; unchanged when omitted")]
    pub rotation: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "New [x, y, z] scale; unchanged when omitted")]
    pub scale: Option<Vec<f64>>,
}

impl CommandArgs for SetActorTransform {
    const COMMAND: &'static str = "set_actor_transform";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let mut params = JsonMap::new();
        params.insert("name".into(), json!(self.name));
        for (field, values) in [
            ("location", &self.location),
            ("rotation", &self.rotation),
            ("scale", &self.scale),
        ] {
            if let Some(vector) = Vector3::optional(field, values.as_deref())? {
                params.insert(field.into(), json!(vector));
            }
        }
        Ok(params)
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetActorProperty {
    #[schemars(description = "Name of the actor")]
    pub name: String,
    #[schemars(description = "Name of the property to set")]
    pub property_name: String,
    #[schemars(description = "Value to assign; any JSON value")]
    pub property_value: JsonValue,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why this property is being set; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for SetActorProperty {
    const COMMAND: &'static str = "set_actor_property";

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            Self::COMMAND,
            "actor_property",
            &self.rationale,
            json!({
                "actor_name": self.name,
                "property_name": self.property_name,
                "property_value": self.property_value,
            }),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetActorComponentProperty {
    #[schemars(description = "Name of the actor that owns the component")]
    pub actor_name: String,
    #[schemars(
        description = "Component name, e.g. StaticMeshComponent0; see get_actor_components"
    )]
    pub component_name: String,
    #[schemars(description = "Name of the property to set")]
    pub property_name: String,
    #[schemars(description = "Value to assign; any JSON value")]
    pub property_value: JsonValue,
    #[serde(default, skip_serializing)]
    #[schemars(description = "Why this property is being set; saved to the knowledge base")]
    pub rationale: Option<String>,
}

impl CommandArgs for SetActorComponentProperty {
    // The editor handles component properties through the actor command.
    const COMMAND: &'static str = "set_actor_property";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        params_of(&json!({
            "name": self.actor_name,
            "component_name": self.component_name,
            "property_name": self.property_name,
            "property_value": self.property_value,
        }))
    }

    fn rationale(&self) -> Option<Rationale> {
        rationale_for(
            "set_actor_component_property",
            "component_property",
            &self.rationale,
            json!({
                "actor_name": self.actor_name,
                "component_name": self.component_name,
                "property_name": self.property_name,
                "property_value": self.property_value,
            }),
        )
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct RenameActor {
    #[schemars(description = "Current actor name")]
    pub current_name: String,
    #[schemars(description = "New actor name")]
    pub new_name: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct FocusViewport {
    #[serde(default)]
    #[schemars(description = "Actor to focus on; takes precedence over location")]
    pub target: Option<String>,
    #[serde(default)]
    #[schemars(description = "[x, y, z] point to focus on when no target is given")]
    pub location: Option<Vec<f64>>,
    #[serde(default = "default_focus_distance")]
    #[schemars(description = "Camera distance from the focus point")]
    pub distance: f64,
    #[serde(default)]
    #[schemars(description = "Optional [pitch, yaw, roll] camera orientation")]
    pub orientation: Option<Vec<f64>>,
}

impl CommandArgs for FocusViewport {
    const COMMAND: &'static str = "focus_viewport";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let mut params = JsonMap::new();
        match (&self.target, &self.location) {
            (Some(target), _) => {
                params.insert("target".into(), json!(target));
            }
            (None, Some(location)) => {
                params.insert("location".into(), json!(Vector3::parse("location", location)?));
            }
            (None, None) => {
                return Err(ParamError::Missing(
                    "Either 'target' or 'location' must be provided",
                ))
            }
        }
        params.insert("distance".into(), json!(self.distance));
        if let Some(orientation) = Vector3::optional("orientation", self.orientation.as_deref())? {
            params.insert("orientation".into(), json!(orientation));
        }
        Ok(params)
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SpawnBlueprintActor {
    #[schemars(description = "Name of the Blueprint to spawn from")]
    pub blueprint_name: String,
    #[schemars(description = "Name to give the spawned actor")]
    pub actor_name: String,
    #[serde(default)]
    #[schemars(description = "[x, y, z] world location, defaults to the origin")]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    #[schemars(description = "[pitch, yaw, roll] rotation in degrees")]
    pub rotation: Option<Vec<f64>>,
    #[serde(default = "blueprints_path")]
    #[schemars(description = "Content path of the Blueprint (default /Game/Blueprints)")]
    pub path: String,
}

impl CommandArgs for SpawnBlueprintActor {
    const COMMAND: &'static str = "spawn_blueprint_actor";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let location = Vector3::or_default("location", self.location.as_deref(), Vector3::ZERO)?;
        let rotation = Vector3::or_default("rotation", self.rotation.as_deref(), Vector3::ZERO)?;
        params_of(&json!({
            "blueprint_name": self.blueprint_name,
            "actor_name": self.actor_name,
            "location": location,
            "rotation": rotation,
            "path": self.path,
        }))
    }
}

/// Actors from a `get_actors_in_level` response, wherever the editor put them.
pub fn actors_from(response: &JsonValue) -> Vec<JsonValue> {
    response
        .get("result")
        .and_then(|result| result.get("actors"))
        .or_else(|| response.get("actors"))
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct GetActorProperties {
    #[schemars(description = "Name of the actor to inspect")]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct GetActorComponents {
    #[schemars(description = "Name of the actor whose components to list")]
    pub name: String,
}

plain_commands! {
    FindActorsByName => "find_actors_by_name",
    DeleteActor => "delete_actor",
    GetActorProperties => "get_actor_properties",
    GetActorComponents => "get_actor_components",
    RenameActor => "rename_actor",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_actor_uppercases_type_and_defaults_vectors() {
        let args = SpawnActor {
            name: "Light_1".into(),
            actor_type: "PointLight".into(),
            location: Some(vec![]),
            rotation: None,
            rationale: Some("Light the corridor".into()),
        };
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({
                "name": "Light_1",
                "type": "POINTLIGHT",
                "location": [0.0, 0.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
            })
        );
        let rationale = args.rationale().unwrap();
        assert_eq!(rationale.category, "level_design");
        assert_eq!(rationale.details["type"], "PointLight");
    }

    #[test]
    fn spawn_actor_rejects_bad_vectors() {
        let args = SpawnActor {
            name: "Light_1".into(),
            actor_type: "PointLight".into(),
            location: Some(vec![1.0, 2.0]),
            rotation: None,
            rationale: None,
        };
        assert_eq!(
            args.to_params().unwrap_err().to_string(),
            "Invalid location format. Must be a list of 3 float values, got 2."
        );
    }

    #[test]
    fn transform_only_sends_supplied_fields() {
        let args: SetActorTransform =
            serde_json::from_value(json!({"name": "Cube", "scale": [2.0, 2.0, 2.0]})).unwrap();
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({"name": "Cube", "scale": [2.0, 2.0, 2.0]})
        );
    }

    #[test]
    fn focus_prefers_target_over_location() {
        let args: FocusViewport = serde_json::from_value(json!({
            "target": "Cube",
            "location": [1.0, 2.0, 3.0],
        }))
        .unwrap();
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({"target": "Cube", "distance": 1000.0})
        );

        let args: FocusViewport = serde_json::from_value(json!({
            "location": [1.0, 2.0, 3.0],
            "distance": 250.0,
            "orientation": [-30.0, 0.0, 0.0],
        }))
        .unwrap();
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({"location": [1.0, 2.0, 3.0], "distance": 250.0, "orientation": [-30.0, 0.0, 0.0]})
        );
    }

    #[test]
    fn focus_needs_target_or_location() {
        let args: FocusViewport = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(args.to_params(), Err(ParamError::Missing(_))));
    }

    #[test]
    fn component_property_reuses_actor_command() {
        let args = SetActorComponentProperty {
            actor_name: "Lamp".into(),
            component_name: "LightComponent0".into(),
            property_name: "Intensity".into(),
            property_value: json!(5000),
            rationale: None,
        };
        assert_eq!(SetActorComponentProperty::COMMAND, "set_actor_property");
        assert_eq!(
            JsonValue::Object(args.to_params().unwrap()),
            json!({
                "name": "Lamp",
                "component_name": "LightComponent0",
                "property_name": "Intensity",
                "property_value": 5000,
            })
        );
        assert!(args.rationale().is_none());
    }

    #[test]
    fn rationale_is_not_sent_to_the_editor() {
        let args = SetActorProperty {
            name: "Lamp".into(),
            property_name: "bHidden".into(),
            property_value: json!(true),
            rationale: Some("Hide until triggered".into()),
        };
        let params = args.to_params().unwrap();
        assert!(!params.contains_key("rationale"));
        assert_eq!(args.rationale().unwrap().category, "actor_property");
    }

    #[test]
    fn actors_are_found_in_result_or_top_level() {
        let nested = json!({"status": "success", "result": {"actors": [{"name": "A"}]}});
        let flat = json!({"actors": [{"name": "B"}]});
        assert_eq!(actors_from(&nested), [json!({"name": "A"})]);
        assert_eq!(actors_from(&flat), [json!({"name": "B"})]);
        assert!(actors_from(&json!({"status": "success"})).is_empty());
    }
}
