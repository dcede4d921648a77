//! Widget Blueprint construction.
//!
//! Positions, sizes and alignments are `[x, y]` pairs and colors are
//! `[r, g, b, a]` in 0..1; the editor validates their shape.

use super::{plain_commands, widgets_path, CommandArgs};
use crate::command::{params_of, JsonMap, ParamError};
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

fn user_widget() -> String {
    "UserWidget".to_string()
}

fn origin() -> Vec<f64> {
    vec![0.0, 0.0]
}

fn block_size() -> Vec<f64> {
    vec![200.0, 50.0]
}

fn white() -> Vec<f64> {
    vec![1.0, 1.0, 1.0, 1.0]
}

fn dark_grey() -> Vec<f64> {
    vec![0.1, 0.1, 0.1, 1.0]
}

fn centered() -> Vec<f64> {
    vec![0.5, 0.5]
}

fn center_anchor() -> String {
    "Center".to_string()
}

fn small_font() -> u32 {
    12
}

fn crosshair() -> String {
    "+".to_string()
}

fn large_font() -> u32 {
    32
}

fn icon_size() -> Vec<f64> {
    vec![32.0, 32.0]
}

fn bar_fill() -> Vec<f64> {
    vec![0.0, 0.5, 1.0, 1.0]
}

fn bar_size() -> Vec<f64> {
    vec![200.0, 20.0]
}

fn one_second() -> f64 {
    1.0
}

fn text_binding() -> String {
    "Text".to_string()
}

fn last_slot() -> i32 {
    -1
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateWidgetBlueprint {
    #[schemars(description = "Name of the Widget Blueprint, e.g. WBP_HUD")]
    pub widget_name: String,
    #[serde(default = "user_widget")]
    #[schemars(description = "Parent widget class")]
    pub parent_class: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder for the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddTextBlock {
    #[schemars(description = "Name of the target Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new Text Block")]
    pub text_block_name: String,
    #[serde(default)]
    #[schemars(description = "Initial text")]
    pub text: String,
    #[serde(default = "origin")]
    #[schemars(description = "[x, y] position in the canvas panel")]
    pub position: Vec<f64>,
    #[serde(default = "block_size")]
    #[schemars(description = "[width, height]")]
    pub size: Vec<f64>,
    #[serde(default = "small_font")]
    #[schemars(description = "Font size in points")]
    pub font_size: u32,
    #[serde(default = "white")]
    #[schemars(description = "[r, g, b, a] text color")]
    pub color: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddText {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new Text Block")]
    pub text_name: String,
    #[serde(default = "crosshair")]
    #[schemars(description = "Display text")]
    pub text: String,
    #[serde(default = "large_font")]
    #[schemars(description = "Font size in points")]
    pub font_size: u32,
    #[serde(default = "white")]
    #[schemars(description = "[r, g, b, a] text color")]
    pub color: Vec<f64>,
    #[serde(default = "center_anchor")]
    #[schemars(
        description = "Anchor: Center, TopLeft, TopCenter, TopRight, MiddleLeft, MiddleRight, BottomLeft, BottomCenter or BottomRight"
    )]
    pub anchor: String,
    #[serde(default = "centered")]
    #[schemars(description = "[x, y] alignment in 0..1")]
    pub alignment: Vec<f64>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddButton {
    #[schemars(description = "Name of the target Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new Button")]
    pub button_name: String,
    #[serde(default)]
    #[schemars(description = "Button label")]
    pub text: String,
    #[serde(default = "origin")]
    #[schemars(description = "[x, y] position in the canvas panel")]
    pub position: Vec<f64>,
    #[serde(default = "block_size")]
    #[schemars(description = "[width, height]")]
    pub size: Vec<f64>,
    #[serde(default = "small_font")]
    #[schemars(description = "Label font size")]
    pub font_size: u32,
    #[serde(default = "white")]
    #[schemars(description = "[r, g, b, a] label color")]
    pub color: Vec<f64>,
    #[serde(default = "dark_grey")]
    #[schemars(description = "[r, g, b, a] background color")]
    pub background_color: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddImage {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new Image")]
    pub image_name: String,
    #[serde(default)]
    #[schemars(description = "Texture asset path; empty for a flat tint")]
    pub texture_path: String,
    #[serde(default = "icon_size")]
    #[schemars(description = "[width, height]")]
    pub size: Vec<f64>,
    #[serde(default = "white")]
    #[schemars(description = "[r, g, b, a] tint")]
    pub color_tint: Vec<f64>,
    #[serde(default = "center_anchor")]
    #[schemars(description = "Anchor position name")]
    pub anchor: String,
    #[serde(default = "centered")]
    #[schemars(description = "[x, y] alignment in 0..1")]
    pub alignment: Vec<f64>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddProgressBar {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new ProgressBar")]
    pub progressbar_name: String,
    #[serde(default)]
    #[schemars(description = "Initial fill in 0..1")]
    pub percent: f64,
    #[serde(default = "bar_fill")]
    #[schemars(description = "[r, g, b, a] fill color")]
    pub fill_color: Vec<f64>,
    #[serde(default = "dark_grey")]
    #[schemars(description = "[r, g, b, a] background color")]
    pub background_color: Vec<f64>,
    #[serde(default = "bar_size")]
    #[schemars(description = "[width, height]")]
    pub size: Vec<f64>,
    #[serde(default = "center_anchor")]
    #[schemars(description = "Anchor position name")]
    pub anchor: String,
    #[serde(default = "centered")]
    #[schemars(description = "[x, y] alignment in 0..1")]
    pub alignment: Vec<f64>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct BindWidgetEvent {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Widget element raising the event, e.g. a button")]
    pub widget_component_name: String,
    #[schemars(description = "Event to bind, e.g. OnClicked")]
    pub event_name: String,
    #[serde(default)]
    #[schemars(description = "Function to bind; defaults to <component>_<event>")]
    pub function_name: Option<String>,
}

impl CommandArgs for BindWidgetEvent {
    const COMMAND: &'static str = "bind_widget_event";

    fn to_params(&self) -> Result<JsonMap, ParamError> {
        let function_name = match self.function_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}_{}", self.widget_component_name, self.event_name),
        };
        params_of(&json!({
            "widget_name": self.widget_name,
            "widget_component_name": self.widget_component_name,
            "event_name": self.event_name,
            "function_name": function_name,
        }))
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddWidgetToViewport {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[serde(default)]
    #[schemars(description = "Z order; higher draws on top")]
    pub z_order: i32,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct GetWidgetElements {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetWidgetSlotProperty {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Element whose canvas slot is changed")]
    pub element_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] position")]
    pub position: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[width, height]")]
    pub size: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Anchor position name")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[x, y] alignment in 0..1")]
    pub alignment: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Z order")]
    pub z_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Size the slot to its content")]
    pub auto_size: Option<bool>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct RemoveWidgetElement {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Element to remove")]
    pub element_name: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddWidgetVariable {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the new variable")]
    pub variable_name: String,
    #[schemars(description = "Type, e.g. Boolean, Integer, Float, String, Text or an object class")]
    pub variable_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Default value as text")]
    pub default_value: Option<String>,
    #[serde(default)]
    #[schemars(description = "Expose on spawn and make instance editable")]
    pub is_exposed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Category shown in the details panel")]
    pub category: Option<String>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct CreateWidgetAnimation {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the animation")]
    pub animation_name: String,
    #[serde(default = "one_second")]
    #[schemars(description = "Length in seconds")]
    pub length: f64,
    #[serde(default, rename = "loop")]
    #[schemars(description = "Whether the animation loops")]
    pub looping: bool,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetTextBlockBinding {
    #[schemars(description = "Name of the target Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the Text Block to bind")]
    pub text_block_name: String,
    #[schemars(description = "Property the text is bound to")]
    pub binding_property: String,
    #[serde(default = "text_binding")]
    #[schemars(description = "Binding type: Text or Visibility")]
    pub binding_type: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetWidgetElementProperty {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the element to change")]
    pub element_name: String,
    #[schemars(description = "Property, e.g. Text, ColorAndOpacity or Visibility")]
    pub property_name: String,
    #[schemars(description = "New value as text, parsed by the editor")]
    pub property_value: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

/// Layout container placement shared by vertical and horizontal boxes.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct BoxPanel {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name for the new box")]
    pub box_name: String,
    #[serde(default = "center_anchor")]
    #[schemars(description = "Anchor inside the canvas panel")]
    pub anchor: String,
    #[serde(default = "centered")]
    #[schemars(description = "[x, y] alignment in 0..1")]
    pub alignment: Vec<f64>,
    #[serde(default = "origin")]
    #[schemars(description = "[x, y] position")]
    pub position: Vec<f64>,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Container to add the box to; the root canvas when omitted")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "[width, height]; sized to content when omitted")]
    pub size: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AddVerticalBox(pub BoxPanel);

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AddHorizontalBox(pub BoxPanel);

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct ReparentWidgetElement {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Element to move")]
    pub element_name: String,
    #[schemars(description = "New parent panel")]
    pub new_parent_name: String,
    #[serde(default = "last_slot")]
    #[schemars(description = "Index among the new parent's children; -1 appends")]
    pub slot_index: i32,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SetWidgetVariableDefault {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Variable to change")]
    pub variable_name: String,
    #[schemars(description = "Default value as text")]
    pub default_value: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

/// Pins are `{"name": .., "type": ..}` objects.
#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddWidgetFunction {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the new function")]
    pub function_name: String,
    #[serde(default)]
    #[schemars(description = "Pure functions have no execution pins")]
    pub is_pure: bool,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Input pins as {name, type} objects")]
    pub inputs: Option<Vec<BTreeMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Output pins as {name, type} objects")]
    pub outputs: Option<Vec<BTreeMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Category shown in the function list")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddWidgetEvent {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Name of the new custom event")]
    pub event_name: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Event parameters as {name, type} objects")]
    pub inputs: Option<Vec<BTreeMap<String, String>>>,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct BindWidgetToVariable {
    #[schemars(description = "Name of the Widget Blueprint")]
    pub widget_name: String,
    #[schemars(description = "Element whose property is bound")]
    pub element_name: String,
    #[schemars(description = "Property to bind, e.g. Text or Percent")]
    pub property_name: String,
    #[schemars(description = "Widget variable providing the value")]
    pub variable_name: String,
    #[serde(default = "widgets_path")]
    #[schemars(description = "Content browser folder of the widget")]
    pub path: String,
}

plain_commands! {
    CreateWidgetBlueprint => "create_umg_widget_blueprint",
    AddTextBlock => "add_text_block_to_widget",
    AddText => "add_text_to_widget",
    AddButton => "add_button_to_widget",
    AddImage => "add_image_to_widget",
    AddProgressBar => "add_progressbar_to_widget",
    AddWidgetToViewport => "add_widget_to_viewport",
    GetWidgetElements => "get_widget_elements",
    SetWidgetSlotProperty => "set_widget_slot_property",
    RemoveWidgetElement => "remove_widget_element",
    AddWidgetVariable => "add_widget_variable",
    CreateWidgetAnimation => "create_widget_animation",
    SetTextBlockBinding => "set_text_block_binding",
    SetWidgetElementProperty => "set_widget_element_property",
    AddVerticalBox => "add_vertical_box_to_widget",
    AddHorizontalBox => "add_horizontal_box_to_widget",
    ReparentWidgetElement => "reparent_widget_element",
    SetWidgetVariableDefault => "set_widget_variable_default",
    AddWidgetFunction => "add_widget_function",
    AddWidgetEvent => "add_widget_event",
    BindWidgetToVariable => "bind_widget_to_variable",
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as JsonValue;

    fn params<T: CommandArgs>(args: &T) -> JsonValue {
        JsonValue::Object(args.to_params().unwrap())
    }

    #[test]
    fn text_defaults_make_a_centered_crosshair() {
        let args: AddText =
            serde_json::from_value(json!({"widget_name": "WBP_HUD", "text_name": "Cross"})).unwrap();
        assert_eq!(
            params(&args),
            json!({
                "widget_name": "WBP_HUD",
                "text_name": "Cross",
                "text": "+",
                "font_size": 32,
                "color": [1.0, 1.0, 1.0, 1.0],
                "anchor": "Center",
                "alignment": [0.5, 0.5],
                "path": "/Game/UI",
            })
        );
    }

    #[test]
    fn button_defaults() {
        let args: AddButton =
            serde_json::from_value(json!({"widget_name": "WBP_Menu", "button_name": "Start", "text": "Go"}))
                .unwrap();
        let sent = params(&args);
        assert_eq!(sent["position"], json!([0.0, 0.0]));
        assert_eq!(sent["size"], json!([200.0, 50.0]));
        assert_eq!(sent["background_color"], json!([0.1, 0.1, 0.1, 1.0]));
        assert!(sent.get("path").is_none());
    }

    #[test]
    fn bind_event_derives_function_name() {
        let args: BindWidgetEvent = serde_json::from_value(json!({
            "widget_name": "WBP_Menu",
            "widget_component_name": "StartButton",
            "event_name": "OnClicked",
        }))
        .unwrap();
        assert_eq!(params(&args)["function_name"], "StartButton_OnClicked");

        let args: BindWidgetEvent = serde_json::from_value(json!({
            "widget_name": "WBP_Menu",
            "widget_component_name": "StartButton",
            "event_name": "OnClicked",
            "function_name": "HandleStart",
        }))
        .unwrap();
        assert_eq!(params(&args)["function_name"], "HandleStart");
    }

    #[test]
    fn slot_update_sends_only_supplied_fields() {
        let args: SetWidgetSlotProperty = serde_json::from_value(json!({
            "widget_name": "WBP_HUD",
            "element_name": "Health",
            "z_order": 3,
        }))
        .unwrap();
        assert_eq!(
            params(&args),
            json!({"widget_name": "WBP_HUD", "element_name": "Health", "z_order": 3, "path": "/Game/UI"})
        );
    }

    #[test]
    fn animation_loop_flag_keeps_wire_name() {
        let args: CreateWidgetAnimation = serde_json::from_value(json!({
            "widget_name": "WBP_HUD",
            "animation_name": "FadeIn",
            "loop": true,
        }))
        .unwrap();
        assert_eq!(params(&args)["loop"], true);
        assert_eq!(params(&args)["length"], 1.0);
    }

    #[test]
    fn box_panels_share_placement_and_skip_absent_parent() {
        let panel: BoxPanel =
            serde_json::from_value(json!({"widget_name": "WBP_HUD", "box_name": "Column"})).unwrap();
        let vertical = params(&AddVerticalBox(panel.clone()));
        assert_eq!(
            vertical,
            json!({
                "widget_name": "WBP_HUD",
                "box_name": "Column",
                "anchor": "Center",
                "alignment": [0.5, 0.5],
                "position": [0.0, 0.0],
                "path": "/Game/UI",
            })
        );
        assert_eq!(params(&AddHorizontalBox(panel)), vertical);
        assert_eq!(AddHorizontalBox::COMMAND, "add_horizontal_box_to_widget");
    }

    #[test]
    fn reparent_appends_by_default() {
        let args: ReparentWidgetElement = serde_json::from_value(json!({
            "widget_name": "WBP_HUD",
            "element_name": "Score",
            "new_parent_name": "Column",
        }))
        .unwrap();
        assert_eq!(params(&args)["slot_index"], -1);
    }

    #[test]
    fn widget_function_pins_are_optional() {
        let args: AddWidgetFunction = serde_json::from_value(json!({
            "widget_name": "WBP_HUD",
            "function_name": "GetHealthText",
            "outputs": [{"name": "Text", "type": "Text"}],
        }))
        .unwrap();
        let sent = params(&args);
        assert_eq!(sent["is_pure"], false);
        assert_eq!(sent["outputs"][0]["type"], "Text");
        assert!(sent.get("inputs").is_none());
        assert!(sent.get("category").is_none());
    }
}
