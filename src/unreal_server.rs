use crate::command::JsonMap;
use crate::connection::{CommandOutcome, UnrealConnection};
use crate::error_codes::{error_category, ErrorCode};
use crate::knowledge::{self, KnowledgeClient, KnowledgeError, NewKnowledge, RelevantNodesQuery};
use crate::tools::{ai, blueprint, editor, gas, knowledge as kb, nodes, project, umg, CommandArgs};
use rmcp::{
    handler::server::tool::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use serde_json::{json, Value as JsonValue};
use std::future::Future;
use std::sync::Arc;

const RAG_HINT: &str = "Make sure RAG server is running and RAG_SERVER_URL is correct";

#[derive(Clone)]
pub struct UnrealEditorServer {
    connection: Arc<UnrealConnection>,
    knowledge: Arc<KnowledgeClient>,
    tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for UnrealEditorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Drives a running Unreal Editor: actors, Blueprints, widgets, input, AI assets and \
                 gameplay tags. Failed tools return a JSON object with success=false and a message. \
                 The knowledge tools search and extend a shared design knowledge base."
                    .to_string(),
            ),
        }
    }
}

fn failure(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(
        json!({"success": false, "message": message.into()}).to_string(),
    )])
}

/// Transport failure payload, kept apart from errors the editor reported.
fn connect_failure(outcome: &CommandOutcome) -> JsonValue {
    json!({
        "success": false,
        "message": format!(
            "Failed to connect to Unreal Engine: {}",
            outcome.error.as_deref().unwrap_or("no response")
        ),
    })
}

/// Handler-level failure reported inside a `success` envelope.
fn handler_rejected(response: &JsonValue) -> bool {
    response.pointer("/result/success").and_then(JsonValue::as_bool) == Some(false)
}

fn succeeded(outcome: &CommandOutcome) -> bool {
    outcome.success && !outcome.response.as_ref().is_some_and(handler_rejected)
}

/// The editor's failure response as a failure mapping: `success` and
/// `message` added, plus the code's name and category when a code is present.
fn enriched_failure(response: &JsonValue) -> JsonValue {
    let field = |key: &str| {
        response
            .get(key)
            .or_else(|| response.get("result").and_then(|result| result.get(key)))
    };
    let message = field("error")
        .and_then(JsonValue::as_str)
        .unwrap_or("Unknown error")
        .to_string();
    let code = field("error_code").and_then(JsonValue::as_i64);

    let mut body = match response {
        JsonValue::Object(map) => map.clone(),
        _ => JsonMap::new(),
    };
    body.insert("success".into(), json!(false));
    body.insert("message".into(), json!(message));
    if let Some(code) = code {
        body.insert("error_code".into(), json!(code));
        body.insert("error_name".into(), json!(ErrorCode::from(code).name()));
        body.insert("category".into(), json!(error_category(code).as_str()));
    }
    JsonValue::Object(body)
}

/// Maps an exchange onto the tool result every tool returns.
pub fn outcome_to_result(outcome: &CommandOutcome) -> CallToolResult {
    match &outcome.response {
        None => CallToolResult::error(vec![Content::text(connect_failure(outcome).to_string())]),
        Some(response) if !succeeded(outcome) => {
            CallToolResult::error(vec![Content::text(enriched_failure(response).to_string())])
        }
        Some(response) => CallToolResult::success(vec![Content::text(response.to_string())]),
    }
}

fn knowledge_failure(err: &KnowledgeError) -> CallToolResult {
    tracing::error!(error = %err, "Knowledge request failed");
    let mut body = json!({"success": false, "message": err.to_string()});
    if err.is_connect() {
        body["hint"] = json!(RAG_HINT);
    }
    CallToolResult::error(vec![Content::text(body.to_string())])
}

fn json_success(value: JsonValue) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}

#[tool_router]
impl UnrealEditorServer {
    pub fn new(connection: Arc<UnrealConnection>, knowledge: Arc<KnowledgeClient>) -> Self {
        Self {
            connection,
            knowledge,
            tool_router: Self::tool_router(),
        }
    }

    async fn dispatch<A: CommandArgs>(&self, args: A) -> Result<CallToolResult, ErrorData> {
        let params = match args.to_params() {
            Ok(params) => params,
            Err(err) => {
                tracing::warn!(command = A::COMMAND, error = %err, "Rejected tool arguments");
                return Ok(failure(err.to_string()));
            }
        };
        tracing::info!(command = A::COMMAND, "Dispatching tool");
        let outcome = self.connection.send_command(A::COMMAND, params).await;
        if succeeded(&outcome) {
            if let Some(rationale) = args.rationale() {
                self.knowledge.record_rationale(rationale);
            }
        } else {
            tracing::warn!(command = A::COMMAND, error = ?outcome.error, "Tool call failed");
        }
        Ok(outcome_to_result(&outcome))
    }

    async fn dispatch_bare(&self, command: &str) -> Result<CallToolResult, ErrorData> {
        let outcome = self.connection.send_command(command, JsonMap::new()).await;
        Ok(outcome_to_result(&outcome))
    }

    // Editor and actors

    #[tool(description = "Checks that the Unreal Editor plugin is reachable. Answers with pong.")]
    async fn ping(&self) -> Result<CallToolResult, ErrorData> {
        let outcome = self.connection.ping().await;
        Ok(outcome_to_result(&outcome))
    }

    #[tool(description = "Lists every actor in the current level. Returns a JSON array of actors.")]
    async fn get_actors_in_level(&self) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .connection
            .send_command("get_actors_in_level", JsonMap::new())
            .await;
        match outcome.response.as_ref().filter(|_| succeeded(&outcome)) {
            Some(response) => {
                let actors = editor::actors_from(response);
                tracing::info!(count = actors.len(), "Found actors in level");
                Ok(json_success(JsonValue::Array(actors)))
            }
            None => Ok(outcome_to_result(&outcome)),
        }
    }

    #[tool(description = "Finds actors whose name matches a pattern.")]
    async fn find_actors_by_name(
        &self,
        Parameters(args): Parameters<editor::FindActorsByName>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(
        description = "Spawns an actor of a built-in type (StaticMeshActor, PointLight, CameraActor, ...) at an optional location and rotation."
    )]
    async fn spawn_actor(
        &self,
        Parameters(args): Parameters<editor::SpawnActor>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Deletes an actor from the level by name.")]
    async fn delete_actor(
        &self,
        Parameters(args): Parameters<editor::DeleteActor>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets an actor's location, rotation and/or scale. Omitted parts are left unchanged.")]
    async fn set_actor_transform(
        &self,
        Parameters(args): Parameters<editor::SetActorTransform>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Returns all properties of an actor.")]
    async fn get_actor_properties(
        &self,
        Parameters(args): Parameters<editor::GetActorProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on an actor.")]
    async fn set_actor_property(
        &self,
        Parameters(args): Parameters<editor::SetActorProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on one of an actor's components.")]
    async fn set_actor_component_property(
        &self,
        Parameters(args): Parameters<editor::SetActorComponentProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the components attached to an actor.")]
    async fn get_actor_components(
        &self,
        Parameters(args): Parameters<editor::GetActorComponents>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Renames an actor in the level.")]
    async fn rename_actor(
        &self,
        Parameters(args): Parameters<editor::RenameActor>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(
        description = "Moves the editor viewport camera to an actor or a location. One of target or location is required; target wins when both are given."
    )]
    async fn focus_viewport(
        &self,
        Parameters(args): Parameters<editor::FocusViewport>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Spawns an instance of a Blueprint class into the level.")]
    async fn spawn_blueprint_actor(
        &self,
        Parameters(args): Parameters<editor::SpawnBlueprintActor>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Blueprints

    #[tool(description = "Creates a Blueprint class deriving from a parent class.")]
    async fn create_blueprint(
        &self,
        Parameters(args): Parameters<blueprint::CreateBlueprint>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a component to a Blueprint with an optional relative transform and properties.")]
    async fn add_component_to_blueprint(
        &self,
        Parameters(args): Parameters<blueprint::AddComponentToBlueprint>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Assigns a static mesh to a StaticMeshComponent in a Blueprint.")]
    async fn set_static_mesh_properties(
        &self,
        Parameters(args): Parameters<blueprint::SetStaticMeshProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on a component of a Blueprint.")]
    async fn set_component_property(
        &self,
        Parameters(args): Parameters<blueprint::SetComponentProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Configures physics simulation, gravity, mass and damping on a Blueprint component.")]
    async fn set_physics_properties(
        &self,
        Parameters(args): Parameters<blueprint::SetPhysicsProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Compiles a Blueprint.")]
    async fn compile_blueprint(
        &self,
        Parameters(args): Parameters<blueprint::BlueprintRef>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(blueprint::CompileBlueprint(args)).await
    }

    #[tool(description = "Sets a class default property on a Blueprint.")]
    async fn set_blueprint_property(
        &self,
        Parameters(args): Parameters<blueprint::SetBlueprintProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(
        description = "Sets common Pawn settings (auto possession, controller rotation, damage) on a Blueprint. Only the given settings are changed."
    )]
    async fn set_pawn_properties(
        &self,
        Parameters(args): Parameters<blueprint::SetPawnProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        let commands = args.property_commands();
        if commands.is_empty() {
            tracing::warn!("No properties specified to set");
            return Ok(json_success(json!({
                "success": true,
                "message": "No properties specified to set",
                "results": {},
            })));
        }

        let mut results = JsonMap::new();
        let mut all_succeeded = true;
        for (property, params) in commands {
            tracing::info!(property, "Setting pawn property");
            let outcome = self
                .connection
                .send_command(blueprint::SetBlueprintProperty::COMMAND, params)
                .await;
            let ok = succeeded(&outcome);
            all_succeeded &= ok;
            let entry = match &outcome.response {
                Some(response) if ok => response.clone(),
                Some(response) => enriched_failure(response),
                None => connect_failure(&outcome),
            };
            results.insert(property.to_string(), entry);
        }

        let body = json!({
            "success": all_succeeded,
            "message": if all_succeeded { "Pawn properties set" } else { "Some pawn properties failed to set" },
            "results": results,
        });
        if all_succeeded {
            Ok(json_success(body))
        } else {
            Ok(CallToolResult::error(vec![Content::text(body.to_string())]))
        }
    }

    #[tool(description = "Copies a Blueprint under a new name, optionally into another folder.")]
    async fn duplicate_blueprint(
        &self,
        Parameters(args): Parameters<blueprint::DuplicateBlueprint>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Returns the nodes and connections of a Blueprint's event graph.")]
    async fn get_blueprint_graph(
        &self,
        Parameters(args): Parameters<blueprint::BlueprintRef>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(blueprint::GetBlueprintGraph(args)).await
    }

    #[tool(description = "Lists C++ classes and Blueprints in the project, optionally filtered by parent, module or path.")]
    async fn scan_project_classes(
        &self,
        Parameters(args): Parameters<blueprint::ScanProjectClasses>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Creates a data asset of a DataAsset subclass, optionally with initial values.")]
    async fn create_data_asset(
        &self,
        Parameters(args): Parameters<blueprint::CreateDataAsset>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the properties of a Blueprint, optionally including inherited ones.")]
    async fn get_blueprint_properties(
        &self,
        Parameters(args): Parameters<blueprint::GetBlueprintProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on a data asset.")]
    async fn set_data_asset_property(
        &self,
        Parameters(args): Parameters<blueprint::SetDataAssetProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets several properties on a data asset or Blueprint in one call.")]
    async fn batch_set_properties(
        &self,
        Parameters(args): Parameters<blueprint::BatchSetProperties>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets an array-of-classes property on a Blueprint's defaults.")]
    async fn set_blueprint_class_array(
        &self,
        Parameters(args): Parameters<blueprint::SetBlueprintClassArray>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Replaces an array-of-structs property on a Blueprint's defaults.")]
    async fn set_struct_array_property(
        &self,
        Parameters(args): Parameters<blueprint::SetStructArrayProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a class reference property (TSubclassOf) on a Blueprint's defaults.")]
    async fn set_class_property(
        &self,
        Parameters(args): Parameters<blueprint::SetClassProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets an object reference property to an asset on a Blueprint's defaults.")]
    async fn set_object_property(
        &self,
        Parameters(args): Parameters<blueprint::SetObjectProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Updates fields of one element of an array-of-structs property.")]
    async fn set_struct_property(
        &self,
        Parameters(args): Parameters<blueprint::SetStructProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Blueprint nodes

    #[tool(description = "Adds an event node such as ReceiveBeginPlay to a Blueprint's event graph.")]
    async fn add_blueprint_event_node(
        &self,
        Parameters(args): Parameters<nodes::AddEventNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Print String node to a Blueprint's event graph.")]
    async fn add_print_string_node(
        &self,
        Parameters(args): Parameters<nodes::AddPrintStringNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Connects an output pin of one node to an input pin of another.")]
    async fn connect_blueprint_nodes(
        &self,
        Parameters(args): Parameters<nodes::ConnectNodes>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Finds nodes in a Blueprint's event graph by kind or event.")]
    async fn find_blueprint_nodes(
        &self,
        Parameters(args): Parameters<nodes::FindNodes>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a member variable to a Blueprint.")]
    async fn add_blueprint_variable(
        &self,
        Parameters(args): Parameters<nodes::AddBlueprintVariable>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Widgets

    #[tool(description = "Creates a UMG Widget Blueprint.")]
    async fn create_umg_widget_blueprint(
        &self,
        Parameters(args): Parameters<umg::CreateWidgetBlueprint>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Text Block at a canvas position.")]
    async fn add_text_block_to_widget(
        &self,
        Parameters(args): Parameters<umg::AddTextBlock>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds an anchored Text Block, e.g. a crosshair.")]
    async fn add_text_to_widget(
        &self,
        Parameters(args): Parameters<umg::AddText>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Button with a text label.")]
    async fn add_button_to_widget(
        &self,
        Parameters(args): Parameters<umg::AddButton>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds an Image, optionally textured.")]
    async fn add_image_to_widget(
        &self,
        Parameters(args): Parameters<umg::AddImage>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Progress Bar.")]
    async fn add_progressbar_to_widget(
        &self,
        Parameters(args): Parameters<umg::AddProgressBar>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Binds a widget element event (e.g. OnClicked) to a function.")]
    async fn bind_widget_event(
        &self,
        Parameters(args): Parameters<umg::BindWidgetEvent>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Widget Blueprint instance to the viewport.")]
    async fn add_widget_to_viewport(
        &self,
        Parameters(args): Parameters<umg::AddWidgetToViewport>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the elements of a Widget Blueprint's widget tree.")]
    async fn get_widget_elements(
        &self,
        Parameters(args): Parameters<umg::GetWidgetElements>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Changes the canvas slot layout of a widget element. Only given fields change.")]
    async fn set_widget_slot_property(
        &self,
        Parameters(args): Parameters<umg::SetWidgetSlotProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Removes an element from a Widget Blueprint.")]
    async fn remove_widget_element(
        &self,
        Parameters(args): Parameters<umg::RemoveWidgetElement>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a member variable to a Widget Blueprint.")]
    async fn add_widget_variable(
        &self,
        Parameters(args): Parameters<umg::AddWidgetVariable>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Creates an empty widget animation.")]
    async fn create_widget_animation(
        &self,
        Parameters(args): Parameters<umg::CreateWidgetAnimation>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Binds a Text Block property to a widget variable.")]
    async fn set_text_block_binding(
        &self,
        Parameters(args): Parameters<umg::SetTextBlockBinding>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on a widget element.")]
    async fn set_widget_element_property(
        &self,
        Parameters(args): Parameters<umg::SetWidgetElementProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Vertical Box panel, optionally inside a parent panel.")]
    async fn add_vertical_box_to_widget(
        &self,
        Parameters(args): Parameters<umg::BoxPanel>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(umg::AddVerticalBox(args)).await
    }

    #[tool(description = "Adds a Horizontal Box panel, optionally inside a parent panel.")]
    async fn add_horizontal_box_to_widget(
        &self,
        Parameters(args): Parameters<umg::BoxPanel>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(umg::AddHorizontalBox(args)).await
    }

    #[tool(description = "Moves a widget element under another panel. A slot index of -1 appends.")]
    async fn reparent_widget_element(
        &self,
        Parameters(args): Parameters<umg::ReparentWidgetElement>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets the default value of a Widget Blueprint variable.")]
    async fn set_widget_variable_default(
        &self,
        Parameters(args): Parameters<umg::SetWidgetVariableDefault>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a function with optional input and output pins to a Widget Blueprint.")]
    async fn add_widget_function(
        &self,
        Parameters(args): Parameters<umg::AddWidgetFunction>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a custom event to a Widget Blueprint.")]
    async fn add_widget_event(
        &self,
        Parameters(args): Parameters<umg::AddWidgetEvent>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Binds a widget element property to a Widget Blueprint variable.")]
    async fn bind_widget_to_variable(
        &self,
        Parameters(args): Parameters<umg::BindWidgetToVariable>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Project and assets

    #[tool(description = "Creates an Enhanced Input action.")]
    async fn create_input_action(
        &self,
        Parameters(args): Parameters<project::CreateInputAction>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Creates an Enhanced Input mapping context.")]
    async fn create_input_mapping_context(
        &self,
        Parameters(args): Parameters<project::CreateMappingContext>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Maps a key to an input action inside a mapping context.")]
    async fn add_action_to_mapping_context(
        &self,
        Parameters(args): Parameters<project::AddActionToMappingContext>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Deletes an asset by its content path.")]
    async fn delete_asset(
        &self,
        Parameters(args): Parameters<project::AssetPath>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(project::DeleteAsset(args)).await
    }

    #[tool(description = "Checks whether an asset exists at a content path.")]
    async fn asset_exists(
        &self,
        Parameters(args): Parameters<project::AssetPath>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(project::AssetExists(args)).await
    }

    #[tool(description = "Creates a content browser folder, including missing parents.")]
    async fn create_content_folder(
        &self,
        Parameters(args): Parameters<project::CreateContentFolder>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists assets in a content folder.")]
    async fn list_assets_in_folder(
        &self,
        Parameters(args): Parameters<project::ListAssetsInFolder>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Returns project name, engine version and content directories.")]
    async fn get_project_info(&self) -> Result<CallToolResult, ErrorData> {
        self.dispatch_bare("get_project_info").await
    }

    #[tool(description = "Lists assets that reference the given asset.")]
    async fn find_asset_references(
        &self,
        Parameters(args): Parameters<project::AssetPath>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(project::FindAssetReferences(args)).await
    }

    #[tool(description = "Creates a legacy input action or axis mapping in the project settings.")]
    async fn create_input_mapping(
        &self,
        Parameters(args): Parameters<project::CreateInputMapping>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds an input mapping context to a Blueprint's BeginPlay.")]
    async fn add_mapping_context_to_blueprint(
        &self,
        Parameters(args): Parameters<project::MappingContextBinding>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(project::AddMappingContextToBlueprint(args)).await
    }

    #[tool(description = "Sets the default input mapping context on a Blueprint.")]
    async fn set_default_mapping_context(
        &self,
        Parameters(args): Parameters<project::MappingContextBinding>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(project::SetDefaultMappingContext(args)).await
    }

    #[tool(description = "Imports an image file as a texture asset.")]
    async fn import_texture(
        &self,
        Parameters(args): Parameters<project::ImportTexture>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Gameplay tags

    #[tool(description = "Adds gameplay tags to the project's tag table. Existing tags are skipped.")]
    async fn add_gameplay_tags(
        &self,
        Parameters(args): Parameters<gas::AddGameplayTags>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists gameplay tags, optionally by prefix.")]
    async fn list_gameplay_tags(
        &self,
        Parameters(args): Parameters<gas::ListGameplayTags>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Removes a gameplay tag.")]
    async fn remove_gameplay_tag(
        &self,
        Parameters(args): Parameters<gas::RemoveGameplayTag>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // AI

    #[tool(description = "Creates a Blackboard asset.")]
    async fn create_blackboard(
        &self,
        Parameters(args): Parameters<ai::CreateBlackboard>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a key to a Blackboard.")]
    async fn add_blackboard_key(
        &self,
        Parameters(args): Parameters<ai::AddBlackboardKey>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the keys of a Blackboard.")]
    async fn list_blackboard_keys(
        &self,
        Parameters(args): Parameters<ai::ListBlackboardKeys>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Creates a Behavior Tree, optionally bound to a Blackboard.")]
    async fn create_behavior_tree(
        &self,
        Parameters(args): Parameters<ai::CreateBehaviorTree>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a Selector, Sequence or SimpleParallel node to a Behavior Tree.")]
    async fn add_bt_composite_node(
        &self,
        Parameters(args): Parameters<ai::AddCompositeNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Adds a task node under a composite node.")]
    async fn add_bt_task_node(
        &self,
        Parameters(args): Parameters<ai::AddTaskNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Moves a node under a new parent in a Behavior Tree.")]
    async fn connect_bt_nodes(
        &self,
        Parameters(args): Parameters<ai::ConnectBtNodes>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Sets a property on a Behavior Tree node.")]
    async fn set_bt_node_property(
        &self,
        Parameters(args): Parameters<ai::SetBtNodeProperty>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Deletes a node from a Behavior Tree.")]
    async fn delete_bt_node(
        &self,
        Parameters(args): Parameters<ai::DeleteBtNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the nodes of a Behavior Tree with their hierarchy.")]
    async fn list_bt_nodes(
        &self,
        Parameters(args): Parameters<ai::ListBtNodes>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Removes a key from a Blackboard.")]
    async fn remove_blackboard_key(
        &self,
        Parameters(args): Parameters<ai::RemoveBlackboardKey>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Assigns a Blackboard to a Behavior Tree.")]
    async fn set_behavior_tree_blackboard(
        &self,
        Parameters(args): Parameters<ai::SetBehaviorTreeBlackboard>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Returns the node hierarchy and Blackboard of a Behavior Tree.")]
    async fn get_behavior_tree_structure(
        &self,
        Parameters(args): Parameters<ai::GetBehaviorTreeStructure>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Attaches a decorator to a Behavior Tree node.")]
    async fn add_bt_decorator_node(
        &self,
        Parameters(args): Parameters<ai::AddDecoratorNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Attaches a service to a composite node.")]
    async fn add_bt_service_node(
        &self,
        Parameters(args): Parameters<ai::AddServiceNode>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists the composite, task, decorator and service classes available.")]
    async fn list_bt_node_types(
        &self,
        Parameters(args): Parameters<ai::ListBtNodeTypes>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Moves a node in the Behavior Tree graph.")]
    async fn set_bt_node_position(
        &self,
        Parameters(args): Parameters<ai::SetBtNodePosition>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lays out a Behavior Tree graph as a tree.")]
    async fn auto_layout_bt(
        &self,
        Parameters(args): Parameters<ai::AutoLayoutBt>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    #[tool(description = "Lists Behavior Tree and Blackboard assets.")]
    async fn list_ai_assets(
        &self,
        Parameters(args): Parameters<ai::ListAiAssets>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(args).await
    }

    // Knowledge base

    #[tool(description = "Searches the design knowledge base.")]
    async fn search_knowledge(
        &self,
        Parameters(args): Parameters<kb::SearchKnowledge>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.knowledge.search(&args.into()).await {
            Ok(outcome) => Ok(json_success(json!({
                "success": true,
                "query": outcome.query,
                "count": outcome.hits.len(),
                "results": outcome.hits,
            }))),
            Err(err) => Ok(knowledge_failure(&err)),
        }
    }

    #[tool(description = "Stores a document in the design knowledge base.")]
    async fn add_knowledge(
        &self,
        Parameters(args): Parameters<kb::AddKnowledge>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.knowledge.add(&NewKnowledge::from(args)).await {
            Ok(stored) => Ok(json_success(json!({
                "success": true,
                "status": stored.status.as_deref().unwrap_or("added"),
                "message": format!("Knowledge added with ID: {}", stored.id.as_deref().unwrap_or_default()),
                "id": stored.id,
            }))),
            Err(err) => Ok(knowledge_failure(&err)),
        }
    }

    #[tool(description = "Lists every document in the design knowledge base.")]
    async fn list_knowledge(&self) -> Result<CallToolResult, ErrorData> {
        match self.knowledge.list().await {
            Ok(listing) => Ok(json_success(json!({
                "success": true,
                "count": listing.count,
                "items": listing.items,
            }))),
            Err(err) => Ok(knowledge_failure(&err)),
        }
    }

    #[tool(description = "Deletes a document from the design knowledge base.")]
    async fn delete_knowledge(
        &self,
        Parameters(args): Parameters<kb::DeleteKnowledge>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.knowledge.delete(&args.doc_id).await {
            Ok(stored) => Ok(json_success(json!({
                "success": true,
                "status": stored.status.as_deref().unwrap_or("deleted"),
                "id": stored.id,
                "message": format!("Knowledge with ID {} deleted successfully", args.doc_id),
            }))),
            Err(err) => Ok(knowledge_failure(&err)),
        }
    }

    #[tool(
        description = "Suggests engine classes, knowledge base entries and project classes relevant to a feature description."
    )]
    async fn find_relevant_nodes(
        &self,
        Parameters(args): Parameters<kb::FindRelevantNodes>,
    ) -> Result<CallToolResult, ErrorData> {
        let query = RelevantNodesQuery::from(args);
        let found = knowledge::find_relevant_nodes(&self.connection, &self.knowledge, &query).await;
        match serde_json::to_value(&found) {
            Ok(value) => Ok(json_success(value)),
            Err(err) => Ok(failure(format!("Failed to encode results: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::connection::ConnectionConfig;
    use crate::knowledge::KnowledgeConfig;
    use crate::test_support::{echo_success, refused_port, MockKnowledge, MockPeer};
    use std::time::Duration;

    fn knowledge_at(base_url: &str) -> Arc<KnowledgeClient> {
        Arc::new(
            KnowledgeClient::new(KnowledgeConfig {
                base_url: base_url.to_string(),
                timeout: Duration::from_secs(2),
            })
            .unwrap(),
        )
    }

    fn unreachable_knowledge() -> Arc<KnowledgeClient> {
        knowledge_at(&format!("http://127.0.0.1:{}", refused_port()))
    }

    /// Returns the JSON carried in the result's text and its error flag.
    fn read(result: &CallToolResult) -> (JsonValue, bool) {
        let wire = serde_json::to_value(result).unwrap();
        let text = wire["content"][0]["text"].as_str().unwrap();
        (
            serde_json::from_str(text).unwrap(),
            wire["isError"].as_bool().unwrap_or(false),
        )
    }

    fn args<T: serde::de::DeserializeOwned>(value: JsonValue) -> Parameters<T> {
        Parameters(serde_json::from_value(value).unwrap())
    }

    #[tokio::test]
    async fn ping_passes_the_response_through() {
        let peer = MockPeer::start(|_| json!({"status": "success", "result": {"message": "pong"}})).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let (body, is_error) = read(&server.ping().await.unwrap());
        assert!(!is_error);
        assert_eq!(body["result"]["message"], "pong");
    }

    #[tokio::test]
    async fn unreachable_editor_reports_connection_failure() {
        let connection = Arc::new(UnrealConnection::new(
            ConnectionConfig::new("127.0.0.1", refused_port()).with_timeout(Duration::from_secs(1)),
        ));
        let server = UnrealEditorServer::new(connection, unreachable_knowledge());

        let result = server
            .delete_actor(args(json!({"name": "Cube_1"})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(is_error);
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to connect to Unreal Engine: "));
    }

    #[tokio::test]
    async fn remote_errors_are_passed_through_with_classification() {
        let peer = MockPeer::start(|_| {
            json!({"status": "error", "error": "Blueprint not found: BP_Missing", "error_code": 1200})
        })
        .await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let result = server
            .compile_blueprint(args(json!({"blueprint_name": "BP_Missing"})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(is_error);
        assert_eq!(body["status"], "error");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Blueprint not found: BP_Missing");
        assert_eq!(body["error"], "Blueprint not found: BP_Missing");
        assert_eq!(body["error_name"], "BLUEPRINT_NOT_FOUND");
        assert_eq!(body["category"], "Blueprint");
    }

    #[tokio::test]
    async fn uncoded_remote_errors_still_carry_the_failure_shape() {
        let peer = MockPeer::start(|_| json!({"status": "error", "error": "Unknown command: foo"})).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let (body, is_error) = read(&server.ping().await.unwrap());
        assert!(is_error);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unknown command: foo");
        assert!(body.get("error_name").is_none());

        let peer = MockPeer::start(|_| json!({"status": "error"})).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());
        let (body, _) = read(&server.ping().await.unwrap());
        assert_eq!(body["message"], "Unknown error");
    }

    #[tokio::test]
    async fn handler_rejection_inside_success_envelope_is_a_failure() {
        let peer = MockPeer::start(|_| {
            json!({
                "status": "success",
                "result": {"success": false, "error": "Parent class not found: Actr", "error_code": 1211},
            })
        })
        .await;
        let rag = MockKnowledge::start().await;
        let server = UnrealEditorServer::new(peer.connection(), knowledge_at(&rag.base_url));

        let result = server
            .create_blueprint(args(json!({
                "name": "BP_Door",
                "parent_class": "Actr",
                "rationale": "Doors need their own collision",
            })))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(is_error);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Parent class not found: Actr");
        assert_eq!(body["error_name"], "CLASS_NOT_FOUND");
        assert_eq!(body["category"], "Blueprint");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rag.requests().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_vectors_never_reach_the_editor() {
        let peer = MockPeer::start(echo_success).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let result = server
            .spawn_actor(args(json!({"name": "Light", "type": "PointLight", "location": [1.0, 2.0]})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(is_error);
        assert_eq!(
            body["message"],
            "Invalid location format. Must be a list of 3 float values, got 2."
        );
        assert!(peer.received().await.is_empty());
    }

    #[tokio::test]
    async fn successful_tool_sends_shaped_params() {
        let peer = MockPeer::start(echo_success).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let result = server
            .spawn_actor(args(json!({"name": "Light", "type": "pointlight"})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(!is_error);
        assert_eq!(body["result"]["params"]["type"], "POINTLIGHT");

        let received = peer.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "spawn_actor");
    }

    #[tokio::test]
    async fn rationale_is_recorded_after_success() {
        let peer = MockPeer::start(echo_success).await;
        let rag = MockKnowledge::start().await;
        let server = UnrealEditorServer::new(peer.connection(), knowledge_at(&rag.base_url));

        server
            .create_blueprint(args(json!({
                "name": "BP_Door",
                "parent_class": "Actor",
                "rationale": "Doors need their own collision",
            })))
            .await
            .unwrap();

        let requests = rag.wait_for_requests(1).await;
        assert_eq!(requests.len(), 1);
        let (kind, body) = &requests[0];
        assert_eq!(kind, "add");
        assert_eq!(body["category"], "blueprint");
        assert_eq!(body["tags"], "rationale,create_blueprint");
        assert!(body["document"]
            .as_str()
            .unwrap()
            .contains("Rationale: Doors need their own collision"));
        assert!(!peer.received().await[0].params.contains_key("rationale"));
    }

    #[tokio::test]
    async fn rationale_is_skipped_after_failure() {
        let peer = MockPeer::start(|_| json!({"status": "error", "error": "nope"})).await;
        let rag = MockKnowledge::start().await;
        let server = UnrealEditorServer::new(peer.connection(), knowledge_at(&rag.base_url));

        server
            .create_blueprint(args(json!({
                "name": "BP_Door",
                "parent_class": "Actor",
                "rationale": "Doors need their own collision",
            })))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rag.requests().await.is_empty());
    }

    #[tokio::test]
    async fn actors_in_level_returns_the_array() {
        let peer = MockPeer::start(|_| {
            json!({"status": "success", "result": {"actors": [{"name": "Floor"}, {"name": "Sun"}]}})
        })
        .await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let (body, is_error) = read(&server.get_actors_in_level().await.unwrap());
        assert!(!is_error);
        assert_eq!(body, json!([{"name": "Floor"}, {"name": "Sun"}]));
    }

    #[tokio::test]
    async fn pawn_properties_aggregate_per_property() {
        let peer = MockPeer::start(|command: Command| {
            if command.params["property_name"] == "bCanBeDamaged" {
                json!({"status": "error", "error": "Property not found", "error_code": 1403})
            } else {
                echo_success(command)
            }
        })
        .await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let result = server
            .set_pawn_properties(args(json!({
                "blueprint_name": "BP_Hero",
                "use_controller_rotation_yaw": true,
                "can_be_damaged": false,
            })))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(is_error);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Some pawn properties failed to set");
        assert_eq!(body["results"]["bUseControllerRotationYaw"]["status"], "success");
        assert_eq!(body["results"]["bCanBeDamaged"]["error"], "Property not found");

        let sent: Vec<_> = peer.received().await.into_iter().map(|c| c.name).collect();
        assert_eq!(sent, ["set_blueprint_property", "set_blueprint_property"]);
    }

    #[tokio::test]
    async fn pawn_properties_without_fields_send_nothing() {
        let peer = MockPeer::start(echo_success).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let result = server
            .set_pawn_properties(args(json!({"blueprint_name": "BP_Hero"})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(!is_error);
        assert_eq!(
            body,
            json!({"success": true, "message": "No properties specified to set", "results": {}})
        );
        assert!(peer.received().await.is_empty());
    }

    #[tokio::test]
    async fn focus_viewport_without_target_or_location_fails_locally() {
        let peer = MockPeer::start(echo_success).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let (body, is_error) = read(&server.focus_viewport(args(json!({}))).await.unwrap());
        assert!(is_error);
        assert_eq!(body["message"], "Either 'target' or 'location' must be provided");
        assert!(peer.received().await.is_empty());
    }

    #[tokio::test]
    async fn search_knowledge_normalizes_hits() {
        let peer = MockPeer::start(echo_success).await;
        let rag = MockKnowledge::start().await;
        let server = UnrealEditorServer::new(peer.connection(), knowledge_at(&rag.base_url));

        let result = server
            .search_knowledge(args(json!({"query": "chase the player"})))
            .await
            .unwrap();
        let (body, is_error) = read(&result);
        assert!(!is_error);
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"][0]["relevance"], 0.75);
        assert_eq!(body["results"][0]["category"], "ai");

        let requests = rag.requests().await;
        assert_eq!(requests[0].1, json!({"query": "chase the player", "n_results": 3}));
    }

    #[tokio::test]
    async fn knowledge_connect_failure_carries_hint() {
        let peer = MockPeer::start(echo_success).await;
        let server = UnrealEditorServer::new(peer.connection(), unreachable_knowledge());

        let (body, is_error) = read(&server.list_knowledge().await.unwrap());
        assert!(is_error);
        assert_eq!(body["success"], false);
        assert_eq!(body["hint"], RAG_HINT);
    }

    #[tokio::test]
    async fn delete_knowledge_echoes_the_id() {
        let peer = MockPeer::start(echo_success).await;
        let rag = MockKnowledge::start().await;
        let server = UnrealEditorServer::new(peer.connection(), knowledge_at(&rag.base_url));

        let result = server
            .delete_knowledge(args(json!({"doc_id": "doc_1"})))
            .await
            .unwrap();
        let (body, _) = read(&result);
        assert_eq!(body["id"], "doc_1");
        assert_eq!(body["status"], "deleted");
        assert_eq!(body["message"], "Knowledge with ID doc_1 deleted successfully");
    }

    #[test]
    fn every_tool_is_routed() {
        let server = UnrealEditorServer::new(
            Arc::new(UnrealConnection::new(ConnectionConfig::default())),
            unreachable_knowledge(),
        );
        let names: Vec<_> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "ping",
            "set_actor_component_property",
            "set_pawn_properties",
            "add_print_string_node",
            "create_widget_animation",
            "find_asset_references",
            "remove_gameplay_tag",
            "list_bt_nodes",
            "find_relevant_nodes",
            "set_struct_property",
            "add_horizontal_box_to_widget",
            "bind_widget_to_variable",
            "set_default_mapping_context",
            "import_texture",
            "auto_layout_bt",
            "list_ai_assets",
        ] {
            assert!(names.iter().any(|name| name == expected), "missing {expected}");
        }
        assert_eq!(names.len(), 100);
    }
}
