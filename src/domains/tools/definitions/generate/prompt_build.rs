//! AI prompt builder tool definition.
//!
//! The only tool that leaves the process: it sends the user's text to an
//! OpenAI-compatible chat-completion endpoint (OpenRouter by default) and
//! returns the structured prompt it answers with.

use async_trait::async_trait;
use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::core::ToolContext;
use crate::core::config::Config;
use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    CatalogEntry, TextOutput, error_result, parse_arguments, structured_result,
};

/// Instructions given to the model ahead of the user's text.
pub const SYSTEM_MESSAGE: &str = "You are a helpful assistant that converts user input into well-structured, effective prompts. Your task is to take the user's input and transform it into a clear, detailed prompt that would get the best results from an AI system.";

const USER_PREFIX: &str = "Convert this text into a well-structured prompt: ";
const APP_TITLE: &str = "Code-mo Prompt Builder";

const EMPTY_INPUT: &str = "Please enter some text to generate a prompt";
const MISSING_KEY: &str = "OpenRouter API key is not set";
const NO_RESPONSE: &str = "No response generated";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptBuildParams {
    /// Rough description of what the prompt should achieve.
    pub input: String,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Messages sent for `input`.
pub fn build_messages(input: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_MESSAGE),
        ChatMessage::user(format!("{USER_PREFIX}{input}")),
    ]
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `messages` and return the first answer's text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ToolError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenRouter (or any OpenAI-compatible) client.
pub struct OpenRouterClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Secret<String>,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenRouterClient {
    /// Build a client from configuration. Fails when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        let api_key = config
            .credentials
            .openrouter_api_key()
            .ok_or_else(|| ToolError::validation(MISSING_KEY))?;

        let settings = &config.prompt_builder;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ToolError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            api_key: Secret::new(api_key.to_string()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ToolError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };
        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::Timeout
                } else {
                    ToolError::network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_completion(status, &body)
    }
}

/// Interpret a chat-completion response body.
pub fn parse_completion(status: u16, body: &Value) -> Result<String, ToolError> {
    if !(200..300).contains(&status) {
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("API request failed with status {status}"));
        return Err(ToolError::api(status, message));
    }

    let response: ChatResponse = serde_json::from_value(body.clone()).unwrap_or_default();
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| NO_RESPONSE.to_string());
    Ok(content)
}

pub struct PromptBuildTool;

impl PromptBuildTool {
    pub const NAME: &'static str = "prompt_build";
    pub const TITLE: &'static str = "AI Prompt Builder";
    pub const DESCRIPTION: &'static str = "Turn rough text into a well-structured prompt using a chat-completion model (requires MCP_OPENROUTER_API_KEY).";
    pub const SLUG: &'static str = "prompt-builder";

    /// Run a direct call: persist, check preconditions, query the model.
    #[instrument(skip_all, fields(tool = Self::NAME))]
    pub async fn execute(params: &PromptBuildParams, ctx: &ToolContext) -> CallToolResult {
        info!("{} called", Self::NAME);
        ctx.persist_input(Self::NAME, params);

        let client = match Self::prepare(params, ctx) {
            Ok(client) => client,
            Err(message) => return error_result(&message),
        };

        match Self::generate(&params.input, &client, ctx).await {
            Ok(output) => {
                ctx.tool_state(Self::NAME)
                    .set_success(format!("{} updated", Self::TITLE));
                structured_result(output.output.clone(), &output)
            }
            Err(message) => error_result(&message),
        }
    }

    /// Check the input and the API key. Whichever is missing is recorded in
    /// the tool state and raised as an error notification.
    fn prepare(params: &PromptBuildParams, ctx: &ToolContext) -> Result<OpenRouterClient, String> {
        let checked = if params.input.trim().is_empty() {
            Err(EMPTY_INPUT.to_string())
        } else {
            OpenRouterClient::from_config(ctx.config()).map_err(|e| e.to_string())
        };
        checked.inspect_err(|message| {
            ctx.tool_state(Self::NAME).set_error(message);
            ctx.notifications().error(message.clone());
        })
    }

    /// Query `client` through the tool state. Failures are recorded in the
    /// state and returned as the message.
    pub async fn generate(
        input: &str,
        client: &dyn CompletionClient,
        ctx: &ToolContext,
    ) -> Result<TextOutput, String> {
        let state = ctx.tool_state(Self::NAME);
        let messages = build_messages(input);

        match state.process_with_loading(client.complete(&messages)).await {
            Some(text) => {
                let output = TextOutput::new(text);
                match serde_json::to_value(&output) {
                    Ok(value) => state.set_data(value),
                    Err(e) => debug!("{} output not recorded: {}", Self::NAME, e),
                }
                Ok(output)
            }
            None => {
                let message = state
                    .snapshot()
                    .error
                    .unwrap_or_else(|| "An unknown error occurred".to_string());
                warn!("{} failed: {}", Self::NAME, message);
                Err(message)
            }
        }
    }

    /// Entry point for dispatch by name.
    pub async fn call(arguments: Value, ctx: &ToolContext) -> Result<CallToolResult, ToolError> {
        let params: PromptBuildParams = parse_arguments(arguments)?;
        Ok(Self::execute(&params, ctx).await)
    }

    /// Entry point for debounced live edits.
    pub async fn run_live(arguments: Value, ctx: ToolContext) {
        let params: PromptBuildParams = match parse_arguments(arguments) {
            Ok(params) => params,
            Err(e) => {
                ctx.tool_state(Self::NAME).set_error(&e);
                ctx.notifications().error(e.to_string());
                return;
            }
        };
        if let Ok(client) = Self::prepare(&params, &ctx) {
            let _ = Self::generate(&params.input, &client, &ctx).await;
        }
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<PromptBuildParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<TextOutput>().into()),
            icons: None,
            meta: None,
            title: Some(Self::TITLE.into()),
        }
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::new(Self::NAME, Self::TITLE, Self::SLUG, Self::DESCRIPTION)
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone().unwrap_or_default();
            let ctx = ctx.clone();
            async move {
                let params: PromptBuildParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}
