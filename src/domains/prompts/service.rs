//! Prompt service implementation.
//!
//! Prompts are defined in `definitions/` and registered via `registry.rs`.
//! Adding a new prompt does NOT require modifying this file.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for listing and instantiating prompts.
pub struct PromptService {
    /// Key: prompt name. Ordered so listings are stable.
    prompts: BTreeMap<String, PromptTemplate>,
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptService {
    pub fn new() -> Self {
        info!("Initializing PromptService");

        let mut service = Self {
            prompts: BTreeMap::new(),
        };
        for template in get_all_prompts() {
            service.register_prompt(template);
        }
        service
    }

    /// Register a prompt template, replacing any with the same name.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        debug!("Registering prompt: {}", template.name);
        self.prompts.insert(template.name.clone(), template);
    }

    /// List all available prompts, sorted by name.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .values()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: template.title.clone(),
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Render a prompt into a single user message.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let content = template.instantiate(arguments.unwrap_or_default())?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &GetPromptResult) -> String {
        let content = serde_json::to_value(&result.messages[0].content).unwrap();
        content["text"].as_str().unwrap_or_default().to_string()
    }

    fn args(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_list_prompts_sorted() {
        let service = PromptService::new();
        let names: Vec<_> = service
            .list_prompts()
            .await
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["explain_cron", "explain_regex", "structure_prompt"]);
    }

    #[tokio::test]
    async fn test_structure_prompt_renders_text() {
        let service = PromptService::new();
        let result = service
            .get_prompt("structure_prompt", args(&[("text", "sort a list")]))
            .await
            .unwrap();
        let text = text_of(&result);
        assert!(text.ends_with("Convert this text into a well-structured prompt: sort a list"));
        assert!(!text.contains("{{"));
    }

    #[tokio::test]
    async fn test_explain_regex_with_and_without_flags() {
        let service = PromptService::new();
        let plain = service
            .get_prompt("explain_regex", args(&[("pattern", "a+")]))
            .await
            .unwrap();
        assert!(!text_of(&plain).contains("flags"));

        let flagged = service
            .get_prompt("explain_regex", args(&[("pattern", "a+"), ("flags", "gi")]))
            .await
            .unwrap();
        assert!(text_of(&flagged).contains("(flags: `gi`)"));
    }

    #[tokio::test]
    async fn test_explain_cron_lists_runs() {
        let service = PromptService::new();
        let result = service
            .get_prompt("explain_cron", args(&[("expression", "0 9 * * 1")]))
            .await
            .unwrap();
        assert!(text_of(&result).contains("next fire times"));
    }

    #[tokio::test]
    async fn test_missing_argument_and_unknown_prompt() {
        let service = PromptService::new();
        assert!(matches!(
            service.get_prompt("explain_cron", None).await,
            Err(PromptError::MissingArgument(_))
        ));
        assert!(matches!(
            service.get_prompt("nonexistent", None).await,
            Err(PromptError::NotFound(_))
        ));
    }
}
