//! Prompt templates module.
//!
//! Templates use a small mustache-like syntax:
//! - `{{name}}` inserts an argument (missing arguments render empty)
//! - `{{#if name}}...{{/if}}` keeps its body when `name` is set and non-empty
//! - `{{#if name}}...{{else}}...{{/if}}` with an alternative; blocks nest

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

/// Template arguments, after enrichment.
pub type PromptArguments = HashMap<String, String>;

/// Derives extra variables from the caller's arguments before rendering.
pub type Enricher = fn(&mut PromptArguments) -> Result<(), PromptError>;

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    pub title: Option<String>,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template source.
    pub template: String,

    pub enrich: Enricher,
}

fn no_enrichment(_: &mut PromptArguments) -> Result<(), PromptError> {
    Ok(())
}

impl PromptTemplate {
    /// Create a new prompt template without enrichment.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            description,
            arguments,
            template: template.into(),
            enrich: no_enrichment,
        }
    }

    /// Check required arguments, enrich, then render.
    pub fn instantiate(&self, mut arguments: PromptArguments) -> Result<String, PromptError> {
        for arg in &self.arguments {
            if arg.required.unwrap_or(false) && !arguments.contains_key(&arg.name) {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }
        (self.enrich)(&mut arguments)?;
        self.render(&arguments)
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &PromptArguments) -> Result<String, PromptError> {
        render_block(&self.template, arguments)
    }
}

/// Build a prompt argument.
pub fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

fn is_set(arguments: &PromptArguments, name: &str) -> bool {
    arguments.get(name).is_some_and(|v| !v.is_empty())
}

/// Position of the next `{{...}}` tag at or after `from`: (open, close, trimmed tag).
fn next_tag(src: &str, from: usize) -> Result<Option<(usize, usize, &str)>, PromptError> {
    let Some(offset) = src[from..].find("{{") else {
        return Ok(None);
    };
    let open = from + offset;
    let end = src[open + 2..]
        .find("}}")
        .ok_or_else(|| PromptError::template("Unclosed tag"))?;
    let close = open + 2 + end + 2;
    Ok(Some((open, close, src[open + 2..close - 2].trim())))
}

fn render_block(src: &str, arguments: &PromptArguments) -> Result<String, PromptError> {
    let mut out = String::with_capacity(src.len());
    let mut pos = 0;

    while let Some((open, close, tag)) = next_tag(src, pos)? {
        out.push_str(&src[pos..open]);

        if let Some(name) = tag.strip_prefix("#if ") {
            let block = split_if_block(&src[close..])?;
            let chosen = if is_set(arguments, name.trim()) {
                block.then_part
            } else {
                block.else_part
            };
            out.push_str(&render_block(chosen, arguments)?);
            pos = src.len() - block.tail.len();
        } else if tag == "else" || tag == "/if" {
            return Err(PromptError::template(format!("Unexpected {{{{{tag}}}}}")));
        } else {
            if let Some(value) = arguments.get(tag) {
                out.push_str(value);
            }
            pos = close;
        }
    }

    out.push_str(&src[pos..]);
    Ok(out)
}

struct IfBlock<'a> {
    then_part: &'a str,
    else_part: &'a str,
    tail: &'a str,
}

/// Split the text following `{{#if ...}}` at its matching `{{/if}}`.
fn split_if_block(src: &str) -> Result<IfBlock<'_>, PromptError> {
    let mut depth = 0usize;
    let mut else_tag: Option<(usize, usize)> = None;
    let mut pos = 0;

    while let Some((open, close, tag)) = next_tag(src, pos)? {
        if tag.starts_with("#if ") {
            depth += 1;
        } else if tag == "/if" {
            if depth == 0 {
                let (then_part, else_part) = match else_tag {
                    Some((else_open, else_close)) => (&src[..else_open], &src[else_close..open]),
                    None => (&src[..open], ""),
                };
                return Ok(IfBlock {
                    then_part,
                    else_part,
                    tail: &src[close..],
                });
            }
            depth -= 1;
        } else if tag == "else" && depth == 0 && else_tag.is_none() {
            else_tag = Some((open, close));
        }
        pos = close;
    }

    Err(PromptError::template("Missing {{/if}} tag"))
}
