//! Markdown renderer tool definition.

use pulldown_cmark::{Options, Parser, html};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarkdownRenderParams {
    /// Markdown source.
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarkdownRenderOutput {
    /// Rendered HTML fragment.
    pub html: String,
    /// Number of whitespace-separated words in the source.
    pub word_count: usize,
}

pub struct MarkdownRenderTool;

impl TransformTool for MarkdownRenderTool {
    type Params = MarkdownRenderParams;
    type Output = MarkdownRenderOutput;

    const NAME: &'static str = "markdown_render";
    const TITLE: &'static str = "Markdown Editor";
    const DESCRIPTION: &'static str = "Render Markdown (with tables, strikethrough and task lists) to HTML and count its words.";
    const SLUG: &'static str = "markdown";

    fn transform(params: &MarkdownRenderParams) -> Result<MarkdownRenderOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(MarkdownRenderOutput {
                html: String::new(),
                word_count: 0,
            });
        }
        Ok(MarkdownRenderOutput {
            html: render_html(&params.input),
            word_count: params.input.split_whitespace().count(),
        })
    }

    fn summarize(output: &MarkdownRenderOutput) -> String {
        format!("{}\n\nWords: {}", output.html.trim_end(), output.word_count)
    }
}

pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> MarkdownRenderOutput {
        MarkdownRenderTool::transform(&MarkdownRenderParams {
            input: input.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_headings_and_emphasis() {
        let output = render("# Title\n\nSome **bold** text");
        assert!(output.html.contains("<h1>Title</h1>"));
        assert!(output.html.contains("<strong>bold</strong>"));
        assert_eq!(output.word_count, 5);
    }

    #[test]
    fn test_extensions_enabled() {
        let output = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done");
        assert!(output.html.contains("<table>"));
        assert!(output.html.contains("<del>gone</del>"));
        assert!(output.html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(
            render("\n\t "),
            MarkdownRenderOutput {
                html: String::new(),
                word_count: 0
            }
        );
    }
}
