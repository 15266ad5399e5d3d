//! SQL formatter tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlformat::{FormatOptions, Indent, QueryParams};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{TextOutput, TransformTool};

fn default_uppercase() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SqlFormatParams {
    /// One or more SQL statements.
    pub input: String,

    /// Write reserved keywords in upper case (default true).
    #[serde(default = "default_uppercase")]
    pub uppercase: bool,
}

pub struct SqlFormatTool;

impl TransformTool for SqlFormatTool {
    type Params = SqlFormatParams;
    type Output = TextOutput;

    const NAME: &'static str = "sql_format";
    const TITLE: &'static str = "SQL Formatter";
    const DESCRIPTION: &'static str = "Format SQL statements with 2-space indentation, one clause per line.";
    const SLUG: &'static str = "sql";

    fn transform(params: &SqlFormatParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        Ok(TextOutput::new(format_sql(&params.input, params.uppercase)))
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

pub fn format_sql(input: &str, uppercase: bool) -> String {
    let options = FormatOptions {
        indent: Indent::Spaces(2),
        uppercase: Some(uppercase),
        lines_between_queries: 1,
        ..FormatOptions::default()
    };
    sqlformat::format(input, &QueryParams::None, &options)
}
