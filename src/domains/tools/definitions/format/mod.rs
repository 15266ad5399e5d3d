//! Formatting and conversion tools.

mod case_convert;
mod json_format;
mod markdown_render;
mod php_serialize;
mod sql_format;
mod yaml_convert;

pub use case_convert::{CaseConvertOutput, CaseConvertParams, CaseConvertTool};
pub use json_format::{JsonFormatOutput, JsonFormatParams, JsonFormatTool};
pub use markdown_render::{MarkdownRenderOutput, MarkdownRenderParams, MarkdownRenderTool};
pub use php_serialize::{PhpMode, PhpSerializeParams, PhpSerializeTool};
pub use sql_format::{SqlFormatParams, SqlFormatTool};
pub use yaml_convert::{YamlConvertParams, YamlConvertTool, YamlMode};
