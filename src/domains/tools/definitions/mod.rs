//! Tool definitions module.
//!
//! Tools are grouped by what they do. Each tool lives in its own file.
//!
//! - `encoding` - two-way codecs and escapers
//! - `format` - formatters and format converters
//! - `inspect` - analysers that break input apart
//! - `generate` - identifier and prompt generators
//! - `session` - access to the shared context (live edits, notifications, saved input)

pub mod common;
pub mod encoding;
pub mod format;
pub mod generate;
pub mod inspect;
pub mod session;

pub use common::{CatalogEntry, CodecMode, EscapeMode, TextOutput, TransformTool};
pub use encoding::{
    Base64Params, Base64Tool, BackslashEscapeParams, BackslashEscapeTool, HtmlEncodeParams,
    HtmlEncodeTool, JsonEscapeParams, JsonEscapeTool, UrlEncodeParams, UrlEncodeTool,
};
pub use format::{
    CaseConvertTool, JsonFormatTool, MarkdownRenderTool, PhpSerializeTool, SqlFormatTool,
    YamlConvertTool,
};
pub use generate::{PromptBuildTool, UuidGenerateTool};
pub use inspect::{
    CronParseTool, HashGenerateTool, JwtDecodeTool, RegexTestTool, TextDiffTool, UrlParseTool,
};
pub use session::{LiveInputTool, LiveResultTool, NotificationsTool, StorageClearTool};
