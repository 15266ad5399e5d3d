//! Inspection tools: hashing, tokens, URLs, patterns, schedules and diffs.

mod cron_parse;
mod hash_generate;
mod jwt_decode;
mod text_diff;
mod url_parse;

pub use cron_parse::{CronParseOutput, CronParseParams, CronParseTool, NEXT_RUNS};
pub use hash_generate::{ALGORITHMS, HashGenerateOutput, HashGenerateParams, HashGenerateTool};
pub use jwt_decode::{JwtDecodeOutput, JwtDecodeParams, JwtDecodeTool};
pub use regex_test::{RegexMatch, RegexTestOutput, RegexTestParams, RegexTestTool};
pub use text_diff::{DiffPart, TextDiffOutput, TextDiffParams, TextDiffTool};
pub use url_parse::{UrlParseOutput, UrlParseParams, UrlParseTool};
