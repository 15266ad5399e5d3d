//! String case converter tool definition.
//!
//! Word detection uses ASCII word characters, so `héllo wörld` splits the
//! way a browser regex would.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

/// A word: a word character followed by anything but whitespace.
static TITLE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]\S*").expect("valid title regex"));

/// Letters that start a camel/pascal segment: the first character, any
/// capital, and any character right after a word boundary.
static SEGMENT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^[A-Za-z0-9_]|[A-Z]|(?-u:\b)[A-Za-z0-9_])").expect("valid segment regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid capital regex"));

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaseConvertParams {
    /// Text to convert.
    pub input: String,
}

/// Every supported case of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaseConvertOutput {
    pub lower: String,
    pub upper: String,
    pub title: String,
    pub camel: String,
    pub pascal: String,
    pub snake: String,
    pub kebab: String,
}

pub struct CaseConvertTool;

impl TransformTool for CaseConvertTool {
    type Params = CaseConvertParams;
    type Output = CaseConvertOutput;

    const NAME: &'static str = "case_convert";
    const TITLE: &'static str = "String Case Converter";
    const DESCRIPTION: &'static str = "Convert text to lower, UPPER, Title, camelCase, PascalCase, snake_case and kebab-case at once.";
    const SLUG: &'static str = "case";

    fn transform(params: &CaseConvertParams) -> Result<CaseConvertOutput, ToolError> {
        let input = params.input.as_str();
        if input.trim().is_empty() {
            return Ok(CaseConvertOutput::default());
        }
        Ok(CaseConvertOutput {
            lower: input.to_lowercase(),
            upper: input.to_uppercase(),
            title: to_title_case(input),
            camel: to_camel_case(input),
            pascal: to_pascal_case(input),
            snake: to_separated_case(input, '_'),
            kebab: to_separated_case(input, '-'),
        })
    }

    fn summarize(output: &CaseConvertOutput) -> String {
        format!(
            "lower: {}\nupper: {}\ntitle: {}\ncamel: {}\npascal: {}\nsnake: {}\nkebab: {}",
            output.lower,
            output.upper,
            output.title,
            output.camel,
            output.pascal,
            output.snake,
            output.kebab
        )
    }
}

pub fn to_title_case(input: &str) -> String {
    TITLE_WORD
        .replace_all(input, |caps: &Captures| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .into_owned()
}

pub fn to_camel_case(input: &str) -> String {
    let marked = SEGMENT_START.replace_all(input, |caps: &Captures| {
        let letter = caps.get(0).map_or("", |m| m.as_str());
        let at_start = caps.get(0).is_some_and(|m| m.start() == 0);
        if at_start {
            letter.to_lowercase()
        } else {
            letter.to_uppercase()
        }
    });
    WHITESPACE.replace_all(&marked, "").into_owned()
}

pub fn to_pascal_case(input: &str) -> String {
    let marked = SEGMENT_START.replace_all(input, |caps: &Captures| caps[0].to_uppercase());
    WHITESPACE.replace_all(&marked, "").into_owned()
}

/// snake_case or kebab-case, depending on `separator`.
pub fn to_separated_case(input: &str, separator: char) -> String {
    let sep = separator.to_string();
    let spaced = WHITESPACE.replace_all(input, sep.as_str());
    let split = CAPITAL.replace_all(&spaced, |caps: &Captures| {
        format!("{separator}{}", caps[0].to_lowercase())
    });
    split
        .strip_prefix(separator)
        .unwrap_or(split.as_ref())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cases_for_simple_phrase() {
        let output = CaseConvertTool::transform(&CaseConvertParams {
            input: "hello world example".to_string(),
        })
        .unwrap();
        assert_eq!(output.lower, "hello world example");
        assert_eq!(output.upper, "HELLO WORLD EXAMPLE");
        assert_eq!(output.title, "Hello World Example");
        assert_eq!(output.camel, "helloWorldExample");
        assert_eq!(output.pascal, "HelloWorldExample");
        assert_eq!(output.snake, "hello_world_example");
        assert_eq!(output.kebab, "hello-world-example");
    }

    #[test]
    fn test_camel_input_is_split_on_capitals() {
        assert_eq!(to_separated_case("someVariableName", '_'), "some_variable_name");
        assert_eq!(to_separated_case("SomeVariable", '-'), "some-variable");
        assert_eq!(to_camel_case("Some variable"), "someVariable");
        assert_eq!(to_pascal_case("some variable"), "SomeVariable");
    }

    #[test]
    fn test_title_case_lowercases_rest_of_word() {
        assert_eq!(to_title_case("hELLO wORLD"), "Hello World");
        assert_eq!(to_title_case("it's 2024-ok"), "It's 2024-ok");
    }

    #[test]
    fn test_blank_input() {
        let output = CaseConvertTool::transform(&CaseConvertParams {
            input: "   ".to_string(),
        })
        .unwrap();
        assert_eq!(output, CaseConvertOutput::default());
    }
}
