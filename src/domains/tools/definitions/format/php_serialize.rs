//! PHP serialize/unserialize tool definition.
//!
//! Converts between JSON and PHP's `serialize()` format:
//!
//! | PHP | JSON |
//! |---|---|
//! | `N;` | `null` |
//! | `b:1;` | `true` |
//! | `i:42;` / `d:1.5;` | number |
//! | `s:5:"hello";` (byte length) | string |
//! | `a:2:{i:0;...;i:1;...;}` | array when keys are `0..n`, object otherwise |
//! | `O:3:"Foo":1:{...}` | object with a `__class` member |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{TextOutput, TransformTool};

/// Key holding the class name of an unserialized object.
pub const CLASS_KEY: &str = "__class";

const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhpMode {
    #[default]
    Serialize,
    Unserialize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhpSerializeParams {
    /// JSON to serialize, or PHP serialized data to decode.
    pub input: String,

    /// `serialize` (default) or `unserialize`.
    #[serde(default)]
    pub mode: PhpMode,
}

pub struct PhpSerializeTool;

impl TransformTool for PhpSerializeTool {
    type Params = PhpSerializeParams;
    type Output = TextOutput;

    const NAME: &'static str = "php_serialize";
    const TITLE: &'static str = "PHP Serializer";
    const DESCRIPTION: &'static str = "Serialize JSON into PHP serialize() format, or unserialize PHP data into 2-space indented JSON.";
    const SLUG: &'static str = "php";

    fn transform(params: &PhpSerializeParams) -> Result<TextOutput, ToolError> {
        if params.input.trim().is_empty() {
            return Ok(TextOutput::empty());
        }
        let output = match params.mode {
            PhpMode::Serialize => {
                let value: Value = serde_json::from_str(&params.input)
                    .map_err(|e| ToolError::validation(e.to_string()))?;
                serialize(&value)
            }
            PhpMode::Unserialize => {
                let value = unserialize(params.input.trim())?;
                serde_json::to_string_pretty(&value)
                    .map_err(|e| ToolError::internal(e.to_string()))?
            }
        };
        Ok(TextOutput::new(output))
    }

    fn summarize(output: &TextOutput) -> String {
        output.output.clone()
    }
}

// ============================================================================
// Serialize
// ============================================================================

pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push_str(&format!("a:{}:{{", items.len()));
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!("i:{i};"));
                write_value(out, item);
            }
            out.push('}');
        }
        Value::Object(map) => {
            let class = map.get(CLASS_KEY).and_then(Value::as_str);
            let members = map.iter().filter(|(k, _)| class.is_none() || *k != CLASS_KEY);
            let count = members.clone().count();

            match class {
                Some(name) => out.push_str(&format!("O:{}:\"{}\":{}:{{", name.len(), name, count)),
                None => out.push_str(&format!("a:{count}:{{")),
            }
            for (key, item) in members {
                write_key(out, key);
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        out.push_str(&format!("i:{i};"));
    } else if let Some(u) = n.as_u64() {
        out.push_str(&format!("i:{u};"));
    } else {
        let f = n.as_f64().unwrap_or(0.0);
        out.push_str(&format!("d:{f};"));
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&format!("s:{}:\"{}\";", s.len(), s));
}

/// Canonical integer keys are written as PHP integers, like PHP does.
fn write_key(out: &mut String, key: &str) {
    match key.parse::<i64>() {
        Ok(i) if i.to_string() == key => out.push_str(&format!("i:{i};")),
        _ => write_string(out, key),
    }
}

// ============================================================================
// Unserialize
// ============================================================================

pub fn unserialize(input: &str) -> Result<Value, ToolError> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
    };
    let value = parser.value(0)?;
    if parser.pos != parser.input.len() {
        return Err(parser.error("unexpected trailing data"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, what: &str) -> ToolError {
        ToolError::validation(format!(
            "Invalid serialized data at offset {}: {}",
            self.pos, what
        ))
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), ToolError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    /// Bytes up to (not including) `terminator`, which is consumed.
    fn until(&mut self, terminator: u8) -> Result<&'a str, ToolError> {
        let input = self.input;
        let start = self.pos;
        let offset = input[start..]
            .iter()
            .position(|b| *b == terminator)
            .ok_or_else(|| self.error(&format!("missing '{}'", terminator as char)))?;
        self.pos = start + offset + 1;
        std::str::from_utf8(&input[start..start + offset])
            .map_err(|_| self.error("invalid UTF-8"))
    }

    fn length(&mut self) -> Result<usize, ToolError> {
        let raw = self.until(b':')?;
        raw.parse().map_err(|_| self.error("invalid length"))
    }

    fn value(&mut self, depth: usize) -> Result<Value, ToolError> {
        if depth > MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        let tag = self.peek().ok_or_else(|| self.error("unexpected end of input"))?;
        self.pos += 1;

        if tag == b'N' {
            self.expect(b';')?;
            return Ok(Value::Null);
        }
        self.expect(b':')?;

        match tag {
            b'b' => match self.until(b';')? {
                "0" => Ok(Value::Bool(false)),
                "1" => Ok(Value::Bool(true)),
                _ => Err(self.error("invalid boolean")),
            },
            b'i' => {
                let raw = self.until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| self.error("invalid integer"))
            }
            b'd' => {
                let raw = self.until(b';')?;
                let f: f64 = match raw {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    _ => raw.parse().map_err(|_| self.error("invalid float"))?,
                };
                Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
            }
            b's' => self.string_body().map(Value::String),
            b'a' => {
                let count = self.length()?;
                self.members(count, depth).map(array_or_object)
            }
            b'O' => {
                let class = self.string_body_without_terminator()?;
                self.expect(b':')?;
                let count = self.length()?;
                let members = self.members(count, depth)?;

                let mut object = Map::new();
                object.insert(CLASS_KEY.to_string(), Value::String(class));
                for (key, value) in members {
                    object.insert(key_to_string(&key), value);
                }
                Ok(Value::Object(object))
            }
            other => {
                self.pos -= 2;
                Err(self.error(&format!("unknown type '{}'", other as char)))
            }
        }
    }

    /// `N:"...";` after the `s:` tag.
    fn string_body(&mut self) -> Result<String, ToolError> {
        let s = self.string_body_without_terminator()?;
        self.expect(b';')?;
        Ok(s)
    }

    /// `N:"..."` with a byte-length prefix.
    fn string_body_without_terminator(&mut self) -> Result<String, ToolError> {
        let len = self.length()?;
        self.expect(b'"')?;
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| self.error("string shorter than its length"))?;
        let bytes = self
            .input
            .get(self.pos..end)
            .ok_or_else(|| self.error("string shorter than its length"))?;
        let s = String::from_utf8(bytes.to_vec()).map_err(|_| self.error("invalid UTF-8"))?;
        self.pos = end;
        self.expect(b'"')?;
        Ok(s)
    }

    /// `{key;value...}` with `count` pairs.
    fn members(&mut self, count: usize, depth: usize) -> Result<Vec<(Value, Value)>, ToolError> {
        self.expect(b'{')?;
        let mut members = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let key = self.value(depth + 1)?;
            if !matches!(key, Value::String(_) | Value::Number(_)) {
                return Err(self.error("array keys must be integers or strings"));
            }
            let value = self.value(depth + 1)?;
            members.push((key, value));
        }
        self.expect(b'}')?;
        Ok(members)
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Keys `0, 1, .. n-1` in order become a JSON array.
fn array_or_object(members: Vec<(Value, Value)>) -> Value {
    let is_list = members
        .iter()
        .enumerate()
        .all(|(i, (key, _))| key.as_u64() == Some(i as u64));

    if is_list {
        Value::Array(members.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Object(
            members
                .into_iter()
                .map(|(k, v)| (key_to_string(&k), v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_scalars() {
        assert_eq!(serialize(&json!(null)), "N;");
        assert_eq!(serialize(&json!(true)), "b:1;");
        assert_eq!(serialize(&json!(42)), "i:42;");
        assert_eq!(serialize(&json!(1.5)), "d:1.5;");
        assert_eq!(serialize(&json!("héllo")), "s:6:\"héllo\";");
    }

    #[test]
    fn test_serialize_collections() {
        assert_eq!(
            serialize(&json!(["a", 1])),
            "a:2:{i:0;s:1:\"a\";i:1;i:1;}"
        );
        assert_eq!(
            serialize(&json!({"name": "x", "7": true})),
            "a:2:{s:4:\"name\";s:1:\"x\";i:7;b:1;}"
        );
    }

    #[test]
    fn test_unserialize_list_and_map() {
        assert_eq!(
            unserialize("a:2:{i:0;s:1:\"a\";i:1;d:0.5;}").unwrap(),
            json!(["a", 0.5])
        );
        assert_eq!(
            unserialize("a:2:{s:1:\"k\";N;i:5;b:0;}").unwrap(),
            json!({"k": null, "5": false})
        );
    }

    #[test]
    fn test_unserialize_object() {
        let value = unserialize("O:4:\"User\":1:{s:4:\"name\";s:3:\"Ann\";}").unwrap();
        assert_eq!(value, json!({"__class": "User", "name": "Ann"}));
        assert_eq!(serialize(&value), "O:4:\"User\":1:{s:4:\"name\";s:3:\"Ann\";}");
    }

    #[test]
    fn test_unserialize_uses_byte_lengths() {
        assert_eq!(unserialize("s:5:\"a\"b;c\";").unwrap(), json!("a\"b;c"));
        assert_eq!(unserialize("s:2:\"é\";").unwrap(), json!("é"));
    }

    #[test]
    fn test_unserialize_rejects_malformed_input() {
        for bad in ["", "x:1;", "s:10:\"short\";", "a:1:{i:0;i:1;", "i:1;extra", "b:2;"] {
            let err = unserialize(bad).unwrap_err();
            assert!(err.to_string().starts_with("Invalid serialized data"), "{bad}");
        }
    }

    #[test]
    fn test_huge_string_length_is_rejected() {
        let err = unserialize("s:18446744073709551615:\"a\";").unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(err.to_string().contains("string shorter than its length"));
    }

    #[test]
    fn test_round_trip_through_tool() {
        let json_input = r#"{"id":7,"tags":["a","b"],"meta":{"ok":true}}"#;
        let serialized = PhpSerializeTool::transform(&PhpSerializeParams {
            input: json_input.to_string(),
            mode: PhpMode::Serialize,
        })
        .unwrap();
        let restored = PhpSerializeTool::transform(&PhpSerializeParams {
            input: serialized.output,
            mode: PhpMode::Unserialize,
        })
        .unwrap();
        let restored: Value = serde_json::from_str(&restored.output).unwrap();
        assert_eq!(restored, serde_json::from_str::<Value>(json_input).unwrap());
    }
}
