//! Persisted input resource template.

use percent_encoding::percent_decode_str;

use super::{ResourceTemplateDefinition, to_json};
use crate::core::ToolContext;
use crate::domains::resources::ResourceError;

pub struct StoredValueTemplate;

impl ResourceTemplateDefinition for StoredValueTemplate {
    const URI_TEMPLATE: &'static str = "devkit://storage/{key}";
    const NAME: &'static str = "Stored Value";
    const TITLE: &'static str = "Persisted Tool Input";
    const DESCRIPTION: &'static str = "Raw value saved under a storage key such as code-mo:json_format:input";
    const MIME_TYPE: &'static str = "application/json";

    fn read(key: &str, ctx: &ToolContext) -> Result<String, ResourceError> {
        let key = percent_decode_str(key)
            .decode_utf8()
            .map_err(|_| ResourceError::invalid_uri(key))?;
        let value = ctx
            .store()
            .get_raw(&key)
            .ok_or_else(|| ResourceError::not_found(format!("devkit://storage/{key}")))?;
        to_json(&value)
    }
}
