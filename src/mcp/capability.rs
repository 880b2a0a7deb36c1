//! Pluggable capabilities (tools, prompts, resources)

use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolResult, TextContent, Tool};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::rpc::JsonObject;

#[async_trait]
pub trait Capability: Send + Sync {
    /// Advertised by `tools/list`; `name` is the lookup key and must be unique
    /// within its registry.
    fn definition(&self) -> Tool;

    /// Runs to completion; the returned map is passed through to the caller unmodified.
    async fn handle(&self, arguments: JsonObject) -> Result<JsonObject, AppError>;
}

/// Serializes an MCP schema value into the object form carried in a result.
pub fn to_json_object<T: Serialize>(value: &T) -> Result<JsonObject, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(AppError::internal(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(err) => Err(AppError::internal(format!("serialization failed: {err}"))),
    }
}

/// `{content: [{type: "text", text}]}`, the result shape used by the bundled tools.
pub fn text_result(text: impl Into<String>) -> Result<JsonObject, AppError> {
    to_json_object(&CallToolResult::text_content(vec![TextContent::new(
        text.into(),
        None,
        None,
    )]))
}

pub fn parse_arguments<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| AppError::invalid_argument(format!("Invalid arguments: {err}")))
}

/// Trims a string argument and rejects it when nothing is left.
pub fn non_blank<'a>(name: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_argument(format!(
            "Argument \"{name}\" must not be empty"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct TownArguments {
        town: String,
    }

    fn arguments(value: Value) -> JsonObject {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn text_result_has_conventional_shape() {
        let result = text_result("hello").expect("serializable");

        let content = result["content"].as_array().expect("content array");
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "hello");
        assert!(result.get("isError").map_or(true, Value::is_null));
    }

    #[test]
    fn non_object_values_are_not_json_objects() {
        let err = to_json_object(&vec![1, 2]).expect_err("arrays are not objects");
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(
            to_json_object(&json!({"a": 1})).expect("object"),
            arguments(json!({"a": 1}))
        );
    }

    #[test]
    fn parses_typed_arguments() {
        let parsed: TownArguments =
            parse_arguments(arguments(json!({"town": "Paris"}))).expect("valid arguments");
        assert_eq!(parsed.town, "Paris");

        for invalid in [json!({}), json!({"town": 75001}), json!({"town": null})] {
            let err = parse_arguments::<TownArguments>(arguments(invalid.clone()))
                .expect_err("invalid arguments");
            assert!(matches!(err, AppError::InvalidArgument { .. }), "{invalid}");
        }

        let missing = parse_arguments::<TownArguments>(JsonObject::new()).expect_err("missing");
        assert_eq!(missing.to_string(), "Invalid arguments: missing field `town`");
    }

    #[test]
    fn non_blank_trims_and_rejects_empty_values() {
        assert_eq!(non_blank("town", " Paris "), Ok("Paris"));
        assert_eq!(
            non_blank("town", "   "),
            Err(AppError::invalid_argument("Argument \"town\" must not be empty"))
        );
    }
}
