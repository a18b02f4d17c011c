use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Rows requested per page by the page controller.
pub const PAGE_SIZE: u32 = 10;

/// `resultCode` the upstream reports for a successful call.
pub const SUCCESS_RESULT_CODE: &str = "0000";

pub fn articles_route() -> &'static str {
    "/api/articles"
}

/// Query sent from the page controller to the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_no: u32,
    pub num_of_rows: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamEnvelope {
    pub response: EnvelopeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeResponse {
    pub header: EnvelopeHeader,
    pub body: EnvelopeBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeHeader {
    #[serde(
        default,
        deserialize_with = "result_code_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_code: Option<String>,
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_msg: Option<String>,
}

impl EnvelopeHeader {
    /// Returns the result code when it is present and not the success value.
    pub fn failure_code(&self) -> Option<&str> {
        self.result_code
            .as_deref()
            .filter(|code| !code.is_empty() && *code != SUCCESS_RESULT_CODE)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeBody {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_count: u64,
    #[serde(
        default,
        deserialize_with = "items_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<ItemList>,
}

impl EnvelopeBody {
    /// Resolves the `items` field into an ordered list of records.
    pub fn into_records(self) -> Vec<RawRecord> {
        self.items
            .and_then(|list| list.item)
            .map(Vec::from)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<OneOrMany<RawRecord>>,
}

/// The upstream serializer collapses one-element lists into a bare object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A record exactly as the upstream names it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(
        rename = "TITLE",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        rename = "AUTHOR",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    #[serde(
        rename = "IMAGE_OBJECT",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_object: Option<String>,
    #[serde(
        rename = "URL",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        rename = "GUBUN",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gubun: Option<String>,
    #[serde(
        rename = "ISSUED_DATE",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_date: Option<String>,
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar value, found {other}"
        ))),
    }
}

// A numeric zero code carries no failure, same as the "0000" string.
fn result_code_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => {
            Ok(Some(SUCCESS_RESULT_CODE.to_string()))
        }
        other => scalar_text(other.unwrap_or(Value::Null)).map_err(de::Error::custom),
    }
}

// The upstream sends `"items": ""` on some empty pages instead of omitting it,
// and a bare record array in place of the `{ "item": ... }` wrapper.
fn items_field<'de, D>(deserializer: D) -> Result<Option<ItemList>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(None),
        Some(value @ Value::Object(_)) => ItemList::deserialize(value)
            .map(Some)
            .map_err(de::Error::custom),
        Some(value @ Value::Array(_)) => Vec::<RawRecord>::deserialize(value)
            .map(|records| {
                Some(ItemList {
                    item: Some(OneOrMany::Many(records)),
                })
            })
            .map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!(
            "expected an items object or array, found {other}"
        ))),
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(truncate_count)),
        Some(Value::String(text)) => parse_count(&text),
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(truncate_count))
}

fn truncate_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
