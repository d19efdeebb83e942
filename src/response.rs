//! Response parsing and field extraction

use serde::{Deserialize, Serialize};
use serde_json::Value;
use log::{error, trace};

use crate::error::Error;

/// Token counts from the "usage" object.
/// Providers differ in which counts they report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub prompt_tokens: Option<u64>
  , #[serde(default)]
    pub completion_tokens: Option<u64>
  , #[serde(default)]
    pub total_tokens: Option<u64>
}

/// Parse a raw success body, requiring a "choices" array
pub fn parse_response(body: &str) -> Result<Value, Error>
{   trace!("Raw response body: {}", body);

    let value: Value = serde_json::from_str(body)
      .map_err(|e| {
        error!("Failed to parse API response as JSON: {}", e);
        Error::MalformedResponse(
          format!("response is not valid JSON: {}", e)
        )
      })?;

    match value.get("choices")
    {   Some(Value::Array(_)) => Ok(value)
      , Some(_) => {
          error!("\"choices\" is not an array");
          Err(Error::MalformedResponse(
            "\"choices\" is not an array".to_string()
          ))
        }
      , None => {
          error!("Response has no \"choices\" field");
          Err(Error::MalformedResponse(
            "missing \"choices\" field".to_string()
          ))
        }
    }
}

/// Text of the first choice's message
pub fn extract_response_text(response: &Value)
  -> Result<String, Error>
{   let choices = response.get("choices")
      .and_then(Value::as_array)
      .ok_or_else(|| Error::MalformedResponse(
        "missing \"choices\" array".to_string()
      ))?;

    let first = choices.first()
      .ok_or_else(|| Error::MalformedResponse(
        "\"choices\" is empty".to_string()
      ))?;

    first.get("message")
      .and_then(|m| m.get("content"))
      .and_then(Value::as_str)
      .map(str::to_string)
      .ok_or_else(|| Error::MalformedResponse(
        "first choice has no message content".to_string()
      ))
}

/// The "usage" object, untouched, if the provider sent one
pub fn get_usage_info(response: &Value) -> Option<&Value>
{   response.get("usage")
}

/// Typed view of the "usage" object.
/// None when absent or not shaped like token counts.
pub fn usage_tokens(response: &Value) -> Option<Usage>
{   get_usage_info(response)
      .and_then(|u| Usage::deserialize(u).ok())
}
