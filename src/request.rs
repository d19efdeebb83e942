//! Chat-completion request parameters and payload construction

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use log::{trace, warn};

use crate::error::Error;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const COMPLETIONS_PATH: &str = "/chat/completions";

const MIN_TEMPERATURE: f64 = 0.0;
const MAX_TEMPERATURE: f64 = 2.0;

// ===== Message Types =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn new(
      role: impl Into<String>
    , content: impl Into<String>
    ) -> Self
    {   ChatMessage
        {   role: role.into()
          , content: content.into()
        }
    }

    pub fn system(content: impl Into<String>) -> Self
    {   Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self
    {   Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self
    {   Self::new("assistant", content)
    }
}

// ===== Request Parameters =====

/// Everything needed for one call to a chat-completion endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest
{   /// The user prompt, sent as the last message
    pub prompt: String
  , /// Base URL of the endpoint (e.g. "https://api.openai.com/v1")
    pub api_url: String
  , /// Bearer token; None for local/unauthenticated endpoints
    pub api_key: Option<String>
  , pub model: String
  , /// Sampling temperature, 0 to 2 inclusive
    pub temperature: f64
  , pub max_tokens: Option<u32>
  , /// Prepended as a role="system" message
    pub system_message: Option<String>
  , /// Earlier turns, placed between the system and user messages
    pub history: Vec<ChatMessage>
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Provider-specific fields merged into the body
    pub extra: Map<String, Value>
}

impl ChatRequest
{   /// New request with the default model, temperature and timeout
    pub fn new(
      prompt: impl Into<String>
    , api_url: impl Into<String>
    ) -> Self
    {   ChatRequest
        {   prompt: prompt.into()
          , api_url: api_url.into()
          , api_key: None
          , model: DEFAULT_MODEL.to_string()
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: None
          , system_message: None
          , history: Vec::new()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
          , extra: Map::new()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self
    {   self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self
    {   self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_system_message(
      mut self
    , system_message: impl Into<String>
    ) -> Self
    {   self.system_message = Some(system_message.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self
    {   self.history = history;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self
    {   self.timeout_secs = timeout_secs;
        self
    }

    /// Add an already-built JSON value to the extra parameters
    pub fn with_extra(
      mut self
    , key: impl Into<String>
    , value: Value
    ) -> Self
    {   self.extra.insert(key.into(), value);
        self
    }

    /// Add any serializable value to the extra parameters.
    /// Fails only if the value cannot be turned into JSON.
    pub fn with_param<T: Serialize>(
      self
    , key: impl Into<String>
    , value: T
    ) -> Result<Self, Error>
    {   let key = key.into();
        let value = serde_json::to_value(value)
          .map_err(|e| {
            Error::InvalidParameter(
              format!("extra parameter '{}': {}", key, e)
            )
          })?;
        Ok(self.with_extra(key, value))
    }

    /// Local checks, run before any network activity
    pub fn validate(&self) -> Result<(), Error>
    {   if self.prompt.trim().is_empty()
        {   return Err(Error::InvalidParameter(
              "prompt must be a non-empty string".to_string()
            ));
        }

        if self.api_url.trim().is_empty()
        {   return Err(Error::InvalidParameter(
              "api_url must be a non-empty string".to_string()
            ));
        }

        // NaN fails the range check as well
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE)
          .contains(&self.temperature)
        {   return Err(Error::InvalidParameter(
              format!(
                "temperature must be between {} and {}, got {}",
                MIN_TEMPERATURE, MAX_TEMPERATURE, self.temperature
              )
            ));
        }

        if self.max_tokens == Some(0)
        {   return Err(Error::InvalidParameter(
              "max_tokens must be positive".to_string()
            ));
        }

        if self.timeout_secs == 0
        {   return Err(Error::InvalidParameter(
              "timeout must be a positive number of seconds"
                .to_string()
            ));
        }

        Ok(())
    }

    /// Full URL the request is posted to
    pub fn endpoint_url(&self) -> String
    {   let base = self.api_url.trim();
        if base.ends_with(COMPLETIONS_PATH)
        {   base.to_string()
        } else
        {   format!(
              "{}{}",
              base.trim_end_matches('/'),
              COMPLETIONS_PATH
            )
        }
    }

    /// Ordered message list: system, history, then the user prompt
    pub fn messages(&self) -> Vec<ChatMessage>
    {   let mut messages
          = Vec::with_capacity(self.history.len() + 2);
        if let Some(system) = &self.system_message
        {   messages.push(ChatMessage::system(system.clone()));
        }
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(self.prompt.clone()));
        messages
    }

    /// JSON body for the request.
    /// Extra parameters go in first; named fields overwrite them.
    pub fn build_payload(&self) -> Map<String, Value>
    {   let mut payload = self.extra.clone();

        let mut named = Map::new();
        named.insert("model".into(), Value::from(self.model.clone()));
        named.insert(
          "messages".into(),
          Value::Array(
            self.messages()
              .into_iter()
              .map(|m| serde_json::json!({
                "role": m.role,
                "content": m.content,
              }))
              .collect()
          )
        );
        named.insert(
          "temperature".into(),
          Value::from(self.temperature)
        );
        if let Some(max_tokens) = self.max_tokens
        {   named.insert("max_tokens".into(), Value::from(max_tokens));
        }

        for (key, value) in named
        {   if payload.contains_key(&key)
            {   warn!(
                  "Extra parameter '{}' overridden by named parameter",
                  key
                );
            }
            payload.insert(key, value);
        }

        trace!("Chat payload: {:?}", payload);
        payload
    }
}
