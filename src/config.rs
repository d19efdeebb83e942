//! Provider presets and the environment lookups callers use to fill them

use serde::{Deserialize, Serialize};
use log::{debug, error};

use crate::error::Error;
use crate::request::{ChatRequest, DEFAULT_TIMEOUT_SECS};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const AZURE_API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const AZURE_ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";

/// Kinds of OpenAI-compatible endpoint with a known setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider
{   /// api.openai.com
    OpenAI
  , /// Azure OpenAI deployment
    AzureOpenAI
  , /// Self-hosted server (LocalAI, Ollama, vLLM, LM Studio)
    Local
}

/// Connection settings for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig
{   pub provider: Provider
  , /// API base URL
    pub api_base: String
  , pub api_key: Option<String>
  , /// Model sent when the caller does not pick one
    pub model: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
}

impl ProviderConfig
{   /// OpenAI, keyed from OPENAI_API_KEY
    pub fn openai_from_env() -> Result<Self, Error>
    {   Self::openai_from_lookup(|var| std::env::var(var).ok())
    }

    /// Azure OpenAI deployment, from AZURE_OPENAI_API_KEY and
    /// AZURE_OPENAI_ENDPOINT
    pub fn azure_from_env(deployment: &str) -> Result<Self, Error>
    {   Self::azure_from_lookup(
          deployment,
          |var| std::env::var(var).ok()
        )
    }

    /// Unauthenticated local server
    pub fn local(api_base: impl Into<String>) -> Self
    {   ProviderConfig
        {   provider: Provider::Local
          , api_base: api_base.into()
          , api_key: None
          , model: "local-model".to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        }
    }

    pub fn openai_from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
      F: Fn(&str) -> Option<String>
    {   debug!("Loading OpenAI settings");
        let api_key = required(&lookup, OPENAI_API_KEY_VAR)?;
        Ok(ProviderConfig
        {   provider: Provider::OpenAI
          , api_base: OPENAI_API_BASE.to_string()
          , api_key: Some(api_key)
          , model: crate::request::DEFAULT_MODEL.to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        })
    }

    pub fn azure_from_lookup<F>(
      deployment: &str
    , lookup: F
    ) -> Result<Self, Error>
    where
      F: Fn(&str) -> Option<String>
    {   debug!("Loading Azure OpenAI settings for: {}", deployment);
        let api_key = required(&lookup, AZURE_API_KEY_VAR)?;
        let endpoint = required(&lookup, AZURE_ENDPOINT_VAR)?;
        Ok(ProviderConfig
        {   provider: Provider::AzureOpenAI
          , api_base: format!(
              "{}/openai/deployments/{}",
              endpoint.trim_end_matches('/'),
              deployment
            )
          , api_key: Some(api_key)
          , model: "gpt-35-turbo".to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        })
    }

    /// Request for `prompt` against this provider
    pub fn request(&self, prompt: impl Into<String>) -> ChatRequest
    {   let mut request = ChatRequest::new(prompt, self.api_base.clone())
          .with_model(self.model.clone())
          .with_timeout_secs(self.timeout_secs);
        request.api_key = self.api_key.clone();
        request
    }
}

fn required<F>(lookup: &F, var: &str) -> Result<String, Error>
where
  F: Fn(&str) -> Option<String>
{   match lookup(var)
    {   Some(value) if !value.trim().is_empty() => Ok(value)
      , _ => {
          error!("{} is not set", var);
          Err(Error::MissingEnvVar(var.to_string()))
        }
    }
}
