use std::collections::HashMap;
use tokio_test::{assert_err, assert_ok};

use llmcall::{Error, Provider, ProviderConfig};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
{   let vars: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_openai_from_lookup()
{   let config = assert_ok!(ProviderConfig::openai_from_lookup(
      env(&[("OPENAI_API_KEY", "sk-test")])
    ));
    assert_eq!(config.provider, Provider::OpenAI);
    assert_eq!(config.api_base, "https://api.openai.com/v1");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.model, "gpt-3.5-turbo");
}

#[test]
fn test_openai_missing_key()
{   let err = assert_err!(ProviderConfig::openai_from_lookup(env(&[])));
    assert_eq!(err, Error::MissingEnvVar("OPENAI_API_KEY".to_string()));

    let blank = assert_err!(ProviderConfig::openai_from_lookup(
      env(&[("OPENAI_API_KEY", "  ")])
    ));
    assert!(matches!(blank, Error::MissingEnvVar(_)));
}

#[test]
fn test_azure_from_lookup()
{   let config = assert_ok!(ProviderConfig::azure_from_lookup(
      "my-deployment",
      env(&[
        ("AZURE_OPENAI_API_KEY", "azure-key")
      , ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com/")
      ])
    ));
    assert_eq!(config.provider, Provider::AzureOpenAI);
    assert_eq!(
      config.api_base,
      "https://example.openai.azure.com/openai/deployments/my-deployment"
    );
    assert_eq!(config.model, "gpt-35-turbo");
}

#[test]
fn test_azure_needs_endpoint()
{   let err = assert_err!(ProviderConfig::azure_from_lookup(
      "my-deployment",
      env(&[("AZURE_OPENAI_API_KEY", "azure-key")])
    ));
    assert_eq!(
      err,
      Error::MissingEnvVar("AZURE_OPENAI_ENDPOINT".to_string())
    );
}

#[test]
fn test_local_request_has_no_key()
{   let request = ProviderConfig::local("http://localhost:8080/v1")
      .request("Hello, how are you?");
    assert!(request.api_key.is_none());
    assert_eq!(request.model, "local-model");
    assert_eq!(
      request.endpoint_url(),
      "http://localhost:8080/v1/chat/completions"
    );
    assert_ok!(request.validate());
}

#[test]
fn test_request_inherits_provider_settings()
{   let mut config = assert_ok!(ProviderConfig::openai_from_lookup(
      env(&[("OPENAI_API_KEY", "sk-test")])
    ));
    config.timeout_secs = 5;

    let request = config.request("Write a haiku about programming");
    assert_eq!(request.api_key.as_deref(), Some("sk-test"));
    assert_eq!(request.timeout_secs, 5);
    assert_eq!(request.api_url, "https://api.openai.com/v1");
}

#[test]
fn test_config_serde_round_trip()
{   let config = ProviderConfig::local("http://localhost:11434/v1");
    let text = serde_json::to_string(&config).expect("serialize");
    let back: ProviderConfig
      = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(back, config);
}
