//! llm-call - send one prompt to an OpenAI-compatible endpoint.
//!
//! Credentials come from the environment (or a `.env` file):
//! OPENAI_API_KEY for OpenAI, AZURE_OPENAI_API_KEY and
//! AZURE_OPENAI_ENDPOINT for Azure. Local servers need none.

use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde_json::Value;

use llmcall::config::{
  AZURE_API_KEY_VAR, AZURE_ENDPOINT_VAR, OPENAI_API_KEY_VAR,
};
use llmcall::{ProviderConfig, Provider};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg
{   Openai
  , Azure
  , Local
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "llm-call")]
#[command(about = "Send a prompt to an OpenAI-compatible chat endpoint")]
#[command(version)]
struct Args
{   /// Prompt to send
    prompt: String

  , /// Which kind of endpoint to talk to
    #[arg(short, long, value_enum, default_value = "openai")]
    provider: ProviderArg

  , /// Base URL, overriding the provider's default
    #[arg(long)]
    url: Option<String>

  , /// API key, overriding the provider's key variable
    #[arg(long)]
    api_key: Option<String>

  , /// Azure deployment name
    #[arg(long, required_if_eq("provider", "azure"))]
    deployment: Option<String>

  , #[arg(short, long)]
    model: Option<String>

  , #[arg(short, long, default_value_t = llmcall::request::DEFAULT_TEMPERATURE)]
    temperature: f64

  , #[arg(long)]
    max_tokens: Option<u32>

  , /// System message
    #[arg(short, long)]
    system: Option<String>

  , /// Timeout in seconds
    #[arg(long, default_value_t = llmcall::request::DEFAULT_TIMEOUT_SECS)]
    timeout: u64

  , /// Extra body field as key=value; value is read as JSON when it parses
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, Value)>
}

fn parse_param(raw: &str) -> Result<(String, Value), String>
{   let (key, value) = raw.split_once('=')
      .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty()
    {   return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value)
      .unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Provider settings from the arguments, falling back to `env` for
/// anything the command line leaves out
fn provider_config<F>(args: &Args, env: F)
  -> Result<ProviderConfig, llmcall::Error>
where
  F: Fn(&str) -> Option<String>
{   let lookup = |var: &str| match var
    {   OPENAI_API_KEY_VAR | AZURE_API_KEY_VAR => {
          args.api_key.clone().or_else(|| env(var))
        }
      , AZURE_ENDPOINT_VAR => args.url.clone().or_else(|| env(var))
      , _ => env(var)
    };

    let mut config = match args.provider
    {   ProviderArg::Openai => ProviderConfig::openai_from_lookup(lookup)?
      , ProviderArg::Azure => {
          let deployment = args.deployment.as_deref()
            .unwrap_or_default();
          ProviderConfig::azure_from_lookup(deployment, lookup)?
        }
      , ProviderArg::Local => ProviderConfig::local(
          "http://localhost:8080/v1"
        )
    };

    if let Some(url) = &args.url
    {   config.api_base = url.clone();
    }
    if let Some(key) = &args.api_key
    {   config.api_key = Some(key.clone());
    }
    if let Some(model) = &args.model
    {   config.model = model.clone();
    }
    config.timeout_secs = args.timeout;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   dotenvy::dotenv().ok();
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse();
    let config = provider_config(&args, |var| std::env::var(var).ok())?;
    debug!("Using provider {:?} at {}", config.provider, config.api_base);

    let mut request = config.request(args.prompt.clone())
      .with_temperature(args.temperature);
    if let Some(max_tokens) = args.max_tokens
    {   request = request.with_max_tokens(max_tokens);
    }
    if let Some(system) = &args.system
    {   request = request.with_system_message(system.clone());
    }
    for (key, value) in &args.params
    {   request = request.with_extra(key.clone(), value.clone());
    }

    let response = llmcall::call_llm_api(&request).await?;
    let text = llmcall::extract_response_text(&response)?;
    println!("{}", text);

    match llmcall::get_usage_info(&response)
    {   Some(usage) => info!("Token usage: {}", usage)
      , None if config.provider == Provider::Local => {
          debug!("Local server reported no usage")
        }
      , None => info!("No usage reported")
    }

    Ok(())
}
