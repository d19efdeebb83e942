use std::time::Duration;
use log::{debug, trace, error, info};
use serde_json::Value;

use crate::error::{Error, TransportKind};
use crate::request::ChatRequest;

/// Send one chat-completion request and return the parsed response.
///
/// Validation happens first, so invalid parameters never reach the
/// network. A fresh HTTP client is built per call with the request's
/// timeout applied to the whole exchange.
pub async fn call_llm_api(request: &ChatRequest)
  -> Result<Value, Error>
{   request.validate()?;

    let url = request.endpoint_url();
    let payload = request.build_payload();

    info!(
      "Sending request to {} with model {}",
      url, request.model
    );

    let http_client = reqwest::Client::builder()
      .timeout(Duration::from_secs(request.timeout_secs))
      .build()
      .map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        Error::RequestFailed
        {   kind: TransportKind::Other
          , message: e.to_string()
        }
      })?;

    let mut builder = http_client
      .post(&url)
      .header("Content-Type", "application/json")
      .json(&payload);

    if let Some(api_key) = &request.api_key
    {   debug!("Attaching bearer token");
        builder = builder
          .header("Authorization", format!("Bearer {}", api_key));
    }

    let response = builder
      .send()
      .await
      .map_err(|e| transport_error(e, &url, request.timeout_secs))?;

    let status = response.status();
    trace!("Response status: {}", status);

    if !status.is_success()
    {   // Keep the status even if the body cannot be read
        let body = response.text().await.unwrap_or_default();
        error!(
          "HTTP error occurred: {} - {}",
          status.as_u16(), body
        );
        return Err(Error::ApiError
        {   status: status.as_u16()
          , body: serde_json::from_str(&body).ok()
          , message: body
        });
    }

    let body = response.text().await
      .map_err(|e| transport_error(e, &url, request.timeout_secs))?;

    let result = crate::response::parse_response(&body)?;
    info!("API request successful");
    Ok(result)
}

/// Blocking form of [`call_llm_api`].
///
/// Runs the call on its own current-thread runtime. Called from inside
/// an async context it fails instead of blocking that runtime.
pub fn call_llm_api_blocking(request: &ChatRequest)
  -> Result<Value, Error>
{   request.validate()?;

    if tokio::runtime::Handle::try_current().is_ok()
    {   error!("Blocking call made from inside a tokio runtime");
        return Err(Error::RequestFailed
        {   kind: TransportKind::Other
          , message: "call_llm_api_blocking used inside an async \
                      runtime; await call_llm_api instead"
              .to_string()
        });
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(|e| {
        error!("Failed to start runtime: {}", e);
        Error::RequestFailed
        {   kind: TransportKind::Other
          , message: e.to_string()
        }
      })?;

    runtime.block_on(call_llm_api(request))
}

fn transport_error(
  e: reqwest::Error
, url: &str
, timeout_secs: u64
) -> Error
{   if e.is_timeout()
    {   let message = format!(
          "Request timed out after {} seconds",
          timeout_secs
        );
        error!("{}", message);
        Error::RequestFailed
        {   kind: TransportKind::Timeout
          , message
        }
    } else if e.is_connect()
    {   let message = format!(
          "Failed to connect to API at {}: {}",
          url, e
        );
        error!("{}", message);
        Error::RequestFailed
        {   kind: TransportKind::Connect
          , message
        }
    } else
    {   let message = format!("Request failed: {}", e);
        error!("{}", message);
        Error::RequestFailed
        {   kind: TransportKind::Other
          , message
        }
    }
}
