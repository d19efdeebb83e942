use std::fmt;

/// Which part of the transport gave out before a response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind
{   /// The configured timeout elapsed
    Timeout
  , /// Connection refused, DNS failure, TLS handshake and the like
    Connect
  , /// Anything else reqwest reports before a status line
    Other
}

impl fmt::Display for TransportKind
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   TransportKind::Timeout => write!(f, "timeout")
          , TransportKind::Connect => write!(f, "connect")
          , TransportKind::Other => write!(f, "transport")
        }
    }
}

/// Error type for chat-completion calls
/// Implements Clone so callers can stash or forward it
#[derive(Debug, Clone, PartialEq)]
pub enum Error
{   /// Caller-supplied value failed local validation
    InvalidParameter(String)
  , /// Transport-level failure, no response received
    RequestFailed
    {   kind: TransportKind
      , message: String
    }
  , /// Endpoint answered with a non-success status
    ApiError
    {   status: u16
      , /// Response body, when it parsed as JSON
        body: Option<serde_json::Value>
      , message: String
    }
  , /// Success status but the body is unusable
    MalformedResponse(String)
  , /// Environment variable needed by a provider preset is unset
    MissingEnvVar(String)
}

impl Error
{   /// True when the request was abandoned because of the timeout
    pub fn is_timeout(&self) -> bool
    {   matches!(
          self,
          Error::RequestFailed { kind: TransportKind::Timeout, .. }
        )
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16>
    {   match self
        {   Error::ApiError { status, .. } => Some(*status)
          , _ => None
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::InvalidParameter(msg) => {
              write!(f, "Invalid parameter: {}", msg)
            }
          , Error::RequestFailed { kind, message } => {
              write!(f, "Request failed ({}): {}", kind, message)
            }
          , Error::ApiError { status, message, .. } => {
              write!(f, "API error: {} - {}", status, message)
            }
          , Error::MalformedResponse(msg) => {
              write!(f, "Malformed response: {}", msg)
            }
          , Error::MissingEnvVar(var) => {
              write!(f,
                "Environment variable not set: {}",
                var
              )
            }
        }
    }
}

impl std::error::Error for Error {}
