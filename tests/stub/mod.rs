//! One-shot HTTP server standing in for a chat-completion endpoint

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the stub does once it has read the request
pub enum Reply
{   Respond
    {   status: u16
      , body: String
    }
  , /// Bytes written verbatim, then the connection is closed
    Raw(String)
  , Hang(Duration)
}

impl Reply
{   pub fn ok(body: &str) -> Self
    {   Reply::Respond
        {   status: 200
          , body: body.to_string()
        }
    }

    pub fn status(status: u16, body: &str) -> Self
    {   Reply::Respond
        {   status
          , body: body.to_string()
        }
    }
}

/// Request as seen on the wire
pub struct Captured
{   /// Request line and headers, lowercased
    pub head: String
  , pub body: serde_json::Value
}

impl Captured
{   pub fn has_header(&self, name: &str, value: &str) -> bool
    {   let line = format!("{}: {}", name, value).to_lowercase();
        self.head.lines().any(|l| l.trim() == line)
    }

    pub fn header_named(&self, name: &str) -> bool
    {   let prefix = format!("{}:", name.to_lowercase());
        self.head.lines().any(|l| l.starts_with(&prefix))
    }
}

/// Serve exactly one connection. Returns the base URL to call
/// and a handle yielding the captured request.
pub async fn serve_once(reply: Reply) -> (String, JoinHandle<Captured>)
{   let listener = TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.expect("accept");
      let captured = read_request(&mut socket).await;

      match reply
      {   Reply::Respond { status, body } => {
            let response = format!(
              "HTTP/1.1 {} Stub\r\n\
               Content-Type: application/json\r\n\
               Content-Length: {}\r\n\
               Connection: close\r\n\r\n{}",
              status, body.len(), body
            );
            socket.write_all(response.as_bytes()).await
              .expect("write response");
            let _ = socket.shutdown().await;
          }
        , Reply::Raw(bytes) => {
            socket.write_all(bytes.as_bytes()).await
              .expect("write raw response");
            let _ = socket.shutdown().await;
          }
        , Reply::Hang(duration) => {
            tokio::time::sleep(duration).await;
          }
      }
      captured
    });

    (format!("http://{}/v1", addr), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Captured
{   let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop
    {   let n = socket.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n")
        {   break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
    let content_length = head.lines()
      .find_map(|l| l.strip_prefix("content-length:"))
      .and_then(|v| v.trim().parse::<usize>().ok())
      .unwrap_or(0);

    while buf.len() < head_end + content_length
    {   let n = socket.read(&mut chunk).await.expect("read body");
        if n == 0
        {   break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[head_end..])
      .unwrap_or(serde_json::Value::Null);
    Captured { head, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize>
{   haystack.windows(needle.len()).position(|w| w == needle)
}
