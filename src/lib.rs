pub mod error;
pub mod config;
pub mod request;
pub mod response;
pub mod client;

/*

llmcall: one call to any OpenAI-compatible chat-completion endpoint
(OpenAI, Azure OpenAI, LocalAI, Ollama, vLLM, ...) and two helpers to
read the answer back out.

llmcall/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # Provider presets, env lookups
│   ├── request.rs      # Parameters, validation, payload
│   ├── client.rs       # The HTTP call (async + blocking)
│   ├── response.rs     # Parsing, text and usage extraction
│   └── bin/
│       └── llm-call.rs # Command-line front end
└── tests/

*/

// ===== Public API =====

pub use error::{Error, TransportKind};
pub use config::{Provider, ProviderConfig};
pub use request::{ChatMessage, ChatRequest};
pub use response::{
  extract_response_text, get_usage_info, parse_response, usage_tokens,
  Usage,
};
pub use client::{call_llm_api, call_llm_api_blocking};
