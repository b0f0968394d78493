pub mod augment;
pub mod client;
pub mod config;
pub mod orchestrator;
pub mod prompt;
pub mod response;
pub mod transport;

pub use augment::augment;
pub use client::{Provider, ProviderConfig};
pub use orchestrator::{generate, handle_json, handle_request, SynthesisRequest, SynthesisResponse};
pub use transport::{HttpTransport, Transport};
