//! llm/orchestrator.rs
//!
//! Request-level pipeline: extract, select, synthesize (AI first, heuristics
//! on any provider failure), assemble.

use serde::{Deserialize, Serialize};

use crate::detectors::descriptor::FunctionDescriptor;
use crate::detectors::extract::extract;
use crate::detectors::framework::Framework;
use crate::error::{Error, Result};
use crate::llm::augment::augment;
use crate::llm::client::ProviderConfig;
use crate::llm::transport::Transport;
use crate::testgen::case::TestCase;
use crate::testgen::generator::synthesize;
use crate::testgen::materialize::assemble;

pub const INTERNAL_ERROR: &str = "Failed to generate test. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub code: String,

    #[serde(default)]
    pub framework: Framework,

    #[serde(default)]
    pub selected_function: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SynthesisResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        test: String,
        function_info: FunctionDescriptor,
        test_cases: usize,
    },
    Failure {
        error: String,
    },
}

impl SynthesisResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        SynthesisResponse::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SynthesisResponse::Success { .. })
    }
}

/// Where the final cases came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub function: FunctionDescriptor,
    pub cases: Vec<TestCase>,
    pub source: CaseSource,
    pub test: String,
}

/* ============================================================
   Public API
   ============================================================ */

/// Picks `selected` by exact name, or the first function when `None`.
pub fn select_function(
    functions: Vec<FunctionDescriptor>,
    selected: Option<&str>,
) -> Result<FunctionDescriptor> {
    let Some(name) = selected else {
        return functions.into_iter().next().ok_or(Error::NoFunctions);
    };

    if functions.is_empty() {
        return Err(Error::NoFunctions);
    }

    let available: Vec<String> = functions.iter().map(|f| f.name.clone()).collect();
    functions
        .into_iter()
        .find(|f| f.name == name)
        .ok_or_else(|| Error::FunctionNotFound {
            name: name.to_string(),
            available,
        })
}

/// AI cases when the provider delivers, heuristic cases otherwise.
///
/// This is the only place a provider failure is absorbed.
pub fn synthesize_cases(
    descriptor: &FunctionDescriptor,
    framework: Framework,
    config: Result<ProviderConfig>,
    transport: &dyn Transport,
) -> (Vec<TestCase>, CaseSource) {
    let attempt = config.and_then(|cfg| augment(descriptor, framework, &cfg, transport));

    match attempt {
        Ok(cases) => {
            log::info!("using {} model-generated case(s) for `{}`", cases.len(), descriptor.name);
            (cases, CaseSource::Model)
        }
        Err(e) => {
            if e.is_provider_failure() {
                log::warn!("AI generation failed, using heuristic cases: {e}");
            } else {
                log::warn!("unexpected error during AI generation, using heuristic cases: {e}");
            }
            (synthesize(descriptor), CaseSource::Heuristic)
        }
    }
}

/// Runs the whole pipeline for one request.
pub fn generate(
    request: &SynthesisRequest,
    config: Result<ProviderConfig>,
    transport: &dyn Transport,
) -> Result<Generated> {
    let functions = extract(&request.code);
    let selected = request
        .selected_function
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let function = select_function(functions, selected)?;

    let (cases, source) = synthesize_cases(&function, request.framework, config, transport);
    let test = assemble(&function, &cases, request.framework);

    Ok(Generated {
        function,
        cases,
        source,
        test,
    })
}

/// Boundary handler: input errors become their message, anything else the
/// generic retry text.
pub fn handle_request(
    request: &SynthesisRequest,
    config: Result<ProviderConfig>,
    transport: &dyn Transport,
) -> SynthesisResponse {
    match generate(request, config, transport) {
        Ok(g) => SynthesisResponse::Success {
            test: g.test,
            test_cases: g.cases.len(),
            function_info: g.function,
        },
        Err(e) if e.is_input_error() => SynthesisResponse::failure(e.to_string()),
        Err(e) => {
            log::error!("API Error: {e}");
            SynthesisResponse::failure(INTERNAL_ERROR)
        }
    }
}

/// Decodes a raw JSON request and handles it.
///
/// The flag is false for internal failures (undecodable request).
pub fn handle_json(
    raw: &str,
    config: impl FnOnce() -> Result<ProviderConfig>,
    transport: &dyn Transport,
) -> (SynthesisResponse, bool) {
    match serde_json::from_str::<SynthesisRequest>(raw) {
        Ok(request) => (handle_request(&request, config(), transport), true),
        Err(e) => {
            log::error!("API Error: malformed request: {e}");
            (SynthesisResponse::failure(INTERNAL_ERROR), false)
        }
    }
}
