//! Unit-test file synthesis for JavaScript / TypeScript functions.
//!
//! Source text is scanned for function shapes, each function gets a set of
//! test cases (from a language model when one is configured, from name-based
//! heuristics otherwise) and the cases are rendered as a jest, mocha or
//! vitest file.

pub mod detectors;
pub mod error;
pub mod llm;
pub mod testgen;

pub use detectors::{extract, Framework, FunctionDescriptor};
pub use error::{Error, Result};
pub use llm::{Provider, ProviderConfig, SynthesisRequest, SynthesisResponse};
pub use testgen::{assemble, synthesize, TestCase};
