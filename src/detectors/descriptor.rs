use serde::{Deserialize, Serialize};

/// Name used when a function has no recoverable identifier.
pub const ANONYMOUS: &str = "anonymous";

/// Structured metadata about one discovered function.
///
/// Produced by the extractor, consumed read-only by synthesis and assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    pub name: String,

    /// Parameter names in declaration order, annotations and defaults stripped.
    pub params: Vec<String>,

    pub is_async: bool,

    /// Best-effort body text; prompt context only.
    pub source_text: String,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, params: Vec<String>, is_async: bool) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { ANONYMOUS.to_string() } else { name },
            params,
            is_async,
            source_text: String::new(),
        }
    }

    pub fn with_source(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
