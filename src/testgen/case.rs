use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One synthesized test.
///
/// `args` and `expected` are literal JavaScript expressions, rendered verbatim.
/// When `setup` is present the case is a throw assertion: `setup` opens the
/// line and `expected` is the call-suffix closer (e.g. `.toThrow()`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub description: String,

    #[serde(default, deserialize_with = "literal_list")]
    pub args: Vec<String>,

    #[serde(deserialize_with = "literal")]
    pub expected: String,

    #[serde(default, deserialize_with = "optional_setup", skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

impl TestCase {
    pub fn new(description: impl Into<String>, args: &[&str], expected: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            expected: expected.into(),
            setup: None,
        }
    }

    pub fn with_setup(mut self, setup: impl Into<String>) -> Self {
        self.setup = Some(setup.into());
        self
    }

    pub fn is_throw_assertion(&self) -> bool {
        self.setup.is_some()
    }

    /// A throw assertion must close with a call suffix, never a bare value.
    pub fn is_well_formed(&self) -> bool {
        match &self.setup {
            Some(setup) => !setup.trim().is_empty() && self.expected.trim_start().starts_with('.'),
            None => true,
        }
    }
}

/* ============================================================
   Lenient literal decoding
   ============================================================ */

// Models often emit `5` or `null` where a literal string was asked for.
fn scalar_literal<E: serde::de::Error>(v: Value) -> Result<String, E> {
    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(E::custom(format!("expected a literal, got {other}"))),
    }
}

fn literal<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    scalar_literal(Value::deserialize(d)?)
}

// A blank `setup` means a plain equality case.
fn optional_setup<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let setup = Option::<String>::deserialize(d)?;
    Ok(setup.filter(|s| !s.trim().is_empty()))
}

fn literal_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Vec::<Value>::deserialize(d)?
        .into_iter()
        .map(scalar_literal)
        .collect()
}
