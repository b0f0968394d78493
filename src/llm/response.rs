//! llm/response.rs
//!
//! Turns free-form model output into validated test cases.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::testgen::case::TestCase;

/// Parses the JSON array embedded in `text`.
///
/// The model may wrap the array in prose or code fences; the span from the
/// first `[` to the last `]` is taken. The result must be a non-empty array
/// of well-formed cases, otherwise the whole response is rejected.
pub fn parse_test_cases(text: &str) -> Result<Vec<TestCase>> {
    let span = array_span(text).ok_or_else(|| Error::InvalidResponse("no JSON array in response".into()))?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| Error::InvalidResponse(format!("array is not valid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(Error::InvalidResponse("top-level value is not an array".into()));
    };

    if items.is_empty() {
        return Err(Error::InvalidResponse("model returned no test cases".into()));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let case: TestCase = serde_json::from_value(item)
                .map_err(|e| Error::InvalidResponse(format!("case {i}: {e}")))?;

            if !case.is_well_formed() {
                return Err(Error::InvalidResponse(format!(
                    "case {i}: throw assertion must close with a call suffix"
                )));
            }
            Ok(case)
        })
        .collect()
}

fn array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_wrapped_in_prose() {
        let text = r#"Here are the tests:
```json
[
  { "description": "adds", "args": ["1", "2"], "expected": "3" },
  { "description": "throws", "args": ["undefined"], "expected": ".toThrow()", "setup": "expect(() => " }
]
```
Let me know if you need more."#;

        let cases = parse_test_cases(text).unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].args, vec!["1", "2"]);
        assert_eq!(cases[1].setup.as_deref(), Some("expect(() => "));
    }

    #[test]
    fn rejects_missing_or_empty_arrays() {
        for text in ["no json here", "[]", "] backwards [", "{\"cases\": 1}"] {
            let err = parse_test_cases(text).unwrap_err();
            assert!(matches!(err, Error::InvalidResponse(_)), "{text}");
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_test_cases("[{ description: 'x' }]").is_err());
    }

    #[test]
    fn rejects_wrong_element_shape() {
        assert!(parse_test_cases(r#"["just a string"]"#).is_err());
        assert!(parse_test_cases(r#"[{ "description": "x", "args": "1", "expected": "1" }]"#).is_err());
    }

    #[test]
    fn rejects_throw_case_with_bare_value() {
        let text = r#"[{ "description": "x", "args": [], "expected": "42", "setup": "expect(() => " }]"#;
        assert!(parse_test_cases(text).is_err());
    }

    #[test]
    fn empty_setup_is_a_plain_case() {
        let cases =
            parse_test_cases(r#"[{"description":"adds","args":["1","2"],"expected":"3","setup":""}]"#).unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].setup, None);
        assert!(!cases[0].is_throw_assertion());
    }

    #[test]
    fn accepts_missing_args_as_empty() {
        let cases = parse_test_cases(r#"[{ "description": "x", "expected": 1 }]"#).unwrap();
        assert!(cases[0].args.is_empty());
        assert_eq!(cases[0].expected, "1");
    }
}
