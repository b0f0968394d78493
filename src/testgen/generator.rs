//! generator.rs
//!
//! Heuristic test-case synthesis driven by parameter names and arity.
//!
//! Expected values are illustrative guesses (greeting interpolation, identity,
//! addition), not verified against the function's real behavior.

use crate::detectors::descriptor::FunctionDescriptor;
use crate::testgen::case::TestCase;

pub const PLACEHOLDER: &str = "\"expected result\"";

/// Sentinel passed for every parameter in the invalid-input case.
pub const INVALID_ARG: &str = "undefined";

pub const THROW_SETUP: &str = "expect(() => ";
pub const THROW_CLOSER: &str = ".toThrow()";

/* ============================================================
   Public API
   ============================================================ */

/// Builds cases for `descriptor`. Deterministic; the throw case is always last.
pub fn synthesize(descriptor: &FunctionDescriptor) -> Vec<TestCase> {
    let params = &descriptor.params;

    let mut out = match params.as_slice() {
        [] => vec![TestCase::new("should work with no parameters", &[], PLACEHOLDER)],
        [param] => single_param(param),
        [first, second] => two_params(first, second),
        _ => many_params(params),
    };

    if !params.is_empty() {
        out.push(invalid_input(params.len()));
    }

    out
}

/* ============================================================
   Rules
   ============================================================ */

fn single_param(param: &str) -> Vec<TestCase> {
    let lower = param.to_lowercase();

    if lower.contains("name") {
        return vec![
            TestCase::new(format!("should handle valid {param}"), &["\"John Doe\""], "\"Hello, John Doe!\""),
            TestCase::new(format!("should handle empty {param}"), &["\"\""], "\"Hello, !\""),
            TestCase::new(
                format!("should handle special characters in {param}"),
                &["\"John@Doe!\""],
                "\"Hello, John@Doe!!\"",
            ),
        ];
    }

    if lower.contains("number") || lower.contains("num") {
        return vec![
            TestCase::new(format!("should handle positive {param}"), &["42"], "42"),
            TestCase::new(format!("should handle zero {param}"), &["0"], "0"),
            TestCase::new(format!("should handle negative {param}"), &["-5"], "-5"),
        ];
    }

    vec![
        TestCase::new(format!("should handle valid {param}"), &["\"test\""], PLACEHOLDER),
        TestCase::new(format!("should handle empty {param}"), &["\"\""], PLACEHOLDER),
        TestCase::new(format!("should handle null {param}"), &["null"], "null"),
    ]
}

fn two_params(first: &str, second: &str) -> Vec<TestCase> {
    // `a` / `b` naming reads as arithmetic operands
    if first.to_lowercase().contains('a') && second.to_lowercase().contains('b') {
        return vec![
            TestCase::new(format!("should add {first} and {second}"), &["5", "3"], "8"),
            TestCase::new("should handle zero values", &["0", "0"], "0"),
            TestCase::new("should handle negative numbers", &["-2", "3"], "1"),
        ];
    }

    vec![
        TestCase::new(
            format!("should work with valid {first} and {second}"),
            &["\"value1\"", "\"value2\""],
            PLACEHOLDER,
        ),
        TestCase::new(
            format!("should handle edge case with empty {first}"),
            &["\"\"", "\"value2\""],
            PLACEHOLDER,
        ),
    ]
}

fn many_params(params: &[String]) -> Vec<TestCase> {
    let values: Vec<String> = (1..=params.len()).map(|i| format!("\"value{i}\"")).collect();

    let mut emptied = values.clone();
    emptied[0] = "\"\"".to_string();

    vec![
        TestCase {
            description: format!("should work with valid {}", params.join(", ")),
            args: values,
            expected: PLACEHOLDER.to_string(),
            setup: None,
        },
        TestCase {
            description: format!("should handle edge case with empty {}", params[0]),
            args: emptied,
            expected: PLACEHOLDER.to_string(),
            setup: None,
        },
    ]
}

fn invalid_input(arity: usize) -> TestCase {
    TestCase {
        description: "should throw error with invalid input".to_string(),
        args: vec![INVALID_ARG.to_string(); arity],
        expected: THROW_CLOSER.to_string(),
        setup: Some(THROW_SETUP.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(params: &[&str]) -> FunctionDescriptor {
        FunctionDescriptor::new("f", params.iter().map(|p| p.to_string()).collect(), false)
    }

    fn args(case: &TestCase) -> Vec<&str> {
        case.args.iter().map(String::as_str).collect()
    }

    #[test]
    fn zero_params_single_case_without_error_case() {
        let cases = synthesize(&desc(&[]));

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].description, "should work with no parameters");
        assert!(cases[0].args.is_empty());
        assert!(cases[0].setup.is_none());
    }

    #[test]
    fn name_parameter_gets_greeting_cases() {
        let cases = synthesize(&desc(&["userName"]));

        assert_eq!(cases.len(), 4);
        assert_eq!(args(&cases[0]), vec!["\"John Doe\""]);
        assert_eq!(cases[0].expected, "\"Hello, John Doe!\"");
        assert_eq!(cases[1].expected, "\"Hello, !\"");
        assert_eq!(cases[2].expected, "\"Hello, John@Doe!!\"");
    }

    #[test]
    fn numeric_parameter_gets_identity_cases() {
        let cases = synthesize(&desc(&["num"]));

        let pairs: Vec<(&str, &str)> = cases[..3]
            .iter()
            .map(|c| (c.args[0].as_str(), c.expected.as_str()))
            .collect();
        assert_eq!(pairs, vec![("42", "42"), ("0", "0"), ("-5", "-5")]);
    }

    #[test]
    fn generic_single_parameter() {
        let cases = synthesize(&desc(&["input"]));

        assert_eq!(args(&cases[2]), vec!["null"]);
        assert_eq!(cases[2].expected, "null");
        assert_eq!(cases[0].expected, PLACEHOLDER);
    }

    #[test]
    fn a_b_parameters_read_as_addition() {
        let cases = synthesize(&desc(&["a", "b"]));

        assert_eq!(cases.len(), 4);
        assert_eq!(args(&cases[0]), vec!["5", "3"]);
        assert_eq!(cases[0].expected, "8");
        assert_eq!(args(&cases[2]), vec!["-2", "3"]);
        assert_eq!(cases[2].expected, "1");
    }

    #[test]
    fn other_pairs_are_generic() {
        let cases = synthesize(&desc(&["key", "value"]));

        assert_eq!(cases.len(), 3);
        assert_eq!(args(&cases[1]), vec!["\"\"", "\"value2\""]);
    }

    #[test]
    fn wide_signatures_use_indexed_values() {
        let cases = synthesize(&desc(&["x", "y", "z"]));

        assert_eq!(cases.len(), 3);
        assert_eq!(args(&cases[0]), vec!["\"value1\"", "\"value2\"", "\"value3\""]);
        assert_eq!(args(&cases[1]), vec!["\"\"", "\"value2\"", "\"value3\""]);
    }

    #[test]
    fn error_case_is_last_and_matches_arity() {
        for params in [vec!["n"], vec!["a", "b"], vec!["p", "q", "r", "s"]] {
            let cases = synthesize(&desc(&params));
            let last = cases.last().unwrap();

            assert_eq!(last.setup.as_deref(), Some(THROW_SETUP));
            assert_eq!(last.expected, THROW_CLOSER);
            assert_eq!(last.args.len(), params.len());
            assert!(last.args.iter().all(|a| a == INVALID_ARG));
        }
    }

    #[test]
    fn synthesis_is_pure() {
        let d = desc(&["firstName"]);
        assert_eq!(synthesize(&d), synthesize(&d));
    }
}
