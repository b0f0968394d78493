use crate::detectors::descriptor::FunctionDescriptor;
use crate::detectors::framework::Framework;
use crate::llm::client::Provider;

/* ============================================================
   Response contract (shared by every template)
   ============================================================ */

const CASE_SHAPE: &str = r#"[
  {
    "description": "what the test checks",
    "args": ["literal argument 1", "literal argument 2"],
    "expected": "literal expected value",
    "setup": "optional assertion prefix, e.g. expect(() => "
  }
]"#;

const RULES: &str = "\
Every entry of \"args\" and \"expected\" must be a JavaScript literal expression \
written as a string (quote string values, e.g. \"\\\"hello\\\"\").
Only set \"setup\" for throw assertions; then \"expected\" must be the closing \
call such as \".toThrow()\".";

/// Builds the provider-flavored prompt for `f`.
pub fn build_prompt(provider: Provider, f: &FunctionDescriptor, framework: Framework) -> String {
    let facts = function_facts(f);

    match provider {
        Provider::OpenAI => format!(
            "Analyze this JavaScript/TypeScript function and design unit tests for {framework}.\n\n\
             {facts}\n\
             Cover:\n\
             1. Normal usage with valid inputs\n\
             2. Edge cases (empty strings, null, undefined)\n\
             3. Invalid inputs that should throw\n\
             4. Cases suggested by the parameter names\n\n\
             {RULES}\n\n\
             Return only a JSON array shaped like:\n{CASE_SHAPE}"
        ),

        Provider::Anthropic => format!(
            "You are a senior engineer who writes precise unit tests. Study the \
             JavaScript/TypeScript function below and design {framework} test cases for it.\n\n\
             {facts}\n\
             The cases should cover:\n\
             1. Happy-path behavior with valid inputs\n\
             2. Boundary values and empty, null or undefined inputs\n\
             3. Error scenarios for invalid inputs\n\
             4. Behavior implied by the parameter names\n\n\
             Prefer realistic cases that would catch real regressions over exhaustive ones.\n\
             {RULES}\n\n\
             Respond with a JSON array in exactly this structure:\n{CASE_SHAPE}"
        ),

        Provider::Gemini => format!(
            "Write unit test cases for this JavaScript/TypeScript function using {framework}.\n\n\
             {facts}\n\
             Include normal operation, edge and boundary conditions, error handling, and \
             parameter-specific scenarios.\n\
             {RULES}\n\n\
             Return a JSON array:\n{CASE_SHAPE}"
        ),

        Provider::Local => format!(
            "Generate {framework} unit test cases.\n\n\
             {facts}\n\
             Cover valid inputs, edge cases, error conditions.\n\
             {RULES}\n\n\
             Return JSON only:\n{CASE_SHAPE}"
        ),
    }
}

fn function_facts(f: &FunctionDescriptor) -> String {
    let params = if f.params.is_empty() {
        "(none)".to_string()
    } else {
        f.params.join(", ")
    };

    format!(
        "Function: {}\nParameters: {}\nAsync: {}\nCode:\n```\n{}\n```\n",
        f.name, params, f.is_async, f.source_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet() -> FunctionDescriptor {
        FunctionDescriptor::new("greet", vec!["first".into(), "last".into()], true)
            .with_source("async function greet(first, last) { return first + last; }")
    }

    #[test]
    fn every_template_embeds_function_facts() {
        for provider in Provider::ALL {
            let prompt = build_prompt(provider, &greet(), Framework::Vitest);

            assert!(prompt.contains("Function: greet"), "{provider}");
            assert!(prompt.contains("Parameters: first, last"), "{provider}");
            assert!(prompt.contains("Async: true"), "{provider}");
            assert!(prompt.contains("return first + last;"), "{provider}");
            assert!(prompt.contains("vitest"), "{provider}");
            assert!(prompt.contains("\"description\""), "{provider}");
        }
    }

    #[test]
    fn templates_differ_by_provider() {
        let openai = build_prompt(Provider::OpenAI, &greet(), Framework::Jest);
        let anthropic = build_prompt(Provider::Anthropic, &greet(), Framework::Jest);
        assert_ne!(openai, anthropic);
    }

    #[test]
    fn zero_params_are_spelled_out() {
        let f = FunctionDescriptor::new("now", vec![], false);
        assert!(build_prompt(Provider::Local, &f, Framework::Jest).contains("Parameters: (none)"));
    }
}
