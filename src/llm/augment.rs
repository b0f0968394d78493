use crate::detectors::descriptor::FunctionDescriptor;
use crate::detectors::framework::Framework;
use crate::error::{Error, Result};
use crate::llm::client::{build_request, extract_text, prompt_hash, ProviderConfig};
use crate::llm::prompt::build_prompt;
use crate::llm::response::parse_test_cases;
use crate::llm::transport::Transport;
use crate::testgen::case::TestCase;

/// Asks the configured model for test cases.
///
/// Without a credential this fails before touching `transport`. Otherwise
/// exactly one call is made and its failure is final.
pub fn augment(
    descriptor: &FunctionDescriptor,
    framework: Framework,
    config: &ProviderConfig,
    transport: &dyn Transport,
) -> Result<Vec<TestCase>> {
    let Some(api_key) = config.api_key() else {
        return Err(Error::ProviderUnavailable(format!(
            "{} is not set",
            config.provider.key_var()
        )));
    };

    let prompt = build_prompt(config.provider, descriptor, framework);
    let request = build_request(config, api_key, &prompt)?;

    log::debug!(
        "requesting test cases for `{}` from {} ({}), prompt {}",
        descriptor.name,
        config.provider,
        config.model,
        prompt_hash(&prompt)
    );

    let response = transport.send(&request)?;
    let text = extract_text(config.provider, &response)?;
    let cases = parse_test_cases(&text)?;

    log::debug!("{} returned {} case(s)", config.provider, cases.len());
    Ok(cases)
}
