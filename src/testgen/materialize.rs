use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::detectors::descriptor::FunctionDescriptor;
use crate::detectors::framework::Framework;
use crate::testgen::case::TestCase;

/* ============================================================
   Public entry
   ============================================================ */

/// Renders a complete test file for `descriptor`.
///
/// One `it` block per case, in input order, inside a single `describe`
/// group named after the function.
pub fn assemble(descriptor: &FunctionDescriptor, cases: &[TestCase], framework: Framework) -> String {
    let blocks: Vec<String> = cases
        .iter()
        .map(|case| render_case(descriptor, case, framework))
        .collect();

    format!(
        "{}\n\ndescribe('{}', () => {{\n{}\n}});",
        framework.preamble(),
        escape_single_quoted(&descriptor.name),
        blocks.join("\n\n")
    )
}

/// Writes assembled text to `path`, creating parent directories.
pub fn write_test_file(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut contents = text.trim_end().to_string();
    contents.push('\n');
    fs::write(path, contents)
}

/// Where `--out` lands: a directory gets `<function>.test.js` inside it,
/// anything else is taken as the file path.
pub fn test_file_path(out: &Path, function: &str) -> PathBuf {
    let names_dir = out.is_dir() || out.as_os_str().to_string_lossy().ends_with(['/', '\\']);
    if names_dir {
        out.join(format!("{function}.test.js"))
    } else {
        out.to_path_buf()
    }
}

/* ============================================================
   Rendering
   ============================================================ */

fn render_case(descriptor: &FunctionDescriptor, case: &TestCase, framework: Framework) -> String {
    let name = &descriptor.name;
    let args = case.args.join(", ");
    let description = escape_single_quoted(&case.description);

    if let Some(setup) = &case.setup {
        return format!(
            "  it('{description}', () => {{\n    {setup}{name}({args})){};\n  }});",
            framework.throw_closer(&case.expected)
        );
    }

    let (asyncness, await_kw) = if descriptor.is_async {
        ("async ", "await ")
    } else {
        ("", "")
    };

    format!(
        "  it('{description}', {asyncness}() => {{\n    const result = {await_kw}{name}({args});\n    {};\n  }});",
        framework.assert_equal("result", &case.expected)
    )
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgen::generator::synthesize;
    use pretty_assertions::assert_eq;

    fn greet() -> FunctionDescriptor {
        FunctionDescriptor::new("greet", vec!["name".into()], false)
    }

    #[test]
    fn renders_jest_file() {
        let cases = vec![
            TestCase::new("should greet", &["\"Ann\""], "\"Hello, Ann!\""),
            TestCase::new("should throw error with invalid input", &["undefined"], ".toThrow()")
                .with_setup("expect(() => "),
        ];

        let text = assemble(&greet(), &cases, Framework::Jest);

        assert_eq!(
            text,
            "// Jest test file

describe('greet', () => {
  it('should greet', () => {
    const result = greet(\"Ann\");
    expect(result).toBe(\"Hello, Ann!\");
  });

  it('should throw error with invalid input', () => {
    expect(() => greet(undefined)).toThrow();
  });
});"
        );
    }

    #[test]
    fn async_functions_are_awaited() {
        let d = FunctionDescriptor::new("load", vec!["url".into()], true);
        let text = assemble(&d, &[TestCase::new("loads", &["\"/x\""], "\"ok\"")], Framework::Vitest);

        assert!(text.starts_with("import { describe, it, expect } from 'vitest';\n// Vitest test file"));
        assert!(text.contains("  it('loads', async () => {\n    const result = await load(\"/x\");"));
    }

    #[test]
    fn mocha_uses_chai_phrasing() {
        let text = assemble(&greet(), &synthesize(&greet()), Framework::Mocha);

        assert!(text.starts_with("const { expect } = require('chai');\n// Mocha test file"));
        assert!(text.contains("expect(result).to.equal(\"Hello, John Doe!\");"));
        assert!(text.contains("expect(() => greet(undefined)).to.throw();"));
        assert!(!text.contains("toBe("));
    }

    #[test]
    fn mocha_keeps_throw_matcher_arguments() {
        let case = TestCase::new("rejects numbers", &["1"], ".toThrow(TypeError)").with_setup("expect(() => ");
        let text = assemble(&greet(), &[case], Framework::Mocha);

        assert!(text.contains("expect(() => greet(1)).to.throw(TypeError);"));
        assert!(!text.contains("toThrow"));
    }

    #[test]
    fn one_block_per_case_in_order() {
        let d = FunctionDescriptor::new("add", vec!["a".into(), "b".into()], false);
        let cases = synthesize(&d);
        let text = assemble(&d, &cases, Framework::Jest);

        assert!(text.contains("describe('add', () => {"));
        assert_eq!(text.matches("  it('").count(), cases.len());

        let positions: Vec<usize> = cases
            .iter()
            .map(|c| text.find(&format!("it('{}'", c.description)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn descriptions_are_escaped() {
        let text = assemble(
            &greet(),
            &[TestCase::new("handles O'Brien", &["\"O'Brien\""], "\"Hello, O'Brien!\"")],
            Framework::Jest,
        );
        assert!(text.contains("it('handles O\\'Brien', () => {"));
    }

    #[test]
    fn line_breaks_in_descriptions_stay_inside_the_literal() {
        let text = assemble(
            &greet(),
            &[TestCase::new("greets\nacross\r\nlines", &["\"Ann\""], "\"Hello, Ann!\"")],
            Framework::Jest,
        );

        assert!(text.contains("it('greets\\nacross\\r\\nlines', () => {"));
        assert!(text.lines().all(|l| !l.starts_with("across") && l != "lines', () => {"));
    }

    #[test]
    fn out_directory_gets_default_file_name() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(test_file_path(dir.path(), "greet"), dir.path().join("greet.test.js"));
        assert_eq!(
            test_file_path(Path::new("missing/tests/"), "add"),
            Path::new("missing/tests/").join("add.test.js")
        );

        let explicit = dir.path().join("custom.spec.js");
        assert_eq!(test_file_path(&explicit, "greet"), explicit);
    }

    #[test]
    fn writes_file_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("__tests__/greet.test.js");

        write_test_file(&path, "// Jest test file\n\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "// Jest test file\n");
    }
}
