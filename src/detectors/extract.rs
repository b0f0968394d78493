//! detectors/extract.rs
//!
//! Pattern-based function discovery for JavaScript / TypeScript snippets.
//!
//! No syntax tree is built. Incomplete or invalid input is the normal case:
//! whatever matches the declaration shapes is reported, everything else is
//! ignored. Braces inside strings and comments are not special.

use std::sync::LazyLock;

use regex::Regex;

use crate::detectors::descriptor::{FunctionDescriptor, ANONYMOUS};

/// `[export [default]] [async] function[*] name(params)[: ret] {`
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\bexport\s+(default\s+)?)?(?:\b(async)\s+)?\bfunction\b\s*(?:\*\s*)?([A-Za-z0-9_$]*)\s*\(([^)]*)\)\s*(?::\s*[^{;]*)?\{",
    )
    .unwrap()
});

/// `[export] const|let|var name[: T] = [async] (params)[: ret] =>`
/// also `= [async] ident =>` and `= [async] function[*] [name](params)`.
static BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\bexport\s+)?\b(?:const|let|var)\s+([A-Za-z0-9_$]+)\s*(?::[^=;]+)?=\s*(?:(async)\b\s*)?(?:\(([^)]*)\)\s*(?::\s*[^=;{}]+?)?\s*=>|([A-Za-z_$][A-Za-z0-9_$]*)\s*=>|function\b\s*(?:\*\s*)?[A-Za-z0-9_$]*\s*\(([^)]*)\))",
    )
    .unwrap()
});

static DEFAULT_EXPORT_SITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+default\s+(?:async\s+)?function\b").unwrap()
});

/// Line endings that mean an expression continues on the next line.
const CONTINUATIONS: [&str; 9] = ["=>", "=", "(", ",", "?", ":", "&&", "||", "+"];

/* ============================================================
   Public API
   ============================================================ */

/// Discovers every function in `source`.
///
/// Declarations come first in source order, then bindings in source order.
pub fn extract(source: &str) -> Vec<FunctionDescriptor> {
    let mut out = Vec::new();

    for caps in DECLARATION.captures_iter(source) {
        let is_default = caps.get(1).is_some();
        let name = caps.get(3).map_or("", |m| m.as_str());

        // `function (` outside a default export is an expression, not ours
        if name.is_empty() && !is_default {
            continue;
        }

        let params = caps.get(4).map_or("", |m| m.as_str());
        out.push(describe(source, name, params, caps.get(2).is_some()));
    }

    for caps in BINDING.captures_iter(source) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };

        let params = caps
            .get(3)
            .or_else(|| caps.get(4))
            .or_else(|| caps.get(5))
            .map_or("", |m| m.as_str());

        out.push(describe(source, name, params, caps.get(2).is_some()));
    }

    log::debug!("extracted {} function(s)", out.len());
    out
}

/// Splits a raw parameter list into cleaned parameter names.
pub fn parse_params(list: &str) -> Vec<String> {
    split_top_level(list, |c| c == ',')
        .into_iter()
        .filter_map(|entry| clean_param(&entry))
        .collect()
}

/// Recovers the text of `name`'s definition by brace counting.
///
/// Starts at the first line declaring `name` and stops once the brace depth
/// returns to zero after having opened. Returns an empty string when no line
/// declares `name`.
pub fn recover_body(source: &str, name: &str) -> String {
    let site = declaration_site(name);
    let lines: Vec<&str> = source.lines().collect();

    let Some(start) = lines.iter().position(|l| site.is_match(l)) else {
        return String::new();
    };

    let mut depth: i64 = 0;
    let mut parens: i64 = 0;
    let mut opened = false;
    let mut body = Vec::new();

    for line in &lines[start..] {
        body.push(*line);

        for c in line.chars() {
            match c {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
        }

        if opened {
            if depth <= 0 {
                break;
            }
        } else if parens <= 0 && !continues(line) {
            break;
        }
    }

    body.join("\n")
}

/* ============================================================
   Helpers
   ============================================================ */

fn describe(source: &str, name: &str, params: &str, is_async: bool) -> FunctionDescriptor {
    let name = if name.is_empty() { ANONYMOUS } else { name };
    FunctionDescriptor::new(name, parse_params(params), is_async).with_source(recover_body(source, name))
}

fn declaration_site(name: &str) -> Regex {
    if name == ANONYMOUS {
        return Regex::clone(&DEFAULT_EXPORT_SITE);
    }

    let n = regex::escape(name);
    let pattern = format!(
        r"\bfunction\s*\*?\s*{n}(?:[^A-Za-z0-9_$]|$)|(?:^|[^A-Za-z0-9_$.]){n}\s*(?::[^=]*)?=(?:[^=>]|$)"
    );

    // Escaped identifiers always compile; fall back to a literal scan otherwise
    Regex::new(&pattern).unwrap_or_else(|_| Regex::clone(&DEFAULT_EXPORT_SITE))
}

fn continues(line: &str) -> bool {
    let trimmed = line.trim_end();
    CONTINUATIONS.iter().any(|t| trimmed.ends_with(t))
}

fn clean_param(entry: &str) -> Option<String> {
    let head = split_top_level(entry, |c| c == ':' || c == '=')
        .into_iter()
        .next()
        .unwrap_or_default();

    let name = head.trim().trim_end_matches('?').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Splits on `is_sep` only outside `()`, `[]`, `{}` and `<>` nesting.
fn split_top_level(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut prev = '\0';

    for c in text.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            // `=>` is an arrow, not a closing generic
            '>' if prev != '=' => depth -= 1,
            _ => {}
        }

        if depth <= 0 && is_sep(c) {
            parts.push(std::mem::take(&mut current));
            depth = 0;
        } else {
            current.push(c);
        }
        prev = c;
    }

    parts.push(current);
    parts
}
