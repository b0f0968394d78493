//! detectors/framework.rs
//!
//! Target test framework selection and detection from `package.json`.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// jest's `.toThrow(` matcher opener, with or without arguments.
static JEST_THROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.toThrow\s*\(").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[default]
    Jest,
    Mocha,
    Vitest,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::Jest, Framework::Mocha, Framework::Vitest];

    /// File header emitted before the test group.
    pub fn preamble(&self) -> &'static str {
        match self {
            Framework::Jest => "// Jest test file",
            Framework::Mocha => "const { expect } = require('chai');\n// Mocha test file",
            Framework::Vitest => "import { describe, it, expect } from 'vitest';\n// Vitest test file",
        }
    }

    /// Equality assertion on `actual` against `expected`.
    pub fn assert_equal(&self, actual: &str, expected: &str) -> String {
        match self {
            Framework::Mocha => format!("expect({actual}).to.equal({expected})"),
            Framework::Jest | Framework::Vitest => format!("expect({actual}).toBe({expected})"),
        }
    }

    /// Rewrites a jest-style throw closer into this framework's phrasing.
    ///
    /// chai spells every `.toThrow(..)` form as `.to.throw(..)`; matcher
    /// arguments are kept.
    pub fn throw_closer<'a>(&self, expected: &'a str) -> Cow<'a, str> {
        match self {
            Framework::Mocha => JEST_THROW.replace_all(expected, ".to.throw("),
            Framework::Jest | Framework::Vitest => Cow::Borrowed(expected),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Framework::Jest => "jest",
            Framework::Mocha => "mocha",
            Framework::Vitest => "vitest",
        };
        f.write_str(s)
    }
}

impl FromStr for Framework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jest" => Ok(Framework::Jest),
            "mocha" => Ok(Framework::Mocha),
            "vitest" => Ok(Framework::Vitest),
            other => Err(Error::UnknownFramework(other.to_string())),
        }
    }
}

/* ============================================================
   Detection
   ============================================================ */

/// Picks a framework from the nearest `package.json` at or above `start`.
///
/// Vitest wins over mocha, mocha over jest. Falls back to jest when no
/// manifest is found or it names none of them.
pub fn detect_framework(start: &Path) -> Framework {
    let Some(pkg) = find_manifest(start) else {
        return Framework::default();
    };
    let Ok(contents) = std::fs::read_to_string(&pkg) else {
        return Framework::default();
    };

    log::debug!("framework detection using {}", pkg.display());

    // Cheap string scan; avoids JSON parsing cost
    if contents.contains("\"vitest\"") {
        Framework::Vitest
    } else if contents.contains("\"mocha\"") {
        Framework::Mocha
    } else {
        Framework::Jest
    }
}

fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("package.json"))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Vitest".parse::<Framework>().unwrap(), Framework::Vitest);
        assert_eq!(" mocha ".parse::<Framework>().unwrap(), Framework::Mocha);
        assert!(matches!(
            "ava".parse::<Framework>(),
            Err(Error::UnknownFramework(name)) if name == "ava"
        ));
    }

    #[test]
    fn mocha_rephrases_throw_closer() {
        assert_eq!(Framework::Mocha.throw_closer(".toThrow()"), ".to.throw()");
        assert_eq!(Framework::Jest.throw_closer(".toThrow()"), ".toThrow()");
        assert_eq!(
            Framework::Mocha.throw_closer(".toThrow(TypeError)"),
            ".to.throw(TypeError)"
        );
        assert_eq!(
            Framework::Mocha.throw_closer(".toThrow('bad input')"),
            ".to.throw('bad input')"
        );
        assert_eq!(Framework::Mocha.throw_closer(".not.toThrow()"), ".not.to.throw()");
        assert_eq!(
            Framework::Vitest.throw_closer(".toThrow(TypeError)"),
            ".toThrow(TypeError)"
        );
    }

    #[test]
    fn detects_from_manifest_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "devDependencies": { "vitest": "^1.0.0" } }"#,
        )
        .unwrap();
        let nested = dir.path().join("src/utils");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(detect_framework(&nested), Framework::Vitest);
    }

    #[test]
    fn detects_mocha_and_defaults_to_jest() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("package.json");

        fs::write(&pkg, r#"{ "devDependencies": { "mocha": "^10", "chai": "^4" } }"#).unwrap();
        assert_eq!(detect_framework(dir.path()), Framework::Mocha);

        fs::write(&pkg, r#"{ "scripts": { "test": "node index.js" } }"#).unwrap();
        assert_eq!(detect_framework(dir.path()), Framework::Jest);
    }
}
