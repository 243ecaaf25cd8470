//! Module classification from dependency classpaths
//!
//! A module is classified by the runtime libraries found on the classpath of
//! its compile-scope dependency closure. The classification is diagnostic:
//! it drives log output and an unsupported-target warning, never control
//! flow.

use std::fmt;

/// Classpath URL markers identifying a JVM runtime library.
pub const JVM_RUNTIME_MARKERS: &[&str] = &["kotlin-stdlib", "kotlin-runtime"];

/// Classpath URL markers identifying a JavaScript runtime library.
pub const JS_RUNTIME_MARKERS: &[&str] = &["kotlin-stdlib-js"];

/// Classpath URL markers identifying a common (multiplatform) runtime library.
pub const COMMON_RUNTIME_MARKERS: &[&str] = &["kotlin-stdlib-common"];

/// Diagnostic categorization of a module by its dependency closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleClassification {
    Jvm,
    Js,
    Common,
    Plain,
}

impl ModuleClassification {
    /// Whether analysis of a module with this classification is supported.
    ///
    /// JS-only and common-only modules are logged and skipped by callers.
    pub fn analysis_supported(&self) -> bool {
        !matches!(self, Self::Js | Self::Common)
    }
}

impl fmt::Display for ModuleClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jvm => "JVM",
            Self::Js => "JS",
            Self::Common => "COMMON",
            Self::Plain => "PLAIN",
        };
        write!(f, "{}", name)
    }
}

/// Classify a module from the classpath URLs of its dependency closure.
///
/// Each URL is matched against the most specific marker first (common, then
/// JS, then JVM), so `kotlin-stdlib-js` never counts as a JVM hit. Across
/// the whole closure JVM wins over JS, JS over COMMON; a closure without any
/// runtime marker is PLAIN.
pub fn classify_classpath<I, S>(urls: I) -> ModuleClassification
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut has_jvm = false;
    let mut has_js = false;
    let mut has_common = false;

    for url in urls {
        let url = url.as_ref();
        if contains_any(url, COMMON_RUNTIME_MARKERS) {
            has_common = true;
        } else if contains_any(url, JS_RUNTIME_MARKERS) {
            has_js = true;
        } else if contains_any(url, JVM_RUNTIME_MARKERS) {
            has_jvm = true;
        }
    }

    if has_jvm {
        ModuleClassification::Jvm
    } else if has_js {
        ModuleClassification::Js
    } else if has_common {
        ModuleClassification::Common
    } else {
        ModuleClassification::Plain
    }
}

fn contains_any(url: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| url.contains(marker))
}
