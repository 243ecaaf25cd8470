//! Plugin compatibility checking
//!
//! Given a plugin's declared version range and the host's version, a checker
//! produces an optional human-readable incompatibility reason; `None` means
//! compatible. [`BuildRangeChecker`] is the default implementation, comparing
//! dotted build numbers against the declared since/until range.

use inspectra_core::{HostVersion, PluginDescriptor};
use std::sync::Arc;

/// Thread-safe reference to a compatibility checker
pub type CompatibilityCheckerRef = Arc<dyn CompatibilityChecker + Send + Sync>;

/// Decides whether a plugin is compatible with the running host.
pub trait CompatibilityChecker {
    /// Reason the plugin is incompatible, or `None` when it is compatible.
    fn incompatibility_reason(
        &self,
        plugin: &PluginDescriptor,
        host: &HostVersion,
    ) -> Option<String>;
}

/// Default checker: dotted build number comparison against since/until.
///
/// Build numbers compare component-wise, shorter numbers padding with zero.
/// A trailing `*` in an until-build matches any value of that component.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildRangeChecker;

impl CompatibilityChecker for BuildRangeChecker {
    fn incompatibility_reason(
        &self,
        plugin: &PluginDescriptor,
        host: &HostVersion,
    ) -> Option<String> {
        let current = parse_build(&host.build);

        if let Some(since) = &plugin.since_build {
            if compare_builds(&current, &parse_build(since)) == std::cmp::Ordering::Less {
                return Some(format!(
                    "plugin {} {} requires build {} or newer, but the platform is {}",
                    plugin.name, plugin.version, since, host
                ));
            }
        }

        if let Some(until) = &plugin.until_build {
            if compare_builds(&current, &parse_build(until)) == std::cmp::Ordering::Greater {
                return Some(format!(
                    "plugin {} {} supports builds up to {}, but the platform is {}",
                    plugin.name, plugin.version, until, host
                ));
            }
        }

        None
    }
}

/// Components of a dotted build number; `*` becomes a match-anything value.
fn parse_build(build: &str) -> Vec<u64> {
    build
        .split('.')
        .map(|component| {
            if component == "*" {
                u64::MAX
            } else {
                component.parse().unwrap_or(0)
            }
        })
        .collect()
}

fn compare_builds(left: &[u64], right: &[u64]) -> std::cmp::Ordering {
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    std::cmp::Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostVersion {
        HostVersion::new("2017.1", "171.4249.32")
    }

    fn plugin(since: Option<&str>, until: Option<&str>) -> PluginDescriptor {
        PluginDescriptor::new("Sample", "1.0").with_range(
            since.map(str::to_string),
            until.map(str::to_string),
        )
    }

    #[test]
    fn plugin_inside_the_range_is_compatible() {
        let checker = BuildRangeChecker;
        let reason = checker.incompatibility_reason(&plugin(Some("171.1"), Some("172.*")), &host());
        assert_eq!(reason, None);
    }

    #[test]
    fn plugin_without_a_range_is_compatible() {
        let checker = BuildRangeChecker;
        assert_eq!(
            checker.incompatibility_reason(&plugin(None, None), &host()),
            None
        );
    }

    #[test]
    fn too_new_since_build_is_rejected_with_a_reason() {
        let checker = BuildRangeChecker;
        let reason = checker
            .incompatibility_reason(&plugin(Some("181.1"), None), &host())
            .expect("expected a reason");
        assert!(reason.contains("requires build 181.1 or newer"), "{}", reason);
    }

    #[test]
    fn too_old_until_build_is_rejected_with_a_reason() {
        let checker = BuildRangeChecker;
        let reason = checker
            .incompatibility_reason(&plugin(None, Some("163.*")), &host())
            .expect("expected a reason");
        assert!(reason.contains("supports builds up to 163.*"), "{}", reason);
    }

    #[test]
    fn wildcard_until_matches_the_whole_branch() {
        let checker = BuildRangeChecker;
        let reason = checker.incompatibility_reason(&plugin(None, Some("171.*")), &host());
        assert_eq!(reason, None);
    }

    #[test]
    fn shorter_builds_pad_with_zero() {
        let checker = BuildRangeChecker;
        // 171 == 171.0.0, which is below 171.4249.32
        let reason = checker.incompatibility_reason(&plugin(None, Some("171")), &host());
        assert!(reason.is_some());
    }
}
