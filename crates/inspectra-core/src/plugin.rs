//! Host-side plugin descriptors and host version information

use serde::{Deserialize, Serialize};
use std::fmt;

/// A plugin as reported by the host plugin registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Registry name
    pub name: String,
    /// Declared plugin version
    pub version: String,
    /// Earliest compatible host build, when declared
    pub since_build: Option<String>,
    /// Latest compatible host build, when declared (may end in `.*`)
    pub until_build: Option<String>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            since_build: None,
            until_build: None,
        }
    }

    pub fn with_range(
        mut self,
        since_build: Option<String>,
        until_build: Option<String>,
    ) -> Self {
        self.since_build = since_build;
        self.until_build = until_build;
        self
    }
}

/// Version and build of the running host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVersion {
    /// Marketing version, e.g. "2017.1"
    pub version: String,
    /// Dotted build number, e.g. "171.4249.32"
    pub build: String,
}

impl HostVersion {
    pub fn new(version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build: build.into(),
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (build {})", self.version, self.build)
    }
}
