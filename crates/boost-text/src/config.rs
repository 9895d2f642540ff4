// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Archive writer configuration

use crate::arch::Arch;
use crate::header::Header;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Archive writer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Architecture profile (length width and default header)
    pub arch: Arch,

    /// Header written instead of the profile default
    pub header: Option<Header>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            arch: Arch::Width64,
            header: None,
        }
    }
}

impl ArchiveConfig {
    /// Create a new config builder
    pub fn builder() -> ArchiveConfigBuilder {
        ArchiveConfigBuilder::default()
    }

    /// Parse a JSON document; missing keys take their default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Config builder for fluent API
#[derive(Debug, Default)]
pub struct ArchiveConfigBuilder {
    arch: Option<Arch>,
    header: Option<Header>,
}

impl ArchiveConfigBuilder {
    /// Set the architecture profile
    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }

    /// Override the header
    pub fn header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ArchiveConfig {
        let defaults = ArchiveConfig::default();

        ArchiveConfig {
            arch: self.arch.unwrap_or(defaults.arch),
            header: self.header.or(defaults.header),
        }
    }
}
