// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-stream type descriptor cache.
//!
//! The first object of a given class carries a class-info record (tracking
//! level and class version). Every later object of the same class in the same
//! stream omits it, so readers and writers remember which classes they have
//! already seen.

use std::collections::HashMap;

/// Class-info record emitted once per class per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassInfo {
    /// Registry key; never written to the stream.
    pub name: String,
    /// Class version.
    pub version: u32,
    /// Object tracking level.
    pub tracking: u8,
}

impl ClassInfo {
    /// Record with version 0 and no tracking.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 0,
            tracking: 0,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_tracking(mut self, tracking: u8) -> Self {
        self.tracking = tracking;
        self
    }
}

/// Type name to class-info mapping, owned by one reader or writer.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, ClassInfo>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Cache `info` under its name. An existing entry is never replaced.
    pub fn insert(&mut self, info: ClassInfo) -> &ClassInfo {
        self.types.entry(info.name.clone()).or_insert(info)
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_entry() {
        let mut registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry.insert(ClassInfo::new("animal").with_version(1));
        let kept = registry.insert(ClassInfo::new("animal").with_version(7));
        assert_eq!(kept.version, 1);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("animal"));
        assert!(registry.get("plant").is_none());
    }
}
