// Tue Jan 13 2026 - Alex

use crate::structure::{DescriptorIdentity, LayoutError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size and alignment of the dispatch pointer and of `ptr`.
    pub pointer_size: u64,
    pub descriptor_identity: DescriptorIdentity,
    /// Resolve independent root hierarchies on the rayon pool.
    pub parallel_hierarchies: bool,
    /// Also flag fields whose offset is not a multiple of their alignment.
    pub check_field_alignment: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pointer_size: 8,
            descriptor_identity: DescriptorIdentity::PerLevel,
            parallel_hierarchies: true,
            check_field_alignment: true,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pointer_size(mut self, pointer_size: u64) -> Self {
        self.pointer_size = pointer_size;
        self
    }

    pub fn with_descriptor_identity(mut self, identity: DescriptorIdentity) -> Self {
        self.descriptor_identity = identity;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel_hierarchies = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pointer_size == 0 || !self.pointer_size.is_power_of_two() {
            return Err(format!(
                "pointer_size must be a power of two, got {}",
                self.pointer_size
            ));
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self, LayoutError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| LayoutError::Config(e.to_string()))?;
        config.validate().map_err(LayoutError::Config)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LayoutError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert_eq!(config.pointer_size, 8);
        assert_eq!(config.descriptor_identity, DescriptorIdentity::PerLevel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = LayoutConfig::from_json_str(
            r#"{ "pointer_size": 4, "descriptor_identity": "shared_by_name" }"#,
        )
        .unwrap();
        assert_eq!(config.pointer_size, 4);
        assert_eq!(config.descriptor_identity, DescriptorIdentity::SharedByName);
        assert!(config.parallel_hierarchies);
    }

    #[test]
    fn test_rejects_bad_pointer_size() {
        let err = LayoutConfig::from_json_str(r#"{ "pointer_size": 6 }"#).unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
        assert!(LayoutConfig::new().with_pointer_size(0).validate().is_err());
    }
}
