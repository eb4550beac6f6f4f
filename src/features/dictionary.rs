//! Descriptor-to-column mapping shared by training and inference.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FeatureDictionary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureDictionary {
    /// Maps each name to its position. Names are expected unique; on a repeat the
    /// later position wins the lookup.
    pub fn build(feature_names: &[String]) -> Self {
        let index = feature_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names: feature_names.to_vec(),
            index,
        }
    }

    pub fn index_of(&self, descriptor: &str) -> Option<usize> {
        self.index.get(descriptor).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_preserved() {
        let names: Vec<String> = ["event:a@1", "event:a@2", "succession:a@1#2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let d = FeatureDictionary::build(&names);
        assert_eq!(d.len(), 3);
        assert_eq!(d.index_of("event:a@2"), Some(1));
        assert_eq!(d.index_of("succession:a@1#2"), Some(2));
        assert_eq!(d.index_of("event:a@3"), None);
        assert_eq!(d.names(), names.as_slice());
    }
}
