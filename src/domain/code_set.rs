//! Code sets compared under a normalization policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::normalize::NormalizationPolicy;

/// Set of codes keyed by their normalized form.
///
/// The first spelling inserted for a key is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSet {
    policy: NormalizationPolicy,
    entries: BTreeMap<String, String>,
}

impl CodeSet {
    pub fn new(policy: NormalizationPolicy) -> Self {
        Self {
            policy,
            entries: BTreeMap::new(),
        }
    }

    pub fn from_codes<I, S>(policy: NormalizationPolicy, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new(policy);
        for code in codes {
            set.insert(code.as_ref());
        }
        set
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(&self.policy.normalize(code))
    }

    /// Stored spelling of an equivalent code.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .get(&self.policy.normalize(code))
            .map(String::as_str)
    }

    /// Returns false if an equivalent code was already present.
    pub fn insert(&mut self, code: &str) -> bool {
        let key = self.policy.normalize(code);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, code.to_string());
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        self.entries.remove(&self.policy.normalize(code)).is_some()
    }

    /// Flip membership; returns whether the code is now present.
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.remove(code) {
            false
        } else {
            self.insert(code)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original spellings, ordered by normalized key.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.values().cloned().collect()
    }

    /// Members of `self` that are also in `other`, spelled as in `self`.
    pub fn intersection(&self, other: &CodeSet) -> CodeSet {
        self.retain_by(|code| other.contains(code))
    }

    /// Members of `self` that are not in `other`, spelled as in `self`.
    pub fn difference(&self, other: &CodeSet) -> CodeSet {
        self.retain_by(|code| !other.contains(code))
    }

    /// Members of either set; `self` wins on spelling.
    pub fn union(&self, other: &CodeSet) -> CodeSet {
        let mut result = self.clone();
        for code in other.iter() {
            result.insert(code);
        }
        result
    }

    fn retain_by<F: Fn(&str) -> bool>(&self, keep: F) -> CodeSet {
        Self::from_codes(self.policy, self.iter().filter(|code| keep(code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_set_keeps_first_spelling() {
        let mut set = CodeSet::new(NormalizationPolicy::CaseInsensitive);
        assert!(set.insert("Admin"));
        assert!(!set.insert("ADMIN"));
        assert!(set.contains("admin"));
        assert_eq!(set.to_vec(), vec!["Admin".to_string()]);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = CodeSet::new(NormalizationPolicy::Exact);
        assert!(set.toggle("R1"));
        assert!(!set.toggle("R1"));
        assert!(set.is_empty());
    }
}
