//! Assignment reconciliation: the minimal add/remove delta between two code sets.
//!
//! Every assignment screen (menu-role, department-application,
//! department-permission, user-role) goes through [`reconcile_with`] so that
//! codes compare the same way everywhere.

use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::normalize::NormalizationPolicy;

/// Codes to grant and codes to revoke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// Apply the delta to `current`, yielding the resulting code list.
    ///
    /// Removed codes are matched under `normalize`; added codes are appended
    /// unless already present.
    pub fn apply_to<I, S, N>(&self, current: I, normalize: N) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        N: Fn(&str) -> String,
    {
        let removed: HashSet<String> = self.to_remove.iter().map(|c| normalize(c)).collect();
        let mut result: Vec<(String, String)> = keyed(current, &normalize)
            .into_iter()
            .filter(|(key, _)| !removed.contains(key))
            .collect();
        for code in &self.to_add {
            let key = normalize(code);
            if !result.iter().any(|(k, _)| *k == key) {
                result.push((key, code.clone()));
            }
        }
        result.into_iter().map(|(_, original)| original).collect()
    }
}

/// Normalized key and first-seen original, in input order.
fn keyed<I, S, N>(codes: I, normalize: &N) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    N: Fn(&str) -> String,
{
    codes
        .into_iter()
        .map(|code| {
            let code = code.as_ref();
            (normalize(code), code.to_string())
        })
        .unique_by(|(key, _)| key.clone())
        .collect()
}

/// Reconcile under `normalize`.
///
/// `to_add` keeps the desired side's spelling, `to_remove` the current
/// side's. Never fails; empty inputs are fine.
pub fn reconcile_with<D, DS, C, CS, N>(desired: D, current: C, normalize: N) -> Diff
where
    D: IntoIterator<Item = DS>,
    DS: AsRef<str>,
    C: IntoIterator<Item = CS>,
    CS: AsRef<str>,
    N: Fn(&str) -> String,
{
    let desired = keyed(desired, &normalize);
    let current = keyed(current, &normalize);

    let desired_keys: HashSet<&str> = desired.iter().map(|(k, _)| k.as_str()).collect();
    let current_keys: HashSet<&str> = current.iter().map(|(k, _)| k.as_str()).collect();

    let to_add = desired
        .iter()
        .filter(|(k, _)| !current_keys.contains(k.as_str()))
        .map(|(_, original)| original.clone())
        .collect();
    let to_remove = current
        .iter()
        .filter(|(k, _)| !desired_keys.contains(k.as_str()))
        .map(|(_, original)| original.clone())
        .collect();

    Diff { to_add, to_remove }
}

/// Reconcile with exact (case-sensitive) comparison.
pub fn reconcile<D, DS, C, CS>(desired: D, current: C) -> Diff
where
    D: IntoIterator<Item = DS>,
    DS: AsRef<str>,
    C: IntoIterator<Item = CS>,
    CS: AsRef<str>,
{
    reconcile_with(desired, current, |s| s.to_string())
}

/// Reconcile under a configured policy.
pub fn reconcile_with_policy<D, DS, C, CS>(
    desired: D,
    current: C,
    policy: NormalizationPolicy,
) -> Diff
where
    D: IntoIterator<Item = DS>,
    DS: AsRef<str>,
    C: IntoIterator<Item = CS>,
    CS: AsRef<str>,
{
    reconcile_with(desired, current, |s| policy.normalize(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_keeps_first_spelling() {
        let k = keyed(["Admin", "ADMIN", "user"], &|s: &str| s.to_lowercase());
        assert_eq!(
            k,
            vec![
                ("admin".to_string(), "Admin".to_string()),
                ("user".to_string(), "user".to_string())
            ]
        );
    }
}
