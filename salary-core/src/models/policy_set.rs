use std::collections::HashSet;

use super::{PolicyError, TaxPolicy};
use crate::schedules;

/// Ordered collection of policies with unique ids.
///
/// The first policy is the baseline the others are compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySet {
    policies: Vec<TaxPolicy>,
}

impl PolicySet {
    /// # Errors
    ///
    /// * [`PolicyError::EmptySet`] when `policies` is empty.
    /// * [`PolicyError::DuplicateId`] when two policies share an id.
    pub fn new(policies: Vec<TaxPolicy>) -> Result<Self, PolicyError> {
        if policies.is_empty() {
            return Err(PolicyError::EmptySet);
        }

        let mut seen = HashSet::new();
        for policy in &policies {
            if !seen.insert(policy.id()) {
                return Err(PolicyError::DuplicateId(policy.id().to_string()));
            }
        }

        Ok(Self { policies })
    }

    /// The three regimes shipped with the crate: `current`, `jan_2026`,
    /// `jul_2026`.
    pub fn builtin() -> Result<Self, PolicyError> {
        let policies = schedules::builtin_policy_definitions()
            .into_iter()
            .map(TaxPolicy::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(policies)
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&TaxPolicy> {
        self.policies.iter().find(|p| p.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.policies.iter().map(TaxPolicy::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxPolicy> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn baseline(&self) -> &TaxPolicy {
        &self.policies[0]
    }

    /// Narrows the set to `ids`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownPolicy`] for an id not in the set, and
    /// the errors of [`PolicySet::new`] for an empty or repeated selection.
    pub fn select<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Self, PolicyError> {
        let selected = ids
            .iter()
            .map(|id| {
                self.get(id.as_ref())
                    .cloned()
                    .ok_or_else(|| PolicyError::UnknownPolicy {
                        id: id.as_ref().to_string(),
                        available: self.ids().into_iter().map(str::to_string).collect(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(selected)
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a TaxPolicy;
    type IntoIter = std::slice::Iter<'a, TaxPolicy>;

    fn into_iter(self) -> Self::IntoIter {
        self.policies.iter()
    }
}
