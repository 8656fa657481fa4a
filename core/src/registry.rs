// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check Contract & Registry (`spec.md` §4.1).
//!
//! At startup, the registry loads a static table mapping `(category,
//! check_id)` to its run function and weight. Iteration is always in stable
//! (category, then check id) order, so two identical inputs produce
//! byte-identical output modulo timestamps.

use crate::contract::Check;
use repolizer_checks::builtin::is_known_category;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort startup before any repository is processed.
///
/// `spec.md` §4.1: "If a registered check's run function cannot be located
/// at start, the Registry fails fatally (design decision: partial
/// registries invite silent score skew)."
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two checks were registered under the same id.
    #[error("duplicate check id: {0}")]
    DuplicateCheckId(String),

    /// A check declared a category outside the fixed set.
    #[error("unknown category '{category}' for check '{check_id}'")]
    UnknownCategory { check_id: String, category: String },

    /// A check declared a non-positive weight.
    #[error("check '{check_id}' has non-positive weight {weight}")]
    NonPositiveWeight { check_id: String, weight: f64 },

    /// The registry was built with no checks at all.
    #[error("no checks registered")]
    Empty,
}

/// One registered check: its identity, category, weight, and the
/// implementation to invoke.
#[derive(Clone)]
pub struct CheckDescriptor {
    id: String,
    category: String,
    weight: f64,
    check: Arc<dyn Check>,
}

impl CheckDescriptor {
    /// Globally unique check id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fixed category tag this check belongs to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Relative weight within its category.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The runnable check implementation.
    pub fn check(&self) -> &Arc<dyn Check> {
        &self.check
    }
}

impl std::fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("weight", &self.weight)
            .finish()
    }
}

/// The immutable, globally shared table of all registered checks.
///
/// Built once at startup via [`CheckRegistryBuilder`] and never mutated
/// afterward; freely shared (read-only) across worker tasks.
#[derive(Debug, Clone)]
pub struct CheckRegistry {
    descriptors: Vec<CheckDescriptor>,
}

impl CheckRegistry {
    /// Start building a registry.
    pub fn builder() -> CheckRegistryBuilder {
        CheckRegistryBuilder::default()
    }

    /// All registered checks, in stable (category, then id) order.
    pub fn all(&self) -> &[CheckDescriptor] {
        &self.descriptors
    }

    /// Checks registered under `category`, in id order.
    pub fn checks_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CheckDescriptor> {
        self.descriptors.iter().filter(move |d| d.category == category)
    }

    /// The distinct categories present in this registry, in sorted order.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .descriptors
            .iter()
            .map(|d| d.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        cats.sort_unstable();
        cats
    }

    /// Total number of registered checks.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// `true` if no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Builds a [`CheckRegistry`], validating id uniqueness, known categories,
/// and positive weights before sealing it.
#[derive(Default)]
pub struct CheckRegistryBuilder {
    descriptors: Vec<CheckDescriptor>,
}

impl CheckRegistryBuilder {
    /// Register one check implementation.
    pub fn register(mut self, check: Arc<dyn Check>) -> Self {
        self.descriptors.push(CheckDescriptor {
            id: check.id().to_string(),
            category: check.category().to_string(),
            weight: check.weight(),
            check,
        });
        self
    }

    /// Validate and seal the registry.
    ///
    /// Iteration order is fixed here (sorted by category, then id) so the
    /// resulting registry always walks checks deterministically.
    pub fn build(mut self) -> Result<CheckRegistry, RegistryError> {
        if self.descriptors.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen_ids = HashSet::with_capacity(self.descriptors.len());
        for d in &self.descriptors {
            if !seen_ids.insert(d.id.clone()) {
                return Err(RegistryError::DuplicateCheckId(d.id.clone()));
            }
            if !is_known_category(&d.category) {
                return Err(RegistryError::UnknownCategory {
                    check_id: d.id.clone(),
                    category: d.category.clone(),
                });
            }
            if d.weight <= 0.0 {
                return Err(RegistryError::NonPositiveWeight {
                    check_id: d.id.clone(),
                    weight: d.weight,
                });
            }
        }

        self.descriptors.sort_by(|a, b| (&a.category, &a.id).cmp(&(&b.category, &b.id)));

        Ok(CheckRegistry {
            descriptors: self.descriptors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::RawResult;
    use crate::snapshot::{CancelSignal, RepoHandle, SnapshotProvider};
    use async_trait::async_trait;
    use repolizer_checks::schema::RepoEntry;
    use serde_json::Value;

    struct StubCheck {
        id: &'static str,
        category: &'static str,
        weight: f64,
    }

    #[async_trait]
    impl Check for StubCheck {
        fn id(&self) -> &str {
            self.id
        }
        fn category(&self) -> &str {
            self.category
        }
        fn weight(&self) -> f64 {
            self.weight
        }
        async fn run(&self, _handle: &RepoHandle, _cancel: &CancelSignal) -> RawResult {
            RawResult::completed(50.0, Value::Null)
        }
    }

    fn stub(id: &'static str, category: &'static str) -> Arc<dyn Check> {
        Arc::new(StubCheck { id, category, weight: 1.0 })
    }

    #[test]
    fn test_empty_registry_fails() {
        let result = CheckRegistry::builder().build();
        assert!(matches!(result, Err(RegistryError::Empty)));
    }

    #[test]
    fn test_duplicate_id_fails() {
        let result = CheckRegistry::builder()
            .register(stub("a", "security"))
            .register(stub("a", "testing"))
            .build();
        assert!(matches!(result, Err(RegistryError::DuplicateCheckId(_))));
    }

    #[test]
    fn test_unknown_category_fails() {
        let result = CheckRegistry::builder().register(stub("a", "not_a_category")).build();
        assert!(matches!(result, Err(RegistryError::UnknownCategory { .. })));
    }

    #[test]
    fn test_non_positive_weight_fails() {
        let check = Arc::new(StubCheck {
            id: "a",
            category: "security",
            weight: 0.0,
        });
        let result = CheckRegistry::builder().register(check).build();
        assert!(matches!(result, Err(RegistryError::NonPositiveWeight { .. })));
    }

    #[test]
    fn test_stable_sort_order() {
        let registry = CheckRegistry::builder()
            .register(stub("zeta", "testing"))
            .register(stub("alpha", "security"))
            .register(stub("beta", "security"))
            .build()
            .unwrap();

        let ids: Vec<&str> = registry.all().iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_categories_sorted_and_deduped() {
        let registry = CheckRegistry::builder()
            .register(stub("a", "testing"))
            .register(stub("b", "security"))
            .register(stub("c", "security"))
            .build()
            .unwrap();
        assert_eq!(registry.categories(), vec!["security", "testing"]);
    }

    #[tokio::test]
    async fn test_checks_in_category_runs() {
        let registry = CheckRegistry::builder().register(stub("a", "security")).build().unwrap();
        let descriptor = registry.checks_in_category("security").next().unwrap();
        let entry = RepoEntry::new("1", "widget", "acme/widget");
        let handle = SnapshotProvider::snapshot(&entry);
        let cancel = CancelSignal::new();
        let result = descriptor.check().run(&handle, &cancel).await;
        assert_eq!(result.score, Some(50.0));
    }
}
