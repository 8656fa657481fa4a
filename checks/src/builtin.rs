// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Built-in category-weight presets.
//!
//! `spec.md` §4.1 fixes the category set and defaults every category weight
//! to 1 unless a downstream report renderer overrides them (§4.4, Open
//! Question 2). This module is the Rust-native analog of the teacher's
//! `datasets::builtin` factory functions, reframed from benchmark datasets to
//! the ten fixed check categories.

use std::collections::BTreeMap;

/// The fixed category tag set from `spec.md` §4.1/§6, in canonical
/// (alphabetical) order.
pub const CATEGORIES: &[&str] = &[
    "accessibility",
    "ci_cd",
    "code_quality",
    "community",
    "documentation",
    "licensing",
    "maintainability",
    "performance",
    "security",
    "testing",
];

/// Returns the built-in category-weight presets: every fixed category at
/// weight 1.
///
/// # Examples
///
/// ```
/// use repolizer_checks::builtin::default_category_weights;
///
/// let weights = default_category_weights();
/// assert_eq!(weights.len(), 10);
/// assert_eq!(weights["documentation"], 1.0);
/// ```
pub fn default_category_weights() -> BTreeMap<String, f64> {
    CATEGORIES.iter().map(|c| ((*c).to_string(), 1.0)).collect()
}

/// `true` if `category` is one of the fixed category tags.
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category_weights_has_ten_entries() {
        let weights = default_category_weights();
        assert_eq!(weights.len(), 10);
    }

    #[test]
    fn test_default_category_weights_all_one() {
        let weights = default_category_weights();
        assert!(weights.values().all(|w| (*w - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_categories_sorted() {
        let mut sorted = CATEGORIES.to_vec();
        sorted.sort_unstable();
        assert_eq!(CATEGORIES, sorted.as_slice());
    }

    #[test]
    fn test_is_known_category() {
        assert!(is_known_category("security"));
        assert!(!is_known_category("nonexistent"));
    }
}
