//! Core value types.

use serde::{Deserialize, Serialize};

/// An ordered, duplicate-free set of payment-method identifiers.
///
/// Checkout gateways are presented to shoppers in a deliberate order, so
/// set operations here preserve the insertion order of `self` rather
/// than re-sorting. During an evaluation a `MethodSet` only ever
/// shrinks; the [`LockManager`](crate::LockManager) enforces that by
/// intersecting every strategy's output with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodSet {
    ids: Vec<String>,
}

impl MethodSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of method ids in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `method_id` is in the set.
    #[must_use]
    pub fn contains(&self, method_id: &str) -> bool {
        self.ids.iter().any(|id| id == method_id)
    }

    /// Append a method id, ignoring duplicates.
    pub fn insert(&mut self, method_id: impl Into<String>) {
        let method_id = method_id.into();
        if !self.contains(&method_id) {
            self.ids.push(method_id);
        }
    }

    /// Remove a method id. Returns `true` if it was present.
    pub fn remove(&mut self, method_id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| id != method_id);
        before != self.ids.len()
    }

    /// Ids present in both sets, in `self`'s order.
    #[must_use]
    pub fn intersect(&self, other: &MethodSet) -> MethodSet {
        self.ids
            .iter()
            .filter(|id| other.contains(id))
            .cloned()
            .collect()
    }

    /// Ids present in `self` but not in `other`, in `self`'s order.
    #[must_use]
    pub fn difference(&self, other: &MethodSet) -> MethodSet {
        self.ids
            .iter()
            .filter(|id| !other.contains(id))
            .cloned()
            .collect()
    }

    /// Whether every id in `self` is also in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &MethodSet) -> bool {
        self.ids.iter().all(|id| other.contains(id))
    }

    /// Iterate over the method ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Borrow the ids as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl FromIterator<String> for MethodSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = MethodSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for MethodSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<String>> for MethodSet {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for MethodSet {
    fn from(ids: [&str; N]) -> Self {
        ids.into_iter().collect()
    }
}

impl IntoIterator for MethodSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_deduplicates_and_preserves_order() {
        let mut set = MethodSet::new();
        set.insert("paypal");
        set.insert("bank_transfer");
        set.insert("paypal");

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), ["paypal", "bank_transfer"]);
    }

    #[test]
    fn intersect_keeps_self_order() {
        let a = MethodSet::from(["cod", "paypal", "bank_transfer"]);
        let b = MethodSet::from(["bank_transfer", "cod"]);

        assert_eq!(a.intersect(&b).as_slice(), ["cod", "bank_transfer"]);
    }

    #[test]
    fn difference_removes_matches() {
        let a = MethodSet::from(["paypal", "bank_transfer", "cod"]);
        let b = MethodSet::from(["bank_transfer"]);

        assert_eq!(a.difference(&b).as_slice(), ["paypal", "cod"]);
    }

    #[test]
    fn subset_checks() {
        let a = MethodSet::from(["paypal"]);
        let b = MethodSet::from(["paypal", "cod"]);

        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
        assert!(MethodSet::new().is_subset_of(&a));
    }

    #[test]
    fn from_iter_deduplicates() {
        let set: MethodSet = vec!["a".to_string(), "b".to_string(), "a".to_string()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serde_round_trips_as_plain_list() {
        let set = MethodSet::from(["paypal", "cod"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["paypal","cod"]"#);

        let back: MethodSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
