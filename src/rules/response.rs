//! Candidate responses attached to a rule.

use std::sync::Arc;

use crate::chooser::ResponseChooser;

/// Ordered, non-empty list of candidate responses.
///
/// Backed by shared storage so the cache and every published [`RuleSet`](super::RuleSet)
/// can hold the same set without copying strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSet {
    responses: Arc<[String]>,
}

impl ResponseSet {
    /// Build a response set, or `None` if `responses` is empty.
    pub fn new(responses: Vec<String>) -> Option<Self> {
        if responses.is_empty() {
            return None;
        }
        Some(Self {
            responses: responses.into(),
        })
    }

    /// Split the right-hand side of a rule line on `#`.
    ///
    /// Returns `None` for an empty response side.
    pub fn from_rule_text(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Self::new(text.split('#').map(str::to_string).collect())
    }

    /// Candidate responses in file order.
    pub fn as_slice(&self) -> &[String] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn contains(&self, response: &str) -> bool {
        self.responses.iter().any(|r| r == response)
    }

    /// Pick one response using `chooser`.
    ///
    /// Out-of-range indices from a misbehaving chooser are clamped to the
    /// last response.
    pub fn choose(&self, chooser: &dyn ResponseChooser) -> &str {
        let index = chooser.choose_index(self.responses.len());
        let index = index.min(self.responses.len() - 1);
        &self.responses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::FixedChooser;

    #[test]
    fn empty_vec_is_rejected() {
        assert!(ResponseSet::new(vec![]).is_none());
    }

    #[test]
    fn empty_rule_text_is_rejected() {
        assert!(ResponseSet::from_rule_text("").is_none());
    }

    #[test]
    fn rule_text_splits_on_hash_in_order() {
        let set = ResponseSet::from_rule_text("Hi there#Hey!#Yo").unwrap();
        assert_eq!(set.as_slice(), ["Hi there", "Hey!", "Yo"]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn empty_segments_are_kept() {
        let set = ResponseSet::from_rule_text("a##b").unwrap();
        assert_eq!(set.as_slice(), ["a", "", "b"]);
    }

    #[test]
    fn choose_uses_chooser_index() {
        let set = ResponseSet::from_rule_text("one#two#three").unwrap();
        assert_eq!(set.choose(&FixedChooser::new(0)), "one");
        assert_eq!(set.choose(&FixedChooser::new(2)), "three");
    }

    #[test]
    fn choose_clamps_out_of_range_index() {
        let set = ResponseSet::from_rule_text("one#two").unwrap();
        assert_eq!(set.choose(&FixedChooser::new(99)), "two");
    }

    #[test]
    fn clones_share_storage() {
        let set = ResponseSet::from_rule_text("a#b").unwrap();
        let copy = set.clone();
        assert!(Arc::ptr_eq(&set.responses, &copy.responses));
    }
}
