//! Forest pruning for search.

use crate::domain::entities::Record;
use crate::domain::forest::{Forest, Node};

/// Keep nodes matching `predicate` plus every ancestor of a match.
///
/// Children are filtered first; a node survives if it matches itself or
/// still has a child afterwards. The input forest is left untouched.
pub fn filter_forest<T, F>(forest: &[Node<T>], predicate: F) -> Forest<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    filter_nodes(forest, &predicate)
}

struct Frame<'a, T> {
    node: &'a Node<T>,
    next_child: usize,
    kept: Vec<Node<T>>,
}

impl<'a, T> Frame<'a, T> {
    fn new(node: &'a Node<T>) -> Self {
        Self {
            node,
            next_child: 0,
            kept: Vec::new(),
        }
    }
}

/// Post-order pass with an explicit stack, so depth is bounded by the heap.
fn filter_nodes<T, F>(roots: &[Node<T>], predicate: &F) -> Forest<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut result = Vec::new();
    let mut stack: Vec<Frame<'_, T>> = Vec::new();
    for root in roots {
        stack.push(Frame::new(root));
        while let Some(top) = stack.last_mut() {
            let node = top.node;
            if let Some(child) = node.children.get(top.next_child) {
                top.next_child += 1;
                stack.push(Frame::new(child));
                continue;
            }
            let Some(done) = stack.pop() else { break };
            if !predicate(&done.node.entity) && done.kept.is_empty() {
                continue;
            }
            let kept = Node::with_children(done.node.entity.clone(), done.kept);
            match stack.last_mut() {
                Some(parent) => parent.kept.push(kept),
                None => result.push(kept),
            }
        }
    }
    result
}

/// Case-insensitive substring matcher over name and code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatcher {
    needle: String,
}

impl SearchMatcher {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    /// An empty term matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, fields: &[&str]) -> bool {
        self.is_empty()
            || fields
                .iter()
                .any(|f| f.to_lowercase().contains(&self.needle))
    }

    pub fn matches_record(&self, record: &Record) -> bool {
        self.matches(&[record.name.as_str(), record.code.as_str()])
    }
}

/// Filter by search term over the fields returned by `fields_of`.
pub fn search_forest<T, S>(forest: &[Node<T>], term: &str, fields_of: S) -> Forest<T>
where
    T: Clone,
    S: Fn(&T) -> Vec<&str>,
{
    let matcher = SearchMatcher::new(term);
    if matcher.is_empty() {
        return filter_forest(forest, |_| true);
    }
    filter_forest(forest, |entity| matcher.matches(&fields_of(entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_ignores_case_and_surrounding_space() {
        let m = SearchMatcher::new("  FIN ");
        assert!(m.matches(&["Finance", "DEPT_01"]));
        assert!(!m.matches(&["Sales", "DEPT_02"]));
    }

    #[test]
    fn blank_matcher_matches_everything() {
        assert!(SearchMatcher::new("   ").matches(&[]));
    }
}
