//! Forest construction from flat parent-pointer lists.
//!
//! Departments, menus and roles arrive as flat lists where each entity names
//! its parent by code. [`ForestBuilder`] turns such a list into an ordered
//! multi-root forest without ever dropping an entity: orphans and members of
//! parent cycles become roots and are reported in [`ForestDiagnostics`].

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::entities::Hierarchical;

/// Tree node owning a copy of its entity and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node<T> {
    pub entity: T,
    pub children: Vec<Node<T>>,
}

/// Ordered list of root nodes.
pub type Forest<T> = Vec<Node<T>>;

impl<T> Node<T> {
    pub fn leaf(entity: T) -> Self {
        Self {
            entity,
            children: Vec::new(),
        }
    }

    pub fn with_children(entity: T, children: Vec<Node<T>>) -> Self {
        Self { entity, children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        Walk::new(std::slice::from_ref(self)).count()
    }
}

// Deep chains would overflow the stack with the derived recursive drop.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Data-quality findings collected while building a forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForestDiagnostics {
    /// Codes seen more than once; only the first occurrence is kept.
    pub duplicates: Vec<String>,
    /// Codes whose parent code resolves to nothing in the list.
    pub orphans: Vec<String>,
    /// Codes whose parent chain leads back to themselves.
    pub cycles: Vec<String>,
}

impl ForestDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.orphans.is_empty() && self.cycles.is_empty()
    }
}

/// Forest together with the diagnostics of its construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltForest<T> {
    pub roots: Forest<T>,
    pub diagnostics: ForestDiagnostics,
}

/// Builds multi-root forests from flat lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForestBuilder;

impl ForestBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a forest from `items` using the given accessors.
    ///
    /// Runs in O(n). Children and roots keep input order.
    #[instrument(level = "debug", skip_all, fields(items = items.len()))]
    pub fn build<T, C, P>(&self, items: &[T], code_of: C, parent_of: P) -> BuiltForest<T>
    where
        T: Clone,
        C: Fn(&T) -> &str,
        P: Fn(&T) -> Option<&str>,
    {
        let mut diagnostics = ForestDiagnostics::default();

        // Pass 1: first occurrence of each code wins
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(items.len());
        let mut unique: Vec<&T> = Vec::with_capacity(items.len());
        for item in items {
            let code = code_of(item);
            if index.contains_key(code) {
                warn!("duplicate code ignored: {}", code);
                diagnostics.duplicates.push(code.to_string());
                continue;
            }
            index.insert(code, unique.len());
            unique.push(item);
        }

        let parents: Vec<Option<usize>> = unique
            .iter()
            .map(|&item| {
                let parent_code = parent_of(item)?;
                let resolved = index.get(parent_code).copied();
                if resolved.is_none() {
                    debug!(
                        "orphan {} promoted to root: unknown parent {}",
                        code_of(item),
                        parent_code
                    );
                    diagnostics.orphans.push(code_of(item).to_string());
                }
                resolved
            })
            .collect();

        let forced_roots = find_cycle_members(&parents);
        for (i, forced) in forced_roots.iter().enumerate() {
            if *forced {
                warn!("parent cycle broken at {}", code_of(unique[i]));
                diagnostics.cycles.push(code_of(unique[i]).to_string());
            }
        }

        // Pass 2: attach to parents
        let mut roots = Vec::new();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); unique.len()];
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) if !forced_roots[i] => children[*p].push(i),
                _ => roots.push(i),
            }
        }

        let roots = materialize(&unique, &roots, &children);
        debug!("built forest with {} roots", roots.len());
        BuiltForest { roots, diagnostics }
    }

    /// Build a forest from entities implementing [`Hierarchical`].
    pub fn build_hierarchy<T>(&self, items: &[T]) -> BuiltForest<T>
    where
        T: Hierarchical + Clone,
    {
        self.build(items, |t| t.code(), |t| t.parent_code())
    }
}

/// Marks every node that sits on a parent cycle.
///
/// Each node is visited once: a walk stops at the first node already
/// finished by an earlier walk.
fn find_cycle_members(parents: &[Option<usize>]) -> Vec<bool> {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; parents.len()];
    let mut on_cycle = vec![false; parents.len()];
    let mut path = Vec::new();

    for start in 0..parents.len() {
        if state[start] != UNSEEN {
            continue;
        }
        path.clear();
        let mut current = Some(start);
        while let Some(node) = current {
            match state[node] {
                UNSEEN => {
                    state[node] = ON_PATH;
                    path.push(node);
                    current = parents[node];
                }
                ON_PATH => {
                    if let Some(pos) = path.iter().position(|&n| n == node) {
                        for &member in &path[pos..] {
                            on_cycle[member] = true;
                        }
                    }
                    current = None;
                }
                _ => current = None,
            }
        }
        for &node in &path {
            state[node] = DONE;
        }
    }
    on_cycle
}

/// Turns index adjacency into owned nodes without recursion.
fn materialize<T: Clone>(unique: &[&T], roots: &[usize], children: &[Vec<usize>]) -> Forest<T> {
    let mut preorder = Vec::with_capacity(unique.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        preorder.push(i);
        stack.extend(children[i].iter().rev());
    }

    // Descendants come after their ancestor in preorder, so walking it
    // backwards finishes every child before its parent.
    let mut slots: Vec<Option<Node<T>>> = vec![None; unique.len()];
    for &i in preorder.iter().rev() {
        let kids = children[i]
            .iter()
            .filter_map(|&c| slots[c].take())
            .collect();
        slots[i] = Some(Node::with_children(unique[i].clone(), kids));
    }

    roots.iter().filter_map(|&r| slots[r].take()).collect()
}

/// Build a forest, discarding diagnostics (they are still logged).
pub fn build_forest<T, C, P>(items: &[T], code_of: C, parent_of: P) -> Forest<T>
where
    T: Clone,
    C: Fn(&T) -> &str,
    P: Fn(&T) -> Option<&str>,
{
    ForestBuilder::new().build(items, code_of, parent_of).roots
}

/// Pre-order traversal yielding `(depth, node)`, roots at depth 0.
pub struct Walk<'a, T> {
    stack: Vec<(usize, &'a Node<T>)>,
}

impl<'a, T> Walk<'a, T> {
    pub fn new(forest: &'a [Node<T>]) -> Self {
        Self {
            stack: forest.iter().rev().map(|n| (0, n)).collect(),
        }
    }
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = (usize, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

pub fn walk<T>(forest: &[Node<T>]) -> Walk<'_, T> {
    Walk::new(forest)
}

pub fn count_nodes<T>(forest: &[Node<T>]) -> usize {
    walk(forest).count()
}

/// Number of levels in the forest; 0 for an empty forest.
pub fn depth<T>(forest: &[Node<T>]) -> usize {
    walk(forest).map(|(d, _)| d + 1).max().unwrap_or(0)
}

/// First node in pre-order whose entity satisfies `predicate`.
pub fn find<T, F>(forest: &[Node<T>], predicate: F) -> Option<&Node<T>>
where
    F: Fn(&T) -> bool,
{
    walk(forest)
        .map(|(_, n)| n)
        .find(|n| predicate(&n.entity))
}

/// Codes from the root down to the parent of `code`.
///
/// Returns `None` if `code` is not in the forest, an empty list for roots.
/// The presentation layer uses this to expand the path to a search hit.
pub fn ancestors_of<T, C>(forest: &[Node<T>], code_of: C, code: &str) -> Option<Vec<String>>
where
    C: Fn(&T) -> &str,
{
    let mut path: Vec<String> = Vec::new();
    for (depth, node) in walk(forest) {
        path.truncate(depth);
        let current = code_of(&node.entity);
        if current == code {
            return Some(path);
        }
        path.push(current.to_string());
    }
    None
}
