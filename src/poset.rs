use crate::inquirer;
use crate::ordering::{CoverHints, PartialOrdering};
use crate::store::NodeStore;
use crate::validate::{self, ValidationError};
use itertools::Itertools;
use log::trace;
use std::fmt;
use std::hash::Hash;

/// A dynamic partially-ordered set.
///
/// Members are kept together with the Hasse diagram of the supplied order:
/// every member records its immediate parents and immediate children among
/// current members, and both [`add`](Self::add) and [`remove`](Self::remove)
/// repair the cover relation incrementally, so queries run against the
/// reduced graph rather than the transitive closure.
///
/// The ordering predicate is captured for the lifetime of the set and must be
/// a partial order over the carrier; optional [`CoverHints`] narrow the
/// candidate frontier during cover location without changing any observable
/// result. The structure is single-threaded and the predicate must not call
/// back into the same set.
pub struct PartiallyOrderedSet<E, O> {
    ordering: O,
    hints: Option<Box<dyn CoverHints<E>>>,
    store: NodeStore<E>,
}

impl<E, O> PartiallyOrderedSet<E, O>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    /// Creates an empty set over `ordering`.
    pub fn new(ordering: O) -> Self {
        Self { ordering, hints: None, store: NodeStore::new() }
    }

    /// Creates a set and inserts `elements` in iteration order.
    pub fn with_elements(ordering: O, elements: impl IntoIterator<Item = E>) -> Self {
        let mut poset = Self::new(ordering);
        for e in elements {
            poset.add(e);
        }
        poset
    }

    /// Creates an empty set whose cover location is accelerated by `hints`.
    pub fn with_hints(ordering: O, hints: impl CoverHints<E> + 'static) -> Self {
        Self { ordering, hints: Some(Box::new(hints)), store: NodeStore::new() }
    }

    /// Inserts `e` and splices it into the diagram between its immediate
    /// parents and children. Returns false, leaving the set untouched, when
    /// `e` is already a member.
    pub fn add(&mut self, e: E) -> bool {
        if self.store.contains(&e) {
            return false;
        }
        let parents = inquirer::find_covers_above(&self.store, &self.ordering, self.hints.as_deref(), &e);
        let children = inquirer::find_covers_below(&self.store, &self.ordering, self.hints.as_deref(), &e);
        trace!("splicing new member between {} upper and {} lower covers", parents.len(), children.len());
        self.store.insert(e.clone());
        // A parent-child edge with the new member on both sides stops being a cover
        for p in &parents {
            for c in &children {
                if self.store.has_edge(p, c) {
                    self.store.unlink(p, c);
                }
            }
        }
        for p in &parents {
            self.store.link(p, &e);
        }
        for c in &children {
            self.store.link(&e, c);
        }
        true
    }

    /// Removes `e`, promoting former grandparent pairs back to covers where
    /// `e` was their only covering route. Returns false when `e` is not a
    /// member.
    pub fn remove(&mut self, e: &E) -> bool {
        let Some(node) = self.store.get(e) else {
            return false;
        };
        let (parents, children) = (node.parents.clone(), node.children.clone());
        trace!("detaching member from {} upper and {} lower covers", parents.len(), children.len());
        for p in &parents {
            self.store.unlink(p, e);
        }
        for c in &children {
            self.store.unlink(e, c);
        }
        self.store.remove(e);
        for p in &parents {
            for c in &children {
                let routed = self
                    .store
                    .iter()
                    .any(|m| m != p && m != c && self.ordering.leq(c, m) && self.ordering.leq(m, p));
                if !routed {
                    self.store.link(p, c);
                }
            }
        }
        true
    }

    /// Immediate parents of member `e` in edge-creation order; `None` when `e`
    /// is not a member. A maximal member yields an empty list (its only parent
    /// is the synthetic top, which is never reported).
    pub fn parents(&self, e: &E) -> Option<Vec<E>> {
        self.store.get(e).map(|node| node.parents.clone())
    }

    /// Immediate children of member `e`; `None` when `e` is not a member.
    pub fn children(&self, e: &E) -> Option<Vec<E>> {
        self.store.get(e).map(|node| node.children.clone())
    }

    /// The members that would cover `e` from above were it inserted. For a
    /// member this is identical to [`parents`](Self::parents); for a
    /// non-member it is the hypothetical cover set, possibly empty but never
    /// absent.
    pub fn probe_parents(&self, e: &E) -> Vec<E> {
        match self.store.get(e) {
            Some(node) => node.parents.clone(),
            None => inquirer::find_covers_above(&self.store, &self.ordering, self.hints.as_deref(), e),
        }
    }

    /// Downward mirror of [`probe_parents`](Self::probe_parents).
    pub fn probe_children(&self, e: &E) -> Vec<E> {
        match self.store.get(e) {
            Some(node) => node.children.clone(),
            None => inquirer::find_covers_below(&self.store, &self.ordering, self.hints.as_deref(), e),
        }
    }

    /// All members strictly above `e` under the ordering, whether or not `e`
    /// is a member. Discovery order; callers needing a canonical order sort.
    pub fn ancestors(&self, e: &E) -> Vec<E> {
        inquirer::collect_upward(&self.store, &self.ordering, self.hints.as_deref(), e)
    }

    /// All members strictly below `e`, whether or not `e` is a member.
    pub fn descendants(&self, e: &E) -> Vec<E> {
        inquirer::collect_downward(&self.store, &self.ordering, self.hints.as_deref(), e)
    }

    /// Members with no member parent, in member insertion order.
    pub fn maximal_members(&self) -> Vec<E> {
        self.store.entries().filter(|(_, node)| node.parents.is_empty()).map(|(e, _)| e.clone()).collect()
    }

    /// Members with no member child, in member insertion order.
    pub fn minimal_members(&self) -> Vec<E> {
        self.store.entries().filter(|(_, node)| node.children.is_empty()).map(|(e, _)| e.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, e: &E) -> bool {
        self.store.contains(e)
    }

    /// Iterates members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.store.iter()
    }

    /// Drops every member; the set stays usable.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Sweeps the stored diagram against the ordering and reports the first
    /// structural violation. Intended for tests and for debug assertions after
    /// mutations; the sweep is brute-force over member pairs.
    pub fn validate(&self) -> Result<(), ValidationError>
    where
        E: fmt::Debug,
    {
        validate::validate(&self.store, &self.ordering)
    }

    /// Non-raising form of [`validate`](Self::validate).
    pub fn is_valid(&self) -> bool
    where
        E: fmt::Debug,
    {
        self.validate().is_ok()
    }

    /// Appends a human-readable dump of the diagram to `buf`, one line per
    /// member in insertion order.
    pub fn out(&self, buf: &mut String)
    where
        E: fmt::Display,
    {
        buf.push_str(&format!("PartiallyOrderedSet size: {} elements: {{\n", self.len()));
        for (e, node) in self.store.entries() {
            buf.push_str(&format!(
                "  {} parents: [{}] children: [{}]\n",
                e,
                node.parents.iter().join(", "),
                node.children.iter().join(", ")
            ));
        }
        buf.push('}');
    }
}
