//!
//! Brute-force structural validation of the stored diagram
//!

use crate::ordering::PartialOrdering;
use crate::store::NodeStore;
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// A structural invariant violated by the stored diagram. Carries rendered
/// copies of the offending elements; a set reporting one of these is
/// considered poisoned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("edge endpoint {0} is not a member")]
    DanglingEdge(String),

    #[error("{0} is recorded as its own relative")]
    SelfEdge(String),

    #[error("edge {parent} -> {child} is recorded more than once")]
    DuplicateEdge { parent: String, child: String },

    #[error("edge {parent} -> {child} contradicts the ordering")]
    SpuriousEdge { parent: String, child: String },

    #[error("edge {parent} -> {child} is missing its mirror entry")]
    AsymmetricEdge { parent: String, child: String },

    #[error("edge {parent} -> {child} is not a cover: {via} lies between")]
    NonMinimalCover { parent: String, child: String, via: String },

    #[error("{lower} precedes {upper} but no cover path connects them")]
    MissedCover { lower: String, upper: String },

    #[error("{0} lost its sentinel attachment")]
    OrphanNode(String),

    #[error("{0} is attached to a sentinel it no longer belongs to")]
    StaleRosterEntry(String),

    #[error("{0} is attached to a sentinel more than once")]
    DuplicateRosterEntry(String),
}

/// Sweeps every node and every ordered member pair, reporting the first
/// violation found. Quadratic in the member count; meant for tests and debug
/// assertions, not hot paths.
pub(crate) fn validate<E, O>(store: &NodeStore<E>, ordering: &O) -> Result<(), ValidationError>
where
    E: Eq + Hash + Clone + Debug,
    O: PartialOrdering<E>,
{
    check_edges(store, ordering)?;
    check_completeness(store, ordering)?;
    check_rosters(store)?;
    Ok(())
}

fn check_edges<E, O>(store: &NodeStore<E>, ordering: &O) -> Result<(), ValidationError>
where
    E: Eq + Hash + Clone + Debug,
    O: PartialOrdering<E>,
{
    for (e, node) in store.entries() {
        for p in &node.parents {
            if p == e {
                return Err(ValidationError::SelfEdge(render(e)));
            }
            let Some(parent_node) = store.get(p) else {
                return Err(ValidationError::DanglingEdge(render(p)));
            };
            if node.parents.iter().filter(|x| *x == p).count() > 1 {
                return Err(ValidationError::DuplicateEdge { parent: render(p), child: render(e) });
            }
            if !ordering.leq(e, p) {
                return Err(ValidationError::SpuriousEdge { parent: render(p), child: render(e) });
            }
            if !parent_node.children.contains(e) {
                return Err(ValidationError::AsymmetricEdge { parent: render(p), child: render(e) });
            }
            if let Some(via) = store.iter().find(|&m| m != e && m != p && ordering.leq(e, m) && ordering.leq(m, p)) {
                return Err(ValidationError::NonMinimalCover {
                    parent: render(p),
                    child: render(e),
                    via: render(via),
                });
            }
        }
        for c in &node.children {
            if c == e {
                return Err(ValidationError::SelfEdge(render(e)));
            }
            let Some(child_node) = store.get(c) else {
                return Err(ValidationError::DanglingEdge(render(c)));
            };
            if node.children.iter().filter(|x| *x == c).count() > 1 {
                return Err(ValidationError::DuplicateEdge { parent: render(e), child: render(c) });
            }
            if !ordering.leq(c, e) {
                return Err(ValidationError::SpuriousEdge { parent: render(e), child: render(c) });
            }
            if !child_node.parents.contains(e) {
                return Err(ValidationError::AsymmetricEdge { parent: render(e), child: render(c) });
            }
        }
    }
    Ok(())
}

fn check_completeness<E, O>(store: &NodeStore<E>, ordering: &O) -> Result<(), ValidationError>
where
    E: Eq + Hash + Clone + Debug,
    O: PartialOrdering<E>,
{
    for a in store.iter() {
        for b in store.iter() {
            if a == b || !ordering.leq(a, b) {
                continue;
            }
            if !reaches_down(store, b, a) {
                return Err(ValidationError::MissedCover { lower: render(a), upper: render(b) });
            }
        }
    }
    Ok(())
}

/// Whether `target` is reachable from `from` along parent-to-child edges.
fn reaches_down<'a, E: Eq + Hash + Clone>(store: &'a NodeStore<E>, from: &E, target: &E) -> bool {
    let mut visited: HashSet<&'a E> = HashSet::new();
    let mut queue: VecDeque<&'a E> = store.node(from).children.iter().collect();
    while let Some(current) = queue.pop_front() {
        if current == target {
            return true;
        }
        if visited.insert(current) {
            queue.extend(store.node(current).children.iter());
        }
    }
    false
}

fn check_rosters<E>(store: &NodeStore<E>) -> Result<(), ValidationError>
where
    E: Eq + Hash + Clone + Debug,
{
    for (roster, empty_side) in [
        (store.top_children(), RosterSide::Parents),
        (store.bottom_parents(), RosterSide::Children),
    ] {
        for entry in roster {
            let Some(node) = store.get(entry) else {
                return Err(ValidationError::StaleRosterEntry(render(entry)));
            };
            let edges = match empty_side {
                RosterSide::Parents => &node.parents,
                RosterSide::Children => &node.children,
            };
            if !edges.is_empty() {
                return Err(ValidationError::StaleRosterEntry(render(entry)));
            }
            if roster.iter().filter(|x| *x == entry).count() > 1 {
                return Err(ValidationError::DuplicateRosterEntry(render(entry)));
            }
        }
    }
    for (e, node) in store.entries() {
        if node.parents.is_empty() && !store.top_children().contains(e) {
            return Err(ValidationError::OrphanNode(render(e)));
        }
        if node.children.is_empty() && !store.bottom_parents().contains(e) {
            return Err(ValidationError::OrphanNode(render(e)));
        }
    }
    Ok(())
}

enum RosterSide {
    Parents,
    Children,
}

fn render<E: Debug>(e: &E) -> String {
    format!("{e:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lte(a: &u32, b: &u32) -> bool {
        a <= b
    }

    #[test]
    fn comparable_members_without_a_path_are_reported() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(1);
        store.insert(2);
        let err = validate(&store, &lte).unwrap_err();
        assert!(matches!(err, ValidationError::MissedCover { .. }));
    }

    #[test]
    fn an_edge_against_the_ordering_is_spurious() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(1);
        store.insert(2);
        store.link(&1, &2);
        let err = validate(&store, &lte).unwrap_err();
        assert!(matches!(err, ValidationError::SpuriousEdge { .. }));
    }

    #[test]
    fn a_skipped_middle_member_breaks_cover_minimality() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(1);
        store.insert(2);
        store.insert(3);
        store.link(&3, &2);
        store.link(&2, &1);
        store.link(&3, &1);
        let err = validate(&store, &lte).unwrap_err();
        assert!(matches!(err, ValidationError::NonMinimalCover { .. }));
    }

    #[test]
    fn a_one_sided_edge_is_asymmetric() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(1);
        store.insert(2);
        store.link(&2, &1);
        store.node_mut(&1).parents.pop();
        let err = validate(&store, &lte).unwrap_err();
        assert!(matches!(err, ValidationError::AsymmetricEdge { .. }));
    }

    #[test]
    fn a_desynchronized_roster_orphans_its_member() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(5);
        store.top_children_mut().clear();
        let err = validate(&store, &lte).unwrap_err();
        assert!(matches!(err, ValidationError::OrphanNode(_)));
    }

    #[test]
    fn a_well_formed_chain_passes() {
        let mut store: NodeStore<u32> = NodeStore::new();
        store.insert(1);
        store.insert(2);
        store.insert(3);
        store.link(&3, &2);
        store.link(&2, &1);
        validate(&store, &lte).unwrap();
    }
}
