//!
//! Cover location and diagram traversal
//!

use crate::ordering::{CoverHints, PartialOrdering};
use crate::store::NodeStore;
use itertools::Itertools;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Locates the immediate parents a non-member `e` would acquire on insertion:
/// the minimal members lying strictly above `e`. With hints available the walk
/// ascends the conceptual universe from `e`; otherwise it descends the diagram
/// from the top sentinel. Both modes return the same set.
pub(crate) fn find_covers_above<E, O>(
    store: &NodeStore<E>,
    ordering: &O,
    hints: Option<&dyn CoverHints<E>>,
    e: &E,
) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    match hints {
        Some(hints) => hinted_covers_above(store, ordering, hints, e),
        None => diagram_covers_above(store, ordering, e),
    }
}

/// Downward mirror of [`find_covers_above`]: the maximal members strictly below `e`.
pub(crate) fn find_covers_below<E, O>(
    store: &NodeStore<E>,
    ordering: &O,
    hints: Option<&dyn CoverHints<E>>,
    e: &E,
) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    match hints {
        Some(hints) => hinted_covers_below(store, ordering, hints, e),
        None => diagram_covers_below(store, ordering, e),
    }
}

fn diagram_covers_above<E, O>(store: &NodeStore<E>, ordering: &O, e: &E) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let mut covers = Vec::new();
    let mut visited: HashSet<E> = HashSet::new();
    let mut queue: VecDeque<E> = store.top_children().iter().cloned().collect();
    while let Some(candidate) = queue.pop_front() {
        if !visited.insert(candidate.clone()) {
            continue;
        }
        // Nothing below a member that is not above `e` can be above `e` either
        if !ordering.leq(e, &candidate) {
            continue;
        }
        // `candidate` lies above `e`; it covers `e` unless one of its children does too
        let below = store.node(&candidate).children.iter().filter(|&c| ordering.leq(e, c)).cloned().collect_vec();
        if below.is_empty() {
            covers.push(candidate);
        } else {
            queue.extend(below);
        }
    }
    covers
}

fn diagram_covers_below<E, O>(store: &NodeStore<E>, ordering: &O, e: &E) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let mut covers = Vec::new();
    let mut visited: HashSet<E> = HashSet::new();
    let mut queue: VecDeque<E> = store.bottom_parents().iter().cloned().collect();
    while let Some(candidate) = queue.pop_front() {
        if !visited.insert(candidate.clone()) {
            continue;
        }
        if !ordering.leq(&candidate, e) {
            continue;
        }
        let above = store.node(&candidate).parents.iter().filter(|&p| ordering.leq(p, e)).cloned().collect_vec();
        if above.is_empty() {
            covers.push(candidate);
        } else {
            queue.extend(above);
        }
    }
    covers
}

fn hinted_covers_above<E, O>(store: &NodeStore<E>, ordering: &O, hints: &dyn CoverHints<E>, e: &E) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let mut found = Vec::new();
    let mut visited: HashSet<E> = HashSet::new();
    let mut queue: VecDeque<E> = hints.parents_of(e).into();
    while let Some(candidate) = queue.pop_front() {
        if !visited.insert(candidate.clone()) {
            continue;
        }
        // Generators may echo the probe or stray outside its up-set; filter both
        if candidate == *e || !ordering.leq(e, &candidate) {
            continue;
        }
        if store.contains(&candidate) {
            found.push(candidate);
        } else {
            queue.extend(hints.parents_of(&candidate));
        }
    }
    retain_minimal(ordering, found)
}

fn hinted_covers_below<E, O>(store: &NodeStore<E>, ordering: &O, hints: &dyn CoverHints<E>, e: &E) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let mut found = Vec::new();
    let mut visited: HashSet<E> = HashSet::new();
    let mut queue: VecDeque<E> = hints.children_of(e).into();
    while let Some(candidate) = queue.pop_front() {
        if !visited.insert(candidate.clone()) {
            continue;
        }
        if candidate == *e || !ordering.leq(&candidate, e) {
            continue;
        }
        if store.contains(&candidate) {
            found.push(candidate);
        } else {
            queue.extend(hints.children_of(&candidate));
        }
    }
    retain_maximal(ordering, found)
}

/// Distinct hint chains can surface members at different heights; only the
/// minimal ones cover the probe from above.
fn retain_minimal<E, O>(ordering: &O, candidates: Vec<E>) -> Vec<E>
where
    E: Eq,
    O: PartialOrdering<E>,
{
    let keep: Vec<bool> =
        candidates.iter().map(|p| !candidates.iter().any(|q| q != p && ordering.leq(q, p))).collect();
    candidates.into_iter().zip(keep).filter_map(|(c, k)| k.then_some(c)).collect()
}

fn retain_maximal<E, O>(ordering: &O, candidates: Vec<E>) -> Vec<E>
where
    E: Eq,
    O: PartialOrdering<E>,
{
    let keep: Vec<bool> =
        candidates.iter().map(|c| !candidates.iter().any(|q| q != c && ordering.leq(c, q))).collect();
    candidates.into_iter().zip(keep).filter_map(|(c, k)| k.then_some(c)).collect()
}

/// All members strictly above `e`, whether or not `e` is a member, in
/// breadth-first discovery order starting from its (possibly hypothetical)
/// upward covers.
pub(crate) fn collect_upward<E, O>(
    store: &NodeStore<E>,
    ordering: &O,
    hints: Option<&dyn CoverHints<E>>,
    e: &E,
) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let frontier = match store.get(e) {
        Some(node) => node.parents.clone(),
        None => find_covers_above(store, ordering, hints, e),
    };
    let mut visited: HashSet<E> = frontier.iter().cloned().collect();
    let mut queue: VecDeque<E> = frontier.into();
    let mut collected = Vec::new();
    while let Some(current) = queue.pop_front() {
        for parent in &store.node(&current).parents {
            if visited.insert(parent.clone()) {
                queue.push_back(parent.clone());
            }
        }
        collected.push(current);
    }
    collected
}

/// Downward mirror of [`collect_upward`].
pub(crate) fn collect_downward<E, O>(
    store: &NodeStore<E>,
    ordering: &O,
    hints: Option<&dyn CoverHints<E>>,
    e: &E,
) -> Vec<E>
where
    E: Eq + Hash + Clone,
    O: PartialOrdering<E>,
{
    let frontier = match store.get(e) {
        Some(node) => node.children.clone(),
        None => find_covers_below(store, ordering, hints, e),
    };
    let mut visited: HashSet<E> = frontier.iter().cloned().collect();
    let mut queue: VecDeque<E> = frontier.into();
    let mut collected = Vec::new();
    while let Some(current) = queue.pop_front() {
        for child in &store.node(&current).children {
            if visited.insert(child.clone()) {
                queue.push_back(child.clone());
            }
        }
        collected.push(current);
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subset_order(a: &&str, b: &&str) -> bool {
        a.chars().all(|ch| b.contains(ch))
    }

    /// abcd -> ab -> "" built by hand.
    fn chain_store() -> NodeStore<&'static str> {
        let mut store = NodeStore::new();
        store.insert("");
        store.insert("abcd");
        store.insert("ab");
        store.link(&"abcd", &"ab");
        store.link(&"ab", &"");
        store
    }

    #[test]
    fn descent_stops_at_the_lowest_member_above_the_probe() {
        let store = chain_store();
        assert_eq!(diagram_covers_above(&store, &subset_order, &"bcd"), vec!["abcd"]);
        assert_eq!(diagram_covers_below(&store, &subset_order, &"bcd"), vec![""]);
    }

    #[test]
    fn probe_above_everything_has_no_upward_covers() {
        let store = chain_store();
        assert_eq!(diagram_covers_above(&store, &subset_order, &"abcdz"), Vec::<&str>::new());
        assert_eq!(diagram_covers_below(&store, &subset_order, &"abcdz"), vec!["abcd"]);
    }

    #[test]
    fn dominated_candidates_are_dropped() {
        let survivors = retain_minimal(&subset_order, vec!["abcd", "ab", "cd"]);
        assert_eq!(survivors, vec!["ab", "cd"]);
        let survivors = retain_maximal(&subset_order, vec!["ab", "abcd", "cd"]);
        assert_eq!(survivors, vec!["abcd"]);
    }

    #[test]
    fn upward_collection_walks_the_whole_up_set() {
        let store = chain_store();
        let mut above = collect_upward(&store, &subset_order, None, &"");
        above.sort();
        assert_eq!(above, vec!["ab", "abcd"]);
    }
}
