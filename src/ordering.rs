/// The ordering relation a [`PartiallyOrderedSet`](crate::PartiallyOrderedSet) is built over.
///
/// `leq(a, b)` must behave as a partial order: reflexive, antisymmetric and transitive.
/// The engine never re-checks these laws; a predicate violating them leaves the diagram
/// in an unspecified (but memory-safe) state. The predicate is treated as potentially
/// expensive, so the engine avoids redundant calls where the diagram already answers.
pub trait PartialOrdering<E> {
    /// Returns true iff `a` is less than or equal to `b`.
    fn leq(&self, a: &E, b: &E) -> bool;
}

impl<E, F> PartialOrdering<E> for F
where
    F: Fn(&E, &E) -> bool,
{
    fn leq(&self, a: &E, b: &E) -> bool {
        self(a, b)
    }
}

/// Candidate generators accelerating cover location.
///
/// `parents_of(e)` enumerates elements covering `e` from above in the conceptual
/// universe, members or not; `children_of(e)` is the downward mirror. The engine
/// filters the enumeration to current members, so enumerating a superset is
/// acceptable. Every true immediate relative of `e` among current members must be
/// reachable by repeatedly applying the generator, or queries will silently miss
/// covers.
pub trait CoverHints<E> {
    fn parents_of(&self, e: &E) -> Vec<E>;
    fn children_of(&self, e: &E) -> Vec<E>;
}

/// A pair of closures acts as a hint provider: `.0` generates upward candidates,
/// `.1` downward candidates.
impl<E, P, C> CoverHints<E> for (P, C)
where
    P: Fn(&E) -> Vec<E>,
    C: Fn(&E) -> Vec<E>,
{
    fn parents_of(&self, e: &E) -> Vec<E> {
        (self.0)(e)
    }

    fn children_of(&self, e: &E) -> Vec<E> {
        (self.1)(e)
    }
}
