//!
//! A dynamic partially-ordered set.
//!
//! Members are stored together with the Hasse diagram of a caller-supplied
//! partial order: every member records its immediate parents and immediate
//! children among current members, and insertion/removal incrementally repair
//! the cover relation so ancestry queries run against the reduced graph
//! instead of the transitive closure. Synthetic top and bottom sentinels
//! anchor the diagram, so boundary members need no special casing.
//!

mod inquirer;
mod ordering;
mod poset;
mod store;
mod validate;

pub use ordering::{CoverHints, PartialOrdering};
pub use poset::PartiallyOrderedSet;
pub use validate::ValidationError;
