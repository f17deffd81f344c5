//! Entity trait: things that keep their identity while their attributes change.
//!
//! A catalog item stays the same item across admin edits of its price or
//! title; cart lines refer to it by this identity.

pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// True when both values describe the same entity, regardless of attributes.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
