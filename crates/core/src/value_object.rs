//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. `Money`, `Percent` and a cart line key are value objects;
//! a catalog item is an entity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value (`price.times(2)` returns a new `Money`).
///
/// ```ignore
/// let a = Money::new(Decimal::ONE);
/// let b = Money::new(Decimal::ONE);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
