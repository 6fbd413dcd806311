//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are the same thing. In this workspace that covers
/// product codes, line items and availability results. To "modify" one,
/// build a new one.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: loggable in traces and assertions
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
