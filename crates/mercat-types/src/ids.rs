//! Type-safe identifier wrappers and the allocator that hands them out.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are sequential
//! `u64` values issued by an [`IdAllocator`] owned by the collection that
//! stores the entity, so two runs built from the same scenario produce the
//! same identifiers.

use core::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Return the inner numeric value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an industry (a producer).
    IndustryId
}

define_id! {
    /// Unique identifier for a person (a worker and consumer).
    PersonId
}

define_id! {
    /// Unique identifier for a population segment.
    SegmentId
}

define_id! {
    /// Unique identifier for a resource or product.
    ResourceId
}

define_id! {
    /// Unique identifier for a problem (a population need).
    ProblemId
}

/// Sequential allocator for one typed ID space.
///
/// The first ID handed out is `1`. The allocator never reuses an ID and
/// stops issuing before its counter would wrap around.
#[derive(Debug, Clone)]
pub struct IdAllocator<T> {
    /// The next raw value to issue.
    next: u64,
    /// Ties the allocator to one ID type.
    _marker: PhantomData<fn() -> T>,
}

impl<T: From<u64>> IdAllocator<T> {
    /// Create an allocator whose first ID is `1`.
    pub const fn new() -> Self {
        Self {
            next: 1,
            _marker: PhantomData,
        }
    }

    /// Hand out the next ID, or `None` once the ID space is exhausted.
    pub fn allocate(&mut self) -> Option<T> {
        let id = self.next;
        self.next = self.next.checked_add(1)?;
        Some(T::from(id))
    }

    /// Return how many IDs have been issued so far.
    pub const fn issued(&self) -> u64 {
        self.next.saturating_sub(1)
    }
}

impl<T: From<u64>> Default for IdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_starts_at_one_and_increments() {
        let mut ids: IdAllocator<PersonId> = IdAllocator::new();
        assert_eq!(ids.allocate(), Some(PersonId(1)));
        assert_eq!(ids.allocate(), Some(PersonId(2)));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn allocators_are_independent() {
        let mut people: IdAllocator<PersonId> = IdAllocator::new();
        let mut industries: IdAllocator<IndustryId> = IdAllocator::new();
        let _ = people.allocate();
        let _ = people.allocate();
        assert_eq!(industries.allocate(), Some(IndustryId(1)));
    }

    #[test]
    fn allocator_refuses_to_wrap() {
        let mut ids: IdAllocator<ResourceId> = IdAllocator {
            next: u64::MAX,
            _marker: PhantomData,
        };
        assert_eq!(ids.allocate(), None);
    }

    #[test]
    fn id_display_is_prefixed() {
        assert_eq!(ProblemId(7).to_string(), "#7");
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = IndustryId(42);
        let json = serde_json::to_string(&original).unwrap_or_default();
        let restored: Result<IndustryId, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok(), Some(original));
    }
}
