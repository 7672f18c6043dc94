//! Aggregate trait shared by entities that are persisted as a unit.

/// Trait for aggregate roots stored by a [`Repository`](crate::Repository).
///
/// An aggregate is a cluster of domain objects treated as a single unit of
/// persistence and consistency. Repositories use the id to key rows and
/// [`Aggregate::NAME`] to label errors.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// Identifier type.
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Display + Send + Sync;

    /// Aggregate name used in error messages, e.g. "Customer not found".
    const NAME: &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> &Self::Id;

    /// Returns true if an update of `self` applies to the `stored` row.
    ///
    /// Defaults to id equality.
    fn same_key(&self, stored: &Self) -> bool {
        self.id() == stored.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
        body: &'static str,
    }

    impl Aggregate for Note {
        type Id = u32;

        const NAME: &'static str = "Note";

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    #[test]
    fn same_key_defaults_to_id_equality() {
        let a = Note { id: 1, body: "a" };
        let b = Note { id: 1, body: "b" };
        let c = Note { id: 2, body: "a" };

        assert!(a.same_key(&b));
        assert!(!a.same_key(&c));
    }
}
