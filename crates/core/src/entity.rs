//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Two entities with the same id are the same record, even when every other
/// field differs (e.g. a product before and after a manual edit).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Index of the entity identified by `id`, if present.
pub fn position_by_id<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|e| e.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(u32, &'static str);

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.0
        }
    }

    #[test]
    fn finds_by_identity_only() {
        let rows = [Row(1, "a"), Row(2, "a"), Row(3, "b")];
        assert_eq!(position_by_id(&rows, &2), Some(1));
        assert_eq!(position_by_id(&rows, &9), None);
        assert_eq!(rows[2].1, "b");
    }
}
