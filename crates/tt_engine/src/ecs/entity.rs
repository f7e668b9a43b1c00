//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// A generational key: once an entity is destroyed its id never
    /// resolves again, even if the slot is reused.
    pub struct EntityId;
}

/// Bookkeeping the world keeps per live entity
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntityMeta {
    /// Creation serial, used for deterministic iteration order
    pub serial: u64,
    /// Inactive entities are skipped by collision checks
    pub active: bool,
}
