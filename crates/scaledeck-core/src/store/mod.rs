// ── Cache Synchronizer ──
//
// In-memory collections the Accessor writes after mutations and refreshes,
// and that views read through snapshots.

pub(crate) mod collection;
mod data_store;

pub use data_store::DataStore;

/// Names one of the store's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Collection {
    Users,
    Nodes,
    PreAuthKeys,
    ApiKeys,
}
