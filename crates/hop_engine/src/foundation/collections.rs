//! Specialized collection types

pub use slotmap::{new_key_type, Key, SlotMap};

/// Arena keyed by stable generational handles.
///
/// Entries are never reused while the arena is alive unless removed, so a
/// handle stored elsewhere (parent links, pursuit targets, cached lists)
/// stays valid for as long as the entry exists.
pub type Arena<K, T> = SlotMap<K, T>;
