pub mod slot;

pub use slot::{FileSlot, MemorySlot, StorageSlot, DEFAULT_SLOT_NAME};
