// # State Store Implementations
//
// Tracked state is process-local; the memory store is the only backend.

pub mod memory;

pub use memory::MemoryStateStore;
