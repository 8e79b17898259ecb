// # Cache
//
// `MemoryCacheStore` is the in-process `CacheStore`; `CacheAdapter` layers
// the get-or-compute semantics over any store.

pub mod adapter;
pub mod memory;

pub use adapter::CacheAdapter;
pub use memory::MemoryCacheStore;
