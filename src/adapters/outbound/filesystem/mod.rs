/// Filesystem adapters for the cache and report output
mod file_cache_store;
mod file_writer;

pub use file_cache_store::FileSystemCacheStore;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
