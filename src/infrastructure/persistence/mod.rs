pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileLocalStorage;
pub use memory_storage::InMemoryLocalStorage;
