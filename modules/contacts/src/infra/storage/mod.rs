pub mod loader;
pub mod memory_repo;

pub use loader::{LoadError, load_dataset, parse_dataset};
pub use memory_repo::InMemoryContactsRepository;
