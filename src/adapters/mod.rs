// Adapters layer: concrete implementations of the domain ports.

pub mod json_ratings;
pub mod memory;
pub mod rest;
pub mod seed;
pub mod storage;

pub use json_ratings::JsonRatingRepository;
pub use memory::InMemoryRatingRepository;
pub use rest::RestClient;
pub use seed::SeedCatalog;
pub use storage::LocalStorage;
