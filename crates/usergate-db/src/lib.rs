pub mod errors;
pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use errors::{is_unavailable, is_unique_violation};
pub use pool::{create_pool, ping, run_migrations, PoolConfig};
pub use repos::account::{AccountChanges, AccountRepo, AccountRow};
