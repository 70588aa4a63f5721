pub mod clock;
pub mod file_store;
pub mod http_api;
pub mod jwt;
pub mod memory_store;
pub mod record;

pub use clock::SystemClock;
pub use file_store::FileSessionStorage;
pub use http_api::{HttpAuthApi, DEFAULT_API_PREFIX};
pub use jwt::JwtExpiryChecker;
pub use memory_store::MemorySessionStorage;
