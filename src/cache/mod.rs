pub mod manager;
pub mod store;
pub mod transport;

pub use manager::{FetchSource, Fetched, OfflineCache};
pub use store::{CacheEntry, CacheStore};
pub use transport::{NetTransport, Request, Response, Transport};
