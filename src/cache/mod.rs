//! Caching subsystem.
//!
//! - [`ResponseCache`]: LRU + TTL cache from prompt to the
//!   [`ResponseSet`](crate::rules::ResponseSet) its lookup resolved to. Sits in
//!   front of the resolver inside [`Bot`](crate::Bot); enabled by default,
//!   opt-out via [`BotBuilder::disable_cache()`](crate::BotBuilder::disable_cache)
//!   or a zero TTL.
//!
//! - [`Clock`]: time source for expiry checks. [`SystemClock`] in production,
//!   [`ManualClock`] to simulate the passage of time.

pub mod clock;
pub mod response;

pub use clock::{Clock, ManualClock, SystemClock};
pub use response::{CacheConfig, ResponseCache};
