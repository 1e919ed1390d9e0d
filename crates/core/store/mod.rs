//! In-memory keyed collections: a plain identity map and a TTL-bounded one.

pub mod clock;
pub mod expiring;
pub mod keyed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use expiring::{Entry, ExpiringSet};
pub use keyed::KeyedSet;
