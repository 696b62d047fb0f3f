mod migrate;
mod time;

pub use migrate::ensure_from_older_version;
pub use time::{Duration, Expiration};
