//! Trending topics capture
//!
//! The browser scraper and the record store are plugged in through
//! [`TrendScraper`] and [`TrendStore`].

pub mod echo;
pub mod record;
pub mod runner;
pub mod session;
pub mod store;

pub use echo::{HttpIpEcho, IpEcho};
pub use record::{trend_name, TrendRecord, TRENDS_PER_RECORD};
pub use runner::CaptureRunner;
pub use session::{Credentials, SessionOptions, TrendScraper};
pub use store::{MemoryStore, TrendStore};
