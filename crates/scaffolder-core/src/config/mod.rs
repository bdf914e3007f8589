//! Per-user configuration and cache files

pub mod cache;

pub use cache::ListingCache;
