//! Jellyfin API surface: wire types, the upstream HTTP client, and the
//! conversions into the selection core's domain types.

pub mod client;
pub mod convert;
pub mod types;
