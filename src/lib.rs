//! Audio track selection proxy for Jellyfin.
//!
//! Sits between clients and a Jellyfin server, passing everything through
//! except the playback endpoints: there it runs a pure selection algorithm
//! over the available audio tracks and the client's device profile, rewrites
//! the default audio stream in PlaybackInfo responses, and corrects the
//! track with a session command when a client starts playback on a
//! different stream.
//!
//! The algorithm itself lives in [`selector`] and is independent of any
//! transport.

pub mod config;
pub mod error;
pub mod handler;
pub mod jellyfin;
pub mod selector;
pub mod server;
