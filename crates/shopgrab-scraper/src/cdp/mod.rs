//! Chrome DevTools Protocol backed sessions.
//!
//! Each session gets its own WebSocket connection and an isolated browser
//! context, so concurrent extractions share no cookies, cache or tabs.

mod connection;
mod page;
mod protocol;
mod session;

pub use session::CdpSessionProvider;
