//! repl-upstream — the Upstream Client (`spec.md` §4.2, §6).
//!
//! Talks to the Upstream API over a blocking `reqwest` client: the
//! Executor's phase loop is synchronous end to end (§5), so there is no
//! async runtime elsewhere in the workspace to hand a `Future` to.

mod client;
mod wire;

pub use client::{Page, UpstreamClient};
