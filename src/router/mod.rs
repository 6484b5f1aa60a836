//! # Router Module
//!
//! The router owns the dispatch configuration and the ordered registry of
//! (path, resource) bindings, and drives every inbound envelope through the
//! parse → resolve → admit → handle protocol.
//!
//! ## Overview
//!
//! - **Resolution** is an exact path match in mount order; the first match
//!   wins, later duplicates are unreachable.
//! - **Admission** checks the resolved verb against the caller-supplied
//!   accepted-method mask - not against the resource's declared set - and
//!   rejects with exactly one of 404 (no resource), 400 (unknown verb), or
//!   405 (verb not accepted), in that priority.
//! - **Introspection** is opt-in: with a describer path configured, a GET
//!   whose uri begins with it answers with every mounted path and its
//!   declared verbs.
//!
//! ## Lifecycle
//!
//! Construct once, configure once, mount every resource at startup, then only
//! call [`Router::process`]. The registry borrows each resource exclusively
//! for the router's lifetime, so the caller keeps ownership and nothing can
//! invoke a resource re-entrantly.

mod core;

pub use core::{Router, DEFAULT_REQUEST_KEY};
