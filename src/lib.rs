//! # picoapi
//!
//! **picoapi** is a transport-agnostic JSON request-dispatch layer for
//! resource-constrained devices: one router, a handful of mounted resources,
//! bounded JSON documents in and out, and a fixed error taxonomy - whether
//! the message arrived over HTTP, a serial line, MQTT, or a websocket.
//!
//! ## Overview
//!
//! An inbound message becomes an envelope. The router parses it, resolves
//! the target resource by exact path match, checks the verb against the
//! caller's accepted-method policy, and hands the request to the resource.
//! The resource's reply is shaped into a uniform response envelope and
//! serialized back through the transport. Every failure terminates in a
//! well-formed error document (`{id?, error, message}`); nothing in the
//! dispatch path can take the process down.
//!
//! ## Architecture
//!
//! - **[`router`]** - resolution, admission policy, and the optional
//!   introspection endpoint
//! - **[`resource`]** - the per-path controller trait, its reply type, and
//!   response shaping
//! - **[`envelope`]** - the transport contract plus the buffer and stream
//!   reference adapters
//! - **[`params`]** - uniform named-parameter access over JSON objects and
//!   query strings
//! - **[`method`] / [`status`]** - the closed verb and status lookup tables
//! - **[`limits`]** - the bounded-document ceilings
//! - **[`typed`]** - serde-backed payload and parameter extraction
//!
//! ## Quick Start
//!
//! ```
//! use picoapi::{BufferEnvelope, Inbound, MethodSet, Reply, Resource, Router, Verb};
//! use serde_json::json;
//!
//! struct Widgets;
//!
//! impl Resource for Widgets {
//!     fn methods(&self) -> MethodSet {
//!         MethodSet::of(Verb::Get)
//!     }
//!
//!     fn call(&mut self, req: &Inbound<'_>) -> Reply {
//!         match req.verb {
//!             Verb::Get => Reply::ok(json!({ "count": 3 })),
//!             _ => Reply::status(405),
//!         }
//!     }
//! }
//!
//! let mut widgets = Widgets;
//! let mut api = Router::new("/_api");
//! api.set_describer("/__describe__");
//! api.mount("/widgets", &mut widgets);
//!
//! // A raw in-memory message; the same router serves any transport that
//! // implements the envelope contract.
//! let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"GET"}"#);
//! api.process(&mut envelope);
//! assert_eq!(envelope.status(), Some(200));
//! ```
//!
//! ## Runtime Considerations
//!
//! Dispatch is single-threaded and strictly synchronous: one message runs to
//! its terminal dispatch on the calling thread, with no queue and no
//! suspension point. The router borrows every resource exclusively, so
//! re-entrant invocation is a compile error rather than a runtime hazard.
//! Input and output documents are capped by [`limits::DocumentLimits`] -
//! oversize input is a 400, oversize output is handled per transport. These
//! are embedded-memory constraints, not defects.

pub mod envelope;
pub mod limits;
pub mod method;
pub mod params;
pub mod resource;
pub mod router;
pub mod status;
pub mod typed;

pub use envelope::{ApiEnvelope, BufferEnvelope, EnvelopeCore, StreamEnvelope};
pub use limits::DocumentLimits;
pub use method::{MethodSet, Verb};
pub use params::{JsonParams, NoParams, Params, QueryParams};
pub use resource::{Inbound, Reply, Resource};
pub use router::{Router, DEFAULT_REQUEST_KEY};
