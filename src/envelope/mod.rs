//! # Envelope Module
//!
//! The envelope is the transport-agnostic request/response pair the dispatch
//! engine operates on. It owns one bounded input document and one bounded
//! output document, the correlation id, the resolved verb and uri, and the
//! request's [`Params`](crate::params::Params) accessor.
//!
//! ## Contract
//!
//! A transport adapter implements [`ApiEnvelope`] by supplying:
//!
//! - `parse` - deserialize the inbound message, resolve verb/uri/id, build
//!   the params accessor; return a status code (0 on success)
//! - `dispatch` - serialize the output document to the transport's sink,
//!   attaching the status code where the transport has the concept
//! - `send_options` - optionally, a distinct response shape for capability
//!   negotiation (the default falls through to an ordinary 200 dispatch)
//!
//! The trait provides `send` on top: a one-shot guard that dispatches
//! ordinary responses below 400 and builds the uniform error envelope at 400
//! and above. Once an envelope has dispatched, further sends are no-ops.
//!
//! ## Lifecycle
//!
//! One envelope per inbound message: constructed by the adapter, driven
//! through exactly one parse → handle → dispatch cycle by
//! [`Router::process`](crate::router::Router::process), then dropped.
//!
//! Two reference adapters ship with the crate: [`BufferEnvelope`] for
//! in-memory message buffers and [`StreamEnvelope`] for assembled frames
//! answered over an [`io::Write`](std::io::Write) sink.

mod buffer;
mod core;
mod stream;

pub use buffer::BufferEnvelope;
pub use core::{ApiEnvelope, EnvelopeCore};
pub use stream::StreamEnvelope;
