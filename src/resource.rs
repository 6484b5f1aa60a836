//! # Resource Module
//!
//! A resource is the per-path controller a request ultimately lands on. It
//! exposes one polymorphic operation over the closed verb set - a verb the
//! implementation does not match falls through to the uniform 405 default -
//! plus a declared-capability set that drives introspection and the OPTIONS
//! response.
//!
//! The declared set is advisory: admission in the router consults only the
//! caller-supplied accepted-method mask, so a resource can be invoked for a
//! verb it never declared and answers through its own default. Both layers
//! are intentional; neither replaces the other.
//!
//! ```
//! use picoapi::{Inbound, MethodSet, Reply, Resource, Verb};
//! use serde_json::json;
//!
//! struct Widgets {
//!     count: u32,
//! }
//!
//! impl Resource for Widgets {
//!     fn methods(&self) -> MethodSet {
//!         Verb::Get | Verb::Post
//!     }
//!
//!     fn call(&mut self, req: &Inbound<'_>) -> Reply {
//!         match req.verb {
//!             Verb::Get => Reply::ok(json!({ "count": self.count })),
//!             Verb::Post => {
//!                 self.count += 1;
//!                 Reply::created(json!({ "count": self.count }))
//!             }
//!             _ => Reply::status(405),
//!         }
//!     }
//! }
//! ```

use crate::envelope::ApiEnvelope;
use crate::method::{method_tokens, MethodSet, Verb};
use crate::params::Params;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Read-only view of the request a resource is answering.
#[derive(Debug)]
pub struct Inbound<'r> {
    /// The admitted verb. Never `Unknown` or `Options` when handed to
    /// [`Resource::call`]; those are resolved before the call.
    pub verb: Verb,
    /// The resolving uri.
    pub uri: &'r str,
    /// Correlation id, if the message carried one.
    pub id: Option<u64>,
    /// Inbound payload document. `Null` for GET requests.
    pub body: &'r Value,
    /// The request's named parameters.
    pub params: &'r dyn Params,
}

/// A resource's answer: a status code and the payload to shape into the
/// response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    #[must_use]
    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    #[must_use]
    pub fn accepted(body: Value) -> Self {
        Self { status: 202, body }
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// A bodyless reply. Codes at 400 and above become the uniform error
    /// envelope on dispatch.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Value::Null,
        }
    }
}

/// A per-path controller.
pub trait Resource {
    /// The verb set this resource declares. Drives introspection and the
    /// OPTIONS response, not admission. Default: none.
    fn methods(&self) -> MethodSet {
        MethodSet::NONE
    }

    /// Answer one request. The default refuses every verb with 405, so an
    /// implementation only matches the verbs it supports.
    fn call(&mut self, req: &Inbound<'_>) -> Reply {
        let _ = req;
        Reply::status(405)
    }
}

/// One (path, resource) registry binding.
///
/// The path is assigned at mount time and never mutated. The binding owns the
/// envelope-shaping protocol: it is the only code that builds response shells
/// and the OPTIONS transition, so resources stay payload-only.
pub(crate) struct Mount<'h> {
    pub(crate) path: String,
    pub(crate) resource: &'h mut dyn Resource,
}

impl Mount<'_> {
    /// Drive one admitted request through the resource.
    ///
    /// OPTIONS short-circuits into capability negotiation: the output
    /// document is replaced by the declared token list (405 when nothing is
    /// declared) and handed to the transport's options-send path. Every other
    /// verb invokes the resource and shapes its reply - when an echo key is
    /// configured or a correlation id is present the payload nests under
    /// `data` beside them, otherwise the payload is the response root.
    pub(crate) fn handle(&mut self, envelope: &mut dyn ApiEnvelope, uri_key: Option<&str>) {
        let verb = envelope.core().verb;

        if verb == Verb::Options {
            let tokens = method_tokens(self.resource.methods(), true);
            if tokens.is_empty() {
                debug!(path = %self.path, "options refused, no declared methods");
                envelope.send(405);
                return;
            }
            envelope.core_mut().out = json!({ "options": tokens });
            if !envelope.core().dispatched {
                envelope.send_options();
                envelope.core_mut().dispatched = true;
            }
            return;
        }

        let reply = {
            let core = envelope.core();
            let req = Inbound {
                verb,
                uri: core.uri.as_deref().unwrap_or_default(),
                id: core.id,
                body: &core.body,
                params: core.params.as_ref(),
            };
            self.resource.call(&req)
        };
        debug!(path = %self.path, verb = %verb, status = reply.status, "resource replied");

        let payload = if reply.body.is_null() {
            Value::Object(Map::new())
        } else {
            reply.body
        };
        let core = envelope.core_mut();
        core.out = if uri_key.is_some() || core.id.is_some() {
            let mut root = Map::new();
            if let Some(key) = uri_key {
                root.insert(key.to_string(), Value::from(self.path.as_str()));
            }
            if let Some(id) = core.id {
                root.insert("id".to_string(), Value::from(id));
            }
            root.insert("data".to_string(), payload);
            Value::Object(root)
        } else {
            payload
        };
        envelope.send(reply.status);
    }

    /// One introspection entry: the path and the declared token list, without
    /// the appended "OPTIONS" of a negotiation response.
    pub(crate) fn describe(&self) -> Value {
        json!({
            "path": self.path,
            "options": method_tokens(self.resource.methods(), false),
        })
    }
}
