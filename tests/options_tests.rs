//! Tests for the OPTIONS capability-negotiation state machine and the
//! transport override hook.

mod tracing_util;

use picoapi::{
    ApiEnvelope, BufferEnvelope, EnvelopeCore, Inbound, MethodSet, Reply, Resource, Router, Verb,
};
use serde_json::{json, Value};
use tracing_util::TestTracing;

struct Declared(MethodSet);

impl Resource for Declared {
    fn methods(&self) -> MethodSet {
        self.0
    }

    fn call(&mut self, _req: &Inbound<'_>) -> Reply {
        Reply::ok(json!({ "ok": true }))
    }
}

fn response(envelope: &BufferEnvelope) -> Value {
    serde_json::from_str(envelope.output().expect("dispatched")).expect("valid json")
}

#[test]
fn options_lists_declared_verbs_plus_the_options_token() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(Verb::Get | Verb::Post);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"OPTIONS"}"#);
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(200));
    assert_eq!(
        response(&envelope),
        json!({ "options": ["GET", "POST", "OPTIONS"] })
    );
}

#[test]
fn options_tokens_follow_table_order() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(Verb::Delete | Verb::Patch | Verb::Put);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"OPTIONS"}"#);
    api.process(&mut envelope);
    assert_eq!(
        response(&envelope),
        json!({ "options": ["PUT", "PATCH", "DELETE", "OPTIONS"] })
    );
}

#[test]
fn options_without_declared_methods_is_405() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(MethodSet::NONE);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"OPTIONS"}"#);
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(405));
    assert_eq!(
        response(&envelope),
        json!({ "error": 405, "message": "Method Not Allowed" })
    );
}

#[test]
fn options_responses_carry_no_envelope_shell() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.set_uri_key("via");
    api.mount("/widgets", &mut widgets);

    // Even with an id and a configured echo key, capability negotiation
    // answers with the bare options document.
    let mut envelope = BufferEnvelope::new(r#"{"id":4,"$_uri":"/widgets","method":"OPTIONS"}"#);
    api.process(&mut envelope);
    assert_eq!(response(&envelope), json!({ "options": ["GET", "OPTIONS"] }));
}

#[test]
fn options_blocked_by_the_accepted_mask_is_405() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(Verb::Get | Verb::Post);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"OPTIONS"}"#);
    api.process_accepting(&mut envelope, Verb::Get | Verb::Post);
    assert_eq!(envelope.status(), Some(405));
}

/// Stand-in for a server transport: the verb and uri arrive resolved (no
/// document to parse) and capability negotiation has its own response shape,
/// like an allow-list header.
struct NativeEnvelope {
    core: EnvelopeCore,
    verb: Verb,
    uri: &'static str,
    sent: Option<u16>,
    negotiated: bool,
}

impl NativeEnvelope {
    fn new(verb: Verb, uri: &'static str) -> Self {
        Self {
            core: EnvelopeCore::default(),
            verb,
            uri,
            sent: None,
            negotiated: false,
        }
    }
}

impl ApiEnvelope for NativeEnvelope {
    fn core(&self) -> &EnvelopeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnvelopeCore {
        &mut self.core
    }

    fn parse(&mut self, _base_path: &str, _request_key: &str) -> u16 {
        let verb = self.verb;
        let uri = self.uri;
        let core = &mut self.core;
        core.verb = verb;
        core.uri = Some(uri.to_string());
        0
    }

    fn dispatch(&mut self, code: u16) {
        self.sent = Some(code);
    }

    fn send_options(&mut self) {
        self.negotiated = true;
        self.dispatch(200);
    }
}

#[test]
fn transports_can_override_the_options_send_path() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = NativeEnvelope::new(Verb::Options, "/widgets");
    api.process(&mut envelope);
    assert!(envelope.negotiated);
    assert_eq!(envelope.sent, Some(200));
    assert_eq!(
        envelope.core().out,
        json!({ "options": ["GET", "OPTIONS"] })
    );
}

#[test]
fn native_verbs_bypass_the_token_table() {
    let _tracing = TestTracing::init();
    let mut widgets = Declared(MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = NativeEnvelope::new(Verb::from(&http::Method::GET), "/widgets");
    api.process(&mut envelope);
    assert_eq!(envelope.sent, Some(200));
    assert_eq!(envelope.core().out, json!({ "ok": true }));
}
