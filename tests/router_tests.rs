//! Tests for resolution, admission policy, and the describer endpoint.
//!
//! Resources are exercised through `Router::process` with buffer envelopes,
//! the same way a serial or MQTT adapter would drive the engine.

mod tracing_util;

use picoapi::{BufferEnvelope, Inbound, MethodSet, Reply, Resource, Router, Verb};
use serde_json::{json, Value};
use tracing_util::TestTracing;

/// Answers every table verb with its own label, so tests can see which
/// mounted resource a request landed on.
struct Probe {
    label: &'static str,
    declared: MethodSet,
}

impl Probe {
    fn new(label: &'static str, declared: MethodSet) -> Self {
        Self { label, declared }
    }
}

impl Resource for Probe {
    fn methods(&self) -> MethodSet {
        self.declared
    }

    fn call(&mut self, _req: &Inbound<'_>) -> Reply {
        Reply::ok(json!({ "label": self.label }))
    }
}

fn request(uri: &str, method: &str) -> BufferEnvelope {
    BufferEnvelope::new(format!(r#"{{"$_uri":"{uri}","method":"{method}"}}"#))
}

fn response(envelope: &BufferEnvelope) -> Value {
    serde_json::from_str(envelope.output().expect("dispatched")).expect("valid json")
}

#[test]
fn resolution_is_exact_match_in_mount_order() {
    let _tracing = TestTracing::init();
    let mut widgets = Probe::new("widgets", MethodSet::of(Verb::Get));
    let mut sprockets = Probe::new("sprockets", MethodSet::of(Verb::Post));
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);
    api.mount("/sprockets", &mut sprockets);

    assert_eq!(api.route_count(), 2);
    assert_eq!(
        api.resolve("/widgets").map(|r| r.methods()),
        Some(MethodSet::of(Verb::Get))
    );
    assert_eq!(
        api.resolve("/sprockets").map(|r| r.methods()),
        Some(MethodSet::of(Verb::Post))
    );
    assert!(api.resolve("/missing").is_none());
    // A prefix of a mounted path must not resolve.
    assert!(api.resolve("/widget").is_none());
    assert!(api.resolve("/widgets/1").is_none());
}

#[test]
fn first_mount_wins_for_duplicate_paths() {
    let _tracing = TestTracing::init();
    let mut first = Probe::new("first", MethodSet::of(Verb::Get));
    let mut second = Probe::new("second", MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut first);
    api.mount("/widgets", &mut second);

    let mut envelope = request("/widgets", "GET");
    api.process(&mut envelope);
    assert_eq!(response(&envelope), json!({ "label": "first" }));
}

#[test]
fn missing_resource_is_404_with_id_echo() {
    let _tracing = TestTracing::init();
    let mut api = Router::new("/_api");
    api.set_request_key("uri");

    let mut envelope = BufferEnvelope::new(r#"{"id":5,"uri":"/widgets","method":"GET"}"#);
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(404));
    assert_eq!(
        response(&envelope),
        json!({ "id": 5, "error": 404, "message": "Not Found" })
    );
}

#[test]
fn unknown_verb_on_a_mounted_path_is_400() {
    let _tracing = TestTracing::init();
    let mut widgets = Probe::new("widgets", MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = request("/widgets", "FROB");
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(400));
    assert_eq!(
        response(&envelope),
        json!({ "error": 400, "message": "Bad Request" })
    );
}

#[test]
fn missing_resource_outranks_the_unknown_verb() {
    let _tracing = TestTracing::init();
    let mut api = Router::new("/_api");

    let mut envelope = request("/missing", "FROB");
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(404));
}

#[test]
fn verb_outside_the_accepted_mask_is_405() {
    let _tracing = TestTracing::init();
    let mut widgets = Probe::new("widgets", Verb::Get | Verb::Post);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = request("/widgets", "POST");
    api.process_accepting(&mut envelope, MethodSet::of(Verb::Get));
    assert_eq!(envelope.status(), Some(405));
    assert_eq!(
        response(&envelope),
        json!({ "error": 405, "message": "Method Not Allowed" })
    );
}

#[test]
fn admission_ignores_the_declared_set() {
    let _tracing = TestTracing::init();
    // Declares nothing, yet an accepted DELETE still reaches it: the
    // declared set drives introspection, not admission.
    let mut widgets = Probe::new("widgets", MethodSet::NONE);
    let mut api = Router::new("/_api");
    api.mount("/widgets", &mut widgets);

    let mut envelope = request("/widgets", "DELETE");
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(200));
    assert_eq!(response(&envelope), json!({ "label": "widgets" }));
}

#[test]
fn missing_uri_is_400() {
    let _tracing = TestTracing::init();
    let mut api = Router::new("/_api");

    let mut envelope = BufferEnvelope::new(r#"{"method":"GET"}"#);
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(400));
}

#[test]
fn describer_lists_every_mount_in_order() {
    let _tracing = TestTracing::init();
    let mut widgets = Probe::new("widgets", Verb::Get | Verb::Post);
    let mut silent = Probe::new("silent", MethodSet::NONE);
    let mut api = Router::new("/_api");
    api.set_describer("/__describe__");
    api.mount("/widgets", &mut widgets);
    api.mount("/silent", &mut silent);

    let mut envelope = request("/__describe__", "GET");
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(200));
    assert_eq!(
        response(&envelope),
        json!({
            "handlers": [
                { "path": "/widgets", "options": ["GET", "POST"] },
                { "path": "/silent", "options": [] },
            ]
        })
    );
}

#[test]
fn describer_answers_get_only() {
    let _tracing = TestTracing::init();
    let mut api = Router::new("/_api");
    api.set_describer("/__describe__");

    let mut envelope = request("/__describe__", "POST");
    api.process(&mut envelope);
    assert_eq!(envelope.status(), Some(404));
}

#[test]
fn mounted_path_shadows_the_describer() {
    let _tracing = TestTracing::init();
    let mut probe = Probe::new("impostor", MethodSet::of(Verb::Get));
    let mut api = Router::new("/_api");
    api.set_describer("/__describe__");
    api.mount("/__describe__", &mut probe);

    let mut envelope = request("/__describe__", "GET");
    api.process(&mut envelope);
    assert_eq!(response(&envelope), json!({ "label": "impostor" }));
}

#[test]
fn base_path_filter() {
    let api = Router::new("/_api");
    assert!(api.is_api_path("/_api/widgets"));
    assert!(api.is_api_path("/_api"));
    assert!(!api.is_api_path("/static/index.html"));
}

#[test]
fn the_default_call_refuses_every_verb() {
    let _tracing = TestTracing::init();
    struct Inert;
    impl Resource for Inert {}

    let mut inert = Inert;
    let mut api = Router::new("/_api");
    api.mount("/inert", &mut inert);

    for method in ["GET", "PUT", "POST", "PATCH", "DELETE"] {
        let mut envelope = request("/inert", method);
        api.process(&mut envelope);
        assert_eq!(envelope.status(), Some(405), "{method}");
        assert_eq!(
            response(&envelope),
            json!({ "error": 405, "message": "Method Not Allowed" })
        );
    }
}

#[test]
fn resources_keep_state_between_requests() {
    let _tracing = TestTracing::init();
    struct Counter {
        hits: u32,
    }
    impl Resource for Counter {
        fn call(&mut self, _req: &Inbound<'_>) -> Reply {
            self.hits += 1;
            Reply::ok(json!({ "hits": self.hits }))
        }
    }

    let mut counter = Counter { hits: 0 };
    let mut api = Router::new("/_api");
    api.mount("/counter", &mut counter);

    for expected in 1..=3 {
        let mut envelope = request("/counter", "GET");
        api.process(&mut envelope);
        assert_eq!(response(&envelope), json!({ "hits": expected }));
    }
}
