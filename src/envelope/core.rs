use crate::limits::DocumentLimits;
use crate::method::{verb_from_token, Verb};
use crate::params::{JsonParams, NoParams, Params};
use crate::status::{status_text, UNSPECIFIED_CONDITION};
use serde_json::{Map, Value};

/// Transport-independent envelope state.
///
/// Populated by the adapter's `parse`, mutated by the handler's reply
/// shaping, serialized by the adapter's `dispatch`.
#[derive(Debug)]
pub struct EnvelopeCore {
    /// Resolved verb, `Unknown` until parse succeeds.
    pub verb: Verb,
    /// Resolved uri. Absent or empty resolves to a 400.
    pub uri: Option<String>,
    /// Correlation id, echoed back in shaped and error responses if present.
    pub id: Option<u64>,
    /// Inbound payload document. Stays `Null` for GET requests.
    pub body: Value,
    /// The request's parameter accessor, exclusively owned.
    pub params: Box<dyn Params>,
    /// Outbound document, serialized at dispatch.
    pub out: Value,
    /// One-shot dispatch guard.
    pub dispatched: bool,
    /// Deserialization diagnostic. Logged locally, never sent to the client.
    pub parse_error: Option<String>,
}

impl Default for EnvelopeCore {
    fn default() -> Self {
        Self {
            verb: Verb::Unknown,
            uri: None,
            id: None,
            body: Value::Null,
            params: Box::new(NoParams),
            out: Value::Object(Map::new()),
            dispatched: false,
            parse_error: None,
        }
    }
}

/// The transport contract driven by [`Router::process`](crate::router::Router::process).
pub trait ApiEnvelope {
    fn core(&self) -> &EnvelopeCore;

    fn core_mut(&mut self) -> &mut EnvelopeCore;

    /// Deserialize the inbound message and resolve verb, uri, correlation id
    /// and params. Returns 0 on success, a status code on failure; a failure
    /// should leave a diagnostic in [`EnvelopeCore::parse_error`].
    fn parse(&mut self, base_path: &str, request_key: &str) -> u16;

    /// Serialize the output document to the transport's sink. `code` is
    /// attached as a status indicator where the transport has the concept.
    fn dispatch(&mut self, code: u16);

    /// Capability-negotiation dispatch. Transports needing a distinct
    /// response shape (an allow-list header, say) override this; the default
    /// is an ordinary 200 dispatch of the options document.
    fn send_options(&mut self) {
        self.dispatch(200);
    }

    /// Complete the envelope with `code`. Codes below 400 dispatch the output
    /// document as-is; 400 and above replace it with the uniform error
    /// envelope. A second call after dispatch has no effect.
    fn send(&mut self, code: u16) {
        if self.core().dispatched {
            return;
        }
        if code < 400 {
            self.dispatch(code);
        } else {
            self.fail(code, true);
        }
        self.core_mut().dispatched = true;
    }

    /// Replace the output document with the error envelope for `code`:
    /// `{id?, error, message}`, message drawn from the status table. With
    /// `complete` set the envelope is dispatched immediately.
    fn fail(&mut self, code: u16, complete: bool) {
        {
            let core = self.core_mut();
            let mut root = Map::new();
            if code != 0 {
                if let Some(id) = core.id {
                    root.insert("id".to_string(), Value::from(id));
                }
                root.insert("error".to_string(), Value::from(code));
                root.insert(
                    "message".to_string(),
                    Value::from(status_text(code).unwrap_or(UNSPECIFIED_CONDITION)),
                );
            }
            core.out = Value::Object(root);
        }
        if complete {
            self.dispatch(code);
        }
    }
}

/// Parse one JSON-object message frame into `core`.
///
/// This is the shared deserialization path for transports that carry the uri
/// inside the document (buffer, stream): the frame must be a JSON object with
/// an optional integer `id`, the uri under `request_key`, the verb token
/// under `method`, and optional `body`/`params` objects. In compact mode a
/// single `U` field formatted `"<METHOD>|<uri>"` stands in for the verb and
/// uri, and the body and params keys shrink to `B` and `P`.
///
/// GET requests carry no payload; a `body` field on a GET is ignored.
pub(crate) fn parse_json_frame(
    core: &mut EnvelopeCore,
    frame: &[u8],
    request_key: &str,
    compact: bool,
    limits: DocumentLimits,
) -> u16 {
    if frame.len() > limits.max_input {
        core.parse_error = Some(format!(
            "input document is {} bytes, ceiling is {}",
            frame.len(),
            limits.max_input
        ));
        return 400;
    }

    let doc: Value = match serde_json::from_slice(frame) {
        Ok(doc) => doc,
        Err(err) => {
            core.parse_error = Some(err.to_string());
            return 400;
        }
    };
    let Some(root) = doc.as_object() else {
        core.parse_error = Some("input is not a JSON object".to_string());
        return 400;
    };

    core.id = root.get("id").and_then(Value::as_u64);

    let (body_key, params_key) = if compact { ("B", "P") } else { ("body", "params") };
    if compact {
        let tagged = root.get("U").and_then(Value::as_str).unwrap_or("");
        if let Some((token, uri)) = tagged.split_once('|') {
            core.verb = verb_from_token(token);
            if !uri.is_empty() {
                core.uri = Some(uri.to_string());
            }
        }
    } else {
        core.uri = root
            .get(request_key)
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(token) = root.get("method").and_then(Value::as_str) {
            core.verb = verb_from_token(token);
        }
    }

    if core.verb != Verb::Get {
        if let Some(body) = root.get(body_key) {
            core.body = body.clone();
        }
    }

    core.params = Box::new(JsonParams::from_value(root.get(params_key)));
    core.out = Value::Object(Map::new());
    0
}
