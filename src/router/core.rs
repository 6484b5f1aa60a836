use crate::envelope::ApiEnvelope;
use crate::method::{MethodSet, Verb};
use crate::resource::{Mount, Resource};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Default name of the input field carrying the uri, for transports that
/// cannot supply it natively.
pub const DEFAULT_REQUEST_KEY: &str = "$_uri";

/// The dispatch engine: configuration plus the ordered resource registry.
///
/// Configuration is set through the builder-style setters before serving
/// traffic and never changes afterwards. The registry holds non-owning
/// exclusive borrows - the caller owns each resource for the process
/// duration.
///
/// ```
/// use picoapi::{ApiEnvelope, BufferEnvelope, Inbound, Reply, Resource, Router, Verb};
/// use serde_json::json;
///
/// struct Widgets;
///
/// impl Resource for Widgets {
///     fn call(&mut self, req: &Inbound<'_>) -> Reply {
///         match req.verb {
///             Verb::Get => Reply::ok(json!({ "count": 3 })),
///             _ => Reply::status(405),
///         }
///     }
/// }
///
/// let mut widgets = Widgets;
/// let mut api = Router::new("/_api");
/// api.mount("/widgets", &mut widgets);
///
/// let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"GET"}"#);
/// api.process(&mut envelope);
/// assert_eq!(envelope.status(), Some(200));
/// assert_eq!(envelope.output(), Some(r#"{"count":3}"#));
/// ```
pub struct Router<'h> {
    base_path: String,
    request_key: String,
    uri_key: Option<String>,
    describer: Option<String>,
    mounts: Vec<Mount<'h>>,
}

impl<'h> Router<'h> {
    /// A router mounted at `base_path` (for example `"/_api"`), with the
    /// default request key, no uri echo, and no describer.
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            request_key: DEFAULT_REQUEST_KEY.to_string(),
            uri_key: None,
            describer: None,
            mounts: Vec::new(),
        }
    }

    /// The base path handed to every envelope's parse.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Name of the input field carrying the uri, for transports where the
    /// message itself names its target (serial, MQTT, websockets).
    #[must_use]
    pub fn request_key(&self) -> &str {
        &self.request_key
    }

    /// Replace the request key. Configure before serving traffic.
    pub fn set_request_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.request_key = key.into();
        self
    }

    /// The configured uri echo key, if any.
    #[must_use]
    pub fn uri_key(&self) -> Option<&str> {
        self.uri_key.as_deref()
    }

    /// Echo the resolving path into every shaped response under `key`.
    pub fn set_uri_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.uri_key = Some(key.into());
        self
    }

    /// The configured describer path, if any.
    #[must_use]
    pub fn describer(&self) -> Option<&str> {
        self.describer.as_deref()
    }

    /// Enable the GET-only introspection endpoint at `path`.
    pub fn set_describer(&mut self, path: impl Into<String>) -> &mut Self {
        self.describer = Some(path.into());
        self
    }

    /// Number of mounted resources.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.mounts.len()
    }

    /// Whether `url` falls under the router's base path - the filter hook for
    /// server adapters deciding which requests to hand over.
    #[must_use]
    pub fn is_api_path(&self, url: &str) -> bool {
        url.starts_with(&self.base_path)
    }

    /// Bind `resource` to `path`.
    ///
    /// Paths are not validated beyond being non-empty. Mounting a duplicate
    /// path is legal but the later binding is unreachable: resolution stops
    /// at the first match in mount order.
    pub fn mount(&mut self, path: impl Into<String>, resource: &'h mut dyn Resource) {
        let path = path.into();
        if path.is_empty() {
            warn!("refusing to mount an empty path");
            return;
        }
        info!(path = %path, total_routes = self.mounts.len() + 1, "resource mounted");
        self.mounts.push(Mount { path, resource });
    }

    /// The resource bound to `path`, first match in mount order.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&dyn Resource> {
        self.mounts
            .iter()
            .find(|mount| mount.path == path)
            .map(|mount| &*mount.resource as &dyn Resource)
    }

    /// Process one envelope, accepting every verb.
    pub fn process(&mut self, envelope: &mut dyn ApiEnvelope) {
        self.process_accepting(envelope, MethodSet::ANY);
    }

    /// Process one envelope under an accepted-method policy.
    ///
    /// Drives parse → resolve → admit → handle and always leaves the
    /// envelope terminally dispatched: a parse failure, a missing uri, an
    /// admission rejection, and a resource reply all end in exactly one
    /// dispatch. Admission consults only `accepted`; a resource's declared
    /// set never blocks an invocation.
    pub fn process_accepting(&mut self, envelope: &mut dyn ApiEnvelope, accepted: MethodSet) {
        let parse_code = envelope.parse(&self.base_path, &self.request_key);
        if parse_code != 0 {
            // The diagnostic stays local: constrained clients get the bare
            // error envelope, operators get the cause.
            if let Some(diagnostic) = envelope.core().parse_error.as_deref() {
                warn!(code = parse_code, error = %diagnostic, "request deserialization failed");
            }
            envelope.send(parse_code);
            return;
        }

        let Some(uri) = envelope
            .core()
            .uri
            .clone()
            .filter(|uri| !uri.is_empty())
        else {
            warn!("request carries no uri");
            envelope.send(400);
            return;
        };
        let verb = envelope.core().verb;
        debug!(verb = %verb, uri = %uri, "request parsed");

        let found = self.mounts.iter().position(|mount| mount.path == uri);

        if found.is_none() && verb == Verb::Get {
            if let Some(describer) = self.describer.as_deref() {
                if uri.starts_with(describer) {
                    envelope.core_mut().out = self.describe();
                    envelope.send(200);
                    return;
                }
            }
        }

        let admission = match found {
            None => 404,
            Some(_) if verb == Verb::Unknown => 400,
            Some(_) if !accepted.contains(verb) => 405,
            Some(_) => 0,
        };
        if admission != 0 {
            warn!(code = admission, verb = %verb, uri = %uri, "request rejected");
            envelope.send(admission);
            return;
        }

        if let Some(mount) = found.and_then(|index| self.mounts.get_mut(index)) {
            debug!(path = %mount.path, verb = %verb, "request dispatched");
            mount.handle(envelope, self.uri_key.as_deref());
        }
    }

    /// The introspection payload: every mounted path with its declared verbs,
    /// in mount order.
    fn describe(&self) -> Value {
        let handlers: Vec<Value> = self.mounts.iter().map(Mount::describe).collect();
        json!({ "handlers": handlers })
    }
}
