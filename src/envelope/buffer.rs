use super::core::{parse_json_frame, ApiEnvelope, EnvelopeCore};
use crate::limits::DocumentLimits;
use tracing::{error, warn};

/// Envelope over an in-memory message buffer.
///
/// The inbound message is a JSON object carrying its own uri and verb (see
/// the module docs for the shape); the response is serialized into an owned
/// output buffer capped at the output ceiling. Useful for transports that
/// hand over complete byte buffers - a serial line, an MQTT payload, a test.
///
/// ```
/// use picoapi::{ApiEnvelope, BufferEnvelope};
///
/// let mut envelope = BufferEnvelope::new(r#"{"$_uri":"/widgets","method":"GET"}"#);
/// assert_eq!(envelope.parse("", "$_uri"), 0);
/// envelope.send(404);
/// assert_eq!(envelope.status(), Some(404));
/// ```
#[derive(Debug)]
pub struct BufferEnvelope {
    core: EnvelopeCore,
    input: Vec<u8>,
    compact: bool,
    limits: DocumentLimits,
    status: Option<u16>,
    output: Option<String>,
}

impl BufferEnvelope {
    /// Envelope over `input` with the default document ceilings.
    #[must_use]
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self::with_limits(input, DocumentLimits::default())
    }

    /// Envelope over `input` with explicit document ceilings.
    #[must_use]
    pub fn with_limits(input: impl Into<Vec<u8>>, limits: DocumentLimits) -> Self {
        Self {
            core: EnvelopeCore::default(),
            input: input.into(),
            compact: false,
            limits,
            status: None,
            output: None,
        }
    }

    /// Switch parsing to the compact key set (`U`/`B`/`P`).
    #[must_use]
    pub fn compact_keys(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Status attached by the last dispatch, if one happened.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Serialized response, if one was dispatched.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Consume the envelope, yielding the serialized response.
    #[must_use]
    pub fn into_output(self) -> Option<String> {
        self.output
    }
}

impl ApiEnvelope for BufferEnvelope {
    fn core(&self) -> &EnvelopeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnvelopeCore {
        &mut self.core
    }

    fn parse(&mut self, _base_path: &str, request_key: &str) -> u16 {
        parse_json_frame(
            &mut self.core,
            &self.input,
            request_key,
            self.compact,
            self.limits,
        )
    }

    fn dispatch(&mut self, code: u16) {
        self.status = Some(code);
        match serde_json::to_string(&self.core.out) {
            Ok(mut text) => {
                if text.len() > self.limits.max_output {
                    // Truncate at the ceiling, on a character boundary. The
                    // result is not valid JSON; a constrained sink gets the
                    // prefix rather than nothing.
                    let mut end = self.limits.max_output;
                    while !text.is_char_boundary(end) {
                        end -= 1;
                    }
                    warn!(
                        size = text.len(),
                        ceiling = self.limits.max_output,
                        code,
                        "response exceeds output ceiling, truncated"
                    );
                    text.truncate(end);
                }
                self.output = Some(text);
            }
            Err(err) => error!(error = %err, code, "response serialization failed"),
        }
    }
}
