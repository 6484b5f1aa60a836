use super::core::{parse_json_frame, ApiEnvelope, EnvelopeCore};
use crate::limits::DocumentLimits;
use std::io::Write;
use tracing::{debug, error, warn};

/// Envelope over a socket/stream channel.
///
/// The adapter is handed one fully-assembled frame (the channel's framing -
/// websocket messages, length-prefixed reads, line splitting - happens
/// upstream) and answers by writing one line-delimited JSON document to the
/// sink. The caller is responsible for invoking the router once per frame.
///
/// A response over the output ceiling, or an io failure, drops the frame and
/// logs; a stream peer is better served by a missing frame than a partial
/// one.
#[derive(Debug)]
pub struct StreamEnvelope<W: Write> {
    core: EnvelopeCore,
    frame: Vec<u8>,
    compact: bool,
    limits: DocumentLimits,
    sink: W,
}

impl<W: Write> StreamEnvelope<W> {
    /// Envelope over `frame`, answering into `sink`, with the default
    /// document ceilings.
    #[must_use]
    pub fn new(frame: impl Into<Vec<u8>>, sink: W) -> Self {
        Self::with_limits(frame, sink, DocumentLimits::default())
    }

    /// Envelope over `frame` with explicit document ceilings.
    #[must_use]
    pub fn with_limits(frame: impl Into<Vec<u8>>, sink: W, limits: DocumentLimits) -> Self {
        Self {
            core: EnvelopeCore::default(),
            frame: frame.into(),
            compact: false,
            limits,
            sink,
        }
    }

    /// Switch parsing to the compact key set (`U`/`B`/`P`).
    #[must_use]
    pub fn compact_keys(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Consume the envelope, yielding the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

impl<W: Write> ApiEnvelope for StreamEnvelope<W> {
    fn core(&self) -> &EnvelopeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EnvelopeCore {
        &mut self.core
    }

    fn parse(&mut self, _base_path: &str, request_key: &str) -> u16 {
        parse_json_frame(
            &mut self.core,
            &self.frame,
            request_key,
            self.compact,
            self.limits,
        )
    }

    fn dispatch(&mut self, code: u16) {
        let text = match serde_json::to_string(&self.core.out) {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, code, "response serialization failed");
                return;
            }
        };
        if text.len() > self.limits.max_output {
            warn!(
                size = text.len(),
                ceiling = self.limits.max_output,
                code,
                "response exceeds output ceiling, dropped"
            );
            return;
        }
        match writeln!(self.sink, "{text}") {
            Ok(()) => debug!(code, size = text.len(), "frame dispatched"),
            Err(err) => error!(error = %err, code, "response write failed"),
        }
    }
}
