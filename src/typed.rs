//! Typed extraction from an inbound request.
//!
//! Resources work against JSON documents; business logic usually wants Rust
//! types. These helpers bridge the two at the resource seam: deserialize the
//! payload into a caller-declared type, or pull one named parameter through
//! `FromStr`. Failures come back as [`anyhow::Error`] with enough context to
//! decide the status code - typically a 400 reply.
//!
//! ```
//! use picoapi::{typed, Inbound, Reply, Resource, Verb};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct NewWidget {
//!     name: String,
//! }
//!
//! struct Widgets;
//!
//! impl Resource for Widgets {
//!     fn call(&mut self, req: &Inbound<'_>) -> Reply {
//!         match req.verb {
//!             Verb::Post => match typed::payload::<NewWidget>(req) {
//!                 Ok(widget) => Reply::created(json!({ "name": widget.name })),
//!                 Err(_) => Reply::status(400),
//!             },
//!             _ => Reply::status(405),
//!         }
//!     }
//! }
//! ```

use crate::resource::Inbound;
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::str::FromStr;

/// Deserialize the request payload into `T`.
pub fn payload<T: DeserializeOwned>(req: &Inbound<'_>) -> Result<T> {
    serde_json::from_value(req.body.clone())
        .context("request payload does not match the expected shape")
}

/// Fetch the required parameter `name` and parse it into `T`.
pub fn param<T>(req: &Inbound<'_>, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = req
        .params
        .get(name)
        .ok_or_else(|| anyhow!("missing parameter `{name}`"))?;
    raw.parse()
        .with_context(|| format!("parameter `{name}` has an unexpected format"))
}

/// Fetch the optional parameter `name`, parsing it into `T` when present.
pub fn opt_param<T>(req: &Inbound<'_>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match req.params.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("parameter `{name}` has an unexpected format")),
    }
}
