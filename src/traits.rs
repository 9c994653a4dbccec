//! Seams between the route pipeline and its host.
//!
//! The transport and the listener are supplied by the embedding application;
//! tests substitute in-memory implementations.

use std::sync::Arc;

use serde_json::Value;

use crate::directions::RouteResult;
use crate::error::TransportError;
use crate::request::RequestSummary;

/// Fetches a URL and returns the body parsed as JSON.
pub trait DirectionsTransport {
    fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

impl<T: DirectionsTransport + ?Sized> DirectionsTransport for &T {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        (**self).get_json(url)
    }
}

impl<T: DirectionsTransport + ?Sized> DirectionsTransport for Arc<T> {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        (**self).get_json(url)
    }
}

/// Receives fetch progress from a route controller.
///
/// For each fetch, `on_start` fires before the request is issued and at most
/// one of `on_ready`/`on_error` fires after it resolves. Transport failures
/// fire neither. Nothing fires once the controller is disposed.
pub trait DirectionsListener: Send + Sync {
    fn on_start(&self, _summary: &RequestSummary) {}

    fn on_ready(&self, _result: &RouteResult) {}

    /// `message` is empty when the service reported success with no routes.
    fn on_error(&self, _message: &str) {}
}

/// A listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl DirectionsListener for NoopListener {}
