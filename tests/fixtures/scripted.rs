//! In-memory transport and listener doubles.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use route_directions::polyline::{encode, DEFAULT_PRECISION};
use route_directions::{
    DirectionsListener, DirectionsTransport, GeoPoint, Location, RequestSummary, RouteResult,
    TransportError,
};

#[derive(Debug, Clone)]
enum Reply {
    Body(Value),
    Unreachable,
}

struct Script {
    reply: Reply,
    gate: Option<Receiver<()>>,
}

/// Answers requests by their `origin` parameter.
///
/// A gated origin blocks its first request until the gate is released, which
/// lets tests hold fetches in flight.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, origin: &Location, body: Value) {
        self.script(origin, Reply::Body(body));
    }

    /// Requests from `origin` fail as if the network were down.
    pub fn unreachable(&self, origin: &Location) {
        self.script(origin, Reply::Unreachable);
    }

    /// Holds the next request from `origin` until the returned sender fires.
    pub fn gate(&self, origin: &Location) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        if let Some(script) = self.scripts.lock().get_mut(&origin.to_param()) {
            script.gate = Some(rx);
        }
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn script(&self, origin: &Location, reply: Reply) {
        self.scripts
            .lock()
            .insert(origin.to_param(), Script { reply, gate: None });
    }
}

impl DirectionsTransport for ScriptedTransport {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.requests.lock().push(url.to_string());

        let origin = url
            .split("origin=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap_or_default()
            .to_string();

        let (reply, gate) = {
            let mut scripts = self.scripts.lock();
            match scripts.get_mut(&origin) {
                Some(script) => (script.reply.clone(), script.gate.take()),
                None => (Reply::Unreachable, None),
            }
        };

        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Unreachable => Err(serde_json::from_str::<Value>("").unwrap_err().into()),
        }
    }
}

/// A successful single-leg response tracing a straight line between points.
pub fn route_body(from: GeoPoint, to: GeoPoint, distance_m: f64, duration_s: f64) -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": { "value": distance_m },
                "duration": { "value": duration_s }
            }],
            "overview_polyline": { "points": encode(&[from, to], DEFAULT_PRECISION) }
        }]
    })
}

pub fn rejection_body(status: &str, message: &str) -> Value {
    json!({ "status": status, "error_message": message, "routes": [] })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start(RequestSummary),
    Ready { distance_km: f64, points: usize },
    Error(String),
}

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl DirectionsListener for RecordingListener {
    fn on_start(&self, summary: &RequestSummary) {
        self.events.lock().push(Event::Start(summary.clone()));
    }

    fn on_ready(&self, result: &RouteResult) {
        self.events.lock().push(Event::Ready {
            distance_km: result.distance_km,
            points: result.coordinates.len(),
        });
    }

    fn on_error(&self, message: &str) {
        self.events.lock().push(Event::Error(message.to_string()));
    }
}
