//! Route lifecycle controller.
//!
//! Owns the currently displayed route for one set of inputs and re-fetches it
//! when those inputs change. Every fetch gets its own thread, so a stalled
//! request never holds up a later one. Completions are applied under the
//! state lock; listeners are notified after the lock is released.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Mutex, ReentrantMutex};

use crate::directions::{DirectionsClient, HttpTransport, RouteResult};
use crate::error::ServiceError;
use crate::geo::GeoPoint;
use crate::request::{build_request, route_inputs_differ, PolylineStyle, RouteInputs};
use crate::traits::{DirectionsListener, DirectionsTransport};

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Clear the displayed route as soon as inputs change, before re-fetching.
    pub reset_on_change: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            reset_on_change: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Empty,
    Fetching,
    Ready,
}

/// What the host renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub coordinates: Vec<GeoPoint>,
    pub style: PolylineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    Disposed,
}

#[derive(Debug)]
struct FetchState {
    lifecycle: Lifecycle,
    result: Option<RouteResult>,
    in_flight: usize,
}

enum Notice {
    Ready(RouteResult),
    Error(String),
}

struct Shared<T> {
    client: DirectionsClient<T>,
    listener: Arc<dyn DirectionsListener>,
    state: Mutex<FetchState>,
    // Held around every listener call and by dispose. Reentrant so listeners
    // may dispose the controller from inside a callback.
    notify: ReentrantMutex<()>,
}

impl<T> Shared<T> {
    fn is_mounted(&self) -> bool {
        self.state.lock().lifecycle == Lifecycle::Mounted
    }

    fn dispose(&self) {
        let _notify = self.notify.lock();
        self.state.lock().lifecycle = Lifecycle::Disposed;
    }

    fn apply(&self, outcome: Result<Option<RouteResult>, ServiceError>) {
        let notice = {
            let mut state = self.state.lock();
            if state.lifecycle != Lifecycle::Mounted {
                tracing::debug!("discarding route fetched after dispose");
                return;
            }
            state.in_flight = state.in_flight.saturating_sub(1);

            match outcome {
                Ok(Some(result)) => {
                    state.result = Some(result.clone());
                    Notice::Ready(result)
                }
                Ok(None) => {
                    state.result = None;
                    return;
                }
                Err(err) => {
                    state.result = None;
                    Notice::Error(err.message.unwrap_or_default())
                }
            }
        };

        let _notify = self.notify.lock();
        if !self.is_mounted() {
            tracing::debug!("dropping listener notice after dispose");
            return;
        }
        match notice {
            Notice::Ready(result) => self.listener.on_ready(&result),
            Notice::Error(message) => self.listener.on_error(&message),
        }
    }
}

/// Blocks until a dispatched fetch has been applied or discarded.
#[derive(Debug)]
pub struct FetchHandle {
    done: Receiver<()>,
}

impl FetchHandle {
    pub fn wait(self) {
        // A closed channel means the task is gone either way.
        let _ = self.done.recv();
    }

    /// Returns `false` if the fetch is still running after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        !matches!(self.done.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

/// Drives fetches for one route display.
///
/// Listeners may read from or dispose the controller inside callbacks.
pub struct RouteController<T = HttpTransport> {
    shared: Arc<Shared<T>>,
    inputs: RouteInputs,
    options: ControllerOptions,
}

impl<T> RouteController<T>
where
    T: DirectionsTransport + Send + Sync + 'static,
{
    pub fn new(
        client: DirectionsClient<T>,
        inputs: RouteInputs,
        options: ControllerOptions,
        listener: Arc<dyn DirectionsListener>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                listener,
                state: Mutex::new(FetchState {
                    lifecycle: Lifecycle::Idle,
                    result: None,
                    in_flight: 0,
                }),
                notify: ReentrantMutex::new(()),
            }),
            inputs,
            options,
        }
    }

    /// Mounts the controller and fetches the initial route.
    ///
    /// Returns `None` when nothing was dispatched: already started or
    /// disposed, or origin/destination missing.
    pub fn start(&self) -> Option<FetchHandle> {
        {
            let mut state = self.shared.state.lock();
            if state.lifecycle != Lifecycle::Idle {
                return None;
            }
            state.lifecycle = Lifecycle::Mounted;
        }
        self.dispatch(&self.inputs)
    }

    /// Replaces the inputs, re-fetching if any route-relevant field changed.
    pub fn on_inputs_changed(&mut self, next: RouteInputs) -> Option<FetchHandle> {
        let changed = route_inputs_differ(&self.inputs, &next);
        self.inputs = next;
        if !changed {
            return None;
        }

        if self.options.reset_on_change {
            let mut state = self.shared.state.lock();
            if state.lifecycle == Lifecycle::Mounted {
                state.result = None;
            }
        }
        self.dispatch(&self.inputs)
    }

    /// Tears the controller down. In-flight requests still run to completion
    /// but their results are dropped. No callback fires after this returns.
    pub fn dispose(&self) {
        self.shared.dispose();
    }

    pub fn inputs(&self) -> &RouteInputs {
        &self.inputs
    }

    pub fn result(&self) -> Option<RouteResult> {
        self.shared.state.lock().result.clone()
    }

    pub fn phase(&self) -> FetchPhase {
        let state = self.shared.state.lock();
        if state.in_flight > 0 {
            FetchPhase::Fetching
        } else if state.result.is_some() {
            FetchPhase::Ready
        } else {
            FetchPhase::Empty
        }
    }

    /// The polyline to draw, or `None` while no route is held.
    pub fn render(&self) -> Option<RenderOutput> {
        let state = self.shared.state.lock();
        state.result.as_ref().map(|result| RenderOutput {
            coordinates: result.coordinates.clone(),
            style: self.inputs.style.clone(),
        })
    }

    fn dispatch(&self, inputs: &RouteInputs) -> Option<FetchHandle> {
        let request = build_request(inputs, self.shared.client.config())?;
        {
            let _notify = self.shared.notify.lock();
            {
                let mut state = self.shared.state.lock();
                if state.lifecycle != Lifecycle::Mounted {
                    return None;
                }
                state.in_flight += 1;
            }
            self.shared.listener.on_start(&request.summary);
        }

        let shared = Arc::clone(&self.shared);
        let (done_tx, done_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("route-fetch".to_string())
            .spawn(move || {
                let outcome = shared.client.fetch_route(&request.url);
                shared.apply(outcome);
                let _ = done_tx.send(());
            });

        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn route fetch");
            let mut state = self.shared.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            return None;
        }

        Some(FetchHandle { done: done_rx })
    }
}

impl<T> Drop for RouteController<T> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::config::DirectionsConfig;
    use crate::error::TransportError;
    use crate::traits::NoopListener;

    struct FixedTransport(Value);

    impl DirectionsTransport for FixedTransport {
        fn get_json(&self, _url: &str) -> Result<Value, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn controller(inputs: RouteInputs) -> RouteController<FixedTransport> {
        let body = json!({
            "status": "OK",
            "routes": [{
                "legs": [{ "distance": { "value": 1000 }, "duration": { "value": 60 } }],
                "overview_polyline": { "points": "_p~iF~ps|U" }
            }]
        });
        let client = DirectionsClient::with_transport(DirectionsConfig::new("KEY"), FixedTransport(body));
        RouteController::new(client, inputs, ControllerOptions::default(), Arc::new(NoopListener))
    }

    #[test]
    fn test_phase_before_start_is_empty() {
        let controller = controller(RouteInputs::new("A", "B"));
        assert_eq!(controller.phase(), FetchPhase::Empty);
        assert!(controller.render().is_none());
    }

    #[test]
    fn test_start_is_idempotent() {
        let controller = controller(RouteInputs::new("A", "B"));
        controller.start().expect("dispatched").wait();
        assert!(controller.start().is_none());
        assert_eq!(controller.phase(), FetchPhase::Ready);
    }

    #[test]
    fn test_render_carries_style() {
        let style = PolylineStyle {
            stroke_width: 3.0,
            stroke_color: Some("#3366ff".to_string()),
            line_dash_pattern: Vec::new(),
        };
        let mut controller = controller(RouteInputs::new("A", "B").style(style.clone()));
        controller.start().expect("dispatched").wait();

        let output = controller.render().expect("route held");
        assert_eq!(output.coordinates, vec![GeoPoint::new(38.5, -120.2)]);
        assert_eq!(output.style, style);

        let restyled = PolylineStyle {
            stroke_width: 6.0,
            ..style
        };
        let next = controller.inputs().clone().style(restyled.clone());
        assert!(controller.on_inputs_changed(next).is_none());
        assert_eq!(controller.render().map(|output| output.style), Some(restyled));
    }

    #[test]
    fn test_start_after_dispose_does_nothing() {
        let controller = controller(RouteInputs::new("A", "B"));
        controller.dispose();
        assert!(controller.start().is_none());
        assert_eq!(controller.phase(), FetchPhase::Empty);
    }
}
