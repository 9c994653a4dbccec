//! route-directions
//!
//! Fetches a route from a directions service and decodes its overview
//! polyline into coordinates ready for a map renderer.

pub mod config;
pub mod controller;
pub mod directions;
pub mod error;
pub mod geo;
pub mod polyline;
pub mod request;
pub mod traits;

pub use config::{BaseUrl, DirectionsConfig};
pub use controller::{ControllerOptions, FetchHandle, FetchPhase, RenderOutput, RouteController};
pub use directions::{DirectionsClient, HttpTransport, RouteResult};
pub use error::{ConfigError, ServiceError, TransportError};
pub use geo::{GeoPoint, Location};
pub use request::{ModeOptions, RequestSummary, RouteInputs, TravelMode};
pub use traits::{DirectionsListener, DirectionsTransport, NoopListener};
