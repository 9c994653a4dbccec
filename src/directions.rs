//! Directions service HTTP adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DirectionsConfig;
use crate::error::{ConfigError, ServiceError, TransportError};
use crate::geo::GeoPoint;
use crate::polyline::{self, DEFAULT_PRECISION};
use crate::request::{build_request, RouteInputs};
use crate::traits::DirectionsTransport;

const STATUS_OK: &str = "OK";

/// A decoded route with its aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub coordinates: Vec<GeoPoint>,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Passed through from the service untouched.
    pub fare: Option<Value>,
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &DirectionsConfig) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

impl DirectionsTransport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let body = self.client.get(url).send()?.json::<Value>()?;
        Ok(body)
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient<T = HttpTransport> {
    config: DirectionsConfig,
    transport: T,
}

impl DirectionsClient<HttpTransport> {
    pub fn new(config: DirectionsConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: DirectionsTransport> DirectionsClient<T> {
    pub fn with_transport(config: DirectionsConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &DirectionsConfig {
        &self.config
    }

    /// Builds and fetches the route for `inputs`.
    ///
    /// `Ok(None)` covers both a skipped request (missing origin or
    /// destination) and a swallowed transport failure.
    pub fn route(&self, inputs: &RouteInputs) -> Result<Option<RouteResult>, ServiceError> {
        match build_request(inputs, &self.config) {
            Some(request) => self.fetch_route(&request.url),
            None => Ok(None),
        }
    }

    /// Issues a single request and turns the response into a route.
    ///
    /// Service rejections come back as `Err`. Network and parse failures are
    /// logged and come back as `Ok(None)`.
    pub fn fetch_route(&self, url: &str) -> Result<Option<RouteResult>, ServiceError> {
        tracing::debug!(url, "requesting directions");

        let body = match self
            .transport
            .get_json(url)
            .and_then(|value| serde_json::from_value::<DirectionsResponse>(value).map_err(TransportError::from))
        {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "directions request failed");
                return Ok(None);
            }
        };

        route_from_response(body).map(Some)
    }
}

fn route_from_response(body: DirectionsResponse) -> Result<RouteResult, ServiceError> {
    if body.status != STATUS_OK {
        tracing::warn!(status = %body.status, message = ?body.error_message, "directions service rejected request");
        return Err(ServiceError::rejected(body.error_message));
    }

    let Some(route) = body.routes.into_iter().next() else {
        tracing::warn!("directions service returned no routes");
        return Err(ServiceError::no_routes());
    };

    let distance_m: f64 = route.legs.iter().map(|leg| leg.distance.value).sum();
    let duration_s: f64 = route
        .legs
        .iter()
        .map(|leg| {
            leg.duration_in_traffic
                .as_ref()
                .map_or(leg.duration.value, |traffic| traffic.value)
        })
        .sum();
    let coordinates = polyline::decode(&route.overview_polyline.points, DEFAULT_PRECISION);

    tracing::debug!(
        legs = route.legs.len(),
        points = coordinates.len(),
        "decoded route"
    );

    Ok(RouteResult {
        coordinates,
        distance_km: distance_m / 1000.0,
        duration_min: duration_s / 60.0,
        fare: route.fare,
    })
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
    overview_polyline: OverviewPolyline,
    fare: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: Measure,
    duration: Measure,
    duration_in_traffic: Option<Measure>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}
