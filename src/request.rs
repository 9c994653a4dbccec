//! Request building: turns route inputs into a directions query URL.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::{BaseUrl, DirectionsConfig};
use crate::geo::Location;

const WAYPOINT_DELIMITER: &str = "|";
const OPTIMIZE_TOKEN: &str = "optimize:true";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Bicycling,
    Transit,
    Walking,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVING",
            TravelMode::Bicycling => "BICYCLING",
            TravelMode::Transit => "TRANSIT",
            TravelMode::Walking => "WALKING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransitMode {
    Bus,
    Rail,
    Subway,
    Train,
    Tram,
}

impl TransitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitMode::Bus => "BUS",
            TransitMode::Rail => "RAIL",
            TransitMode::Subway => "SUBWAY",
            TransitMode::Train => "TRAIN",
            TransitMode::Tram => "TRAM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitRoutingPreference {
    LessWalking,
    FewerTransfers,
}

impl TransitRoutingPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitRoutingPreference::LessWalking => "LESS_WALKING",
            TransitRoutingPreference::FewerTransfers => "FEWER_TRANSFERS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficModel {
    BestGuess,
    Optimistic,
    Pessimistic,
}

impl TrafficModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficModel::BestGuess => "BESTGUESS",
            TrafficModel::Optimistic => "OPTIMISTIC",
            TrafficModel::Pessimistic => "PESSIMISTIC",
        }
    }
}

/// Travel-mode specific refinements. Unset fields add nothing to the query.
///
/// The builder does not check that an option makes sense for the chosen mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeOptions {
    pub arrival_time: Option<SystemTime>,
    pub departure_time: Option<SystemTime>,
    #[serde(default)]
    pub modes: Vec<TransitMode>,
    pub routing_preference: Option<TransitRoutingPreference>,
    pub traffic_model: Option<TrafficModel>,
}

impl ModeOptions {
    /// The `&name=value` suffix appended after the fixed query parameters.
    pub fn to_query(&self) -> String {
        let mut query = String::new();

        if let Some(time) = self.arrival_time {
            query.push_str(&format!("&arrival_time={}", epoch_millis(time)));
        }
        if let Some(time) = self.departure_time {
            query.push_str(&format!("&departure_time={}", epoch_millis(time)));
        }
        if !self.modes.is_empty() {
            let modes = self
                .modes
                .iter()
                .map(|mode| mode.as_str().to_lowercase())
                .collect::<Vec<_>>()
                .join(WAYPOINT_DELIMITER);
            query.push_str(&format!("&transit_mode={}", modes));
        }
        if let Some(preference) = self.routing_preference {
            query.push_str(&format!(
                "&transit_routing_preference={}",
                preference.as_str().to_lowercase()
            ));
        }
        if let Some(model) = self.traffic_model {
            query.push_str(&format!(
                "&traffic_model={}",
                model.as_str().to_lowercase().replace("bestguess", "best_guess")
            ));
        }

        query
    }
}

/// Milliseconds since the Unix epoch, negative for earlier times.
fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |millis| -millis),
    }
}

/// Rendering-only properties handed through to the host renderer.
///
/// Changing these never triggers a new fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineStyle {
    pub stroke_width: f32,
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub line_dash_pattern: Vec<f32>,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            stroke_color: None,
            line_dash_pattern: Vec::new(),
        }
    }
}

/// Everything the caller supplies for one route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteInputs {
    pub origin: Option<Location>,
    pub destination: Option<Location>,
    #[serde(default)]
    pub waypoints: Vec<Location>,
    #[serde(default)]
    pub optimize_waypoints: bool,
    #[serde(default)]
    pub mode: TravelMode,
    pub mode_options: Option<ModeOptions>,
    #[serde(default)]
    pub style: PolylineStyle,
}

impl RouteInputs {
    pub fn new(origin: impl Into<Location>, destination: impl Into<Location>) -> Self {
        Self {
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn waypoint(mut self, location: impl Into<Location>) -> Self {
        self.waypoints.push(location.into());
        self
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize_waypoints = optimize;
        self
    }

    pub fn mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode_options(mut self, options: ModeOptions) -> Self {
        self.mode_options = Some(options);
        self
    }

    pub fn style(mut self, style: PolylineStyle) -> Self {
        self.style = style;
        self
    }
}

/// Whether two input sets would produce different routes.
///
/// Compares origin, destination, waypoints, mode and mode options by value.
/// Style and the optimize flag are ignored.
pub fn route_inputs_differ(current: &RouteInputs, next: &RouteInputs) -> bool {
    current.origin != next.origin
        || current.destination != next.destination
        || current.waypoints != next.waypoints
        || current.mode != next.mode
        || current.mode_options != next.mode_options
}

/// The normalized request reported to listeners before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    pub summary: RequestSummary,
}

/// Formats the `waypoints` query value.
pub fn waypoints_param(waypoints: &[Location], optimize: bool) -> String {
    let joined = waypoints
        .iter()
        .map(Location::to_param)
        .collect::<Vec<_>>()
        .join(WAYPOINT_DELIMITER);

    if optimize {
        format!("{}{}{}", OPTIMIZE_TOKEN, WAYPOINT_DELIMITER, joined)
    } else {
        joined
    }
}

/// Builds the request URL for `inputs`.
///
/// Returns `None` when origin or destination is missing; the caller should
/// then skip the fetch entirely.
pub fn build_request(inputs: &RouteInputs, config: &DirectionsConfig) -> Option<PreparedRequest> {
    let origin = inputs.origin.as_ref()?.to_param();
    let destination = inputs.destination.as_ref()?.to_param();
    let waypoints = waypoints_param(&inputs.waypoints, inputs.optimize_waypoints);

    let url = match &config.base_url {
        BaseUrl::Opaque(url) => url.clone(),
        BaseUrl::Template(base) => {
            let mode_options = inputs
                .mode_options
                .as_ref()
                .map(ModeOptions::to_query)
                .unwrap_or_default();
            format!(
                "{}?origin={}&waypoints={}&destination={}&key={}&mode={}&language={}&region={}&departure_time=now{}",
                base,
                origin,
                waypoints,
                destination,
                config.api_key,
                inputs.mode.as_str().to_lowercase(),
                config.language,
                config.region.as_deref().unwrap_or_default(),
                mode_options,
            )
        }
    };

    let summary = RequestSummary {
        origin,
        destination,
        waypoints: if waypoints.is_empty() {
            Vec::new()
        } else {
            waypoints.split(WAYPOINT_DELIMITER).map(str::to_string).collect()
        },
    };

    Some(PreparedRequest { url, summary })
}
