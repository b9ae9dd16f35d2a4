//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::{LineId, Station, StationId};
use crate::topology::LineView;

/// Request to create a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id(),
            name: station.name().to_string(),
        }
    }
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    /// Kept signed so that zero and negative values reach domain
    /// validation instead of failing as malformed JSON
    pub distance: i64,
}

/// Request to rename or recolor a line.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub name: String,
    pub color: String,
}

/// Request to attach a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSectionQuery {
    pub station_id: StationId,
}

/// A line with its stations in path order.
#[derive(Debug, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationResponse>,
}

impl From<&LineView> for LineResponse {
    fn from(view: &LineView) -> Self {
        Self {
            id: view.line.id(),
            name: view.line.name().to_string(),
            color: view.line.color().to_string(),
            stations: view.stations.iter().map(StationResponse::from).collect(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Line;

    #[test]
    fn create_line_request_uses_camel_case() {
        let req: CreateLineRequest = serde_json::from_str(
            r#"{"name":"Line 2","color":"green","upStationId":1,"downStationId":2,"distance":10}"#,
        )
        .unwrap();
        assert_eq!(req.up_station_id, StationId(1));
        assert_eq!(req.down_station_id, StationId(2));
        assert_eq!(req.distance, 10);
    }

    #[test]
    fn negative_distance_still_parses() {
        let req: AddSectionRequest =
            serde_json::from_str(r#"{"upStationId":1,"downStationId":2,"distance":-4}"#).unwrap();
        assert_eq!(req.distance, -4);
    }

    #[test]
    fn line_response_lists_stations_in_order() {
        let view = LineView {
            line: Line::new(LineId(3), "Line 3", "orange").unwrap(),
            stations: vec![
                Station::new(StationId(9), "Daehwa").unwrap(),
                Station::new(StationId(2), "Juyeop").unwrap(),
            ],
        };
        let json = serde_json::to_value(LineResponse::from(&view)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["stations"][0]["id"], 9);
        assert_eq!(json["stations"][1]["name"], "Juyeop");
    }
}
