use crate::domain::model::NOT_AVAILABLE;
use crate::utils::error::{EvalError, Result};
use geo::{BooleanOps, Contains, Coord, LineString, MultiPolygon, Point, Polygon, Scale};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;

/// 區域檔案中的一個漁區定義
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneDefinition {
    #[serde(rename = "FAOArea")]
    pub fao_area: FaoArea,
    #[serde(rename = "Coordinates")]
    pub coordinates: Vec<ZoneCoordinate>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ZoneCoordinate {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// FAOArea 在檔案裡可能是字串也可能是數字
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FaoArea {
    Code(String),
    Number(serde_json::Number),
}

impl fmt::Display for FaoArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaoArea::Code(code) => write!(f, "{}", code),
            FaoArea::Number(number) => write!(f, "{}", number),
        }
    }
}

/// 依檔案順序排列的 (漁區名稱, 定義)
pub fn parse_zone_definitions(data: &[u8]) -> Result<Vec<(String, ZoneDefinition)>> {
    let raw: serde_json::Map<String, Value> = serde_json::from_slice(data)?;

    raw.into_iter()
        .map(|(name, value)| {
            let definition: ZoneDefinition =
                serde_json::from_value(value).map_err(|e| EvalError::ZoneError {
                    zone: name.clone(),
                    message: e.to_string(),
                })?;
            Ok((name, definition))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct FishingZone {
    pub name: String,
    pub fao_code: String,
    pub polygon: Polygon<f64>,
}

#[derive(Debug, Clone)]
pub struct FaoZone {
    pub code: String,
    pub area: MultiPolygon<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAssignment {
    pub location: String,
    pub fao_zone: String,
}

/// 漁區與 FAO 區的多邊形索引，以及兩者的分類編號
#[derive(Debug, Clone)]
pub struct ZoneIndex {
    fishing_zones: Vec<FishingZone>,
    fao_zones: Vec<FaoZone>,
    fishing_zone_classes: HashMap<String, usize>,
    fao_zone_classes: HashMap<String, usize>,
}

fn zone_polygon(name: &str, definition: &ZoneDefinition) -> Result<Polygon<f64>> {
    if definition.coordinates.len() < 3 {
        return Err(EvalError::ZoneError {
            zone: name.to_string(),
            message: format!(
                "a polygon needs at least 3 coordinates, got {}",
                definition.coordinates.len()
            ),
        });
    }

    let ring: Vec<Coord<f64>> = definition
        .coordinates
        .iter()
        .map(|c| Coord {
            x: c.longitude,
            y: c.latitude,
        })
        .collect();

    if ring.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(EvalError::ZoneError {
            zone: name.to_string(),
            message: "coordinates must be finite".to_string(),
        });
    }

    Ok(Polygon::new(LineString::new(ring), vec![]))
}

impl ZoneIndex {
    /// 建立索引。漁區多邊形依 `scale` 以外框中心縮放；FAO 區是同代碼漁區（未縮放）的聯集。
    pub fn from_definitions(definitions: &[(String, ZoneDefinition)], scale: f64) -> Result<Self> {
        let mut fishing_zones = Vec::with_capacity(definitions.len());
        let mut fishing_zone_classes = HashMap::from([(NOT_AVAILABLE.to_string(), 0)]);
        let mut fao_zone_classes = HashMap::from([(NOT_AVAILABLE.to_string(), 0)]);
        let mut fao_members: Vec<(String, Vec<Polygon<f64>>)> = Vec::new();

        for (name, definition) in definitions {
            let fao_code = definition.fao_area.to_string();
            let polygon = zone_polygon(name, definition)?;

            let next_class = fishing_zone_classes.len();
            fishing_zone_classes.entry(name.clone()).or_insert(next_class);
            let next_class = fao_zone_classes.len();
            fao_zone_classes.entry(fao_code.clone()).or_insert(next_class);

            match fao_members.iter_mut().find(|(code, _)| *code == fao_code) {
                Some((_, members)) => members.push(polygon.clone()),
                None => fao_members.push((fao_code.clone(), vec![polygon.clone()])),
            }

            let polygon = if scale == 1.0 {
                polygon
            } else {
                polygon.scale(scale)
            };

            fishing_zones.push(FishingZone {
                name: name.clone(),
                fao_code,
                polygon,
            });
        }

        let fao_zones = fao_members
            .into_iter()
            .map(|(code, members)| FaoZone {
                area: union_all(members),
                code,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Built zone index with {} fishing zones and {} FAO zones",
            fishing_zones.len(),
            fao_zones.len()
        );

        Ok(Self {
            fishing_zones,
            fao_zones,
            fishing_zone_classes,
            fao_zone_classes,
        })
    }

    pub fn from_json(data: &[u8], scale: f64) -> Result<Self> {
        let definitions = parse_zone_definitions(data)?;
        Self::from_definitions(&definitions, scale)
    }

    /// 點在多邊形內（邊界不算）；多個區域重疊時取定義順序中最後一個
    pub fn resolve(&self, longitude: f64, latitude: f64) -> ZoneAssignment {
        if !longitude.is_finite() || !latitude.is_finite() {
            return ZoneAssignment {
                location: NOT_AVAILABLE.to_string(),
                fao_zone: NOT_AVAILABLE.to_string(),
            };
        }

        let point = Point::new(longitude, latitude);

        let location = self
            .fishing_zones
            .iter()
            .rev()
            .find(|zone| zone.polygon.contains(&point))
            .map(|zone| zone.name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let fao_zone = self
            .fao_zones
            .iter()
            .rev()
            .find(|zone| zone.area.contains(&point))
            .map(|zone| zone.code.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        ZoneAssignment { location, fao_zone }
    }

    pub fn fishing_zone_class(&self, name: &str) -> usize {
        self.fishing_zone_classes.get(name).copied().unwrap_or(0)
    }

    pub fn fao_zone_class(&self, code: &str) -> usize {
        self.fao_zone_classes.get(code).copied().unwrap_or(0)
    }

    pub fn fishing_zones(&self) -> &[FishingZone] {
        &self.fishing_zones
    }

    pub fn fao_zones(&self) -> &[FaoZone] {
        &self.fao_zones
    }

    pub fn fishing_zone_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .fishing_zones
            .iter()
            .map(|zone| {
                json!({
                    "type": "Feature",
                    "properties": { "name": zone.name, "fao_area": zone.fao_code },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": polygon_rings(&zone.polygon),
                    }
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }

    pub fn fao_zone_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .fao_zones
            .iter()
            .map(|zone| {
                let polygons: Vec<Vec<Vec<[f64; 2]>>> =
                    zone.area.0.iter().map(polygon_rings).collect();
                json!({
                    "type": "Feature",
                    "properties": { "fao_area": zone.code },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": polygons,
                    }
                })
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut members = polygons.into_iter();
    let Some(first) = members.next() else {
        return MultiPolygon::new(vec![]);
    };

    members.fold(MultiPolygon::new(vec![first]), |acc, polygon| {
        acc.union(&MultiPolygon::new(vec![polygon]))
    })
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONES: &str = r#"{
        "West": {
            "FAOArea": "27.IVa",
            "Coordinates": [
                {"Latitude": 0.0, "Longitude": 0.0},
                {"Latitude": 0.0, "Longitude": 2.0},
                {"Latitude": 2.0, "Longitude": 2.0},
                {"Latitude": 2.0, "Longitude": 0.0}
            ]
        },
        "East": {
            "FAOArea": "27.IVa",
            "Coordinates": [
                {"Latitude": 0.0, "Longitude": 2.0},
                {"Latitude": 0.0, "Longitude": 4.0},
                {"Latitude": 2.0, "Longitude": 4.0},
                {"Latitude": 2.0, "Longitude": 2.0}
            ]
        },
        "North": {
            "FAOArea": 21,
            "Coordinates": [
                {"Latitude": 10.0, "Longitude": 0.0},
                {"Latitude": 10.0, "Longitude": 4.0},
                {"Latitude": 14.0, "Longitude": 4.0},
                {"Latitude": 14.0, "Longitude": 0.0}
            ]
        }
    }"#;

    fn index() -> ZoneIndex {
        ZoneIndex::from_json(ZONES.as_bytes(), 1.0).unwrap()
    }

    #[test]
    fn test_definitions_keep_file_order() {
        let definitions = parse_zone_definitions(ZONES.as_bytes()).unwrap();
        let names: Vec<&str> = definitions.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["West", "East", "North"]);
        assert_eq!(definitions[2].1.fao_area.to_string(), "21");
    }

    #[test]
    fn test_class_mapping() {
        let zones = index();
        assert_eq!(zones.fishing_zone_class(NOT_AVAILABLE), 0);
        assert_eq!(zones.fishing_zone_class("West"), 1);
        assert_eq!(zones.fishing_zone_class("East"), 2);
        assert_eq!(zones.fishing_zone_class("North"), 3);
        assert_eq!(zones.fao_zone_class("27.IVa"), 1);
        assert_eq!(zones.fao_zone_class("21"), 2);
        assert_eq!(zones.fao_zone_class("unknown"), 0);
    }

    #[test]
    fn test_resolve_inside_and_outside() {
        let zones = index();

        let west = zones.resolve(1.0, 1.0);
        assert_eq!(west.location, "West");
        assert_eq!(west.fao_zone, "27.IVa");

        let north = zones.resolve(2.0, 12.0);
        assert_eq!(north.location, "North");
        assert_eq!(north.fao_zone, "21");

        let sea = zones.resolve(50.0, 50.0);
        assert_eq!(sea.location, NOT_AVAILABLE);
        assert_eq!(sea.fao_zone, NOT_AVAILABLE);
    }

    #[test]
    fn test_non_finite_point_is_not_available() {
        let zones = index();
        for (longitude, latitude) in [(f64::NAN, 1.0), (f64::INFINITY, 1.0), (1.0, f64::NEG_INFINITY)] {
            let assignment = zones.resolve(longitude, latitude);
            assert_eq!(assignment.location, NOT_AVAILABLE);
            assert_eq!(assignment.fao_zone, NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_boundary_point_is_not_contained_in_fishing_zone() {
        let zones = index();
        // 兩個漁區共用的邊界：不屬於任何漁區，但在 FAO 聯集內部
        let shared_edge = zones.resolve(2.0, 1.0);
        assert_eq!(shared_edge.location, NOT_AVAILABLE);
        assert_eq!(shared_edge.fao_zone, "27.IVa");

        let outer_edge = zones.resolve(0.0, 1.0);
        assert_eq!(outer_edge.location, NOT_AVAILABLE);
        assert_eq!(outer_edge.fao_zone, NOT_AVAILABLE);
    }

    #[test]
    fn test_fao_union_covers_member_zones() {
        let zones = index();
        assert_eq!(zones.fao_zones().len(), 2);
        let fao = &zones.fao_zones()[0];
        assert_eq!(fao.code, "27.IVa");
        assert!(fao.area.contains(&Point::new(0.5, 0.5)));
        assert!(fao.area.contains(&Point::new(3.5, 1.5)));
        assert!(!fao.area.contains(&Point::new(5.0, 1.0)));
    }

    #[test]
    fn test_overlapping_zones_resolve_to_last_definition() {
        let data = r#"{
            "Big": {"FAOArea": "A", "Coordinates": [
                {"Latitude": 0.0, "Longitude": 0.0}, {"Latitude": 0.0, "Longitude": 10.0},
                {"Latitude": 10.0, "Longitude": 10.0}, {"Latitude": 10.0, "Longitude": 0.0}]},
            "Small": {"FAOArea": "B", "Coordinates": [
                {"Latitude": 4.0, "Longitude": 4.0}, {"Latitude": 4.0, "Longitude": 6.0},
                {"Latitude": 6.0, "Longitude": 6.0}, {"Latitude": 6.0, "Longitude": 4.0}]}
        }"#;
        let zones = ZoneIndex::from_json(data.as_bytes(), 1.0).unwrap();

        let inner = zones.resolve(5.0, 5.0);
        assert_eq!(inner.location, "Small");
        assert_eq!(inner.fao_zone, "B");

        let outer = zones.resolve(1.0, 1.0);
        assert_eq!(outer.location, "Big");
        assert_eq!(outer.fao_zone, "A");
    }

    #[test]
    fn test_scaled_fishing_zones() {
        let zones = ZoneIndex::from_json(ZONES.as_bytes(), 2.0).unwrap();
        // West 以 (1, 1) 為中心放大兩倍 => 經度 -1..3
        assert_eq!(zones.resolve(-0.5, 1.0).location, "West");
        // FAO 區不受縮放影響
        assert_eq!(zones.resolve(-0.5, 1.0).fao_zone, NOT_AVAILABLE);
    }

    #[test]
    fn test_invalid_zone_definitions() {
        let too_small = r#"{"Tiny": {"FAOArea": "A", "Coordinates": [
            {"Latitude": 0.0, "Longitude": 0.0}, {"Latitude": 1.0, "Longitude": 1.0}]}}"#;
        let err = ZoneIndex::from_json(too_small.as_bytes(), 1.0).unwrap_err();
        assert!(matches!(err, EvalError::ZoneError { ref zone, .. } if zone == "Tiny"));

        let missing_fao = r#"{"NoFao": {"Coordinates": []}}"#;
        assert!(ZoneIndex::from_json(missing_fao.as_bytes(), 1.0).is_err());

        assert!(ZoneIndex::from_json(b"[1, 2, 3]", 1.0).is_err());
    }

    #[test]
    fn test_geojson_export() {
        let zones = index();
        let fishing = zones.fishing_zone_geojson();
        assert_eq!(fishing["type"], "FeatureCollection");
        assert_eq!(fishing["features"].as_array().unwrap().len(), 3);
        assert_eq!(fishing["features"][0]["properties"]["name"], "West");

        let fao = zones.fao_zone_geojson();
        assert_eq!(fao["features"].as_array().unwrap().len(), 2);
        assert_eq!(fao["features"][0]["geometry"]["type"], "MultiPolygon");
    }
}
