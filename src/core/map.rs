use crate::config::toml_config::MapSettings;
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::Value;

const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    /// 真實位置
    Red,
    /// 預測位置
    Blue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: MarkerColor,
    pub popup: String,
}

/// 一張 Leaflet 地圖：區域圖層 (GeoJSON) 加上真實／預測標記
#[derive(Debug, Clone)]
pub struct ZoneMap {
    title: String,
    settings: MapSettings,
    layer: Value,
    markers: Vec<MapMarker>,
}

impl ZoneMap {
    pub fn new(title: impl Into<String>, settings: &MapSettings, layer: Value) -> Self {
        Self {
            title: title.into(),
            settings: settings.clone(),
            layer,
            markers: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, marker: MapMarker) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn render(&self) -> Result<String> {
        let layer = script_json(&self.layer)?;
        let markers = script_json(&self.markers)?;
        let tiles = script_json(&self.settings.tiles)?;

        Ok(format!(
            r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
<script src="{js}"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; padding: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer({tiles}, {{
    maxZoom: 19,
    subdomains: "abcd",
    attribution: "&copy; OpenStreetMap contributors &copy; CARTO"
}}).addTo(map);
L.geoJSON({layer}).addTo(map);
var markers = {markers};
markers.forEach(function (m) {{
    var text = document.createElement("span");
    text.textContent = m.popup;
    L.circleMarker([m.latitude, m.longitude], {{
        color: m.color, fillColor: m.color, fillOpacity: 0.8, radius: 8
    }}).bindPopup(text).addTo(map);
}});
map.on("click", function (e) {{
    L.popup().setLatLng(e.latlng)
        .setContent("Latitude: " + e.latlng.lat.toFixed(4) + "<br>Longitude: " + e.latlng.lng.toFixed(4))
        .openOn(map);
}});
</script>
</body>
</html>
"##,
            title = escape_html(&self.title),
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            lat = self.settings.center_latitude,
            lon = self.settings.center_longitude,
            zoom = self.settings.zoom,
            tiles = tiles,
            layer = layer,
            markers = markers,
        ))
    }
}

pub fn marker_popup(species: &str, fishing_zone: &str, fao_zone: &str) -> String {
    format!(
        "Fish: {} Fishing Zone: {} FAO Zone: {}",
        species, fishing_zone, fao_zone
    )
}

/// 內嵌在 <script> 中的 JSON，避免字串提前結束 script 區塊
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
