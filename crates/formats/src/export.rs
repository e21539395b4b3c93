use layers::legend::LegendEntry;
use layers::readings::{Marker, ReadingsLayer, ReadingsLayerSnapshot};
use layers::severity::SeverityScale;
use layers::summary::BandSummary;
use layers::symbology::MarkerStyle;
use layers::{Layer, LayerView};
use scene::components::Shape2D;
use scene::{Metadata, Projector, ScenePoint};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionRecord {
    Geographic { lat_deg: f64, lon_deg: f64 },
    Cartesian { x: f64, y: f64, z: f64 },
}

impl From<ScenePoint> for PositionRecord {
    fn from(p: ScenePoint) -> Self {
        match p {
            ScenePoint::Geographic { lat_deg, lon_deg } => {
                PositionRecord::Geographic { lat_deg, lon_deg }
            }
            ScenePoint::Cartesian(v) => PositionRecord::Cartesian {
                x: v.x,
                y: v.y,
                z: v.z,
            },
        }
    }
}

/// How every marker of a layer is drawn, minus the per-marker fill color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StyleRecord {
    Map {
        radius_px: f64,
        stroke_weight_px: f64,
        stroke_color: String,
        fill_opacity: f32,
    },
    Globe {
        core_radius: f64,
        core_opacity: f32,
        halo_radius: f64,
        halo_opacity: f32,
    },
}

impl From<&MarkerStyle> for StyleRecord {
    fn from(style: &MarkerStyle) -> Self {
        match style {
            MarkerStyle::Map {
                drawable,
                stroke_color,
                fill_opacity,
            } => {
                let Shape2D::Circle { radius_px } = drawable.shape;
                StyleRecord::Map {
                    radius_px,
                    stroke_weight_px: drawable.stroke_weight_px,
                    stroke_color: stroke_color.to_hex(),
                    fill_opacity: *fill_opacity,
                }
            }
            MarkerStyle::Globe { core, halo } => StyleRecord::Globe {
                core_radius: core.radius(),
                core_opacity: core.opacity,
                halo_radius: halo.radius(),
                halo_opacity: halo.opacity,
            },
        }
    }
}

/// One popup row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRecord {
    pub position: PositionRecord,
    pub color: String,
    /// Band color with the style's fill opacity, `[r, g, b, a]` in `0..=1`.
    pub fill: [f32; 4],
    pub label: String,
    pub band: usize,
    pub value: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub detail: Vec<DetailRecord>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl MarkerRecord {
    pub fn new(marker: &Marker, unit: &str, style: &MarkerStyle) -> Self {
        Self {
            position: marker.position.into(),
            color: marker.color.to_hex(),
            fill: style.fill_rgba(marker.color),
            label: marker.label.clone(),
            band: marker.band,
            value: marker.value,
            latitude: marker.latitude,
            longitude: marker.longitude,
            detail: marker
                .detail(unit)
                .into_iter()
                .map(|(name, value)| DetailRecord { name, value })
                .collect(),
            metadata: marker.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCountRecord {
    pub label: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub scale: String,
    pub total: usize,
    pub bands: Vec<BandCountRecord>,
}

impl SummaryRecord {
    pub fn new(scale: &SeverityScale, summary: &BandSummary) -> Self {
        Self {
            scale: scale.name().to_string(),
            total: summary.total,
            bands: summary
                .bands
                .iter()
                .map(|b| BandCountRecord {
                    label: b.label.clone(),
                    color: b.color.to_hex(),
                    count: b.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRecord {
    pub label: String,
    pub color: String,
    pub range: String,
}

impl From<&LegendEntry> for LegendRecord {
    fn from(e: &LegendEntry) -> Self {
        Self {
            label: e.label.clone(),
            color: e.color.to_hex(),
            range: e.range.clone(),
        }
    }
}

/// One render pass as handed to a rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRecord {
    pub view: String,
    pub scale: String,
    pub unit: String,
    pub visible: bool,
    pub style: StyleRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
    pub dropped: usize,
    pub markers: Vec<MarkerRecord>,
    pub summary: SummaryRecord,
}

impl RenderRecord {
    /// `summary` covers the whole feed, including records `snapshot` dropped.
    pub fn new<P: Projector>(
        layer: &ReadingsLayer<P>,
        snapshot: &ReadingsLayerSnapshot,
        summary: &BandSummary,
    ) -> Self {
        let view = layer.view();
        let scale = layer.scale();
        let style = layer.style();
        let center = (view == LayerView::Map).then(|| {
            let (lat, lon) = snapshot.map_center();
            [lat, lon]
        });
        Self {
            view: view.as_str().to_string(),
            scale: scale.name().to_string(),
            unit: scale.unit().to_string(),
            visible: style.visible,
            style: StyleRecord::from(&style.marker),
            center,
            dropped: snapshot.dropped,
            markers: snapshot
                .markers
                .iter()
                .map(|m| MarkerRecord::new(m, scale.unit(), &style.marker))
                .collect(),
            summary: SummaryRecord::new(scale, summary),
        }
    }
}

/// Map-view markers as a GeoJSON FeatureCollection of Points.
///
/// Coordinates follow GeoJSON order (`[lon, lat]`).
pub fn markers_to_geojson(snapshot: &ReadingsLayerSnapshot) -> Value {
    let mut features: Vec<Value> = Vec::with_capacity(snapshot.markers.len());
    for marker in &snapshot.markers {
        let mut properties = marker.metadata.clone();
        properties.insert("color".to_string(), Value::String(marker.color.to_hex()));
        properties.insert("label".to_string(), Value::String(marker.label.clone()));
        properties.insert(
            "value".to_string(),
            marker.value.map(Value::from).unwrap_or(Value::Null),
        );

        let mut geometry = Map::new();
        geometry.insert("type".to_string(), Value::String("Point".to_string()));
        geometry.insert(
            "coordinates".to_string(),
            Value::Array(vec![
                Value::from(marker.longitude),
                Value::from(marker.latitude),
            ]),
        );

        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        fobj.insert("properties".to_string(), Value::Object(properties));
        fobj.insert("geometry".to_string(), Value::Object(geometry));
        features.push(Value::Object(fobj));
    }

    let mut root = Map::new();
    root.insert(
        "type".to_string(),
        Value::String("FeatureCollection".to_string()),
    );
    root.insert("features".to_string(), Value::Array(features));
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::{RenderRecord, StyleRecord, markers_to_geojson};
    use foundation::Rgb;
    use layers::readings::ReadingsLayer;
    use layers::summary::summarize;
    use pretty_assertions::assert_eq;
    use scene::ReadingRecord;
    use serde_json::json;

    #[test]
    fn geojson_uses_lon_lat_order() {
        let layer = ReadingsLayer::map(1);
        let snap = layer.extract(&[ReadingRecord::new(Some(38.9), Some(-77.0), Some(5.0))]);
        assert_eq!(
            markers_to_geojson(&snap),
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"color": "#00e400", "label": "Good", "value": 5.0},
                    "geometry": {"type": "Point", "coordinates": [-77.0, 38.9]}
                }]
            })
        );
    }

    #[test]
    fn missing_value_exports_as_null() {
        let layer = ReadingsLayer::map(1);
        let snap = layer.extract(&[ReadingRecord::new(Some(1.0), Some(2.0), None)]);
        let geojson = markers_to_geojson(&snap);
        assert_eq!(geojson["features"][0]["properties"]["value"], json!(null));
    }

    #[test]
    fn render_record_for_globe() {
        let layer = ReadingsLayer::globe(1);
        let records = [
            ReadingRecord::new(Some(0.0), Some(0.0), Some(101.0)),
            ReadingRecord::new(None, None, Some(1.0)),
        ];
        let snap = layer.extract(&records);
        let summary = summarize(layer.scale(), records.iter().map(|r| r.value));
        let record = RenderRecord::new(&layer, &snap, &summary);
        let value = serde_json::to_value(&record).expect("serialize");

        assert_eq!(value["view"], json!("globe"));
        assert!(value.get("center").is_none());
        assert_eq!(value["dropped"], json!(1));
        assert_eq!(value["markers"][0]["position"]["kind"], json!("cartesian"));
        assert_eq!(value["markers"][0]["color"], json!("#f44336"));
        assert_eq!(value["summary"]["total"], json!(2));
        assert_eq!(value["summary"]["bands"][0]["count"], json!(1));
        assert_eq!(value["summary"]["bands"][2]["count"], json!(1));

        let x = value["markers"][0]["position"]["x"].as_f64().expect("x");
        assert!((x - 2.02).abs() < 1e-12);
    }

    #[test]
    fn render_record_carries_globe_style() {
        let layer = ReadingsLayer::globe(1);
        let snap = layer.extract(&[ReadingRecord::new(Some(0.0), Some(0.0), Some(10.0))]);
        let summary = summarize(layer.scale(), [Some(10.0)]);
        let record = RenderRecord::new(&layer, &snap, &summary);

        assert!(record.visible);
        assert_eq!(
            record.style,
            StyleRecord::Globe {
                core_radius: 0.02,
                core_opacity: 0.8,
                halo_radius: 0.03,
                halo_opacity: 0.3,
            }
        );
        assert_eq!(
            record.markers[0].fill,
            Rgb::from_u32(0x4CAF50).to_rgba_f32(0.8)
        );

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["style"]["kind"], json!("globe"));
    }

    #[test]
    fn render_record_for_map_has_center_and_style() {
        let layer = ReadingsLayer::map(1);
        let snap = layer.extract(&[]);
        let summary = summarize(layer.scale(), []);
        let record = RenderRecord::new(&layer, &snap, &summary);
        assert_eq!(record.center, Some([38.9072, -77.0369]));
        assert_eq!(record.unit, "µg/m³");
        assert_eq!(
            record.style,
            StyleRecord::Map {
                radius_px: 10.0,
                stroke_weight_px: 1.0,
                stroke_color: "#ffffff".to_string(),
                fill_opacity: 0.8,
            }
        );
    }

    #[test]
    fn markers_carry_popup_detail() {
        let layer = ReadingsLayer::map(1);
        let mut meta = scene::Metadata::new();
        meta.insert("sensor".to_string(), json!("dc-01"));
        let records = [
            ReadingRecord::new(Some(38.9072), Some(-77.0369), Some(18.0)).with_metadata(meta),
            ReadingRecord::new(Some(1.0), Some(2.0), None),
        ];
        let snap = layer.extract(&records);
        let summary = summarize(layer.scale(), records.iter().map(|r| r.value));
        let value = serde_json::to_value(RenderRecord::new(&layer, &snap, &summary))
            .expect("serialize");

        assert_eq!(
            value["markers"][0]["detail"],
            json!([
                {"name": "value", "value": "18 µg/m³"},
                {"name": "band", "value": "Moderate"},
                {"name": "coordinates", "value": "38.9072, -77.0369"},
                {"name": "sensor", "value": "dc-01"}
            ])
        );
        assert_eq!(value["markers"][1]["detail"][0]["value"], json!("n/a"));
    }
}
