use foundation::Rgb;
use scene::{
    GeoReading, GlobeProjector, MapProjector, Metadata, Projector, ReadingRecord, ScenePoint,
};
use serde_json::Value;
use tracing::debug;

use crate::layer::{Layer, LayerId, LayerView};
use crate::severity::SeverityScale;
use crate::symbology::{LayerStyle, MarkerStyle};

/// Map center used when a render pass has no valid reading (Washington, DC).
pub const DEFAULT_MAP_CENTER: (f64, f64) = (38.9072, -77.0369);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: ScenePoint,
    pub color: Rgb,
    pub label: String,
    /// Index into the layer scale's bands.
    pub band: usize,
    /// Raw value; `None` when the source had none (classified as 0).
    pub value: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub metadata: Metadata,
}

impl Marker {
    /// Popup rows: value with unit, coordinates, then passthrough metadata.
    pub fn detail(&self, unit: &str) -> Vec<(String, String)> {
        let value = match self.value {
            Some(v) if unit.is_empty() => v.to_string(),
            Some(v) => format!("{v} {unit}"),
            None => "n/a".to_string(),
        };
        let mut pairs = vec![
            ("value".to_string(), value),
            ("band".to_string(), self.label.clone()),
            (
                "coordinates".to_string(),
                format!("{:.4}, {:.4}", self.latitude, self.longitude),
            ),
        ];
        for (k, v) in &self.metadata {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            pairs.push((k.clone(), text));
        }
        pairs
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadingsLayerSnapshot {
    /// One marker per valid reading, in input order.
    pub markers: Vec<Marker>,
    /// Records dropped for missing or invalid coordinates.
    pub dropped: usize,
}

impl ReadingsLayerSnapshot {
    /// Where a map view should center: the first marker, else the default.
    pub fn map_center(&self) -> (f64, f64) {
        self.markers
            .first()
            .map(|m| (m.latitude, m.longitude))
            .unwrap_or(DEFAULT_MAP_CENTER)
    }
}

/// Turns a collection of readings into one colored marker per reading.
///
/// Stateless: every call recomputes the full output from its input.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingsLayer<P: Projector> {
    id: LayerId,
    view: LayerView,
    projector: P,
    scale: SeverityScale,
    style: LayerStyle,
}

impl ReadingsLayer<MapProjector> {
    /// Flat map of PM2.5 concentrations.
    pub fn map(id: u64) -> Self {
        Self::new(
            id,
            LayerView::Map,
            MapProjector,
            SeverityScale::pm25(),
            LayerStyle::new(true, MarkerStyle::map_default()),
        )
    }
}

impl ReadingsLayer<GlobeProjector> {
    /// Globe of AQI values with the default marker lift.
    pub fn globe(id: u64) -> Self {
        Self::globe_with(id, GlobeProjector::default())
    }

    pub fn globe_with(id: u64, projector: GlobeProjector) -> Self {
        Self::new(
            id,
            LayerView::Globe,
            projector,
            SeverityScale::aqi(),
            LayerStyle::new(true, MarkerStyle::globe_default()),
        )
    }
}

impl<P: Projector> ReadingsLayer<P> {
    pub fn new(
        id: u64,
        view: LayerView,
        projector: P,
        scale: SeverityScale,
        style: LayerStyle,
    ) -> Self {
        Self {
            id: LayerId(id),
            view,
            projector,
            scale,
            style,
        }
    }

    pub fn with_scale(mut self, scale: SeverityScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn scale(&self) -> &SeverityScale {
        &self.scale
    }

    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    pub fn marker(&self, reading: &GeoReading) -> Marker {
        let band = self.scale.classify_index(reading.value_or_zero());
        let severity = &self.scale.bands()[band];
        Marker {
            position: self
                .projector
                .project(reading.latitude(), reading.longitude()),
            color: severity.color,
            label: severity.label.clone(),
            band,
            value: reading.value(),
            latitude: reading.latitude(),
            longitude: reading.longitude(),
            metadata: reading.metadata().clone(),
        }
    }

    /// Render raw records, skipping those without valid coordinates.
    pub fn extract(&self, records: &[ReadingRecord]) -> ReadingsLayerSnapshot {
        let mut out = ReadingsLayerSnapshot {
            markers: Vec::with_capacity(records.len()),
            dropped: 0,
        };
        for record in records {
            match GeoReading::from_record(record) {
                Some(reading) => out.markers.push(self.marker(&reading)),
                None => out.dropped += 1,
            }
        }
        if out.dropped > 0 {
            debug!(
                layer = self.id.0,
                view = self.view.as_str(),
                dropped = out.dropped,
                "skipped readings without valid coordinates"
            );
        }
        out
    }
}

impl<P: Projector> Layer for ReadingsLayer<P> {
    fn id(&self) -> LayerId {
        self.id
    }

    fn view(&self) -> LayerView {
        self.view
    }
}
