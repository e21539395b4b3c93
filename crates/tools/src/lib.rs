//! Command implementations behind the `atlas` binary.
//!
//! Commands return serializable records; printing is left to `main`.

use std::env;
use std::path::{Path, PathBuf};

use formats::{
    FeedError, LegendRecord, Metric, RenderRecord, ScaleFileError, SummaryRecord,
    load_scale_file, markers_to_geojson, parse_feed_str,
};
use layers::{Layer, LayerView};
use layers::legend::legend;
use layers::readings::ReadingsLayer;
use layers::severity::SeverityScale;
use layers::summary::summarize;
use scene::{DEFAULT_GLOBE_RADIUS, DEFAULT_MARKER_LIFT, GlobeProjector, Projector, ReadingRecord};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum View {
    /// Flat map, PM2.5 scale
    Map,
    /// 3D globe, AQI scale
    Globe,
}

impl View {
    pub fn metric(self) -> Metric {
        match self {
            View::Map => Metric::Pm25,
            View::Globe => Metric::Aqi,
        }
    }

    pub fn default_scale(self) -> SeverityScale {
        match self {
            View::Map => SeverityScale::pm25(),
            View::Globe => SeverityScale::aqi(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Geojson,
}

#[derive(Debug)]
pub enum ToolError {
    Io { path: PathBuf, source: std::io::Error },
    Feed { path: PathBuf, source: FeedError },
    Scale(ScaleFileError),
    Json(serde_json::Error),
    InvalidConfig(String),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Io { path, source } => write!(f, "read {}: {source}", path.display()),
            ToolError::Feed { path, source } => write!(f, "feed {}: {source}", path.display()),
            ToolError::Scale(e) => write!(f, "scale file: {e}"),
            ToolError::Json(e) => write!(f, "json: {e}"),
            ToolError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {}

/// Globe geometry, from `ATLAS_GLOBE_RADIUS` / `ATLAS_MARKER_LIFT` unless overridden.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeConfig {
    pub globe_radius: f64,
    pub lift: f64,
}

impl GlobeConfig {
    pub fn from_env() -> Self {
        Self {
            globe_radius: env_var_f64("ATLAS_GLOBE_RADIUS", DEFAULT_GLOBE_RADIUS),
            lift: env_var_f64("ATLAS_MARKER_LIFT", DEFAULT_MARKER_LIFT),
        }
    }

    pub fn with_overrides(mut self, globe_radius: Option<f64>, lift: Option<f64>) -> Self {
        if let Some(r) = globe_radius {
            self.globe_radius = r;
        }
        if let Some(l) = lift {
            self.lift = l;
        }
        self
    }

    pub fn projector(self) -> Result<GlobeProjector, ToolError> {
        if !(self.globe_radius.is_finite() && self.globe_radius > 0.0) {
            return Err(ToolError::InvalidConfig(format!(
                "globe radius must be positive, got {}",
                self.globe_radius
            )));
        }
        if !(self.lift.is_finite() && self.lift >= 0.0) {
            return Err(ToolError::InvalidConfig(format!(
                "marker lift must be non-negative, got {}",
                self.lift
            )));
        }
        Ok(GlobeProjector::new(self.globe_radius, self.lift))
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            globe_radius: DEFAULT_GLOBE_RADIUS,
            lift: DEFAULT_MARKER_LIFT,
        }
    }
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

pub fn load_records(path: &Path, metric: Metric) -> Result<Vec<ReadingRecord>, ToolError> {
    let payload = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed_str(&payload, metric).map_err(|source| ToolError::Feed {
        path: path.to_path_buf(),
        source,
    })
}

pub fn resolve_scale(view: View, scale_file: Option<&Path>) -> Result<SeverityScale, ToolError> {
    match scale_file {
        Some(path) => load_scale_file(path).map_err(ToolError::Scale),
        None => Ok(view.default_scale()),
    }
}

pub fn render(
    view: View,
    records: &[ReadingRecord],
    scale: SeverityScale,
    globe: GlobeConfig,
    format: OutputFormat,
) -> Result<Value, ToolError> {
    match view {
        View::Map => render_layer(&ReadingsLayer::map(1).with_scale(scale), records, format),
        View::Globe => render_layer(
            &ReadingsLayer::globe_with(1, globe.projector()?).with_scale(scale),
            records,
            format,
        ),
    }
}

fn render_layer<P: Projector>(
    layer: &ReadingsLayer<P>,
    records: &[ReadingRecord],
    format: OutputFormat,
) -> Result<Value, ToolError> {
    let snapshot = layer.extract(records);
    let counts = summarize(layer.scale(), records.iter().map(|r| r.value));
    info!(
        view = layer.view().as_str(),
        markers = snapshot.markers.len(),
        dropped = snapshot.dropped,
        "rendered readings"
    );

    match format {
        OutputFormat::Json => {
            serde_json::to_value(RenderRecord::new(layer, &snapshot, &counts))
                .map_err(ToolError::Json)
        }
        OutputFormat::Geojson if layer.view() == LayerView::Map => {
            Ok(markers_to_geojson(&snapshot))
        }
        OutputFormat::Geojson => Err(ToolError::InvalidConfig(
            "geojson output is only available for the map view".to_string(),
        )),
    }
}

/// Band counts over every record of a feed, positioned or not.
pub fn summary(records: &[ReadingRecord], scale: &SeverityScale) -> SummaryRecord {
    let counts = summarize(scale, records.iter().map(|r| r.value));
    SummaryRecord::new(scale, &counts)
}

pub fn legend_records(scale: &SeverityScale) -> Vec<LegendRecord> {
    legend(scale).iter().map(LegendRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::{
        GlobeConfig, OutputFormat, ToolError, View, legend_records, load_records, render,
        resolve_scale, summary,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    const GLOBE_FEED: &str = r#"{"count": 6, "results": [
        {"latitude": 40.7128, "longitude": -74.0060, "aqi": 45},
        {"latitude": 34.0522, "longitude": -118.2437, "aqi": 75},
        {"latitude": 41.8781, "longitude": -87.6298, "aqi": 120},
        {"latitude": 29.7604, "longitude": -95.3698, "aqi": 65},
        {"latitude": 37.7749, "longitude": -122.4194, "aqi": 35},
        {"latitude": null, "longitude": 1.0, "aqi": 300}
    ]}"#;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn globe_render_from_feed_file() {
        let file = write_temp(GLOBE_FEED);
        let records = load_records(file.path(), View::Globe.metric()).expect("records");
        assert_eq!(records.len(), 6);

        let out = render(
            View::Globe,
            &records,
            View::Globe.default_scale(),
            GlobeConfig::default(),
            OutputFormat::Json,
        )
        .expect("render");
        assert_eq!(out["markers"].as_array().map(|m| m.len()), Some(5));
        assert_eq!(out["dropped"], json!(1));
        assert_eq!(out["markers"][2]["label"], json!("Poor"));
        assert_eq!(out["style"]["kind"], json!("globe"));
        assert_eq!(out["markers"][0]["detail"][1]["value"], json!("Good"));
        assert_eq!(out["summary"]["total"], json!(6));
        assert_eq!(out["summary"]["bands"][2]["count"], json!(2));
    }

    #[test]
    fn summary_counts_every_record() {
        let file = write_temp(GLOBE_FEED);
        let records = load_records(file.path(), View::Globe.metric()).expect("records");
        let scale = View::Globe.default_scale();
        let record = summary(&records, &scale);
        assert_eq!(record.total, 6);
        let counts: Vec<usize> = record.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 2]);
    }

    #[test]
    fn summary_includes_records_without_coordinates() {
        let file = write_temp(
            r#"[
                {"latitude": 1, "longitude": 1, "aqi": 45},
                {"aqi": 300},
                {"latitude": 2, "longitude": 2, "aqi": 75},
                {"name": "no position, no value"}
            ]"#,
        );
        let records = load_records(file.path(), View::Globe.metric()).expect("records");
        let record = summary(&records, &View::Globe.default_scale());
        assert_eq!(record.total, 4);
        let counts: Vec<usize> = record.bands.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
    }

    #[test]
    fn geojson_is_map_only() {
        let records = vec![scene::ReadingRecord::new(Some(1.0), Some(2.0), Some(3.0))];
        let map = render(
            View::Map,
            &records,
            View::Map.default_scale(),
            GlobeConfig::default(),
            OutputFormat::Geojson,
        )
        .expect("map geojson");
        assert_eq!(map["type"], json!("FeatureCollection"));

        let globe = render(
            View::Globe,
            &records,
            View::Globe.default_scale(),
            GlobeConfig::default(),
            OutputFormat::Geojson,
        );
        assert!(matches!(globe, Err(ToolError::InvalidConfig(_))));
    }

    #[test]
    fn globe_config_overrides_and_validation() {
        let cfg = GlobeConfig::default().with_overrides(Some(1.0), Some(0.0));
        let projector = cfg.projector().expect("valid");
        assert_eq!(projector.marker_radius(), 1.0);

        assert!(GlobeConfig::default().with_overrides(Some(0.0), None).projector().is_err());
        assert!(GlobeConfig::default().with_overrides(None, Some(-0.5)).projector().is_err());
        assert!(GlobeConfig::default().with_overrides(Some(f64::NAN), None).projector().is_err());
    }

    #[test]
    fn custom_scale_file_replaces_default() {
        let file = write_temp(
            r##"{"name": "Binary", "closure": "lower_inclusive", "bands": [
                {"label": "Fine", "color": "#00ff00", "upper": 20},
                {"label": "Bad", "color": "#ff0000"}
            ]}"##,
        );
        let scale = resolve_scale(View::Map, Some(file.path())).expect("scale");
        assert_eq!(scale.name(), "Binary");
        let legend = legend_records(&scale);
        assert_eq!(legend[0].range, "< 20");
        assert_eq!(legend[1].color, "#ff0000");

        assert_eq!(resolve_scale(View::Map, None).expect("default").name(), "PM2.5");
    }

    #[test]
    fn reports_missing_and_malformed_inputs() {
        let missing = load_records(
            std::path::Path::new("/nonexistent/feed.json"),
            View::Map.metric(),
        );
        assert!(matches!(missing, Err(ToolError::Io { .. })));

        let file = write_temp(r#"{"detail": "Service unavailable"}"#);
        let bad = load_records(file.path(), View::Map.metric());
        assert!(matches!(bad, Err(ToolError::Feed { .. })));
    }
}
