use std::path::{Path, PathBuf};

use foundation::{ColorParseError, Rgb};
use layers::severity::{BoundClosure, ScaleError, SeverityScale};
use serde::{Deserialize, Serialize};

/// On-disk severity scale.
///
/// ```json
/// { "name": "PM10", "unit": "µg/m³", "closure": "lower_inclusive",
///   "bands": [ { "label": "Good", "color": "#00e400", "upper": 55 },
///              { "label": "Bad",  "color": "#ff0000" } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaleFile {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub closure: ClosureName,
    pub bands: Vec<BandEntry>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClosureName {
    UpperInclusive,
    LowerInclusive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BandEntry {
    pub label: String,
    pub color: String,
    /// Required on every band except the last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

#[derive(Debug)]
pub enum ScaleFileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Color {
        band: usize,
        source: ColorParseError,
    },
    MissingUpper {
        band: usize,
    },
    UnexpectedUpper,
    Scale(ScaleError),
}

impl std::fmt::Display for ScaleFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleFileError::Io { path, source } => {
                write!(f, "failed to read scale {}: {source}", path.display())
            }
            ScaleFileError::Json(e) => write!(f, "invalid scale JSON: {e}"),
            ScaleFileError::Color { band, source } => write!(f, "band {band}: {source}"),
            ScaleFileError::MissingUpper { band } => {
                write!(f, "band {band} needs an `upper` bound")
            }
            ScaleFileError::UnexpectedUpper => {
                write!(f, "the last band is open-ended and must not set `upper`")
            }
            ScaleFileError::Scale(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScaleFileError {}

impl From<ClosureName> for BoundClosure {
    fn from(c: ClosureName) -> Self {
        match c {
            ClosureName::UpperInclusive => BoundClosure::UpperInclusive,
            ClosureName::LowerInclusive => BoundClosure::LowerInclusive,
        }
    }
}

impl ScaleFile {
    pub fn into_scale(self) -> Result<SeverityScale, ScaleFileError> {
        let last = self.bands.len().saturating_sub(1);
        let mut thresholds = Vec::with_capacity(last);
        let mut bands = Vec::with_capacity(self.bands.len());

        for (band, entry) in self.bands.into_iter().enumerate() {
            let color = Rgb::parse_hex(&entry.color)
                .map_err(|source| ScaleFileError::Color { band, source })?;
            match (band < last, entry.upper) {
                (true, Some(upper)) => thresholds.push(upper),
                (true, None) => return Err(ScaleFileError::MissingUpper { band }),
                (false, Some(_)) => return Err(ScaleFileError::UnexpectedUpper),
                (false, None) => {}
            }
            bands.push((entry.label, color));
        }

        SeverityScale::try_new(
            self.name,
            self.unit,
            self.closure.into(),
            &thresholds,
            bands,
        )
        .map_err(ScaleFileError::Scale)
    }
}

pub fn load_scale_str(payload: &str) -> Result<SeverityScale, ScaleFileError> {
    let file: ScaleFile = serde_json::from_str(payload).map_err(ScaleFileError::Json)?;
    file.into_scale()
}

pub fn load_scale_file(path: impl AsRef<Path>) -> Result<SeverityScale, ScaleFileError> {
    let path = path.as_ref();
    let payload = std::fs::read_to_string(path).map_err(|source| ScaleFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_scale_str(&payload)
}
