//! Severity scales: ordered, colored bands over one measurement unit.
//!
//! AQI (a unitless index) and PM2.5 (µg/m³) are kept as separate scales with
//! their own constructors. They are not interchangeable: classifying a PM2.5
//! concentration on the AQI scale gives a meaningless band.

use foundation::Rgb;

/// Which edge of each band is closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundClosure {
    /// `lower < v <= upper`
    UpperInclusive,
    /// `lower <= v < upper`
    LowerInclusive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeverityBand {
    /// `-inf` for the first band.
    pub lower: f64,
    /// `+inf` for the last band.
    pub upper: f64,
    pub color: Rgb,
    pub label: String,
}

impl SeverityBand {
    pub fn contains(&self, value: f64, closure: BoundClosure) -> bool {
        match closure {
            BoundClosure::UpperInclusive => self.lower < value && value <= self.upper,
            BoundClosure::LowerInclusive => self.lower <= value && value < self.upper,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleError {
    Empty,
    BandCountMismatch { bands: usize, thresholds: usize },
    NonFiniteThreshold { index: usize },
    NotAscending { index: usize },
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::Empty => write!(f, "severity scale needs at least one band"),
            ScaleError::BandCountMismatch { bands, thresholds } => write!(
                f,
                "{bands} bands need {} thresholds, got {thresholds}",
                bands.saturating_sub(1)
            ),
            ScaleError::NonFiniteThreshold { index } => {
                write!(f, "threshold {index} is not a finite number")
            }
            ScaleError::NotAscending { index } => {
                write!(f, "threshold {index} is not above the previous one")
            }
        }
    }
}

impl std::error::Error for ScaleError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SeverityScale {
    name: String,
    unit: String,
    closure: BoundClosure,
    bands: Vec<SeverityBand>,
}

impl SeverityScale {
    /// Build a scale from the `n - 1` thresholds separating `n` bands.
    ///
    /// Thresholds must be finite and strictly ascending.
    pub fn try_new(
        name: impl Into<String>,
        unit: impl Into<String>,
        closure: BoundClosure,
        thresholds: &[f64],
        bands: Vec<(String, Rgb)>,
    ) -> Result<Self, ScaleError> {
        if bands.is_empty() {
            return Err(ScaleError::Empty);
        }
        if thresholds.len() + 1 != bands.len() {
            return Err(ScaleError::BandCountMismatch {
                bands: bands.len(),
                thresholds: thresholds.len(),
            });
        }
        for (index, t) in thresholds.iter().enumerate() {
            if !t.is_finite() {
                return Err(ScaleError::NonFiniteThreshold { index });
            }
            if index > 0 && *t <= thresholds[index - 1] {
                return Err(ScaleError::NotAscending { index });
            }
        }
        Ok(Self::assemble(name, unit, closure, thresholds, bands))
    }

    fn assemble(
        name: impl Into<String>,
        unit: impl Into<String>,
        closure: BoundClosure,
        thresholds: &[f64],
        bands: Vec<(String, Rgb)>,
    ) -> Self {
        let bands = bands
            .into_iter()
            .enumerate()
            .map(|(i, (label, color))| SeverityBand {
                lower: if i == 0 {
                    f64::NEG_INFINITY
                } else {
                    thresholds[i - 1]
                },
                upper: thresholds.get(i).copied().unwrap_or(f64::INFINITY),
                color,
                label,
            })
            .collect();
        Self {
            name: name.into(),
            unit: unit.into(),
            closure,
            bands,
        }
    }

    /// Coarse three-band AQI scale used by the globe view.
    pub fn aqi() -> Self {
        Self::assemble(
            "AQI",
            "",
            BoundClosure::UpperInclusive,
            &[50.0, 100.0],
            vec![
                ("Good".to_string(), Rgb::from_u32(0x4CAF50)),
                ("Moderate".to_string(), Rgb::from_u32(0xFF9800)),
                ("Poor".to_string(), Rgb::from_u32(0xF44336)),
            ],
        )
    }

    /// EPA-style six-band PM2.5 scale (µg/m³) used by the map view.
    pub fn pm25() -> Self {
        Self::assemble(
            "PM2.5",
            "µg/m³",
            BoundClosure::LowerInclusive,
            &[12.0, 35.4, 55.4, 150.4, 250.4],
            vec![
                ("Good".to_string(), Rgb::from_u32(0x00e400)),
                ("Moderate".to_string(), Rgb::from_u32(0xffff00)),
                (
                    "Unhealthy for Sensitive Groups".to_string(),
                    Rgb::from_u32(0xff7e00),
                ),
                ("Unhealthy".to_string(), Rgb::from_u32(0xff0000)),
                ("Very Unhealthy".to_string(), Rgb::from_u32(0x99004c)),
                ("Hazardous".to_string(), Rgb::from_u32(0x7e0023)),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn closure(&self) -> BoundClosure {
        self.closure
    }

    pub fn bands(&self) -> &[SeverityBand] {
        &self.bands
    }

    /// Index of the band containing `value`.
    ///
    /// Bands are checked in ascending order and the first match wins. Values
    /// no band contains (NaN, +inf under lower-inclusive bounds, -inf under
    /// upper-inclusive bounds) go to the top band when positive and to the
    /// bottom band otherwise.
    pub fn classify_index(&self, value: f64) -> usize {
        self.bands
            .iter()
            .position(|band| band.contains(value, self.closure))
            .unwrap_or(if value > 0.0 { self.bands.len() - 1 } else { 0 })
    }

    pub fn classify(&self, value: f64) -> &SeverityBand {
        &self.bands[self.classify_index(value)]
    }
}

/// Band for `value` on `scale`. Callers substitute `0.0` for missing values.
pub fn classify(value: f64, scale: &SeverityScale) -> &SeverityBand {
    scale.classify(value)
}
