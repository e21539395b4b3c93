use foundation::Rgb;

use crate::severity::SeverityScale;

#[derive(Debug, Clone, PartialEq)]
pub struct BandCount {
    pub label: String,
    pub color: Rgb,
    pub count: usize,
}

/// Per-band tally over a feed, in scale order.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSummary {
    pub total: usize,
    pub bands: Vec<BandCount>,
}

impl BandSummary {
    fn empty(scale: &SeverityScale) -> Self {
        Self {
            total: 0,
            bands: scale
                .bands()
                .iter()
                .map(|b| BandCount {
                    label: b.label.clone(),
                    color: b.color,
                    count: 0,
                })
                .collect(),
        }
    }

    // Out-of-range indices are ignored.
    fn from_band_indices(scale: &SeverityScale, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut out = Self::empty(scale);
        for index in indices {
            if let Some(band) = out.bands.get_mut(index) {
                band.count += 1;
                out.total += 1;
            }
        }
        out
    }
}

/// Classify raw values and tally them; missing values count as `0.0`.
pub fn summarize(
    scale: &SeverityScale,
    values: impl IntoIterator<Item = Option<f64>>,
) -> BandSummary {
    BandSummary::from_band_indices(
        scale,
        values
            .into_iter()
            .map(|v| scale.classify_index(v.unwrap_or(0.0))),
    )
}
