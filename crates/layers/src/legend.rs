use foundation::Rgb;

use crate::severity::{BoundClosure, SeverityBand, SeverityScale};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    /// Human-readable value range, e.g. `≤ 50` or `12 – 35.4`.
    pub range: String,
}

pub fn legend(scale: &SeverityScale) -> Vec<LegendEntry> {
    scale
        .bands()
        .iter()
        .map(|band| LegendEntry {
            label: band.label.clone(),
            color: band.color,
            range: range_text(band, scale.closure()),
        })
        .collect()
}

fn range_text(band: &SeverityBand, closure: BoundClosure) -> String {
    let has_lower = band.lower.is_finite();
    let has_upper = band.upper.is_finite();
    match (has_lower, has_upper, closure) {
        (false, false, _) => "all values".to_string(),
        (false, true, BoundClosure::UpperInclusive) => format!("≤ {}", band.upper),
        (false, true, BoundClosure::LowerInclusive) => format!("< {}", band.upper),
        (true, false, BoundClosure::UpperInclusive) => format!("> {}", band.lower),
        (true, false, BoundClosure::LowerInclusive) => format!("≥ {}", band.lower),
        (true, true, _) => format!("{} – {}", band.lower, band.upper),
    }
}
