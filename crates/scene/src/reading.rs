use foundation::math::is_valid_lat_lon;
use serde_json::{Map, Value};

/// Display-only passthrough fields (timestamps, sensor ids, ...).
pub type Metadata = Map<String, Value>;

/// A measurement as delivered by a data source, before coordinate validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadingRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub value: Option<f64>,
    pub metadata: Metadata,
}

impl ReadingRecord {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>, value: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            value,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A geolocated measurement with known-good coordinates.
///
/// Only obtainable through [`GeoReading::new`] or [`GeoReading::from_record`],
/// both of which reject missing, non-finite and out-of-range coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoReading {
    latitude: f64,
    longitude: f64,
    value: Option<f64>,
    metadata: Metadata,
}

impl GeoReading {
    pub fn new(latitude: f64, longitude: f64, value: Option<f64>) -> Option<Self> {
        if !is_valid_lat_lon(latitude, longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            value,
            metadata: Metadata::new(),
        })
    }

    pub fn from_record(record: &ReadingRecord) -> Option<Self> {
        let mut reading = Self::new(record.latitude?, record.longitude?, record.value)?;
        reading.metadata = record.metadata.clone();
        Some(reading)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Raw measurement, `None` when the source had no value.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Measurement used for classification.
    ///
    /// A missing value reads as `0.0`, which lands in the lowest severity band.
    /// A hole in the data therefore renders exactly like a clean reading; keep
    /// [`GeoReading::value`] around when the difference matters for display.
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoReading, Metadata, ReadingRecord};
    use serde_json::Value;

    #[test]
    fn rejects_missing_coordinates() {
        let no_lat = ReadingRecord::new(None, Some(1.0), Some(10.0));
        let no_lon = ReadingRecord::new(Some(1.0), None, Some(10.0));
        assert!(GeoReading::from_record(&no_lat).is_none());
        assert!(GeoReading::from_record(&no_lon).is_none());
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(GeoReading::new(91.0, 0.0, None).is_none());
        assert!(GeoReading::new(0.0, 181.0, None).is_none());
        assert!(GeoReading::new(f64::NAN, 0.0, None).is_none());
    }

    #[test]
    fn missing_value_reads_as_zero() {
        let reading = GeoReading::new(10.0, 20.0, None).expect("valid");
        assert_eq!(reading.value(), None);
        assert_eq!(reading.value_or_zero(), 0.0);
    }

    #[test]
    fn keeps_metadata_of_valid_records() {
        let mut meta = Metadata::new();
        meta.insert("sensor".to_string(), Value::from("dc-01"));
        let records = vec![
            ReadingRecord::new(Some(1.0), Some(1.0), Some(10.0)).with_metadata(meta.clone()),
            ReadingRecord::new(None, Some(1.0), Some(10.0)),
            ReadingRecord::new(Some(-2.0), Some(3.0), None),
        ];
        let readings: Vec<GeoReading> =
            records.iter().filter_map(GeoReading::from_record).collect();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].metadata(), &meta);
        assert_eq!(readings[1].latitude(), -2.0);
    }
}
