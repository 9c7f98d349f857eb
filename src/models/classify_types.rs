use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Report keys that summarise every class instead of describing one.
pub const AGGREGATE_KEYS: [&str; 3] = ["accuracy", "macro avg", "weighted avg"];

/// A string-keyed map that keeps the order keys arrived in.
///
/// The service sends labels in the order they should be displayed, so the
/// distribution and the classification report must not be re-sorted.
/// A repeated key overwrites the earlier value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Payload of a successful classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub num_samples: u64,
    pub file_size_mb: f64,
    pub processing_time: f64,
    pub device_used: String,
    pub distribution: OrderedMap<u64>,
    pub predictions: Vec<String>,
    pub confidence_scores: Vec<f64>,
    /// Base64 PNG without a `data:` prefix.
    #[serde(default)]
    pub confusion_matrix_img: Option<String>,
    #[serde(default)]
    pub classification_report: Option<OrderedMap<ReportEntry>>,
    /// Cluster ids assigned to each sample by the service.
    #[serde(default)]
    pub pseudo_labels: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    #[serde(default, deserialize_with = "lenient_metric")]
    pub precision: Option<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub recall: Option<f64>,
    #[serde(default, alias = "f1-score", deserialize_with = "lenient_metric")]
    pub f1_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_support")]
    pub support: Option<u64>,
}

/// One value of the classification report: either a metrics row or a bare
/// number (the service sends `accuracy` as a plain float).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Metrics(ClassMetrics),
    Scalar(Option<f64>),
}

impl ReportEntry {
    pub fn metrics(&self) -> Option<&ClassMetrics> {
        match self {
            Self::Metrics(m) => Some(m),
            Self::Scalar(_) => None,
        }
    }

    /// Value shown in the accuracy row. For a metrics object the recall is
    /// used, which equals accuracy when computed over all samples.
    pub fn accuracy_value(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => *v,
            Self::Metrics(m) => m.recall,
        }
    }
}

impl<'de> Deserialize<'de> for ReportEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(_) => ClassMetrics::deserialize(value)
                .map(ReportEntry::Metrics)
                .map_err(serde::de::Error::custom),
            other => Ok(ReportEntry::Scalar(metric_from_value(&other))),
        }
    }
}

/// Reads a metric that may be a number, null, or a string such as "NaN".
fn metric_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_metric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(metric_from_value(&value))
}

fn lenient_support<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match metric_from_value(&value) {
        Some(v) if v.is_finite() && v >= 0.0 => Some(v.round() as u64),
        _ => None,
    })
}

/// Envelope returned by the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<ClassificationResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_keeps_wire_order() {
        let json = r#"{"voip": 3, "chat": 1, "streaming": 2}"#;
        let map: OrderedMap<u64> = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["voip", "chat", "streaming"]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"voip":3,"chat":1,"streaming":2}"#);
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let map: OrderedMap<u64> = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 5}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next(), Some(("a", &5)));
    }

    #[test]
    fn report_accepts_service_shape() {
        let json = r#"{
            "chat": {"precision": 0.9, "recall": 0.8, "f1-score": 0.85, "support": 10},
            "email": {"precision": null, "recall": "NaN", "f1_score": 0.5, "support": 4.0},
            "accuracy": 0.82,
            "macro avg": {"precision": 0.7, "recall": 0.6, "f1-score": 0.65, "support": 14},
            "weighted avg": {"precision": 0.75, "recall": 0.7, "f1-score": 0.72, "support": 14}
        }"#;
        let report: OrderedMap<ReportEntry> = serde_json::from_str(json).unwrap();

        let chat = report.get("chat").and_then(ReportEntry::metrics).unwrap();
        assert_eq!(chat.f1_score, Some(0.85));
        assert_eq!(chat.support, Some(10));

        let email = report.get("email").and_then(ReportEntry::metrics).unwrap();
        assert_eq!(email.precision, None);
        assert!(email.recall.unwrap().is_nan());
        assert_eq!(email.support, Some(4));

        assert_eq!(report.get("accuracy").unwrap().accuracy_value(), Some(0.82));
    }

    #[test]
    fn upload_response_failure_shape() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"success": false, "error": "bad columns"}"#).unwrap();
        assert!(!response.success);
        assert!(response.results.is_none());
        assert_eq!(response.error.as_deref(), Some("bad columns"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{
            "num_samples": 2, "file_size_mb": 0.01, "processing_time": 0.5,
            "device_used": "/CPU:0", "distribution": {"chat": 2},
            "predictions": ["chat", "chat"], "confidence_scores": [0.9, 0.8]
        }"#;
        let result: ClassificationResult = serde_json::from_str(json).unwrap();
        assert!(result.confusion_matrix_img.is_none());
        assert!(result.classification_report.is_none());
        assert!(result.pseudo_labels.is_none());
    }
}
