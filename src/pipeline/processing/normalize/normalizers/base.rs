use std::collections::HashMap;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use super::super::EventNormalizer;
use crate::domain::CanonicalEvent;
use crate::error::{NormalizeError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::parser::ParsedRecord;
use crate::types::{EventKind, RawEventRecord};

/// A wrapper that adds metrics to any normalizer implementation
pub struct MetricsNormalizer<N: EventNormalizer> {
    inner: N,
}

impl<N: EventNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: EventNormalizer> EventNormalizer for MetricsNormalizer<N> {
    fn normalize(&self, record: &ParsedRecord<'_>) -> Result<CanonicalEvent> {
        match self.inner.normalize(record) {
            Ok(event) => {
                metrics::normalize::record_normalized(self.inner.kind_label());
                Ok(event)
            }
            Err(e) => {
                warn!(
                    normalizer = self.inner.name(),
                    object_id = ?record.object_id,
                    error = %e,
                    "normalization failed"
                );
                metrics::normalize::decode_error(self.inner.kind_label());
                Err(e)
            }
        }
    }

    fn kind_label(&self) -> &'static str {
        self.inner.kind_label()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Decode the raw document into the typed shape for `kind`.
pub fn decode<T: DeserializeOwned>(kind: EventKind, record: &RawEventRecord) -> Result<T> {
    T::deserialize(record).map_err(|source| NormalizeError::Decode { kind, source })
}

/// Group items by key, keeping both the groups and their members in first-seen order.
pub fn group_in_first_seen_order<T, K, F>(
    items: impl IntoIterator<Item = T>,
    key: F,
) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Issue metadata shared by the bulletin shapes
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IssueInfo {
    pub time: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub serial: String,
}
