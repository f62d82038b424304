use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Pixel dimensions of a photo or its thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One stored photo as reported by `GET /photos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Backend-assigned identifier, stable for the record's lifetime
    pub photo_id: String,
    /// Original upload filename (display only)
    pub filename: String,
    /// ISO 8601 timestamp set by the backend when processing completed
    pub upload_date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnail_url: String,
    pub photo_url: String,
    /// Absent until the backend has measured the original
    #[serde(
        default,
        deserialize_with = "dimensions_or_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub dimensions: Option<Dimensions>,
    #[serde(
        default,
        deserialize_with = "dimensions_or_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl PhotoRecord {
    /// Calendar day of `upload_date`, taken in the timestamp's own offset.
    ///
    /// Accepts RFC 3339 timestamps, offset-less date-times and bare dates.
    /// Returns `None` when the value is none of those.
    pub fn upload_day(&self) -> Option<NaiveDate> {
        upload_day(&self.upload_date)
    }
}

pub(crate) fn upload_day(timestamp: &str) -> Option<NaiveDate> {
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = timestamp.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    timestamp.parse::<NaiveDate>().ok()
}

#[derive(Deserialize)]
struct PartialDimensions {
    width: Option<u32>,
    height: Option<u32>,
}

/// The backend sends `{}` while dimensions are still being computed.
fn dimensions_or_empty<'de, D>(deserializer: D) -> Result<Option<Dimensions>, D::Error>
where
    D: Deserializer<'de>,
{
    let partial = Option::<PartialDimensions>::deserialize(deserializer)?;
    Ok(partial.and_then(|p| match (p.width, p.height) {
        (Some(width), Some(height)) => Some(Dimensions { width, height }),
        _ => None,
    }))
}

/// Ordered subsequence of the catalog matching the active filter criteria.
pub type FilteredView = Vec<PhotoRecord>;

/// The client's in-memory set of known photos, keyed by `photo_id`.
///
/// Order is the order the backend listed the records in. No two records
/// share a `photo_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<PhotoRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a reload payload. Duplicate ids keep their first occurrence.
    pub fn from_records(records: Vec<PhotoRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.photo_id.clone()) {
                unique.push(record);
            } else {
                tracing::warn!(
                    photo_id = %record.photo_id,
                    "Dropping duplicate photo id from catalog payload"
                );
            }
        }

        Self { records: unique }
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotoRecord> {
        self.records.iter()
    }

    pub fn get(&self, photo_id: &str) -> Option<&PhotoRecord> {
        self.records.iter().find(|r| r.photo_id == photo_id)
    }

    pub fn contains(&self, photo_id: &str) -> bool {
        self.get(photo_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove a record, preserving the order of the rest.
    pub fn remove(&mut self, photo_id: &str) -> Option<PhotoRecord> {
        let index = self.records.iter().position(|r| r.photo_id == photo_id)?;
        Some(self.records.remove(index))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.photo_id.as_str()).collect()
    }
}

impl From<Vec<PhotoRecord>> for Catalog {
    fn from(records: Vec<PhotoRecord>) -> Self {
        Self::from_records(records)
    }
}
