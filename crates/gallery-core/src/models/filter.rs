use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Active filter for the gallery view.
///
/// An empty `tag_query` matches every record; an absent date bound leaves
/// that side of the range open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub tag_query: String,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag_query: impl Into<String>) -> Self {
        self.tag_query = tag_query.into();
        self
    }

    pub fn with_date_start(mut self, date_start: Option<NaiveDate>) -> Self {
        self.date_start = date_start;
        self
    }

    pub fn with_date_end(mut self, date_end: Option<NaiveDate>) -> Self {
        self.date_end = date_end;
        self
    }

    pub fn has_date_bounds(&self) -> bool {
        self.date_start.is_some() || self.date_end.is_some()
    }

    /// True when every record passes.
    pub fn is_unconstrained(&self) -> bool {
        self.tag_query.is_empty() && !self.has_date_bounds()
    }
}
