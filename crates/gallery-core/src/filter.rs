//! Filter engine
//!
//! Computes the gallery's filtered view from the catalog and the active
//! [`FilterCriteria`]. The computation is pure: identical inputs always give
//! the same output, in catalog order.
//!
//! A record passes when both predicates pass:
//!
//! - **tag**: the lower-cased query is a substring of at least one lower-cased
//!   tag (an empty query matches everything)
//! - **date**: the record's upload day lies within `[date_start, date_end]`,
//!   bounds inclusive, an absent bound open on its side

use crate::models::{Catalog, FilterCriteria, FilteredView, PhotoRecord};

/// Compute the filtered view of `catalog` under `criteria`.
pub fn compute_view(catalog: &Catalog, criteria: &FilterCriteria) -> FilteredView {
    if criteria.is_unconstrained() {
        return catalog.records().to_vec();
    }

    let needle = criteria.tag_query.to_lowercase();
    catalog
        .iter()
        .filter(|record| matches_tag(record, &needle) && matches_date(record, criteria))
        .cloned()
        .collect()
}

/// `needle` must already be lower-cased.
fn matches_tag(record: &PhotoRecord, needle: &str) -> bool {
    needle.is_empty()
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn matches_date(record: &PhotoRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.has_date_bounds() {
        return true;
    }

    // Unparseable dates cannot be placed in a bounded range.
    let Some(day) = record.upload_day() else {
        return false;
    };

    criteria.date_start.map_or(true, |start| day >= start)
        && criteria.date_end.map_or(true, |end| day <= end)
}
