use chrono::NaiveDate;
use gallery_core::models::FilterCriteria;
use std::path::Path;

/// Content type for an image file, inferred from its extension.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Build filter criteria from `list` arguments.
pub fn criteria_from_args(
    tag: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> FilterCriteria {
    FilterCriteria::new()
        .with_tag(tag.unwrap_or_default())
        .with_date_start(from)
        .with_date_end(to)
}


/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
