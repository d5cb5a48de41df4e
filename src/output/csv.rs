//! In-memory CSV encoding with a UTF-8 byte-order mark.
//!
//! The encoder is pure and domain-blind: it turns a header plus string rows
//! into RFC4180 text. The BOM prefix lets spreadsheet applications detect
//! the encoding when the file is opened by double-click.

use super::{OutputError, OutputResult};
use crate::Post;
use chrono::NaiveDate;
use csv::Writer;

/// UTF-8 byte-order mark prepended to every encoded table.
pub const UTF8_BOM: &str = "\u{feff}";

/// Fixed column order for exported posts.
pub const CSV_HEADER: [&str; 8] = [
    "Name",
    "Tagline",
    "Description",
    "Votes",
    "Makers",
    "Hunter",
    "Website",
    "Product Hunt URL",
];

/// Encode a header row plus data rows into CSV text.
///
/// Cells containing a comma, a double-quote, or a line break are wrapped in
/// double-quotes with inner quotes doubled; all other cells pass through
/// unescaped. Rows are terminated with `\n`. The output starts with the
/// UTF-8 BOM.
pub fn encode_table(header: &[&str], rows: &[Vec<String>]) -> OutputResult<String> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(header)
        .map_err(|e| OutputError::CsvError(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| OutputError::CsvError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::CsvError(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| OutputError::EncodingError(e.to_string()))?;

    Ok(format!("{UTF8_BOM}{text}"))
}

/// Map one post to its cells, matching [`CSV_HEADER`] order.
pub fn post_row(post: &Post) -> Vec<String> {
    let makers = post
        .makers
        .iter()
        .map(|m| m.display())
        .collect::<Vec<_>>()
        .join("; ");
    let hunter = post
        .user
        .as_ref()
        .map(|u| u.display())
        .unwrap_or_default();

    vec![
        post.name.clone(),
        post.tagline.clone(),
        post.description.clone().unwrap_or_default(),
        post.votes_count.to_string(),
        makers,
        hunter,
        post.website.clone().unwrap_or_default(),
        post.url.clone(),
    ]
}

/// Download filename for one day's export.
pub fn csv_filename(date: NaiveDate) -> String {
    format!("product-hunt-posts-{}.csv", date.format("%Y-%m-%d"))
}
