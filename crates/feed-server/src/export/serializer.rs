//! Feed rendering
//!
//! Renders a slice of [`FeedItem`]s into one payload. Tabular formats use
//! the fixed [`FEED_COLUMNS`] order behind a header row; XML and JSON keep
//! the struct field order.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::borrow::Cow;

use super::error::ExportError;
use super::format::FeedFormat;
use super::models::{FeedItem, FEED_COLUMNS};

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct FeedDocument<'a> {
    pub products: &'a [FeedItem],
}

/// Render `items` in the requested format
pub fn render(items: &[FeedItem], format: FeedFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        FeedFormat::Csv => render_delimited(items, b','),
        FeedFormat::Tsv => render_delimited(items, b'\t'),
        FeedFormat::Xml => render_xml(items),
        FeedFormat::Json => render_json(items),
    }
}

/// Parse the format identifier first so an unknown value fails before any I/O
pub fn render_named(items: &[FeedItem], format: &str) -> Result<Vec<u8>, ExportError> {
    render(items, format.parse()?)
}

fn render_delimited(items: &[FeedItem], delimiter: u8) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(FEED_COLUMNS).map_err(csv_error)?;
    for item in items {
        writer.write_record(item.row()).map_err(csv_error)?;
    }

    writer.into_inner().map_err(|e| {
        ExportError::Serialization(format!("Failed to flush delimited feed: {}", e.error()))
    })
}

fn render_xml(items: &[FeedItem]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_event(&mut writer, Event::Start(BytesStart::new("products")))?;

    for item in items {
        write_event(&mut writer, Event::Start(BytesStart::new("product")))?;
        for (tag, value) in item.xml_fields() {
            write_event(&mut writer, Event::Start(BytesStart::new(tag)))?;
            write_event(&mut writer, Event::Text(BytesText::new(&xml_safe(&value))))?;
            write_event(&mut writer, Event::End(BytesEnd::new(tag)))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new("product")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("products")))?;

    let mut payload = writer.into_inner();
    payload.push(b'\n');
    Ok(payload)
}

/// Replace characters outside the XML 1.0 `Char` production with `*`
fn xml_safe(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| if is_xml_char(c) { c } else { '*' })
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn render_json(items: &[FeedItem]) -> Result<Vec<u8>, ExportError> {
    serde_json::to_vec_pretty(&FeedDocument { products: items })
        .map_err(|e| ExportError::Serialization(format!("Failed to encode JSON feed: {}", e)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Serialization(format!("Failed to write XML feed: {}", e)))
}

fn csv_error(err: csv::Error) -> ExportError {
    ExportError::Serialization(format!("Failed to write delimited feed: {}", err))
}
