// SimpleLogs - core/export.rs
//
// CSV, HTML report, JSON and clipboard-text export of log entries.
// Core layer: writes to any Write trait object; file handling is the
// caller's concern.
//
// Every exporter takes entries in the order they should appear. Reports are
// conventionally chronological (oldest first), the reverse of storage order.

use crate::core::model::LogEntry;
use crate::util::constants::{
    CSV_HEADER, EXPORT_FILE_PREFIX, HTML_REPORT_TITLE, ISO_TIMESTAMP_FORMAT,
};
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// File-producing export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "html" | "htm" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format \"{other}\", expected csv, html or json"
            )),
        }
    }
}

/// Default download-style file name: `simplelogs-<iso timestamp>.<ext>`.
///
/// Colons are replaced so the name is valid on every filesystem.
pub fn default_export_file_name(format: ExportFormat, now: DateTime<Utc>) -> String {
    let stamp = now.format(ISO_TIMESTAMP_FORMAT).to_string().replace(':', "-");
    format!("{EXPORT_FILE_PREFIX}-{stamp}.{}", format.extension())
}

/// Export entries as CSV.
///
/// Header row `timestamp,level,tag,message`, then one row per entry with
/// every field double-quoted and embedded quotes doubled. Rows end in `\n`.
/// Returns the number of rows written.
pub fn export_csv<'a, I, W>(entries: I, mut writer: W) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogEntry>,
    W: Write,
{
    // The header is fixed and unquoted; the csv writer quotes everything.
    writer.write_all(CSV_HEADER.as_bytes())?;
    writer.write_all(b"\n")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let mut count = 0;
    for entry in entries {
        csv_writer
            .write_record([
                entry.iso_timestamp().as_str(),
                entry.level.as_str(),
                entry.tag.as_str(),
                entry.message.as_str(),
            ])
            .map_err(|source| ExportError::Csv { source })?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Export entries as a self-contained HTML table report.
///
/// All four fields are HTML-escaped; tags are free text and may contain
/// markup. Returns the number of rows written.
pub fn export_html<'a, I, W>(entries: I, mut writer: W) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogEntry>,
    W: Write,
{
    write!(
        writer,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h2>{title}</h2><table border=\"1\" cellpadding=\"6\">\
         <tr><th>Timestamp</th><th>Level</th><th>Tag</th><th>Message</th></tr>\n",
        title = HTML_REPORT_TITLE
    )?;

    let mut count = 0;
    for entry in entries {
        writeln!(
            writer,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.iso_timestamp()),
            escape_html(entry.level.as_str()),
            escape_html(&entry.tag),
            escape_html(&entry.message),
        )?;
        count += 1;
    }

    writer.write_all(b"</table></body></html>\n")?;
    writer.flush()?;
    Ok(count)
}

/// Export entries as a JSON array in the persisted layout, so the file can be
/// imported back.
pub fn export_json<'a, I, W>(entries: I, mut writer: W) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a LogEntry>,
    W: Write,
{
    let entries: Vec<&LogEntry> = entries.into_iter().collect();
    serde_json::to_writer_pretty(&mut writer, &entries)
        .map_err(|source| ExportError::Json { source })?;
    writer.flush()?;
    Ok(entries.len())
}

/// Plain text for the clipboard: `[LEVEL] [tag] timestamp message` per entry,
/// joined with newlines (no trailing newline).
pub fn export_clipboard_text<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    entries
        .into_iter()
        .map(|e| {
            format!(
                "[{}] [{}] {} {}",
                e.level.label(),
                e.tag,
                e.iso_timestamp(),
                e.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape `& < > " '` for HTML text and attribute contexts.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EntryId, Level};
    use chrono::TimeZone;

    fn make_entry(level: Level, tag: &str, message: &str) -> LogEntry {
        LogEntry {
            id: EntryId::from("id-1"),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            level,
            tag: tag.to_string(),
            message: message.to_string(),
            pinned: false,
        }
    }

    #[test]
    fn test_csv_quotes_every_field_and_doubles_quotes() {
        let entries = vec![make_entry(Level::Info, "x", r#"say "hi""#)];
        let mut buf = Vec::new();
        let count = export_csv(&entries, &mut buf).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "timestamp,level,tag,message\n\"2024-01-01T00:00:00.000Z\",\"info\",\"x\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        let entries: Vec<LogEntry> = Vec::new();
        let mut buf = Vec::new();
        assert_eq!(export_csv(&entries, &mut buf).unwrap(), 0);
        assert_eq!(String::from_utf8(buf).unwrap(), "timestamp,level,tag,message\n");
    }

    #[test]
    fn test_csv_keeps_embedded_newlines_inside_quotes() {
        let entries = vec![make_entry(Level::Error, "", "line one\nline two")];
        let mut buf = Vec::new();
        export_csv(&entries, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with("\"error\",\"\",\"line one\nline two\"\n"));
    }

    #[test]
    fn test_html_escapes_all_fields() {
        let entries = vec![make_entry(Level::Warn, "<b>ui</b>", "a < b & 'c' \"d\"")];
        let mut buf = Vec::new();
        assert_eq!(export_html(&entries, &mut buf).unwrap(), 1);
        let html = String::from_utf8(buf).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Log Report</title>"));
        assert!(html.contains("<td>&lt;b&gt;ui&lt;/b&gt;</td>"));
        assert!(html.contains("<td>a &lt; b &amp; &#39;c&#39; &quot;d&quot;</td>"));
        assert!(html.trim_end().ends_with("</table></body></html>"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let entries = vec![make_entry(Level::Debug, "t", "hello")];
        let mut buf = Vec::new();
        assert_eq!(export_json(&entries, &mut buf).unwrap(), 1);
        let back: Vec<LogEntry> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_clipboard_text_format() {
        let entries = vec![
            make_entry(Level::Error, "auth", "denied"),
            make_entry(Level::Info, "", "ok"),
        ];
        assert_eq!(
            export_clipboard_text(&entries),
            "[ERROR] [auth] 2024-01-01T00:00:00.000Z denied\n[INFO] [] 2024-01-01T00:00:00.000Z ok"
        );
    }

    #[test]
    fn test_default_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 5).unwrap();
        assert_eq!(
            default_export_file_name(ExportFormat::Html, now),
            "simplelogs-2024-06-01T08-30-05.000Z.html"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
