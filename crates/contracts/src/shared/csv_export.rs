/// Выгрузка списков в CSV
///
/// Every cell is quoted, quotes are doubled, embedded line breaks collapse to
/// a single space and rows are separated by CRLF.
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Types that can be exported as CSV rows
pub trait CsvExportable {
    /// Column headers, in output order
    fn headers() -> Vec<&'static str>;

    /// Cell values for one row, same order as [`headers`](Self::headers)
    fn to_csv_row(&self) -> Vec<String>;
}

/// Collapse every run of CR/LF characters into one space.
pub fn flatten_cell(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut in_break = false;
    for ch in cell.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(ch);
            in_break = false;
        }
    }
    out
}

/// Render headers plus one row per item.
pub fn render_csv<T: CsvExportable>(items: &[T]) -> Result<String, String> {
    let rows: Vec<Vec<String>> = items.iter().map(CsvExportable::to_csv_row).collect();
    render_table(&T::headers(), &rows)
}

/// Render an ad-hoc table (report exports build their rows by hand).
pub fn render_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> Result<String, String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(headers.iter().map(|h| flatten_cell(h.as_ref())))
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;
    for row in rows {
        writer
            .write_record(row.iter().map(|cell| flatten_cell(cell)))
            .map_err(|e| format!("Failed to write CSV row: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("Failed to flush CSV: {}", e))?;
    let mut content =
        String::from_utf8(bytes).map_err(|e| format!("CSV is not valid UTF-8: {}", e))?;

    // rows are joined by CRLF, not terminated by it
    if content.ends_with("\r\n") {
        content.truncate(content.len() - 2);
    }
    Ok(content)
}
