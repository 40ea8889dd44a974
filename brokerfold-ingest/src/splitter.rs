use brokerfold_core::LineRecord;

/// Split raw statement bytes into numbered lines. Line numbers are 0-based and
/// count every line of the file, blank ones included.
pub fn split_lines(bytes: &[u8], account_id: &str, statement_id: &str) -> Vec<LineRecord> {
    String::from_utf8_lossy(bytes)
        .split('\n')
        .enumerate()
        .map(|(line_number, text)| {
            let text = text.strip_suffix('\r').unwrap_or(text);
            LineRecord::new(text, line_number, account_id, statement_id)
        })
        .collect()
}
