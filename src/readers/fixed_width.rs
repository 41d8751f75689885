use crate::error::{ProcessingError, Result};
use std::ops::Range;

/// Text of a byte-offset field, trimmed; `None` when blank or past the end
/// of the line. Bytes that are not UTF-8 are decoded as Windows-1252.
pub(crate) fn field(line: &[u8], range: Range<usize>) -> Option<String> {
    if range.start >= line.len() {
        return None;
    }
    let end = range.end.min(line.len());
    let bytes = &line[range.start..end];

    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn required_field(
    line: &[u8],
    range: Range<usize>,
    name: &str,
    line_number: usize,
) -> Result<String> {
    field(line, range).ok_or_else(|| {
        ProcessingError::Format(format!("Line {}: missing {} field", line_number, name))
    })
}

pub(crate) fn parse_field<T: std::str::FromStr>(
    value: &str,
    name: &str,
    line_number: usize,
) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        ProcessingError::Format(format!(
            "Line {}: invalid {}: '{}'",
            line_number, name, value
        ))
    })
}

/// Strip a trailing `\r` left by CRLF files.
pub(crate) fn strip_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
