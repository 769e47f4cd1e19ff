//! Price extraction from free-form, Swedish-formatted price strings.

/// Extracts the first numeric token from a price string.
///
/// A token is a run of digits optionally followed by a single `.` or `,` and
/// more digits. A comma is treated as the decimal point ("29,90 kr" is 29.90).
/// Missing input, input without digits, or a token that fails to convert all
/// yield `0.0`.
pub fn parse_price<'a>(raw: impl Into<Option<&'a str>>) -> f64 {
    let Some(raw) = raw.into() else {
        return 0.0;
    };

    match first_numeric_token(raw) {
        Some(token) => token.replace(',', ".").parse().unwrap_or(0.0),
        None => 0.0,
    }
}

/// Returns the first `digits([.,]digits)?` slice of `text`.
fn first_numeric_token(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    // Only take the separator when digits follow it.
    if end + 1 < bytes.len()
        && (bytes[end] == b'.' || bytes[end] == b',')
        && bytes[end + 1].is_ascii_digit()
    {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    Some(&text[start..end])
}

/// Formats a krona amount the way synthesized prices are displayed.
pub fn format_kr(value: f64) -> String {
    format!("{:.2} kr", value)
}
