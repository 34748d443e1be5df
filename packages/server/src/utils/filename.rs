/// Result of validating an uploaded filename.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains null bytes.
    NullByte,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename exceeds the stored column width.
    TooLong,
}

/// Longest filename kept for a batch, in characters.
const MAX_FILENAME_CHARS: usize = 255;

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::TooLong => "Invalid filename: at most 255 characters are allowed",
        }
    }
}

/// Validates the client-supplied name of an uploaded file and strips any
/// directory components some clients include (e.g. `C:\fakepath\data.csv`).
pub fn upload_file_name(filename: &str) -> Result<&str, FilenameError> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if base.is_empty() {
        return Err(FilenameError::Empty);
    }

    if base.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject control characters to prevent
    // HTTP header injection (e.g. CRLF in Content-Disposition).
    if base.chars().any(char::is_control) {
        return Err(FilenameError::ControlCharacter);
    }

    if base.chars().count() > MAX_FILENAME_CHARS {
        return Err(FilenameError::TooLong);
    }

    Ok(base)
}

/// Build the `Content-Disposition` value for a downloadable report.
///
/// Quotes, backslashes and control characters become `_`. Names with
/// non-ASCII characters additionally get an RFC 5987 `filename*` parameter.
pub fn attachment_disposition(filename: &str) -> String {
    let quoted: String = filename
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if quoted.is_ascii() {
        return format!("attachment; filename=\"{quoted}\"");
    }

    let ascii_fallback: String = quoted
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = quoted
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_fallback}\"; filename*=UTF-8''{encoded}")
}
