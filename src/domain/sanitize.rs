//! Filename stems for split payslips.

use super::text::normalize;

/// Stem used when nothing usable is left after sanitizing.
pub const EMPTY_FILENAME: &str = "SEM_NOME";

/// Longest stem produced, in characters.
pub const MAX_FILENAME_LEN: usize = 120;

/// Characters rejected by at least one common filesystem.
const ILLEGAL: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Converts a display name into a safe, upper-case filename stem.
///
/// ```
/// use holerite::domain::sanitize::sanitize;
///
/// assert_eq!(sanitize(" ana: luiza / santos? "), "ANA LUIZA SANTOS");
/// assert_eq!(sanitize("***"), "SEM_NOME");
/// ```
pub fn sanitize(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !ILLEGAL.contains(c) && !c.is_control())
        .collect();
    let upper = normalize(&stripped).to_uppercase();

    let sanitized = if upper.chars().count() > MAX_FILENAME_LEN {
        let truncated: String = upper.chars().take(MAX_FILENAME_LEN).collect();
        truncated.trim().to_string()
    } else {
        upper
    };

    if sanitized.is_empty() {
        EMPTY_FILENAME.to_string()
    } else {
        sanitized
    }
}
