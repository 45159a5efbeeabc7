//! Filename hygiene and unique-name generation.
//!
//! Persisted filenames always carry the `.tex` extension; display names are
//! the stem. New documents get the smallest free `untitled_N`, scanned
//! against the saved-document list so the result is deterministic whatever
//! order the store returns names in.

use std::collections::HashSet;

pub const TEX_EXTENSION: &str = ".tex";

/// Fallback display name used whenever no filename is known or the name
/// field is blank.
pub const FALLBACK_NAME: &str = "my_resume";

/// Strips a trailing `.tex` (any case) from a filename.
pub fn stem(filename: &str) -> &str {
    let lower = filename.to_lowercase();
    if lower.ends_with(TEX_EXTENSION) {
        &filename[..filename.len() - TEX_EXTENSION.len()]
    } else {
        filename
    }
}

/// Appends `.tex` unless the name already ends with it.
pub fn with_tex_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(TEX_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{TEX_EXTENSION}")
    }
}

/// Returns `name` unless it is blank, in which case the fixed fallback.
pub fn display_name_or_fallback(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME
    } else {
        trimmed
    }
}

/// Picks the smallest positive `untitled_N` not present among the existing
/// display names, counting strictly up from 1.
pub fn next_untitled_name<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("untitled_{counter}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Timestamp-based unique name, used when the saved-document list cannot be
/// fetched.
pub fn timestamped_untitled_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("untitled_{}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stem_strips_extension_case_insensitive() {
        assert_eq!(stem("my_resume.tex"), "my_resume");
        assert_eq!(stem("LETTER.TEX"), "LETTER");
        assert_eq!(stem("notes"), "notes");
    }

    #[test]
    fn test_with_tex_extension_is_idempotent() {
        assert_eq!(with_tex_extension("cv"), "cv.tex");
        assert_eq!(with_tex_extension("cv.tex"), "cv.tex");
    }

    #[test]
    fn test_blank_display_name_falls_back() {
        assert_eq!(display_name_or_fallback(""), FALLBACK_NAME);
        assert_eq!(display_name_or_fallback("   "), FALLBACK_NAME);
        assert_eq!(display_name_or_fallback("cv"), "cv");
    }

    #[test]
    fn test_next_untitled_fills_smallest_gap() {
        let existing = ["untitled_1", "untitled_2", "untitled_4"];
        assert_eq!(next_untitled_name(existing), "untitled_3");
    }

    #[test]
    fn test_next_untitled_starts_at_one() {
        assert_eq!(next_untitled_name(["cv", "letter"]), "untitled_1");
        assert_eq!(next_untitled_name([]), "untitled_1");
    }

    #[test]
    fn test_next_untitled_is_order_independent() {
        let forward = ["untitled_1", "untitled_3"];
        let backward = ["untitled_3", "untitled_1"];
        assert_eq!(
            next_untitled_name(forward),
            next_untitled_name(backward)
        );
        assert_eq!(next_untitled_name(forward), "untitled_2");
    }

    #[test]
    fn test_timestamped_name_uses_millis() {
        let now = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            timestamped_untitled_name(now),
            "untitled_1700000000000"
        );
    }
}
