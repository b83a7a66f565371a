//! Folder naming conventions of the site-visit drive
//!
//! The remote store is organized by convention: a fixed root, one folder per
//! project, a control folder, yearly report folders, numbered visit folders
//! and a photos folder inside each visit. The names are Hebrew and matched
//! literally.

use chrono::{DateTime, Utc};

/// Name of the synthetic root folder
pub const ROOT_FOLDER_NAME: &str = "תיקים לבקרה";

/// Id of the synthetic root folder
pub const ROOT_FOLDER_ID: &str = "root";

/// Name of the photos destination folder inside a visit
pub const PHOTOS_FOLDER_NAME: &str = "תמונות";

/// Exact name of the control folder auto-selected after a project choice
pub const CONTROL_FOLDER_NAME: &str = "בקרת ביצוע";

/// Prefix of the yearly reports folders
pub const REPORTS_PREFIX: &str = "דוחות";

/// Marker word identifying a visit folder
pub const VISIT_MARKER: &str = "ביקור";

/// Whether a folder name marks a visit record.
///
/// A visit name carries the marker word, optionally prefixed by a report
/// word and optionally followed by a sequence number
/// (e.g. `ביקור 3`, `דוח ביקור מס' 12`).
pub fn is_visit_folder(name: &str) -> bool {
    name.contains(VISIT_MARKER)
}

/// Extract the sequence number from a visit folder name.
///
/// Accepts separators and an optional counter word between the marker and
/// the number: `ביקור 3`, `ביקור-3`, `ביקור מס' 3`, `דוח ביקור מספר 3`.
pub fn extract_visit_number(name: &str) -> Option<u32> {
    let idx = name.find(VISIT_MARKER)?;
    let rest = &name[idx + VISIT_MARKER.len()..];
    let rest = skip_separators(rest);

    // Optional counter word: מספר, מס', מס
    let rest = if let Some(stripped) = rest.strip_prefix("מספר") {
        stripped
    } else if let Some(stripped) = rest.strip_prefix("מס") {
        stripped.strip_prefix('\'').unwrap_or(stripped)
    } else {
        rest
    };
    let rest = skip_separators(rest);

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn skip_separators(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || c == '-')
}

/// Generate the name for the next visit folder.
///
/// One more than the highest visit number among `names`, stamped with the
/// current date: `ביקור {n} {dd}-{mm}-{yyyy}`.
pub fn next_visit_name<'a>(names: impl Iterator<Item = &'a str>, now: DateTime<Utc>) -> String {
    let max = names
        .filter(|name| is_visit_folder(name))
        .filter_map(extract_visit_number)
        .max()
        .unwrap_or(0);

    format!("{} {} {}", VISIT_MARKER, max + 1, now.format("%d-%m-%Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_is_visit_folder() {
        assert!(is_visit_folder("ביקור 3"));
        assert!(is_visit_folder("דוח ביקור"));
        assert!(is_visit_folder("דוח ביקור מס' 12 10-03-2025"));
        assert!(!is_visit_folder("דוחות 2024"));
        assert!(!is_visit_folder("בקרת ביצוע"));
    }

    #[test]
    fn test_extract_visit_number_variants() {
        assert_eq!(extract_visit_number("ביקור 3"), Some(3));
        assert_eq!(extract_visit_number("ביקור-7"), Some(7));
        assert_eq!(extract_visit_number("ביקור מס' 12"), Some(12));
        assert_eq!(extract_visit_number("ביקור מספר 4"), Some(4));
        assert_eq!(extract_visit_number("דוח ביקור מס 9 01-01-2025"), Some(9));
        assert_eq!(extract_visit_number("ביקור"), None);
        assert_eq!(extract_visit_number("תמונות"), None);
    }

    #[test]
    fn test_next_visit_name() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let names = ["ביקור 1 01-01-2025", "דוח ביקור מס' 7", "דוחות 2024"];

        let name = next_visit_name(names.iter().copied(), now);
        assert_eq!(name, "ביקור 8 09-03-2025");
    }

    #[test]
    fn test_next_visit_name_starts_at_one() {
        let now = Utc.with_ymd_and_hms(2025, 11, 30, 8, 0, 0).unwrap();

        let name = next_visit_name(std::iter::empty(), now);
        assert_eq!(name, "ביקור 1 30-11-2025");
    }
}
