//! Template merge: replace the region between two markers.

use crate::error::{PacError, Result};

/// Replace everything between `start_marker` and the next `end_marker` with `block`.
///
/// Both markers stay in the output and text outside them is untouched.
/// A missing start marker, or no end marker after it, is an error.
pub fn merge(template: &str, start_marker: &str, end_marker: &str, block: &str) -> Result<String> {
    let start = template
        .find(start_marker)
        .ok_or_else(|| PacError::MarkerNotFound {
            marker: start_marker.to_string(),
        })?;
    let insert_at = start + start_marker.len();

    let end = template[insert_at..]
        .find(end_marker)
        .map(|offset| insert_at + offset)
        .ok_or_else(|| PacError::MarkerNotFound {
            marker: end_marker.to_string(),
        })?;

    let mut merged = String::with_capacity(template.len() - (end - insert_at) + block.len());
    merged.push_str(&template[..insert_at]);
    merged.push_str(block);
    merged.push_str(&template[end..]);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_simple() {
        let merged = merge("A[[START]]old[[END]]B", "[[START]]", "[[END]]", "NEW").unwrap();
        assert_eq!(merged, "A[[START]]NEW[[END]]B");
    }

    #[test]
    fn test_merge_empty_region() {
        let merged = merge("[[START]][[END]]", "[[START]]", "[[END]]", "x").unwrap();
        assert_eq!(merged, "[[START]]x[[END]]");
    }

    #[test]
    fn test_merge_repeatable_on_original() {
        let template = "head\n// S\nold\n// E\ntail";
        let once = merge(template, "// S", "// E", "\nrules\n").unwrap();
        let twice = merge(template, "// S", "// E", "\nrules\n").unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, "head\n// S\nrules\n// E\ntail");
        // Merging the same block into the output again gives the same text.
        assert_eq!(merge(&once, "// S", "// E", "\nrules\n").unwrap(), once);
    }

    #[test]
    fn test_merge_outside_untouched() {
        let template = "prefix [[END]] [[START]] middle [[END]] suffix [[START]]";
        let merged = merge(template, "[[START]]", "[[END]]", "R").unwrap();
        // End marker before the start marker is ignored.
        assert_eq!(merged, "prefix [[END]] [[START]]R[[END]] suffix [[START]]");
        assert!(merged.starts_with("prefix [[END]] [[START]]"));
        assert!(merged.ends_with("[[END]] suffix [[START]]"));
    }

    #[test]
    fn test_merge_missing_start() {
        let err = merge("A old [[END]] B", "[[START]]", "[[END]]", "NEW").unwrap_err();
        assert_eq!(
            err,
            PacError::MarkerNotFound {
                marker: "[[START]]".to_string()
            }
        );
    }

    #[test]
    fn test_merge_missing_end() {
        let err = merge("[[END]] A [[START]] old", "[[START]]", "[[END]]", "NEW").unwrap_err();
        assert_eq!(
            err,
            PacError::MarkerNotFound {
                marker: "[[END]]".to_string()
            }
        );
    }

    #[test]
    fn test_merge_multibyte() {
        let merged = merge("ü<<a>>ö<<b>>ä", "<<a>>", "<<b>>", "€").unwrap();
        assert_eq!(merged, "ü<<a>>€<<b>>ä");
    }
}
