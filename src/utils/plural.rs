//! Count formatting for log lines.

/// `"1 file"`, `"3 files"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

/// Like [`plural_count`] for nouns with an irregular plural
/// (`"1 entry"`, `"2 entries"`).
#[inline]
pub fn plural_irregular(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "file"), "1 file");
        assert_eq!(plural_count(5, "reference"), "5 references");
    }

    #[test]
    fn test_plural_irregular() {
        assert_eq!(plural_irregular(1, "entry", "entries"), "1 entry");
        assert_eq!(plural_irregular(2, "entry", "entries"), "2 entries");
    }
}
