//! Numeric sort prefixes on content files and directories.
//!
//! Files and directories may carry a sort prefix: a run of ASCII digits
//! followed by a dash. The prefix orders siblings on disk and marks the
//! entry as visible in menus, but it never reaches a route:
//!
//! - `02-about/` → "about"
//! - `010-first-post.md` → "first-post.md"
//! - `drafts.md` → "drafts.md" (no prefix, hidden from menus)
//! - `2024.md` → "2024.md" (digits without a dash are part of the name)

/// Result of splitting an entry name like `020-contact.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName<'a> {
    /// Digits of the sort prefix, if present (`"020"` from `020-contact.md`).
    pub prefix: Option<&'a str>,
    /// Remainder after the prefix and its dash. For unprefixed entries this
    /// is the full input.
    pub name: &'a str,
}

/// Split an entry name into its optional sort prefix and the remainder.
///
/// - `"020-contact.md"` → prefix=Some("020"), name="contact.md"
/// - `"01-"` → prefix=Some("01"), name=""
/// - `"contact.md"` → prefix=None, name="contact.md"
/// - `"2024.md"` → prefix=None, name="2024.md"
/// - `"-notes.md"` → prefix=None, name="-notes.md"
pub fn parse_entry_name(name: &str) -> ParsedName<'_> {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && name.as_bytes().get(digits) == Some(&b'-') {
        return ParsedName {
            prefix: Some(&name[..digits]),
            name: &name[digits + 1..],
        };
    }
    ParsedName { prefix: None, name }
}

/// Strip the sort prefix from a single path segment.
pub fn strip_sort_prefix(segment: &str) -> &str {
    parse_entry_name(segment).name
}

/// Whether the name starts with a sort prefix.
pub fn has_sort_prefix(name: &str) -> bool {
    parse_entry_name(name).prefix.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_file_name() {
        let p = parse_entry_name("020-contact.md");
        assert_eq!(p.prefix, Some("020"));
        assert_eq!(p.name, "contact.md");
    }

    #[test]
    fn prefixed_directory_name() {
        let p = parse_entry_name("02-about");
        assert_eq!(p.prefix, Some("02"));
        assert_eq!(p.name, "about");
    }

    #[test]
    fn prefix_with_trailing_dash_only() {
        let p = parse_entry_name("01-");
        assert_eq!(p.prefix, Some("01"));
        assert_eq!(p.name, "");
    }

    #[test]
    fn unprefixed_name() {
        let p = parse_entry_name("contact.md");
        assert_eq!(p.prefix, None);
        assert_eq!(p.name, "contact.md");
    }

    #[test]
    fn digits_without_dash_are_not_a_prefix() {
        let p = parse_entry_name("2024.md");
        assert_eq!(p.prefix, None);
        assert_eq!(p.name, "2024.md");
    }

    #[test]
    fn leading_dash_is_not_a_prefix() {
        assert_eq!(parse_entry_name("-notes.md").prefix, None);
    }

    #[test]
    fn only_first_prefix_is_stripped() {
        assert_eq!(strip_sort_prefix("01-02-double"), "02-double");
    }

    #[test]
    fn long_prefix_does_not_overflow() {
        let name = "99999999999999999999999-big";
        assert!(has_sort_prefix(name));
        assert_eq!(strip_sort_prefix(name), "big");
    }

    #[test]
    fn has_sort_prefix_checks() {
        assert!(has_sort_prefix("001-index.md"));
        assert!(!has_sort_prefix("index.md"));
        assert!(!has_sort_prefix(""));
    }
}
