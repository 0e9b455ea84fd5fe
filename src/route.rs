//! Route resolution: relative source paths to canonical URL routes.
//!
//! Pure string transforms, no I/O. A route is the URL path of a page without
//! leading or trailing separators:
//!
//! ```text
//! index.md                   → ""            (site root)
//! 02-about/01-index.md       → "about"
//! 03-blog/001-hello.md       → "blog/hello"
//! 02-about/index.en.md       → "about/index.en" → translated: "en/about"
//! ```
//!
//! Language variants are marked in the file name (`page.en.md`). Only codes
//! from the configured set count as markers; everything else belongs to the
//! [`DEFAULT_LANGUAGE`].

use crate::naming::strip_sort_prefix;

/// Language of files without a recognized language marker, and of requests
/// without a recognized locale segment.
pub const DEFAULT_LANGUAGE: &str = "default";

/// Compute the canonical route of a path relative to its content root.
///
/// Sort prefixes are removed from every segment, the extension is dropped
/// when `trim_extension` is set, and a trailing `index` segment collapses
/// into its directory. The site index resolves to `""`.
pub fn normalize_route(relative_path: &str, trim_extension: bool) -> String {
    let path = relative_path.trim_start_matches(['/', '\\']);

    let joined = path
        .split('/')
        .map(strip_sort_prefix)
        .collect::<Vec<_>>()
        .join("/");

    let joined = match joined.rfind('.') {
        Some(pos) if trim_extension => &joined[..pos],
        _ => joined.as_str(),
    };

    let trimmed = joined.trim_matches(['/', '\\']);
    let route = trimmed.strip_suffix("/index").unwrap_or(trimmed);

    if route == "index" {
        String::new()
    } else {
        route.to_string()
    }
}

/// Detect the language marker of a file, e.g. `en` for `page.en.md`.
///
/// The marker is the last two-letter lowercase segment sitting between two
/// dots of the file name. It is only returned when listed in `languages`;
/// any other file belongs to [`DEFAULT_LANGUAGE`].
pub fn detect_language<'a>(relative_path: &'a str, languages: &[String]) -> &'a str {
    let filename = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let parts: Vec<&str> = filename.split('.').collect();
    if parts.len() < 3 {
        return DEFAULT_LANGUAGE;
    }

    let marker = parts[1..parts.len() - 1]
        .iter()
        .rev()
        .find(|part| part.len() == 2 && part.bytes().all(|b| b.is_ascii_lowercase()))
        .copied();

    match marker {
        Some(code) if languages.iter().any(|l| l == code) => code,
        _ => DEFAULT_LANGUAGE,
    }
}

/// Move a route of a language variant under its language segment.
///
/// The language marker (`.en`, or `/index.en` for directory indexes) is
/// removed first; a variant of the site index becomes the bare code.
pub fn translate_route(route: &str, language: &str) -> String {
    if language == DEFAULT_LANGUAGE {
        return route.to_string();
    }

    let stripped = route
        .replace(&format!("/index.{language}"), "")
        .replace(&format!(".{language}"), "");

    if stripped.is_empty() || stripped == "index" {
        language.to_string()
    } else {
        format!("{language}/{stripped}")
    }
}

/// Resolve the language a visitor asked for from the request path.
///
/// The first path segment selects the language when it is one of `locales`
/// (`/en/about` → `en`); anything else falls back to [`DEFAULT_LANGUAGE`].
pub fn requested_language<'a>(request_path: &'a str, locales: &[String]) -> &'a str {
    let path = request_path.split(['?', '#']).next().unwrap_or_default();
    let first = path.trim_matches('/').split('/').next().unwrap_or_default();

    if !first.is_empty() && locales.iter().any(|l| l == first) {
        first
    } else {
        DEFAULT_LANGUAGE
    }
}
