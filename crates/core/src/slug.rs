//! Page name normalization.
//!
//! Names are the external key of a page, so every proposed name goes through
//! two stages before it is stored: [`sanitize_name`] removes markup, then
//! [`kebab_case`] folds the result into a lower-case hyphenated slug.
//! Page content never passes through this module.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>|&#?[A-Za-z0-9]+;").expect("markup pattern is valid"));

/// Strip HTML tags and character references from a proposed page name.
///
/// Stripped markup is replaced by a space so that `a<br>b` still splits
/// into two words.
pub fn sanitize_name(raw: &str) -> String {
    MARKUP.replace_all(raw, " ").into_owned()
}

/// Split `title` into words and join them as a lower-case kebab-case slug.
///
/// Word boundaries are any non-alphanumeric character, a lower-to-upper
/// transition (`myPage`), the last capital of an upper-case run that is
/// followed by a lower-case letter (`HTMLParser`), and any letter/digit
/// transition (`page2`).
pub fn kebab_case(title: &str) -> String {
    let chars: Vec<char> = title.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower)
                || (prev.is_numeric() != c.is_numeric());
            if boundary {
                flush(&mut current, &mut words);
            }
        }

        current.push(c);
    }
    flush(&mut current, &mut words);

    words.join("-").to_lowercase()
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Canonical slug for a proposed page name.
pub fn normalize_page_name(raw: &str) -> String {
    kebab_case(&sanitize_name(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_spaces() {
        assert_eq!(normalize_page_name("My First Page"), "my-first-page");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(normalize_page_name("   Release Notes \t\n"), "release-notes");
    }

    #[test]
    fn test_camel_and_pascal_case() {
        assert_eq!(kebab_case("myPageTitle"), "my-page-title");
        assert_eq!(kebab_case("GettingStarted"), "getting-started");
    }

    #[test]
    fn test_acronym_run() {
        assert_eq!(kebab_case("HTMLParser"), "html-parser");
        assert_eq!(kebab_case("API"), "api");
        assert_eq!(kebab_case("IOError"), "io-error");
    }

    #[test]
    fn test_digit_runs() {
        assert_eq!(kebab_case("Page2"), "page-2");
        assert_eq!(kebab_case("release 2024 notes"), "release-2024-notes");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(kebab_case("what's -- new?!"), "what-s-new");
        assert_eq!(kebab_case("already-kebab-case"), "already-kebab-case");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(kebab_case(""), "");
        assert_eq!(kebab_case("  --  "), "");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(kebab_case("Über Café"), "über-café");
    }

    #[test]
    fn test_sanitize_strips_tags() {
        assert_eq!(normalize_page_name("<script>alert(1)</script>Hello"), "alert-1-hello");
        assert_eq!(normalize_page_name("Tom &amp; Jerry"), "tom-jerry");
        assert_eq!(normalize_page_name("<b>Bold</b> Move"), "bold-move");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize_name("plain name"), "plain name");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_page_name("Some Odd_Title v2");
        assert_eq!(normalize_page_name(&once), once);
    }
}
