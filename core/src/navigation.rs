//! Page URL construction

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched when a whole URL is encoded
const URI_RESERVED_AND_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'#');

/// Characters left untouched when a single path segment or query value is
/// encoded, matching `encodeURIComponent`
const URI_COMPONENT_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a complete URL the way a browser's `encodeURI` does:
/// URL structure characters survive, everything else is escaped.
pub fn encode_uri(raw: &str) -> String {
    utf8_percent_encode(raw, URI_RESERVED_AND_UNRESERVED).to_string()
}

/// Percent-encode one URL component; structure characters such as `/`, `?`
/// and `#` are escaped too.
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT_UNRESERVED).to_string()
}

/// URL of a page, or of a not-yet-existing page named `title`.
///
/// The title is a single path segment, so it is escaped as a component.
pub fn page_url(base_url: &str, project: &str, title: &str) -> String {
    let prefix = encode_uri(&format!("{}/{}/", base_url.trim_end_matches('/'), project));
    format!("{}{}", prefix, encode_uri_component(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uri_keeps_structure() {
        assert_eq!(
            encode_uri("https://scrapbox.io/api/pages/demo?sort=accessed&limit=1000"),
            "https://scrapbox.io/api/pages/demo?sort=accessed&limit=1000"
        );
    }

    #[test]
    fn test_encode_uri_escapes_text() {
        assert_eq!(encode_uri("a b"), "a%20b");
        assert_eq!(encode_uri("100%"), "100%25");
        assert_eq!(encode_uri("日記"), "%E6%97%A5%E8%A8%98");
        assert_eq!(encode_uri("[x]{y}|\"<>"), "%5Bx%5D%7By%7D%7C%22%3C%3E");
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            page_url("https://scrapbox.io/", "demo", "Hello World"),
            "https://scrapbox.io/demo/Hello%20World"
        );
        assert_eq!(
            page_url("https://scrapbox.io", "demo", "メモ"),
            "https://scrapbox.io/demo/%E3%83%A1%E3%83%A2"
        );
    }

    #[test]
    fn test_encode_uri_component_escapes_structure() {
        assert_eq!(encode_uri_component("a/b?c#d&e=f"), "a%2Fb%3Fc%23d%26e%3Df");
        assert_eq!(encode_uri_component("(ok)!*~'"), "(ok)!*~'");
    }

    #[test]
    fn test_page_url_escapes_structure_characters_in_title() {
        assert_eq!(
            page_url("https://scrapbox.io", "demo", "C# tips"),
            "https://scrapbox.io/demo/C%23%20tips"
        );
        assert_eq!(
            page_url("https://scrapbox.io", "demo", "What?"),
            "https://scrapbox.io/demo/What%3F"
        );
        assert_eq!(
            page_url("https://scrapbox.io", "demo", "a/b"),
            "https://scrapbox.io/demo/a%2Fb"
        );
        assert_eq!(
            page_url("https://scrapbox.io", "demo", "Q&A"),
            "https://scrapbox.io/demo/Q%26A"
        );
    }

    #[test]
    fn test_page_url_keeps_title_in_one_segment() {
        for title in ["C# tips", "What? Why?", "a/b/c", "100% & more"] {
            let url = url::Url::parse(&page_url("https://scrapbox.io", "demo", title)).unwrap();
            assert_eq!(url.fragment(), None, "{title}");
            assert_eq!(url.query(), None, "{title}");
            let segments: Vec<&str> = url.path_segments().unwrap().collect();
            assert_eq!(segments.len(), 2, "{title}");
            assert_eq!(segments[0], "demo");
        }
    }
}
