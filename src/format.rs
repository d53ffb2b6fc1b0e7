use crate::message::{MessageType, Metadata};

/// Appended when a response is cut down to `max_length`.
pub const TRUNCATION_MARKER: &str = "...";

/// Shortened pages keep the first `HEAD` and last `TAIL` characters once
/// they exceed `LIMIT`.
const SHORTEN_LIMIT: usize = 16;
const SHORTEN_HEAD: usize = 8;
const SHORTEN_TAIL: usize = 5;

const SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];
const EXTENSIONS: [&str; 8] = [
    ".html", ".htm", ".php", ".aspx", ".asp", ".cgi", ".pl", ".txt",
];

/// A channel-safe output string. `text` never exceeds the configured
/// maximum number of content characters (plus the truncation marker).
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedResponse {
    pub text: String,
    pub truncated: bool,
}

/// Turns worker results and errors into bounded output strings.
#[derive(Debug)]
pub struct ResponseFormatter {
    max_length: usize,
}

impl ResponseFormatter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// `prefix + body`, where the domain rendering of the result is already
    /// in `body`.
    pub fn format_success(&self, body: &str, metadata: &Metadata) -> FormattedResponse {
        self.bound(format!("{}{}", prefix(metadata), body))
    }

    /// `prefix + [shortened page] + error` when the pipeline has a URL
    /// concept, `prefix + error` when it does not.
    pub fn format_failure(
        &self,
        error: &str,
        page: Option<&str>,
        metadata: &Metadata,
    ) -> FormattedResponse {
        let text = match page {
            Some(page) => format!("{}[{}] {}", prefix(metadata), shorten_url(page), error),
            None => format!("{}{}", prefix(metadata), error),
        };
        self.bound(text)
    }

    // Truncation counts characters, not bytes.
    fn bound(&self, text: String) -> FormattedResponse {
        if text.chars().count() <= self.max_length {
            return FormattedResponse {
                text,
                truncated: false,
            };
        }
        let mut cut: String = text.chars().take(self.max_length).collect();
        cut.push_str(TRUNCATION_MARKER);
        FormattedResponse {
            text: cut,
            truncated: true,
        }
    }
}

// Public responses address the requester by nick; everything else goes back
// to the sender directly and needs no prefix.
fn prefix(metadata: &Metadata) -> String {
    match metadata.message_type {
        MessageType::Public => format!("{}, ", metadata.nick),
        MessageType::Notice | MessageType::Private => String::new(),
    }
}

/// Shortens a page/URL for error lines: strips a leading scheme and `www.`,
/// strips one trailing common file extension, then keeps the first 8 and
/// last 5 characters around an ellipsis once the rest exceeds 16. Pure
/// string transform; already-shortened strings pass through unchanged.
pub fn shorten_url(url: &str) -> String {
    let mut page = url;
    for scheme in SCHEMES {
        if let Some(rest) = strip_prefix_ci(page, scheme) {
            page = rest;
            break;
        }
    }
    if let Some(rest) = strip_prefix_ci(page, "www.") {
        page = rest;
    }
    // Extensions can stack ("a.pl.html"); strip until none is left so the
    // result is a fixed point.
    loop {
        let mut stripped = false;
        for extension in EXTENSIONS {
            if let Some(rest) = strip_suffix_ci(page, extension) {
                page = rest;
                stripped = true;
                break;
            }
        }
        if !stripped {
            break;
        }
    }

    let chars: Vec<char> = page.chars().collect();
    if chars.len() <= SHORTEN_LIMIT {
        return page.to_string();
    }
    let head: String = chars[..SHORTEN_HEAD].iter().collect();
    let tail: String = chars[chars.len() - SHORTEN_TAIL..].iter().collect();
    format!("{head}...{tail}")
}

// ASCII-case-insensitive strip_prefix; affixes are ASCII literals.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let at = s.len().checked_sub(suffix.len())?;
    let tail = s.get(at..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..at])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::IncomingMessage;

    fn metadata(message_type: MessageType) -> Metadata {
        let msg = IncomingMessage::new(
            "Zoffix!zoffix@unaffiliated/zoffix",
            message_type,
            Some("#perl".to_string()),
            "DoctypeBot, doctype zoffix.com",
        );
        Metadata::new(&msg, "zoffix.com")
    }

    #[test]
    fn test_public_response_is_prefixed_with_nick() {
        let f = ResponseFormatter::new(350);
        let out = f.format_success("doctype found", &metadata(MessageType::Public));
        assert_eq!(out.text, "Zoffix, doctype found");
        assert!(!out.truncated);
    }

    #[test]
    fn test_private_response_has_no_prefix() {
        let f = ResponseFormatter::new(350);
        let out = f.format_success("doctype found", &metadata(MessageType::Private));
        assert_eq!(out.text, "doctype found");
    }

    #[test]
    fn test_failure_with_page_uses_bracketed_shortened_page() {
        let f = ResponseFormatter::new(350);
        let out = f.format_failure(
            "Network error: 500",
            Some("zoffix.com"),
            &metadata(MessageType::Public),
        );
        assert_eq!(out.text, "Zoffix, [zoffix.com] Network error: 500");
    }

    #[test]
    fn test_failure_without_page_is_plain() {
        let f = ResponseFormatter::new(350);
        let out = f.format_failure("no such thing", None, &metadata(MessageType::Notice));
        assert_eq!(out.text, "no such thing");
    }

    #[test]
    fn test_truncation_at_exact_boundary() {
        let f = ResponseFormatter::new(10);
        let out = f.format_success("abcdefghijk", &metadata(MessageType::Private));
        assert_eq!(out.text, format!("abcdefghij{TRUNCATION_MARKER}"));
        assert!(out.truncated);

        let out = f.format_success("abcdefghij", &metadata(MessageType::Private));
        assert_eq!(out.text, "abcdefghij");
        assert!(!out.truncated);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let f = ResponseFormatter::new(4);
        let out = f.format_success("ééééé", &metadata(MessageType::Private));
        assert_eq!(out.text, format!("éééé{TRUNCATION_MARKER}"));
        assert!(out.truncated);
    }

    #[test]
    fn test_shorten_url_strips_scheme_www_and_extension() {
        assert_eq!(
            shorten_url("http://zoffix.com/new/del/test.html"),
            "zoffix.c.../test"
        );
        assert_eq!(shorten_url("https://www.example.com/a.php"), "example.com/a");
    }

    #[test]
    fn test_shorten_url_leaves_short_pages_alone() {
        assert_eq!(shorten_url("zoffix.com"), "zoffix.com");
        assert_eq!(shorten_url("http://zoffix.com"), "zoffix.com");
    }

    #[test]
    fn test_shorten_url_strips_stacked_extensions() {
        assert_eq!(shorten_url("a.pl.html"), "a");
        assert_eq!(shorten_url("http://e.com/cgi.pl.txt"), "e.com/cgi");
    }

    #[test]
    fn test_shorten_url_is_idempotent() {
        for url in [
            "http://zoffix.com/new/del/test.html",
            "https://www.example.com/long/path/to/some/page.php",
            "zoffix.com",
            "a.pl.html",
            "http://www.example.com/very/long/path/backup.php.txt",
        ] {
            let once = shorten_url(url);
            assert_eq!(shorten_url(&once), once, "not a fixed point: {url}");
        }
    }
}
