//! [`Display`] wrappers around [`pulldown_cmark`]'s escaping functions so that
//! escaped text can be dropped straight into `write!` calls, whether the sink
//! is a [`StrWrite`] or a [`fmt::Formatter`].

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use std::fmt::{self, Display};
use std::io;

/// Lets a [`fmt::Write`] stand in for a [`StrWrite`]. The escape functions
/// report failures as [`io::Error`], so the original [`fmt::Error`] is kept
/// in `result` and handed back to the formatter.
struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

/// Displays the wrapped string escaped for use in an `href` or `src`.
pub struct EscapeHref<'a>(pub &'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

/// Displays the wrapped string escaped for HTML text and attribute values.
pub struct EscapeHtml<'a>(pub &'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;",
            EscapeHtml(r#"<a href="x">&</a>"#).to_string(),
        );
    }

    #[test]
    fn test_escape_href() {
        assert_eq!(
            "https://example.org/a%20b?c=d&amp;e=f",
            EscapeHref("https://example.org/a b?c=d&e=f").to_string(),
        );
    }
}
