use crate::highlight::Highlighter;
use crate::htmlrenderer::HtmlRenderer;
use crate::url::Converter as LinkConverter;
use pulldown_cmark::*;
use std::fmt;
use std::io;
use url::{ParseError as UrlParseError, Url};

/// Converts markdown to HTML, writing the result into [`w`].
///
/// * [`site_url`] is the site's base URL (e.g., https://example.org/). This
///   should end in a trailing slash.
/// * [`source_path`] is the relative path to the source file from the site
///   root. Relative links are resolved against it.
/// * [`markdown`] is the contents of the source file.
/// * [`highlighter`] builds the HTML for fenced and indented code blocks.
pub fn to_html<W: escape::StrWrite>(
    w: &mut W,
    site_url: &Url,
    source_path: &str,
    markdown: &str,
    highlighter: &Highlighter,
) -> Result<(), Error> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let event_converter = EventConverter {
        link_converter: LinkConverter::new(site_url, source_path)?,
    };
    let mut html_renderer = HtmlRenderer::new(highlighter);
    for ev in Parser::new_ext(markdown, options)
        .map(|ev| event_converter.convert(ev))
    {
        let ev = ev?;
        html_renderer.on_event(w, ev)?;
    }
    Ok(())
}

struct EventConverter<'a> {
    link_converter: LinkConverter<'a>,
}

impl<'a> EventConverter<'a> {
    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Result<Tag<'b>, UrlParseError> {
        Ok(match tag {
            // Links and images pointing at other documents on the site need
            // to point at the rendered pages instead (e.g., `setup.md` becomes
            // `https://example.org/guide/setup.html`).
            Tag::Link(
                link @ (LinkType::Inline
                | LinkType::Reference
                | LinkType::ReferenceUnknown
                | LinkType::Shortcut
                | LinkType::Autolink
                | LinkType::Collapsed
                | LinkType::CollapsedUnknown),
                url,
                title,
            ) => Tag::Link(link, self.convert_url(&url)?, title),
            Tag::Image(link, url, title) => {
                Tag::Image(link, self.convert_url(&url)?, title)
            }
            _ => tag,
        })
    }

    fn convert_url<'b>(&self, url: &str) -> Result<CowStr<'b>, UrlParseError> {
        Ok(CowStr::Boxed(
            self.link_converter.convert(url)?.into_boxed_str(),
        ))
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Result<Event<'b>, UrlParseError> {
        Ok(match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)?),
            _ => ev,
        })
    }
}

/// Represents an error converting markdown to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when there is a problem parsing URLs.
    UrlParse(UrlParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => fmt::Display::fmt(err, f),
            Error::UrlParse(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for IO operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
