//! Renders a single Markdown document. A document may start with a YAML
//! frontmatter block fenced by `---` lines:
//!
//! ````md
//! ---
//! title: Pod Security Admission
//! ---
//! # Enforcing baselines
//!
//! ```yaml
//! apiVersion: v1
//! ```
//! ````
//!
//! Frontmatter is optional; without the opening fence the whole input is the
//! body.

use crate::highlight::Highlighter;
use crate::markdown;
use serde_yaml::Mapping;
use std::fmt;
use url::Url;

/// A rendered document.
#[derive(Debug, Default)]
pub struct Document {
    /// The parsed frontmatter, empty if the document has none.
    pub frontmatter: Mapping,

    /// The rendered body.
    pub html: String,
}

impl Document {
    /// Returns the frontmatter's `title` field if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter
            .get(&serde_yaml::Value::String("title".to_owned()))
            .and_then(serde_yaml::Value::as_str)
    }
}

const FENCE: &str = "---";

// Returns (yaml_start, yaml_stop, body_start), or `None` if there is no
// frontmatter.
fn frontmatter_indices(input: &str) -> Result<Option<(usize, usize, usize)>> {
    let first_line = input.lines().next().unwrap_or_default();
    if first_line.trim_end() != FENCE {
        return Ok(None);
    }
    let yaml_start = first_line.len();
    let mut offset = yaml_start;
    for line in input[yaml_start..].split_inclusive('\n') {
        if offset > yaml_start && line.trim_end() == FENCE {
            return Ok(Some((yaml_start, offset, offset + line.len())));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Splits `input` into its frontmatter and body and renders the body. See
/// [`markdown::to_html`] for the other arguments.
pub fn render(
    input: &str,
    source_path: &str,
    site_url: &Url,
    highlighter: &Highlighter,
) -> Result<Document> {
    match render_inner(input, source_path, site_url, highlighter) {
        Ok(document) => Ok(document),
        Err(e) => Err(Error::Annotated(
            format!("rendering document `{}`", source_path),
            Box::new(e),
        )),
    }
}

fn render_inner(
    input: &str,
    source_path: &str,
    site_url: &Url,
    highlighter: &Highlighter,
) -> Result<Document> {
    let mut document = Document::default();
    let body = match frontmatter_indices(input)? {
        None => input,
        Some((yaml_start, yaml_stop, body_start)) => {
            let yaml = &input[yaml_start..yaml_stop];
            if !yaml.trim().is_empty() {
                document.frontmatter = serde_yaml::from_str(yaml)?;
            }
            &input[body_start..]
        }
    };
    markdown::to_html(
        &mut document.html,
        site_url,
        source_path,
        body,
        highlighter,
    )?;
    log::debug!(
        "rendered `{}` ({} bytes of HTML)",
        source_path,
        document.html.len()
    );
    Ok(document)
}

/// Represents the result of rendering a [`Document`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a [`Document`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the opening frontmatter fence (`---`) has no matching
    /// closing fence.
    FrontmatterMissingEndFence,

    /// Returned when the frontmatter isn't a valid YAML mapping.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the body can't be rendered.
    Markdown(markdown::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => fmt::Display::fmt(err, f),
            Error::Markdown(err) => fmt::Display::fmt(err, f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Markdown(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<markdown::Error> for Error {
    fn from(err: markdown::Error) -> Error {
        Error::Markdown(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::highlight::HighlightConfig;
    use crate::transform::LanguageMarker;

    fn fixture(input: &str) -> Result<Document> {
        let site_url = Url::parse("https://example.org/").map_err(markdown::Error::from)?;
        let highlighter =
            Highlighter::new(&HighlightConfig::default()).with_transformer(LanguageMarker);
        render(input, "posts/psa.md", &site_url, &highlighter)
    }

    #[test]
    fn test_frontmatter() -> Result<()> {
        let document = fixture(
            "---\ntitle: Pod Security\ntags: [k8s]\n---\n```yaml\nkind: Pod\n```\n",
        )?;
        assert_eq!(Some("Pod Security"), document.title());
        assert_eq!(2, document.frontmatter.len());
        assert!(document.html.starts_with("<pre "), "{}", document.html);
        assert!(document.html.contains(r#"data-language="yaml""#));
        Ok(())
    }

    #[test]
    fn test_no_frontmatter() -> Result<()> {
        let document = fixture("# Hello\n")?;
        assert!(document.frontmatter.is_empty());
        assert_eq!(None, document.title());
        assert_eq!("<h1>Hello</h1>\n", document.html);
        Ok(())
    }

    #[test]
    fn test_empty_frontmatter() -> Result<()> {
        let document = fixture("---\n---\nbody\n")?;
        assert!(document.frontmatter.is_empty());
        assert_eq!("<p>body</p>\n", document.html);
        Ok(())
    }

    #[test]
    fn test_fence_inside_frontmatter_value() -> Result<()> {
        let document = fixture("---\ntitle: a---b\n---\nbody\n")?;
        assert_eq!(Some("a---b"), document.title());
        Ok(())
    }

    #[test]
    fn test_missing_end_fence() {
        match fixture("---\ntitle: x\n\nbody\n") {
            Err(Error::Annotated(annotation, err)) => {
                assert!(annotation.contains("posts/psa.md"));
                assert!(matches!(*err, Error::FrontmatterMissingEndFence));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_frontmatter() {
        match fixture("---\ntitle: [unclosed\n---\nbody\n") {
            Err(Error::Annotated(_, err)) => {
                assert!(matches!(*err, Error::DeserializeYaml(_)))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
