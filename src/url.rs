//! Resolves the links in a document against the site URL. Links to other
//! Markdown sources on the site are rewritten to the pages they render to
//! (`guide/setup.md` becomes `https://example.org/guide/setup.html`).

use url::{ParseError, Url};

const SOURCE_EXTENSIONS: &[&str] = &[".md", ".mdx"];
const HTML_EXTENSION: &str = ".html";

pub struct Converter<'a> {
    site_root: &'a Url,
    base: Url,
}

impl<'a> Converter<'a> {
    /// Constructs a new `Converter`
    ///
    /// # Arguments
    ///
    /// * `site_root` - the site URL. This should end in a trailing slash.
    /// * `source_path` - the path of the document being rendered, relative
    ///   to `site_root`. Relative links are resolved against it.
    pub fn new(site_root: &'a Url, source_path: &str) -> Result<Converter<'a>> {
        Ok(Converter {
            site_root,
            base: site_root.join(source_path)?,
        })
    }

    // `foo.md` -> `foo.html`, `foo/index.md` -> `foo.html`
    fn page_path(relative: &str) -> Option<String> {
        let stem = SOURCE_EXTENSIONS
            .iter()
            .find_map(|ext| relative.strip_suffix(ext))?;
        Some(format!(
            "{}{}",
            stem.strip_suffix("/index").unwrap_or(stem),
            HTML_EXTENSION,
        ))
    }

    fn convert_absolute(&self, mut absolute: Url) -> Result<Url> {
        let fragment = absolute.fragment().map(str::to_owned);
        absolute.set_fragment(None);
        if let Some(relative) = self.site_root.make_relative(&absolute) {
            if !relative.starts_with("../") && !relative.contains('?') {
                if let Some(page) = Self::page_path(&relative) {
                    let mut page_url = self.site_root.join(&page)?;
                    page_url.set_fragment(fragment.as_deref());
                    return Ok(page_url);
                }
            }
        }
        absolute.set_fragment(fragment.as_deref());
        Ok(absolute)
    }

    fn convert_unknown(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => self.convert_absolute(absolute),
            Err(ParseError::RelativeUrlWithoutBase) => {
                self.convert_absolute(self.base.join(url)?)
            }
            Err(e) => Err(e),
        }
    }

    /// Converts a link target. Fragment-only links are returned unchanged.
    pub fn convert(&self, url: &str) -> Result<String> {
        if url.is_empty() || url.starts_with('#') {
            return Ok(url.to_owned());
        }
        Ok(self.convert_unknown(url)?.to_string())
    }
}

type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_convert_relative_page() -> Result<()> {
        fixture_basic("https://example.org/guide/setup.html", "setup.md")
    }

    #[test]
    fn test_convert_relative_page_leading_dotslash() -> Result<()> {
        fixture_basic("https://example.org/guide/setup.html", "./setup.md")
    }

    #[test]
    fn test_convert_relative_mdx_page() -> Result<()> {
        fixture_basic("https://example.org/guide/setup.html", "setup.mdx")
    }

    #[test]
    fn test_convert_relative_page_parent() -> Result<()> {
        fixture_basic("https://example.org/about.html", "../about.md")
    }

    #[test]
    fn test_convert_relative_page_fragment() -> Result<()> {
        fixture_basic(
            "https://example.org/guide/setup.html#install",
            "setup.md#install",
        )
    }

    #[test]
    fn test_convert_relative_index_page() -> Result<()> {
        fixture_basic("https://example.org/guide/rbac.html", "rbac/index.md")
    }

    #[test]
    fn test_convert_root_index_page() -> Result<()> {
        fixture_basic("https://example.org/index.html", "/index.md")
    }

    #[test]
    fn test_convert_relative_asset() -> Result<()> {
        fixture_basic("https://example.org/guide/diagram.png", "diagram.png")
    }

    #[test]
    fn test_convert_absolute_page() -> Result<()> {
        fixture_basic(
            "https://example.org/about.html",
            "https://example.org/guide/../about.md",
        )
    }

    #[test]
    fn test_convert_remote_markdown() -> Result<()> {
        fixture_basic(
            "https://remote.org/README.md",
            "https://remote.org/README.md",
        )
    }

    #[test]
    fn test_convert_fragment_only() -> Result<()> {
        fixture_basic("#top", "#top")
    }

    #[test]
    fn test_convert_outside_site_root() -> Result<()> {
        assert_eq!(
            "https://example.org/other.md",
            Converter::new(&Url::parse("https://example.org/docs/")?, "a.md")?
                .convert("/other.md")?,
        );
        Ok(())
    }

    fn fixture_basic(wanted: &str, target: &str) -> Result<()> {
        fixture("guide/intro.md", wanted, target)
    }

    fn fixture(source_path: &str, wanted: &str, target: &str) -> Result<()> {
        assert_eq!(
            wanted,
            Converter::new(&Url::parse("https://example.org/")?, source_path)?
                .convert(target)?,
        );
        Ok(())
    }
}
