//! Transformer hooks for highlighted code blocks, and the language marker
//! that records a block's declared language on its wrapper element.
//!
//! A [`Transformer`] is an object with optional hook methods. The
//! [`crate::highlight::Highlighter`] calls `code` once the inner `<code>`
//! element is built and `pre` once the wrapper `<pre>` element is built, just
//! before the node is serialized. Every call gets its own node and its own
//! [`CodeOptions`]; nothing is carried between blocks.

use crate::highlight::Theme;
use crate::node::RenderNode;
use serde::Deserialize;

/// The attribute under which [`annotate_language`] stores the language.
pub const LANGUAGE_ATTRIBUTE: &str = "data-language";

/// What a hook knows about the block being rendered.
#[derive(Clone, Copy, Debug)]
pub struct CodeOptions<'a> {
    /// The fence's declared language. `None` for indented blocks and for
    /// fences without an info string.
    pub lang: Option<&'a str>,

    /// Whatever followed the language in the fence's info string.
    pub meta: &'a str,

    /// The active highlighting theme.
    pub theme: &'a Theme,
}

/// Hooks run by the highlighter. Both methods default to doing nothing.
pub trait Transformer: Send + Sync {
    /// Called with the wrapper `<pre>` element.
    fn pre(&self, _node: &mut RenderNode, _options: &CodeOptions) {}

    /// Called with the inner `<code>` element.
    fn code(&self, _node: &mut RenderNode, _options: &CodeOptions) {}
}

/// Sets [`LANGUAGE_ATTRIBUTE`] on `node` to `lang`, replacing any previous
/// value. An empty `lang` is stored as an empty attribute; the attribute is
/// never omitted. Only the property set is touched.
pub fn annotate_language(node: &mut RenderNode, lang: &str) {
    node.set_property(LANGUAGE_ATTRIBUTE, lang);
}

/// A [`Transformer`] that annotates the wrapper element with the block's
/// language (see [`annotate_language`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct LanguageMarker;

impl Transformer for LanguageMarker {
    fn pre(&self, node: &mut RenderNode, options: &CodeOptions) {
        annotate_language(node, options.lang.unwrap_or(""));
    }
}

/// A built-in transformation that can be named in the site configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    LanguageMarker,
}

impl Action {
    fn apply(self, node: &mut RenderNode, options: &CodeOptions) {
        match self {
            Action::LanguageMarker => {
                annotate_language(node, options.lang.unwrap_or(""))
            }
        }
    }
}

/// A transformer declared in `site.yaml`, mapping hook names to actions:
///
/// ```yaml
/// transformers:
///   - pre: language-marker
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformerConfig {
    #[serde(default)]
    pub pre: Option<Action>,

    #[serde(default)]
    pub code: Option<Action>,
}

impl Transformer for TransformerConfig {
    fn pre(&self, node: &mut RenderNode, options: &CodeOptions) {
        if let Some(action) = self.pre {
            action.apply(node, options);
        }
    }

    fn code(&self, node: &mut RenderNode, options: &CodeOptions) {
        if let Some(action) = self.code {
            action.apply(node, options);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::highlight::Theme;

    fn node() -> RenderNode {
        let mut code = RenderNode::new("code");
        code.push_text("print('hi')");
        let mut pre = RenderNode::new("pre")
            .with_property("class", "shiki github-dark")
            .with_property("tabindex", "0");
        pre.push_element(code);
        pre
    }

    fn options<'a>(lang: Option<&'a str>, theme: &'a Theme) -> CodeOptions<'a> {
        CodeOptions {
            lang,
            meta: "",
            theme,
        }
    }

    #[test]
    fn test_annotate_language() {
        let mut node = node();
        annotate_language(&mut node, "python");
        assert_eq!(Some("python"), node.property(LANGUAGE_ATTRIBUTE));
    }

    #[test]
    fn test_annotate_language_empty_is_kept() {
        let mut node = node();
        annotate_language(&mut node, "");
        assert_eq!(Some(""), node.property(LANGUAGE_ATTRIBUTE));
    }

    #[test]
    fn test_annotate_language_overwrites() {
        let mut node = node().with_property(LANGUAGE_ATTRIBUTE, "text");
        annotate_language(&mut node, "go");
        assert_eq!(Some("go"), node.property(LANGUAGE_ATTRIBUTE));
    }

    #[test]
    fn test_annotate_language_is_idempotent() {
        let mut once = node();
        annotate_language(&mut once, "rust");

        let mut twice = node();
        annotate_language(&mut twice, "rust");
        annotate_language(&mut twice, "rust");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_annotate_language_leaves_everything_else() {
        let original = node();
        let mut annotated = original.clone();
        annotate_language(&mut annotated, "python");

        assert_eq!(original.tag_name, annotated.tag_name);
        assert_eq!(original.children, annotated.children);
        assert_eq!(original.properties.len() + 1, annotated.properties.len());
        for (key, value) in &original.properties {
            assert_eq!(Some(value.as_str()), annotated.property(key));
        }
    }

    #[test]
    fn test_language_marker_missing_language() {
        let theme = Theme::default();
        let mut node = node();
        LanguageMarker.pre(&mut node, &options(None, &theme));
        assert_eq!(Some(""), node.property(LANGUAGE_ATTRIBUTE));
    }

    #[test]
    fn test_language_marker_ignores_code_hook() {
        let theme = Theme::default();
        let mut node = node();
        LanguageMarker.code(&mut node, &options(Some("go"), &theme));
        assert_eq!(None, node.property(LANGUAGE_ATTRIBUTE));
    }

    #[test]
    fn test_transformer_config_dispatches_by_hook() -> Result<(), serde_yaml::Error> {
        let theme = Theme::default();
        let config: TransformerConfig =
            serde_yaml::from_str("code: language-marker")?;

        let mut pre = node();
        config.pre(&mut pre, &options(Some("go"), &theme));
        assert_eq!(None, pre.property(LANGUAGE_ATTRIBUTE));

        let mut code = RenderNode::new("code");
        config.code(&mut code, &options(Some("go"), &theme));
        assert_eq!(Some("go"), code.property(LANGUAGE_ATTRIBUTE));
        Ok(())
    }

    #[test]
    fn test_transformer_config_rejects_unknown_action() {
        assert!(serde_yaml::from_str::<TransformerConfig>("pre: add-icon").is_err());
        assert!(serde_yaml::from_str::<TransformerConfig>("line: language-marker").is_err());
    }
}
