//! Builds the wrapper element for a code block and runs the configured
//! [`Transformer`] hooks over it. The markup follows the usual `shiki` shape:
//!
//! ```html
//! <pre class="shiki github-dark" style="..." tabindex="0"><code>
//! <span class="line">...</span>
//! </code></pre>
//! ```
//!
//! Code is escaped but not tokenized; colors come from the theme's palette.

use crate::node::RenderNode;
use crate::transform::{CodeOptions, Transformer, TransformerConfig};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A named highlighting palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
}

const THEMES: &[Theme] = &[
    Theme {
        name: "github-dark",
        background: "#24292e",
        foreground: "#e1e4e8",
    },
    Theme {
        name: "github-light",
        background: "#fff",
        foreground: "#24292e",
    },
    Theme {
        name: "dracula",
        background: "#282A36",
        foreground: "#F8F8F2",
    },
    Theme {
        name: "nord",
        background: "#2e3440ff",
        foreground: "#d8dee9ff",
    },
    Theme {
        name: "one-dark-pro",
        background: "#282c34",
        foreground: "#abb2bf",
    },
    Theme {
        name: "monokai",
        background: "#272822",
        foreground: "#F8F8F2",
    },
    Theme {
        name: "min-light",
        background: "#ffffff",
        foreground: "#24292eff",
    },
    Theme {
        name: "min-dark",
        background: "#1f1f1f",
        foreground: "#b392f0",
    },
    Theme {
        name: "solarized-dark",
        background: "#002B36",
        foreground: "#839496",
    },
    Theme {
        name: "solarized-light",
        background: "#FDF6E3",
        foreground: "#657B83",
    },
];

impl Theme {
    /// Looks up a built-in theme by name.
    pub fn by_name(name: &str) -> Option<Theme> {
        THEMES.iter().find(|theme| theme.name == name).copied()
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|theme| theme.name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEMES[0]
    }
}

impl std::str::FromStr for Theme {
    type Err = UnknownThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::by_name(s).ok_or_else(|| UnknownThemeError(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Theme, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse::<Theme>()
            .map_err(|e| D::Error::custom(format!("{}", e)))
    }
}

/// Returned when a theme name doesn't match any built-in theme.
#[derive(Debug)]
pub struct UnknownThemeError(String);

impl fmt::Display for UnknownThemeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown theme `{}` (expected one of: {})",
            self.0,
            Theme::names().collect::<Vec<_>>().join(", "),
        )
    }
}

impl std::error::Error for UnknownThemeError {}

/// The `markdown.highlight` section of `site.yaml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HighlightConfig {
    #[serde(default)]
    pub theme: Theme,

    /// Whether long lines wrap instead of scrolling.
    #[serde(default)]
    pub wrap: bool,

    /// Hooks to run on every block, in order.
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
}

/// Turns code blocks into [`RenderNode`]s. A `Highlighter` is immutable once
/// built, so one instance can serve any number of documents and threads.
pub struct Highlighter {
    theme: Theme,
    wrap: bool,
    transformers: Vec<Box<dyn Transformer>>,
}

impl Highlighter {
    /// Creates a highlighter from configuration. The configured transformers
    /// run in the order they were declared.
    pub fn new(config: &HighlightConfig) -> Highlighter {
        Highlighter {
            theme: config.theme,
            wrap: config.wrap,
            transformers: config
                .transformers
                .iter()
                .cloned()
                .map(|t| Box::new(t) as Box<dyn Transformer>)
                .collect(),
        }
    }

    /// Appends a transformer after the configured ones.
    pub fn with_transformer<T: Transformer + 'static>(
        mut self,
        transformer: T,
    ) -> Highlighter {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Builds the `<pre>` node for one block of `code`. `lang` is the fence's
    /// declared language and `meta` the rest of its info string.
    pub fn highlight(
        &self,
        code: &str,
        lang: Option<&str>,
        meta: &str,
    ) -> RenderNode {
        let options = CodeOptions {
            lang,
            meta,
            theme: &self.theme,
        };

        let mut code_node = RenderNode::new("code");
        let lines = split_lines(code);
        log::trace!(
            "highlighting block: lang={:?} lines={}",
            lang,
            lines.len()
        );
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                code_node.push_text("\n");
            }
            let mut span = RenderNode::new("span").with_property("class", "line");
            span.push_text(line);
            code_node.push_element(span);
        }
        for transformer in &self.transformers {
            transformer.code(&mut code_node, &options);
        }

        let mut pre = RenderNode::new("pre")
            .with_property("class", &format!("shiki {}", self.theme.name))
            .with_property("style", &self.style())
            .with_property("tabindex", "0");
        pre.push_element(code_node);
        for transformer in &self.transformers {
            transformer.pre(&mut pre, &options);
        }
        pre
    }

    fn style(&self) -> String {
        let mut style = format!(
            "background-color:{};color:{}; overflow-x: auto",
            self.theme.background, self.theme.foreground,
        );
        if self.wrap {
            style.push_str("; white-space: pre-wrap; word-wrap: break-word");
        }
        style
    }
}

// The final newline terminates the last line rather than starting a new one.
fn split_lines(code: &str) -> Vec<&str> {
    let code = code.strip_suffix('\n').unwrap_or(code);
    if code.is_empty() {
        return Vec::new();
    }
    code.split('\n').collect()
}
