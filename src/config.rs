//! Loads the project's `site.yaml`:
//!
//! ```yaml
//! site: https://kubernetes-security.cloud
//! integrations: [tailwind, mdx, sitemap]
//! markdown:
//!   highlight:
//!     theme: github-dark
//!     wrap: true
//!     transformers:
//!       - pre: language-marker
//! bundler:
//!   plugins: [yaml]
//! ```
//!
//! Only `site` is required. Integrations and bundler plugins are recorded in
//! the order they are declared; each may appear at most once.

use crate::highlight::{HighlightConfig, Highlighter};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

pub const PROJECT_FILE: &str = "site.yaml";

/// Build-time subsystems registered with the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    /// Utility-CSS processing.
    Tailwind,

    /// MDX document support.
    Mdx,

    /// Sitemap generation. Uses `site` as the base URL.
    Sitemap,
}

/// Plugins registered with the bundler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerPlugin {
    /// Makes YAML data files importable (see [`crate::data`]).
    Yaml,
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Integration::Tailwind => "tailwind",
            Integration::Mdx => "mdx",
            Integration::Sitemap => "sitemap",
        })
    }
}

impl fmt::Display for BundlerPlugin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            BundlerPlugin::Yaml => "yaml",
        })
    }
}

/// The `markdown` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdownConfig {
    #[serde(default)]
    pub highlight: HighlightConfig,
}

/// The `bundler` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundlerConfig {
    #[serde(default)]
    pub plugins: Vec<BundlerPlugin>,
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    site: Url,

    #[serde(default)]
    integrations: Vec<Integration>,

    #[serde(default)]
    markdown: MarkdownConfig,

    #[serde(default)]
    bundler: BundlerConfig,

    #[serde(default = "default_data_directory")]
    data_directory: PathBuf,
}

#[derive(Debug)]
pub struct Config {
    /// The site's base URL. Always ends in `/`.
    pub site: Url,
    pub integrations: Vec<Integration>,
    pub markdown: MarkdownConfig,
    pub bundler: BundlerConfig,

    /// The directory containing `site.yaml`.
    pub root_directory: PathBuf,

    /// Where data files are loaded from when the YAML plugin is registered.
    pub data_directory: PathBuf,
}

impl Config {
    /// Loads `site.yaml` from `dir` or the nearest parent directory that has
    /// one. `dir` is canonicalized first so relative paths (including `.`)
    /// search all the way up and `root_directory` is always absolute.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Resolving project directory `{}`", dir.display()))?;
        match find_project_file(dir.ancestors()) {
            Some(path) => Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration `{}`", path.display())),
            None => Err(anyhow!(
                "Could not find `{}` in `{}` or any parent directory",
                PROJECT_FILE,
                dir.display()
            )),
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let file = File::open(&path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                let config = Config {
                    site: normalize_site(project.site)?,
                    integrations: unique(project.integrations, "integration")?,
                    markdown: project.markdown,
                    bundler: BundlerConfig {
                        plugins: unique(project.bundler.plugins, "bundler plugin")?,
                    },
                    root_directory: project_root.to_owned(),
                    data_directory: project_root.join(project.data_directory),
                };
                log::debug!(
                    "loaded `{}`: site={} integrations=[{}] theme={} plugins=[{}]",
                    path.display(),
                    config.site,
                    join(&config.integrations),
                    config.markdown.highlight.theme.name,
                    join(&config.bundler.plugins),
                );
                Ok(config)
            }
        }
    }

    /// Returns the path links in `file` are resolved against: its path
    /// relative to the project root with `/` separators, or just its file
    /// name when it lives outside the project.
    pub fn source_path(&self, file: &Path) -> Result<String> {
        let absolute = file
            .canonicalize()
            .with_context(|| format!("Resolving `{}`", file.display()))?;
        let relative = match absolute.strip_prefix(&self.root_directory) {
            Ok(relative) => relative.to_owned(),
            Err(_) => PathBuf::from(
                absolute
                    .file_name()
                    .ok_or_else(|| anyhow!("Invalid file name: {:?}", file))?,
            ),
        };
        relative
            .components()
            .map(|c| {
                c.as_os_str()
                    .to_str()
                    .ok_or_else(|| anyhow!("Non-UTF-8 path: {:?}", file))
            })
            .collect::<Result<Vec<&str>>>()
            .map(|components| components.join("/"))
    }

    pub fn has_integration(&self, integration: Integration) -> bool {
        self.integrations.contains(&integration)
    }

    pub fn has_plugin(&self, plugin: BundlerPlugin) -> bool {
        self.bundler.plugins.contains(&plugin)
    }

    /// Builds the highlighter described by `markdown.highlight`.
    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(&self.markdown.highlight)
    }
}

// The site URL must be an absolute http(s) URL. A trailing slash is added so
// relative joins stay under the site's path.
fn normalize_site(mut site: Url) -> Result<Url> {
    if !matches!(site.scheme(), "http" | "https") {
        return Err(anyhow!(
            "`site` must be an http or https URL, found `{}`",
            site
        ));
    }
    if !site.path().ends_with('/') {
        let path = format!("{}/", site.path());
        site.set_path(&path);
    }
    Ok(site)
}

// Returns the first `site.yaml` found in `dirs`.
fn find_project_file<'a>(dirs: impl Iterator<Item = &'a Path>) -> Option<PathBuf> {
    dirs.map(|dir| dir.join(PROJECT_FILE)).find(|path| path.is_file())
}

fn unique<T: PartialEq + fmt::Display>(items: Vec<T>, kind: &str) -> Result<Vec<T>> {
    for (i, item) in items.iter().enumerate() {
        if items[..i].contains(item) {
            return Err(anyhow!("Duplicate {} `{}`", kind, item));
        }
    }
    Ok(items)
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
