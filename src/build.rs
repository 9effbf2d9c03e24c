//! Stitches the library together for the command line: rendering document
//! files ([`render_file`], [`write_file`]), loading the project's data files
//! ([`load_data`], [`data_entry`]) and summarizing a validated project
//! ([`check`]).

use crate::config::{BundlerPlugin, Config};
use crate::data::{self, DataSet};
use crate::document::{self, Document};
use crate::highlight::Highlighter;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Loads the data set when the `yaml` bundler plugin is registered, otherwise
/// returns an empty one.
pub fn load_data(config: &Config) -> Result<DataSet> {
    if !config.has_plugin(BundlerPlugin::Yaml) {
        log::debug!("yaml plugin not registered; skipping data files");
        return Ok(DataSet::new());
    }
    Ok(data::load_directory(&config.data_directory)?)
}

pub fn data_entry<'a>(data: &'a DataSet, key: &str) -> Result<&'a serde_yaml::Value> {
    data.get(key)
        .ok_or_else(|| anyhow!("No data file for key `{}`", key))
}

/// Loads the data files and returns a one-line summary of the project.
pub fn check(config: &Config) -> Result<String> {
    let data = load_data(config)?;
    Ok(format!(
        "site.yaml OK: site={} integrations={} theme={} transformers={} data files={}",
        config.site,
        config.integrations.len(),
        config.highlighter().theme().name,
        config.markdown.highlight.transformers.len(),
        data.len(),
    ))
}

/// Reads and renders the document at `path`. Its links resolve against its
/// location in the project (see [`Config::source_path`]).
pub fn render_file(
    config: &Config,
    highlighter: &Highlighter,
    path: &Path,
) -> Result<Document> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Reading `{}`", path.display()))?;
    let source_path = config.source_path(path)?;
    log::debug!("rendering `{}` as `{}`", path.display(), source_path);
    Ok(document::render(&input, &source_path, &config.site, highlighter)?)
}

/// Returns `output_dir/<stem>.html` for the document at `path`.
pub fn output_path(output_dir: &Path, path: &Path) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("Invalid file name: {:?}", path))?;
    Ok(output_dir.join(format!("{}.html", stem)))
}

/// Renders the document at `path` into `output_dir` and returns the path
/// written.
pub fn write_file(
    config: &Config,
    highlighter: &Highlighter,
    path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let document = render_file(config, highlighter, path)?;
    let target = output_path(output_dir, path)?;
    std::fs::write(&target, &document.html)
        .with_context(|| format!("Writing `{}`", target.display()))?;
    Ok(target)
}
