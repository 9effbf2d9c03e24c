//! Loads structured data files so that pages can refer to them by name. Every
//! `.yaml`/`.yml` file under the data directory is parsed into a
//! [`serde_yaml::Value`] and keyed by its path relative to the directory,
//! without the extension and with `/` separators (`data/team/leads.yaml` is
//! `team/leads`).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DATA_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Parsed data files, keyed by relative path.
pub type DataSet = BTreeMap<String, serde_yaml::Value>;

/// Parses a single data file.
pub fn load_file(path: &Path) -> Result<serde_yaml::Value> {
    let file = std::fs::File::open(path).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })?;
    serde_yaml::from_reader(file).map_err(|err| Error::DeserializeYaml {
        path: path.to_owned(),
        err,
    })
}

/// Loads every data file under `dir`. A missing directory is an empty data
/// set.
pub fn load_directory(dir: &Path) -> Result<DataSet> {
    let mut data = DataSet::new();
    if !dir.exists() {
        log::debug!("data directory `{}` does not exist", dir.display());
        return Ok(data);
    }

    for result in WalkDir::new(dir).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let key = match data_key(dir, entry.path()) {
            Some(key) => key,
            None => continue,
        };
        if data.contains_key(&key) {
            return Err(Error::DuplicateKey {
                key,
                path: entry.path().to_owned(),
            });
        }
        log::trace!("loading data file `{}` as `{}`", entry.path().display(), key);
        data.insert(key, load_file(entry.path())?);
    }

    log::debug!("loaded {} data files from `{}`", data.len(), dir.display());
    Ok(data)
}

// Returns `None` for files that aren't data files.
fn data_key(dir: &Path, path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !DATA_EXTENSIONS.contains(&extension) {
        return None;
    }
    // strip_prefix() shouldn't fail since WalkDir only yields paths under `dir`
    let relative = path.strip_prefix(dir).ok()?.with_extension("");
    let components = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    Some(components.join("/"))
}

/// Represents the result of a data-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading data files.
#[derive(Debug)]
pub enum Error {
    /// Returned when a data file can't be read.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when a data file isn't valid YAML.
    DeserializeYaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when two files map to the same key (e.g., `a.yml` and
    /// `a.yaml`).
    DuplicateKey { key: String, path: PathBuf },

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Reading data file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml { path, err } => {
                write!(f, "Parsing data file '{}': {}", path.display(), err)
            }
            Error::DuplicateKey { key, path } => write!(
                f,
                "Data file '{}' duplicates the key `{}`",
                path.display(),
                key
            ),
            Error::WalkDir(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::DeserializeYaml { path: _, err } => Some(err),
            Error::DuplicateKey { .. } => None,
            Error::WalkDir(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the data directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn write(dir: &Path, relative: &str, contents: &str) -> std::io::Result<()> {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }

    #[test]
    fn test_load_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "authors.yaml", "- name: Ada\n- name: Grace\n")?;
        write(dir.path(), "team/leads.yml", "security: Lin\n")?;
        write(dir.path(), "notes.txt", "not data")?;

        let data = load_directory(dir.path())?;
        assert_eq!(
            vec!["authors", "team/leads"],
            data.keys().map(String::as_str).collect::<Vec<_>>(),
        );
        assert_eq!(
            Some("Lin"),
            data["team/leads"]["security"].as_str(),
        );
        assert_eq!(Some(2), data["authors"].as_sequence().map(Vec::len));
        Ok(())
    }

    #[test]
    fn test_load_missing_directory() -> Result<()> {
        let data = load_directory(Path::new("./does-not-exist/data"))?;
        assert!(data.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_key() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "site.yaml", "a: 1\n")?;
        write(dir.path(), "site.yml", "a: 2\n")?;
        match load_directory(dir.path()) {
            Err(Error::DuplicateKey { key, .. }) => assert_eq!("site", key),
            other => panic!("expected a duplicate key error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path(), "broken.yaml", "a: [1, 2\n")?;
        match load_directory(dir.path()) {
            Err(Error::DeserializeYaml { path, .. }) => {
                assert!(path.ends_with("broken.yaml"))
            }
            other => panic!("expected a YAML error, got {:?}", other),
        }
        Ok(())
    }
}
