use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{Chainable, Result};

/// Build settings, as read from a `config.toml`.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```rust
/// use folio::Config;
///
/// let config = Config::from_toml_str("").unwrap();
/// assert_eq!(config.docs_dir.to_str(), Some("docs"));
/// assert_eq!(config.site_dir.to_str(), Some("site"));
/// assert!(config.use_directory_urls);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The source root.
    pub docs_dir: PathBuf,
    /// The destination root.
    pub site_dir: PathBuf,
    /// Whether documentation pages are emitted as `name/index.html`.
    pub use_directory_urls: bool,
    /// Gitignore-style lines, applied after the default exclusions.
    #[serde(deserialize_with = "lines")]
    pub exclude_docs: Vec<String>,
    /// Gitignore-style lines of files that are built but never in navigation.
    #[serde(deserialize_with = "lines")]
    pub not_in_nav: Vec<String>,
    pub extra_css: Vec<String>,
    pub extra_javascript: Vec<String>,
    pub theme: ThemeSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Theme directories, highest priority first.
    pub dirs: Vec<PathBuf>,
    /// Templates rendered by the theme rather than copied.
    pub static_templates: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            docs_dir: PathBuf::from("docs"),
            site_dir: PathBuf::from("site"),
            use_directory_urls: true,
            exclude_docs: vec![],
            not_in_nav: vec![],
            extra_css: vec![],
            extra_javascript: vec![],
            theme: ThemeSettings::default(),
        }
    }
}

impl Config {
    /// Reads the TOML configuration at `path`. Relative directories are
    /// resolved against the directory containing `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let string = fs::read_to_string(path).chain_with(|| error! {
            "failed to read configuration file",
            "file path" => path.display(),
        })?;

        let mut config = Config::from_toml_str(&string).chain_with(|| error! {
            "invalid configuration file",
            "file path" => path.display(),
        })?;

        let root = path.parent().unwrap_or(Path::new(""));
        config.resolve_against(root);
        Ok(config)
    }

    pub fn from_toml_str(string: &str) -> Result<Config> {
        Ok(toml::from_str(string)?)
    }

    /// Makes every relative directory in `self` relative to `root`.
    pub fn resolve_against<P: AsRef<Path>>(&mut self, root: P) {
        let root = root.as_ref();
        let resolve = |dir: &mut PathBuf| if dir.is_relative() {
            *dir = root.join(&*dir);
        };

        resolve(&mut self.docs_dir);
        resolve(&mut self.site_dir);
        self.theme.dirs.iter_mut().for_each(resolve);
    }
}

/// Accepts either a list of lines or a single string of newline-separated
/// lines.
fn lines<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lines {
        Block(String),
        List(Vec<String>),
    }

    Ok(match Lines::deserialize(de)? {
        Lines::Block(block) => block.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Lines::List(list) => list,
    })
}
