use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::Config;
use crate::error::Result;
use crate::fstree::FsTree;
use crate::pattern::Patterns;
use crate::uri::{self, DOCUMENTATION_EXTS};

/// Lines, matched without regard to case, of theme files that are never
/// copied into a site.
const THEME_EXCLUSIONS: &[&str] = &[
    ".*", "*.py", "*.pyc", "*.html", "*readme*", "theme.toml", "/locales/",
];

/// A theme: an ordered list of directories providing default assets.
///
/// Earlier directories take precedence: when two directories provide the
/// same file, the one listed first is used.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    dirs: Vec<PathBuf>,
    static_templates: Vec<String>,
}

impl Theme {
    pub fn new<I, T>(dirs: I, static_templates: T) -> Theme
        where I: IntoIterator, I::Item: Into<PathBuf>,
              T: IntoIterator, T::Item: Into<String>,
    {
        Theme {
            dirs: dirs.into_iter().map(Into::into).collect(),
            static_templates: static_templates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Theme {
        Theme::new(config.theme.dirs.iter().cloned(), config.theme.static_templates.iter().cloned())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn static_templates(&self) -> &[String] {
        &self.static_templates
    }

    fn exclusions(&self) -> Result<Patterns> {
        let doc_exts = DOCUMENTATION_EXTS.iter().map(|ext| format!("*.{ext}"));
        let templates = self.static_templates.iter().map(|t| format!("/{t}"));
        let lines = THEME_EXCLUSIONS.iter()
            .map(|line| line.to_string())
            .chain(doc_exts)
            .chain(templates);

        Patterns::case_insensitive(lines)
    }

    /// The URIs of every file the theme provides to a site, sorted and
    /// de-duplicated across directories. Directories that don't exist are
    /// skipped.
    pub fn list_files(&self) -> Result<BTreeSet<String>> {
        let exclusions = self.exclusions()?;
        let mut uris = BTreeSet::new();
        for dir in self.dirs.iter().filter(|dir| dir.is_dir()) {
            let tree = FsTree::build(dir)?;
            tree.depth_first_search(tree.root_id(), |entry| {
                let uri = uri::uri_of(entry.relative_path());
                if exclusions.is_match(&uri, entry.is_dir()) {
                    return false;
                }

                if entry.is_file() {
                    uris.insert(uri);
                }

                true
            });
        }

        tracing::debug!(dirs = self.dirs.len(), files = uris.len(), "listed theme files");
        Ok(uris)
    }

    /// The first theme directory containing a file at `uri`.
    pub fn locate(&self, uri: &str) -> Option<&Path> {
        let path = uri::path_of(uri);
        self.dirs.iter()
            .find(|dir| dir.join(&path).is_file())
            .map(|dir| dir.as_path())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::Theme;

    fn touch(root: &Path, path: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, path.to_string_lossy().as_bytes()).unwrap();
    }

    #[test]
    fn theme_files_are_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let files = [
            "style.css", "js/app.js", "img/logo.png", "main.html", "partials/nav.html",
            "README.md", "notes.markdown", "Readme.txt", "theme.toml", "helper.py", "helper.pyc",
            ".DS_Store", ".cache/x.css", "locales/de.json", "sitemap.xml", "sub/sitemap.xml",
        ];

        for file in files {
            touch(dir.path(), file);
        }

        let theme = Theme::new([dir.path()], ["sitemap.xml"]);
        let listed: Vec<_> = theme.list_files().unwrap().into_iter().collect();
        assert_eq!(listed, ["img/logo.png", "js/app.js", "style.css", "sub/sitemap.xml"]);
    }

    #[test]
    fn first_directory_wins() {
        let (a, b) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
        touch(a.path(), "style.css");
        touch(b.path(), "style.css");
        touch(b.path(), "extra.js");

        let missing = a.path().join("missing");
        let theme = Theme::new([missing.as_path(), a.path(), b.path()], Vec::<String>::new());
        let listed: Vec<_> = theme.list_files().unwrap().into_iter().collect();
        assert_eq!(listed, ["extra.js", "style.css"]);
        assert_eq!(theme.locate("style.css"), Some(a.path()));
        assert_eq!(theme.locate("extra.js"), Some(b.path()));
        assert_eq!(theme.locate("nope.js"), None);
    }
}
