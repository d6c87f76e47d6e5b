use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{uri, Config, File, Theme};
use crate::error::Result;

/// An ordered collection of [`File`]s, unique by source URI.
///
/// Files are kept in manifest order, the order in which they were appended.
/// Lookups by source URI are constant time.
#[derive(derive_more::Debug, Default, Clone)]
pub struct Files {
    files: Vec<File>,
    #[debug(ignore)]
    index: FxHashMap<String, usize>,
}

/// A [`Files`] collection that can no longer be modified.
///
/// Cloning is cheap and clones may be freely shared across threads.
#[derive(Debug, Clone)]
pub struct SealedFiles(Arc<Files>);

impl Files {
    pub fn new() -> Files {
        Files::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Appends `file`. Fails, leaving `self` unchanged, if a file with the same
    /// source URI is already present.
    pub fn append(&mut self, file: File) -> Result<()> {
        if self.contains(file.src_uri()) {
            return err! {
                "a file with this source already exists in the collection",
                "source uri" => file.src_uri(),
            };
        }

        self.index.insert(file.src_uri().to_owned(), self.files.len());
        self.files.push(file);
        Ok(())
    }

    /// Removes and returns the file with source URI `src_uri`, if any.
    pub fn remove(&mut self, src_uri: &str) -> Option<File> {
        let i = self.index.remove(src_uri)?;
        let file = self.files.remove(i);
        for (j, file) in self.files.iter().enumerate().skip(i) {
            if let Some(position) = self.index.get_mut(file.src_uri()) {
                *position = j;
            }
        }

        Some(file)
    }

    /// Changes the source URI of the file at `from` to the canonical form of
    /// `to`, keeping its position and destination.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let to = uri::canonical(to);
        if !self.contains(from) {
            return err!("no file with this source in the collection", "source uri" => from);
        } else if from == to {
            return Ok(());
        } else if self.contains(&to) {
            return err! {
                "a file with this source already exists in the collection",
                "source uri" => to,
            };
        }

        if let Some(i) = self.index.remove(from) {
            self.files[i].set_src_uri(&to);
            self.index.insert(to, i);
        }

        Ok(())
    }

    pub fn get_by_path(&self, src_uri: &str) -> Option<&File> {
        self.index.get(src_uri).map(|&i| &self.files[i])
    }

    pub fn contains(&self, src_uri: &str) -> bool {
        self.index.contains_key(src_uri)
    }

    /// The source URIs of every file, in manifest order.
    pub fn src_uris(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.src_uri())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, File> {
        self.files.iter()
    }

    fn included(&self) -> impl Iterator<Item = &File> {
        self.files.iter().filter(|f| f.inclusion.is_included())
    }

    pub fn documentation_pages(&self) -> impl Iterator<Item = &File> {
        self.included().filter(|f| f.is_documentation_page())
    }

    pub fn static_pages(&self) -> impl Iterator<Item = &File> {
        self.included().filter(|f| f.is_static_page())
    }

    pub fn media_files(&self) -> impl Iterator<Item = &File> {
        self.included().filter(|f| f.is_media_file())
    }

    pub fn javascript_files(&self) -> impl Iterator<Item = &File> {
        self.included().filter(|f| f.is_javascript())
    }

    pub fn css_files(&self) -> impl Iterator<Item = &File> {
        self.included().filter(|f| f.is_css())
    }

    /// Appends every file `theme` provides whose source URI isn't already
    /// present. Files already in `self` always take precedence.
    pub fn add_files_from_theme(&mut self, theme: &Theme, config: &Config) -> Result<()> {
        let mut added = 0;
        for uri in theme.list_files()? {
            if self.contains(&uri) {
                tracing::debug!(%uri, "theme file overridden by documentation file");
                continue;
            }

            if let Some(dir) = theme.locate(&uri) {
                let file = File::new(&uri, dir, &config.site_dir, config.use_directory_urls);
                self.append(file)?;
                added += 1;
            }
        }

        tracing::debug!(added, "added theme files");
        Ok(())
    }

    /// Freezes `self` into a shareable, read-only snapshot.
    pub fn seal(self) -> SealedFiles {
        SealedFiles(Arc::new(self))
    }
}

impl SealedFiles {
    /// Returns the collection for further modification, cloning it if other
    /// snapshots of it are still alive.
    pub fn unseal(self) -> Files {
        Arc::unwrap_or_clone(self.0)
    }
}

impl Deref for SealedFiles {
    type Target = Files;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a File;
    type IntoIter = std::slice::Iter<'a, File>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
static_assertions::assert_impl_all!(SealedFiles: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::Inclusion;

    fn files<const N: usize>(paths: [&str; N]) -> Files {
        let mut files = Files::new();
        for path in paths {
            files.append(File::new(path, "docs", "site", true)).unwrap();
        }

        files
    }

    fn uris<'a>(files: impl IntoIterator<Item = &'a File>) -> Vec<&'a str> {
        files.into_iter().map(|f| f.src_uri()).collect()
    }

    #[test]
    fn append_keeps_order_and_rejects_duplicates() {
        let mut files = files(["index.md", "a.md", "img.png"]);
        assert_eq!(files.len(), 3);
        assert!(files.append(File::new("a.md", "other", "site", false)).is_err());
        assert_eq!(files.len(), 3);
        assert_eq!(uris(&files), ["index.md", "a.md", "img.png"]);
        assert_eq!(files.get_by_path("a.md").unwrap().src_dir(), Some(Path::new("docs")));
    }

    #[test]
    fn lookup_by_source() {
        let files = files(["index.md", "foo/bar.md"]);
        assert!(files.contains("foo/bar.md"));
        assert!(!files.contains("foo/baz.md"));
        assert_eq!(files.get_by_path("foo/bar.md").unwrap().url(), "foo/bar/");
        assert!(files.get_by_path("bar.md").is_none());
        assert_eq!(files.src_uris().collect::<Vec<_>>(), ["index.md", "foo/bar.md"]);
    }

    #[test]
    fn remove_reindexes() {
        let mut files = files(["a.md", "b.md", "c.md", "d.md"]);
        assert_eq!(files.remove("b.md").unwrap().src_uri(), "b.md");
        assert!(files.remove("b.md").is_none());
        assert_eq!(files.get_by_path("c.md").unwrap().src_uri(), "c.md");
        assert_eq!(files.get_by_path("d.md").unwrap().src_uri(), "d.md");
        assert_eq!(uris(&files), ["a.md", "c.md", "d.md"]);

        files.append(File::new("b.md", "docs", "site", true)).unwrap();
        assert_eq!(uris(&files), ["a.md", "c.md", "d.md", "b.md"]);
        assert_eq!(files.get_by_path("b.md").unwrap().src_uri(), "b.md");
    }

    #[test]
    fn rename_rekeys_in_place() {
        let mut files = files(["a.md", "b.md"]);
        files.rename("a.md", "z.md").unwrap();
        assert_eq!(uris(&files), ["z.md", "b.md"]);
        assert!(!files.contains("a.md"));

        let renamed = files.get_by_path("z.md").unwrap();
        assert_eq!(renamed.dest_uri(), "a/index.html");

        assert!(files.rename("z.md", "b.md").is_err());
        assert!(files.rename("missing.md", "c.md").is_err());
        assert!(files.rename("b.md", "b.md").is_ok());
        assert_eq!(uris(&files), ["z.md", "b.md"]);

        files.rename("b.md", "/./sub//b.md").unwrap();
        assert_eq!(uris(&files), ["z.md", "sub/b.md"]);
        assert!(files.get_by_path("sub/b.md").is_some());
        assert!(files.rename("sub/b.md", "./z.md").is_err());
    }

    #[test]
    fn category_views_skip_excluded_files() {
        let mut files = Files::new();
        let paths = [
            "index.md", "a.html", "b.md", "app.js", "style.css", "img.png", "drafts.md", "old.css",
        ];

        for path in paths {
            let mut file = File::new(path, "docs", "site", true);
            file.inclusion = match path {
                "drafts.md" | "old.css" => Inclusion::Excluded,
                "b.md" => Inclusion::NotInNav,
                _ => Inclusion::Included,
            };

            files.append(file).unwrap();
        }

        assert_eq!(uris(files.documentation_pages()), ["index.md", "b.md"]);
        assert_eq!(uris(files.static_pages()), ["a.html"]);
        assert_eq!(uris(files.media_files()), ["app.js", "style.css", "img.png"]);
        assert_eq!(uris(files.javascript_files()), ["app.js"]);
        assert_eq!(uris(files.css_files()), ["style.css"]);
        assert_eq!(files.len(), paths.len());
    }

    #[test]
    fn documentation_files_override_theme_files() {
        let (docs, theme_dir) = (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap());
        for path in ["favicon.ico", "style.css", "main.html"] {
            fs::write(theme_dir.path().join(path), "theme").unwrap();
        }

        let config = Config { site_dir: "site".into(), ..Config::default() };
        let mut files = Files::new();
        for path in ["index.md", "favicon.ico"] {
            files.append(File::new(path, docs.path(), "site", true)).unwrap();
        }

        let theme = Theme::new([theme_dir.path()], Vec::<String>::new());
        files.add_files_from_theme(&theme, &config).unwrap();
        assert_eq!(uris(&files), ["index.md", "favicon.ico", "style.css"]);
        assert_eq!(files.get_by_path("favicon.ico").unwrap().src_dir(), Some(docs.path()));
        assert_eq!(files.get_by_path("style.css").unwrap().src_dir(), Some(theme_dir.path()));
    }

    #[test]
    fn sealed_files_are_shared_snapshots() {
        let sealed = files(["index.md", "a.md"]).seal();
        let clone = sealed.clone();
        let handle = std::thread::spawn(move || clone.len());
        assert_eq!(handle.join().unwrap(), 2);
        assert_eq!(uris(sealed.documentation_pages()), ["index.md", "a.md"]);

        let mut files = sealed.unseal();
        files.append(File::new("b.md", "docs", "site", true)).unwrap();
        assert_eq!(files.len(), 3);
    }
}
