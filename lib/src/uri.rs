//! Conversions between native relative paths and canonical source URIs, and
//! classification of files by extension.
//!
//! A URI is the `/`-separated form of a path relative to a root: it never has
//! a leading `/`, never contains `.` segments, and is what a
//! [`Files`](crate::Files) collection is keyed by.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Extensions of documentation sources, rendered into pages.
pub const DOCUMENTATION_EXTS: &[&str] = &["md", "markdown", "mdown", "mkdn", "mkd"];

/// Extensions of files already in a page format.
pub const STATIC_PAGE_EXTS: &[&str] = &["html", "htm", "xml", "json"];

pub const JAVASCRIPT_EXTS: &[&str] = &["js", "javascript", "mjs"];

pub const STYLESHEET_EXTS: &[&str] = &["css"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A markdown-like source rendered into an HTML page.
    Documentation,
    /// A page in its final format, such as `.html`.
    StaticPage,
    /// Anything else, served as-is.
    Media(MediaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Javascript,
    Stylesheet,
    Other,
}

impl FileKind {
    /// Classifies `uri` by its extension. Unknown extensions, and files without
    /// one, are [`MediaKind::Other`].
    ///
    /// ```rust
    /// use folio::uri::{FileKind, MediaKind};
    ///
    /// assert_eq!(FileKind::of("foo/bar.md"), FileKind::Documentation);
    /// assert_eq!(FileKind::of("foo/BAR.MARKDOWN"), FileKind::Documentation);
    /// assert_eq!(FileKind::of("bar.htm"), FileKind::StaticPage);
    /// assert_eq!(FileKind::of("bar.mjs"), FileKind::Media(MediaKind::Javascript));
    /// assert_eq!(FileKind::of("bar.css"), FileKind::Media(MediaKind::Stylesheet));
    /// assert_eq!(FileKind::of("bar.tar.gz"), FileKind::Media(MediaKind::Other));
    /// assert_eq!(FileKind::of(".md"), FileKind::Media(MediaKind::Other));
    /// ```
    pub fn of(uri: &str) -> FileKind {
        let ext = match split_ext(file_name(uri)).1 {
            Some(ext) => ext,
            None => return FileKind::Media(MediaKind::Other),
        };

        let is = |exts: &[&str]| exts.iter().any(|e| e.eq_ignore_ascii_case(ext));
        if is(DOCUMENTATION_EXTS) {
            FileKind::Documentation
        } else if is(STATIC_PAGE_EXTS) {
            FileKind::StaticPage
        } else if is(JAVASCRIPT_EXTS) {
            FileKind::Media(MediaKind::Javascript)
        } else if is(STYLESHEET_EXTS) {
            FileKind::Media(MediaKind::Stylesheet)
        } else {
            FileKind::Media(MediaKind::Other)
        }
    }
}

/// Converts a native path relative to some root into a canonical URI.
///
/// Root and prefix components are dropped, `.` components are skipped, and
/// `..` removes the preceding component.
///
/// ```rust
/// use folio::uri::uri_of;
///
/// assert_eq!(uri_of("foo/bar.md"), "foo/bar.md");
/// assert_eq!(uri_of("./foo/./bar/"), "foo/bar");
/// assert_eq!(uri_of("/foo/../bar.md"), "bar.md");
/// assert_eq!(uri_of("."), "");
/// ```
pub fn uri_of<P: AsRef<Path>>(path: P) -> String {
    let mut segments: Vec<String> = vec![];
    for component in path.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => continue,
            Component::ParentDir => { segments.pop(); },
            Component::Normal(v) => segments.push(v.to_string_lossy().into_owned()),
        }
    }

    segments.join("/")
}

/// Converts a URI into a native relative path.
///
/// `/` becomes the platform's separator. Nothing else is special: on hosts
/// where `/` is the separator, a `\` in `uri` remains part of a file name.
pub fn path_of(uri: &str) -> PathBuf {
    if MAIN_SEPARATOR == '/' {
        PathBuf::from(uri)
    } else {
        PathBuf::from(uri.replace('/', MAIN_SEPARATOR_STR))
    }
}

/// Normalizes a `/`-separated URI: leading `/` and `.` segments are dropped
/// and `..` removes the preceding segment.
///
/// ```rust
/// use folio::uri::canonical;
///
/// assert_eq!(canonical("/foo/./bar//baz.md"), "foo/bar/baz.md");
/// assert_eq!(canonical("foo/../bar.md"), "bar.md");
/// assert_eq!(canonical("foo/bar.md"), "foo/bar.md");
/// ```
pub fn canonical(uri: &str) -> String {
    uri_of(path_of(uri))
}

/// The final segment of `uri`.
pub fn file_name(uri: &str) -> &str {
    uri.rsplit_once('/').map_or(uri, |(_, name)| name)
}

/// Everything before the final segment of `uri`, or `""` at the root.
pub fn parent(uri: &str) -> &str {
    uri.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Splits a file name into its stem and extension. Leading dots never begin
/// an extension.
///
/// ```rust
/// use folio::uri::split_ext;
///
/// assert_eq!(split_ext("foo.md"), ("foo", Some("md")));
/// assert_eq!(split_ext("foo.tar.gz"), ("foo.tar", Some("gz")));
/// assert_eq!(split_ext("README"), ("README", None));
/// assert_eq!(split_ext(".dotfile"), (".dotfile", None));
/// assert_eq!(split_ext("..md.bak"), ("..md", Some("bak")));
/// assert_eq!(split_ext("foo."), ("foo", Some("")));
/// ```
pub fn split_ext(name: &str) -> (&str, Option<&str>) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(i) => (&name[..leading + i], Some(&name[leading + i + 1..])),
        None => (name, None),
    }
}

/// Joins two URIs with a single `/`, treating an empty `dir` as the root.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}
