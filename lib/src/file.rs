use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Chainable, Result};
use crate::order::is_index_name;
use crate::uri::{self, FileKind, MediaKind};
use crate::url::{quote, ToUrl, Url, UrlBuf};

/// Whether, and how, a file takes part in the site.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    /// Present in the source tree but not part of the site.
    Excluded,
    /// Part of the site but never listed in navigation.
    NotInNav,
    #[default]
    Included,
}

impl Inclusion {
    pub fn is_excluded(self) -> bool {
        self == Inclusion::Excluded
    }

    /// Whether the file is part of the site at all.
    pub fn is_included(self) -> bool {
        !self.is_excluded()
    }

    pub fn is_in_nav(self) -> bool {
        self == Inclusion::Included
    }
}

/// A single source file and the artifact it maps to.
///
/// The source identity is stored once, as a `/`-separated URI relative to the
/// source root; [`File::src_path()`] is its native projection. The destination
/// is independent state: it is computed when the file is created and changes
/// only via [`File::set_dest_uri()`], never by renaming the source.
///
/// ```rust
/// use folio::File;
///
/// let file = File::new("foo/bar.md", "docs", "site", true);
/// assert_eq!(file.dest_uri(), "foo/bar/index.html");
/// assert_eq!(file.url(), "foo/bar/");
/// assert_eq!(file.name(), "bar");
///
/// let file = File::new("foo/README.md", "docs", "site", false);
/// assert_eq!(file.dest_uri(), "foo/index.html");
/// assert_eq!(file.url(), "foo/index.html");
/// ```
#[derive(derive_more::Debug, Clone)]
pub struct File {
    pub(crate) src_uri: String,
    pub(crate) src_dir: Option<PathBuf>,
    pub(crate) dest_dir: PathBuf,
    pub(crate) dest_uri: String,
    pub(crate) url: UrlBuf,
    pub(crate) use_directory_urls: bool,
    pub inclusion: Inclusion,
    pub(crate) modified: Option<bool>,
    #[debug(ignore)]
    pub(crate) content: Option<Vec<u8>>,
}

impl File {
    /// A file at `src_path`, relative to `src_dir`, whose destination is
    /// derived from its source.
    pub fn new<P, S, D>(src_path: P, src_dir: S, dest_dir: D, use_directory_urls: bool) -> File
        where P: AsRef<Path>, S: Into<PathBuf>, D: Into<PathBuf>
    {
        let src_uri = uri::uri_of(src_path);
        let dest_uri = dest_uri_of(&src_uri, use_directory_urls);
        File::build(src_uri, Some(src_dir.into()), dest_dir.into(), dest_uri, use_directory_urls)
    }

    /// Like [`File::new()`] but with an explicit destination, used verbatim.
    pub fn with_dest_uri<P, S, D>(
        src_path: P,
        src_dir: S,
        dest_dir: D,
        use_directory_urls: bool,
        dest_uri: impl Into<String>,
    ) -> File
        where P: AsRef<Path>, S: Into<PathBuf>, D: Into<PathBuf>
    {
        let src_uri = uri::uri_of(src_path);
        File::build(src_uri, Some(src_dir.into()), dest_dir.into(), dest_uri.into(), use_directory_urls)
    }

    /// A file with no source on disk whose contents are `content`.
    ///
    /// ```rust
    /// use folio::File;
    ///
    /// let file = File::generated("sitemap.xml", "<urlset/>", "site", true);
    /// assert!(file.abs_src_path().is_none());
    /// assert!(file.is_static_page());
    /// assert_eq!(file.content_string().unwrap(), "<urlset/>");
    /// ```
    pub fn generated<D>(
        src_uri: &str,
        content: impl Into<Vec<u8>>,
        dest_dir: D,
        use_directory_urls: bool,
    ) -> File
        where D: Into<PathBuf>
    {
        let src_uri = uri::canonical(src_uri);
        let dest_uri = dest_uri_of(&src_uri, use_directory_urls);
        let mut file = File::build(src_uri, None, dest_dir.into(), dest_uri, use_directory_urls);
        file.content = Some(content.into());
        file
    }

    fn build(
        src_uri: String,
        src_dir: Option<PathBuf>,
        dest_dir: PathBuf,
        dest_uri: String,
        use_directory_urls: bool,
    ) -> File {
        File {
            url: url_of(&dest_uri, use_directory_urls),
            src_uri,
            src_dir,
            dest_dir,
            dest_uri,
            use_directory_urls,
            inclusion: Inclusion::default(),
            modified: None,
            content: None,
        }
    }

    pub fn src_uri(&self) -> &str {
        &self.src_uri
    }

    /// Replaces the source identity with the canonical form of `uri`. The
    /// destination is unaffected.
    pub fn set_src_uri(&mut self, uri: impl AsRef<str>) {
        self.src_uri = uri::canonical(uri.as_ref());
    }

    /// The source identity as a native path relative to the source root.
    pub fn src_path(&self) -> PathBuf {
        uri::path_of(&self.src_uri)
    }

    /// Replaces the source identity with the normalized form of `path`. The
    /// destination is unaffected.
    pub fn set_src_path<P: AsRef<Path>>(&mut self, path: P) {
        self.src_uri = uri::uri_of(path);
    }

    pub fn src_dir(&self) -> Option<&Path> {
        self.src_dir.as_deref()
    }

    /// The absolute path of the source, or `None` for generated files.
    pub fn abs_src_path(&self) -> Option<PathBuf> {
        self.src_dir.as_ref().map(|dir| dir.join(self.src_path()))
    }

    pub fn dest_uri(&self) -> &str {
        &self.dest_uri
    }

    /// Replaces the destination with `uri`, as is, and recomputes the URL.
    pub fn set_dest_uri(&mut self, uri: impl Into<String>) {
        self.dest_uri = uri.into();
        self.url = url_of(&self.dest_uri, self.use_directory_urls);
    }

    pub fn dest_path(&self) -> PathBuf {
        uri::path_of(&self.dest_uri)
    }

    pub fn set_dest_path<P: AsRef<Path>>(&mut self, path: P) {
        self.set_dest_uri(uri::uri_of(path));
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn abs_dest_path(&self) -> PathBuf {
        self.dest_dir.join(self.dest_path())
    }

    /// The percent-encoded URL of the destination, relative to the site root.
    pub fn url(&self) -> &Url {
        self.url.as_url()
    }

    pub fn use_directory_urls(&self) -> bool {
        self.use_directory_urls
    }

    /// The logical name of the file: the stem of its source file name, or
    /// `index` for index-like files.
    pub fn name(&self) -> &str {
        let file_name = uri::file_name(&self.src_uri);
        if is_index_name(file_name) {
            "index"
        } else {
            uri::split_ext(file_name).0
        }
    }

    pub fn kind(&self) -> FileKind {
        FileKind::of(&self.src_uri)
    }

    pub fn is_documentation_page(&self) -> bool {
        self.kind() == FileKind::Documentation
    }

    pub fn is_static_page(&self) -> bool {
        self.kind() == FileKind::StaticPage
    }

    pub fn is_media_file(&self) -> bool {
        matches!(self.kind(), FileKind::Media(_))
    }

    pub fn is_javascript(&self) -> bool {
        self.kind() == FileKind::Media(MediaKind::Javascript)
    }

    pub fn is_css(&self) -> bool {
        self.kind() == FileKind::Media(MediaKind::Stylesheet)
    }

    pub fn is_generated(&self) -> bool {
        self.content.is_some()
    }

    /// The URL of `self` relative to `other`, a file or a raw URL. Raw URLs
    /// outside of the URL character set are percent-encoded first.
    ///
    /// ```rust
    /// use folio::File;
    ///
    /// let img = File::new("img.jpg", "docs", "site", true);
    /// let page = File::new("foo/bar.md", "docs", "site", true);
    /// assert_eq!(img.url_relative_to(&page), "../../img.jpg");
    /// assert_eq!(page.url_relative_to(&img), "foo/bar/");
    /// assert_eq!(img.url_relative_to("foo/bar.html"), "../img.jpg");
    /// assert_eq!(img.url_relative_to("foo bar/"), "../img.jpg");
    /// ```
    pub fn url_relative_to<O: ToUrl + ?Sized>(&self, other: &O) -> UrlBuf {
        self.url.relative_to(other)
    }

    /// Overrides [`File::is_modified()`] with `modified`, or clears the
    /// override when `None`.
    pub fn assume_modified(&mut self, modified: impl Into<Option<bool>>) {
        self.modified = modified.into();
    }

    /// The contents of the file: the generated content, if any, or the bytes
    /// of the source file.
    pub fn content_bytes(&self) -> Result<Cow<'_, [u8]>> {
        if let Some(content) = &self.content {
            return Ok(Cow::Borrowed(content.as_slice()));
        }

        let path = self.require_src_path()?;
        let bytes = fs::read(&path).chain_with(|| error! {
            "failed to read source file",
            "source path" => path.display(),
        })?;

        Ok(Cow::Owned(bytes))
    }

    /// Like [`File::content_bytes()`] but as UTF-8 text.
    pub fn content_string(&self) -> Result<Cow<'_, str>> {
        match self.content_bytes()? {
            Cow::Borrowed(bytes) => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| error!("content is not valid UTF-8", "source uri" => self.src_uri, e)),
            Cow::Owned(bytes) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|e| error!("content is not valid UTF-8", "source uri" => self.src_uri, e)),
        }
    }

    pub(crate) fn require_src_path(&self) -> Result<PathBuf> {
        match self.abs_src_path() {
            Some(path) => Ok(path),
            None => err!("file has neither content nor a source", "source uri" => self.src_uri),
        }
    }
}

impl ToUrl for File {
    fn to_url(&self) -> Cow<'_, Url> {
        Cow::Borrowed(self.url())
    }
}

fn dest_uri_of(src_uri: &str, use_directory_urls: bool) -> String {
    if FileKind::of(src_uri) != FileKind::Documentation {
        return src_uri.to_owned();
    }

    let (dir, file_name) = (uri::parent(src_uri), uri::file_name(src_uri));
    if is_index_name(file_name) {
        return uri::join(dir, "index.html");
    }

    let (stem, _) = uri::split_ext(file_name);
    if use_directory_urls {
        uri::join(&uri::join(dir, stem), "index.html")
    } else {
        uri::join(dir, &format!("{stem}.html"))
    }
}

fn url_of(dest_uri: &str, use_directory_urls: bool) -> UrlBuf {
    if use_directory_urls && uri::file_name(dest_uri) == "index.html" {
        return match uri::parent(dest_uri) {
            "" => quote("./"),
            dir => quote(&format!("{dir}/")),
        };
    }

    quote(dest_uri)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    const DOCS: &str = "/path/to/docs";
    const SITE: &str = "/path/to/site";

    fn file(path: &str, use_directory_urls: bool) -> File {
        File::new(path, DOCS, SITE, use_directory_urls)
    }

    fn native(uri: &str) -> PathBuf {
        uri.split('/').collect()
    }

    #[track_caller]
    fn assert_file(file: &File, dest_uri: &str, url: &str, name: &str, kind: FileKind) {
        assert_eq!(file.dest_uri(), dest_uri);
        assert_eq!(file.url(), url);
        assert_eq!(file.name(), name);
        assert_eq!(file.kind(), kind);
        assert_eq!(file.src_path(), native(file.src_uri()));
        assert_eq!(file.dest_path(), native(dest_uri));
        assert_eq!(file.abs_src_path().unwrap(), Path::new(DOCS).join(native(file.src_uri())));
        assert_eq!(file.abs_dest_path(), Path::new(SITE).join(native(dest_uri)));
    }

    #[test]
    fn documentation_pages_with_flat_urls() {
        let doc = FileKind::Documentation;
        assert_file(&file("foo.md", false), "foo.html", "foo.html", "foo", doc);
        assert_file(&file("foo/bar.md", false), "foo/bar.html", "foo/bar.html", "bar", doc);
        assert_file(&file("index.md", false), "index.html", "index.html", "index", doc);
        assert_file(&file("foo/index.md", false), "foo/index.html", "foo/index.html", "index", doc);
        assert_file(&file("foo/README.md", false), "foo/index.html", "foo/index.html", "index", doc);
        assert_file(&file("foo/bar.markdown", false), "foo/bar.html", "foo/bar.html", "bar", doc);
    }

    #[test]
    fn documentation_pages_with_directory_urls() {
        let doc = FileKind::Documentation;
        assert_file(&file("foo.md", true), "foo/index.html", "foo/", "foo", doc);
        assert_file(&file("foo/bar.md", true), "foo/bar/index.html", "foo/bar/", "bar", doc);
        assert_file(&file("index.md", true), "index.html", "./", "index", doc);
        assert_file(&file("README.md", true), "index.html", "./", "index", doc);
        assert_file(&file("foo/index.md", true), "foo/index.html", "foo/", "index", doc);
        assert_file(&file("foo/Readme.MD", true), "foo/index.html", "foo/", "index", doc);
    }

    #[test]
    fn static_pages_and_media_mirror_their_source() {
        let page = FileKind::StaticPage;
        for use_directory_urls in [true, false] {
            let f = file("foo/bar.html", use_directory_urls);
            assert_file(&f, "foo/bar.html", "foo/bar.html", "bar", page);

            let f = file("foo/bar.jpg", use_directory_urls);
            assert_file(&f, "foo/bar.jpg", "foo/bar.jpg", "bar", FileKind::Media(MediaKind::Other));
            assert!(f.is_media_file() && !f.is_javascript() && !f.is_css());

            let f = file("foo/bar.js", use_directory_urls);
            assert!(f.is_media_file() && f.is_javascript());

            let f = file("foo/bar.css", use_directory_urls);
            assert!(f.is_media_file() && f.is_css());
        }

        assert_eq!(file("foo/index.html", true).url(), "foo/");
        assert_eq!(file("foo/index.html", false).url(), "foo/index.html");
    }

    #[test]
    fn urls_are_quoted() {
        let f = file("foo bar.md", false);
        assert_eq!(f.dest_uri(), "foo bar.html");
        assert_eq!(f.url(), "foo%20bar.html");

        let f = file("foo bar.md", true);
        assert_eq!(f.dest_uri(), "foo bar/index.html");
        assert_eq!(f.url(), "foo%20bar/");

        assert_eq!(file("über/a#b.png", true).url(), "%C3%BCber/a%23b.png");
    }

    #[test]
    fn explicit_destinations_are_verbatim() {
        let mut f = File::with_dest_uri("foo/bar.md", DOCS, SITE, true, "more/stuff.html");
        assert_eq!(f.dest_uri(), "more/stuff.html");
        assert_eq!(f.url(), "more/stuff.html");

        f.set_dest_uri("other/index.html");
        assert_eq!(f.url(), "other/");
        assert_eq!(f.abs_dest_path(), Path::new(SITE).join(native("other/index.html")));
    }

    #[test]
    fn renaming_the_source_keeps_the_destination() {
        let mut f = file("foo/bar.md", true);
        f.set_src_uri("foo/baz.md");
        assert_eq!(f.src_uri(), "foo/baz.md");
        assert_eq!(f.src_path(), native("foo/baz.md"));
        assert_eq!(f.name(), "baz");
        assert_eq!(f.dest_uri(), "foo/bar/index.html");
        assert_eq!(f.url(), "foo/bar/");

        f.set_src_path(Path::new("foo").join(".").join("qux.md"));
        assert_eq!(f.src_uri(), "foo/qux.md");
        assert_eq!(f.abs_src_path().unwrap(), Path::new(DOCS).join(native("foo/qux.md")));

        f.set_src_uri("/foo/./bar//quux.md");
        assert_eq!(f.src_uri(), "foo/bar/quux.md");
        assert_eq!(f.dest_uri(), "foo/bar/index.html");
    }

    #[cfg(not(windows))]
    #[test]
    fn backslashes_are_file_name_characters() {
        let mut f = file("foo\\a.md", false);
        assert_eq!(f.src_uri(), "foo\\a.md");
        assert_eq!(f.dest_uri(), "foo\\a.html");
        assert_eq!(f.url(), "foo%5Ca.html");

        f.set_src_uri("bar\\b.md");
        assert_eq!(f.src_path(), Path::new("bar\\b.md"));
    }

    #[cfg(windows)]
    #[test]
    fn backslashes_are_separators_on_windows() {
        let mut f = file("foo\\a.md", false);
        assert_eq!(f.src_uri(), "foo/a.md");
        assert_eq!(f.dest_uri(), "foo/a.html");

        f.set_src_path("bar\\b.md");
        assert_eq!(f.src_uri(), "bar/b.md");
        assert_eq!(f.src_path(), Path::new("bar\\b.md"));
    }

    #[test]
    fn relative_urls_with_directory_urls() {
        // (from, to, expected)
        let cases = [
            ("img.jpg", "index.md", "img.jpg"),
            ("img.jpg", "foo/bar.md", "../../img.jpg"),
            ("img.jpg", "foo/index.md", "../img.jpg"),
            ("foo/img.jpg", "foo/bar.md", "../img.jpg"),
            ("foo/bar.md", "img.jpg", "foo/bar/"),
            ("foo/bar.md", "foo/bar.md", "./"),
            ("index.md", "foo/bar.md", "../../"),
            ("index.md", "index.md", "./"),
            ("foo/index.md", "foo/bar.md", "../"),
            ("foo/baz.md", "foo/bar.md", "../baz/"),
        ];

        for (from, to, expected) in cases {
            let (from, to) = (file(from, true), file(to, true));
            assert_eq!(from.url_relative_to(&to), expected, "{} -> {}", from.src_uri(), to.src_uri());
        }
    }

    #[test]
    fn relative_urls_with_flat_urls() {
        let cases = [
            ("img.jpg", "index.md", "img.jpg"),
            ("img.jpg", "foo/bar.md", "../img.jpg"),
            ("foo/img.jpg", "foo/bar.md", "img.jpg"),
            ("foo/bar.md", "img.jpg", "foo/bar.html"),
            ("foo/bar.md", "foo/bar.md", "bar.html"),
            ("index.md", "foo/bar/baz.md", "../../index.html"),
            ("foo/index.md", "foo/bar.md", "index.html"),
        ];

        for (from, to, expected) in cases {
            let (from, to) = (file(from, false), file(to, false));
            assert_eq!(from.url_relative_to(&to), expected, "{} -> {}", from.src_uri(), to.src_uri());
        }
    }

    #[test]
    fn relative_urls_to_raw_strings() {
        let img = file("img.jpg", true);
        assert_eq!(img.url_relative_to("foo bar/"), "../img.jpg");
        assert_eq!(img.url_relative_to("über/"), "../img.jpg");
        assert_eq!(img.url_relative_to("über/a b.html"), "../img.jpg");

        let page = file("foo bar.md", true);
        assert_eq!(page.url_relative_to("foo bar/"), "./");
        assert_eq!(page.url_relative_to(&String::from("./")), "foo%20bar/");
    }

    #[test]
    fn relative_urls_resolve_back() {
        let paths = [
            "index.md", "README.md", "foo.md", "foo/bar.md", "foo/index.md", "foo/bar/baz.md",
            "img.jpg", "foo/img.jpg", "foo/bar.html", "foo bar.md", "foo/bar/index.html",
        ];

        for use_directory_urls in [true, false] {
            for a in paths {
                for b in paths {
                    let (a, b) = (file(a, use_directory_urls), file(b, use_directory_urls));
                    let relative = a.url_relative_to(&b);
                    assert_eq!(b.url().resolve(&relative), a.url(), "{} from {}", a.url(), b.url());
                }
            }
        }
    }

    #[test]
    fn generated_content() {
        let f = File::generated("foo/gen.md", "# Generated", SITE, true);
        assert!(f.is_generated());
        assert!(f.src_dir().is_none());
        assert!(f.abs_src_path().is_none());
        assert_eq!(f.dest_uri(), "foo/gen/index.html");
        assert_eq!(f.content_bytes().unwrap().as_ref(), b"# Generated");
        assert_eq!(f.content_string().unwrap(), "# Generated");

        let f = File::generated("blob.bin", vec![0xff, 0xfe], SITE, true);
        assert!(f.content_string().is_err());
    }

    #[test]
    fn content_is_read_from_the_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "hello").unwrap();

        let f = File::new("a.md", dir.path(), SITE, true);
        assert!(!f.is_generated());
        assert_eq!(f.content_string().unwrap(), "hello");
        assert!(File::new("b.md", dir.path(), SITE, true).content_bytes().is_err());
    }

    #[test]
    fn inclusion_states() {
        let mut f = file("foo.md", true);
        assert_eq!(f.inclusion, Inclusion::Included);
        assert!(f.inclusion.is_included() && f.inclusion.is_in_nav());

        f.inclusion = Inclusion::NotInNav;
        assert!(f.inclusion.is_included() && !f.inclusion.is_in_nav());

        f.inclusion = Inclusion::Excluded;
        assert!(f.inclusion.is_excluded() && !f.inclusion.is_included());
    }
}
