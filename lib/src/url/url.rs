use std::fmt;
use std::ops::Deref;
use std::borrow::{Borrow, Cow};

pub use super::{UrlBuf, is_url_char, quote};

/// A borrowed, site-relative or absolute URL.
///
/// Every URL a [`File`](crate::File) hands out is percent-encoded and thus
/// valid; constructing a `Url` from a string containing characters outside of
/// the URL character set fails.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Url(str);

impl Url {
    pub const fn new(from: &str) -> &Url {
        match Self::try_new(from) {
            Some(url) => url,
            None => panic!("invalid URL"),
        }
    }

    pub const fn try_new(from: &str) -> Option<&Url> {
        if !Self::is_valid_str(from) {
            return None;
        }

        Some(unsafe { &*(from as *const str as *const Url) })
    }

    pub const fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_url_buf(&self) -> UrlBuf {
        UrlBuf::from(self.0.to_owned())
    }

    /// `from` as a URL, [quoted](quote) if it contains characters outside of
    /// the URL character set.
    ///
    /// ```rust
    /// use folio::url::Url;
    ///
    /// assert_eq!(&*Url::quoted("foo/%20bar.html"), "foo/%20bar.html");
    /// assert_eq!(&*Url::quoted("foo bar/"), "foo%20bar/");
    /// assert_eq!(&*Url::quoted("über/"), "%C3%BCber/");
    /// ```
    pub fn quoted(from: &str) -> Cow<'_, Url> {
        match Url::try_new(from) {
            Some(url) => Cow::Borrowed(url),
            None => Cow::Owned(quote(from)),
        }
    }

    /// ```rust
    /// use folio::url::Url;
    ///
    /// let url = Url::new("http://rocket.rs");
    /// assert_eq!(url.scheme(), Some("http"));
    ///
    /// let url = Url::new("mailto:foo@bar.com");
    /// assert_eq!(url.scheme(), Some("mailto"));
    ///
    /// let url = Url::new("foo#bar:baz");
    /// assert_eq!(url.scheme(), None);
    ///
    /// let url = Url::new("foo/bar:baz");
    /// assert_eq!(url.scheme(), None);
    /// ```
    pub fn scheme(&self) -> Option<&str> {
        let bytes = self.as_bytes();
        match memchr::memchr3(b':', b'?', b'/', bytes) {
            Some(i) if bytes[i] == b':' => match memchr::memrchr(b'#', &bytes[..i]) {
                Some(_) => None,
                None => Some(&self[..i]),
            }
            _ => None,
        }
    }

    const fn is_valid_str(string: &str) -> bool {
        let mut i = 0;
        let bytes = string.as_bytes();
        while i < bytes.len() {
            if !is_url_char(&bytes[i]) {
                return false;
            }

            i += 1;
        }

        true
    }

    pub fn is_absolute(&self) -> bool {
        self.starts_with('/') || self.scheme().is_some()
    }

    /// Whether `self` names a directory, that is, ends in `/`.
    pub fn is_dir(&self) -> bool {
        self.ends_with('/')
    }

    /// The normalized path segments of `self`: empty and `.` segments are
    /// dropped and `..` removes the preceding segment.
    ///
    /// ```rust
    /// use folio::url::Url;
    ///
    /// assert_eq!(Url::new("foo/./bar//baz/").segments(), ["foo", "bar", "baz"]);
    /// assert_eq!(Url::new("foo/../bar.html").segments(), ["bar.html"]);
    /// assert!(Url::new("./").segments().is_empty());
    /// ```
    pub fn segments(&self) -> Vec<&str> {
        normalized_segments(self.as_str())
    }

    /// The segments of the directory `self` is relative to when used as the
    /// base of a relative reference. A final segment containing a `.` is a
    /// file and is not part of the directory; a trailing `/` marks the whole
    /// URL as a directory.
    fn base_segments(&self) -> Vec<&str> {
        let dir = match self.as_str().rsplit_once('/') {
            _ if self.as_str() == "." => ".",
            Some((dir, file)) if file.contains('.') => dir,
            None if self.contains('.') => "",
            _ => self.as_str(),
        };

        normalized_segments(dir)
    }

    /// Returns the reference which, resolved against `base`, yields `self`.
    ///
    /// `base` may be directory-style (`foo/bar/`) or flat (`foo/bar.html`);
    /// the directory of a flat base is its parent. A raw string `base` is
    /// [quoted](Url::quoted) first.
    ///
    /// ```rust
    /// use folio::url::Url;
    ///
    /// let img = Url::new("img.jpg");
    /// assert_eq!(img.relative_to(Url::new("./")), "img.jpg");
    /// assert_eq!(img.relative_to(Url::new("foo/bar/")), "../../img.jpg");
    /// assert_eq!(img.relative_to(Url::new("foo/bar.html")), "../img.jpg");
    ///
    /// let root = Url::new("./");
    /// assert_eq!(root.relative_to(Url::new("./")), "./");
    /// assert_eq!(root.relative_to(Url::new("foo/")), "../");
    ///
    /// let page = Url::new("foo/");
    /// assert_eq!(page.relative_to(Url::new("foo/")), "./");
    /// assert_eq!(img.relative_to("foo bar/"), "../img.jpg");
    /// ```
    pub fn relative_to<B: ToUrl + ?Sized>(&self, base: &B) -> UrlBuf {
        let base_url = base.to_url();
        let base = base_url.base_segments();
        let target = self.segments();
        let common = base.iter()
            .zip(target.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts = vec![".."; base.len() - common];
        parts.extend_from_slice(&target[common..]);

        let mut relative = if parts.is_empty() {
            String::from(".")
        } else {
            parts.join("/")
        };

        if self.is_dir() {
            relative.push('/');
        }

        UrlBuf::from(relative)
    }

    /// Resolves the reference `relative` against `self`, the inverse of
    /// [`Url::relative_to()`]. Absolute references are returned unchanged.
    ///
    /// ```rust
    /// use folio::url::Url;
    ///
    /// let base = Url::new("foo/bar/");
    /// assert_eq!(base.resolve(Url::new("../../img.jpg")), "img.jpg");
    /// assert_eq!(base.resolve(Url::new("../")), "foo/");
    /// assert_eq!(base.resolve(Url::new("../../")), "./");
    /// assert_eq!(base.resolve(Url::new("/abs")), "/abs");
    ///
    /// let base = Url::new("foo/bar.html");
    /// assert_eq!(base.resolve(Url::new("baz.html")), "foo/baz.html");
    /// ```
    pub fn resolve<R: ToUrl + ?Sized>(&self, relative: &R) -> UrlBuf {
        let relative = relative.to_url();
        if relative.is_absolute() {
            return relative.to_url_buf();
        }

        let mut parts = self.base_segments();
        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => { parts.pop(); },
                segment => parts.push(segment),
            }
        }

        let is_dir = relative.is_dir() || relative.as_str() == ".";
        let mut url = if parts.is_empty() {
            String::from(".")
        } else {
            parts.join("/")
        };

        if is_dir {
            url.push('/');
        }

        UrlBuf::from(url)
    }
}

fn normalized_segments(path: &str) -> Vec<&str> {
    let mut segments = vec![];
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => { segments.pop(); },
            segment => segments.push(segment),
        }
    }

    segments
}

/// Values that name a [`Url`]. Strings outside of the URL character set are
/// [quoted](Url::quoted), so the conversion never fails.
pub trait ToUrl {
    fn to_url(&self) -> Cow<'_, Url>;
}

impl ToUrl for Url {
    fn to_url(&self) -> Cow<'_, Url> {
        Cow::Borrowed(self)
    }
}

impl ToUrl for UrlBuf {
    fn to_url(&self) -> Cow<'_, Url> {
        Cow::Borrowed(self.as_url())
    }
}

impl ToUrl for str {
    fn to_url(&self) -> Cow<'_, Url> {
        Url::quoted(self)
    }
}

impl ToUrl for String {
    fn to_url(&self) -> Cow<'_, Url> {
        Url::quoted(self)
    }
}

impl Deref for Url {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Borrow<str> for Url {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<Url> for Url {
    fn as_ref(&self) -> &Url {
        self
    }
}

impl ToOwned for Url {
    type Owned = UrlBuf;

    fn to_owned(&self) -> Self::Owned {
        self.to_url_buf()
    }
}

impl PartialEq<str> for Url {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Url {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
