use std::fmt;
use std::ops::Deref;
use std::borrow::Borrow;

use serde::Serialize;

pub use super::Url;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UrlBuf(String);

impl UrlBuf {
    pub fn new() -> UrlBuf {
        UrlBuf(String::new())
    }

    pub fn as_url(&self) -> &Url {
        Url::new(self.0.as_str())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Strings outside of the URL character set are [quoted](super::quote).
impl From<String> for UrlBuf {
    fn from(value: String) -> Self {
        match Url::try_new(&value) {
            Some(_) => UrlBuf(value),
            None => super::quote(&value),
        }
    }
}

impl From<&str> for UrlBuf {
    fn from(value: &str) -> Self {
        Url::quoted(value).into_owned()
    }
}

impl From<&Url> for UrlBuf {
    fn from(value: &Url) -> Self {
        value.to_url_buf()
    }
}

impl Deref for UrlBuf {
    type Target = Url;

    fn deref(&self) -> &Self::Target {
        self.as_url()
    }
}

impl AsRef<Url> for UrlBuf {
    fn as_ref(&self) -> &Url {
        self.as_url()
    }
}

impl Borrow<Url> for UrlBuf {
    fn borrow(&self) -> &Url {
        self.as_url()
    }
}

impl AsRef<str> for UrlBuf {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for UrlBuf {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for UrlBuf {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UrlBuf {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&Url> for UrlBuf {
    fn eq(&self, other: &&Url) -> bool {
        self.0 == other.as_str()
    }
}

impl fmt::Display for UrlBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UrlBuf> for String {
    fn from(value: UrlBuf) -> Self {
        value.0
    }
}
