use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Chainable, Result};

/// A set of gitignore-style lines matched against URIs relative to a root.
///
/// Later lines take precedence over earlier ones, and `!` lines re-include
/// what an earlier line excluded.
///
/// ```rust
/// use folio::pattern::Patterns;
///
/// let patterns = Patterns::new([".*", "/templates/", "*.py", "!keep.py"]).unwrap();
/// assert!(patterns.is_match("foo/.hidden.md", false));
/// assert!(patterns.is_match(".git/config", false));
/// assert!(patterns.is_match("templates/base.md", false));
/// assert!(patterns.is_match("foo/a.py", false));
/// assert!(!patterns.is_match("foo/templates/base.md", false));
/// assert!(!patterns.is_match("keep.py", false));
/// assert!(!patterns.is_match("foo/bar.md", false));
/// ```
#[derive(Debug, Clone)]
pub struct Patterns {
    matcher: Gitignore,
}

impl Patterns {
    pub fn new<I, S>(lines: I) -> Result<Self>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        Patterns::build(lines, false)
    }

    /// Like [`Patterns::new()`], but letters match regardless of case.
    pub fn case_insensitive<I, S>(lines: I) -> Result<Self>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        Patterns::build(lines, true)
    }

    fn build<I, S>(lines: I, case_insensitive: bool) -> Result<Self>
        where I: IntoIterator<Item = S>, S: AsRef<str>
    {
        let mut builder = GitignoreBuilder::new("");
        builder.case_insensitive(case_insensitive)?;
        for line in lines {
            let line = line.as_ref();
            builder.add_line(None, line).chain_with(|| error! {
                "invalid file pattern",
                "pattern" => line,
            })?;
        }

        Ok(Patterns { matcher: builder.build()? })
    }

    /// Whether the file or directory at `uri`, or any directory containing
    /// it, is matched by a line that isn't later negated.
    pub fn is_match(&self, uri: &str, is_dir: bool) -> bool {
        if uri.is_empty() {
            return false;
        }

        self.matcher.matched_path_or_any_parents(Path::new(uri), is_dir).is_ignore()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Patterns;

    #[test]
    fn directory_patterns_match_contents() {
        let patterns = Patterns::new(["/drafts/", "build/"]).unwrap();
        assert!(patterns.is_match("drafts/a.md", false));
        assert!(patterns.is_match("drafts/deep/a.md", false));
        assert!(patterns.is_match("foo/build/a.md", false));
        assert!(!patterns.is_match("foo/drafts/a.md", false));
        assert!(!patterns.is_match("drafts.md", false));
    }

    #[test]
    fn case_sensitivity() {
        let patterns = Patterns::new(["*.PY"]).unwrap();
        assert!(patterns.is_match("a.PY", false));
        assert!(!patterns.is_match("a.py", false));

        let patterns = Patterns::case_insensitive(["*readme*"]).unwrap();
        assert!(patterns.is_match("README.md", false));
        assert!(patterns.is_match("foo/ReadMe.txt", false));
    }

    #[test]
    fn empty_and_invalid_patterns() {
        let patterns = Patterns::new(Vec::<String>::new()).unwrap();
        assert!(patterns.is_empty());
        assert!(!patterns.is_match("a.md", false));

        assert!(Patterns::new(["a{b"]).is_err());
        assert!(Patterns::new(["docs/{a,b"]).is_err());
    }
}
