use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::uri::split_ext;

/// Returns `true` if `name`, without its extension, is `index` or `readme` in
/// any case: the file stands in for its directory.
///
/// ```rust
/// use folio::order::is_index_name;
///
/// assert!(is_index_name("index.md"));
/// assert!(is_index_name("README.md"));
/// assert!(is_index_name("Index.html"));
/// assert!(!is_index_name("indexes.md"));
/// assert!(!is_index_name("index.md.bak"));
/// ```
pub fn is_index_name(name: &str) -> bool {
    let (stem, _) = split_ext(name);
    stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("readme")
}

/// Case-insensitive natural comparison: runs of ASCII digits compare by
/// numeric value, everything else by lowercased character.
///
/// ```rust
/// use std::cmp::Ordering;
/// use folio::order::natural_cmp;
///
/// assert_eq!(natural_cmp("page2.md", "page10.md"), Ordering::Less);
/// assert_eq!(natural_cmp("B.md", "a.md"), Ordering::Greater);
/// assert_eq!(natural_cmp("a.md", "aa.md"), Ordering::Less);
/// assert_eq!(natural_cmp("v01", "v1"), Ordering::Equal);
/// assert_eq!(natural_cmp("Foo", "foo"), Ordering::Equal);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.chars().peekable(), b.chars().peekable());
    loop {
        match (a.peek(), b.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let ordering = cmp_numbers(&digits(&mut a), &digits(&mut b));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(_), Some(_)) => {
                let (x, y) = (a.next().into_iter(), b.next().into_iter());
                let ordering = x.flat_map(char::to_lowercase)
                    .cmp(y.flat_map(char::to_lowercase));

                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }

    run
}

fn cmp_numbers(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The manifest order of two sibling file names: index-like names first, then
/// [`natural_cmp`] of the full names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    is_index_name(b).cmp(&is_index_name(a))
        .then_with(|| natural_cmp(a, b))
}

/// Stably sorts sibling file names into manifest order.
///
/// ```rust
/// use folio::order::sort_names;
///
/// let mut names = ["b.md", "bb.md", "a.md", "index.md", "aa.md"];
/// sort_names(&mut names);
/// assert_eq!(names, ["index.md", "a.md", "aa.md", "b.md", "bb.md"]);
/// ```
pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
}
