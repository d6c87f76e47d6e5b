use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Config, File, Files, Inclusion};
use crate::error::{Chainable, Result};
use crate::fstree::FsTree;
use crate::pattern::Patterns;
use crate::uri::{self, split_ext};
use crate::url::Url;

/// Lines excluded from every site ahead of the configured `exclude_docs`.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[".*", "/templates/"];

/// Decides the [`Inclusion`] of source files from their URIs.
#[derive(Debug, Clone)]
pub struct Exclusions {
    excluded: Patterns,
    not_in_nav: Patterns,
}

impl Exclusions {
    pub fn new<E, N>(exclude_docs: E, not_in_nav: N) -> Result<Self>
        where E: IntoIterator, E::Item: AsRef<str>,
              N: IntoIterator, N::Item: AsRef<str>,
    {
        let defaults = DEFAULT_EXCLUSIONS.iter().map(|line| line.to_string());
        let configured = exclude_docs.into_iter().map(|line| line.as_ref().to_owned());
        Ok(Exclusions {
            excluded: Patterns::new(defaults.chain(configured))?,
            not_in_nav: Patterns::new(not_in_nav)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Exclusions::new(&config.exclude_docs, &config.not_in_nav)
            .chain_with(|| "invalid `exclude_docs` or `not_in_nav` configuration")
    }

    /// ```rust
    /// use folio::Inclusion;
    /// use folio::manifest::Exclusions;
    ///
    /// let exclusions = Exclusions::new(["drafts/", "!.well-known/"], ["/hidden.md"]).unwrap();
    /// assert_eq!(exclusions.inclusion_of("index.md"), Inclusion::Included);
    /// assert_eq!(exclusions.inclusion_of(".notes.md"), Inclusion::Excluded);
    /// assert_eq!(exclusions.inclusion_of("templates/base.md"), Inclusion::Excluded);
    /// assert_eq!(exclusions.inclusion_of("foo/drafts/a.md"), Inclusion::Excluded);
    /// assert_eq!(exclusions.inclusion_of(".well-known/security.txt"), Inclusion::Included);
    /// assert_eq!(exclusions.inclusion_of("hidden.md"), Inclusion::NotInNav);
    /// ```
    pub fn inclusion_of(&self, uri: &str) -> Inclusion {
        if self.excluded.is_match(uri, false) {
            Inclusion::Excluded
        } else if self.not_in_nav.is_match(uri, false) {
            Inclusion::NotInNav
        } else {
            Inclusion::Included
        }
    }
}

/// Collects every file under `config.docs_dir` into a [`Files`] collection.
///
/// Within each directory, files precede subdirectories; files appear in
/// [manifest order](crate::order::compare_names) and subdirectories in
/// [natural order](crate::order::natural_cmp), recursively. Excluded files are
/// kept and marked [`Inclusion::Excluded`].
///
/// When included files map to the same destination, only one is kept: a
/// documentation page named `index`, else any documentation page, else the
/// first in manifest order. The kept file stays at its own position. A
/// warning is logged for each file dropped this way.
///
/// Local entries in `extra_css` and `extra_javascript` are always included;
/// entries that name no file in the source tree are added as files that are
/// not in navigation.
pub fn get_files(config: &Config) -> Result<Files> {
    let exclusions = Exclusions::from_config(config)?;
    let tree = FsTree::build(&config.docs_dir).chain_with(|| error! {
        "failed to read the documentation directory",
        "docs_dir" => config.docs_dir.display(),
    })?;

    let extras: Vec<String> = config.extra_css.iter()
        .chain(&config.extra_javascript)
        .filter(|extra| !is_absolute_url(extra))
        .map(uri::uri_of)
        .collect();

    let forced: FxHashSet<&str> = extras.iter().map(|s| s.as_str()).collect();
    let candidates = tree.files().map(|entry| {
        let mut file = File::new(entry.relative_path(), &config.docs_dir, &config.site_dir, config.use_directory_urls);
        file.inclusion = if forced.contains(file.src_uri()) {
            Inclusion::Included
        } else {
            exclusions.inclusion_of(file.src_uri())
        };

        file
    });

    let mut files = Files::new();
    for file in drop_conflicts(config, candidates) {
        files.append(file)?;
    }

    for extra in &extras {
        if !files.contains(extra) {
            tracing::debug!(uri = %extra, "adding extra file missing from the documentation directory");
            let mut file = File::new(uri::path_of(extra), &config.docs_dir, &config.site_dir, config.use_directory_urls);
            file.inclusion = Inclusion::NotInNav;
            files.append(file)?;
        }
    }

    tracing::debug!(docs_dir = %config.docs_dir.display(), files = files.len(), "collected documentation files");
    Ok(files)
}

/// How strongly a file holds on to a contested destination.
fn precedence(file: &File) -> u8 {
    if !file.is_documentation_page() {
        0
    } else if split_ext(uri::file_name(file.src_uri())).0.eq_ignore_ascii_case("index") {
        2
    } else {
        1
    }
}

/// Keeps one of every set of included `files` that share a destination.
/// Excluded files never conflict.
fn drop_conflicts<I: IntoIterator<Item = File>>(config: &Config, files: I) -> Vec<File> {
    let mut kept: Vec<Option<File>> = vec![];
    let mut by_dest: FxHashMap<String, usize> = FxHashMap::default();
    for file in files {
        if file.inclusion.is_excluded() {
            kept.push(Some(file));
            continue;
        }

        let Some(&i) = by_dest.get(file.dest_uri()) else {
            by_dest.insert(file.dest_uri().to_owned(), kept.len());
            kept.push(Some(file));
            continue;
        };

        if let Some(holder) = kept[i].as_ref().filter(|holder| precedence(&file) <= precedence(holder)) {
            warn_conflict(config, &file, holder);
            continue;
        }

        if let Some(loser) = kept[i].take() {
            warn_conflict(config, &loser, &file);
        }

        by_dest.insert(file.dest_uri().to_owned(), kept.len());
        kept.push(Some(file));
    }

    kept.into_iter().flatten().collect()
}

fn warn_conflict(config: &Config, loser: &File, winner: &File) {
    let directory = config.docs_dir.join(uri::path_of(uri::parent(loser.src_uri())));
    tracing::warn!(
        directory = %directory.display(),
        "Excluding '{}' from the site because it conflicts with '{}'.",
        loser.src_uri(), winner.src_uri()
    );
}

fn is_absolute_url(value: &str) -> bool {
    value.starts_with('/') || Url::try_new(value).is_some_and(|url| url.is_absolute())
}
