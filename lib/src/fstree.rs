use std::sync::Arc;
use std::path::Path;
use std::cmp::Ordering;
use std::{fs, fmt};

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::order::{compare_names, natural_cmp};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(pub(crate) usize);

/// A snapshot of a directory tree.
///
/// Hidden files are kept and links are followed. The children of every
/// directory are ordered files first, in [manifest order](compare_names),
/// followed by subdirectories in [natural order](natural_cmp), so a
/// depth-first visit yields entries in the order of the final manifest.
#[derive(Debug)]
pub struct FsTree {
    entries: Vec<Entry>,
    map: FxHashMap<Arc<Path>, EntryId>,
}

#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub path: Arc<Path>,
    pub metadata: fs::Metadata,
    pub file_name: String,
    pub file_type: fs::FileType,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub depth: usize,
}

#[derive(Default, Debug)]
struct FsMetadata(Option<fs::Metadata>);

impl FsTree {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: vec![],
        }
    }

    pub fn build<P: AsRef<Path>>(root: P) -> Result<Self> {
        use jwalk::WalkDirGeneric;

        let root = root.as_ref();
        if !root.is_dir() {
            return err! {
                "file system tree root must be an existing directory",
                "search root" => root.display(),
            };
        }

        let walker = WalkDirGeneric::<FsMetadata>::new(root)
            .follow_links(true)
            .skip_hidden(false)
            .process_read_dir(|_, _, _, children| {
                children.iter_mut()
                    .filter_map(|e| e.as_mut().ok())
                    .for_each(|e| e.client_state = FsMetadata(e.metadata().ok()));

                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => sibling_order(a, b),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => Ordering::Equal,
                });
            });

        let mut tree: FsTree = FsTree::new();
        for entry in walker {
            match entry {
                Ok(entry) => { tree.insert(entry); },
                Err(e) => tracing::warn!(root = %root.display(), "skipping unreadable entry: {e}"),
            }
        }

        if tree.len() == 0 {
            return err! {
                "file system tree discovery yielded zero files",
                "search root" => root.display(),
            }
        }

        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn root_id(&self) -> EntryId {
        EntryId(0)
    }

    /// Iterates over every regular file, in manifest order.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        let mut files = Vec::with_capacity(self.len());
        self.depth_first_search(self.root_id(), |entry| {
            if entry.is_file() {
                files.push(entry);
            }

            true
        });

        files.into_iter()
    }

    /// Visits `root` and its descendants in order, descending into an entry
    /// only when `progress` returns `true` for it.
    pub fn depth_first_search<'a, F>(&'a self, root: EntryId, mut progress: F)
        where F: FnMut(&'a Entry) -> bool
    {
        fn _dfs<'a, F>(tree: &'a FsTree, root: EntryId, progress: &mut F)
            where F: FnMut(&'a Entry) -> bool
        {
            let entry = &tree[root];
            if progress(entry) {
                for &child in &entry.children {
                    _dfs(tree, child, progress)
                }
            }
        }

        _dfs(self, root, &mut progress)
    }

    fn insert(&mut self, mut entry: jwalk::DirEntry<FsMetadata>) -> Option<EntryId> {
        let path: Arc<Path> = Arc::from(entry.path().into_boxed_path());
        let Some(metadata) = entry.client_state.0.take() else {
            tracing::debug!(path = %path.display(), "skipping entry without metadata");
            return None;
        };

        let entry = Entry {
            id: EntryId(self.entries.len()),
            metadata,
            file_type: entry.file_type,
            file_name: entry.file_name.to_string_lossy().into_owned(),
            parent: self.map.get(&*entry.parent_path).cloned(),
            children: vec![],
            depth: entry.depth,
            path,
        };

        self.map.insert(entry.path.clone(), entry.id);
        if let Some(parent) = entry.parent {
            self.entries[parent.0].children.push(entry.id);
        }

        let id = entry.id;
        self.entries.push(entry);
        Some(id)
    }
}

fn sibling_order(a: &jwalk::DirEntry<FsMetadata>, b: &jwalk::DirEntry<FsMetadata>) -> Ordering {
    let (a_dir, b_dir) = (a.file_type.is_dir(), b.file_type.is_dir());
    let (a_name, b_name) = (a.file_name.to_string_lossy(), b.file_name.to_string_lossy());
    a_dir.cmp(&b_dir).then_with(|| if a_dir && b_dir {
        natural_cmp(&a_name, &b_name)
    } else {
        compare_names(&a_name, &b_name)
    })
}

impl Entry {
    pub fn is_file(&self) -> bool {
        self.metadata.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }

    /// Path relative to the root tree of `self`.
    pub fn relative_path(&self) -> &Path {
        let mut components = self.path.components();
        for _ in 0..(self.path.components().count() - self.depth) {
            components.next();
        }

        components.as_path()
    }
}

impl jwalk::ClientState for FsMetadata {
    type ReadDirState = ();
    type DirEntryState = Self;
}

impl std::ops::Index<EntryId> for FsTree {
    type Output = Entry;

    fn index(&self, index: EntryId) -> &Self::Output {
        &self.entries[index.0]
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
