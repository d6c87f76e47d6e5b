use std::fs;
use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{File, Files};
use crate::error::{Chainable, Result};

impl File {
    /// Whether the destination is out of date with respect to the source.
    ///
    /// An override set by [`File::assume_modified()`] always wins. Generated
    /// files are always modified. Otherwise a file is modified if its
    /// destination is missing, differs in size from its source, or is older
    /// than its source.
    pub fn is_modified(&self) -> bool {
        if let Some(modified) = self.modified {
            return modified;
        }

        let Some(src) = self.abs_src_path().filter(|_| !self.is_generated()) else {
            return true;
        };

        let (src, dest) = match (fs::metadata(src), fs::metadata(self.abs_dest_path())) {
            (Ok(src), Ok(dest)) => (src, dest),
            _ => return true,
        };

        if src.len() != dest.len() {
            return true;
        }

        match (src.modified(), dest.modified()) {
            (Ok(src), Ok(dest)) => src > dest,
            _ => true,
        }
    }

    /// Writes the file to its destination, creating parent directories as
    /// needed.
    ///
    /// When `dirty` is set, an unmodified file is left alone. Copying a file
    /// onto itself does nothing. A missing source is an error.
    pub fn copy_file(&self, dirty: bool) -> Result<()> {
        if dirty && !self.is_modified() {
            tracing::debug!(src_uri = %self.src_uri, "skipping unmodified file");
            return Ok(());
        }

        let dest = self.abs_dest_path();
        if let Some(content) = &self.content {
            create_parent(&dest)?;
            return fs::write(&dest, content).chain_with(|| error! {
                "failed to write generated file",
                "source uri" => self.src_uri,
                "destination path" => dest.display(),
            });
        }

        let src = self.require_src_path()?;
        if is_same_file(&src, &dest) {
            tracing::debug!(path = %src.display(), "source and destination are the same file");
            return Ok(());
        }

        tracing::debug!(src_uri = %self.src_uri, dest_uri = %self.dest_uri, "copying file");
        create_parent(&dest)?;
        fs::copy(&src, &dest).chain_with(|| error! {
            "failed to copy file",
            "source path" => src.display(),
            "destination path" => dest.display(),
        })?;

        Ok(())
    }
}

impl Files {
    /// Copies every included static page and media file to its destination,
    /// in parallel.
    ///
    /// Fails before copying anything if two of them share a destination.
    pub fn copy_static_files(&self, dirty: bool) -> Result<()> {
        let files: Vec<&File> = self.iter()
            .filter(|f| f.inclusion.is_included())
            .filter(|f| f.is_static_page() || f.is_media_file())
            .collect();

        let mut destinations: FxHashMap<&str, &str> = FxHashMap::default();
        for file in &files {
            if let Some(other) = destinations.insert(file.dest_uri(), file.src_uri()) {
                return err! {
                    "multiple files share a destination",
                    "destination uri" => file.dest_uri(),
                    "first source uri" => other,
                    "second source uri" => file.src_uri(),
                };
            }
        }

        files.par_iter().try_for_each(|file| file.copy_file(dirty))?;
        tracing::debug!(files = files.len(), dirty, "copied static files");
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).chain_with(|| error! {
            "failed to create destination directory",
            "directory" => parent.display(),
        }),
        None => Ok(()),
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
