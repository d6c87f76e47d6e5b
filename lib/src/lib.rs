#![doc = svgbobdoc::transform!(
//! The file-manifest layer of a static documentation site builder.
//!
//! # Overview
//!
//! Folio maps a tree of documentation sources to the tree of artifacts that
//! make up a site. It decides which files take part in the site, where each
//! one lands, which URL refers to it, and whether it must be copied again. It
//! does not render pages: documentation pages are handed to a renderer, and
//! everything else is copied verbatim.
//!
//! A build flows in one direction:
//!
//! ```svgbob
//!  +----------+   get_files   +-------+  add_files_from_theme  +-------+
//!  | docs_dir |-------------->| Files |<-----------------------| Theme |
//!  +----------+               +---+---+                        +-------+
//!                                 |
//!                                 | seal
//!                                 v
//!                          +-------------+
//!                          | SealedFiles |
//!                          +------+------+
//!                                 |
//!              +------------------+------------------+
//!              |                                     |
//!              v                                     v
//!     +-----------------+                 +--------------------+
//!     | renderer (docs) |                 | copy_static_files  |
//!     +-----------------+                 +---------+----------+
//!                                                   |
//!                                                   v
//!                                              +----------+
//!                                              | site_dir |
//!                                              +----------+
//! ```
//!
//!   * [`get_files()`] walks the source root into a [`Files`] collection,
//!     ordered so that index pages lead their directory, files precede
//!     subdirectories, and names compare naturally (`2.md` before `10.md`).
//!     Gitignore-style patterns decide each file's [`Inclusion`].
//!
//!   * Each [`File`] knows its source URI, its destination, and its URL under
//!     one of two URL styles: flat (`foo.html`) or directory (`foo/`).
//!     [`File::url_relative_to()`] computes the link from one file to
//!     another.
//!
//!   * [`Files::add_files_from_theme()`] fills in defaults from a [`Theme`]
//!     without overriding documentation files.
//!
//!   * The collection is [sealed](Files::seal) before it is shared, then
//!     [`Files::copy_static_files()`] writes static pages and media files to
//!     the destination root.
//!
//! ```rust,no_run
//! use folio::{Config, Theme, get_files};
//!
//! # fn main() -> folio::error::Result<()> {
//! let config = Config::read("config.toml")?;
//! let mut files = get_files(&config)?;
//! files.add_files_from_theme(&Theme::from_config(&config), &config)?;
//!
//! let files = files.seal();
//! for page in files.documentation_pages() {
//!     println!("{} -> {}", page.src_uri(), page.url());
//! }
//!
//! files.copy_static_files(false)?;
//! # Ok(())
//! # }
//! ```
)]

#[macro_use]
pub mod error;
pub mod url;
pub mod uri;
pub mod order;
pub mod fstree;
pub mod pattern;
pub mod file;
pub mod files;
pub mod config;
pub mod theme;
pub mod manifest;
mod copy;

pub use file::{File, Inclusion};
pub use files::{Files, SealedFiles};
pub use config::{Config, ThemeSettings};
pub use theme::Theme;
pub use manifest::get_files;
