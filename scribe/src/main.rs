use std::path::PathBuf;
use std::time::Instant;

use folio::{Config, Theme};
use folio::error::Result;
use tracing_subscriber::EnvFilter;

pub const CONFIG_FILE: &str = "config.toml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Collects a documentation site's files and copies its static files
        /// into the site directory.
        cmd scribe {
            /// Configuration file to read. Defaults to `config.toml`, if present.
            optional -c, --config path: PathBuf
            /// Only copy files that changed since the last build.
            optional --dirty
            /// Log debug messages.
            optional -v, --verbose
            /// Overrides the configured documentation directory.
            optional --docs dir: PathBuf
            /// Overrides the configured site directory.
            optional --site dir: PathBuf
        }
    }
}

fn load_config(flags: &flags::Scribe) -> Result<Config> {
    let mut config = match &flags.config {
        Some(path) => Config::read(path)?,
        None if PathBuf::from(CONFIG_FILE).is_file() => Config::read(CONFIG_FILE)?,
        None => Config::default(),
    };

    if let Some(docs) = &flags.docs {
        config.docs_dir = docs.clone();
    }

    if let Some(site) = &flags.site {
        config.site_dir = site.clone();
    }

    tracing::debug!(
        docs_dir = %config.docs_dir.display(),
        site_dir = %config.site_dir.display(),
        use_directory_urls = config.use_directory_urls,
        "loaded configuration"
    );

    Ok(config)
}

fn build(flags: &flags::Scribe) -> Result<()> {
    let start = Instant::now();
    let config = load_config(flags)?;
    let mut files = folio::get_files(&config)?;
    files.add_files_from_theme(&Theme::from_config(&config), &config)?;

    let files = files.seal();
    println!("discovery time: {}ms", start.elapsed().as_millis());

    let copy = Instant::now();
    files.copy_static_files(flags.dirty)?;
    println!("copy time: {}ms", copy.elapsed().as_millis());
    println!("total time: {}ms", start.elapsed().as_millis());

    let excluded = files.iter().filter(|f| f.inclusion.is_excluded()).count();
    println!(
        "{} pages, {} static pages, {} media files, {} excluded",
        files.documentation_pages().count(),
        files.static_pages().count(),
        files.media_files().count(),
        excluded,
    );

    Ok(())
}

pub fn main() {
    let flags = flags::Scribe::from_env_or_exit();
    let level = if flags.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if let Err(e) = build(&flags) {
        println!("error: {e}");
        std::process::exit(1);
    }
}
