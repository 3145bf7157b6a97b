pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod filesystem;
pub mod index;
pub mod lifecycle;
pub mod models;
pub mod navigator;
pub mod path_util;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{NotepadError, Result};
pub use models::{DirectoryListing, Entry, EntryKind, RouteTarget};
pub use session::{Services, Session};

/// Installs `env_logger` with an `info` default, overridable via `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Opens a session on the platform data directory.
pub fn open_default(services: Services) -> Result<(Session, config::ConfigManager)> {
    open_in(filesystem::FileSystem::new()?, services)
}

/// Opens a session on `filesystem`, honouring a relocated notes root from
/// its `config.json`.
///
/// # Returns
/// * `Ok((Session, ConfigManager))` - The browser positioned at the root and
///   the loaded configuration
/// * `Err(NotepadError)` - If the directories cannot be created or the
///   config file cannot be read
pub fn open_in(
    filesystem: filesystem::FileSystem,
    services: Services,
) -> Result<(Session, config::ConfigManager)> {
    filesystem.ensure_directories()?;

    let config = config::ConfigManager::new(filesystem.config_file.clone())?;
    let filesystem = match config.notes_root() {
        Some(root) => filesystem.with_notes_root(root),
        None => filesystem,
    };

    let session = Session::open(
        filesystem,
        std::sync::Arc::new(storage::FsStorage::new()),
        services,
    )?;
    Ok((session, config))
}
