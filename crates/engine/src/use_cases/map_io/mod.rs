//! Loading and saving map files, in whichever format the path names.

use std::path::Path;

use mapkeep_domain::MapGrid;

use crate::error::{LoadError, SaveError};
use crate::infrastructure::settings::EngineSettings;
use crate::infrastructure::sqlite::SqliteStore;
use crate::infrastructure::{hierarchical, relational};
use crate::use_cases::load::{load_records, LoadedMap};

/// On-disk map format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// SQLite database, one table per record kind.
    Relational,
    /// JSON document with nested fixtures.
    Hierarchical,
}

impl MapFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(MapFormat::Hierarchical),
            "db" | "sqlite" | "sqlite3" => Some(MapFormat::Relational),
            _ => None,
        }
    }
}

/// Load the map at `path`.
///
/// Either the whole map loads, with any warnings it raised, or nothing does.
pub fn load_map(path: &Path, settings: &EngineSettings) -> Result<LoadedMap, LoadError> {
    let format =
        MapFormat::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    tracing::info!(path = %path.display(), ?format, "Loading map");
    let loaded = match format {
        MapFormat::Hierarchical => {
            let text = std::fs::read_to_string(path).map_err(io_error)?;
            hierarchical::read_document(&text, settings)?
        }
        MapFormat::Relational => {
            // Opening a missing file would create an empty database.
            if !path.exists() {
                return Err(io_error(std::io::ErrorKind::NotFound.into()));
            }
            let mut store = SqliteStore::open(path)?;
            let records = relational::read_records(&mut store)?;
            load_records(&records, settings)?
        }
    };
    for warning in &loaded.warnings {
        tracing::warn!(%warning, "Map data warning");
    }
    tracing::info!(
        dimensions = %loaded.map.dimensions(),
        warnings = loaded.warnings.len(),
        "Loaded map"
    );
    Ok(loaded)
}

/// Write `map` to `path`, replacing what was there.
pub fn save_map(map: &MapGrid, path: &Path) -> Result<(), SaveError> {
    let format =
        MapFormat::from_path(path).ok_or_else(|| SaveError::UnknownFormat(path.to_path_buf()))?;
    tracing::info!(path = %path.display(), ?format, "Saving map");
    match format {
        MapFormat::Hierarchical => {
            let text = hierarchical::write_document(map)?;
            std::fs::write(path, text).map_err(|source| SaveError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
        MapFormat::Relational => {
            let mut store = SqliteStore::open(path)?;
            relational::write_map(&mut store, map)?;
            Ok(())
        }
    }
}
