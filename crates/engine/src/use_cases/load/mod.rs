//! Loading maps from record streams.

mod session;

pub use session::{LoadSession, LoadedMap, ProgressFn};

use crate::error::LoadError;
use crate::infrastructure::settings::EngineSettings;
use crate::records::Record;

/// Run a whole record stream through a fresh session.
pub fn load_records<'r>(
    records: impl IntoIterator<Item = &'r Record>,
    settings: &EngineSettings,
) -> Result<LoadedMap, LoadError> {
    let mut session = LoadSession::new(settings.warning_policy, settings.progress_interval);
    for record in records {
        session.accept(record)?;
    }
    session.finish()
}
