use tracing::{debug, info, warn};

use crate::backend::{BackendError, StatsBackend};
use crate::resolver::{PlayerResolution, resolve_row};
use crate::row_source::{RowSourceError, StatRow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_seen: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub unreadable: usize,
    pub players_created: usize,
}

pub fn run_import<B, I>(backend: &B, rows: I) -> ImportSummary
where
    B: StatsBackend + ?Sized,
    I: IntoIterator<Item = Result<(usize, StatRow), RowSourceError>>,
{
    let mut summary = ImportSummary::default();

    for item in rows {
        summary.rows_seen += 1;
        let (index, row) = match item {
            Ok(pair) => pair,
            Err(err) => {
                warn!("unreadable row: {err}");
                summary.unreadable += 1;
                continue;
            }
        };

        let resolved = match resolve_row(backend, &row) {
            Ok(resolved) => resolved,
            Err(reason) => {
                warn!(row = index, "skipping row: {reason}");
                summary.skipped += 1;
                continue;
            }
        };
        if resolved.player == PlayerResolution::Created {
            summary.players_created += 1;
        }

        match backend.insert_game_stat(&resolved.record) {
            Ok(()) => {
                debug!(
                    row = index,
                    player_id = %resolved.record.player_id,
                    game_id = %resolved.record.game_id,
                    "inserted game stat"
                );
                summary.submitted += 1;
            }
            Err(BackendError::Status { status, body }) => {
                warn!("Row {index}: failed to insert data. Status code: {status}, Error: {body}");
                summary.failed += 1;
            }
            Err(err) => {
                warn!("Row {index}: failed to insert data: {err}");
                summary.failed += 1;
            }
        }
    }

    info!(
        rows = summary.rows_seen,
        submitted = summary.submitted,
        "data insertion complete"
    );
    summary
}
