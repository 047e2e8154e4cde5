use tracing::{debug, info, warn};

use crate::backend::{BackendError, EntityId, GameStatRecord, NewPlayer, StatsBackend};
use crate::row_source::StatRow;
use crate::teams::{is_known_team, team_slug};
use crate::transform::{FieldError, RowIdentity, row_identity, stat_fields};

#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("player lookup for {name} failed: {detail}")]
    PlayerLookupFailed { name: String, detail: String },

    #[error("failed to add player {name}: http {status}: {body}")]
    PlayerCreateFailed {
        name: String,
        status: u16,
        body: String,
    },

    #[error("failed to add player {name}: {detail}")]
    PlayerCreateRequest { name: String, detail: String },

    #[error("could not read add-player response for {name} ({detail}): {body}")]
    MalformedResponse {
        name: String,
        detail: String,
        body: String,
    },

    #[error("game for season {season}, week {week}, team {team} not found")]
    GameNotFound { season: i64, week: i64, team: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerResolution {
    Existing,
    Created,
}

#[derive(Debug, Clone)]
pub struct ResolvedRow {
    pub record: GameStatRecord,
    pub player: PlayerResolution,
}

/// Find or create the player, find the game, and coerce the stat columns.
pub fn resolve_row<B: StatsBackend + ?Sized>(
    backend: &B,
    row: &StatRow,
) -> Result<ResolvedRow, SkipReason> {
    let identity = row_identity(row)?;
    let team = team_slug(&identity.team_code);
    if !is_known_team(&identity.team_code) {
        debug!(code = %identity.team_code, slug = %team, "unrecognized team code");
    }

    let (player_id, player) = resolve_player(backend, &identity, &team)?;
    let game_id = resolve_game(backend, &identity, &team)?;
    let stats = stat_fields(row)?;

    Ok(ResolvedRow {
        record: GameStatRecord {
            player_id,
            game_id,
            stats,
        },
        player,
    })
}

fn resolve_player<B: StatsBackend + ?Sized>(
    backend: &B,
    identity: &RowIdentity,
    team: &str,
) -> Result<(EntityId, PlayerResolution), SkipReason> {
    match backend.find_players(&identity.player) {
        Ok(players) => {
            if let Some(first) = players.into_iter().next() {
                return Ok((first.id, PlayerResolution::Existing));
            }
            debug!(player = %identity.player, "no matching player");
        }
        Err(BackendError::Status { status, .. }) => {
            debug!(player = %identity.player, status, "player lookup rejected");
        }
        // An unreadable lookup says nothing about whether the player exists.
        Err(err) => {
            return Err(SkipReason::PlayerLookupFailed {
                name: identity.player.clone(),
                detail: err.to_string(),
            });
        }
    }

    let new_player = NewPlayer {
        name: identity.player.clone(),
        team: team.to_string(),
        position: identity.position.clone(),
    };
    let name = new_player.name.clone();
    match backend.create_player(&new_player) {
        Ok(created) => {
            info!(player = %name, id = %created.id, team, "added player");
            Ok((created.id, PlayerResolution::Created))
        }
        Err(BackendError::Status { status, body }) => {
            Err(SkipReason::PlayerCreateFailed { name, status, body })
        }
        Err(BackendError::MalformedBody { detail, body }) => {
            Err(SkipReason::MalformedResponse { name, detail, body })
        }
        Err(BackendError::Transport { detail }) => {
            Err(SkipReason::PlayerCreateRequest { name, detail })
        }
    }
}

fn resolve_game<B: StatsBackend + ?Sized>(
    backend: &B,
    identity: &RowIdentity,
    team: &str,
) -> Result<EntityId, SkipReason> {
    let not_found = || SkipReason::GameNotFound {
        season: identity.season,
        week: identity.week,
        team: team.to_string(),
    };

    match backend.find_games(identity.season, identity.week, team) {
        Ok(games) => games
            .into_iter()
            .next()
            .map(|game| game.id)
            .ok_or_else(not_found),
        Err(err) => {
            warn!(
                season = identity.season,
                week = identity.week,
                team,
                error = %err,
                "game lookup failed"
            );
            Err(not_found())
        }
    }
}
