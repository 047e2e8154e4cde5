use std::fmt;

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{GAME_STAT_TABLE, GAME_TABLE, ImportConfig, PLAYER_TABLE};
use crate::http_client::{PREFER, RETURN_REPRESENTATION, http_client};
use crate::transform::StatFields;

const UPSERT_PREFER: &str = "return=representation,resolution=merge-duplicates";
const UPSERT_CONFLICT_COLUMNS: &str = "player_id,game_id";

// Serial integers or text keys such as UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{id}"),
            EntityId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    pub id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub team: String,
    pub position: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    pub id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatRecord {
    pub player_id: EntityId,
    pub game_id: EntityId,
    #[serde(flatten)]
    pub stats: StatFields,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {detail}")]
    Transport { detail: String },

    #[error("http {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response body ({detail}): {body}")]
    MalformedBody { detail: String, body: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport {
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Lookup,
    CreatePlayer,
    InsertStat { upsert: bool },
}

impl Call {
    pub fn accepts(self, status: StatusCode) -> bool {
        match self {
            Call::Lookup => status.is_success(),
            Call::CreatePlayer => status == StatusCode::CREATED,
            Call::InsertStat { upsert } => {
                status == StatusCode::CREATED || (upsert && status == StatusCode::OK)
            }
        }
    }
}

pub fn expect_status(call: Call, status: StatusCode, body: String) -> Result<String, BackendError> {
    if call.accepts(status) {
        return Ok(body);
    }
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

pub trait StatsBackend {
    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, BackendError>;

    fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord, BackendError>;

    fn find_games(
        &self,
        season: i64,
        week: i64,
        team_slug: &str,
    ) -> Result<Vec<GameRecord>, BackendError>;

    fn insert_game_stat(&self, record: &GameStatRecord) -> Result<(), BackendError>;
}

pub struct RestBackend {
    client: Client,
    player_url: String,
    game_url: String,
    game_stat_url: String,
    upsert_stats: bool,
}

impl RestBackend {
    pub fn new(cfg: &ImportConfig) -> Result<Self> {
        Ok(Self::with_client(http_client(cfg)?, cfg))
    }

    pub fn with_client(client: Client, cfg: &ImportConfig) -> Self {
        Self {
            client,
            player_url: cfg.table_url(PLAYER_TABLE),
            game_url: cfg.table_url(GAME_TABLE),
            game_stat_url: cfg.table_url(GAME_STAT_TABLE),
            upsert_stats: cfg.upsert_stats,
        }
    }

    pub fn player_lookup_request(&self, name: &str) -> reqwest::Result<Request> {
        self.client
            .get(&self.player_url)
            .query(&[("name", format!("ilike.{name}%"))])
            .build()
    }

    pub fn player_create_request(&self, player: &NewPlayer) -> reqwest::Result<Request> {
        self.client.post(&self.player_url).json(player).build()
    }

    pub fn game_lookup_request(
        &self,
        season: i64,
        week: i64,
        team_slug: &str,
    ) -> reqwest::Result<Request> {
        self.client
            .get(&self.game_url)
            .query(&[
                ("season", format!("eq.{season}")),
                ("week", format!("eq.{week}")),
                (
                    "or",
                    format!("(home_team.eq.{team_slug},away_team.eq.{team_slug})"),
                ),
            ])
            .build()
    }

    pub fn game_stat_request(&self, record: &GameStatRecord) -> reqwest::Result<Request> {
        let mut req = self.client.post(&self.game_stat_url).json(record);
        if self.upsert_stats {
            req = req
                .query(&[("on_conflict", UPSERT_CONFLICT_COLUMNS)])
                .header(PREFER, HeaderValue::from_static(UPSERT_PREFER));
        } else {
            req = req.header(PREFER, HeaderValue::from_static(RETURN_REPRESENTATION));
        }
        req.build()
    }

    fn send(&self, req: Request) -> Result<(StatusCode, String), BackendError> {
        let resp: Response = self.client.execute(req)?;
        let status = resp.status();
        let body = resp.text()?;
        Ok((status, body))
    }
}

impl StatsBackend for RestBackend {
    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, BackendError> {
        let (status, body) = self.send(self.player_lookup_request(name)?)?;
        parse_list(&expect_status(Call::Lookup, status, body)?)
    }

    fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord, BackendError> {
        let (status, body) = self.send(self.player_create_request(player)?)?;
        first_record(&expect_status(Call::CreatePlayer, status, body)?)
    }

    fn find_games(
        &self,
        season: i64,
        week: i64,
        team_slug: &str,
    ) -> Result<Vec<GameRecord>, BackendError> {
        let (status, body) = self.send(self.game_lookup_request(season, week, team_slug)?)?;
        parse_list(&expect_status(Call::Lookup, status, body)?)
    }

    fn insert_game_stat(&self, record: &GameStatRecord) -> Result<(), BackendError> {
        let (status, body) = self.send(self.game_stat_request(record)?)?;
        let call = Call::InsertStat {
            upsert: self.upsert_stats,
        };
        expect_status(call, status, body).map(|_| ())
    }
}

pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, BackendError> {
    serde_json::from_str::<Vec<T>>(body.trim()).map_err(|err| BackendError::MalformedBody {
        detail: err.to_string(),
        body: body.to_string(),
    })
}

// `return=representation` answers an insert with a one-element list.
pub fn first_record<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    parse_list::<T>(body)?
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::MalformedBody {
            detail: "empty result list".to_string(),
            body: body.to_string(),
        })
}
