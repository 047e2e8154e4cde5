#![allow(dead_code)]

use std::cell::RefCell;

use stats_import::backend::{
    BackendError, EntityId, GameRecord, GameStatRecord, NewPlayer, PlayerRecord, StatsBackend,
};

#[derive(Debug, Clone)]
pub enum CreateBehavior {
    Succeed,
    Status(u16, &'static str),
    Malformed(&'static str),
    Transport(&'static str),
}

pub struct FakeGame {
    pub id: i64,
    pub season: i64,
    pub week: i64,
    pub home: &'static str,
    pub away: &'static str,
}

/// In-memory stand-in for the three backend tables.
pub struct FakeBackend {
    pub players: RefCell<Vec<(String, EntityId)>>,
    pub games: Vec<FakeGame>,
    pub create_behavior: CreateBehavior,
    pub player_lookup_error: Option<BackendError>,
    pub game_lookup_status: Option<u16>,
    pub insert_status: Option<u16>,
    pub next_player_id: RefCell<i64>,
    pub created: RefCell<Vec<NewPlayer>>,
    pub game_lookups: RefCell<Vec<(i64, i64, String)>>,
    pub inserted: RefCell<Vec<GameStatRecord>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            players: RefCell::new(Vec::new()),
            games: Vec::new(),
            create_behavior: CreateBehavior::Succeed,
            player_lookup_error: None,
            game_lookup_status: None,
            insert_status: None,
            next_player_id: RefCell::new(1000),
            created: RefCell::new(Vec::new()),
            game_lookups: RefCell::new(Vec::new()),
            inserted: RefCell::new(Vec::new()),
        }
    }

    pub fn with_player(self, name: &str, id: i64) -> Self {
        self.players
            .borrow_mut()
            .push((name.to_string(), EntityId::Int(id)));
        self
    }

    pub fn with_game(
        mut self,
        id: i64,
        season: i64,
        week: i64,
        home: &'static str,
        away: &'static str,
    ) -> Self {
        self.games.push(FakeGame {
            id,
            season,
            week,
            home,
            away,
        });
        self
    }
}

impl StatsBackend for FakeBackend {
    fn find_players(&self, name: &str) -> Result<Vec<PlayerRecord>, BackendError> {
        if let Some(err) = &self.player_lookup_error {
            return Err(err.clone());
        }
        let prefix = name.to_lowercase();
        Ok(self
            .players
            .borrow()
            .iter()
            .filter(|(n, _)| n.to_lowercase().starts_with(&prefix))
            .map(|(_, id)| PlayerRecord { id: id.clone() })
            .collect())
    }

    fn create_player(&self, player: &NewPlayer) -> Result<PlayerRecord, BackendError> {
        self.created.borrow_mut().push(player.clone());
        match &self.create_behavior {
            CreateBehavior::Succeed => {
                let mut next = self.next_player_id.borrow_mut();
                let id = EntityId::Int(*next);
                *next += 1;
                self.players
                    .borrow_mut()
                    .push((player.name.clone(), id.clone()));
                Ok(PlayerRecord { id })
            }
            CreateBehavior::Status(status, body) => Err(BackendError::Status {
                status: *status,
                body: body.to_string(),
            }),
            CreateBehavior::Malformed(body) => Err(BackendError::MalformedBody {
                detail: "empty result list".to_string(),
                body: body.to_string(),
            }),
            CreateBehavior::Transport(detail) => Err(BackendError::Transport {
                detail: detail.to_string(),
            }),
        }
    }

    fn find_games(
        &self,
        season: i64,
        week: i64,
        team_slug: &str,
    ) -> Result<Vec<GameRecord>, BackendError> {
        self.game_lookups
            .borrow_mut()
            .push((season, week, team_slug.to_string()));
        if let Some(status) = self.game_lookup_status {
            return Err(BackendError::Status {
                status,
                body: "game lookup failed".to_string(),
            });
        }
        Ok(self
            .games
            .iter()
            .filter(|g| g.season == season && g.week == week)
            .filter(|g| g.home == team_slug || g.away == team_slug)
            .map(|g| GameRecord {
                id: EntityId::Int(g.id),
            })
            .collect())
    }

    fn insert_game_stat(&self, record: &GameStatRecord) -> Result<(), BackendError> {
        if let Some(status) = self.insert_status {
            return Err(BackendError::Status {
                status,
                body: "insert rejected".to_string(),
            });
        }
        self.inserted.borrow_mut().push(record.clone());
        Ok(())
    }
}
