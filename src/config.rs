use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::row_source::DEFAULT_SKIP_ROWS;

pub const DEFAULT_CSV_PATH: &str = "2024_Data.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const REST_PREFIX: &str = "rest/v1";

pub const PLAYER_TABLE: &str = "player";
pub const GAME_TABLE: &str = "game";
pub const GAME_STAT_TABLE: &str = "game_stat";

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub base_url: String,
    pub api_key: String,
    pub csv_path: PathBuf,
    pub skip_rows: usize,
    pub timeout: Duration,
    pub upsert_stats: bool,
}

impl ImportConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            skip_rows: DEFAULT_SKIP_ROWS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            upsert_stats: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env_required("SUPABASE_URL")?;
        let api_key = env_required("SUPABASE_KEY")?;
        let mut cfg = Self::new(&base_url, &api_key);

        if let Some(path) = env_non_empty("IMPORT_CSV_PATH") {
            cfg.csv_path = PathBuf::from(path);
        }
        if let Some(rows) = env_non_empty("IMPORT_SKIP_ROWS").and_then(|v| v.parse::<usize>().ok())
        {
            cfg.skip_rows = rows;
        }
        let timeout_secs = env_non_empty("IMPORT_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        cfg.timeout = Duration::from_secs(timeout_secs);
        cfg.upsert_stats = env_bool("IMPORT_UPSERT_STATS", false);

        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        if let Some(path) = flag_value(args, "--csv") {
            self.csv_path = PathBuf::from(path);
        }
        if let Some(raw) = flag_value(args, "--skip-rows") {
            self.skip_rows = raw
                .parse::<usize>()
                .map_err(|_| anyhow!("--skip-rows expects a whole number, got {raw:?}"))?;
        }
        if args.iter().any(|arg| arg == "--upsert") {
            self.upsert_stats = true;
        }
        Ok(())
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PREFIX}/{table}", self.base_url)
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim());
            }
        }
    }
    None
}

fn env_required(key: &str) -> Result<String> {
    env_non_empty(key).ok_or_else(|| anyhow!("{key} is not set"))
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn table_url_trims_trailing_slash() {
        let cfg = ImportConfig::new("https://abc.supabase.co/", "key");
        assert_eq!(
            cfg.table_url(GAME_STAT_TABLE),
            "https://abc.supabase.co/rest/v1/game_stat"
        );
    }

    #[test]
    fn args_override_defaults() {
        let mut cfg = ImportConfig::new("http://localhost:54321", "key");
        cfg.apply_args(&args(&["--csv", "week1.csv", "--skip-rows=0", "--upsert"]))
            .expect("valid args");
        assert_eq!(cfg.csv_path, PathBuf::from("week1.csv"));
        assert_eq!(cfg.skip_rows, 0);
        assert!(cfg.upsert_stats);
    }

    #[test]
    fn csv_flag_accepts_equals_form() {
        let mut cfg = ImportConfig::new("http://localhost:54321", "key");
        cfg.apply_args(&args(&["--csv=data/2023.csv"])).expect("valid args");
        assert_eq!(cfg.csv_path, PathBuf::from("data/2023.csv"));
        assert_eq!(cfg.skip_rows, DEFAULT_SKIP_ROWS);
        assert!(!cfg.upsert_stats);
    }

    #[test]
    fn bad_skip_rows_is_an_error() {
        let mut cfg = ImportConfig::new("http://localhost:54321", "key");
        assert!(cfg.apply_args(&args(&["--skip-rows", "two"])).is_err());
    }
}
