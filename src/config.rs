use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fmt::Display, str::FromStr};

pub const DEFAULT_GRID_ROWS: usize = 10;
pub const DEFAULT_GRID_COLS: usize = 6;
pub const DEFAULT_INITIAL_ROWS: usize = 4;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 10;
pub const DEFAULT_LEVEL_SCORE_STEP: u32 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    /// Rows filled from the bottom when a game starts
    pub initial_rows: usize,
    /// Seconds between forced row insertions in time mode
    pub time_limit_secs: u32,
    /// Score needed per level
    pub level_score_step: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
            initial_rows: DEFAULT_INITIAL_ROWS,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            level_score_step: DEFAULT_LEVEL_SCORE_STEP,
        }
    }
}

impl GameConfig {
    /// Replace values that would make the board unplayable with defaults.
    ///
    /// The grid needs at least two rows (the top row is the overflow line)
    /// and the initial fill must leave that top row empty.
    pub fn sanitized(mut self) -> Self {
        if self.rows < 2 {
            tracing::warn!("GRID_ROWS={} too small, using {}", self.rows, DEFAULT_GRID_ROWS);
            self.rows = DEFAULT_GRID_ROWS;
        }
        if self.cols == 0 {
            tracing::warn!("GRID_COLS=0 is invalid, using {}", DEFAULT_GRID_COLS);
            self.cols = DEFAULT_GRID_COLS;
        }
        if self.initial_rows == 0 || self.initial_rows >= self.rows {
            let fallback = DEFAULT_INITIAL_ROWS.min(self.rows - 1);
            tracing::warn!(
                "INITIAL_ROWS={} must leave the top row empty and fill at least one row, using {}",
                self.initial_rows,
                fallback
            );
            self.initial_rows = fallback;
        }
        if self.time_limit_secs == 0 {
            self.time_limit_secs = DEFAULT_TIME_LIMIT_SECS;
        }
        if self.level_score_step == 0 {
            self.level_score_step = DEFAULT_LEVEL_SCORE_STEP;
        }
        self
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "../frontend".to_string()),
        };

        let game = GameConfig {
            rows: parse_setting("GRID_ROWS", env::var("GRID_ROWS").ok(), DEFAULT_GRID_ROWS)?,
            cols: parse_setting("GRID_COLS", env::var("GRID_COLS").ok(), DEFAULT_GRID_COLS)?,
            initial_rows: parse_setting(
                "INITIAL_ROWS",
                env::var("INITIAL_ROWS").ok(),
                DEFAULT_INITIAL_ROWS,
            )?,
            time_limit_secs: parse_setting(
                "TIME_LIMIT_SECS",
                env::var("TIME_LIMIT_SECS").ok(),
                DEFAULT_TIME_LIMIT_SECS,
            )?,
            level_score_step: parse_setting(
                "LEVEL_SCORE_STEP",
                env::var("LEVEL_SCORE_STEP").ok(),
                DEFAULT_LEVEL_SCORE_STEP,
            )?,
        }
        .sanitized();

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse a numeric game setting. Unset means `default`; a value that does
/// not parse is an error rather than a silent fallback.
fn parse_setting<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} must be a number, got {:?}", name, value)),
    }
}
