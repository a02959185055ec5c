use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{AppError, Result};
use crate::types::MatchId;

pub const MATCH_URL_BASE: &str = "https://www.futebolscore.com/jogos/computador-";
pub const DAILY_MATCHES_URL: &str = "https://www.futebolscore.com/ajax/jogos.aspx?tipo=1";

pub const DEFAULT_OUTPUT_PATH: &str = "data.csv";
pub const DEFAULT_WORKERS: usize = 4;

/// Hard limit for a page navigation (seconds).
pub const NAV_TIMEOUT_SECS: u64 = 30;

/// Wait after every navigation before the first read (milliseconds).
pub const PAGE_SETTLE_MS: u64 = 250;

/// Randomized wait before each fetch (seconds, uniform).
pub const PACING_MIN_SECS: f64 = 2.0;
pub const PACING_MAX_SECS: f64 = 7.0;

/// Client identities handed out at random, one per page session or listing request.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

pub fn random_user_agent() -> &'static str {
    use rand::seq::SliceRandom;
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

pub fn match_url(base: &str, id: MatchId) -> String {
    format!("{base}{id}")
}

#[derive(Debug, Parser)]
#[command(name = "scraper", about = "Scrape football match statistics into a CSV file")]
pub struct Cli {
    /// Lowest match id to be scraped
    #[arg(short = 's', long = "start")]
    pub start: Option<MatchId>,

    /// Highest match id to be scraped
    #[arg(short = 'e', long = "end")]
    pub end: Option<MatchId>,

    /// Output file path
    #[arg(short = 'f', long = "file", default_value = DEFAULT_OUTPUT_PATH)]
    pub file: PathBuf,

    /// How many workers to use
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_WORKERS)]
    pub threads: usize,

    /// Scrape only today's matches
    #[arg(short = 'd', long = "today")]
    pub today: bool,
}

/// Which set of match IDs a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Every ID in `[start, end]`, finished matches.
    Range { start: MatchId, end: MatchId },
    /// IDs listed for today's date; matches may still be live.
    Today,
}

impl RunMode {
    pub fn is_live(&self) -> bool {
        matches!(self, RunMode::Today)
    }
}

/// Environment-provided knobs. Anything unset falls back to the constants above.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    pub log_level: Option<String>,
    pub headless: Option<String>,
    pub nav_timeout_secs: Option<String>,
    pub pacing_min_secs: Option<String>,
    pub pacing_max_secs: Option<String>,
    pub match_url_base: Option<String>,
    pub daily_matches_url: Option<String>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("LOG_LEVEL").ok(),
            headless: std::env::var("HEADLESS").ok(),
            nav_timeout_secs: std::env::var("NAV_TIMEOUT_SECS").ok(),
            pacing_min_secs: std::env::var("PACING_MIN_SECS").ok(),
            pacing_max_secs: std::env::var("PACING_MAX_SECS").ok(),
            match_url_base: std::env::var("MATCH_URL_BASE").ok(),
            daily_matches_url: std::env::var("DAILY_MATCHES_URL").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    pub output_path: PathBuf,
    pub workers: usize,
    pub log_level: String,
    /// Run the browser without a window (HEADLESS)
    pub headless: bool,
    /// Navigation timeout (NAV_TIMEOUT_SECS)
    pub nav_timeout: Duration,
    /// Pacing range in seconds (PACING_MIN_SECS, PACING_MAX_SECS)
    pub pacing_min_secs: f64,
    pub pacing_max_secs: f64,
    pub match_url_base: String,
    pub daily_matches_url: String,
}

impl Config {
    pub fn from_cli(cli: Cli, env: EnvSettings) -> Result<Self> {
        let mode = match (cli.today, cli.start, cli.end) {
            (true, None, None) => RunMode::Today,
            (false, Some(0), Some(_)) => {
                return Err(AppError::Usage("start id must be a positive match id".to_string()))
            }
            (false, Some(start), Some(end)) if start < end => RunMode::Range { start, end },
            (false, Some(start), Some(end)) => {
                return Err(AppError::Usage(format!(
                    "start id ({start}) must be lower than end id ({end})"
                )))
            }
            (true, _, _) => {
                return Err(AppError::Usage(
                    "-d cannot be combined with -s/-e".to_string(),
                ))
            }
            _ => {
                return Err(AppError::Usage(
                    "give both -s and -e, or -d for today's matches".to_string(),
                ))
            }
        };

        if cli.threads == 0 {
            return Err(AppError::Usage("worker count must be at least 1".to_string()));
        }

        let headless = match env.headless.as_deref().map(str::trim) {
            None => true,
            Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
        };

        let nav_timeout_secs = env
            .nav_timeout_secs
            .as_deref()
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| AppError::Usage("NAV_TIMEOUT_SECS must be a whole number".to_string()))
            })
            .transpose()?
            .unwrap_or(NAV_TIMEOUT_SECS);

        let pacing_min_secs = parse_secs(env.pacing_min_secs.as_deref(), "PACING_MIN_SECS")?
            .unwrap_or(PACING_MIN_SECS);
        let pacing_max_secs = parse_secs(env.pacing_max_secs.as_deref(), "PACING_MAX_SECS")?
            .unwrap_or(PACING_MAX_SECS);
        if pacing_min_secs > pacing_max_secs {
            return Err(AppError::Usage(format!(
                "pacing range is empty ({pacing_min_secs}s > {pacing_max_secs}s)"
            )));
        }

        Ok(Self {
            mode,
            output_path: cli.file,
            workers: cli.threads,
            log_level: env.log_level.unwrap_or_else(|| "info".to_string()),
            headless,
            nav_timeout: Duration::from_secs(nav_timeout_secs),
            pacing_min_secs,
            pacing_max_secs,
            match_url_base: env.match_url_base.unwrap_or_else(|| MATCH_URL_BASE.to_string()),
            daily_matches_url: env
                .daily_matches_url
                .unwrap_or_else(|| DAILY_MATCHES_URL.to_string()),
        })
    }
}

fn parse_secs(value: Option<&str>, name: &str) -> Result<Option<f64>> {
    let Some(v) = value else { return Ok(None) };
    match v.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some(secs)),
        _ => Err(AppError::Usage(format!("{name} must be a non-negative number of seconds"))),
    }
}
