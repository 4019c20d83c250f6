use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{PushError, PushResult};

pub const DEFAULT_FEED_URL: &str = "https://bloombergnew.buzzing.cc/feed.xml";
pub const DEFAULT_STATE_PATH: &str = "last_link.txt";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Implicit-TLS submission port.
pub const DEFAULT_SMTP_PORT: u16 = 465;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum number of entries rendered into one digest
pub const MAX_ENTRIES: usize = 300;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const SUBJECT: &str = "「彭博速递」";
pub const SENDER_NAME: &str = "♥️彭博速递";

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout: FETCH_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Mail settings. Credentials stay optional here; the delivery step decides
/// whether they are usable so fetching and formatting still run without them.
#[derive(Clone)]
pub struct MailConfig {
    pub sender: Option<String>,
    pub password: Option<String>,
    pub recipients: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout: Duration,
    pub subject: String,
    pub sender_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: None,
            password: None,
            recipients: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            timeout: SMTP_TIMEOUT,
            subject: SUBJECT.to_string(),
            sender_name: SENDER_NAME.to_string(),
        }
    }
}

// Hand-written so the app password never ends up in logs.
impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("recipients", &self.recipients)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub mail: MailConfig,
    pub state_path: PathBuf,
    pub max_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            mail: MailConfig::default(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            max_entries: MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> PushResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> PushResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let smtp_port = match lookup("NEWSPUSH_SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                PushError::Config(format!("NEWSPUSH_SMTP_PORT is not a valid port: {}", raw))
            })?,
            None => defaults.mail.smtp_port,
        };

        let feed = FeedConfig {
            url: lookup("NEWSPUSH_FEED_URL").unwrap_or(defaults.feed.url),
            ..defaults.feed
        };

        let mail = MailConfig {
            sender: lookup("GMAIL_EMAIL"),
            password: lookup("GMAIL_APP_PASSWORD"),
            recipients: lookup("RECEIVER_EMAILS"),
            smtp_host: lookup("NEWSPUSH_SMTP_HOST").unwrap_or(defaults.mail.smtp_host),
            smtp_port,
            ..defaults.mail
        };

        let state_path = lookup("NEWSPUSH_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        Ok(Self {
            feed,
            mail,
            state_path,
            max_entries: defaults.max_entries,
        })
    }
}
