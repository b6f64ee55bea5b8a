use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{env, fmt, path::PathBuf};
use thiserror::Error;

use crate::services::cdn::CdnAddress;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mov", "avi", "mkv"];
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_VIDEOS_DIR: &str = "videos";
pub const DEFAULT_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_SNIPPETS_DIR: &str = "html_snippets";

const TOKEN_VAR: &str = "GITHUB_TOKEN";
const ACCOUNT_VAR: &str = "GITHUB_USERNAME";
const REPOSITORY_VAR: &str = "GITHUB_REPO";
const API_URL_VAR: &str = "GITHUB_API_URL";

/// Classic (`ghp_`) and fine-grained (`github_pat_`) personal access tokens.
const ACCEPTED_TOKEN_PREFIXES: [&str; 2] = ["ghp_", "github_pat_"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// The three settings without which nothing can talk to GitHub.
#[derive(Clone)]
pub struct GithubCredentials {
    pub token: String,
    pub account: String,
    pub repository: String,
}

impl fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("token", &"<redacted>")
            .field("account", &self.account)
            .field("repository", &self.repository)
            .finish()
    }
}

impl GithubCredentials {
    /// Validate raw values. Every missing field is reported in one error;
    /// blank strings count as missing.
    pub fn resolve(
        token: Option<String>,
        account: Option<String>,
        repository: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = non_blank(token);
        let account = non_blank(account);
        let repository = non_blank(repository);

        let mut missing = Vec::new();
        if token.is_none() {
            missing.push(TOKEN_VAR);
        }
        if account.is_none() {
            missing.push(ACCOUNT_VAR);
        }
        if repository.is_none() {
            missing.push(REPOSITORY_VAR);
        }

        let (Some(token), Some(account), Some(repository)) = (token, account, repository) else {
            return Err(ConfigError::Missing(missing));
        };

        ensure_path_segment(ACCOUNT_VAR, &account)?;
        ensure_path_segment(REPOSITORY_VAR, &repository)?;

        if !token_has_known_format(&token) {
            tracing::warn!(
                "{} does not look like a GitHub personal access token (expected `ghp_` or `github_pat_` prefix)",
                TOKEN_VAR
            );
        }

        Ok(Self {
            token,
            account,
            repository,
        })
    }

    /// Read credentials from the environment, letting CLI flags win.
    pub fn from_env(args: &GlobalArgs) -> Result<Self, ConfigError> {
        Self::resolve(
            env::var(TOKEN_VAR).ok(),
            args.account.clone().or_else(|| env::var(ACCOUNT_VAR).ok()),
            args.repository
                .clone()
                .or_else(|| env::var(REPOSITORY_VAR).ok()),
        )
    }
}

pub fn token_has_known_format(token: &str) -> bool {
    ACCEPTED_TOKEN_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(prefix))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_path_segment(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("`{}` must not contain `/` or whitespace", value),
        });
    }
    Ok(())
}

/// Centralized application configuration.
/// Loaded once per process and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: GithubCredentials,
    pub branch: String,
    pub videos_dir: String,
    pub cdn_base: String,
    pub api_base: String,
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    pub snippets_dir: PathBuf,
}

impl AppConfig {
    /// Configuration with every static default filled in.
    pub fn new(credentials: GithubCredentials) -> Self {
        Self {
            credentials,
            branch: DEFAULT_BRANCH.into(),
            videos_dir: DEFAULT_VIDEOS_DIR.into(),
            cdn_base: DEFAULT_CDN_BASE.into(),
            api_base: DEFAULT_API_BASE.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            snippets_dir: PathBuf::from(DEFAULT_SNIPPETS_DIR),
        }
    }

    pub fn from_env(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let mut cfg = Self::new(GithubCredentials::from_env(args)?);
        if let Some(api_base) = non_blank(env::var(API_URL_VAR).ok()) {
            cfg.api_base = api_base;
        }
        if let Some(dir) = &args.snippets_dir {
            cfg.snippets_dir = dir.clone();
        }
        Ok(cfg)
    }

    pub fn cdn(&self) -> CdnAddress {
        CdnAddress {
            base: self.cdn_base.clone(),
            account: self.credentials.account.clone(),
            repository: self.credentials.repository.clone(),
            branch: self.branch.clone(),
            videos_dir: self.videos_dir.clone(),
        }
    }

    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// Bind address for the web uploader.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Merge `serve` flags over `VIDEO_UPLOADER_HOST` / `VIDEO_UPLOADER_PORT`.
    pub fn from_env_and_args(host: Option<String>, port: Option<u16>) -> Result<Self> {
        let env_host = env::var("VIDEO_UPLOADER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("VIDEO_UPLOADER_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing VIDEO_UPLOADER_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 5000,
            Err(err) => return Err(err).context("reading VIDEO_UPLOADER_PORT"),
        };

        Ok(Self {
            host: host.unwrap_or(env_host),
            port: port.unwrap_or(env_port),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Upload videos to a GitHub repository and address them through jsDelivr"
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// GitHub account owning the repository (overrides GITHUB_USERNAME)
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Repository holding the videos (overrides GITHUB_REPO)
    #[arg(long = "repo", global = true)]
    pub repository: Option<String>,

    /// Directory where HTML embed snippets are written
    #[arg(long, global = true)]
    pub snippets_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a local video and print its CDN URL
    Upload {
        /// Path to the video file
        path: PathBuf,
    },
    /// List, delete or address uploaded videos
    Manage {
        #[command(subcommand)]
        action: Option<ManageAction>,
    },
    /// Start the drag-and-drop web uploader
    Serve {
        /// Host to bind to (overrides VIDEO_UPLOADER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides VIDEO_UPLOADER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ManageAction {
    /// List every uploaded video
    List,
    /// Delete a video by its destination name
    Delete { name: String },
    /// Print the CDN URL of a video
    Url { name: String },
}
