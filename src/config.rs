use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "LEDGERLY_DB";
pub(crate) const USER_ENV: &str = "LEDGERLY_USER";
pub(crate) const PASSWORD_ENV: &str = "LEDGERLY_PASSWORD";
pub(crate) const LOG_ENV: &str = "LEDGERLY_LOG";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let db_path = match std::env::var_os(DB_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };
        Ok(Self { db_path })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ledgerly", "Ledgerly")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("ledgerly.db"))
}

/// The acting user's email: `--user <email>` wins over the environment.
pub(crate) fn user_email(args: &[String]) -> Option<String> {
    flag_value(args, "--user").or_else(|| {
        std::env::var(USER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
    })
}

/// Password from the environment, or an interactive prompt.
pub(crate) fn password(prompt: &str) -> Result<String> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Ok(pw),
        _ => rpassword::prompt_password(prompt).context("Failed to read password"),
    }
}

pub(crate) fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Positional arguments with `--flag value` pairs and bare switches removed.
pub(crate) fn positional(args: &[String], value_flags: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if value_flags.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.clone());
        }
    }
    out
}
