// src/config/env.rs
//! Process environment: credentials and run flags.
//!
//! Everything is read once into [`Env`]; nothing else in the crate touches
//! `std::env` for configuration.

use crate::error::ConfigError;
use super::consts::BSKY_PDS;

pub const VAR_HANDLE: &str = "BLUESKY_HANDLE";
pub const VAR_PASSWORD: &str = "BLUESKY_APP_PASSWORD";
pub const VAR_PDS: &str = "BLUESKY_PDS";
pub const VAR_FORCE: &str = "FORCE_POST";
pub const VAR_RENDER_URL: &str = "BROWSERLESS_URL";
pub const VAR_RENDER_TOKEN: &str = "BROWSERLESS_TOKEN";
pub const VAR_PROMO_URL: &str = "PROMO_URL";
pub const VAR_SEEN_FILE: &str = "SEEN_FILE";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub handle: String,
    pub app_password: String,
    pub pds: String,
}

// Keep the password out of logs and panic messages
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("handle", &self.handle)
            .field("app_password", &"<redacted>")
            .field("pds", &self.pds)
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Env {
    pub handle: Option<String>,
    pub app_password: Option<String>,
    pub pds: Option<String>,
    pub force: bool,
    pub render_url: Option<String>,
    pub render_token: Option<String>,
    pub promo_url: Option<String>,
    pub seen_file: Option<String>,
}

impl Env {
    /// Read the real process environment (after loading `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let force = match get(VAR_FORCE) {
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::InvalidValue {
                var: VAR_FORCE,
                value: v.clone(),
            })?,
            None => false,
        };

        Ok(Self {
            handle: get(VAR_HANDLE),
            app_password: get(VAR_PASSWORD),
            pds: get(VAR_PDS),
            force,
            render_url: get(VAR_RENDER_URL),
            render_token: get(VAR_RENDER_TOKEN),
            promo_url: get(VAR_PROMO_URL),
            seen_file: get(VAR_SEEN_FILE),
        })
    }

    /// Both credential variables are required to publish.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let handle = self.handle.clone().ok_or(ConfigError::MissingVar(VAR_HANDLE))?;
        let app_password = self.app_password.clone().ok_or(ConfigError::MissingVar(VAR_PASSWORD))?;
        let pds = self
            .pds
            .clone()
            .unwrap_or_else(|| s!(BSKY_PDS))
            .trim_end_matches('/')
            .to_string();
        Ok(Credentials { handle, app_password, pds })
    }
}

pub fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_password_is_reported_by_name() {
        let env = Env::from_lookup(lookup(&[(VAR_HANDLE, "bot.bsky.social")])).unwrap();
        match env.credentials() {
            Err(ConfigError::MissingVar(v)) => assert_eq!(v, VAR_PASSWORD),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn force_flag_accepts_common_spellings() {
        for v in ["1", "true", "YES", " on "] {
            let env = Env::from_lookup(lookup(&[(VAR_FORCE, v)])).unwrap();
            assert!(env.force, "{v}");
        }
        let env = Env::from_lookup(lookup(&[])).unwrap();
        assert!(!env.force);
        assert!(Env::from_lookup(lookup(&[(VAR_FORCE, "maybe")])).is_err());
    }

    #[test]
    fn blank_values_count_as_unset_and_pds_defaults() {
        let env = Env::from_lookup(lookup(&[
            (VAR_HANDLE, "bot.bsky.social"),
            (VAR_PASSWORD, "abcd-efgh"),
            (VAR_PDS, "  "),
        ]))
        .unwrap();
        let creds = env.credentials().unwrap();
        assert_eq!(creds.pds, BSKY_PDS);
        assert!(!format!("{creds:?}").contains("abcd-efgh"));
    }
}
