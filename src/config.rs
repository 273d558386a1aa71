use log::debug;

pub const URL_VAR: &str = "UPTIME_KUMA_URL";
pub const TOKEN_VAR: &str = "UPTIME_KUMA_TOKEN";
pub const USER_VAR: &str = "UPTIME_KUMA_USER";
pub const PASSWORD_VAR: &str = "UPTIME_KUMA_PASSWORD";

/// Username and password for the session login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Uptime Kuma instance, without trailing slashes.
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub credentials: Option<Credentials>,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `dotenvy` also picks up a `.env` file from the working directory (or
    /// any parent) on first lookup, so variables can live there instead of
    /// being exported.
    pub fn from_env() -> Config {
        let config = Config::from_lookup(|key| dotenvy::var(key).ok());
        debug!(
            "Loaded configuration: base_url={:?}, token set: {}, credentials set: {}",
            config.base_url,
            config.token.is_some(),
            config.credentials.is_some()
        );
        config
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Credentials are only kept when both
    /// the username and the password are present.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let base_url = non_empty(URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let credentials = match (non_empty(USER_VAR), non_empty(PASSWORD_VAR)) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Config {
            base_url,
            token: non_empty(TOKEN_VAR),
            credentials,
        }
    }
}
