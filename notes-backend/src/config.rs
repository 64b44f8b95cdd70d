use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "sqlite:///notes.db";
}

/// Resolve a sqlite connection string down to a filesystem path.
/// Accepts `sqlite:///notes.db`, `sqlite://notes.db`, `sqlite:notes.db`,
/// or a bare path. `sqlite:////var/data/notes.db` keeps the leading slash.
fn database_path_from_url(url: &str) -> String {
    let url = url.trim();
    let path = match url.strip_prefix("sqlite:") {
        Some(rest) => rest
            .strip_prefix("///")
            .or_else(|| rest.strip_prefix("//"))
            .unwrap_or(rest),
        None => url,
    };

    if path.is_empty() {
        "notes.db".to_string()
    } else {
        path.to_string()
    }
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_path: database_path_from_url(
                &env::var(env_vars::DATABASE_URL)
                    .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            ),
        }
    }
}
