use std::env;

pub const HOST_ENV: &str = "ROSTER_HOST";
pub const PORT_ENV: &str = "ROSTER_PORT";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const PUBLIC_URL_ENV: &str = "ROSTER_PUBLIC_URL";
pub const NOTIFY_URL_ENV: &str = "ROSTER_NOTIFY_URL";
pub const NOTIFY_TOKEN_ENV: &str = "ROSTER_NOTIFY_TOKEN";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8330;
const DEFAULT_DATABASE_URL: &str = "sqlite://roster.sqlite?mode=rwc";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL survey links in outbound invites are minted against.
    pub public_url: String,
    pub notify_url: Option<String>,
    pub notify_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = read_port();
        let public_url =
            env::var(PUBLIC_URL_ENV).unwrap_or_else(|_| format!("http://{host}:{port}"));

        Self {
            database_url: env::var(DATABASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            notify_url: env::var(NOTIFY_URL_ENV).ok().filter(|v| !v.is_empty()),
            notify_token: env::var(NOTIFY_TOKEN_ENV).ok().filter(|v| !v.is_empty()),
            host,
            port,
            public_url,
        }
    }
}

fn read_port() -> u16 {
    match env::var(PORT_ENV) {
        Ok(value) => match value.parse() {
            Ok(port) => port,
            Err(_) => {
                tracing::warn!("Invalid {PORT_ENV} value '{value}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        },
        Err(_) => DEFAULT_PORT,
    }
}
