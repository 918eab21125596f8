use std::env;

/// Runtime configuration, read once at startup from the environment
/// (`.env` is loaded by the binaries before this runs).
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }
}
