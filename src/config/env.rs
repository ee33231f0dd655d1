//! Environment variable overrides.
//!
//! The service runs inside containers where configuration arrives through
//! the environment rather than a mounted file. Overrides are applied on top
//! of defaults (or a loaded file), so a plain `PORT=8080` deployment needs
//! no config file at all.
//!
//! Recognized variables: `PORT`, `NODE_ENV`, `DB_HOST`, `DB_USER`,
//! `DB_PASSWORD`, `DB_NAME`, `DATA_DIR`, `LOG_DIR`, `LOG_LEVEL`.

use crate::config::schema::ServiceConfig;

/// Apply recognized environment variables onto a configuration.
///
/// Reads through a lookup closure so tests don't have to mutate the real
/// process environment.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                // Keep the configured host part, swap the port.
                let host = config
                    .server
                    .bind_address
                    .rsplit_once(':')
                    .map(|(host, _)| host.to_string())
                    .unwrap_or_else(|| "0.0.0.0".to_string());
                config.server.bind_address = format!("{host}:{port}");
            }
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring non-numeric PORT override");
            }
        }
    }

    if let Some(env) = lookup("NODE_ENV") {
        config.environment = env;
    }

    if let Some(host) = lookup("DB_HOST") {
        config.database.host = host;
    }
    if let Some(user) = lookup("DB_USER") {
        config.database.user = user;
    }
    if let Some(password) = lookup("DB_PASSWORD") {
        config.database.password = password;
    }
    if let Some(name) = lookup("DB_NAME") {
        config.database.name = name;
    }

    if let Some(dir) = lookup("DATA_DIR") {
        config.storage.data_dir = dir;
    }
    if let Some(dir) = lookup("LOG_DIR") {
        config.storage.log_dir = dir;
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }
}

/// Apply overrides from the real process environment.
pub fn from_process_env(config: &mut ServiceConfig) {
    apply_env_overrides(config, |key| std::env::var(key).ok());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn port_override_keeps_host() {
        let mut config = ServiceConfig::default();
        let env = HashMap::from([("PORT", "8080")]);
        apply_env_overrides(&mut config, lookup_from(&env));
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn database_and_environment_overrides() {
        let mut config = ServiceConfig::default();
        let env = HashMap::from([
            ("NODE_ENV", "production"),
            ("DB_HOST", "db.internal"),
            ("DB_USER", "svc"),
            ("DB_NAME", "portfolio_prod"),
            ("DATA_DIR", "/mnt/data"),
        ]);
        apply_env_overrides(&mut config, lookup_from(&env));

        assert_eq!(config.environment(), "production");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.user, "svc");
        assert_eq!(config.database.name, "portfolio_prod");
        assert_eq!(config.storage.data_dir, "/mnt/data");
    }

    #[test]
    fn bad_port_is_ignored() {
        let mut config = ServiceConfig::default();
        let env = HashMap::from([("PORT", "eighty")]);
        apply_env_overrides(&mut config, lookup_from(&env));
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
    }
}
