//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RekapConfig;
use super::secret::secret_string;
use crate::domain::errors::RekapError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RekapConfig
/// 4. Applies environment variable overrides (REKAP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use rekap::config::loader::load_config;
///
/// let config = load_config("rekap.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RekapConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RekapError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RekapError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text; same steps as [`load_config`]
pub fn load_config_str(contents: &str) -> Result<RekapConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RekapConfig = toml::from_str(&contents)
        .map_err(|e| RekapError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        RekapError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_pattern();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(RekapError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            RekapError::Configuration(format!("Invalid value '{val}' for {name}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using REKAP_* prefix
///
/// Environment variables follow the pattern: REKAP_<SECTION>_<KEY>
/// For example: REKAP_EXPORT_WORKER_COUNT, REKAP_POSTGRESQL_PRIMARY_CONNECTION_STRING
fn apply_env_overrides(config: &mut RekapConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("REKAP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("REKAP_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(size) = env_parse("REKAP_EXPORT_BATCH_SIZE")? {
        config.export.batch_size = size;
    }
    if let Some(count) = env_parse("REKAP_EXPORT_WORKER_COUNT")? {
        config.export.worker_count = count;
    }
    if let Some(secs) = env_parse("REKAP_EXPORT_SHUTDOWN_TIMEOUT_SECS")? {
        config.export.shutdown_timeout_secs = secs;
    }

    // PostgreSQL overrides
    if let Ok(val) = std::env::var("REKAP_POSTGRESQL_PRIMARY_CONNECTION_STRING") {
        config.postgresql.primary.connection_string = secret_string(val);
    }
    if let Some(max) = env_parse("REKAP_POSTGRESQL_PRIMARY_MAX_CONNECTIONS")? {
        config.postgresql.primary.max_connections = max;
    }
    if let Ok(val) = std::env::var("REKAP_POSTGRESQL_PRIMARY_SSL_MODE") {
        config.postgresql.primary.ssl_mode = val;
    }
    if let Some(ref mut secondary) = config.postgresql.secondary {
        if let Ok(val) = std::env::var("REKAP_POSTGRESQL_SECONDARY_CONNECTION_STRING") {
            secondary.connection_string = secret_string(val);
        }
        if let Some(max) = env_parse("REKAP_POSTGRESQL_SECONDARY_MAX_CONNECTIONS")? {
            secondary.max_connections = max;
        }
        if let Ok(val) = std::env::var("REKAP_POSTGRESQL_SECONDARY_SSL_MODE") {
            secondary.ssl_mode = val;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("REKAP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("REKAP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
