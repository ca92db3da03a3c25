use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one seat is requested
/// - The site base URL is set
/// - The seat map timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.crawl.num_seats == 0 {
        return Err(ConfigError::ValidationError(
            "crawl.num_seats must be at least 1".to_string(),
        ));
    }

    if config.site.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "site.base_url cannot be empty".to_string(),
        ));
    }

    if config.site.seat_map_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "site.seat_map_timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
