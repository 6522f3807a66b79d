use crate::titles::MAX_TITLES;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - youtube.max_videos is within 1..=MAX_TITLES
/// - llm.temperature is within 0.0..=2.0
/// - email.from_address looks like an address
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(ref youtube) = config.youtube {
        if youtube.max_videos == 0 || youtube.max_videos as usize > MAX_TITLES {
            return Err(ConfigError::ValidationError(format!(
                "youtube.max_videos must be between 1 and {}",
                MAX_TITLES
            )));
        }
    }

    if let Some(ref llm) = config.llm {
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
    }

    if let Some(ref email) = config.email {
        if !email.from_address.contains('@') {
            return Err(ConfigError::ValidationError(
                "email.from_address must be an email address".to_string(),
            ));
        }
    }

    Ok(())
}
