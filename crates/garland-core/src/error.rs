//! Error types for Garland

use thiserror::Error;

/// The main error type for Garland operations
#[derive(Debug, Error)]
pub enum GarlandError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

/// Result type alias for Garland operations
pub type Result<T> = std::result::Result<T, GarlandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_errors_carry_context() {
        let e = GarlandError::Render("surface acquire: timeout".into());
        assert_eq!(e.to_string(), "Render error: surface acquire: timeout");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(GarlandError::from(io), GarlandError::Io(_)));
    }
}

