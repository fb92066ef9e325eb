use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::challenge::ChallengeParams;
use crate::hold_confirm::HoldParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuración inválida: {0}")]
    Invalid(String),
}

/// Parámetros de la sesión de cámara. Todos los campos tienen default, así
/// que `{}` es un JSON válido.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tiempo que hay que sostener una letra antes de escribirla
    pub hold_duration_ms: u64,
    /// Confianza mínima para que un resultado cuente para el hold
    pub min_confidence: f32,
    /// Cadencia del muestreo (~30 fps)
    pub frame_interval_ms: u64,
    /// Capacidad del canal lector → bucle de muestreo
    pub channel_capacity: usize,
    /// Palabras del reto de cámara; vacío = sin reto
    pub challenge_words: Vec<String>,
    /// Enfriamiento entre detecciones evaluadas por el reto
    pub challenge_cooldown_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hold_duration_ms: 2000,
            min_confidence: 0.7,
            frame_interval_ms: 33,
            channel_capacity: 8,
            challenge_words: Vec::new(),
            challenge_cooldown_ms: 2000,
        }
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_confidence debe estar en [0, 1] (encontrado {})",
                self.min_confidence
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid("frame_interval_ms debe ser > 0".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity debe ser > 0".into()));
        }
        Ok(())
    }

    pub fn hold_params(&self) -> HoldParams {
        HoldParams {
            hold_duration: Duration::from_millis(self.hold_duration_ms),
            min_confidence: self.min_confidence,
        }
    }

    /// Comparte la confianza mínima con el hold
    pub fn challenge_params(&self) -> ChallengeParams {
        ChallengeParams {
            min_confidence: self.min_confidence,
            cooldown: Duration::from_millis(self.challenge_cooldown_ms),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
