//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con directory e valori di default dei prompt
//! - Fornisce validazione dei parametri
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Parametri di configurazione:
//! - `input_dir`: Directory scansionata (non ricorsiva, default: "input")
//! - `output_dir`: Directory dei file convertiti (default: "output")
//! - `ffmpeg_dir`: Directory che contiene ffmpeg/ffprobe (default: None = ricerca automatica)
//! - `default_sample_rate`: Sample rate proposto per PCM (default: 16000)
//! - `default_gif_fps`: FPS proposti per le GIF (default: 15)
//! - `max_gif_width`: Larghezza massima per il resize "720px" (default: 720)
//! - `sort_inputs`: Ordina i file per nome prima di numerarli (default: true)
//! - `conversion_timeout_secs`: Tempo massimo per un singolo processo ffmpeg (default: 900)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     input_dir: PathBuf::from("music"),
//!     default_sample_rate: 22050,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for input files
    pub input_dir: PathBuf,
    /// Directory receiving converted files
    pub output_dir: PathBuf,
    /// Directory holding the ffmpeg executables
    pub ffmpeg_dir: Option<PathBuf>,
    /// Sample rate offered for PCM export
    pub default_sample_rate: u32,
    /// Frame rate offered for GIF export
    pub default_gif_fps: f64,
    /// Width limit used by the "scale to max width" resize option
    pub max_gif_width: u32,
    /// Sort matched files by name before assigning output names
    pub sort_inputs: bool,
    /// Upper bound for one ffmpeg invocation
    pub conversion_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            ffmpeg_dir: None,
            default_sample_rate: 16000,
            default_gif_fps: 15.0,
            max_gif_width: 720,
            sort_inputs: true,
            conversion_timeout_secs: 900,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.default_sample_rate == 0 {
            return Err(anyhow::anyhow!("Default sample rate must be greater than 0"));
        }

        if !(self.default_gif_fps > 0.0) {
            return Err(anyhow::anyhow!("Default GIF frame rate must be positive"));
        }

        if self.max_gif_width == 0 {
            return Err(anyhow::anyhow!("Maximum GIF width must be greater than 0"));
        }

        if self.conversion_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Conversion timeout must be greater than 0"));
        }

        if self.input_dir == self.output_dir {
            return Err(anyhow::anyhow!(
                "Input and output directory must differ: {}",
                self.input_dir.display()
            ));
        }

        Ok(())
    }

    /// Create input and output directories if they are missing
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.input_dir, &self.output_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::info!("Created directory: {}", dir.display());
            }
            if !dir.is_dir() {
                return Err(anyhow::anyhow!("Path is not a directory: {}", dir.display()));
            }
        }
        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
