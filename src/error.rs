//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` per categorizzare i fallimenti di una singola conversione
//! - Definisce `PromptError` per il livello interattivo (input non valido escluso:
//!   quello viene gestito localmente con un nuovo prompt)
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori (per file):
//! - `InputNotFound`: il file di input non esiste
//! - `Io`: errori di I/O (permessi, rename del file temporaneo, etc.)
//! - `Image`: decode/encode immagine fallito (file corrotto, formato non valido)
//! - `FFmpeg`: ffmpeg/ffprobe terminato con errore
//! - `Timeout`: la conversione ha superato il tempo massimo
//! - `MissingDependency`: tool esterno mancante
//!
//! Nessuno di questi errori interrompe un batch: vengono raccolti dal
//! `ConversionExecutor` e trasformati in un fallimento del singolo file.

use std::path::PathBuf;

/// Errors raised while converting a single file
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Could not read media properties: {0}")]
    Probe(String),

    #[error("Conversion timed out after {0} seconds")]
    Timeout(u64),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by the interactive prompt layer
#[derive(thiserror::Error, Debug)]
pub enum PromptError {
    /// The user closed the input stream (Ctrl-D / Ctrl-Z) while a prompt was open
    #[error("input interrupted")]
    Interrupted,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
