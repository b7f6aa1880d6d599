//! # Convert Everything Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore per conversioni e prompt
//! - `formats`: Tabelle dei formati di input/output per tipo di media
//! - `settings`: Parametri di encoding scelti per un batch
//! - `prompt`: Menu numerati e raccolta dei settings
//! - `converter`: Conversione di un singolo file (audio, immagini, video)
//! - `file_manager`: Discovery dei file e naming dell'output
//! - `batch`: Loop del batch con isolamento degli errori
//! - `session`: Sessione interattiva completa
//! - `tool_resolver`: Ricerca di ffmpeg/ffprobe
//! - `progress`: Progress bar e contatori
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use convert_everything::{BatchRunner, Config, ConversionExecutor, ConverterSession, MediaKind, Prompter};
//!
//! let config = Config::default();
//! let executor = ConversionExecutor::new(tools, timeout);
//! let runner = BatchRunner::new(&executor, &config.output_dir, config.sort_inputs);
//! let mut prompter = Prompter::new(stdin.lock(), stdout);
//! let result = ConverterSession::new(MediaKind::Image, &config)
//!     .run(&mut prompter, &config.input_dir, &runner)
//!     .await?;
//! ```

pub mod batch;
pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod formats;
pub mod progress;
pub mod prompt;
pub mod session;
pub mod settings;
pub mod tool_resolver;
pub mod utils;

pub use batch::BatchRunner;
pub use config::Config;
pub use converter::{ConversionExecutor, ConversionJob};
pub use error::{ConvertError, PromptError};
pub use file_manager::{FileManager, NamingPolicy};
pub use formats::{FormatRegistry, MediaKind, OutputFormat};
pub use progress::BatchResult;
pub use prompt::{Prompter, SettingsCollector};
pub use session::{ConverterSession, SessionPlan};
pub use settings::Settings;
pub use tool_resolver::ToolPathResolver;
