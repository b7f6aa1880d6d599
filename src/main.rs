//! # Convert Everything - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione e override dai flag
//! - Ricerca di ffmpeg e avvio della sessione interattiva
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (tipo di media, directory, ffmpeg, config)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, `RUST_LOG` vince)
//! 3. Carica il file di configurazione e applica i flag
//! 4. Crea le directory di input/output se mancano
//! 5. Risolve ffmpeg/ffprobe per audio e video
//! 6. Avvia la sessione: prompt su stdin/stdout, poi il batch
//!
//! ## Esempio di utilizzo:
//! ```bash
//! convert-everything audio -i recordings -o pcm --ffmpeg C:/ffmpeg/bin
//! convert-everything image
//! convert-everything --check-tools
//! ```

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use convert_everything::{
    BatchRunner, Config, ConversionExecutor, ConverterSession, MediaKind, PromptError, Prompter, ToolPathResolver,
};

#[derive(Parser)]
#[command(name = "convert-everything")]
#[command(about = "Interactive batch converter for audio, image and video files")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print where ffmpeg and ffprobe were found and exit
    #[arg(long)]
    check_tools: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert audio files
    Audio(FfmpegArgs),
    /// Convert images
    Image(DirArgs),
    /// Convert videos to GIF
    Video(FfmpegArgs),
}

#[derive(ClapArgs)]
struct DirArgs {
    /// Directory containing the files to convert
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the converted files
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs)]
struct FfmpegArgs {
    #[command(flatten)]
    dirs: DirArgs,

    /// Directory containing ffmpeg and ffprobe
    #[arg(short, long)]
    ffmpeg: Option<PathBuf>,
}

impl Command {
    fn kind(&self) -> MediaKind {
        match self {
            Command::Audio(_) => MediaKind::Audio,
            Command::Image(_) => MediaKind::Image,
            Command::Video(_) => MediaKind::Video,
        }
    }

    fn apply(&self, config: &mut Config) {
        let (dirs, ffmpeg) = match self {
            Command::Audio(args) | Command::Video(args) => (&args.dirs, args.ffmpeg.as_ref()),
            Command::Image(dirs) => (dirs, None),
        };

        if let Some(ref input) = dirs.input {
            config.input_dir = input.clone();
        }
        if let Some(ref output) = dirs.output {
            config.output_dir = output.clone();
        }
        if let Some(ffmpeg) = ffmpeg {
            config.ffmpeg_dir = Some(ffmpeg.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };

    let command = match args.command {
        Some(command) => command,
        None if args.check_tools => {
            print!("{}", ToolPathResolver::new(config.ffmpeg_dir.clone()).get_tools_report());
            return Ok(());
        }
        None => {
            return Err(anyhow::anyhow!(
                "Choose what to convert: audio, image or video (see --help)"
            ));
        }
    };

    command.apply(&mut config);
    config.validate()?;

    let resolver = ToolPathResolver::new(config.ffmpeg_dir.clone());
    if args.check_tools {
        print!("{}", resolver.get_tools_report());
        return Ok(());
    }

    config.ensure_directories()?;

    let kind = command.kind();
    let tools = if kind.needs_ffmpeg() {
        resolver.ffmpeg_tools()
    } else {
        convert_everything::tool_resolver::FfmpegTools::unresolved()
    };
    debug!("Using ffmpeg at {}", tools.ffmpeg.display());

    let executor = ConversionExecutor::new(tools, Duration::from_secs(config.conversion_timeout_secs));
    let runner = BatchRunner::new(&executor, &config.output_dir, config.sort_inputs);
    let session = ConverterSession::new(kind, &config);

    info!(
        "Converting {} files: {} -> {}",
        kind,
        config.input_dir.display(),
        config.output_dir.display()
    );

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match session.run(&mut prompter, &config.input_dir, &runner).await {
        Ok(_) => Ok(()),
        Err(PromptError::Interrupted) => std::process::exit(130),
        Err(e) => Err(e.into()),
    }
}
