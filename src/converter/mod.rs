//! # Conversion Executor
//!
//! Esegue esattamente una operazione load → transform → export per file.
//!
//! ## Struttura:
//! - `image_processor`: decode/encode in-process con il crate `image`
//! - `audio_processor`: export tramite ffmpeg (PCM raw, WAV, MP3, FLAC, OGG, M4A)
//! - `video_processor`: video → GIF tramite ffprobe + ffmpeg
//! - `process`: esecuzione dei processi esterni con timeout e kill-on-drop
//!
//! ## Garanzie:
//! - `ConversionExecutor::convert` non propaga mai errori: ritorna `bool`
//!   e registra il motivo del fallimento con un solo `error!`
//! - L'output viene scritto in un file temporaneo nella directory di output
//!   e rinominato sul path finale solo in caso di successo
//! - Processi esterni e file temporanei vengono rilasciati su ogni percorso
//!   di uscita (successo, errore, timeout)

pub mod audio_processor;
pub mod image_processor;
pub mod process;
pub mod video_processor;

use crate::error::ConvertError;
use crate::file_manager::FileManager;
use crate::formats::OutputFormat;
use crate::settings::Settings;
use crate::tool_resolver::FfmpegTools;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// One file to convert. Built at dispatch time, dropped after the call.
#[derive(Debug, Clone)]
pub struct ConversionJob<'a> {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub settings: &'a Settings,
}

/// Dispatches jobs to the converter for their media kind
pub struct ConversionExecutor {
    audio: audio_processor::AudioProcessor,
    image: image_processor::ImageProcessor,
    video: video_processor::VideoProcessor,
}

impl ConversionExecutor {
    pub fn new(tools: FfmpegTools, timeout: Duration) -> Self {
        Self {
            audio: audio_processor::AudioProcessor::new(tools.clone(), timeout),
            image: image_processor::ImageProcessor::new(),
            video: video_processor::VideoProcessor::new(tools, timeout),
        }
    }

    /// Convert one file; failures are reported and turned into `false`
    pub async fn convert(
        &self,
        input_path: &Path,
        output_path: &Path,
        output_format: OutputFormat,
        settings: &Settings,
    ) -> bool {
        let job = ConversionJob {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            output_format,
            settings,
        };

        match self.try_convert(&job).await {
            Ok(()) => {
                let size = std::fs::metadata(&job.output_path).map(|m| m.len()).unwrap_or(0);
                debug!(
                    "Converted {} -> {} ({})",
                    job.input_path.display(),
                    job.output_path.display(),
                    FileManager::format_size(size)
                );
                true
            }
            Err(e) => {
                error!("❌ {}: {}", display_name(&job.input_path), e);
                false
            }
        }
    }

    /// Same as `convert` but surfaces the error
    pub async fn try_convert(&self, job: &ConversionJob<'_>) -> Result<(), ConvertError> {
        if !job.input_path.is_file() {
            return Err(ConvertError::InputNotFound(job.input_path.clone()));
        }

        match job.output_format {
            OutputFormat::Image(target) => self.image.convert(job, target).await,
            OutputFormat::Audio(target) => self.audio.convert(job, target).await,
            OutputFormat::Video(target) => self.video.convert(job, target).await,
        }
    }
}

/// File name for user-facing messages
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Temporary file next to `output_path`, carrying its extension so encoders
/// that infer the container from the name pick the right one
pub(crate) fn staging_file(output_path: &Path) -> Result<NamedTempFile, ConvertError> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let suffix = output_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix(".converting-")
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file)
}

/// Move a finished staging file onto its final path
pub(crate) fn commit(staged: NamedTempFile, output_path: &Path) -> Result<(), ConvertError> {
    staged
        .persist(output_path)
        .map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{AudioOutput, ImageOutput};
    use tempfile::TempDir;

    fn executor() -> ConversionExecutor {
        ConversionExecutor::new(FfmpegTools::unresolved(), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_missing_input_fails_without_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("0.pcm");
        let settings = Settings::default();

        let ok = executor()
            .convert(
                &temp_dir.path().join("missing.m4a"),
                &output,
                OutputFormat::Audio(AudioOutput::Pcm),
                &settings,
            )
            .await;

        assert!(!ok);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_try_convert_reports_input_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::default();
        let job = ConversionJob {
            input_path: temp_dir.path().join("ghost.webp"),
            output_path: temp_dir.path().join("ghost.png"),
            output_format: OutputFormat::Image(ImageOutput::Png),
            settings: &settings,
        };

        let err = executor().try_convert(&job).await.unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_is_reported_once() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("lost.png");
        let settings = Settings::default();
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();

        let ok = tracing::subscriber::with_default(subscriber, || {
            runtime.block_on(executor().convert(
                &temp_dir.path().join("lost.webp"),
                &output,
                OutputFormat::Image(ImageOutput::Png),
                &settings,
            ))
        });

        assert!(!ok);
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().filter(|line| line.contains("lost.webp")).count(), 1);
        assert!(text.contains("ERROR"));
        assert!(text.contains("Input file not found"));
    }

    #[test]
    fn test_staging_file_is_removed_when_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("clip.gif");

        let staged = staging_file(&output).unwrap();
        let staged_path = staged.path().to_path_buf();
        assert_eq!(staged_path.parent().unwrap(), temp_dir.path());
        assert!(staged_path.to_string_lossy().ends_with(".gif"));

        drop(staged);
        assert!(!staged_path.exists());
        assert!(!output.exists());
    }

    #[test]
    fn test_commit_moves_to_final_path() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("song.mp3");

        let staged = staging_file(&output).unwrap();
        std::fs::write(staged.path(), b"data").unwrap();
        commit(staged, &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"data");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
