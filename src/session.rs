//! # Converter Session Module
//!
//! Una sessione interattiva: domande → piano del batch → esecuzione.
//!
//! ## Responsabilità:
//! - Chiede formato di input e di output dai menu del `FormatRegistry`
//! - Raccoglie i `Settings` una sola volta, prima di toccare qualunque file
//! - Chiede la modalità di naming (solo audio) e la modalità tutti/singolo
//! - Passa il piano completo al `BatchRunner`
//!
//! ## Stati:
//! ```text
//! Idle → CollectingSettings → Processing(i) → Done
//! ```
//! Tutti i prompt stanno in `plan`. Un'interruzione durante un prompt
//! restituisce `PromptError::Interrupted` e il runner non viene mai invocato.

use crate::batch::BatchRunner;
use crate::config::Config;
use crate::error::PromptError;
use crate::file_manager::NamingPolicy;
use crate::formats::{FormatRegistry, InputFormat, MediaKind, OutputFormat};
use crate::progress::BatchResult;
use crate::prompt::{Prompter, SettingsCollector};
use crate::settings::Settings;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

/// Convert every match or just one named file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMode {
    All,
    /// File name without the input extension
    Single(String),
}

/// Everything a batch needs, fixed before the first file is touched
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub input: &'static InputFormat,
    pub output: OutputFormat,
    pub settings: Settings,
    pub naming: NamingPolicy,
    pub mode: ConversionMode,
}

/// Interactive session for one media kind
pub struct ConverterSession<'a> {
    registry: FormatRegistry,
    config: &'a Config,
}

impl<'a> ConverterSession<'a> {
    pub fn new(kind: MediaKind, config: &'a Config) -> Self {
        Self {
            registry: FormatRegistry::for_kind(kind),
            config,
        }
    }

    /// Ask every question of the session
    pub fn plan<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>) -> Result<SessionPlan, PromptError> {
        let inputs: Vec<(&'static InputFormat, &str)> =
            self.registry.input_formats().iter().map(|f| (f, f.label)).collect();
        let input = prompter.choose("Input format:", &inputs)?;

        let output = prompter.choose("Output format:", self.registry.output_formats())?;

        let settings = SettingsCollector::new(self.config).collect(prompter, output)?;

        let naming = if self.registry.kind() == MediaKind::Audio {
            prompter.choose(
                "Output names:",
                &[
                    (NamingPolicy::NumericCounter, "Numbered (0, 1, 2, ...)"),
                    (NamingPolicy::PreserveStem, "Same name as the input"),
                ],
            )?
        } else {
            NamingPolicy::PreserveStem
        };

        #[derive(Clone, Copy)]
        enum ModeChoice {
            All,
            Single,
        }

        let all_label = format!("All {} files in the input folder", input.label);
        let mode = match prompter.choose(
            "Convert:",
            &[(ModeChoice::All, all_label.as_str()), (ModeChoice::Single, "A single file")],
        )? {
            ModeChoice::All => ConversionMode::All,
            ModeChoice::Single => {
                let name = prompter.ask_required(&format!("File name without {}:", input.extension))?;
                ConversionMode::Single(name)
            }
        };

        Ok(SessionPlan {
            input,
            output,
            settings,
            naming,
            mode,
        })
    }

    /// Execute a finished plan
    pub async fn execute(&self, plan: &SessionPlan, source_dir: &Path, runner: &BatchRunner<'_>) -> BatchResult {
        info!(
            "Converting {} {} -> {} ({})",
            self.registry.kind(),
            plan.input.extension,
            plan.output,
            plan.settings.describe()
        );

        match plan.mode {
            ConversionMode::All => {
                runner
                    .run_batch(source_dir, plan.input.extension, plan.output, &plan.settings, plan.naming)
                    .await
            }
            ConversionMode::Single(ref name) => {
                runner
                    .run_single(source_dir, name, plan.input.extension, plan.output, &plan.settings, plan.naming)
                    .await
            }
        }
    }

    /// Prompt, then run the batch
    pub async fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        source_dir: &Path,
        runner: &BatchRunner<'_>,
    ) -> Result<BatchResult, PromptError> {
        let plan = self.plan(prompter)?;
        Ok(self.execute(&plan, source_dir, runner).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConversionExecutor;
    use crate::formats::AudioOutput;
    use crate::settings::{BitDepth, Channels};
    use crate::tool_resolver::FfmpegTools;
    use std::io::Cursor;
    use std::time::Duration;
    use tempfile::TempDir;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn write_png(path: &Path) {
        ::image::RgbImage::from_pixel(4, 4, ::image::Rgb([9, 9, 9]))
            .save_with_format(path, ::image::ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_audio_plan_asks_naming_mode() {
        let config = Config::default();
        let session = ConverterSession::new(MediaKind::Audio, &config);
        // m4a -> pcm, unsigned 8-bit, 16000 Hz, mono, numbered, all files
        let mut p = prompter("1\n1\n1\n\n1\n1\n1\n");
        let plan = session.plan(&mut p).unwrap();

        assert_eq!(plan.input.extension, ".m4a");
        assert_eq!(plan.output, OutputFormat::Audio(AudioOutput::Pcm));
        assert_eq!(plan.settings.pcm.map(|p| p.bit_depth), Some(BitDepth::Unsigned8));
        assert_eq!(plan.settings.pcm.map(|p| p.sample_rate), Some(16000));
        assert_eq!(plan.settings.channels, Some(Channels::Mono));
        assert_eq!(plan.naming, NamingPolicy::NumericCounter);
        assert_eq!(plan.mode, ConversionMode::All);
    }

    #[test]
    fn test_image_plan_single_file() {
        let config = Config::default();
        let session = ConverterSession::new(MediaKind::Image, &config);
        // webp -> png, single file "cover"
        let mut p = prompter("1\n1\n2\n\ncover\n");
        let plan = session.plan(&mut p).unwrap();

        assert_eq!(plan.input.extension, ".webp");
        assert_eq!(plan.naming, NamingPolicy::PreserveStem);
        assert_eq!(plan.mode, ConversionMode::Single("cover".to_string()));

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(!shown.contains("Output names:"));
        assert!(shown.contains("A value is required"));
    }

    #[tokio::test]
    async fn test_interrupt_never_reaches_the_runner() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a.png"));

        let config = Config::default();
        let executor = ConversionExecutor::new(FfmpegTools::unresolved(), Duration::from_secs(10));
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let session = ConverterSession::new(MediaKind::Image, &config);

        // Input stream ends at the all/single question
        let mut p = prompter("5\n2\n");
        let result = session.run(&mut p, input.path(), &runner).await;

        assert!(matches!(result, Err(PromptError::Interrupted)));
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_full_image_session() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("one.png"));
        write_png(&input.path().join("two.png"));
        std::fs::write(input.path().join("skip.jpg"), b"ignored").unwrap();

        let config = Config::default();
        let executor = ConversionExecutor::new(FfmpegTools::unresolved(), Duration::from_secs(10));
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let session = ConverterSession::new(MediaKind::Image, &config);

        // png -> jpg, all files
        let mut p = prompter("5\n2\n1\n");
        let result = session.run(&mut p, input.path(), &runner).await.unwrap();

        assert_eq!(result, BatchResult { total_count: 2, success_count: 2 });
        assert!(output.path().join("one.jpg").is_file());
        assert!(output.path().join("two.jpg").is_file());
    }
}
