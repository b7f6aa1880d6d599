//! # Batch Runner Module
//!
//! Orchestratore di un batch: discovery → conversione per file → riepilogo.
//!
//! ## Flusso:
//! 1. Trova i file della directory sorgente che finiscono con l'estensione scelta
//! 2. Zero match: riepilogo 0/0, nessun errore
//! 3. Per ogni file (in ordine di enumerazione) calcola il path di output con
//!    la `NamingPolicy` e chiama il `ConversionExecutor`
//! 4. Un fallimento incrementa solo il totale, il batch prosegue
//! 5. Stampa `successi / totale`
//!
//! ## Concorrenza:
//! Nessuna. Un file viene convertito completamente prima del successivo;
//! i `Settings` sono fissati prima dell'avvio e condivisi in sola lettura.

use crate::converter::{display_name, ConversionExecutor};
use crate::file_manager::{FileManager, NamingPolicy};
use crate::formats::OutputFormat;
use crate::progress::{BatchResult, ProgressManager};
use crate::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Runs batches of conversions into one output directory
pub struct BatchRunner<'a> {
    executor: &'a ConversionExecutor,
    output_dir: PathBuf,
    sort_inputs: bool,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(executor: &'a ConversionExecutor, output_dir: impl Into<PathBuf>, sort_inputs: bool) -> Self {
        Self {
            executor,
            output_dir: output_dir.into(),
            sort_inputs,
            show_progress: true,
        }
    }

    /// Disable the progress bar
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Convert every file in `source_dir` whose name ends with `input_ext`
    pub async fn run_batch(
        &self,
        source_dir: &Path,
        input_ext: &str,
        output_format: OutputFormat,
        settings: &Settings,
        naming: NamingPolicy,
    ) -> BatchResult {
        let files = match FileManager::find_matching_files(source_dir, input_ext, self.sort_inputs) {
            Ok(files) => files,
            Err(e) => {
                warn!("Could not list {}: {}", source_dir.display(), e);
                Vec::new()
            }
        };

        info!(
            "Found {} '{}' files in {} -> {} ({})",
            files.len(),
            input_ext,
            source_dir.display(),
            output_format,
            settings.describe()
        );

        self.process(&files, input_ext, output_format, settings, naming).await
    }

    /// Convert one named file from `source_dir`, reported as a batch of one
    pub async fn run_single(
        &self,
        source_dir: &Path,
        file_stem: &str,
        input_ext: &str,
        output_format: OutputFormat,
        settings: &Settings,
        naming: NamingPolicy,
    ) -> BatchResult {
        let input = source_dir.join(format!("{}{}", file_stem, input_ext));
        self.process(&[input], input_ext, output_format, settings, naming).await
    }

    async fn process(
        &self,
        files: &[PathBuf],
        input_ext: &str,
        output_format: OutputFormat,
        settings: &Settings,
        naming: NamingPolicy,
    ) -> BatchResult {
        let mut result = BatchResult::new();

        if files.is_empty() {
            println!("No files ending with '{}' found", input_ext);
            println!("{}", result.format_summary());
            return result;
        }

        let progress = if self.show_progress {
            ProgressManager::new(files.len() as u64)
        } else {
            ProgressManager::hidden()
        };

        for (index, input) in files.iter().enumerate() {
            let output = FileManager::output_path(
                &self.output_dir,
                input,
                input_ext,
                index,
                naming,
                output_format.extension(),
            );

            let name = display_name(input);
            if self.executor.convert(input, &output, output_format, settings).await {
                result.add_success();
                progress.update(&format!("✅ {}", name));
            } else {
                result.add_failure();
                progress.update(&format!("❌ {}", name));
            }
        }

        progress.finish(&result.format_summary());
        println!("{}", result.format_summary());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ImageOutput;
    use crate::tool_resolver::FfmpegTools;
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn executor() -> ConversionExecutor {
        ConversionExecutor::new(FfmpegTools::unresolved(), Duration::from_secs(30))
    }

    fn write_png(path: &Path) {
        write_png_sized(path, 3);
    }

    fn write_png_sized(path: &Path, width: u32) {
        ::image::RgbaImage::from_pixel(width, 3, ::image::Rgba([1, 2, 3, 255]))
            .save_with_format(path, ::image::ImageFormat::Png)
            .unwrap();
    }

    fn output_names(dir: &Path) -> BTreeSet<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_corrupt_files_do_not_stop_the_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("a.png"));
        std::fs::write(input.path().join("b.png"), b"not an image").unwrap();
        write_png(&input.path().join("c.png"));
        std::fs::write(input.path().join("d.png"), b"").unwrap();
        write_png(&input.path().join("e.png"));

        let executor = executor();
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let result = runner
            .run_batch(
                input.path(),
                ".png",
                OutputFormat::Image(ImageOutput::Jpeg),
                &Settings::default(),
                NamingPolicy::PreserveStem,
            )
            .await;

        assert_eq!(result, BatchResult { total_count: 5, success_count: 3 });
        let expected: BTreeSet<String> = ["a.jpg", "c.jpg", "e.jpg"].iter().map(|s| s.to_string()).collect();
        assert_eq!(output_names(output.path()), expected);
    }

    #[tokio::test]
    async fn test_numeric_naming_uses_each_index_once() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        // Widths tell the outputs apart: alpha=1, beta=2, mid=3, zeta=4
        for (name, width) in [("zeta.png", 4), ("alpha.png", 1), ("mid.png", 3), ("beta.png", 2)] {
            write_png_sized(&input.path().join(name), width);
        }

        let executor = executor();
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let result = runner
            .run_batch(
                input.path(),
                ".png",
                OutputFormat::Image(ImageOutput::Bmp),
                &Settings::default(),
                NamingPolicy::NumericCounter,
            )
            .await;

        assert_eq!(result.success_count, 4);
        let expected: BTreeSet<String> = (0..4).map(|i| format!("{}.bmp", i)).collect();
        assert_eq!(output_names(output.path()), expected);

        for (index, width) in [(0, 1), (1, 2), (2, 3), (3, 4)] {
            let converted = ::image::open(output.path().join(format!("{}.bmp", index))).unwrap();
            assert_eq!(converted.width(), width, "{}.bmp", index);
        }
    }

    #[tokio::test]
    async fn test_preserve_stem_matches_inputs() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("holiday.photo.png"));
        write_png(&input.path().join("cat.png"));

        let executor = executor();
        let runner = BatchRunner::new(&executor, output.path(), false).quiet();
        runner
            .run_batch(
                input.path(),
                ".png",
                OutputFormat::Image(ImageOutput::Gif),
                &Settings::default(),
                NamingPolicy::PreserveStem,
            )
            .await;

        let expected: BTreeSet<String> =
            ["holiday.photo.gif", "cat.gif"].iter().map(|s| s.to_string()).collect();
        assert_eq!(output_names(output.path()), expected);
    }

    #[tokio::test]
    async fn test_zero_matches_is_not_an_error() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("only.png"));

        let executor = executor();
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let result = runner
            .run_batch(
                input.path(),
                ".webp",
                OutputFormat::Image(ImageOutput::Png),
                &Settings::default(),
                NamingPolicy::PreserveStem,
            )
            .await;

        assert_eq!(result, BatchResult { total_count: 0, success_count: 0 });
        assert!(output_names(output.path()).is_empty());
    }

    #[tokio::test]
    async fn test_single_file_mode() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_png(&input.path().join("icon.png"));

        let executor = executor();
        let runner = BatchRunner::new(&executor, output.path(), true).quiet();
        let format = OutputFormat::Image(ImageOutput::Ico);

        let found = runner
            .run_single(input.path(), "icon", ".png", format, &Settings::default(), NamingPolicy::PreserveStem)
            .await;
        assert_eq!(found, BatchResult { total_count: 1, success_count: 1 });
        assert!(output.path().join("icon.ico").is_file());

        let missing = runner
            .run_single(input.path(), "nope", ".png", format, &Settings::default(), NamingPolicy::PreserveStem)
            .await;
        assert_eq!(missing, BatchResult { total_count: 1, success_count: 0 });
    }
}
