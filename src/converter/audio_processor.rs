//! # Audio Processing Module
//!
//! Export audio tramite ffmpeg.
//!
//! ## Formati di output:
//! - **PCM raw**: nessun header; profondità (u8/s8/s16le/s32le) e sample rate
//!   scelti per batch. Il resampling a `sample_rate` è distruttivo.
//! - **WAV**: PCM signed 16-bit
//! - **FLAC**: lossless
//! - **MP3 / OGG / M4A**: compressi, bitrate opzionale
//!
//! ## Parametri ffmpeg:
//! - `-vn`: scarta le copertine e altri stream video
//! - `-ac`: 1 (mono), 2 (stereo), omesso per mantenere i canali originali
//! - `-ar` + `-f`: solo per PCM raw, dove non c'è un container da cui dedurli

use super::process::run_ffmpeg;
use super::{commit, staging_file, ConversionJob};
use crate::args;
use crate::error::ConvertError;
use crate::formats::AudioOutput;
use crate::settings::Settings;
use crate::tool_resolver::FfmpegTools;
use crate::utils::CommandArg;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Converts audio files with ffmpeg
pub struct AudioProcessor {
    tools: FfmpegTools,
    timeout: Duration,
}

impl AudioProcessor {
    pub fn new(tools: FfmpegTools, timeout: Duration) -> Self {
        Self { tools, timeout }
    }

    /// ffmpeg arguments for one audio export
    pub fn build_args(
        input: &Path,
        output: &Path,
        target: AudioOutput,
        settings: &Settings,
    ) -> Result<Vec<OsString>, ConvertError> {
        let mut args = args!["-hide_banner", "-y", "-i", input, "-vn"];

        if let Some(count) = settings.channels.and_then(|c| c.count()) {
            args.extend(args!["-ac", count]);
        }

        match target {
            AudioOutput::Pcm => {
                let pcm = settings.pcm.ok_or_else(|| {
                    ConvertError::Validation("PCM export needs a bit depth and sample rate".to_string())
                })?;
                args.extend(args![
                    "-c:a",
                    pcm.bit_depth.ffmpeg_codec(),
                    "-ar",
                    pcm.sample_rate,
                    "-f",
                    pcm.bit_depth.ffmpeg_format(),
                ]);
            }
            other => {
                if let Some(codec) = other.ffmpeg_codec() {
                    args.extend(args!["-c:a", codec]);
                }
                if other.is_compressed() {
                    if let Some(ref bitrate) = settings.bitrate {
                        args.extend(args!["-b:a", bitrate]);
                    }
                }
            }
        }

        // Keep ffmpeg quiet unless we are debugging
        if !tracing::enabled!(tracing::Level::DEBUG) {
            args.extend(args!["-loglevel", "error"]);
        }

        args.push(output.to_arg());
        Ok(args)
    }

    pub async fn convert(&self, job: &ConversionJob<'_>, target: AudioOutput) -> Result<(), ConvertError> {
        debug!(
            "🎵 Exporting {} as {:?} ({})",
            job.input_path.display(),
            target,
            job.settings.describe()
        );

        let staged = staging_file(&job.output_path)?;
        let args = Self::build_args(&job.input_path, staged.path(), target, job.settings)?;
        run_ffmpeg(&self.tools.ffmpeg, &args, self.timeout).await?;
        commit(staged, &job.output_path)
    }
}
