//! # Video Processing Module
//!
//! Conversione video → GIF animata tramite ffmpeg.
//!
//! ## Pipeline:
//! 1. Se la politica di resize lo richiede, legge larghezza/altezza del primo
//!    stream video con ffprobe
//! 2. Calcola le dimensioni finali (`ResizePolicy::target_dimensions`)
//! 3. Scrive tutti i frame al frame rate configurato con un unico filtergraph
//!    (`fps` → `scale` → palette generata dal clip stesso)
//! 4. Rename atomico sul path finale
//!
//! ## Rilascio risorse:
//! ffprobe e ffmpeg girano con kill-on-drop e timeout, e il file temporaneo
//! viene cancellato quando esce dallo scope: ogni percorso di uscita
//! (successo, errore, early return, timeout) chiude il clip decodificato.

use super::process::run_ffmpeg;
use super::{commit, staging_file, ConversionJob};
use crate::args;
use crate::error::ConvertError;
use crate::formats::VideoOutput;
use crate::settings::GifSettings;
use crate::tool_resolver::FfmpegTools;
use crate::utils::CommandArg;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Converts video clips with ffprobe + ffmpeg
pub struct VideoProcessor {
    tools: FfmpegTools,
    timeout: Duration,
}

/// Video stream properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

impl VideoInfo {
    /// Parse `ffprobe -of json -show_entries stream=width,height` output
    pub fn from_probe_json(json: &[u8]) -> Result<Self, ConvertError> {
        let probe: ProbeOutput =
            serde_json::from_slice(json).map_err(|e| ConvertError::Probe(e.to_string()))?;

        probe
            .streams
            .iter()
            .find_map(|s| match (s.width, s.height) {
                (Some(width), Some(height)) if width > 0 && height > 0 => Some(VideoInfo { width, height }),
                _ => None,
            })
            .ok_or_else(|| ConvertError::Probe("no video stream found".to_string()))
    }
}

impl VideoProcessor {
    pub fn new(tools: FfmpegTools, timeout: Duration) -> Self {
        Self { tools, timeout }
    }

    /// Width and height of the first video stream
    pub async fn get_video_info(&self, video_path: &Path) -> Result<VideoInfo, ConvertError> {
        let args = args![
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
            video_path,
        ];
        let output = run_ffmpeg(&self.tools.ffprobe, &args, self.timeout).await?;
        VideoInfo::from_probe_json(&output.stdout)
    }

    /// ffmpeg arguments writing every frame at `gif.fps`, scaled to `size` when given
    pub fn build_gif_args(input: &Path, output: &Path, gif: &GifSettings, size: Option<(u32, u32)>) -> Vec<OsString> {
        let mut filters = vec![format!("fps={}", gif.fps)];
        if let Some((width, height)) = size {
            filters.push(format!("scale={}:{}:flags=lanczos", width, height));
        }
        filters.push("split[a][b];[a]palettegen[p];[b][p]paletteuse".to_string());

        let mut args = args!["-hide_banner", "-y", "-i", input, "-an"];
        args.extend(args!["-filter_complex", filters.join(","), "-loop", "0"]);

        if !tracing::enabled!(tracing::Level::DEBUG) {
            args.extend(args!["-loglevel", "error"]);
        }

        args.push(output.to_arg());
        args
    }

    pub async fn convert(&self, job: &ConversionJob<'_>, target: VideoOutput) -> Result<(), ConvertError> {
        let VideoOutput::Gif = target;
        let gif = job.settings.gif.ok_or_else(|| {
            ConvertError::Validation("GIF export needs a frame rate and resize policy".to_string())
        })?;

        let size = if gif.resize.is_noop() {
            None
        } else {
            let info = self.get_video_info(&job.input_path).await?;
            let size = gif.resize.target_dimensions(info.width, info.height);
            debug!(
                "🎬 {}: {}x{} -> {}x{}",
                job.input_path.display(),
                info.width,
                info.height,
                size.0,
                size.1
            );
            Some(size)
        };

        let staged = staging_file(&job.output_path)?;
        let args = Self::build_gif_args(&job.input_path, staged.path(), &gif, size);
        run_ffmpeg(&self.tools.ffmpeg, &args, self.timeout).await?;
        commit(staged, &job.output_path)
    }
}
