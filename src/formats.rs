//! # Format Registry Module
//!
//! Tabelle statiche dei formati supportati per ogni tipo di media.
//!
//! ## Responsabilità:
//! - Elenca le estensioni di input riconosciute con un'etichetta leggibile
//! - Elenca gli identificatori dei formati di output con un'etichetta leggibile
//! - L'ordine delle tabelle è l'ordine dei menu numerati
//!
//! ## Formati:
//! - **Audio**: M4A, MP3, WAV, FLAC, OGG, AAC, WMA → PCM raw, WAV, MP3, FLAC, OGG, M4A
//! - **Immagini**: WebP, JPG, JFIF, JPEG, PNG, BMP, GIF, TIFF → PNG, JPG, BMP, GIF, TIFF, ICO
//! - **Video**: MP4, MOV, AVI, MKV, WebM → GIF

use crate::error::ConvertError;
use std::fmt;
use std::str::FromStr;

/// Kind of media handled by one converter session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Image,
    Video,
}

impl MediaKind {
    pub fn name(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Whether converters of this kind shell out to ffmpeg
    pub fn needs_ffmpeg(&self) -> bool {
        !matches!(self, MediaKind::Image)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(MediaKind::Audio),
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(ConvertError::UnsupportedFormat(format!(
                "unknown media kind '{}'",
                other
            ))),
        }
    }
}

/// Audio output containers/codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioOutput {
    /// Headerless samples, bit depth chosen per batch
    Pcm,
    Wav,
    Mp3,
    Flac,
    Ogg,
    M4a,
}

impl AudioOutput {
    pub fn ffmpeg_codec(&self) -> Option<&'static str> {
        match self {
            // Raw PCM codec depends on the chosen bit depth
            AudioOutput::Pcm => None,
            AudioOutput::Wav => Some("pcm_s16le"),
            AudioOutput::Mp3 => Some("libmp3lame"),
            AudioOutput::Flac => Some("flac"),
            AudioOutput::Ogg => Some("libvorbis"),
            AudioOutput::M4a => Some("aac"),
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, AudioOutput::Mp3 | AudioOutput::Ogg | AudioOutput::M4a)
    }
}

/// Still image encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOutput {
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tiff,
    Ico,
}

impl ImageOutput {
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ImageOutput::Png => image::ImageFormat::Png,
            ImageOutput::Jpeg => image::ImageFormat::Jpeg,
            ImageOutput::Bmp => image::ImageFormat::Bmp,
            ImageOutput::Gif => image::ImageFormat::Gif,
            ImageOutput::Tiff => image::ImageFormat::Tiff,
            ImageOutput::Ico => image::ImageFormat::Ico,
        }
    }
}

/// Video targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoOutput {
    Gif,
}

/// One selectable output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Audio(AudioOutput),
    Image(ImageOutput),
    Video(VideoOutput),
}

impl OutputFormat {
    pub fn kind(&self) -> MediaKind {
        match self {
            OutputFormat::Audio(_) => MediaKind::Audio,
            OutputFormat::Image(_) => MediaKind::Image,
            OutputFormat::Video(_) => MediaKind::Video,
        }
    }

    /// Identifier shown in logs and used as the registry key
    pub fn id(&self) -> &'static str {
        match self {
            OutputFormat::Audio(AudioOutput::Pcm) => "pcm",
            OutputFormat::Audio(AudioOutput::Wav) => "wav",
            OutputFormat::Audio(AudioOutput::Mp3) => "mp3",
            OutputFormat::Audio(AudioOutput::Flac) => "flac",
            OutputFormat::Audio(AudioOutput::Ogg) => "ogg",
            OutputFormat::Audio(AudioOutput::M4a) => "m4a",
            OutputFormat::Image(ImageOutput::Png) => "png",
            OutputFormat::Image(ImageOutput::Jpeg) => "jpg",
            OutputFormat::Image(ImageOutput::Bmp) => "bmp",
            OutputFormat::Image(ImageOutput::Gif) => "gif",
            OutputFormat::Image(ImageOutput::Tiff) => "tiff",
            OutputFormat::Image(ImageOutput::Ico) => "ico",
            OutputFormat::Video(VideoOutput::Gif) => "gif",
        }
    }

    /// File extension (without dot) for files written in this format
    pub fn extension(&self) -> &'static str {
        self.id()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Recognised input extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFormat {
    /// Extension including the leading dot, matched case-sensitively
    pub extension: &'static str,
    pub label: &'static str,
}

const AUDIO_INPUTS: &[InputFormat] = &[
    InputFormat { extension: ".m4a", label: "M4A" },
    InputFormat { extension: ".mp3", label: "MP3" },
    InputFormat { extension: ".wav", label: "WAV" },
    InputFormat { extension: ".flac", label: "FLAC" },
    InputFormat { extension: ".ogg", label: "OGG" },
    InputFormat { extension: ".aac", label: "AAC" },
    InputFormat { extension: ".wma", label: "WMA" },
];

const AUDIO_OUTPUTS: &[(OutputFormat, &str)] = &[
    (OutputFormat::Audio(AudioOutput::Pcm), "PCM (raw samples)"),
    (OutputFormat::Audio(AudioOutput::Wav), "WAV"),
    (OutputFormat::Audio(AudioOutput::Mp3), "MP3"),
    (OutputFormat::Audio(AudioOutput::Flac), "FLAC"),
    (OutputFormat::Audio(AudioOutput::Ogg), "OGG Vorbis"),
    (OutputFormat::Audio(AudioOutput::M4a), "M4A (AAC)"),
];

const IMAGE_INPUTS: &[InputFormat] = &[
    InputFormat { extension: ".webp", label: "WEBP" },
    InputFormat { extension: ".jpg", label: "JPG" },
    InputFormat { extension: ".jfif", label: "JFIF" },
    InputFormat { extension: ".jpeg", label: "JPEG" },
    InputFormat { extension: ".png", label: "PNG" },
    InputFormat { extension: ".bmp", label: "BMP" },
    InputFormat { extension: ".gif", label: "GIF" },
    InputFormat { extension: ".tiff", label: "TIFF" },
];

const IMAGE_OUTPUTS: &[(OutputFormat, &str)] = &[
    (OutputFormat::Image(ImageOutput::Png), "PNG"),
    (OutputFormat::Image(ImageOutput::Jpeg), "JPG"),
    (OutputFormat::Image(ImageOutput::Bmp), "BMP"),
    (OutputFormat::Image(ImageOutput::Gif), "GIF"),
    (OutputFormat::Image(ImageOutput::Tiff), "TIFF"),
    (OutputFormat::Image(ImageOutput::Ico), "ICO (fit to 256x256)"),
];

const VIDEO_INPUTS: &[InputFormat] = &[
    InputFormat { extension: ".mp4", label: "MP4" },
    InputFormat { extension: ".mov", label: "MOV" },
    InputFormat { extension: ".avi", label: "AVI" },
    InputFormat { extension: ".mkv", label: "MKV" },
    InputFormat { extension: ".webm", label: "WEBM" },
];

const VIDEO_OUTPUTS: &[(OutputFormat, &str)] = &[(OutputFormat::Video(VideoOutput::Gif), "GIF")];

/// Ordered, immutable format tables for one media kind
#[derive(Debug, Clone, Copy)]
pub struct FormatRegistry {
    kind: MediaKind,
    inputs: &'static [InputFormat],
    outputs: &'static [(OutputFormat, &'static str)],
}

impl FormatRegistry {
    pub fn for_kind(kind: MediaKind) -> Self {
        let (inputs, outputs) = match kind {
            MediaKind::Audio => (AUDIO_INPUTS, AUDIO_OUTPUTS),
            MediaKind::Image => (IMAGE_INPUTS, IMAGE_OUTPUTS),
            MediaKind::Video => (VIDEO_INPUTS, VIDEO_OUTPUTS),
        };
        Self { kind, inputs, outputs }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn input_formats(&self) -> &'static [InputFormat] {
        self.inputs
    }

    pub fn output_formats(&self) -> &'static [(OutputFormat, &'static str)] {
        self.outputs
    }

    pub fn find_input(&self, extension: &str) -> Option<&'static InputFormat> {
        self.inputs.iter().find(|f| f.extension == extension)
    }

    pub fn find_output(&self, id: &str) -> Option<OutputFormat> {
        self.outputs
            .iter()
            .map(|(format, _)| *format)
            .find(|format| format.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_menus() {
        let images = FormatRegistry::for_kind(MediaKind::Image);
        let exts: Vec<_> = images.input_formats().iter().map(|f| f.extension).collect();
        assert_eq!(&exts[..4], &[".webp", ".jpg", ".jfif", ".jpeg"]);
        assert_eq!(images.output_formats()[0].0, OutputFormat::Image(ImageOutput::Png));

        let audio = FormatRegistry::for_kind(MediaKind::Audio);
        assert_eq!(audio.input_formats()[0].extension, ".m4a");
        assert_eq!(audio.output_formats()[0].0.id(), "pcm");

        let video = FormatRegistry::for_kind(MediaKind::Video);
        assert_eq!(video.output_formats().len(), 1);
        assert_eq!(video.output_formats()[0].0.extension(), "gif");
    }

    #[test]
    fn test_outputs_belong_to_their_kind() {
        for kind in [MediaKind::Audio, MediaKind::Image, MediaKind::Video] {
            let registry = FormatRegistry::for_kind(kind);
            assert!(registry.output_formats().iter().all(|(f, _)| f.kind() == kind));
            assert!(registry.input_formats().iter().all(|f| f.extension.starts_with('.')));
        }
    }

    #[test]
    fn test_lookup() {
        let audio = FormatRegistry::for_kind(MediaKind::Audio);
        assert_eq!(audio.find_output("mp3"), Some(OutputFormat::Audio(AudioOutput::Mp3)));
        assert_eq!(audio.find_output("png"), None);
        assert!(audio.find_input(".m4a").is_some());
        assert!(audio.find_input(".M4A").is_none());
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        assert_eq!("Video".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert!(matches!(
            "document".parse::<MediaKind>(),
            Err(ConvertError::UnsupportedFormat(_))
        ));
    }
}
