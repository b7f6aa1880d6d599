//! # Conversion Settings Module
//!
//! Parametri di codifica scelti dall'utente una sola volta per batch e
//! condivisi in sola lettura da tutte le conversioni di quel batch.
//!
//! ## Parametri:
//! - `pcm`: profondità in bit + sample rate (solo output PCM raw)
//! - `channels`: mono, stereo o canali originali (formati audio)
//! - `bitrate`: bitrate opzionale per i formati audio compressi
//! - `gif`: frame al secondo + politica di resize (video → GIF)
//!
//! I campi non pertinenti al formato di output restano `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample format for raw PCM export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    Unsigned8,
    Signed8,
    Signed16,
    Signed32,
}

impl BitDepth {
    pub const ALL: [BitDepth; 4] = [
        BitDepth::Unsigned8,
        BitDepth::Signed8,
        BitDepth::Signed16,
        BitDepth::Signed32,
    ];

    /// Bytes per sample
    pub fn sample_width(&self) -> u8 {
        match self {
            BitDepth::Unsigned8 | BitDepth::Signed8 => 1,
            BitDepth::Signed16 => 2,
            BitDepth::Signed32 => 4,
        }
    }

    /// ffmpeg raw muxer name (`-f`)
    pub fn ffmpeg_format(&self) -> &'static str {
        match self {
            BitDepth::Unsigned8 => "u8",
            BitDepth::Signed8 => "s8",
            BitDepth::Signed16 => "s16le",
            BitDepth::Signed32 => "s32le",
        }
    }

    /// ffmpeg encoder name (`-c:a`)
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            BitDepth::Unsigned8 => "pcm_u8",
            BitDepth::Signed8 => "pcm_s8",
            BitDepth::Signed16 => "pcm_s16le",
            BitDepth::Signed32 => "pcm_s32le",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BitDepth::Unsigned8 => "unsigned 8-bit",
            BitDepth::Signed8 => "signed 8-bit",
            BitDepth::Signed16 => "signed 16-bit",
            BitDepth::Signed32 => "signed 32-bit",
        }
    }
}

/// PCM export parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmSettings {
    pub bit_depth: BitDepth,
    /// Target rate in Hz; the export resamples to it
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channels {
    Mono,
    Stereo,
    KeepOriginal,
}

impl Channels {
    /// Value for ffmpeg's `-ac`, `None` leaves the layout untouched
    pub fn count(&self) -> Option<u8> {
        match self {
            Channels::Mono => Some(1),
            Channels::Stereo => Some(2),
            Channels::KeepOriginal => None,
        }
    }
}

/// How frames are scaled before the GIF is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizePolicy {
    KeepOriginal,
    /// Shrink clips wider than the limit, preserving aspect ratio
    MaxWidth(u32),
    /// Explicit size; a zero side is derived from the other one
    Custom { width: u32, height: u32 },
}

impl ResizePolicy {
    /// Output frame size for a clip of `width` x `height`
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (width, height);
        }

        match *self {
            ResizePolicy::KeepOriginal => (width, height),
            ResizePolicy::MaxWidth(max) => {
                if max == 0 || width <= max {
                    (width, height)
                } else {
                    (max, scale_side(height, max, width))
                }
            }
            ResizePolicy::Custom { width: 0, height: 0 } => (width, height),
            ResizePolicy::Custom { width: w, height: 0 } => (w, scale_side(height, w, width)),
            ResizePolicy::Custom { width: 0, height: h } => (scale_side(width, h, height), h),
            ResizePolicy::Custom { width: w, height: h } => (w, h),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            ResizePolicy::KeepOriginal | ResizePolicy::Custom { width: 0, height: 0 }
        )
    }
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizePolicy::KeepOriginal => write!(f, "original size"),
            ResizePolicy::MaxWidth(max) => write!(f, "max width {}px", max),
            ResizePolicy::Custom { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}

/// `side * numerator / denominator`, rounded, never below 1
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (side as f64 * numerator as f64 / denominator as f64).round() as u32;
    scaled.max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GifSettings {
    pub fps: f64,
    pub resize: ResizePolicy,
}

/// Encoding parameters for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub pcm: Option<PcmSettings>,
    pub channels: Option<Channels>,
    pub bitrate: Option<String>,
    pub gif: Option<GifSettings>,
}

impl Settings {
    /// One-line description for the batch log
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(pcm) = &self.pcm {
            parts.push(format!("{} @ {} Hz", pcm.bit_depth.label(), pcm.sample_rate));
        }
        if let Some(channels) = &self.channels {
            parts.push(format!("channels: {:?}", channels));
        }
        if let Some(bitrate) = &self.bitrate {
            parts.push(format!("bitrate: {}", bitrate));
        }
        if let Some(gif) = &self.gif {
            parts.push(format!("{} fps, {}", gif.fps, gif.resize));
        }
        if parts.is_empty() {
            "defaults".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_width_per_bit_depth() {
        assert_eq!(BitDepth::Unsigned8.sample_width(), 1);
        assert_eq!(BitDepth::Signed8.sample_width(), 1);
        assert_eq!(BitDepth::Signed16.sample_width(), 2);
        assert_eq!(BitDepth::Signed32.sample_width(), 4);
    }

    #[test]
    fn test_ffmpeg_names_agree_with_width() {
        for depth in BitDepth::ALL {
            let bits = depth.sample_width() as u32 * 8;
            assert!(depth.ffmpeg_format().contains(&bits.to_string()));
            assert!(depth.ffmpeg_codec().ends_with(depth.ffmpeg_format()));
        }
    }

    #[test]
    fn test_max_width_preserves_aspect() {
        let policy = ResizePolicy::MaxWidth(720);
        assert_eq!(policy.target_dimensions(1440, 720), (720, 360));
        assert_eq!(policy.target_dimensions(1440, 1080), (720, 540));
        assert_eq!(policy.target_dimensions(1920, 1080), (720, 405));
    }

    #[test]
    fn test_max_width_never_upscales() {
        let policy = ResizePolicy::MaxWidth(720);
        assert_eq!(policy.target_dimensions(640, 480), (640, 480));
        assert_eq!(policy.target_dimensions(720, 480), (720, 480));
    }

    #[test]
    fn test_custom_zero_means_preserve_aspect() {
        let policy = ResizePolicy::Custom { width: 320, height: 0 };
        assert_eq!(policy.target_dimensions(1280, 720), (320, 180));

        let policy = ResizePolicy::Custom { width: 0, height: 360 };
        assert_eq!(policy.target_dimensions(1280, 720), (640, 360));

        let policy = ResizePolicy::Custom { width: 100, height: 100 };
        assert_eq!(policy.target_dimensions(1280, 720), (100, 100));

        let policy = ResizePolicy::Custom { width: 0, height: 0 };
        assert_eq!(policy.target_dimensions(1280, 720), (1280, 720));
        assert!(policy.is_noop());
    }

    #[test]
    fn test_channel_counts() {
        assert_eq!(Channels::Mono.count(), Some(1));
        assert_eq!(Channels::Stereo.count(), Some(2));
        assert_eq!(Channels::KeepOriginal.count(), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Settings::default().describe(), "defaults");
        let settings = Settings {
            pcm: Some(PcmSettings { bit_depth: BitDepth::Unsigned8, sample_rate: 16000 }),
            ..Default::default()
        };
        assert_eq!(settings.describe(), "unsigned 8-bit @ 16000 Hz");
    }
}
