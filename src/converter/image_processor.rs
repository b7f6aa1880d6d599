//! # Image Processing Module
//!
//! Conversione di immagini in-process con il crate `image`.
//!
//! ## Pipeline:
//! 1. Decode dell'input riconoscendo il formato dal contenuto (i `.jfif`
//!    sono JPEG, l'estensione non basta)
//! 2. Conversione del color mode quando il formato di destinazione lo richiede
//! 3. Encode in un file temporaneo nella directory di output
//! 4. Rename atomico sul path finale
//!
//! ## Color mode richiesto per formato:
//!
//! | Output | Pixel mode | Motivo |
//! |--------|------------|--------|
//! | JPG    | RGB8       | niente alpha, niente 16 bit |
//! | BMP    | RGB8       | |
//! | GIF    | RGBA8      | l'encoder quantizza da RGBA |
//! | ICO    | RGBA8      | ridotta a 256x256 max, aspect ratio preservato |
//! | PNG    | invariato  | float → 16 bit |
//! | TIFF   | invariato  | gray+alpha → RGBA (8/16 bit), float → 16 bit |
//!
//! Decode ed encode sono CPU-bound: girano su `spawn_blocking`.

use super::{commit, staging_file, ConversionJob};
use crate::error::ConvertError;
use crate::formats::ImageOutput;
use ::image::{ColorType, DynamicImage};
use std::path::Path;
use tracing::debug;

/// Largest side the ICO encoder accepts
const ICO_MAX_SIDE: u32 = 256;

/// Converts still images
#[derive(Debug, Default)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Pixel mode the encoder for `target` needs for a `source` image,
    /// `None` when it accepts `source` as is
    pub fn required_color(target: ImageOutput, source: ColorType) -> Option<ColorType> {
        let required = match target {
            ImageOutput::Jpeg | ImageOutput::Bmp => ColorType::Rgb8,
            ImageOutput::Gif | ImageOutput::Ico => ColorType::Rgba8,
            ImageOutput::Png => match source {
                ColorType::Rgb32F => ColorType::Rgb16,
                ColorType::Rgba32F => ColorType::Rgba16,
                _ => return None,
            },
            ImageOutput::Tiff => match source {
                ColorType::La8 => ColorType::Rgba8,
                ColorType::La16 | ColorType::Rgba32F => ColorType::Rgba16,
                ColorType::Rgb32F => ColorType::Rgb16,
                _ => return None,
            },
        };
        (required != source).then_some(required)
    }

    /// Convert `img` to the pixel mode and size `target` accepts
    pub fn prepare(img: DynamicImage, target: ImageOutput) -> DynamicImage {
        let img = match Self::required_color(target, img.color()) {
            Some(required) => {
                debug!("Converting pixel mode {:?} -> {:?} for {:?}", img.color(), required, target);
                match required {
                    ColorType::Rgb8 => DynamicImage::ImageRgb8(img.to_rgb8()),
                    ColorType::Rgb16 => DynamicImage::ImageRgb16(img.to_rgb16()),
                    ColorType::Rgba16 => DynamicImage::ImageRgba16(img.to_rgba16()),
                    _ => DynamicImage::ImageRgba8(img.to_rgba8()),
                }
            }
            None => img,
        };

        if target == ImageOutput::Ico && (img.width() > ICO_MAX_SIDE || img.height() > ICO_MAX_SIDE) {
            debug!("Shrinking {}x{} to fit an icon", img.width(), img.height());
            return img.thumbnail(ICO_MAX_SIDE, ICO_MAX_SIDE);
        }
        img
    }

    pub async fn convert(&self, job: &ConversionJob<'_>, target: ImageOutput) -> Result<(), ConvertError> {
        let input = job.input_path.clone();
        let output = job.output_path.clone();
        tokio::task::spawn_blocking(move || Self::convert_blocking(&input, &output, target)).await?
    }

    fn convert_blocking(input: &Path, output: &Path, target: ImageOutput) -> Result<(), ConvertError> {
        let img = ::image::io::Reader::open(input)?
            .with_guessed_format()?
            .decode()?;
        let img = Self::prepare(img, target);

        let staged = staging_file(output)?;
        img.save_with_format(staged.path(), target.image_format())?;
        commit(staged, output)
    }
}
