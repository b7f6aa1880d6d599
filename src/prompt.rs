//! # Interactive Prompt Module
//!
//! Menu numerati e domande a testo libero su stdin/stdout.
//!
//! ## Responsabilità:
//! - `Prompter`: legge una riga per volta da qualunque `BufRead` e scrive su
//!   qualunque `Write` (stdin/stdout in produzione, buffer nei test)
//! - Loop di retry esplicito: un input non valido ristampa un suggerimento e
//!   ripete la domanda, senza limite
//! - Fine dello stream (Ctrl-D / Ctrl-Z) durante un prompt → `PromptError::Interrupted`
//! - `SettingsCollector`: raccoglie i parametri di un formato di output
//!
//! ## Esempio:
//! ```text
//! Output format:
//!   [1] PCM (raw samples)
//!   [2] WAV
//! > 1
//! PCM bit depth:
//!   [1] unsigned 8-bit
//! ...
//! ```

use crate::config::Config;
use crate::error::PromptError;
use crate::formats::{AudioOutput, OutputFormat, VideoOutput};
use crate::settings::{BitDepth, Channels, GifSettings, PcmSettings, ResizePolicy, Settings};
use std::io::{BufRead, Write};

/// Line-oriented prompt over an input reader and an output writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter, returning the writer
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line of output
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Print `question` and read one trimmed line
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Interrupted);
        }
        Ok(line.trim().to_string())
    }

    /// Numbered menu; repeats until a listed number is entered
    pub fn choose<T: Copy>(&mut self, title: &str, options: &[(T, &str)]) -> Result<T, PromptError> {
        loop {
            self.say(title)?;
            for (index, (_, label)) in options.iter().enumerate() {
                self.say(&format!("  [{}] {}", index + 1, label))?;
            }

            let answer = self.ask(">")?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1].0),
                _ => self.say(&format!("Enter a number between 1 and {}", options.len()))?,
            }
        }
    }

    /// Free-text value with a default for empty input; repeats until `parse` accepts it
    pub fn ask_with_default<T, F>(
        &mut self,
        question: &str,
        default: T,
        hint: &str,
        parse: F,
    ) -> Result<T, PromptError>
    where
        T: std::fmt::Display,
        F: Fn(&str) -> Option<T>,
    {
        loop {
            let answer = self.ask(&format!("{} [{}]:", question, default))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match parse(&answer) {
                Some(value) => return Ok(value),
                None => self.say(hint)?,
            }
        }
    }

    /// Free-text value that may be skipped with an empty line
    pub fn ask_optional<T, F>(&mut self, question: &str, hint: &str, parse: F) -> Result<Option<T>, PromptError>
    where
        F: Fn(&str) -> Option<T>,
    {
        loop {
            let answer = self.ask(&format!("{} (Enter to skip):", question))?;
            if answer.is_empty() {
                return Ok(None);
            }
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => self.say(hint)?,
            }
        }
    }

    /// Non-empty free text
    pub fn ask_required(&mut self, question: &str) -> Result<String, PromptError> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("A value is required")?;
        }
    }
}

fn parse_positive_u32(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().filter(|v| *v > 0)
}

fn parse_positive_f64(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}

/// Accepts `192k`, `1.5M` or a plain number of bits per second
pub fn parse_bitrate(text: &str) -> Option<String> {
    let number = text.trim_end_matches(['k', 'K', 'm', 'M']);
    let suffix_len = text.len() - number.len();
    if suffix_len > 1 || number.is_empty() {
        return None;
    }
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|_| text.to_string())
}

/// Collects the `Settings` for one output format
pub struct SettingsCollector<'a> {
    config: &'a Config,
}

impl<'a> SettingsCollector<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn collect<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        format: OutputFormat,
    ) -> Result<Settings, PromptError> {
        let mut settings = Settings::default();

        match format {
            OutputFormat::Audio(audio) => {
                if audio == AudioOutput::Pcm {
                    settings.pcm = Some(self.collect_pcm(prompter)?);
                }
                settings.channels = Some(self.collect_channels(prompter)?);
                if audio.is_compressed() {
                    settings.bitrate = prompter.ask_optional(
                        "Bitrate, e.g. 192k",
                        "Enter a bitrate like 128k or 320k",
                        parse_bitrate,
                    )?;
                }
            }
            OutputFormat::Video(VideoOutput::Gif) => {
                settings.gif = Some(self.collect_gif(prompter)?);
            }
            OutputFormat::Image(_) => {}
        }

        Ok(settings)
    }

    fn collect_pcm<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<PcmSettings, PromptError> {
        let options: Vec<(BitDepth, &str)> = BitDepth::ALL.iter().map(|d| (*d, d.label())).collect();
        let bit_depth = prompter.choose("PCM bit depth:", &options)?;
        let sample_rate = prompter.ask_with_default(
            "Sample rate in Hz",
            self.config.default_sample_rate,
            "Enter a positive whole number, e.g. 16000",
            parse_positive_u32,
        )?;
        Ok(PcmSettings { bit_depth, sample_rate })
    }

    fn collect_channels<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Channels, PromptError> {
        prompter.choose(
            "Channels:",
            &[
                (Channels::Mono, "Mono"),
                (Channels::Stereo, "Stereo"),
                (Channels::KeepOriginal, "Keep original"),
            ],
        )
    }

    fn collect_gif<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<GifSettings, PromptError> {
        let fps = prompter.ask_with_default(
            "Frames per second",
            self.config.default_gif_fps,
            "Enter a positive number, e.g. 15",
            parse_positive_f64,
        )?;

        #[derive(Clone, Copy)]
        enum ResizeChoice {
            Keep,
            MaxWidth,
            Custom,
        }

        let max_label = format!("Scale down to {}px wide (keeps aspect ratio)", self.config.max_gif_width);
        let choice = prompter.choose(
            "Resize:",
            &[
                (ResizeChoice::Keep, "Keep original size"),
                (ResizeChoice::MaxWidth, max_label.as_str()),
                (ResizeChoice::Custom, "Custom width/height (0 keeps aspect ratio)"),
            ],
        )?;

        let resize = match choice {
            ResizeChoice::Keep => ResizePolicy::KeepOriginal,
            ResizeChoice::MaxWidth => ResizePolicy::MaxWidth(self.config.max_gif_width),
            ResizeChoice::Custom => {
                let hint = "Enter a whole number, 0 keeps the aspect ratio";
                let width = prompter.ask_with_default("Width", 0u32, hint, |t| t.parse().ok())?;
                let height = prompter.ask_with_default("Height", 0u32, hint, |t| t.parse().ok())?;
                ResizePolicy::Custom { width, height }
            }
        };

        Ok(GifSettings { fps, resize })
    }
}
