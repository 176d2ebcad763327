// photometa/src/cli.rs
use crate::core::ExtractorConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "photometa",
    version,
    about = "Extract EXIF, GPS, HEIF and filesystem metadata from a photo"
)]
pub struct Cli {
    /// Image to analyze (prompted for when omitted)
    pub input: Option<PathBuf>,

    /// JSON output path (default: <input stem><suffix>.json next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save the JSON report without asking
    #[arg(short, long, conflicts_with = "no_save")]
    pub save: bool,

    /// Never save the JSON report
    #[arg(long)]
    pub no_save: bool,

    /// Suffix appended to the input stem for the default JSON file name
    #[arg(long, default_value = "_metadata")]
    pub suffix: String,

    /// Disable coloured output (also honoured via NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Always,
    Never,
    Ask,
}

impl Cli {
    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig {
            json_suffix: self.suffix.clone(),
            color: !self.no_color && std::env::var_os("NO_COLOR").is_none(),
            ..Default::default()
        }
    }

    pub fn save_choice(&self) -> SaveChoice {
        if self.save {
            SaveChoice::Always
        } else if self.no_save {
            SaveChoice::Never
        } else {
            SaveChoice::Ask
        }
    }
}
