use clap::Parser;
use flipcss_core::{Config, Direction};
use std::fs;
use std::path::PathBuf;

/// At most this many of the switches may be combined.
const MAX_SWITCHES: usize = 2;

#[derive(Parser, Debug)]
#[command(name = "flipcss")]
#[command(about = "Flip CSS between left-to-right and right-to-left layouts")]
#[command(
    after_help = "If no direction is given, the CSS is just flipped (with no cleaning of direction specific rules)."
)]
pub struct Cli {
    /// Flip CSS LTR>RTL
    #[arg(short = 'r', long, conflicts_with = "ltr")]
    pub rtl: bool,

    /// Flip CSS RTL>LTR
    #[arg(short = 'l', long)]
    pub ltr: bool,

    /// Output warnings
    #[arg(short = 'w', long)]
    pub warnings: bool,

    /// Clean only (requires a direction, -r or -l)
    #[arg(short = 'c', long)]
    pub clean_only: bool,

    /// Swap :before and :after
    #[arg(short = 'p', long)]
    pub swap_pseudo: bool,

    /// Do not swap the words left and right inside url()
    #[arg(short = 'u', long)]
    pub ignore_urls: bool,

    /// Do not swap the words left and right in selectors
    #[arg(short = 's', long)]
    pub ignore_selectors: bool,

    /// Read defaults from a JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stylesheet to read
    #[arg(value_name = "INFILE")]
    pub input: PathBuf,

    /// Where to write the result
    #[arg(value_name = "OUTFILE")]
    pub output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid option(s): {0}")]
    InvalidArguments(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] flipcss_core::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidArguments(_) => 2,
            CliError::Read { .. } | CliError::Write { .. } | CliError::Config(_) => 1,
        }
    }
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub config: Config,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Cli {
    pub fn into_request(self) -> Result<Request, CliError> {
        let switches = [
            self.rtl,
            self.ltr,
            self.warnings,
            self.clean_only,
            self.swap_pseudo,
            self.ignore_urls,
            self.ignore_selectors,
        ]
        .into_iter()
        .filter(|&on| on)
        .count();
        if switches > MAX_SWITCHES {
            return Err(CliError::InvalidArguments(format!(
                "at most {} options can be combined",
                MAX_SWITCHES
            )));
        }

        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if self.rtl {
            config.direction = Some(Direction::Rtl);
        }
        if self.ltr {
            config.direction = Some(Direction::Ltr);
        }
        config.clean_only |= self.clean_only;
        config.flip.warnings |= self.warnings;
        config.flip.swap_pseudo |= self.swap_pseudo;
        if self.ignore_urls {
            config.flip.flip_urls = false;
        }
        if self.ignore_selectors {
            config.flip.flip_selectors = false;
        }

        if config.clean_only && config.direction.is_none() {
            return Err(CliError::InvalidArguments(
                "--clean-only requires a direction (-r or -l)".to_string(),
            ));
        }

        Ok(Request {
            config,
            input: self.input,
            output: self.output,
        })
    }
}

/// Read, transform, write, then report diagnostics.
pub fn run(request: &Request) -> Result<(), CliError> {
    let css = fs::read_to_string(&request.input).map_err(|source| CliError::Read {
        path: request.input.clone(),
        source,
    })?;

    let out = flipcss_core::transform(&css, &request.config);

    fs::write(&request.output, &out.css).map_err(|source| CliError::Write {
        path: request.output.clone(),
        source,
    })?;
    tracing::info!(
        input = %request.input.display(),
        output = %request.output.display(),
        direction = ?request.config.direction,
        "stylesheet written"
    );

    if request.config.flip.warnings {
        for diagnostic in &out.diagnostics {
            println!("{}", diagnostic);
        }
    }
    Ok(())
}
