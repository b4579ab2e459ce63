use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use thumbnailer::batch::{self, BatchSettings, FormatChoice};
use thumbnailer::prompt::TerminalPrompt;
use thumbnailer::{Resampler, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "thumbnailer", version)]
#[command(about = "Generate thumbnails for images")]
struct Cli {
    /// Images to generate thumbnails for; directories are expanded to the images they contain
    #[arg(required = true, value_name = "IMAGE")]
    inputs: Vec<PathBuf>,

    /// Output directory (default same as input file(s))
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (original/jp[e]g/png) [default: original]
    #[arg(short, long)]
    format: Option<FormatChoice>,

    /// Prefix for output file name [default: t_]
    #[arg(short, long)]
    prefix: Option<String>,

    /// Maximum size for thumbnail images [default: 300]
    #[arg(short, long)]
    max_size: Option<u32>,

    /// Quality for JPG output (0-100) [default: 75]
    #[arg(short, long)]
    jpg_quality: Option<u8>,

    /// Scaler to use when downsizing images (NearestNeighbor/ApproxBiLinear/BiLinear/CatmullRom)
    /// [default: ApproxBiLinear]
    #[arg(short, long)]
    scaler: Option<Resampler>,

    /// Force overwrite existing files
    #[arg(long)]
    force: bool,

    /// Number of images to process in parallel [default: 1]
    #[arg(long)]
    jobs: Option<usize>,

    /// JSON file with default settings; flags given on the command line take precedence
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn batch_settings(&self) -> Result<BatchSettings> {
        let mut settings = match &self.settings {
            Some(path) => BatchSettings::from_json_file(path)?,
            None => BatchSettings::default(),
        };
        if let Some(output) = &self.output {
            settings.output_dir = Some(output.clone());
        }
        if let Some(format) = &self.format {
            settings.format = format.clone();
        }
        if let Some(prefix) = &self.prefix {
            settings.prefix = prefix.clone();
        }
        if let Some(max_size) = self.max_size {
            settings.max_size = max_size;
        }
        if let Some(quality) = self.jpg_quality {
            settings.jpeg_quality = quality;
        }
        if let Some(scaler) = self.scaler {
            settings.resampler = scaler;
        }
        if let Some(jobs) = self.jobs {
            settings.jobs = jobs;
        }
        settings.force |= self.force;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let settings = cli.batch_settings()?;
    settings.validate()?;
    let inputs = batch::collect_inputs(&cli.inputs)?;

    let mut prompt = TerminalPrompt;
    let report = batch::run(&settings, &inputs, &mut prompt, &mut std::io::stdout())?;
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "done"
    );
    Ok(())
}
