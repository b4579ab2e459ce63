//! Batch thumbnail generation for files on disk.
//!
//! The batch driver turns a list of input paths into thumbnails next to them (or in a
//! separate output directory), asking before it overwrites anything unless forced.
//! Validation happens up front; after that the first failing file aborts the batch.

use crate::error::{BatchError, ThumbnailError};
use crate::prompt::Confirm;
use crate::thumbnails::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SIZE, OutputFormat, Resampler, ThumbnailOption, Thumbnailer,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{self, Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions picked up when a directory is given as input.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Prefix used for output file names unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "t_";

/// Output format as spelled in flags or a settings file.
///
/// A concrete format names the output extension exactly as it was given, so `jpeg`
/// writes `.jpeg` and `jpg` writes `.jpg`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatChoice {
    format: OutputFormat,
    name: String,
}

impl FormatChoice {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Extension for thumbnails; `None` keeps the input's.
    pub fn extension(&self) -> Option<&str> {
        match self.format {
            OutputFormat::Original => None,
            OutputFormat::Jpeg | OutputFormat::Png => Some(&self.name),
        }
    }
}

impl Default for FormatChoice {
    fn default() -> Self {
        OutputFormat::Original.into()
    }
}

impl From<OutputFormat> for FormatChoice {
    fn from(format: OutputFormat) -> Self {
        let name = format.extension().unwrap_or("original").to_string();
        Self { format, name }
    }
}

impl FromStr for FormatChoice {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            format: s.parse()?,
            name: s.to_string(),
        })
    }
}

impl TryFrom<String> for FormatChoice {
    type Error = ThumbnailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormatChoice> for String {
    fn from(choice: FormatChoice) -> Self {
        choice.name
    }
}

impl fmt::Display for FormatChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Everything the batch driver needs to know besides the input files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Where thumbnails are written. `None` writes each one next to its input.
    pub output_dir: Option<PathBuf>,
    /// Prepended to the input file name.
    pub prefix: String,
    pub format: FormatChoice,
    pub max_size: u32,
    /// 0..=100, only used for JPEG output.
    pub jpeg_quality: u8,
    pub resampler: Resampler,
    /// Overwrite existing files without asking.
    pub force: bool,
    /// Number of files rendered at the same time.
    pub jobs: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            format: FormatChoice::default(),
            max_size: DEFAULT_MAX_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            resampler: Resampler::default(),
            force: false,
            jobs: 1,
        }
    }
}

impl BatchSettings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| BatchError::SettingsFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        let invalid = |msg: &str| Err(BatchError::InvalidSettings(msg.to_string()));
        if self.output_dir.is_none() && self.prefix.is_empty() {
            return invalid("at least one of output path and output prefix must be set");
        }
        if self.max_size < 1 {
            return invalid("max-size must be at least 1");
        }
        if self.jpeg_quality > 100 {
            return invalid("jpg quality must be between 0 and 100");
        }
        if self.jobs < 1 {
            return invalid("jobs must be at least 1");
        }
        Ok(())
    }

    /// The configuration template shared by every file of the batch.
    pub fn thumbnailer(&self) -> Thumbnailer {
        Thumbnailer::new([
            ThumbnailOption::OutFormat(self.format.format()),
            ThumbnailOption::MaxSize(self.max_size),
            ThumbnailOption::Quality(self.jpeg_quality),
            ThumbnailOption::Resampler(self.resampler),
        ])
    }

    /// Where the thumbnail of the absolute path `input` is written.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf, BatchError> {
        let dir = match &self.output_dir {
            Some(dir) => path::absolute(dir).map_err(|e| BatchError::io(dir, e))?,
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let file_name = input.file_name().ok_or_else(|| {
            BatchError::InvalidSettings(format!("{} is not a file", input.display()))
        })?;

        let mut name = OsString::from(&self.prefix);
        name.push(file_name);
        let mut output = dir.join(name);
        if let Some(ext) = self.format.extension() {
            output.set_extension(ext);
        }
        Ok(output)
    }
}

/// Create the output directory if needed; an existing non-directory is an error.
pub fn prepare_output_dir(dir: &Path) -> Result<(), BatchError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BatchError::InvalidSettings(format!(
            "output path '{}' is not a directory",
            dir.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| BatchError::io(dir, e))
        }
        Err(e) => Err(BatchError::io(dir, e)),
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Expand directories into the image files directly inside them, sorted by name.
/// Other paths are passed through untouched.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| BatchError::io(path, e.into()))?;
            if entry.file_type().is_file() && has_image_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// Outcome of a successful batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// `(input, output)` pairs, in the order they finished.
    pub written: Vec<(PathBuf, PathBuf)>,
    /// Inputs without a thumbnail of their own: the user kept the existing output, or a
    /// later input of the same batch took over the output path.
    pub skipped: Vec<PathBuf>,
}

struct Job {
    input: PathBuf,
    output: PathBuf,
    permissions: fs::Permissions,
}

/// Generate a thumbnail for each of `inputs`.
///
/// Existing outputs, and outputs already claimed by an earlier input of the batch, are
/// confirmed through `confirm` (unless `settings.force`) before any rendering starts.
/// When two inputs share an output path only the later one is rendered. For every written file, the input path and `  -> <output>` are
/// reported on `out`.
///
/// # Errors
///
/// Invalid settings are rejected before any file is touched. Afterwards the first
/// unreadable input, failed thumbnail or failed write aborts the batch.
pub fn run<C: Confirm, W: Write + Send>(
    settings: &BatchSettings,
    inputs: &[PathBuf],
    confirm: &mut C,
    out: &mut W,
) -> Result<BatchReport, BatchError> {
    settings.validate()?;
    if let Some(dir) = &settings.output_dir {
        prepare_output_dir(dir)?;
    }

    let mut report = BatchReport::default();
    let mut jobs: Vec<Job> = Vec::with_capacity(inputs.len());
    let mut planned: HashMap<PathBuf, usize> = HashMap::new();
    for input in inputs {
        let input = path::absolute(input).map_err(|e| BatchError::io(input, e))?;
        let permissions = fs::metadata(&input)
            .map_err(|e| BatchError::io(&input, e))?
            .permissions();
        let output = settings.output_path(&input)?;
        let earlier = planned.get(&output).copied();

        if !settings.force
            && (earlier.is_some() || fs::exists(&output).map_err(|e| BatchError::io(&output, e))?)
        {
            let name = output.file_name().unwrap_or_default().to_string_lossy();
            let question = format!("{name} already exists in the output directory - overwrite?");
            if !confirm
                .confirm(&question)
                .map_err(|e| BatchError::io(&output, e))?
            {
                info!(input = %input.display(), "keeping existing thumbnail");
                report.skipped.push(input);
                continue;
            }
        }

        let job = Job {
            input,
            output,
            permissions,
        };
        match earlier {
            Some(index) => {
                let replaced = std::mem::replace(&mut jobs[index], job);
                info!(
                    input = %replaced.input.display(),
                    output = %replaced.output.display(),
                    "output taken over by a later input"
                );
                report.skipped.push(replaced.input);
            }
            None => {
                planned.insert(job.output.clone(), jobs.len());
                jobs.push(job);
            }
        }
    }

    let template = settings.thumbnailer();
    let out = Mutex::new(out);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs)
        .build()?;
    debug!(files = jobs.len(), threads = settings.jobs, "rendering thumbnails");

    report.written = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                write_thumbnail(&template, job)?;
                let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
                writeln!(out, "{}", job.input.display()).map_err(BatchError::Report)?;
                writeln!(out, "  -> {}", job.output.display()).map_err(BatchError::Report)?;
                Ok((job.input.clone(), job.output.clone()))
            })
            .collect::<Result<Vec<_>, BatchError>>()
    })?;

    Ok(report)
}

fn write_thumbnail(template: &Thumbnailer, job: &Job) -> Result<(), BatchError> {
    let data = fs::read(&job.input).map_err(|e| BatchError::io(&job.input, e))?;
    let thumbnail = template
        .with(ThumbnailOption::ImageData(data.into()))
        .render()
        .map_err(|source| BatchError::Thumbnail {
            path: job.input.clone(),
            source,
        })?;

    fs::write(&job.output, &thumbnail.data).map_err(|e| BatchError::io(&job.output, e))?;
    fs::set_permissions(&job.output, job.permissions.clone())
        .map_err(|e| BatchError::io(&job.output, e))?;

    info!(
        input = %job.input.display(),
        output = %job.output.display(),
        width = thumbnail.width,
        height = thumbnail.height,
        format = %thumbnail.format,
        "thumbnail written"
    );
    Ok(())
}
