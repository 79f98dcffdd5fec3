//! # Sitestamp CLI
//!
//! Command-line interface for composing site photos with a form table.
//!
//! ## Usage
//!
//! ```bash
//! # Print default values for a form (date fields get today's date)
//! sitestamp init-values --form form.json > values.json
//!
//! # Inspect the layout for a 400px-wide display
//! sitestamp layout --display-width 400 --rotation 90 --form form.json --values values.json
//!
//! # Compose photos into JPEGs
//! sitestamp compose --photo a.jpg --photo b.jpg --rotation 90 \
//!     --display-width 400 --form form.json --values values.json --out-dir out/
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use sitestamp::{
    SitestampError,
    batch::{BatchOutcome, capture_batch, plan_batch},
    compose::Composer,
    config::CompositeConfig,
    export::RasterExporter,
    form::{self, FormDescriptor, FormValues},
    geometry::{DisplayMetrics, Rotation},
    text::{GlyphPainter, TtfFont, text_stack},
};

/// Sitestamp - Site photo composition utility
#[derive(Parser, Debug)]
#[command(name = "sitestamp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ComposeArgs {
    /// Available display width in logical pixels
    #[arg(long)]
    display_width: f64,

    /// Form descriptor JSON file
    #[arg(long, value_name = "FILE")]
    form: PathBuf,

    /// Field values JSON file (object of field → value)
    #[arg(long, value_name = "FILE")]
    values: PathBuf,

    /// Composite configuration JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// TrueType font for table text (defaults to monospace layout with the built-in bitmap font)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the composition spec for one photo as JSON
    Layout {
        #[command(flatten)]
        args: ComposeArgs,

        /// Photo rotation in degrees (0, 90, 180, 270)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotation: i32,
    },

    /// Compose photos and write one JPEG per photo
    Compose {
        #[command(flatten)]
        args: ComposeArgs,

        /// Input photo (repeat for a batch)
        #[arg(long = "photo", value_name = "FILE", required = true)]
        photos: Vec<PathBuf>,

        /// Rotation per photo; a single value applies to all photos
        #[arg(long = "rotation", allow_negative_numbers = true)]
        rotations: Vec<i32>,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Name files for the device gallery instead of the upload folder
        #[arg(long)]
        gallery_names: bool,
    },

    /// Print initial field values for a form as JSON
    InitValues {
        /// Form descriptor JSON file
        #[arg(long, value_name = "FILE")]
        form: PathBuf,

        /// Date used for date fields (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), SitestampError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Layout { args, rotation } => {
            let rotation = Rotation::try_from(rotation)?;
            let session = Session::load(&args)?;
            let entries = form::entries(&session.form, &session.values);
            let spec = session.composer.compose(
                DisplayMetrics::new(args.display_width),
                rotation,
                &entries,
            )?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }

        Commands::Compose {
            args,
            photos,
            rotations,
            out_dir,
            gallery_names,
        } => {
            let session = Session::load(&args)?;
            let missing = form::missing_fields(&session.form, &session.values);
            if !missing.is_empty() {
                return Err(SitestampError::Configuration(format!(
                    "missing values for: {}",
                    missing.join(", ")
                )));
            }

            let rotations = rotations_for(&rotations, photos.len())?;
            let images = photos
                .iter()
                .map(|path| {
                    image::open(path).map_err(|e| {
                        SitestampError::Image(format!("{}: {}", path.display(), e))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let entries = form::entries(&session.form, &session.values);
            let specs = plan_batch(
                &session.composer,
                DisplayMetrics::new(args.display_width),
                &rotations,
                &entries,
            )?;

            let mut exporter = RasterExporter::with_painter(session.config.export, session.painter)?;
            println!("Composing {} photo(s)...", images.len());
            let outcome = capture_batch(&mut exporter, &specs, &images, |p| {
                println!("  [{:>3}%] {}/{}", p.percent, p.index + 1, p.total);
                ControlFlow::Continue(())
            })?;

            if let BatchOutcome::Completed(artifacts) = outcome {
                fs::create_dir_all(&out_dir)?;
                let timestamp = Utc::now().timestamp_millis();
                for (i, artifact) in artifacts.iter().enumerate() {
                    let name = if gallery_names {
                        form::gallery_file_name(i, timestamp)
                    } else {
                        form::upload_file_name(&session.form, &session.values, i, timestamp)
                    };
                    let path = out_dir.join(name);
                    fs::write(&path, &artifact.bytes)?;
                    println!("Saved to {}", path.display());
                }
            }
        }

        Commands::InitValues { form: path, date } => {
            let descriptor = read_form(&path)?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let values = form::initial_values(&descriptor, today);
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
    }

    Ok(())
}

/// Everything loaded from the shared compose arguments.
struct Session {
    config: CompositeConfig,
    form: FormDescriptor,
    values: FormValues,
    composer: Composer,
    painter: Box<dyn GlyphPainter>,
}

impl Session {
    fn load(args: &ComposeArgs) -> Result<Self, SitestampError> {
        let config = match &args.config {
            Some(path) => CompositeConfig::from_json_file(path)?,
            None => CompositeConfig::default(),
        };
        let form = read_form(&args.form)?;
        let values: FormValues = serde_json::from_str(&fs::read_to_string(&args.values)?)?;

        let font = args.font.as_ref().map(|path| TtfFont::from_file(path)).transpose()?;
        let (measure, painter) = text_stack(font);
        let composer = Composer::with_measure(&config, measure)?;

        Ok(Self {
            config,
            form,
            values,
            composer,
            painter,
        })
    }
}

fn read_form(path: &Path) -> Result<FormDescriptor, SitestampError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn rotations_for(given: &[i32], photos: usize) -> Result<Vec<Rotation>, SitestampError> {
    let parsed = given
        .iter()
        .map(|&deg| Rotation::try_from(deg))
        .collect::<Result<Vec<_>, _>>()?;
    match parsed.as_slice() {
        [] => Ok(vec![Rotation::Deg0; photos]),
        [single] => Ok(vec![*single; photos]),
        many if many.len() == photos => Ok(many.to_vec()),
        many => Err(SitestampError::Configuration(format!(
            "{} rotations given for {} photos",
            many.len(),
            photos
        ))),
    }
}
