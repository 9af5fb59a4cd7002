use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sukashi::{
    batch::{self, BatchJob, ProgressSink, ProgressUpdate},
    compositor::Anchor,
    formats::OutputFormat,
    Config,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "sukashi.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark a batch of images (default if no command specified)
    Run {
        /// Directory to scan for input images (jpg, jpeg, png)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Explicit input files, processed after any scanned directory
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Watermark image, overriding the config file
        #[arg(short, long)]
        watermark: Option<PathBuf>,

        /// Output directory, overriding the config file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: jpg, png, tiff, or webp
        #[arg(short, long)]
        format: Option<String>,

        /// Watermark opacity (0.1-1.0)
        #[arg(long)]
        opacity: Option<f32>,

        /// Watermark scale relative to the source's shorter side (0.1-1.0)
        #[arg(long)]
        scale: Option<f32>,

        /// Watermark placement
        #[arg(long, value_enum)]
        anchor: Option<Anchor>,

        /// Prefix prepended to every output file name
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print the effective configuration and exit
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Some(Commands::ShowConfig) => {
            println!("{}", toml_edit::ser::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::Run {
            input,
            files,
            watermark,
            output,
            format,
            opacity,
            scale,
            anchor,
            prefix,
        }) => {
            run_batch(
                config, input, files, watermark, output, format, opacity, scale, anchor, prefix,
            )
            .await
        }
        None => run_batch(config, None, Vec::new(), None, None, None, None, None, None, None).await,
    }
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = toml_edit::de::from_str::<Config>(&content)?;
        info!("Configuration loaded from: {:?}", path);
        Ok(config)
    } else {
        info!("Config file not found at {:?}, using defaults", path);
        Ok(Config::default())
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_batch(
    mut config: Config,
    input: Option<PathBuf>,
    files: Vec<PathBuf>,
    watermark: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    opacity: Option<f32>,
    scale: Option<f32>,
    anchor: Option<Anchor>,
    prefix: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(watermark) = watermark {
        config.watermark.image = watermark;
    }
    if let Some(output) = output {
        config.output.directory = output;
    }
    if let Some(name) = format {
        config.output.format = OutputFormat::from_name(&name)
            .ok_or_else(|| format!("unknown output format: {}", name))?;
    }
    if let Some(opacity) = opacity {
        config.watermark.opacity = opacity;
    }
    if let Some(scale) = scale {
        config.watermark.scale = scale;
    }
    if let Some(anchor) = anchor {
        config.watermark.anchor = anchor;
    }
    if prefix.is_some() {
        config.output.prefix = prefix;
    }

    let input_directory = input.or_else(|| config.input.directory.clone());
    let mut inputs = match &input_directory {
        Some(directory) => batch::collect_input_files(directory)?,
        None => Vec::new(),
    };
    inputs.extend(files);

    if inputs.is_empty() {
        return Err(
            "no input files: pass --input <dir>, list files, or set [input] directory in the config"
                .into(),
        );
    }

    info!(
        "Watermarking {} files with {:?} into {:?}",
        inputs.len(),
        config.watermark.image,
        config.output.directory
    );

    let job = BatchJob {
        inputs,
        watermark_path: config.watermark.image.clone(),
        config: config.watermark_config(),
        options: config.format_options(),
        output_directory: config.output.directory.clone(),
        name_prefix: config.output.prefix.clone(),
    };

    let sink = Arc::new(ConsoleProgress::new(job.inputs.len() as u64));

    // Finish the file in flight on Ctrl+C, then stop.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping after the current file");
                cancel.cancel();
            }
        });
    }

    let result = batch::run(job, sink.clone(), cancel).await?;
    sink.finish();

    println!(
        "Done: {} succeeded, {} failed{}",
        result.succeeded,
        result.failed,
        if result.cancelled { " (cancelled)" } else { "" }
    );
    for outcome in result.outcomes.iter().filter(|o| !o.succeeded()) {
        if let Err(reason) = &outcome.result {
            eprintln!("  {}: {}", outcome.input.display(), reason);
        }
    }

    if result.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")
                .expect("progress bar template is valid")
                .progress_chars("=> "),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn file_done(&self, update: &ProgressUpdate) {
        self.bar.set_message(format!(
            "{} ({})",
            update.file,
            if update.succeeded { "ok" } else { "failed" }
        ));
        self.bar.inc(1);
    }
}
