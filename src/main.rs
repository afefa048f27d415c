use clap::{Parser, Subcommand};
use file_preview::config::{self, PreviewConfig};
use file_preview::output::{self, BatchEntry, CheckEntry, CheckOutcome};
use file_preview::render::pdf::DEFAULT_SCALE;
use file_preview::types::PreviewFile;
use file_preview::validate::validate_file;
use file_preview::{Previewer, document};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "file-preview.toml";

/// Shared flag for commands that read the preview config.
#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Config file (defaults to ./file-preview.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self) -> Result<PreviewConfig, config::ConfigError> {
        match &self.config {
            // An explicit path must exist.
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                config::resolve_config(&PreviewConfig::default(), Some(config::parse_overlay(&content)?))
            }
            None => config::load_config(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }
}

#[derive(Parser)]
#[command(name = "file-preview")]
#[command(about = "Validate files and render them as embeddable HTML previews")]
#[command(long_about = "\
Validate files and render them as embeddable HTML previews

Supported formats: PDF, Word (docx; doc gets a notice), Excel (xls, xlsx),
CSV, plain text and code (txt, json, html, xml), and images (png, jpeg,
gif, webp, svg).

Every file is validated before it is parsed: size limit, MIME type, the
configured type list, and a blocklist of executable extensions.

Run 'file-preview gen-config' to generate a documented file-preview.toml.
Set RUST_LOG (e.g. RUST_LOG=file_preview=debug) for more logging.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate files without rendering them (directories are walked)
    Check {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Render one file to a standalone HTML page
    Preview {
        #[command(flatten)]
        config: ConfigArgs,
        /// PDF page to show (1-based, clamped to the document)
        #[arg(long)]
        page: Option<usize>,
        /// PDF zoom factor (clamped to 0.5..=3.0)
        #[arg(long)]
        scale: Option<f64>,
        /// Spreadsheet sheet to show instead of the first one
        #[arg(long, conflicts_with_all = ["page", "scale"])]
        sheet: Option<String>,
        /// Write the page here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Print the metadata as JSON instead of the page
        #[arg(long)]
        json: bool,
        path: PathBuf,
    },
    /// Render many files in parallel into a directory
    Batch {
        #[command(flatten)]
        config: ConfigArgs,
        /// Pages mirror each file's path below the directory it was found in
        #[arg(long)]
        out_dir: PathBuf,
        /// Worker threads (defaults to the number of cores)
        #[arg(long, short)]
        jobs: Option<usize>,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List supported MIME types and extensions
    Types {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print a stock file-preview.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { config, paths } => {
            let config = config.load()?;
            let entries: Vec<CheckEntry> = collect_files(&paths)
                .into_iter()
                .map(|(path, _)| {
                    let outcome = match PreviewFile::from_path_within(&path, config.max_file_size) {
                        Ok(file) => match validate_file(&file, &config) {
                            Ok(file_type) => CheckOutcome::Accepted {
                                file_type,
                                size: file.size,
                            },
                            Err(e) => CheckOutcome::Rejected(e.reason()),
                        },
                        Err(e) => CheckOutcome::Rejected(e.to_string()),
                    };
                    CheckEntry { path, outcome }
                })
                .collect();
            output::print_check_output(&entries);
            let rejected = entries
                .iter()
                .filter(|e| matches!(e.outcome, CheckOutcome::Rejected(_)))
                .count();
            if rejected > 0 {
                return Err(format!("{rejected} file(s) rejected").into());
            }
        }
        Command::Preview {
            config,
            page,
            scale,
            sheet,
            out,
            json,
            path,
        } => {
            let previewer = Previewer::new(config.load()?);
            let file = PreviewFile::from_path_within(&path, previewer.config().max_file_size)?;
            let result = if let Some(sheet) = sheet {
                previewer.preview_sheet(&file, &sheet)?
            } else if page.is_some() || scale.is_some() {
                previewer.preview_page(&file, page.unwrap_or(1), scale.unwrap_or(DEFAULT_SCALE))?
            } else {
                previewer.preview(&file)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result.metadata)?);
                return Ok(());
            }
            let html = document::render_document(&result, previewer.config()).into_string();
            match &out {
                Some(dest) => std::fs::write(dest, html)?,
                None => println!("{html}"),
            }
            output::print_preview_output(&result, out.as_deref());
        }
        Command::Batch {
            config,
            out_dir,
            jobs,
            paths,
        } => {
            if let Some(jobs) = jobs {
                init_thread_pool(jobs);
            }
            let previewer = Previewer::new(config.load()?);
            let inputs = collect_files(&paths);
            let pages = page_paths(&inputs);

            // Unreadable files become failed entries; the rest go through
            // as one batch.
            let mut files = Vec::with_capacity(inputs.len());
            let mut loaded = Vec::with_capacity(inputs.len());
            for (path, _) in &inputs {
                match PreviewFile::from_path_within(path, previewer.config().max_file_size) {
                    Ok(file) => {
                        files.push(file);
                        loaded.push(Ok(()));
                    }
                    Err(e) => loaded.push(Err(format!("Cannot read {}: {e}", path.display()))),
                }
            }
            let mut rendered = files.iter().zip(previewer.preview_all(&files)?);

            let mut entries = Vec::with_capacity(inputs.len());
            for (((_, relative), page_path), load) in inputs.iter().zip(&pages).zip(loaded) {
                let name = relative.display().to_string();
                if let Err(reason) = load {
                    entries.push(BatchEntry {
                        name,
                        outcome: Err(reason),
                    });
                    continue;
                }
                let Some((file, result)) = rendered.next() else {
                    break;
                };
                let dest = out_dir.join(page_path);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let page = match &result {
                    Ok(r) => document::render_document(r, previewer.config()),
                    Err(e) => document::render_error_document(&file.name, &e.to_string(), previewer.config()),
                };
                std::fs::write(&dest, page.into_string())?;
                entries.push(BatchEntry {
                    name,
                    outcome: result.map(|_| dest).map_err(|e| e.to_string()),
                });
            }
            output::print_batch_output(&entries);
        }
        Command::Types { config } => {
            output::print_types_output(&config.load()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "file_preview=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool.
///
/// Capped at the number of available cores.
fn init_thread_pool(jobs: usize) {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.clamp(1, cores))
        .build_global()
        .ok();
}

/// Expand directories into the files below them, sorted by path.
///
/// Each file comes with its path relative to the directory it was found in;
/// a file named directly on the command line is relative to its parent.
fn collect_files(paths: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .map(|e| {
                        let relative = e.path().strip_prefix(path).unwrap_or(e.path()).to_path_buf();
                        (e.into_path(), relative)
                    }),
            );
        } else {
            let relative = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
            files.push((path.clone(), relative));
        }
    }
    files
}

/// Page location under `--out-dir` for every input: its relative path plus
/// `.html`. Names that would still collide get their batch index as a prefix.
fn page_paths(inputs: &[(PathBuf, PathBuf)]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .enumerate()
        .map(|(i, (_, relative))| {
            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut page = relative.with_file_name(format!("{name}.html"));
            if !taken.insert(page.clone()) {
                page = relative.with_file_name(format!("{:0>3}-{name}.html", i + 1));
                taken.insert(page.clone());
            }
            page
        })
        .collect()
}
