use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use efd_exif::config::Config;
use efd_exif::efd::Roll;
use efd_exif::exif::{self, ExifToolWriter};
use efd_exif::translate::{DateKind, calendar};
use efd_exif::{export, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "efd-exif",
    version,
    about = "Copy exposure data recorded by a film camera data back (EFD files) into scanned images"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config.json and exit
    Init,

    /// Print the roll metadata and a summary of every frame
    Info {
        /// EFD file to read
        efd: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write frame data into scanned images
    Export {
        /// EFD file to read
        #[arg(long, value_name = "EFD")]
        efd: PathBuf,

        /// Frame to export into every image (default: taken from each file name)
        #[arg(long, value_name = "N")]
        frame: Option<u16>,

        /// Leave out values with unknown codes instead of failing
        #[arg(long)]
        lenient: bool,

        /// Preview changes without writing to files
        #[arg(long)]
        dry_run: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Image files or directories
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Display the exposure EXIF already present in images
    Show {
        /// Image files or directories
        #[arg(value_name = "IMAGE", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Decode the thumbnails referenced by an EFD file and save them as PNG
    Thumbnails {
        /// EFD file to read
        efd: PathBuf,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if matches!(cli.command, Command::Init) {
        Config::default()
    } else {
        Config::load(cli.config.as_deref())?
    };
    init_logging(cli.verbose, config.output.log_file.as_deref())?;

    match cli.command {
        Command::Init => {
            let path = cli.config.as_deref();
            config.save(path)?;
            let save_path = match path {
                Some(p) => p.to_path_buf(),
                None => Config::config_path()?,
            };
            println!("Default config written to {}", save_path.display());
            Ok(())
        }
        Command::Info { efd, json } => info(&efd, json),
        Command::Export {
            efd,
            frame,
            lenient,
            dry_run,
            json,
            paths,
        } => {
            let mut config = config;
            if lenient {
                config.validation.strict = false;
            }
            if dry_run {
                config.output.dry_run = true;
            }
            export_cmd(&efd, frame, &paths, json, &config)
        }
        Command::Show { paths } => {
            let images = pipeline::collect_images(&paths);
            if images.is_empty() {
                anyhow::bail!("No supported image files found in the specified paths.");
            }
            for image_path in &images {
                print_full_exif(image_path)?;
            }
            Ok(())
        }
        Command::Thumbnails { efd, out } => thumbnails(&efd, &out),
    }
}

/// Set up env_logger, writing to `log_file` when one is configured.
fn init_logging(verbose: bool, log_file: Option<&str>) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));
    builder.format_timestamp(None);

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn info(efd: &Path, json: bool) -> Result<()> {
    let roll = Roll::open(efd)?;
    let meta = &roll.metadata;

    if json {
        let frames: Vec<serde_json::Value> = roll
            .frames
            .iter()
            .map(|f| match export::assemble(f, false) {
                Ok(tags) => serde_json::json!({
                    "frame_number": f.frame_number,
                    "tags": tags,
                }),
                Err(e) => serde_json::json!({
                    "frame_number": f.frame_number,
                    "error": e.to_string(),
                }),
            })
            .collect();
        let out = serde_json::json!({
            "roll": meta,
            "thumbnails": roll.thumbnails,
            "frames": frames,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{BOLD}Roll:{RESET} {}", efd.display());
    println!("{BOLD}── Roll ──────────────────────────────────────────{RESET}");
    print_row("Title", &meta.title);
    print_row("Remarks", &meta.remarks);
    print_row("Frames", &meta.frame_count.to_string());
    print_row("DX ISO", &meta.iso_dx.to_string());
    print_row(
        "Film loaded",
        &calendar(&meta.film_loaded_date, DateKind::FilmLoaded)
            .unwrap_or_else(|e| format!("{DIM}{e}{RESET}")),
    );
    print_row(
        "Contact sheet",
        &format!("{} first row, {} per row", meta.first_row, meta.per_row),
    );
    print_row("Thumbnails", &roll.thumbnails.len().to_string());

    println!("{BOLD}── Frames ────────────────────────────────────────{RESET}");
    for frame in &roll.frames {
        let tag = format!("#{}", frame.frame_number);
        match export::assemble(frame, false) {
            Ok(tags) => {
                let summary: Vec<String> = [
                    tags.get("FNumber").map(|v| format!("f/{v}")),
                    tags.get("ExposureTime").map(|v| format!("{v}s")),
                    tags.get("ISO").map(|v| format!("ISO {v}")),
                    tags.get("FocalLength").map(|v| format!("{v}mm")),
                    tags.get("DateTimeOriginal").map(str::to_string),
                ]
                .into_iter()
                .flatten()
                .collect();
                print_row(&tag, &summary.join("  "));
            }
            Err(e) => print_skipped(&tag, &e.to_string()),
        }
    }
    println!();

    Ok(())
}

fn export_cmd(
    efd: &Path,
    frame: Option<u16>,
    paths: &[PathBuf],
    json: bool,
    config: &Config,
) -> Result<()> {
    let roll = Roll::open(efd)?;

    let images = pipeline::collect_images(paths);
    if images.is_empty() {
        anyhow::bail!("No supported image files found in the specified paths.");
    }

    log::info!(
        "Roll '{}': {} frame(s), {} image(s) to process",
        roll.metadata.title,
        roll.frames.len(),
        images.len()
    );
    if config.output.dry_run {
        log::info!("DRY RUN: no files will be modified");
    }
    if !config.validation.strict {
        log::info!("Lenient mode: values with unknown codes are left out");
    }

    let writer = ExifToolWriter::new(&config.exiftool.path, config.exiftool.extra_args.clone());
    let results = pipeline::export_images(&roll, &images, frame, &writer, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            if let Some(ref err) = result.error {
                log::error!("{}: {err}", result.path.display());
            } else if config.output.dry_run {
                print_export_preview(result, config);
            }
        }
    }

    let total = results.len();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    log::info!(
        "Done: {} succeeded, {failed} failed out of {total} images",
        total - failed
    );
    if failed > 0 {
        anyhow::bail!("{failed} of {total} image(s) failed");
    }

    Ok(())
}

fn thumbnails(efd: &Path, out: &Path) -> Result<()> {
    let mut roll = Roll::open(efd)?;
    let base_dir = efd.parent().unwrap_or(Path::new("."));
    let loaded = roll.load_thumbnails(base_dir);
    log::info!(
        "Loaded {loaded} of {} thumbnail(s) from {}",
        roll.thumbnails.len(),
        base_dir.display()
    );

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    for thumb in &roll.thumbnails {
        if let Some(ref bitmap) = thumb.bitmap {
            let path = out.join(format!("thumb_{:03}.png", thumb.index));
            bitmap
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            log::debug!("Saved {}", path.display());
        }
    }

    println!("Saved {loaded} thumbnail(s) to {}", out.display());
    Ok(())
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Max value width before wrapping.
const VAL_WIDTH: usize = 60;

/// Indent for continuation lines (tag column width + " : " = 25 chars + 2 leading spaces).
const INDENT: &str = "                           ";

/// Print the tags a dry run would write, next to what the image already has.
fn print_export_preview(result: &pipeline::ExportResult, config: &Config) {
    println!();
    println!("{BOLD}File:{RESET} {}", result.path.display());
    if let Some(n) = result.frame_number {
        println!("{BOLD}Frame:{RESET} {n}");
    }

    if let Ok(existing) = exif::read_exif(&result.path) {
        if !existing.is_empty() {
            println!("{BOLD}── Existing ──────────────────────────────────────{RESET}");
            for (tag, val) in existing.rows() {
                print_row(tag, val);
            }
        }
    }

    println!("{BOLD}── To be written ─────────────────────────────────{RESET}");
    for (tag, val) in result.tags.iter() {
        print_new(tag, val);
    }

    if log::log_enabled!(log::Level::Debug) {
        let args = exif::exiftool_args(&result.path, &result.tags, &config.exiftool.extra_args);
        log::debug!("exiftool arguments:\n{}", args.join("\n"));
    }
    println!();
}

/// Print full EXIF metadata for a file.
fn print_full_exif(path: &Path) -> Result<()> {
    let data = exif::read_exif(path)?;

    println!();
    println!("{BOLD}File:{RESET} {}", path.display());
    if data.is_empty() {
        println!("  {DIM}(no exposure EXIF){RESET}");
    } else {
        for (tag, val) in data.rows() {
            print_row(tag, val);
        }
    }
    println!();

    Ok(())
}

/// Print a new value row (green with *).
fn print_new(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            if lines.len() == 1 {
                println!("  {GREEN}{tag_col} : {line} *{RESET}");
            } else {
                println!("  {GREEN}{tag_col} : {line}{RESET}");
            }
        } else if i == lines.len() - 1 {
            println!("  {GREEN}{INDENT}{line} *{RESET}");
        } else {
            println!("  {GREEN}{INDENT}{line}{RESET}");
        }
    }
}

/// Print a skipped row (dimmed).
fn print_skipped(tag: &str, reason: &str) {
    let tag_col = format!("{:<22}", tag);
    println!("  {DIM}{tag_col} : {reason}{RESET}");
}

/// Print a single row in the display table.
fn print_row(tag: &str, val: &str) {
    let tag_col = format!("{:<22}", tag);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {tag_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_arguments() {
        let cli = Cli::parse_from([
            "efd-exif", "export", "--efd", "roll.efd", "--frame", "3", "--lenient", "a.jpg", "scans/",
        ]);
        match cli.command {
            Command::Export {
                efd,
                frame,
                lenient,
                dry_run,
                paths,
                ..
            } => {
                assert_eq!(efd, PathBuf::from("roll.efd"));
                assert_eq!(frame, Some(3));
                assert!(lenient);
                assert!(!dry_run);
                assert_eq!(paths.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn export_requires_paths() {
        assert!(Cli::try_parse_from(["efd-exif", "export", "--efd", "roll.efd"]).is_err());
    }

    #[test]
    fn wrap_text_breaks_on_words() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
