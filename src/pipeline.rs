use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::efd::Roll;
use crate::exif::MetadataWriter;
use crate::export::{TranslatedFrame, assemble};

/// Image extensions exiftool can write metadata into.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "tif", "tiff", "png", "webp", "heic", "heif", "dng",
];

/// The result of exporting one frame into one image.
#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub frame_number: Option<u16>,
    /// Tags that were (or in a dry run, would be) written.
    pub tags: TranslatedFrame,
    pub written: bool,
    pub backup_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ExportResult {
    fn failed(path: &Path, frame_number: Option<u16>, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            frame_number,
            tags: TranslatedFrame::default(),
            written: false,
            backup_path: None,
            error: Some(error),
        }
    }
}

/// Collect supported image files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks) and their contents sorted by path.
///
/// # Example
///
/// ```rust,no_run
/// use efd_exif::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("scan_01.jpg"),   // single file
///     PathBuf::from("./roll_12/"),    // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && is_supported_image(p))
                .collect();
            found.sort();
            images.extend(found);
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

/// Check if a file has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Frame number from the trailing digits of a file stem
/// (`IMG_0012.jpg` → 12, `roll3-07.tif` → 7).
pub fn infer_frame_number(path: &Path) -> Option<u16> {
    let stem = path.file_stem()?.to_str()?;
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Create a backup of the original file.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path).context("Failed to create backup")?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Translate frame `frame_number` of `roll` and write it into `target`.
///
/// Lookup and translation errors are returned before the target is touched.
pub fn export_image(
    roll: &Roll,
    frame_number: u16,
    target: &Path,
    writer: &dyn MetadataWriter,
    config: &Config,
) -> Result<ExportResult> {
    let frame = roll.frame(frame_number)?;
    let tags = assemble(frame, config.validation.strict)
        .with_context(|| format!("Failed to translate frame {frame_number}"))?;

    let mut result = ExportResult {
        path: target.to_path_buf(),
        frame_number: Some(frame_number),
        tags,
        written: false,
        backup_path: None,
        error: None,
    };

    if config.output.dry_run {
        log::debug!(
            "Dry run: {} tag(s) for {}",
            result.tags.len(),
            target.display()
        );
        return Ok(result);
    }

    if config.output.backup_originals {
        result.backup_path = Some(backup_file(target)?);
    }

    writer
        .write(target, &result.tags)
        .with_context(|| format!("{} could not write {}", writer.name(), target.display()))?;
    result.written = true;
    log::info!(
        "Frame {frame_number} → {} ({} tags)",
        target.display(),
        result.tags.len()
    );

    Ok(result)
}

/// Export a batch of images, one result per image.
///
/// With `frame_override` every image receives that frame; otherwise each
/// image's frame number is taken from its file name. Failures are recorded
/// on the result and do not stop the batch.
pub fn export_images(
    roll: &Roll,
    images: &[PathBuf],
    frame_override: Option<u16>,
    writer: &dyn MetadataWriter,
    config: &Config,
) -> Vec<ExportResult> {
    images
        .iter()
        .map(|path| {
            let Some(frame_number) = frame_override.or_else(|| infer_frame_number(path)) else {
                return ExportResult::failed(
                    path,
                    None,
                    "No frame number given and none found in the file name".to_string(),
                );
            };
            export_image(roll, frame_number, path, writer, config).unwrap_or_else(|e| {
                ExportResult::failed(path, Some(frame_number), format!("{e:#}"))
            })
        })
        .collect()
}
