//! # efd-exif
//!
//! Decoder for EFD files, the per-roll exposure logs written by a film SLR
//! data back, and an exporter that copies each frame's settings into the
//! EXIF/XMP of the matching scanned image.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full decode → translate → write flow:
//!
//! ```rust,no_run
//! use efd_exif::config::Config;
//! use efd_exif::efd::Roll;
//! use efd_exif::exif::ExifToolWriter;
//! use efd_exif::pipeline::{collect_images, export_images};
//! use std::path::{Path, PathBuf};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let roll = Roll::open(Path::new("roll_012.efd"))?;
//!
//!     // Frame numbers are taken from the file names (scan_07.jpg → frame 7)
//!     let images = collect_images(&[PathBuf::from("./scans")]);
//!     let writer = ExifToolWriter::new(&config.exiftool.path, config.exiftool.extra_args.clone());
//!
//!     for result in export_images(&roll, &images, None, &writer, &config) {
//!         match result.error {
//!             Some(err) => eprintln!("{}: {err}", result.path.display()),
//!             None => println!("{} ← frame {:?}", result.path.display(), result.frame_number),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! ```rust,no_run
//! use efd_exif::efd::Roll;
//! use efd_exif::export::assemble;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let roll = Roll::open(Path::new("roll_012.efd"))?;
//!     let frame = roll.frame(7)?;
//!
//!     // strict: unknown camera codes are errors
//!     let tags = assemble(frame, true)?;
//!     for (tag, value) in tags.iter() {
//!         println!("{tag} = {value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`efd`]: record framing, fixed-layout decoders, the [`Roll`] aggregate
//! - [`translate`]: camera code → EXIF value tables
//! - [`export`]: per-frame tag assembly
//! - [`exif`]: exiftool writer and EXIF read-back
//! - [`config`]: configuration types and loading/saving
//! - [`pipeline`]: image collection, frame matching and batch export
//! - [`error`]: decode and translation errors

pub mod config;
pub mod efd;
pub mod error;
pub mod exif;
pub mod export;
pub mod pipeline;
pub mod translate;

pub use efd::Roll;
pub use error::EfdError;
pub use export::{TranslatedFrame, assemble};
