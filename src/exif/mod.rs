//! Reading and writing image metadata.
//!
//! - [`read_exif`]: read the exposure EXIF already present in an image
//! - [`MetadataWriter`]: embed a [`TranslatedFrame`](crate::export::TranslatedFrame)
//!   into an image; [`ExifToolWriter`] is the exiftool-backed implementation

mod reader;
mod writer;

pub use reader::{ExifData, read_exif};
pub use writer::{
    CUSTOM_TAGS, EXIFTOOL_CONFIG, ExifToolWriter, MetadataWriter, RAW_VALUE_TAGS, exiftool_args,
};
