use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::export::TranslatedFrame;

/// Tags exiftool has no built-in writable definition for. They go into the
/// user-defined `XMP-efd` namespace declared by [`EXIFTOOL_CONFIG`].
pub const CUSTOM_TAGS: &[&str] = &[
    "FlashMode",
    "ShootingMode",
    "AFMode",
    "FilmAdvanceMode",
    "MultipleExposure",
    "FlashExposureComp",
    "FocusPoints",
    "FrameNumber",
    "BatteryLoadedDate",
    "FilmLoadedDate",
];

/// Tags whose exported values are already raw EXIF numbers (APEX value,
/// flash bitfield). exiftool must store them without print conversion.
pub const RAW_VALUE_TAGS: &[&str] = &["MaxApertureValue", "Flash"];

/// exiftool config declaring the `XMP-efd` namespace.
pub const EXIFTOOL_CONFIG: &str = r#"%Image::ExifTool::UserDefined = (
    'Image::ExifTool::XMP::Main' => {
        efd => {
            SubDirectory => {
                TagTable => 'Image::ExifTool::UserDefined::efd',
            },
        },
    },
);

%Image::ExifTool::UserDefined::efd = (
    GROUPS => { 0 => 'XMP', 1 => 'XMP-efd', 2 => 'Camera' },
    NAMESPACE => { 'efd' => 'http://ns.efd-exif.org/efd/1.0/' },
    WRITABLE => 'string',
    FlashMode => { },
    ShootingMode => { },
    AFMode => { },
    FilmAdvanceMode => { },
    MultipleExposure => { },
    FlashExposureComp => { },
    FocusPoints => { },
    FrameNumber => { },
    BatteryLoadedDate => { },
    FilmLoadedDate => { },
);

1;
"#;

/// Something that can embed translated tags into an image file.
///
/// A failed write leaves the target in an unknown state; callers do not retry.
pub trait MetadataWriter {
    /// Display name (e.g. "exiftool").
    fn name(&self) -> &str;
    /// Write every tag in `tags` into `target`.
    fn write(&self, target: &Path, tags: &TranslatedFrame) -> Result<()>;
}

/// Qualified exiftool tag name for an exported tag.
fn exiftool_tag(tag: &str) -> String {
    if CUSTOM_TAGS.contains(&tag) {
        format!("XMP-efd:{tag}")
    } else {
        tag.to_string()
    }
}

/// Build the exiftool argument file: one argument per line.
///
/// Tags in [`RAW_VALUE_TAGS`] are written as `-TAG#=VALUE`. Values cannot
/// contain line breaks in an argument file, so they are
/// flattened to spaces.
pub fn exiftool_args(target: &Path, tags: &TranslatedFrame, extra_args: &[String]) -> Vec<String> {
    let mut args = vec!["-overwrite_original".to_string()];
    args.extend(extra_args.iter().cloned());
    for (tag, value) in tags.iter() {
        let value = value.replace(['\r', '\n'], " ");
        let raw = if RAW_VALUE_TAGS.contains(&tag) { "#" } else { "" };
        args.push(format!("-{}{raw}={value}", exiftool_tag(tag)));
    }
    args.push(target.display().to_string());
    args
}

/// Writes metadata by running exiftool.
///
/// The argument list is streamed into the child's stdin (`-@ -`) from a
/// background thread while this thread waits for the child to finish.
#[derive(Debug, Clone)]
pub struct ExifToolWriter {
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl ExifToolWriter {
    pub fn new(executable: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            extra_args,
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl MetadataWriter for ExifToolWriter {
    fn name(&self) -> &str {
        "exiftool"
    }

    fn write(&self, target: &Path, tags: &TranslatedFrame) -> Result<()> {
        let mut config = tempfile::Builder::new()
            .prefix("efd-exif-")
            .suffix(".config")
            .tempfile()
            .context("Failed to create exiftool config file")?;
        config
            .write_all(EXIFTOOL_CONFIG.as_bytes())
            .context("Failed to write exiftool config file")?;

        let argfile = exiftool_args(target, tags, &self.extra_args).join("\n") + "\n";

        let mut child = Command::new(&self.executable)
            .arg("-config")
            .arg(config.path())
            .args(["-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.executable.display()))?;

        let mut stdin = child.stdin.take().context("exiftool stdin unavailable")?;
        let feeder = std::thread::spawn(move || stdin.write_all(argfile.as_bytes()));

        let output = child
            .wait_with_output()
            .context("Failed to wait for exiftool")?;
        match feeder.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::debug!("exiftool closed stdin early: {e}"),
            Err(_) => bail!("exiftool argument writer panicked"),
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("exiftool: {}", stdout.trim());
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "exiftool failed for {} ({}): {}",
                target.display(),
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efd::FramePayload;
    use crate::export::assemble;

    fn sample_tags() -> TranslatedFrame {
        let mut p = FramePayload::new(4);
        p.u8(0x02C, 11).remarks(b"two\nlines");
        assemble(&p.decode(), true).unwrap()
    }

    #[test]
    fn args_start_with_overwrite_and_end_with_target() {
        let args = exiftool_args(Path::new("/scans/img_0004.jpg"), &sample_tags(), &[]);
        assert_eq!(args.first().map(String::as_str), Some("-overwrite_original"));
        assert_eq!(args.last().map(String::as_str), Some("/scans/img_0004.jpg"));
    }

    #[test]
    fn custom_tags_use_xmp_namespace() {
        let args = exiftool_args(Path::new("a.jpg"), &sample_tags(), &[]);
        assert!(args.contains(&"-FNumber=2.8".to_string()));
        assert!(args.contains(&"-XMP-efd:FlashMode=TTL autoflash".to_string()));
        assert!(args.contains(&"-XMP-efd:FrameNumber=4".to_string()));
    }

    #[test]
    fn values_are_flattened_to_one_line() {
        let args = exiftool_args(Path::new("a.jpg"), &sample_tags(), &[]);
        assert!(args.contains(&"-description=two lines".to_string()));
    }

    #[test]
    fn extra_args_follow_overwrite_flag() {
        let extra = vec!["-P".to_string()];
        let args = exiftool_args(Path::new("a.jpg"), &sample_tags(), &extra);
        assert_eq!(args[1], "-P");
    }

    #[test]
    fn config_declares_every_custom_tag() {
        for tag in CUSTOM_TAGS {
            assert!(EXIFTOOL_CONFIG.contains(&format!("{tag} => {{ }}")), "{tag}");
        }
    }

    #[test]
    fn missing_executable_is_an_error() {
        let writer = ExifToolWriter::new("/nonexistent/exiftool", Vec::new());
        let err = writer.write(Path::new("a.jpg"), &sample_tags()).unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }

    #[test]
    fn raw_numeric_tags_skip_print_conversion() {
        let args = exiftool_args(Path::new("a.jpg"), &sample_tags(), &[]);
        assert!(args.contains(&"-MaxApertureValue#=1.0".to_string()));
        assert!(args.contains(&"-Flash#=25".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-Flash=")));
        // Display-text tags keep print conversion
        assert!(args.contains(&"-ExposureTime=1/250".to_string()));
    }

    #[cfg(unix)]
    mod fake_exiftool {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn install(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("exiftool");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn streams_argfile_and_config() {
            let dir = TempDir::new().unwrap();
            let exe = install(
                dir.path(),
                r#"d=$(dirname "$0")
[ "$1" = "-config" ] || exit 3
cp "$2" "$d/config.pl"
[ "$3 $4" = "-@ -" ] || exit 4
cat > "$d/args.txt"
echo "    1 image files updated""#,
            );
            let extra = vec!["-P".to_string()];
            let writer = ExifToolWriter::new(&exe, extra.clone());
            let target = dir.path().join("scan_04.jpg");
            let tags = sample_tags();

            writer.write(&target, &tags).unwrap();

            let argfile = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
            assert_eq!(argfile, exiftool_args(&target, &tags, &extra).join("\n") + "\n");
            let config = std::fs::read_to_string(dir.path().join("config.pl")).unwrap();
            assert_eq!(config, EXIFTOOL_CONFIG);
        }

        #[test]
        fn non_zero_exit_reports_stderr() {
            let dir = TempDir::new().unwrap();
            let exe = install(
                dir.path(),
                r#"cat > /dev/null
echo "Error: File not found - scan_04.jpg" >&2
exit 1"#,
            );
            let writer = ExifToolWriter::new(&exe, Vec::new());
            let err = writer
                .write(&dir.path().join("scan_04.jpg"), &sample_tags())
                .unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("exiftool failed"), "{msg}");
            assert!(msg.contains("File not found - scan_04.jpg"), "{msg}");
        }
    }
}
