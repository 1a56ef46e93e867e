use fontpick_core::{ArchiveExtractor, FontpickError, FontpickResult};
use std::fs::{self, File};
use std::path::Path;
use zip::ZipArchive;

/// Extracts `.zip` release archives
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> FontpickResult<()> {
        let font = archive
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("archive")
            .to_string();
        let failed = |reason: String| FontpickError::ExtractFailed {
            font: font.clone(),
            reason,
        };

        let file = File::open(archive).map_err(|e| failed(e.to_string()))?;
        let mut zip = ZipArchive::new(file).map_err(|e| failed(e.to_string()))?;

        fs::create_dir_all(dest).map_err(|e| failed(e.to_string()))?;
        // Entries escaping `dest` are rejected by the zip crate
        zip.extract(dest).map_err(|e| failed(e.to_string()))?;

        log::debug!(
            "Extracted {} entries from {} into {}",
            zip.len(),
            archive.display(),
            dest.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("Hack.zip");
        write_zip(
            &archive,
            &[
                ("HackNerdFont-Regular.ttf", b"regular"),
                ("mono/HackNerdFontMono-Bold.ttf", b"bold"),
                ("LICENSE.md", b"MIT"),
            ],
        );

        let dest = temp.path().join("fonts").join("Hack");
        ZipExtractor.extract(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("HackNerdFont-Regular.ttf")).unwrap(), b"regular");
        assert_eq!(
            fs::read(dest.join("mono").join("HackNerdFontMono-Bold.ttf")).unwrap(),
            b"bold"
        );
        assert!(dest.join("LICENSE.md").exists());
    }

    #[test]
    fn corrupt_archive_is_extract_failure() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("Broken.zip");
        fs::write(&archive, b"not a zip").unwrap();

        let err = ZipExtractor
            .extract(&archive, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, FontpickError::ExtractFailed { font, .. } if font == "Broken"));
    }

    #[test]
    fn missing_archive_is_extract_failure() {
        let temp = TempDir::new().unwrap();
        let err = ZipExtractor
            .extract(&temp.path().join("Gone.zip"), &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, FontpickError::ExtractFailed { .. }));
    }
}
