//! Font file utilities
//!
//! Enumerates font files inside extracted archives and reads basic metadata
//! from them with `read-fonts`.

use crate::{FontpickError, FontpickResult};
use read_fonts::tables::name::NameId;
use read_fonts::{FileRef, FontRef, TableProvider};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if file has a valid font extension
pub fn is_valid_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            matches!(
                ext.to_lowercase().as_str(),
                "ttf" | "otf" | "ttc" | "otc" | "woff" | "woff2"
            )
        })
        .unwrap_or(false)
}

/// Collect every font file below `root`, sorted.
///
/// Walks with an explicit stack so deep archive trees cannot exhaust the
/// call stack.
pub fn font_files_under(root: &Path) -> FontpickResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    if !root.is_dir() {
        return Ok(found);
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_valid_font_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Names read from a font file's name table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFaceSummary {
    pub path: PathBuf,
    pub family_name: String,
    pub style: String,
    /// Number of faces (more than one for collections)
    pub face_count: u32,
}

/// Parse `path` and read family/style of its first face
pub fn inspect_font_file(path: &Path) -> FontpickResult<FontFaceSummary> {
    if !is_valid_font_extension(path) {
        return Err(FontpickError::InvalidFormat(format!(
            "Invalid font extension: {}",
            path.display()
        )));
    }

    let data = fs::read(path)?;
    let file_ref = FileRef::new(&data)
        .map_err(|e| FontpickError::InvalidFormat(format!("Invalid font structure: {e}")))?;

    let (font, face_count) = match file_ref {
        FileRef::Font(font) => (font, 1),
        FileRef::Collection(collection) => {
            let font = collection.get(0).map_err(|e| {
                FontpickError::InvalidFormat(format!("Cannot read collection: {e}"))
            })?;
            (font, collection.len())
        }
    };

    let (family_name, style) = read_names(&font);
    Ok(FontFaceSummary {
        path: path.to_path_buf(),
        family_name,
        style,
        face_count,
    })
}

// Name IDs: 1=family, 2=subfamily
fn read_names(font: &FontRef) -> (String, String) {
    let Ok(name_table) = font.name() else {
        return ("Unknown".to_string(), "Regular".to_string());
    };

    let find_name = |id: u16| -> Option<String> {
        name_table
            .name_record()
            .iter()
            .find(|r| r.name_id() == NameId::new(id))
            .and_then(|r| r.string(name_table.string_data()).ok())
            .map(|s| s.to_string())
    };

    (
        find_name(1).unwrap_or_else(|| "Unknown".to_string()),
        find_name(2).unwrap_or_else(|| "Regular".to_string()),
    )
}
