//! Filtered extraction of the `template/` subtree of an archive

use super::fetcher::TemplateArchive;
use crate::error::{CreateError, Result};
use regex::Regex;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use zip::ZipArchive;

/// Leading components dropped from entry paths (`<repo-dir>/template/...`)
pub const STRIP_COMPONENTS: usize = 2;

/// Path segment an entry must contain to be extracted
const TEMPLATE_SEGMENT: &str = "/template/";

static MEDIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(woff2?|ttf|eot|jpe?g|ico|png|gif|webp|mp4|mov|ogg|webm)(\?.*)?$")
        .expect("media pattern is valid")
});

/// Fonts, images, audio and video never get placeholder substitution
pub fn is_media(path: &str) -> bool {
    MEDIA.is_match(path)
}

/// Files written during extraction whose text is scanned for placeholders
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedFileSet {
    /// Number of archive entries that passed the `template/` filter
    pub matched_entries: usize,
    /// Absolute paths of extracted non-media regular files, in archive order
    pub eligible: Vec<PathBuf>,
}

/// Drop the first `strip` components of a slash-separated entry path
fn strip_components(path: &Path, strip: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path.components().skip(strip).collect();
    if stripped.as_os_str().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Extract every entry under a `template/` segment into `target`
///
/// Creates `target/src` up front. Fails with `NoTemplateDirectory` when not a
/// single entry matched the filter.
pub fn extract_template(
    archive: &TemplateArchive,
    target: &Path,
    strip: usize,
) -> Result<ExtractedFileSet> {
    let src_dir = target.join("src");
    std::fs::create_dir_all(&src_dir)
        .map_err(|e| CreateError::io("create directory", &src_dir, e))?;

    let reference = archive.reference.to_string();
    let archive_err = |source| CreateError::Archive {
        reference: reference.clone(),
        source,
    };

    let mut zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice())).map_err(archive_err)?;
    let mut extracted = ExtractedFileSet::default();

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(archive_err)?;

        if !entry.name().contains(TEMPLATE_SEGMENT) {
            continue;
        }
        extracted.matched_entries += 1;

        // Entries that would escape the destination are dropped
        let Some(enclosed) = entry.enclosed_name() else {
            continue;
        };
        let Some(relative) = strip_components(&enclosed, strip) else {
            continue;
        };
        let dest = target.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest)
                .map_err(|e| CreateError::io("create directory", &dest, e))?;
            continue;
        }
        if !entry.is_file() {
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CreateError::io("create directory", parent, e))?;
        }

        // Streamed; the size in the entry header is not trusted
        let mut file =
            std::fs::File::create(&dest).map_err(|e| CreateError::io("create", &dest, e))?;
        std::io::copy(&mut entry, &mut file)
            .map_err(|e| CreateError::io("extract archive entry to", &dest, e))?;

        if !is_media(&dest.to_string_lossy()) {
            extracted.eligible.push(dest);
        }
    }

    if extracted.matched_entries == 0 {
        return Err(CreateError::NoTemplateDirectory(reference));
    }

    Ok(extracted)
}
