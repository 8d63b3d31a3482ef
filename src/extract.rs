use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::config::{CONTENT_PREVIEW_CHARS, SUPPORTED_EXTENSION};

type LoaderFn = fn(&Path) -> Result<String>;

fn loader_for_extension(extension: &str) -> Option<LoaderFn> {
    if extension.eq_ignore_ascii_case(SUPPORTED_EXTENSION) {
        Some(load_with_pdf_extract)
    } else {
        None
    }
}

/// Extract a bounded text preview from a document.
///
/// Primary backend failures fall through to the per-page lopdf reader;
/// when both fail the preview is empty and recovery proceeds on filename
/// evidence alone. Unsupported extensions short-circuit to empty text.
pub fn extract_preview(path: &Path) -> String {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let Some(loader) = loader_for_extension(extension) else {
        warn!(
            path = %path.display(),
            extension = extension,
            "unsupported document type, skipping extraction"
        );
        return String::new();
    };

    match loader(path) {
        Ok(text) => preview_of(&text),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "primary text extraction failed, trying fallback reader"
            );
            match load_per_page_with_lopdf(path) {
                Ok(text) => preview_of(&text),
                Err(err) => {
                    error!(
                        path = %path.display(),
                        error = %err,
                        "fallback text extraction failed"
                    );
                    String::new()
                }
            }
        }
    }
}

fn preview_of(text: &str) -> String {
    text.chars().take(CONTENT_PREVIEW_CHARS).collect()
}

fn load_with_pdf_extract(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .with_context(|| format!("pdf-extract could not read {}", path.display()))
}

fn load_per_page_with_lopdf(path: &Path) -> Result<String> {
    let document = lopdf::Document::load(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut blocks = Vec::with_capacity(page_numbers.len());
    for page_number in page_numbers {
        let text = document.extract_text(&[page_number]).with_context(|| {
            format!("failed to extract page {page_number} of {}", path.display())
        })?;
        blocks.push(text);
    }

    Ok(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn preview_is_bounded_by_char_count_not_bytes() {
        let long = "深".repeat(CONTENT_PREVIEW_CHARS * 2);
        let preview = preview_of(&long);
        assert_eq!(preview.chars().count(), CONTENT_PREVIEW_CHARS);
    }

    #[test]
    fn short_text_passes_through_untouched() {
        assert_eq!(preview_of("short text"), "short text");
    }

    #[test]
    fn unsupported_extension_yields_empty_preview() {
        assert_eq!(extract_preview(&PathBuf::from("notes.txt")), "");
        assert_eq!(extract_preview(&PathBuf::from("no_extension")), "");
    }

    #[test]
    fn unreadable_pdf_yields_empty_preview_after_both_backends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really a pdf").unwrap();

        assert_eq!(extract_preview(&path), "");
    }
}
