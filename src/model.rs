use crate::config::SUPPORTED_EXTENSION;

/// A directory entry admitted into the pipeline.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub raw_name: String,
    pub stem: String,
    pub extension: String,
}

impl FileRecord {
    /// Returns `None` unless the name carries the supported document
    /// extension (case-insensitive).
    pub fn from_name(raw_name: &str) -> Option<Self> {
        let (stem, extension) = raw_name.rsplit_once('.')?;
        if stem.is_empty() || !extension.eq_ignore_ascii_case(SUPPORTED_EXTENSION) {
            return None;
        }

        Some(Self {
            raw_name: raw_name.to_string(),
            stem: stem.to_string(),
            extension: extension.to_string(),
        })
    }
}

/// Structural segments of a degraded stem. When the structural pattern
/// does not match, the whole stem lands in `prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSegments {
    pub prefix: String,
    pub marker: String,
    pub suffix: String,
    pub trailing_tag: String,
}

/// Outcome of the naming decision for one file on the rewrite path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDecision {
    /// Cleaning produced the name the file already has.
    Skip,
    /// The file should be copied out under this filename.
    RenameReady(String),
    /// No usable title could be produced.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_pdf_case_insensitively() {
        let record = FileRecord::from_name("Paper.PDF").unwrap();
        assert_eq!(record.stem, "Paper");
        assert_eq!(record.extension, "PDF");
        assert_eq!(record.raw_name, "Paper.PDF");
    }

    #[test]
    fn from_name_rejects_other_extensions_and_bare_names() {
        assert!(FileRecord::from_name("notes.txt").is_none());
        assert!(FileRecord::from_name("README").is_none());
        assert!(FileRecord::from_name(".pdf").is_none());
    }
}
