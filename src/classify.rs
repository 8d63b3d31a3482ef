use anyhow::{Context, Result};
use regex::Regex;

use crate::config::{
    ALREADY_VALID_PATTERN, AUTHOR_SUFFIX_PATTERN, CLEAN_TITLE_PATTERN, ELLIPSIS_MARKER,
};
use crate::model::FileRecord;

/// Closed set of classification outcomes for one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Numeric-prefix archive names are moved verbatim.
    AlreadyValid,
    /// The stem is already a clean title; nothing to rewrite.
    CleanTitle(String),
    /// The stem carries the ellipsis marker; regex repair is unsafe.
    NeedsRecovery,
    /// Trailing author tag stripped from the stem.
    StrippedSuffix(String),
}

pub struct Classifier {
    already_valid: Regex,
    clean_title: Regex,
    author_suffix: Regex,
}

impl Classifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            already_valid: Regex::new(ALREADY_VALID_PATTERN)
                .context("failed to compile already-valid filename regex")?,
            clean_title: Regex::new(CLEAN_TITLE_PATTERN)
                .context("failed to compile clean title regex")?,
            author_suffix: Regex::new(AUTHOR_SUFFIX_PATTERN)
                .context("failed to compile author suffix regex")?,
        })
    }

    pub fn classify(&self, record: &FileRecord) -> Classification {
        if self.already_valid.is_match(&record.raw_name) {
            return Classification::AlreadyValid;
        }

        if self.clean_title.is_match(&record.stem) {
            return Classification::CleanTitle(record.stem.clone());
        }

        if record.stem.contains(ELLIPSIS_MARKER) {
            return Classification::NeedsRecovery;
        }

        Classification::StrippedSuffix(
            self.author_suffix.replace(&record.stem, "").into_owned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        FileRecord::from_name(name).unwrap()
    }

    #[test]
    fn numeric_prefix_names_are_already_valid() {
        let classifier = Classifier::new().unwrap();
        assert_eq!(
            classifier.classify(&record("01_已整理.pdf")),
            Classification::AlreadyValid
        );
        assert_eq!(
            classifier.classify(&record("2024_some paper.pdf")),
            Classification::AlreadyValid
        );
    }

    #[test]
    fn clean_stems_come_back_unchanged() {
        let classifier = Classifier::new().unwrap();
        for stem in ["深度学习基础", "Attention Is All You Need", "图神经网络2024"] {
            let name = format!("{stem}.pdf");
            assert_eq!(
                classifier.classify(&record(&name)),
                Classification::CleanTitle(stem.to_string())
            );
        }
    }

    #[test]
    fn ellipsis_marker_forces_recovery_regardless_of_surroundings() {
        let classifier = Classifier::new().unwrap();
        for name in ["张三...导论_李四.pdf", "...开头.pdf", "结尾....pdf"] {
            assert_eq!(classifier.classify(&record(name)), Classification::NeedsRecovery);
        }
    }

    #[test]
    fn trailing_tag_is_stripped_from_everything_else() {
        let classifier = Classifier::new().unwrap();
        assert_eq!(
            classifier.classify(&record("ABC_XYZ123.pdf")),
            Classification::StrippedSuffix("ABC".to_string())
        );
        assert_eq!(
            classifier.classify(&record("题目（节选）_王五.pdf")),
            Classification::StrippedSuffix("题目（节选）".to_string())
        );
    }

    #[test]
    fn stem_without_tag_survives_suffix_stripping_unchanged() {
        let classifier = Classifier::new().unwrap();
        assert_eq!(
            classifier.classify(&record("题目（节选）.pdf")),
            Classification::StrippedSuffix("题目（节选）".to_string())
        );
    }
}
