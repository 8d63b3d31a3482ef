pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const API_BASE_URL: &str = "https://api.deepseek.com";
pub const API_MODEL: &str = "deepseek-coder";

pub const SUPPORTED_EXTENSION: &str = "pdf";
pub const CONTENT_PREVIEW_CHARS: usize = 250;
pub const ELLIPSIS_MARKER: &str = "...";

/// Splits a degraded stem into prefix / marker / suffix / trailing tag.
pub const TITLE_SEGMENT_PATTERN: &str = r"^(.*?)(\.\.\.)(.*?)(_.*)$";

/// Stems made of Chinese, Latin, digit, and whitespace characters only.
pub const CLEAN_TITLE_PATTERN: &str = r"^[\u{4e00}-\u{9fa5}A-Za-z0-9\s]+$";

/// Trailing underscore-delimited author/id tag.
pub const AUTHOR_SUFFIX_PATTERN: &str = r"_[^_]+$";

/// Full filenames with a numeric prefix are archived verbatim.
pub const ALREADY_VALID_PATTERN: &str = r"^\d+_.*\.pdf$";

pub const ILLEGAL_FILENAME_PATTERN: &str = r#"[<>:"/\\|?*]"#;

pub const DEFAULT_OUTPUT_DIRNAME: &str = "修复输出";
pub const FAILED_LIST_FILENAME: &str = "failed_files.txt";
