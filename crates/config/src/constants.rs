//! Built-in defaults for docaudit
//!
//! Every value here can be overridden from the config file, the environment
//! or CLI flags.

/// Remote container holding the raw documents
pub const DEFAULT_BASE_URL: &str = "https://statelegislativedata.blob.core.windows.net/raw-data/";

/// Extension appended to every identifier
pub const DEFAULT_SUFFIX: &str = ".pdf";

pub const DEFAULT_OUTPUT_DIR: &str = "missing_pdfs_output";

/// Header line that loaders skip when it is the first line of a file
pub const DEFAULT_ID_COLUMN: &str = "act_num";

pub const DEFAULT_INPUT_EXTENSIONS: &[&str] = &["txt", "csv", "lst"];

pub const DEFAULT_CONCURRENCY: usize = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;
