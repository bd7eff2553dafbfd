//! Input discovery and identifier loading

use docaudit_errors::{Error, InputError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const NAN_MARKER: &str = "nan";
const COMMENT_PREFIX: char = '#';

/// Header spellings found in exported spreadsheets and the column they mean
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("State", "state"),
    ("Year", "year"),
    ("Title", "name"),
    ("links", "link"),
    ("Link to full text", "link"),
];

/// One identifier list selected for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// File name as shown in reports
    pub name: String,
    /// Two-letter state code taken from the file name, if it has one
    pub state: Option<String>,
}

impl InputFile {
    fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let state = state_code(&name);
        Self { path, name, state }
    }

    /// Prefix for report file names: the state code, or the file stem
    pub fn label(&self) -> String {
        if let Some(state) = &self.state {
            return state.clone();
        }
        self.path
            .file_stem()
            .map_or_else(|| self.name.clone(), |s| s.to_string_lossy().into_owned())
    }
}

/// Identifiers read from one input, with loader statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierList {
    /// Unique identifiers in first-seen order
    pub identifiers: Vec<String>,
    /// Rows read, excluding a header
    pub total_rows: usize,
    /// Empty, placeholder, comment and malformed rows
    pub blank_rows: usize,
    pub duplicates: usize,
}

/// State code from a file name like `GA_act_nums.txt`
///
/// The prefix before the first `_` is upper-cased and accepted only when it is
/// exactly two ASCII letters.
pub fn state_code(file_name: &str) -> Option<String> {
    let (prefix, _) = file_name.split_once('_')?;
    if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(prefix.to_ascii_uppercase())
    } else {
        None
    }
}

/// Expand files and directories into identifier list files
///
/// Directories are scanned one level deep for files with one of
/// `extensions`; files named explicitly are always taken. The result is
/// sorted by path with duplicates removed.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub async fn discover(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<InputFile>, Error> {
    let mut found = Vec::new();

    for path in paths {
        let metadata = fs::metadata(path)
            .await
            .map_err(|_| InputError::PathNotFound {
                path: path.display().to_string(),
            })?;

        if metadata.is_dir() {
            let mut entries = fs::read_dir(path)
                .await
                .map_err(|e| read_failed(path, &e))?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| read_failed(path, &e))? {
                let entry_path = entry.path();
                let is_file = entry
                    .file_type()
                    .await
                    .map(|t| t.is_file())
                    .unwrap_or(false);
                if is_file && has_extension(&entry_path, extensions) {
                    found.push(entry_path);
                }
            }
        } else {
            found.push(path.clone());
        }
    }

    found.sort();
    found.dedup();
    debug!(files = found.len(), "discovered input files");
    Ok(found.into_iter().map(InputFile::new).collect())
}

/// Keep only files whose state code is in `states`; an empty filter keeps all
pub fn select(files: Vec<InputFile>, states: &[String]) -> Vec<InputFile> {
    if states.is_empty() {
        return files;
    }
    files
        .into_iter()
        .filter(|file| {
            file.state
                .as_ref()
                .is_some_and(|code| states.iter().any(|s| s.eq_ignore_ascii_case(code)))
        })
        .collect()
}

/// Read one identifier list from disk
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8 text.
pub async fn load_identifiers(path: &Path, id_column: &str) -> Result<IdentifierList, Error> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| read_failed(path, &e))?;
    Ok(parse_identifiers(&content, id_column))
}

/// Parse an identifier list
///
/// A first line containing a comma is read as a CSV header and identifiers
/// are taken from the `id_column` field of each record. Anything else is a
/// plain list with one identifier per line, where a first line equal to
/// `id_column` is skipped.
///
/// Values are trimmed; empty values, `nan` placeholders and `#` comments are
/// dropped, and repeated identifiers keep only their first occurrence.
pub fn parse_identifiers(content: &str, id_column: &str) -> IdentifierList {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.contains(',') {
        parse_table(content, id_column)
    } else {
        parse_lines(content, id_column)
    }
}

fn parse_lines(content: &str, header: &str) -> IdentifierList {
    let mut collector = Collector::default();
    let mut lines = content.lines().peekable();

    if lines
        .peek()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case(header))
    {
        lines.next();
    }

    for line in lines {
        collector.push(line);
    }
    collector.list
}

fn parse_table(content: &str, id_column: &str) -> IdentifierList {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let position = match reader.headers() {
        Ok(headers) => headers
            .iter()
            .position(|name| canonical_column(name).eq_ignore_ascii_case(id_column)),
        Err(e) => {
            warn!(error = %e, "unreadable CSV header");
            None
        }
    };
    let Some(position) = position else {
        warn!(column = id_column, "no identifier column in CSV header");
        return IdentifierList::default();
    };

    let mut collector = Collector::default();
    for record in reader.records() {
        match record {
            Ok(record) => collector.push(record.get(position).unwrap_or_default()),
            Err(e) => {
                debug!(error = %e, "skipping malformed CSV record");
                collector.push("");
            }
        }
    }
    collector.list
}

fn canonical_column(name: &str) -> &str {
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |&(_, column)| column)
}

/// Applies the blank, placeholder and dedup rules to raw values
#[derive(Default)]
struct Collector {
    list: IdentifierList,
    seen: HashSet<String>,
}

impl Collector {
    fn push(&mut self, raw: &str) {
        self.list.total_rows += 1;
        let value = raw.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case(NAN_MARKER)
            || value.starts_with(COMMENT_PREFIX)
        {
            self.list.blank_rows += 1;
            return;
        }
        if self.seen.insert(value.to_string()) {
            self.list.identifiers.push(value.to_string());
        } else {
            self.list.duplicates += 1;
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn read_failed(path: &Path, err: &std::io::Error) -> Error {
    InputError::ReadFailed {
        path: path.display().to_string(),
        message: err.to_string(),
    }
    .into()
}
