// Flat-file cache of star dates.
// One `{org}_{repo}.csv` per repository, one `YYYY-MM-DD` per line.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies one cache entry: an (organization, repository) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    org: String,
    repo: String,
}

impl CacheKey {
    pub fn new(org: &str, repo: &str) -> Result<Self, InvalidCacheKeyError> {
        validate_part(org)?;
        validate_part(repo)?;
        if org.contains('_') {
            return Err(InvalidCacheKeyError {
                part: org.to_string(),
            });
        }

        Ok(Self {
            org: org.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Organizations may not contain `_`, so the first `_` is the split point.
    pub fn file_name(&self) -> String {
        format!("{}_{}.csv", self.org, self.repo)
    }
}

fn validate_part(part: &str) -> Result<(), InvalidCacheKeyError> {
    let bad = part.is_empty()
        || part == "."
        || part == ".."
        || part.contains(['/', '\\', '\0']);

    if bad {
        return Err(InvalidCacheKeyError {
            part: part.to_string(),
        });
    }
    Ok(())
}

/// Directory-backed store of repository star records.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Reads the record for `key`. A missing file is an empty record.
    pub fn load(&self, key: &CacheKey) -> Result<Vec<NaiveDate>, LoadStarDatesError> {
        let path = self.path_for(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No cache record at {}", path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(LoadStarDatesError::Read { path, source }),
        };

        let mut dates = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let date = NaiveDate::parse_from_str(line, DATE_FORMAT).map_err(|source| {
                LoadStarDatesError::MalformedDate {
                    path: path.clone(),
                    line: idx + 1,
                    text: line.to_string(),
                    source,
                }
            })?;
            dates.push(date);
        }

        debug!("Loaded {} star dates from {}", dates.len(), path.display());
        Ok(dates)
    }

    /// Replaces the record for `key` with `dates`.
    ///
    /// Writes a temp file next to the target and renames it into place, so a
    /// failed write never clobbers the previous record.
    pub fn save(&self, key: &CacheKey, dates: &[NaiveDate]) -> Result<(), SaveStarDatesError> {
        let path = self.path_for(key);

        fs::create_dir_all(&self.root).map_err(|source| SaveStarDatesError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let mut text = String::with_capacity(dates.len() * 11);
        for date in dates {
            text.push_str(&date.format(DATE_FORMAT).to_string());
            text.push('\n');
        }

        let temp_path = path.with_extension("tmp");
        write_synced(&temp_path, text.as_bytes()).map_err(|source| SaveStarDatesError::Write {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|source| SaveStarDatesError::Rename {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} star dates to {}", dates.len(), path.display());
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Cutoff for incremental fetches: the most recent cached date.
pub fn latest(dates: &[NaiveDate]) -> Option<NaiveDate> {
    dates.iter().max().copied()
}

#[derive(Debug, Error)]
#[error("Invalid cache key part {part:?}")]
pub struct InvalidCacheKeyError {
    pub part: String,
}

#[derive(Debug, Error)]
pub enum LoadStarDatesError {
    #[error("Read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },

    #[error("MalformedDate {}:{line}: {text:?}: {source}", .path.display())]
    MalformedDate {
        path: PathBuf,
        line: usize,
        text: String,
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum SaveStarDatesError {
    #[error("CreateDir {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Rename {}: {source}", .path.display())]
    Rename {
        path: PathBuf,
        source: io::Error,
    },
}
