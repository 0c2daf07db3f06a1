use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    domain::Roster,
    errors::StorageError,
};

use super::{
    format::{LoadReport, RosterFileIn, RosterFileOut},
    Result, StorageBackend,
};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Rosters stored as pretty JSON files under `<base>/rosters`, with rolling
/// copies of the previous version kept under `<base>/backups/<name>`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    rosters_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        let rosters_dir = PathResolver::roster_dir_in(&root);
        let backups_dir = PathResolver::backup_dir_in(&root);
        for dir in [&root, &rosters_dir, &backups_dir] {
            ensure_dir(dir)?;
        }
        Ok(Self {
            root,
            rosters_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn roster_path(&self, name: &str) -> PathBuf {
        self.rosters_dir
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.roster_path(name).exists()
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Copies the current file for `name` aside before it is overwritten.
    fn rotate(&self, name: &str, current: &Path) -> Result<()> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let stem = format!(
            "{}_{}",
            canonical_name(name),
            Local::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        // Saves within the same second get `-2`, `-3`, ... appended.
        let mut target = dir.join(format!("{}.{}", stem, FILE_EXTENSION));
        let mut seq = 1;
        while target.exists() {
            seq += 1;
            target = dir.join(format!("{}-{}.{}", stem, seq, FILE_EXTENSION));
        }
        fs::copy(current, &target)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        for stale in self.list_backups(name)?.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(name, stale)) {
                tracing::warn!(backup = %stale, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, roster: &Roster) -> Result<PathBuf> {
        let path = self.roster_path(&roster.name);
        if path.exists() {
            self.rotate(&roster.name, &path)?;
        }
        save_roster_to_path(roster, &path)?;
        tracing::debug!(path = %path.display(), "roster saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<LoadReport> {
        let path = self.roster_path(name);
        if !path.exists() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        load_roster_from_path(&path, name)
    }

    fn list_rosters(&self) -> Result<Vec<String>> {
        let mut names = json_file_names(&self.rosters_dir)?
            .into_iter()
            .filter_map(|file| {
                file.strip_suffix(&format!(".{}", FILE_EXTENSION))
                    .map(str::to_string)
            })
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let mut entries = json_file_names(&self.backup_dir(name))?;
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<LoadReport> {
        let source = self.backup_path(name, backup_name);
        if !source.exists() {
            return Err(StorageError::NotFound(format!(
                "backup `{}` of `{}`",
                backup_name, name
            )));
        }
        // Read first: rotating may prune `source` when it is the oldest backup.
        let data = fs::read_to_string(&source)?;
        let target = self.roster_path(name);
        if target.exists() {
            self.rotate(name, &target)?;
        }
        let tmp = tmp_path(&target);
        write_file(&tmp, &data)?;
        fs::rename(&tmp, &target)?;
        load_roster_from_path(&target, name)
    }
}

pub fn save_roster_to_path(roster: &Roster, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&RosterFileOut::from_roster(roster))?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_roster_from_path(path: &Path, fallback_name: &str) -> Result<LoadReport> {
    let data = fs::read_to_string(path)?;
    let file: RosterFileIn = serde_json::from_str(&data)?;
    let report = file.into_report(fallback_name);
    for warning in &report.warnings {
        tracing::warn!(path = %path.display(), "{warning}");
    }
    Ok(report)
}

fn json_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
            continue;
        }
        if let Some(file) = path.file_name().and_then(|file| file.to_str()) {
            names.push(file.to_string());
        }
    }
    Ok(names)
}

/// File-system safe form of a roster name: lowercase ASCII alphanumerics with
/// everything else collapsed to `_`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::new();
    for ch in name.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "roster".into()
    } else {
        trimmed.to_string()
    }
}

/// Orders backup files: `name_YYYYMMDD_HHMM[SS][-N].json`.
fn parse_backup_timestamp(file: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = file.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let mut parts = stem.rsplitn(3, '_');
    let last = parts.next()?;
    let (time, seq) = match last.split_once('-') {
        Some((time, seq)) => (time, seq.parse().ok()?),
        None => (last, 1),
    };
    let date = parts.next()?;
    let format = match time.len() {
        4 => "%Y%m%d%H%M",
        6 => "%Y%m%d%H%M%S",
        _ => return None,
    };
    if date.len() != 8 {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), format)
        .ok()
        .map(|naive| (DateTime::from_naive_utc_and_offset(naive, Utc), seq))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
