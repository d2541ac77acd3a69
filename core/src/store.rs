//! Flat-file persistence: four newline-delimited files per scope directory.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use scopr_common::{Result, ScopeError};
use tracing::debug;

use crate::scope::Scope;

/// One of the files a scope is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeFile {
    Ipv4,
    Ipv6,
    Domains,
    Exclude,
}

impl ScopeFile {
    pub const ALL: [ScopeFile; 4] = [
        ScopeFile::Ipv4,
        ScopeFile::Ipv6,
        ScopeFile::Domains,
        ScopeFile::Exclude,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ScopeFile::Ipv4 => "ipv4.txt",
            ScopeFile::Ipv6 => "ipv6.txt",
            ScopeFile::Domains => "domains.txt",
            ScopeFile::Exclude => "exclude.txt",
        }
    }

    pub fn path_in(self, scope_dir: &Path) -> PathBuf {
        scope_dir.join(self.file_name())
    }
}

fn persistence_error(path: &Path) -> impl FnOnce(io::Error) -> ScopeError + '_ {
    move |source| ScopeError::Persistence {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads one entry per line. A missing file is an empty set.
pub fn read_entries(path: &Path) -> Result<BTreeSet<String>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(persistence_error(path)(e)),
    };

    let mut entries = BTreeSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(persistence_error(path))?;
        let entry = line.trim();
        if !entry.is_empty() {
            entries.insert(entry.to_string());
        }
    }
    Ok(entries)
}

/// Writes entries sorted, one per line, through a temp file and a rename.
pub fn write_entries(path: &Path, entries: &BTreeSet<String>) -> Result<()> {
    let tmp_path = path.with_extension("txt.tmp");
    {
        let file = fs::File::create(&tmp_path).map_err(persistence_error(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writeln!(writer, "{entry}").map_err(persistence_error(&tmp_path))?;
        }
        writer.flush().map_err(persistence_error(&tmp_path))?;
    }

    fs::rename(&tmp_path, path).map_err(persistence_error(path))
}

pub fn load_scope(scope_dir: &Path) -> Result<Scope> {
    Ok(Scope::from_entries(
        read_entries(&ScopeFile::Ipv4.path_in(scope_dir))?,
        read_entries(&ScopeFile::Ipv6.path_in(scope_dir))?,
        read_entries(&ScopeFile::Domains.path_in(scope_dir))?,
        read_entries(&ScopeFile::Exclude.path_in(scope_dir))?,
    ))
}

/// Writes all four files. A failing file does not stop the others; the
/// failures are returned.
pub fn save_scope(scope: &Scope, scope_dir: &Path) -> Vec<ScopeError> {
    ScopeFile::ALL
        .into_iter()
        .filter_map(|file| {
            let path = file.path_in(scope_dir);
            write_entries(&path, scope.entries(file))
                .inspect_err(|e| debug!("error saving {file:?}: {e}"))
                .err()
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let entries = read_entries(&dir.path().join("nope.txt")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_read_collapses_duplicates_and_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("domains.txt");
        fs::write(&path, "b.tld\n\na.tld\nb.tld\r\n  \n").unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.into_iter().collect::<Vec<_>>(), vec!["a.tld", "b.tld"]);
    }

    #[test]
    fn test_write_is_sorted_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ipv4.txt");
        let entries: BTreeSet<String> = ["10.0.0.2", "10.0.0.0/24", "10.0.0.10"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        write_entries(&path, &entries).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "10.0.0.0/24\n10.0.0.10\n10.0.0.2\n"
        );
        assert!(!path.with_extension("txt.tmp").exists());
    }

    #[test]
    fn test_write_empty_set_is_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exclude.txt");

        write_entries(&path, &BTreeSet::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_scope_round_trip() {
        let dir = tempdir().unwrap();
        let mut scope = Scope::new();
        scope.add(false, ["10.0.0.0/24", "10.1.1.1", "2001:db8::/64", "example.com"]);
        scope.add_exclude(["admin.example.com", "10.0.0.5"]);

        assert!(save_scope(&scope, dir.path()).is_empty());
        let loaded = load_scope(dir.path()).unwrap();

        for file in ScopeFile::ALL {
            assert_eq!(loaded.entries(file), scope.entries(file), "{file:?}");
        }
    }

    #[test]
    fn test_save_failures_are_independent() {
        let dir = tempdir().unwrap();
        // a directory where the IPv4 temp file should go blocks that one write
        fs::create_dir(dir.path().join("ipv4.txt.tmp")).unwrap();

        let mut scope = Scope::new();
        scope.add(false, ["10.0.0.1", "example.com"]);

        let failures = save_scope(&scope, dir.path());
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ScopeError::Persistence { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("domains.txt")).unwrap(),
            "example.com\n"
        );
    }
}
