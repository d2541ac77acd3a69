//! Named scopes under one scope directory.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use scopr_common::config::{Config, DEFAULT_EXPANSION_LIMIT, DEFAULT_SCOPE};
use scopr_common::{Result, ScopeError};
use tracing::debug;

use crate::scope::Scope;
use crate::store::{self, ScopeFile};

#[derive(Debug)]
pub struct ScopeRegistry {
    dir: PathBuf,
    scopes: BTreeMap<String, Scope>,
    expansion_limit: u128,
}

impl ScopeRegistry {
    /// Opens (creating if needed) a scope directory and loads every scope in it.
    ///
    /// When the directory holds no scope yet, the default scope is created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_limit(dir, DEFAULT_EXPANSION_LIMIT)
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::open_with_limit(&cfg.scope_dir, cfg.expansion_limit)
    }

    pub fn open_with_limit(dir: impl Into<PathBuf>, expansion_limit: u128) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| ScopeError::ScopeDir {
            path: dir.clone(),
            source,
        })?;

        let mut registry = Self {
            dir,
            scopes: BTreeMap::new(),
            expansion_limit,
        };
        registry.load()?;

        if registry.scopes.is_empty() {
            registry.scope_mut(DEFAULT_SCOPE)?;
        }
        Ok(registry)
    }

    fn load(&mut self) -> Result<()> {
        let entries = fs::read_dir(&self.dir).map_err(|source| ScopeError::ScopeDir {
            path: self.dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScopeError::ScopeDir {
                path: self.dir.clone(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let scope =
                store::load_scope(&entry.path())?.with_expansion_limit(self.expansion_limit);
            debug!(scope = %name, "loaded scope");
            self.scopes.insert(name, scope);
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.get(name)
    }

    /// Returns the named scope, creating its directory and an empty scope on first use.
    pub fn scope_mut(&mut self, name: &str) -> Result<&mut Scope> {
        match self.scopes.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.dir.join(name);
                fs::create_dir_all(&path).map_err(|source| ScopeError::ScopeDir { path, source })?;
                debug!(scope = %name, "created scope");
                Ok(entry.insert(Scope::new().with_expansion_limit(self.expansion_limit)))
            }
        }
    }

    pub fn file_path(&self, name: &str, file: ScopeFile) -> PathBuf {
        file.path_in(&self.dir.join(name))
    }

    /// Saves every scope. Each file is written independently; failures are
    /// logged and returned rather than stopping the rest of the save.
    pub fn save(&self) -> Vec<ScopeError> {
        self.scopes
            .iter()
            .flat_map(|(name, scope)| store::save_scope(scope, &self.dir.join(name)))
            .collect()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
