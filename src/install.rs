//! Install-path probe.
//!
//! Finds the Steam library that holds the game, so that deploy targets and
//! the activation list can be found without configuration. The result is
//! cached in `.run/.steam` under the working directory.
//!
//! Lookup order:
//! 1. The cached path, if the cache file exists
//! 2. Every library `path` listed in a `libraryfolders.vdf` next to a
//!    well-known Steam root
//! 3. The well-known Steam roots themselves

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::defaults;
use crate::error::{Error, Result};

/// Steam app id of the game; its workshop content lives under this id.
pub const APP_ID: &str = "294100";

const GAME_FOLDER: &str = "RimWorld";

/// Probes the filesystem for the game's Steam library.
#[derive(Debug, Clone)]
pub struct InstallProbe {
    cache_file: PathBuf,
    roots: Vec<PathBuf>,
}

impl InstallProbe {
    pub fn new(cache_file: &Path) -> Self {
        Self {
            cache_file: cache_file.to_path_buf(),
            roots: well_known_roots(),
        }
    }

    /// Replaces the well-known Steam roots.
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// The cached library, or a freshly discovered one, which is then cached.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(cached) = self.cached() {
            log::debug!("Using cached Steam library {}", cached.display());
            return Some(cached);
        }

        let found = self.discover()?;
        if let Err(e) = self.store(&found) {
            log::warn!("Could not cache Steam library path: {}", e);
        }
        Some(found)
    }

    /// Searches without consulting or updating the cache.
    pub fn discover(&self) -> Option<PathBuf> {
        for root in &self.roots {
            for vdf in vdf_candidates(root) {
                let Ok(content) = fs::read_to_string(&vdf) else {
                    continue;
                };
                let libraries = match library_paths(&content) {
                    Ok(libraries) => libraries,
                    Err(e) => {
                        log::warn!("Could not read {}: {}", vdf.display(), e);
                        continue;
                    }
                };
                if let Some(library) = libraries.into_iter().find(|l| has_game(l)) {
                    return Some(library);
                }
            }
        }

        self.roots.iter().find(|root| has_game(root)).cloned()
    }

    fn cached(&self) -> Option<PathBuf> {
        let content = fs::read_to_string(&self.cache_file).ok()?;
        let path = content.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    fn store(&self, library: &Path) -> Result<()> {
        if let Some(parent) = self.cache_file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::filesystem("create directory", parent, e))?;
        }
        fs::write(&self.cache_file, library.to_string_lossy().as_bytes())
            .map_err(|e| Error::filesystem("write", &self.cache_file, e))
    }
}

/// Locate the game's Steam library using the default cache file.
pub fn locate() -> Option<PathBuf> {
    InstallProbe::new(Path::new(defaults::INSTALL_CACHE_FILE)).locate()
}

/// The `path` values of a `libraryfolders.vdf` document, in order.
pub fn library_paths(vdf: &str) -> Result<Vec<PathBuf>> {
    let pattern = Regex::new(r#"(?i)"path"\s+"((?:[^"\\]|\\.)*)""#).map_err(Error::Regex)?;
    Ok(pattern
        .captures_iter(vdf)
        .map(|captures| PathBuf::from(captures[1].replace("\\\\", "\\")))
        .collect())
}

/// Game install directory inside a Steam library.
pub fn game_dir(library: &Path) -> PathBuf {
    library.join("steamapps").join("common").join(GAME_FOLDER)
}

/// Workshop content directory inside a Steam library.
pub fn workshop_dir(library: &Path) -> PathBuf {
    library.join("steamapps").join("workshop").join("content").join(APP_ID)
}

/// Whether `library` holds an installed copy of the game.
pub fn has_game(library: &Path) -> bool {
    game_dir(library)
        .join("Data")
        .join("Core")
        .join("About")
        .join("About.xml")
        .is_file()
}

fn vdf_candidates(root: &Path) -> [PathBuf; 2] {
    [
        root.join("steamapps").join("libraryfolders.vdf"),
        root.join("config").join("libraryfolders.vdf"),
    ]
}

fn well_known_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if cfg!(windows) {
        roots.push(PathBuf::from(r"C:\Program Files (x86)\Steam"));
        roots.push(PathBuf::from(r"D:\SteamLibrary"));
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".steam").join("steam"));
    }
    if let Some(data) = dirs::data_local_dir() {
        roots.push(data.join("Steam"));
    }
    if let Some(data) = dirs::data_dir() {
        let steam = data.join("Steam");
        if !roots.contains(&steam) {
            roots.push(steam);
        }
    }
    roots
}
