//! Configuration for bplusdb.
//!
//! Compile-time constants for the index, plus [`AppConfig`] which the
//! `bplusdb` binary loads from environment variables.
//!
//! # Environment Variables
//!
//! - `BPLUSDB_CSV_PATH`: Input file with department rows (default: `yok_atlas.csv`)
//! - `BPLUSDB_ORDER`: Tree order, at least 3 (default: `5`)
//! - `BPLUSDB_HASH`: Key derivation function, `djb2` or `crc32` (default: `djb2`)

use std::path::PathBuf;

use crate::common::{Error, Result};

/// Default branching factor.
///
/// With order 5 every node holds at most 4 keys, so splits show up after
/// only a handful of inserts. Small orders keep the tree shape easy to
/// inspect with the printers.
pub const DEFAULT_ORDER: usize = 5;

/// Smallest order for which both split rules leave every node non-empty.
pub const MIN_ORDER: usize = 3;

/// Maximum stored length (in bytes) of university and department names.
///
/// Longer names are truncated on a char boundary when rows are parsed.
pub const MAX_NAME_LEN: usize = 99;

/// Which key derivation function the catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Djb2,
    Crc32,
}

impl std::str::FromStr for HashKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "djb2" => Ok(HashKind::Djb2),
            "crc32" => Ok(HashKind::Crc32),
            other => Err(format!("'{other}' is not one of djb2, crc32")),
        }
    }
}

/// Runtime configuration for the interactive binary.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, `order >= MIN_ORDER`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the comma separated input file.
    pub csv_path: PathBuf,
    /// Order of the B+Tree built over the rows.
    pub order: usize,
    /// Hash used to turn department names into tree keys.
    pub hash: HashKind,
}

impl AppConfig {
    /// Default input file.
    pub const DEFAULT_CSV_PATH: &'static str = "yok_atlas.csv";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `BPLUSDB_ORDER` or `BPLUSDB_HASH` is set
    /// to an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env()` delegates here; tests pass a closure over a map so they
    /// don't have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let csv_path = lookup("BPLUSDB_CSV_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CSV_PATH));

        let order = match lookup("BPLUSDB_ORDER") {
            Some(value) => {
                let order = value.trim().parse::<usize>().map_err(|_| Error::Config {
                    name: "BPLUSDB_ORDER".to_string(),
                    message: format!("'{value}' is not a number"),
                })?;
                if order < MIN_ORDER {
                    return Err(Error::Config {
                        name: "BPLUSDB_ORDER".to_string(),
                        message: format!("{order} is below the minimum order {MIN_ORDER}"),
                    });
                }
                order
            }
            None => DEFAULT_ORDER,
        };

        let hash = match lookup("BPLUSDB_HASH") {
            Some(value) => value.trim().parse::<HashKind>().map_err(|message| Error::Config {
                name: "BPLUSDB_HASH".to_string(),
                message,
            })?,
            None => HashKind::Djb2,
        };

        Ok(Self {
            csv_path,
            order,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_order_is_valid() {
        assert!(DEFAULT_ORDER >= MIN_ORDER);
        assert_eq!(DEFAULT_ORDER, 5);
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.csv_path, PathBuf::from("yok_atlas.csv"));
        assert_eq!(config.order, DEFAULT_ORDER);
        assert_eq!(config.hash, HashKind::Djb2);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BPLUSDB_CSV_PATH", "/tmp/rows.csv"),
            ("BPLUSDB_ORDER", "7"),
            ("BPLUSDB_HASH", "CRC32"),
        ]))
        .unwrap();
        assert_eq!(config.csv_path, PathBuf::from("/tmp/rows.csv"));
        assert_eq!(config.order, 7);
        assert_eq!(config.hash, HashKind::Crc32);
    }

    #[test]
    fn test_rejects_bad_order() {
        let err = AppConfig::from_lookup(lookup_from(&[("BPLUSDB_ORDER", "two")])).unwrap_err();
        assert!(matches!(err, Error::Config { ref name, .. } if name == "BPLUSDB_ORDER"));

        let err = AppConfig::from_lookup(lookup_from(&[("BPLUSDB_ORDER", "2")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_rejects_unknown_hash() {
        let err = AppConfig::from_lookup(lookup_from(&[("BPLUSDB_HASH", "md5")])).unwrap_err();
        assert!(matches!(err, Error::Config { ref name, .. } if name == "BPLUSDB_HASH"));
    }
}
