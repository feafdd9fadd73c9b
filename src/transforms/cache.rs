//! Persistent substitution-table cache.
//!
//! Every parameter tuple of a byte-local family induces a 256-byte
//! translation table, and many tuples across families induce the same
//! table (`Add 128` and `XOR 80` are the classic pair). The cache
//! deduplicates them: the build phase groups tuples by table and persists
//! one row per distinct table, and the run phase streams the rows back as
//! opaque table-lookup transforms.
//!
//! Schema:
//!
//! ```sql
//! CREATE TABLE translations (
//!     translation_id INTEGER PRIMARY KEY UNIQUE NOT NULL,
//!     translation    BLOB(256),
//!     algsstr        TEXT)
//! ```
//!
//! `algsstr` joins the shortnames of every transform that produced the
//! table with `"_-_"`.

use super::{Family, Transform};
use crate::error::{LockeError, Result};
use crate::types::Direction;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Separator between shortnames in the `algsstr` column.
const LABEL_SEPARATOR: &str = "_-_";

/// Number of rows fetched per batch when streaming the store.
const FETCH_BATCH: usize = 1000;

/// A translation table loaded from the cache, with the shortnames of the
/// transforms that produce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CachedTable {
    /// The 256-entry decode table.
    pub table: [u8; 256],
    /// `"_-_"`-joined shortnames of the equivalent transforms.
    pub label: String,
}

/// Group every byte-local level-1 parameter tuple by the decode table it
/// induces.
///
/// The returned groups map each distinct table to the shortnames that
/// produce it, in enumeration order.
pub fn table_groups(families: &[Family]) -> Vec<([u8; 256], Vec<String>)> {
    let mut order: Vec<[u8; 256]> = Vec::new();
    let mut groups: HashMap<[u8; 256], Vec<String>> = HashMap::new();
    for family in families {
        if !family.is_byte_local() || family.level() != 1 {
            continue;
        }
        for params in family.iterate() {
            let transform = Transform::new(*family, params);
            let Some(table) = transform.byte_table(Direction::Decode) else {
                continue;
            };
            let entry = groups.entry(table).or_insert_with(|| {
                order.push(table);
                Vec::new()
            });
            entry.push(transform.shortname());
        }
    }
    order
        .into_iter()
        .map(|t| {
            let names = groups.remove(&t).unwrap_or_default();
            (t, names)
        })
        .collect()
}

/// Recreate the database at `path` from the given families.
///
/// Returns the number of distinct tables persisted.
pub fn generate(path: &Path, families: &[Family]) -> Result<usize> {
    let groups = table_groups(families);
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE translations (
            translation_id INTEGER PRIMARY KEY UNIQUE NOT NULL,
            translation    BLOB(256),
            algsstr        TEXT);",
    )?;
    let tx = conn.transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO translations (translation, algsstr) VALUES (?1, ?2)")?;
        for (table, names) in &groups {
            stmt.execute(rusqlite::params![
                &table[..],
                names.join(LABEL_SEPARATOR)
            ])?;
        }
    }
    tx.commit()?;
    tracing::info!(
        tables = groups.len(),
        path = %path.display(),
        "generated substitution-table cache"
    );
    Ok(groups.len())
}

/// Stream every stored translation table.
///
/// Rows are fetched in batches; insertion order carries no meaning.
pub fn load(path: &Path) -> Result<Vec<Arc<CachedTable>>> {
    let conn = Connection::open(path)?;
    let mut stmt =
        conn.prepare("SELECT translation_id, translation, algsstr FROM translations")?;
    let mut rows = stmt.query([])?;
    let mut tables = Vec::with_capacity(FETCH_BATCH);
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let blob: Vec<u8> = row.get(1)?;
        let label: String = row.get(2)?;
        let table: [u8; 256] = blob
            .try_into()
            .map_err(|b: Vec<u8>| LockeError::CorruptCache { id, len: b.len() })?;
        tables.push(Arc::new(CachedTable { table, label }));
    }
    tracing::debug!(tables = tables.len(), "loaded substitution-table cache");
    Ok(tables)
}

/// The duplicate groups among the byte-local families: every table shared
/// by more than one transform, as shortname lists.
pub fn duplicate_groups(families: &[Family]) -> Vec<Vec<String>> {
    table_groups(families)
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(_, names)| names)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::ALL_FAMILIES;

    #[test]
    fn test_groups_exclude_identity_table() {
        // XOR enumerates k >= 1 and ROL r <= 7, so no tuple induces the
        // identity table.
        let identity: [u8; 256] = std::array::from_fn(|i| i as u8);
        for (table, names) in table_groups(ALL_FAMILIES) {
            assert_ne!(table, identity, "identity induced by {names:?}");
        }
    }

    #[test]
    fn test_add_128_collides_with_xor_80() {
        let groups = table_groups(ALL_FAMILIES);
        let group = groups
            .iter()
            .find(|(_, names)| names.iter().any(|n| n == "xor_80"))
            .expect("xor_80 group");
        assert!(group.1.iter().any(|n| n == "add_128"));
    }

    #[test]
    fn test_duplicate_groups_nonempty() {
        let dups = duplicate_groups(ALL_FAMILIES);
        assert!(!dups.is_empty());
        for group in &dups {
            assert!(group.len() > 1);
        }
    }

    #[test]
    fn test_generate_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("transforms.db");
        let count = generate(&db, &[Family::Xor, Family::Add]).unwrap();
        // 255 XOR tables + 255 Add tables, one collision (0x80/128)
        assert_eq!(count, 509);

        let tables = load(&db).unwrap();
        assert_eq!(tables.len(), count);
        let merged = tables
            .iter()
            .find(|t| t.label.contains(LABEL_SEPARATOR))
            .expect("merged label");
        assert!(merged.label.contains("xor_80"));
        assert!(merged.label.contains("add_128"));
    }

    #[test]
    fn test_generate_skips_stringwise_and_level2() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("transforms.db");
        // Identity is stringwise, XorAdd is level 2: nothing to persist
        // from either, but ROL contributes its seven tables.
        let count = generate(&db, &[Family::Identity, Family::XorAdd, Family::Rol]).unwrap();
        assert_eq!(count, 7);
    }
}
