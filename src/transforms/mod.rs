//! Transform families and their parameter spaces.
//!
//! A *family* is a parameterized byte-wise algorithm (XOR, add, rotate,
//! or a short composition); a *transform* is a family paired with one
//! concrete parameter tuple. Families split into two kinds: byte-local
//! transforms, expressible as a 256-entry translation table, and
//! stringwise transforms whose output bytes may depend on position or
//! neighbours.
//!
//! Families are registered in the [`ALL_FAMILIES`] table and enumerated
//! lazily through [`Family::iterate`]; selection by name or level happens
//! in [`select_families`].

pub mod byte_local;
pub mod cache;
pub mod stringwise;

use crate::error::{LockeError, Result};
use crate::types::Direction;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use cache::CachedTable;

/// A transform family: a parameterized byte-wise algorithm.
///
/// `TableLookup` is the internal composite family the search driver uses
/// when level-based selection collapses the byte-local families into
/// precomputed translation tables; it is not selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Family {
    /// Return the data unchanged.
    Identity,
    /// Rotate each byte left.
    Rol,
    /// XOR each byte with a key.
    Xor,
    /// Add a key to each byte.
    Add,
    /// XOR then rotate left.
    XorRol,
    /// Add then rotate left.
    AddRol,
    /// Rotate left then add.
    RolAdd,
    /// XOR then add.
    XorAdd,
    /// Add then XOR.
    AddXor,
    /// The fixed Outlook PST substitution table. Disabled by default.
    OutlookPst,
    /// XOR with an incrementing key.
    XorInc,
    /// XOR with a decrementing key.
    XorDec,
    /// Subtract an incrementing key.
    SubInc,
    /// XOR chained with the previous byte.
    XorLChained,
    /// XOR chained with the next byte.
    XorRChained,
    /// XOR with an incrementing key, then rotate left.
    XorIncRol,
    /// XOR each byte with the key and every byte to its right.
    XorRChainedAll,
    /// Apply a precomputed translation table from the cache.
    TableLookup,
}

/// Every selectable built-in family, in registration order.
pub const ALL_FAMILIES: &[Family] = &[
    Family::Identity,
    Family::Rol,
    Family::Xor,
    Family::Add,
    Family::XorRol,
    Family::AddRol,
    Family::RolAdd,
    Family::XorAdd,
    Family::AddXor,
    Family::OutlookPst,
    Family::XorInc,
    Family::XorDec,
    Family::SubInc,
    Family::XorLChained,
    Family::XorRChained,
    Family::XorIncRol,
    Family::XorRChainedAll,
];

impl Family {
    /// The family's complexity level: 1-3, or -1 when disabled.
    pub fn level(self) -> i8 {
        match self {
            Family::Identity
            | Family::Rol
            | Family::Xor
            | Family::Add
            | Family::XorRol
            | Family::AddRol
            | Family::RolAdd
            | Family::TableLookup => 1,
            Family::XorAdd
            | Family::AddXor
            | Family::XorInc
            | Family::XorDec
            | Family::SubInc
            | Family::XorLChained
            | Family::XorRChained => 2,
            Family::XorIncRol | Family::XorRChainedAll => 3,
            Family::OutlookPst => -1,
        }
    }

    /// The identifier used for `-n` selection (case-insensitive,
    /// hyphen/underscore-insensitive).
    pub fn ident(self) -> &'static str {
        match self {
            Family::Identity => "identity",
            Family::Rol => "rol",
            Family::Xor => "xor",
            Family::Add => "add",
            Family::XorRol => "xor_rol",
            Family::AddRol => "add_rol",
            Family::RolAdd => "rol_add",
            Family::XorAdd => "xor_add",
            Family::AddXor => "add_xor",
            Family::OutlookPst => "outlook_pst",
            Family::XorInc => "xor_inc",
            Family::XorDec => "xor_dec",
            Family::SubInc => "sub_inc",
            Family::XorLChained => "xor_lchained",
            Family::XorRChained => "xor_rchained",
            Family::XorIncRol => "xor_inc_rol",
            Family::XorRChainedAll => "xor_rchained_all",
            Family::TableLookup => "all_stage_12",
        }
    }

    /// One-line description for the `transforms` listing.
    pub fn description(self) -> &'static str {
        match self {
            Family::Identity => "Return the data unchanged",
            Family::Rol => "Rotate each byte left by A bits",
            Family::Xor => "XOR each byte with A",
            Family::Add => "Add A to each byte",
            Family::XorRol => "XOR each byte with A then rotate left by B",
            Family::AddRol => "Add A to each byte then rotate left by B",
            Family::RolAdd => "Rotate each byte left by A then add B",
            Family::XorAdd => "XOR each byte with A then add B",
            Family::AddXor => "Add A to each byte then XOR with B",
            Family::OutlookPst => "Use the PST substitution table",
            Family::XorInc => "XOR with byte A and increment after each byte",
            Family::XorDec => "XOR with byte A and decrement after each byte",
            Family::SubInc => "Subtract byte A, incrementing after each byte",
            Family::XorLChained => "XOR with byte A chained with the previous byte",
            Family::XorRChained => "XOR with byte A chained with the next byte",
            Family::XorIncRol => "XOR with byte A, increment after each byte, then rotate",
            Family::XorRChainedAll => "XOR each byte with A and all the bytes to its right",
            Family::TableLookup => "Apply a precomputed translation table",
        }
    }

    /// Human description of the parameter ranges.
    pub fn params_help(self) -> &'static str {
        match self {
            Family::Identity | Family::OutlookPst => "None",
            Family::Rol => "A: 1-7",
            Family::Xor | Family::Add => "A: 1-0xFF",
            Family::XorRol | Family::AddRol => "A: 1-0xFF B: 1-7",
            Family::RolAdd => "A: 1-7 B: 1-0xFF",
            Family::XorAdd | Family::AddXor => "A: 1-0xFF B: 1-0xFF",
            Family::XorInc | Family::XorDec | Family::SubInc => "A: 0-0xFF",
            Family::XorLChained | Family::XorRChained | Family::XorRChainedAll => "A: 0-0xFF",
            Family::XorIncRol => "A: 0-0xFF B: 1-7",
            Family::TableLookup => "cached tables",
        }
    }

    /// Whether the family is expressible as a 256-entry translation table.
    pub fn is_byte_local(self) -> bool {
        matches!(
            self,
            Family::Rol
                | Family::Xor
                | Family::Add
                | Family::XorRol
                | Family::AddRol
                | Family::RolAdd
                | Family::XorAdd
                | Family::AddXor
                | Family::OutlookPst
                | Family::TableLookup
        )
    }

    /// A finite, deterministic, restartable enumeration of every legal
    /// parameter tuple for this family.
    ///
    /// `TableLookup` yields nothing here; its transforms are expanded from
    /// the substitution-table cache by [`expand_families`].
    pub fn iterate(self) -> Box<dyn Iterator<Item = Params> + Send> {
        match self {
            Family::Identity | Family::OutlookPst => Box::new(std::iter::once(Params::Empty)),
            Family::Rol => Box::new((1..8u8).map(Params::Key)),
            Family::Xor | Family::Add => Box::new((1..=255u8).map(Params::Key)),
            Family::XorRol | Family::AddRol => {
                Box::new((1..=255u8).flat_map(|k| (1..8u8).map(move |r| Params::KeyPair(k, r))))
            }
            Family::RolAdd => {
                Box::new((1..8u8).flat_map(|r| (1..=255u8).map(move |k| Params::KeyPair(r, k))))
            }
            Family::XorAdd | Family::AddXor => Box::new(
                (1..=255u8).flat_map(|k1| (1..=255u8).map(move |k2| Params::KeyPair(k1, k2))),
            ),
            Family::XorInc
            | Family::XorDec
            | Family::SubInc
            | Family::XorLChained
            | Family::XorRChained
            | Family::XorRChainedAll => Box::new((0..=255u8).map(Params::Key)),
            Family::XorIncRol => {
                Box::new((0..=255u8).flat_map(|k| (1..8u8).map(move |r| Params::KeyPair(k, r))))
            }
            Family::TableLookup => Box::new(std::iter::empty()),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident())
    }
}

/// A concrete parameter tuple for one family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Params {
    /// No parameters (Identity, OutlookPst).
    Empty,
    /// A single key byte.
    Key(u8),
    /// An ordered pair of key bytes.
    KeyPair(u8, u8),
    /// A cached translation table with its provenance label.
    Table(Arc<CachedTable>),
}

/// A (family, parameter tuple) pair: one point in the search space.
///
/// Transforms are pure. Applying one returns a new buffer of equal
/// length; the input is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transform {
    /// The algorithm family.
    pub family: Family,
    /// The concrete parameter values.
    pub params: Params,
}

impl Transform {
    /// Pair a family with one of its parameter tuples.
    pub fn new(family: Family, params: Params) -> Self {
        Self { family, params }
    }

    /// Build a table-lookup transform from a cached translation table.
    pub fn from_table(table: Arc<CachedTable>) -> Self {
        Self {
            family: Family::TableLookup,
            params: Params::Table(table),
        }
    }

    fn key(&self) -> u8 {
        match self.params {
            Params::Key(k) => k,
            _ => 0,
        }
    }

    fn key_pair(&self) -> (u8, u8) {
        match self.params {
            Params::KeyPair(a, b) => (a, b),
            _ => (0, 0),
        }
    }

    /// Human-readable name, e.g. `"XOR 5A Increment"`.
    pub fn name(&self) -> String {
        match self.family {
            Family::Identity => "Identity".into(),
            Family::Rol => format!("Rot L {}", self.key()),
            Family::Xor => format!("XOR {}", self.key()),
            Family::Add => format!("Add {}", self.key()),
            Family::XorRol => {
                let (k, r) = self.key_pair();
                format!("XOR {k:02X} then L Rol {r}")
            }
            Family::AddRol => {
                let (k, r) = self.key_pair();
                format!("Add {k} then L Rol {r}")
            }
            Family::RolAdd => {
                let (r, k) = self.key_pair();
                format!("L Roll {r} then Add {k}")
            }
            Family::XorAdd => {
                let (k1, k2) = self.key_pair();
                format!("XOR {k1:02X} Add {k2}")
            }
            Family::AddXor => {
                let (k1, k2) = self.key_pair();
                format!("Add {k1} XOR {k2:02X}")
            }
            Family::OutlookPst => "Outlook PST".into(),
            Family::XorInc => format!("XOR {:02X} Increment", self.key()),
            Family::XorDec => format!("XOR {:02X} Decrement", self.key()),
            Family::SubInc => format!("Subtract {:02X} Increment", self.key()),
            Family::XorLChained => format!("XOR {:02X} LChained", self.key()),
            Family::XorRChained => format!("XOR {:02X} RChained", self.key()),
            Family::XorIncRol => {
                let (k, r) = self.key_pair();
                format!("XOR {k:02X} Inc ROL {r:02X}")
            }
            Family::XorRChainedAll => format!("XOR {:02X} RChained All", self.key()),
            Family::TableLookup => match &self.params {
                Params::Table(t) => t.label.clone(),
                _ => "table".into(),
            },
        }
    }

    /// Filesystem-safe identifier, uniquely recoverable from the
    /// parameters; used as the output file suffix.
    pub fn shortname(&self) -> String {
        match self.family {
            Family::Identity => "no_trans".into(),
            Family::Rol => format!("rLeft_{}", self.key()),
            Family::Xor => format!("xor_{:02X}", self.key()),
            Family::Add => format!("add_{}", self.key()),
            Family::XorRol => {
                let (k, r) = self.key_pair();
                format!("xor{k:02X}_lrol{r}")
            }
            Family::AddRol => {
                let (k, r) = self.key_pair();
                format!("add{k}_lrol{r}")
            }
            Family::RolAdd => {
                let (r, k) = self.key_pair();
                format!("lrol{r}_add{k}")
            }
            Family::XorAdd => {
                let (k1, k2) = self.key_pair();
                format!("xor{k1:02X}_add{k2}")
            }
            Family::AddXor => {
                let (k1, k2) = self.key_pair();
                format!("add{k1}_xor{k2:02X}")
            }
            Family::OutlookPst => "outlook_pst".into(),
            Family::XorInc => format!("xor{:02X}_inc", self.key()),
            Family::XorDec => format!("xor{:02X}_dec", self.key()),
            Family::SubInc => format!("sub{:02X}_inc", self.key()),
            Family::XorLChained => format!("xor{:02X}_lchained", self.key()),
            Family::XorRChained => format!("xor{:02X}_rchained", self.key()),
            Family::XorIncRol => {
                let (k, r) = self.key_pair();
                format!("xor{k:02X}_inc_rol{r:02X}")
            }
            Family::XorRChainedAll => format!("xor{:02X}_rchained_all", self.key()),
            Family::TableLookup => match &self.params {
                Params::Table(t) => t.label.clone(),
                _ => "table".into(),
            },
        }
    }

    /// The 256-entry translation table for byte-local transforms, or
    /// `None` for stringwise families.
    pub fn byte_table(&self, direction: Direction) -> Option<[u8; 256]> {
        if !self.family.is_byte_local() {
            return None;
        }
        if let Params::Table(t) = &self.params {
            return match direction {
                Direction::Decode => Some(t.table),
                // cached tables only carry the decode direction
                Direction::Encode => None,
            };
        }
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = self.map_byte(i as u8, direction);
        }
        Some(table)
    }

    fn map_byte(&self, byte: u8, direction: Direction) -> u8 {
        use byte_local as bl;
        match self.family {
            Family::Rol => bl::rol_byte(byte, self.key(), direction),
            Family::Xor => bl::xor_byte(byte, self.key(), direction),
            Family::Add => bl::add_byte(byte, self.key(), direction),
            Family::XorRol => {
                let (k, r) = self.key_pair();
                bl::xor_rol_byte(byte, k, r, direction)
            }
            Family::AddRol => {
                let (k, r) = self.key_pair();
                bl::add_rol_byte(byte, k, r, direction)
            }
            Family::RolAdd => {
                let (r, k) = self.key_pair();
                bl::rol_add_byte(byte, r, k, direction)
            }
            Family::XorAdd => {
                let (k1, k2) = self.key_pair();
                bl::xor_add_byte(byte, k1, k2, direction)
            }
            Family::AddXor => {
                let (k1, k2) = self.key_pair();
                bl::add_xor_byte(byte, k1, k2, direction)
            }
            Family::OutlookPst => bl::pst_byte(byte, direction),
            _ => byte,
        }
    }

    /// Apply the transform to a buffer, returning a new buffer of equal
    /// length.
    pub fn apply(&self, data: &[u8], direction: Direction) -> Vec<u8> {
        use stringwise as sw;
        match self.family {
            Family::Identity => sw::identity(data, direction),
            Family::XorInc => sw::xor_inc(data, self.key(), direction),
            Family::XorDec => sw::xor_dec(data, self.key(), direction),
            Family::SubInc => sw::sub_inc(data, self.key(), direction),
            Family::XorLChained => sw::xor_lchained(data, self.key(), direction),
            Family::XorRChained => sw::xor_rchained(data, self.key(), direction),
            Family::XorIncRol => {
                let (k, r) = self.key_pair();
                sw::xor_inc_rol(data, k, r, direction)
            }
            Family::XorRChainedAll => sw::xor_rchained_all(data, self.key(), direction),
            _ => match self.byte_table(direction) {
                Some(table) => data.iter().map(|&b| table[b as usize]).collect(),
                None => data.to_vec(),
            },
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The outcome of family selection.
///
/// `unknown` holds requested names that matched nothing; the caller
/// decides whether to confirm with the operator before continuing.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Families to run: request order for name selection, registration
    /// order otherwise.
    pub families: Vec<Family>,
    /// Requested names that matched no family.
    pub unknown: Vec<String>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// Choose which families to enable.
///
/// Precedence: an explicit `names` list wins over `only_level`, which wins
/// over `max_level`. Name matching is case-insensitive and treats hyphens
/// and underscores alike; zero name matches is fatal. Disabled families
/// (level -1) never appear in level-based selection.
///
/// With `listing` false, level-based selections collapse the byte-local
/// families of levels 1-2 into the single [`Family::TableLookup`] driven
/// by the substitution-table cache; `listing` true flattens every level
/// for display and never touches the cache.
pub fn select_families(
    names: Option<&str>,
    only_level: Option<i8>,
    max_level: i8,
    listing: bool,
) -> Result<Selection> {
    if let Some(names) = names {
        let mut families = Vec::new();
        let mut unknown = Vec::new();
        for raw in names.split(',') {
            let wanted = normalize(raw);
            if wanted.is_empty() {
                continue;
            }
            match ALL_FAMILIES.iter().find(|f| f.ident() == wanted) {
                Some(fam) if !families.contains(fam) => families.push(*fam),
                Some(_) => {}
                None => unknown.push(raw.trim().to_string()),
            }
        }
        if families.is_empty() {
            return Err(LockeError::NoFamiliesMatched { names: unknown });
        }
        return Ok(Selection { families, unknown });
    }

    let picked: Vec<Family> = if let Some(only) = only_level {
        if !(1..=3).contains(&only) {
            return Err(LockeError::InvalidLevel { level: only });
        }
        ALL_FAMILIES
            .iter()
            .copied()
            .filter(|f| f.level() == only)
            .collect()
    } else {
        if !(1..=3).contains(&max_level) {
            return Err(LockeError::InvalidLevel { level: max_level });
        }
        ALL_FAMILIES
            .iter()
            .copied()
            .filter(|f| f.level() > 0 && f.level() <= max_level)
            .collect()
    };

    if listing {
        return Ok(Selection {
            families: picked,
            unknown: Vec::new(),
        });
    }

    // Collapse levels 1-2 byte-local enumeration into the cached tables.
    let mut families = Vec::new();
    for fam in picked {
        if fam.is_byte_local() && fam.level() <= 2 {
            if !families.contains(&Family::TableLookup) {
                families.push(Family::TableLookup);
            }
        } else {
            families.push(fam);
        }
    }
    Ok(Selection {
        families,
        unknown: Vec::new(),
    })
}

/// Expand a family list into the full stage-1 candidate set.
///
/// `TableLookup`, if present, is expanded from the substitution-table
/// database at `cache_path`; a missing database is fatal.
pub fn expand_families(families: &[Family], cache_path: &Path) -> Result<Vec<Transform>> {
    let mut work = Vec::new();
    for family in families {
        if *family == Family::TableLookup {
            if !cache_path.exists() {
                return Err(LockeError::MissingCache {
                    path: cache_path.to_path_buf(),
                });
            }
            for table in cache::load(cache_path)? {
                work.push(Transform::from_table(table));
            }
        } else {
            work.extend(family.iterate().map(|p| Transform::new(*family, p)));
        }
    }
    tracing::debug!(transforms = work.len(), "expanded candidate set");
    Ok(work)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_sizes() {
        assert_eq!(Family::Identity.iterate().count(), 1);
        assert_eq!(Family::Rol.iterate().count(), 7);
        assert_eq!(Family::Xor.iterate().count(), 255);
        assert_eq!(Family::Add.iterate().count(), 255);
        assert_eq!(Family::XorRol.iterate().count(), 1785);
        assert_eq!(Family::AddRol.iterate().count(), 1785);
        assert_eq!(Family::RolAdd.iterate().count(), 1785);
        assert_eq!(Family::XorAdd.iterate().count(), 65025);
        assert_eq!(Family::AddXor.iterate().count(), 65025);
        assert_eq!(Family::XorInc.iterate().count(), 256);
        assert_eq!(Family::XorDec.iterate().count(), 256);
        assert_eq!(Family::SubInc.iterate().count(), 256);
        assert_eq!(Family::XorLChained.iterate().count(), 256);
        assert_eq!(Family::XorRChained.iterate().count(), 256);
        assert_eq!(Family::XorIncRol.iterate().count(), 1792);
        assert_eq!(Family::XorRChainedAll.iterate().count(), 256);
    }

    #[test]
    fn test_xor_never_enumerates_zero_key() {
        // k = 0 is the XOR identity and is excluded by construction
        assert!(Family::Xor
            .iterate()
            .all(|p| !matches!(p, Params::Key(0))));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let first: Vec<Params> = Family::XorRol.iterate().collect();
        let second: Vec<Params> = Family::XorRol.iterate().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_byte_local_round_trip_all_params() {
        let sample: Vec<u8> = (0..=255u8).collect();
        for family in [
            Family::Rol,
            Family::Xor,
            Family::Add,
            Family::XorRol,
            Family::AddRol,
            Family::RolAdd,
            Family::OutlookPst,
        ] {
            for params in family.iterate() {
                let t = Transform::new(family, params);
                let encoded = t.apply(&sample, Direction::Encode);
                let decoded = t.apply(&encoded, Direction::Decode);
                assert_eq!(decoded, sample, "round trip failed for {}", t.shortname());
            }
        }
    }

    #[test]
    fn test_pair_composition_round_trip_sampled() {
        // The 65k-tuple pair families round trip as well; step the key
        // space to keep the test quick.
        let sample: Vec<u8> = (0..=255u8).collect();
        for family in [Family::XorAdd, Family::AddXor] {
            for k1 in (1..=255u8).step_by(17) {
                for k2 in (1..=255u8).step_by(13) {
                    let t = Transform::new(family, Params::KeyPair(k1, k2));
                    let encoded = t.apply(&sample, Direction::Encode);
                    assert_eq!(t.apply(&encoded, Direction::Decode), sample);
                }
            }
        }
    }

    #[test]
    fn test_output_length_matches_input() {
        let data = vec![0x41u8; 37];
        for family in ALL_FAMILIES {
            if let Some(params) = family.iterate().next() {
                let t = Transform::new(*family, params);
                assert_eq!(t.apply(&data, Direction::Decode).len(), data.len());
            }
        }
    }

    #[test]
    fn test_shortname_formats() {
        assert_eq!(
            Transform::new(Family::Xor, Params::Key(0x5A)).shortname(),
            "xor_5A"
        );
        assert_eq!(
            Transform::new(Family::Add, Params::Key(7)).shortname(),
            "add_7"
        );
        assert_eq!(
            Transform::new(Family::Rol, Params::Key(3)).shortname(),
            "rLeft_3"
        );
        assert_eq!(
            Transform::new(Family::XorRol, Params::KeyPair(0x0F, 2)).shortname(),
            "xor0F_lrol2"
        );
        assert_eq!(
            Transform::new(Family::AddXor, Params::KeyPair(7, 0x42)).shortname(),
            "add7_xor42"
        );
        assert_eq!(
            Transform::new(Family::XorIncRol, Params::KeyPair(0xAB, 5)).shortname(),
            "xorAB_inc_rol05"
        );
        assert_eq!(
            Transform::new(Family::Identity, Params::Empty).shortname(),
            "no_trans"
        );
    }

    #[test]
    fn test_select_by_names_overrides_levels() {
        let sel = select_families(Some("XOR, Add-XOR"), Some(1), 1, false).unwrap();
        assert_eq!(sel.families, vec![Family::Xor, Family::AddXor]);
        assert!(sel.unknown.is_empty());
    }

    #[test]
    fn test_select_reports_unknown_names() {
        let sel = select_families(Some("xor, bogus"), None, 3, false).unwrap();
        assert_eq!(sel.families, vec![Family::Xor]);
        assert_eq!(sel.unknown, vec!["bogus".to_string()]);
    }

    #[test]
    fn test_select_no_matches_is_fatal() {
        let err = select_families(Some("nope,nada"), None, 3, false).unwrap_err();
        assert!(matches!(err, LockeError::NoFamiliesMatched { .. }));
    }

    #[test]
    fn test_select_only_level() {
        let sel = select_families(None, Some(3), 1, true).unwrap();
        assert_eq!(
            sel.families,
            vec![Family::XorIncRol, Family::XorRChainedAll]
        );
    }

    #[test]
    fn test_select_invalid_levels() {
        assert!(matches!(
            select_families(None, Some(4), 3, true).unwrap_err(),
            LockeError::InvalidLevel { level: 4 }
        ));
        assert!(matches!(
            select_families(None, None, 0, true).unwrap_err(),
            LockeError::InvalidLevel { level: 0 }
        ));
    }

    #[test]
    fn test_select_listing_flattens_all_levels() {
        let sel = select_families(None, None, 3, true).unwrap();
        // every enabled family, no collapse, no disabled PST
        assert_eq!(sel.families.len(), ALL_FAMILIES.len() - 1);
        assert!(!sel.families.contains(&Family::OutlookPst));
        assert!(!sel.families.contains(&Family::TableLookup));
    }

    #[test]
    fn test_select_run_mode_collapses_byte_local() {
        let sel = select_families(None, None, 3, false).unwrap();
        assert!(sel.families.contains(&Family::TableLookup));
        assert!(!sel.families.contains(&Family::Xor));
        assert!(!sel.families.contains(&Family::XorAdd));
        // stringwise families survive the collapse
        assert!(sel.families.contains(&Family::Identity));
        assert!(sel.families.contains(&Family::XorInc));
        assert!(sel.families.contains(&Family::XorRChainedAll));
    }

    #[test]
    fn test_expand_missing_cache_is_fatal() {
        let err = expand_families(
            &[Family::TableLookup],
            Path::new("/nonexistent/transforms.db"),
        )
        .unwrap_err();
        assert!(matches!(err, LockeError::MissingCache { .. }));
    }

    #[test]
    fn test_expand_by_name_needs_no_cache() {
        let work =
            expand_families(&[Family::Xor], Path::new("/nonexistent/transforms.db")).unwrap();
        assert_eq!(work.len(), 255);
    }

    #[test]
    fn test_table_lookup_apply() {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = (i as u8) ^ 0x55;
        }
        let t = Transform::from_table(Arc::new(CachedTable {
            table,
            label: "xor_55".into(),
        }));
        assert_eq!(t.apply(b"\x00\x55", Direction::Decode), vec![0x55, 0x00]);
        assert_eq!(t.shortname(), "xor_55");
    }
}
