//! Tabular policy loaded from a serialized CFR solver.
//!
//! The solver appends its state to a text file; only the final line holds the
//! snapshot we care about. That line is a flat `<~>`-separated sequence of
//! `key, data, key, data, ...` tokens. Each data token has four `;`-separated
//! fields:
//!
//! ```text
//! legal_actions ; cumulative_regrets ; cumulative_policy ; current_policy
//! ```
//!
//! Only the third field, the cumulative policy, is consumed. It is a
//! comma-separated list of hex-encoded doubles (see
//! [`hexfloat`](super::hexfloat)), one per legal action, in the game's
//! legal-action order.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::arena::game::Action;
use crate::arena::hexfloat::{decode_hex_f64, encode_hex_f64};
use crate::error::{ArenaError, ArenaResult};

/// Separator between key and data tokens on the snapshot line.
pub const ENTRY_DELIMITER: &str = "<~>";

/// Separator between the four fields of a data token.
pub const FIELD_DELIMITER: char = ';';

/// Separator between values inside a field.
pub const VALUE_DELIMITER: char = ',';

/// Number of fields in a data token.
pub const NUM_FIELDS: usize = 4;

/// Index of the cumulative-policy field, the one holding the policy weights.
pub const POLICY_FIELD: usize = 2;

/// Immutable map from information-state key to per-action policy weights.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    /// info_key -> [weight per legal action]
    entries: FxHashMap<String, Vec<f64>>,
}

impl PolicyTable {
    /// Read and parse a policy file.
    pub fn load<P: AsRef<Path>>(path: P) -> ArenaResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8(bytes).map_err(|e| {
            ArenaError::Parse(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;
        let table = Self::parse(&content)?;
        log::info!(
            "{:<32}{:<32}",
            format!("loaded {} info states", table.len()),
            path.display()
        );
        Ok(table)
    }

    /// Parse the textual contents of a policy file.
    ///
    /// Earlier lines are log history and are skipped. A single trailing line
    /// terminator after the snapshot is tolerated. Duplicate keys keep the
    /// last occurrence.
    pub fn parse(content: &str) -> ArenaResult<Self> {
        let content = content
            .strip_suffix('\n')
            .map(|c| c.strip_suffix('\r').unwrap_or(c))
            .unwrap_or(content);
        let line = content.rsplit('\n').next().unwrap_or_default();
        if line.is_empty() {
            return Err(ArenaError::Parse("policy file has no snapshot record".into()));
        }

        let mut entries = FxHashMap::default();
        let mut tokens = line.split(ENTRY_DELIMITER);
        while let Some(key) = tokens.next() {
            let data = tokens.next().ok_or_else(|| {
                ArenaError::Parse(format!("info state {:?} has no data token", key))
            })?;
            let policy = parse_policy_field(key, data)?;
            entries.insert(key.to_string(), policy);
        }

        Ok(Self { entries })
    }

    /// Build a table directly from decoded entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Policy weights stored for an information state.
    pub fn get(&self, key: &str) -> ArenaResult<&[f64]> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| ArenaError::KeyNotFound(key.to_string()))
    }

    /// Check if an info state exists in the table.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of information states stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Decode the policy field of one data token.
fn parse_policy_field(key: &str, data: &str) -> ArenaResult<Vec<f64>> {
    let fields: Vec<&str> = data.split(FIELD_DELIMITER).collect();
    if fields.len() != NUM_FIELDS {
        return Err(ArenaError::Parse(format!(
            "info state {:?} has {} fields, expected {}",
            key,
            fields.len(),
            NUM_FIELDS
        )));
    }

    fields[POLICY_FIELD]
        .split(VALUE_DELIMITER)
        .map(|token| {
            decode_hex_f64(token).map_err(|e| match e {
                ArenaError::Parse(reason) => {
                    ArenaError::Parse(format!("info state {:?}: {}", key, reason))
                }
                other => other,
            })
        })
        .collect()
}

/// Render one `key<~>data` pair in the snapshot format.
///
/// Entries are joined with [`ENTRY_DELIMITER`] to form a snapshot line.
pub fn encode_entry(
    key: &str,
    legal_actions: &[Action],
    cumulative_regrets: &[f64],
    cumulative_policy: &[f64],
    current_policy: &[f64],
) -> String {
    let actions = legal_actions
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let hex = |values: &[f64]| {
        values
            .iter()
            .map(|&v| encode_hex_f64(v))
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "{}{}{};{};{};{}",
        key,
        ENTRY_DELIMITER,
        actions,
        hex(cumulative_regrets),
        hex(cumulative_policy),
        hex(current_policy)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_entry() {
        let table =
            PolicyTable::parse("s0<~>a,b;c,d;3ff0000000000000,4000000000000000;e,f").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("s0").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_only_last_line_is_read() {
        let content = "old<~>a;b;3ff0000000000000;c\n\
                       s0<~>a;b;4000000000000000;c<~>s1<~>x;y;3ff0000000000000,0000000000000000;z";
        let table = PolicyTable::parse(content).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.contains("old"));
        assert_eq!(table.get("s0").unwrap(), &[2.0]);
        assert_eq!(table.get("s1").unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn test_trailing_newline_is_tolerated() {
        let table = PolicyTable::parse("s0<~>a;b;3ff0000000000000;c\r\n").unwrap();
        assert_eq!(table.get("s0").unwrap(), &[1.0]);
    }

    #[test]
    fn test_empty_key_is_a_valid_entry() {
        // The opening information state of many games renders as "".
        let table = PolicyTable::parse("<~>a;b;3ff0000000000000;c").unwrap();
        assert_eq!(table.get("").unwrap(), &[1.0]);
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let table = PolicyTable::parse(
            "s0<~>a;b;3ff0000000000000;c<~>s0<~>a;b;4000000000000000;c",
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("s0").unwrap(), &[2.0]);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let table = PolicyTable::parse("s0<~>a;b;3ff0000000000000;c").unwrap();
        match table.get("s9") {
            Err(ArenaError::KeyNotFound(key)) => assert_eq!(key, "s9"),
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_files_are_rejected() {
        let cases = [
            "",
            "\n",
            "s0<~>a;b;3ff0000000000000;c\n\n",
            "s0",
            "s0<~>a;b;3ff0000000000000;c<~>s1",
            "s0<~>a;b;3ff0000000000000",
            "s0<~>a;b;3ff0000000000000;c;d",
            "s0<~>a;b;not-a-number;c",
            "s0<~>a;b;;c",
            "s0<~>a;b;3ff0000000000000,;c",
        ];
        for content in cases {
            assert!(
                matches!(PolicyTable::parse(content), Err(ArenaError::Parse(_))),
                "content {:?} should fail to parse",
                content
            );
        }
    }

    #[test]
    fn test_encode_entry_round_trips() {
        let policy = [0.25, 1.0 / 3.0, 0.1];
        let line = [
            encode_entry("0o", &[1, 2, 10], &[0.5, -1.5, 0.0], &policy, &[1.0, 0.0, 0.0]),
            encode_entry("", &[0, 9], &[0.0, 0.0], &[3.0, 1.0], &[0.5, 0.5]),
        ]
        .join(ENTRY_DELIMITER);

        let table = PolicyTable::parse(&format!("header line\n{}\n", line)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("0o").unwrap(), &policy);
        assert_eq!(table.get("").unwrap(), &[3.0, 1.0]);
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("arena_table_{}.txt", std::process::id()));
        std::fs::write(&path, "s0<~>a,b;c,d;3ff0000000000000,4000000000000000;e,f").unwrap();

        let table = PolicyTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.get("s0").unwrap(), &[1.0, 2.0]);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["s0"]);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let path = std::env::temp_dir().join(format!("arena_table_utf8_{}.txt", std::process::id()));
        std::fs::write(&path, b"s0<~>a;b;3ff0000000000000;c\xff").unwrap();

        let result = PolicyTable::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ArenaError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("arena_table_does_not_exist.txt");
        assert!(matches!(PolicyTable::load(&path), Err(ArenaError::Io(_))));
    }
}
