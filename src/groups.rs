use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Maps group names to their member names.
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "Team Alpha": ["Ana", "Ben", "Chloe"],
///   "Team Beta": ["Dev", "Eli"]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GroupRoster {
    groups: BTreeMap<String, Vec<String>>,
}

impl GroupRoster {
    /// Loads the roster from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses the roster from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let groups: BTreeMap<String, Vec<String>> = serde_json::from_str(content)?;
        Ok(Self { groups })
    }

    /// Returns the members of `group`, if the group exists.
    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Group names in sorted order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
