use crate::core::{GroupBatch, GroupKey, Header, Row, Table};
use std::collections::HashSet;

/// Distinct group keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    keys: Vec<GroupKey>,
}

impl GroupSet {
    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_keys(self) -> Vec<GroupKey> {
        self.keys
    }
}

/// The last field of a row.
pub fn group_key(row: &[String]) -> Option<&str> {
    row.last().map(String::as_str)
}

/// Collects the distinct last-field values of `rows`, in the order they first
/// appear. Rows without fields are skipped.
pub fn derive_groups(rows: &[Row]) -> GroupSet {
    let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());
    let mut keys = Vec::new();

    for key in rows.iter().filter_map(|row| group_key(row)) {
        if seen.insert(key) {
            keys.push(key.to_string());
        }
    }

    GroupSet { keys }
}

impl GroupBatch {
    /// Builds the batch for `key` out of every row whose last field equals it.
    pub fn collect(key: GroupKey, header: &Header, rows: &[Row]) -> Self {
        let members = rows
            .iter()
            .filter(|row| group_key(row) == Some(key.as_str()))
            .cloned()
            .collect();
        GroupBatch::from_parts(key, header, members)
    }
}

/// Splits the whole table into one batch per group, in group order.
pub fn partition(table: &Table) -> Vec<GroupBatch> {
    derive_groups(&table.rows)
        .into_keys()
        .into_iter()
        .map(|key| GroupBatch::collect(key, &table.header, &table.rows))
        .collect()
}
