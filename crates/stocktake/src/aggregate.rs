//! Session aggregation
//!
//! Partitions stored scan lines into sessions keyed by
//! `device|warehouse|zone|bin`. Groups come out in the order their key was
//! first seen and lines keep their input order inside each group, so the
//! numbered session list stays stable while the collection only grows.
//!
//! The index is rebuilt from scratch on every change to the collection; it
//! borrows the lines it was built from and never mutates them.

use serde::Serialize;
use std::collections::HashMap;
use stocktake_protocol::{ScanLine, SessionLocation};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("No session with key '{key}'")]
    SessionNotFound { key: String },
}

/// Lines sharing one session key.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGroup<'a> {
    pub key: String,
    /// Copied from the first line seen with this key.
    pub location: SessionLocation,
    pub lines: Vec<&'a ScanLine>,
}

impl<'a> SessionGroup<'a> {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[&'a ScanLine] {
        &self.lines
    }

    pub fn summary(&self, index: usize) -> SessionSummary {
        SessionSummary {
            index,
            key: self.key.clone(),
            device_id: self.location.device_id.clone(),
            warehouse: self.location.warehouse.clone(),
            zone: self.location.zone.clone(),
            storage_bin: self.location.storage_bin.clone(),
            line_count: self.line_count(),
        }
    }
}

/// One row of the numbered session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// 1-based position shown to the operator.
    pub index: usize,
    pub key: String,
    pub device_id: String,
    pub warehouse: String,
    pub zone: String,
    pub storage_bin: String,
    pub line_count: usize,
}

/// Sessions in first-seen key order.
#[derive(Debug, Clone)]
pub struct SessionIndex<'a> {
    source: &'a [ScanLine],
    groups: Vec<SessionGroup<'a>>,
    positions: HashMap<String, usize>,
}

impl<'a> SessionIndex<'a> {
    /// Number of distinct sessions.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SessionGroup<'a>> {
        self.positions.get(key).map(|&pos| &self.groups[pos])
    }

    /// Like [`get`](Self::get), but a missing key is an error the caller can surface.
    pub fn require(&self, key: &str) -> Result<&SessionGroup<'a>, AggregateError> {
        self.get(key).ok_or_else(|| AggregateError::SessionNotFound {
            key: key.to_string(),
        })
    }

    /// 1-based display position of a session.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).map(|pos| pos + 1)
    }

    pub fn groups(&self) -> &[SessionGroup<'a>] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionGroup<'a>> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.key.as_str())
    }

    /// Sessions paired with their 1-based display position.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &SessionGroup<'a>)> + '_ {
        self.groups.iter().enumerate().map(|(pos, g)| (pos + 1, g))
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.numbered().map(|(index, g)| g.summary(index)).collect()
    }

    pub fn total_lines(&self) -> usize {
        self.groups.iter().map(SessionGroup::line_count).sum()
    }

    /// Every line, ungrouped, exactly as supplied.
    pub fn export_all(&self) -> &'a [ScanLine] {
        self.source
    }

    /// The lines of one session, in input order.
    pub fn export_session(&self, key: &str) -> Result<&[&'a ScanLine], AggregateError> {
        self.require(key).map(|group| group.lines())
    }
}

impl<'s, 'a> IntoIterator for &'s SessionIndex<'a> {
    type Item = &'s SessionGroup<'a>;
    type IntoIter = std::slice::Iter<'s, SessionGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group lines into sessions.
///
/// Single pass in input order. Callers normally pass lines sorted by creation
/// time; no sorting happens here.
pub fn aggregate(lines: &[ScanLine]) -> SessionIndex<'_> {
    let mut groups: Vec<SessionGroup<'_>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let key = line.session_key();
        let pos = match positions.get(key.as_ref()) {
            Some(&pos) => pos,
            None => {
                let key = key.into_owned();
                positions.insert(key.clone(), groups.len());
                groups.push(SessionGroup {
                    key,
                    location: line.location.clone(),
                    lines: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[pos].lines.push(line);
    }

    debug!(lines = lines.len(), sessions = groups.len(), "aggregated scan lines");

    SessionIndex {
        source: lines,
        groups,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktake_protocol::{join_session_key, LineId};

    fn line(id: &str, device: &str, bin: &str, session_key: Option<&str>) -> ScanLine {
        ScanLine {
            id: LineId::parse(id).unwrap(),
            location: SessionLocation::new(device, "M02", "A", bin),
            session_key: session_key.map(str::to_string),
            material_code: "100234".to_string(),
            material_desc: "Paracetamol 500mg".to_string(),
            barcode: "6297000859002".to_string(),
            batch: "DX1A".to_string(),
            qty: 1.0,
            created_at: None,
        }
    }

    fn ids<'a>(lines: &[&'a ScanLine]) -> Vec<&'a str> {
        lines.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_index() {
        let index = aggregate(&[]);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.total_lines(), 0);
        assert!(index.export_all().is_empty());
    }

    #[test]
    fn test_single_key_keeps_input_order() {
        let lines = vec![
            line("c", "D1", "B1", None),
            line("a", "D1", "B1", None),
            line("b", "D1", "B1", None),
        ];
        let index = aggregate(&lines);
        assert_eq!(index.len(), 1);
        let group = &index.groups()[0];
        assert_eq!(group.line_count(), 3);
        assert_eq!(ids(group.lines()), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_groups_follow_first_seen_order() {
        let lines = vec![
            line("1", "D2", "B1", None),
            line("2", "D1", "B1", None),
            line("3", "D2", "B1", None),
            line("4", "D3", "B9", None),
            line("5", "D1", "B1", None),
        ];
        let index = aggregate(&lines);
        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["D2|M02|A|B1", "D1|M02|A|B1", "D3|M02|A|B9"]);
        assert_eq!(index.total_lines(), lines.len());
        assert_eq!(ids(index.get("D2|M02|A|B1").unwrap().lines()), vec!["1", "3"]);
        assert_eq!(index.position("D3|M02|A|B9"), Some(3));
    }

    #[test]
    fn test_missing_key_groups_with_explicit_join() {
        let explicit = join_session_key("D1", "M02", "A", "B1");
        let lines = vec![
            line("old", "D1", "B1", None),
            line("new", "D1", "B1", Some(&explicit)),
            line("blank", "D1", "B1", Some("")),
        ];
        let index = aggregate(&lines);
        assert_eq!(index.len(), 1);
        assert_eq!(index.groups()[0].line_count(), 3);
    }

    #[test]
    fn test_stored_key_overrides_location() {
        let lines = vec![
            line("1", "D1", "B1", Some("shift-2")),
            line("2", "D9", "B9", Some("shift-2")),
        ];
        let index = aggregate(&lines);
        assert_eq!(index.len(), 1);
        let group = index.get("shift-2").unwrap();
        // Location comes from the first line only.
        assert_eq!(group.location.device_id, "D1");
        assert_eq!(group.location.storage_bin, "B1");
    }

    #[test]
    fn test_missing_fields_join_as_empty() {
        let mut l = line("1", "", "", None);
        l.location.warehouse = String::new();
        l.location.zone = String::new();
        let lines = vec![l];
        let index = aggregate(&lines);
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["|||"]);
    }

    #[test]
    fn test_export_views() {
        let lines = vec![
            line("1", "D1", "B1", None),
            line("2", "D2", "B1", None),
            line("3", "D1", "B1", None),
        ];
        let index = aggregate(&lines);
        assert_eq!(index.export_all(), lines.as_slice());
        assert_eq!(ids(index.export_session("D1|M02|A|B1").unwrap()), vec!["1", "3"]);
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let lines = vec![line("1", "D1", "B1", None)];
        let index = aggregate(&lines);
        assert!(index.get("nope").is_none());
        assert_eq!(
            index.export_session("nope").unwrap_err(),
            AggregateError::SessionNotFound {
                key: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_summaries_are_numbered_from_one() {
        let lines = vec![line("1", "D1", "B1", None), line("2", "D2", "B2", None)];
        let summaries = aggregate(&lines).summaries();
        assert_eq!(summaries[0].index, 1);
        assert_eq!(summaries[1].index, 2);
        assert_eq!(summaries[1].device_id, "D2");
        assert_eq!(summaries[1].line_count, 1);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let lines = vec![
            line("1", "D2", "B1", None),
            line("2", "D1", "B1", None),
            line("3", "D2", "B1", None),
        ];
        let first = aggregate(&lines);
        let second = aggregate(&lines);
        assert_eq!(first.groups(), second.groups());
    }

    #[test]
    fn test_append_only_growth_keeps_existing_order() {
        let mut lines = vec![line("1", "D2", "B1", None), line("2", "D1", "B1", None)];
        let before: Vec<String> = aggregate(&lines).keys().map(str::to_string).collect();

        lines.push(line("3", "D0", "B1", None));
        lines.push(line("4", "D2", "B1", None));
        let after = aggregate(&lines);
        let after_keys: Vec<&str> = after.keys().collect();

        assert_eq!(&after_keys[..2], &["D2|M02|A|B1", "D1|M02|A|B1"]);
        let before_keys: Vec<&str> = before.iter().map(String::as_str).collect();
        assert_eq!(&after_keys[..before_keys.len()], before_keys.as_slice());
        assert_eq!(ids(after.get("D2|M02|A|B1").unwrap().lines()), vec!["1", "4"]);
    }
}
