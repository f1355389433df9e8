// TreeBuilder: flat {id, name, parent_id} records → one rooted Node tree.

use std::collections::HashMap;
use std::fmt;

use dendro_core::{NodeId, Record};
use unicode_normalization::UnicodeNormalization;

use crate::{Node, NodeState};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// The record set does not describe a single rooted tree.
/// Fatal to the load; no partial tree is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedHierarchyError {
    /// No record with an empty parent reference.
    NoRoot,
    /// More than one record with an empty parent reference.
    MultipleRoots(usize),
    /// Two records share an id.
    DuplicateId(NodeId),
    /// A record references a parent id that matches no record.
    DanglingParent { child: NodeId, parent: NodeId },
    /// Records whose parent chains never reach the root (a cycle).
    UnreachableRecords(usize),
}

impl fmt::Display for MalformedHierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoot => write!(f, "no root record (empty parent reference) found"),
            Self::MultipleRoots(n) => write!(f, "expected exactly one root record, found {}", n),
            Self::DuplicateId(id) => write!(f, "duplicate record id: {}", id),
            Self::DanglingParent { child, parent } => {
                write!(f, "record {} references unknown parent {}", child, parent)
            }
            Self::UnreachableRecords(n) => {
                write!(f, "{} record(s) unreachable from the root (parent cycle)", n)
            }
        }
    }
}

impl std::error::Error for MalformedHierarchyError {}

// ──────────────────────────────────────────────
// build
// ──────────────────────────────────────────────

/// Build the rooted tree from a flat record list.
///
/// Two passes: first an id index (rejecting duplicates) and root detection,
/// then children grouped by parent id (rejecting dangling references).
/// The tree is constructed by reachability from the root, so a record set
/// with a parent cycle leaves records unattached and fails.
///
/// Names are NFC-normalized; input records are not mutated. Children order
/// within a parent is the input order — the first layout sorts by name.
pub fn build(records: &[Record]) -> Result<Node, MalformedHierarchyError> {
    let mut index: HashMap<&str, &Record> = HashMap::with_capacity(records.len());
    let mut root: Option<&Record> = None;
    let mut root_count = 0;

    for record in records {
        if index.insert(record.id.as_str(), record).is_some() {
            return Err(MalformedHierarchyError::DuplicateId(record.id.clone()));
        }
        if is_empty_parent(&record.parent_id) {
            root_count += 1;
            root = Some(record);
        }
    }

    let root = match (root, root_count) {
        (Some(record), 1) => record,
        (_, 0) => return Err(MalformedHierarchyError::NoRoot),
        (_, n) => return Err(MalformedHierarchyError::MultipleRoots(n)),
    };

    let mut by_parent: HashMap<&str, Vec<&Record>> = HashMap::new();
    for record in records {
        let Some(parent_id) = effective_parent(&record.parent_id) else {
            continue;
        };
        if !index.contains_key(parent_id) {
            return Err(MalformedHierarchyError::DanglingParent {
                child: record.id.clone(),
                parent: parent_id.to_string(),
            });
        }
        by_parent.entry(parent_id).or_default().push(record);
    }

    let mut attached = 0;
    let tree = construct(root, None, 0, &by_parent, &mut attached);

    if attached != records.len() {
        return Err(MalformedHierarchyError::UnreachableRecords(
            records.len() - attached,
        ));
    }

    Ok(tree)
}

fn construct(
    record: &Record,
    parent_id: Option<&str>,
    depth: usize,
    by_parent: &HashMap<&str, Vec<&Record>>,
    attached: &mut usize,
) -> Node {
    *attached += 1;
    let name: String = record.name.nfc().collect();
    let mut node = Node::new(
        record.id.clone(),
        name,
        parent_id.map(str::to_string),
        depth,
    );

    if let Some(child_records) = by_parent.get(record.id.as_str()) {
        let children = child_records
            .iter()
            .map(|child| construct(child, Some(&record.id), depth + 1, by_parent, attached))
            .collect();
        node.state = NodeState::Expanded(children);
    }

    node
}

/// Hosts deliver missing parent references as either an absent value or an
/// empty string; both mark the root.
fn is_empty_parent(parent_id: &Option<NodeId>) -> bool {
    match parent_id {
        None => true,
        Some(id) => id.is_empty(),
    }
}

fn effective_parent(parent_id: &Option<NodeId>) -> Option<&str> {
    match parent_id {
        Some(id) if !id.is_empty() => Some(id.as_str()),
        _ => None,
    }
}
