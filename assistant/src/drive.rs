use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::dataset::read_dataset;
use crate::error::DatasetError;
use crate::models::{ConnectResponse, DriveNode};

const SEED_DRIVE: &str = include_str!("../../data/drive.json");

#[derive(Debug, Deserialize)]
struct DriveFile {
    root: DriveNode,
}

/// Mock document workspace shown next to the Q&A chat.
#[derive(Debug)]
pub struct DriveTree {
    root: DriveNode,
}

pub type SharedDriveTree = Arc<DriveTree>;

impl DriveTree {
    pub fn new(root: DriveNode) -> Self {
        Self { root }
    }

    pub fn seed() -> Result<Self, DatasetError> {
        Self::from_json(SEED_DRIVE)
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let file: DriveFile = serde_json::from_str(json)?;
        Ok(Self::new(file.root))
    }

    pub fn open(path: Option<&Path>) -> Result<SharedDriveTree, DatasetError> {
        let tree = match path {
            Some(path) => Self::from_json(&read_dataset(path)?)?,
            None => Self::seed()?,
        };
        info!("Loaded drive tree with {} nodes", tree.walk().len());
        Ok(Arc::new(tree))
    }

    pub fn root(&self) -> &DriveNode {
        &self.root
    }

    /// Nodes whose name contains `term`, case-insensitively, in depth-first pre-order.
    /// The root itself is included when it matches; an empty term matches every node.
    pub fn search(&self, term: &str) -> Vec<&DriveNode> {
        let needle = term.to_lowercase();
        self.walk()
            .into_iter()
            .filter(|node| node.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&DriveNode> {
        self.walk().into_iter().find(|node| node.id == id)
    }

    /// Resolves citation ids, silently dropping unknown ones.
    pub fn resolve(&self, ids: &[String]) -> Vec<DriveNode> {
        ids.iter()
            .filter_map(|id| self.get_by_id(id))
            .cloned()
            .collect()
    }

    fn walk(&self) -> Vec<&DriveNode> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev());
            }
        }
        out
    }
}

pub fn connect(account: &str) -> ConnectResponse {
    info!("Drive: connected as {}", account);
    ConnectResponse {
        status: "connected",
        account: account.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> DriveTree {
        DriveTree::from_json(
            r#"{"root": {"id": "root", "name": "My Drive", "type": "folder", "children": [
                {"id": "a", "name": "Reports", "type": "folder", "children": [
                    {"id": "a1", "name": "Q3 Report.pdf", "type": "file", "size": 10}
                ]},
                {"id": "b", "name": "report template.docx", "type": "file"}
            ]}}"#,
        )
        .unwrap()
    }

    #[test]
    fn search_is_preorder_and_case_insensitive() {
        let tree = tree();
        let ids: Vec<&str> = tree.search("REPORT").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "b"]);
        assert!(tree.search("missing").is_empty());
    }

    #[test]
    fn empty_search_returns_whole_tree() {
        let tree = tree();
        let ids: Vec<&str> = tree.search("").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn lookup_by_id_reaches_nested_nodes() {
        let tree = tree();
        assert_eq!(tree.get_by_id("a1").unwrap().size, Some(10));
        assert_eq!(tree.get_by_id("root").unwrap().name, "My Drive");
        assert!(tree.get_by_id("zzz").is_none());
    }

    #[test]
    fn resolve_drops_unknown_ids() {
        let tree = tree();
        let nodes = tree.resolve(&["b".to_string(), "nope".to_string(), "a1".to_string()]);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a1"]);
    }

    #[test]
    fn seed_resolves_every_qa_citation() {
        let tree = DriveTree::seed().unwrap();
        let qa = crate::qa::QaIndex::seed().unwrap();
        for question in qa.questions() {
            let entry = qa.find_answer(question).unwrap();
            assert_eq!(tree.resolve(&entry.citations).len(), entry.citations.len());
        }
    }

    #[test]
    fn connect_reports_account() {
        let resp = connect("demo@pdm.com");
        assert_eq!(resp.status, "connected");
        assert_eq!(resp.account, "demo@pdm.com");
    }
}
