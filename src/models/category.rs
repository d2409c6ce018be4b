//! Category model and the parent/child index used for rollups
//!
//! Categories form a tree through `parent_id`. In practice it is two levels
//! (a root and its sub-categories), but nothing here assumes a depth.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::ids::CategoryId;
use crate::engine::ValidationRules;
use crate::error::ValidationError;

/// A spending category, optionally nested under a parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    pub name: String,

    /// None for root categories
    #[serde(default)]
    pub parent_id: Option<CategoryId>,

    /// Stable ordering key among siblings
    #[serde(default)]
    pub sort_order: i32,

    /// Seeded by the application rather than created by the user
    #[serde(default)]
    pub is_default: bool,
}

impl Category {
    /// Create a new root category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            parent_id: None,
            sort_order: 0,
            is_default: false,
        }
    }

    /// Create a new sub-category under `parent_id`
    pub fn child_of(name: impl Into<String>, parent_id: CategoryId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(name)
        }
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationRules::require_non_empty(&self.name, "name")?;
        if self.parent_id == Some(self.id) {
            return Err(ValidationError::CategoryCycle(self.id));
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
struct Node {
    id: CategoryId,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Read-only parent/child index over a set of categories
///
/// Nodes live in a flat arena and refer to each other by index. A parent id
/// that is not part of the set is treated as absent, making that category a
/// root.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<Node>,
    index: HashMap<CategoryId, usize>,
}

impl CategoryTree {
    /// Build the index, rejecting parent graphs that contain a cycle
    pub fn build(categories: &[Category]) -> Result<Self, ValidationError> {
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));

        let index: HashMap<CategoryId, usize> = sorted
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();

        let mut nodes: Vec<Node> = sorted
            .iter()
            .map(|c| Node {
                id: c.id,
                parent: c.parent_id.and_then(|p| index.get(&p).copied()),
                children: Vec::new(),
            })
            .collect();

        for i in 0..nodes.len() {
            if let Some(p) = nodes[i].parent {
                nodes[p].children.push(i);
            }
        }

        let tree = Self { nodes, index };
        tree.check_acyclic()?;
        Ok(tree)
    }

    /// Any chain of parents longer than the node count must revisit a node
    fn check_acyclic(&self) -> Result<(), ValidationError> {
        let limit = self.nodes.len();
        for node in &self.nodes {
            let mut steps = 0;
            let mut cursor = node.parent;
            while let Some(p) = cursor {
                steps += 1;
                if steps > limit {
                    return Err(ValidationError::CategoryCycle(node.id));
                }
                cursor = self.nodes[p].parent;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn parent(&self, id: CategoryId) -> Option<CategoryId> {
        let node = &self.nodes[*self.index.get(&id)?];
        node.parent.map(|p| self.nodes[p].id)
    }

    /// Direct children ordered by sort order then name
    pub fn children(&self, id: CategoryId) -> Vec<CategoryId> {
        self.index
            .get(&id)
            .map(|&i| self.nodes[i].children.iter().map(|&c| self.nodes[c].id).collect())
            .unwrap_or_default()
    }

    /// Root categories ordered by sort order then name
    pub fn roots(&self) -> Vec<CategoryId> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect()
    }

    /// Every category below `id` at any depth, excluding `id` itself
    pub fn descendants(&self, id: CategoryId) -> Vec<CategoryId> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[start].children.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            out.push(self.nodes[i].id);
            stack.extend(self.nodes[i].children.iter().rev().copied());
        }
        out
    }

    /// `id` plus all its descendants, for membership checks during rollup
    pub fn rollup_set(&self, id: CategoryId) -> HashSet<CategoryId> {
        let mut set: HashSet<CategoryId> = self.descendants(id).into_iter().collect();
        set.insert(id);
        set
    }

    /// Whether `ancestor` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: CategoryId, id: CategoryId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.parent(p);
        }
        false
    }
}
