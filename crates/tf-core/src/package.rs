//! The work package tree.
//!
//! Packages live in an arena owned by [`PackageTree`] and refer to each other
//! by [`PackageId`]. Children keep their definition order and are also
//! indexed by name, which is unique among siblings.

use std::collections::HashMap;

use crate::universe::ActivityId;

/// Name of the root package.
pub const ROOT_NAME: &str = "ALL";

/// Stable index of a package within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(usize);

/// A named node in the work package tree.
#[derive(Debug, Clone)]
pub struct WorkPackage {
    name: String,
    /// Free text after the `;` of the defining line.
    pub description: Option<String>,
    /// Self-declared estimate in hours, independent of logged activity.
    pub effort: f64,
    parent: Option<PackageId>,
    children: Vec<PackageId>,
    by_name: HashMap<String, usize>,
    pub(crate) activities: Vec<ActivityId>,
}

impl WorkPackage {
    fn new(name: impl Into<String>, parent: Option<PackageId>) -> Self {
        Self {
            name: name.into(),
            description: None,
            effort: 0.0,
            parent,
            children: Vec::new(),
            by_name: HashMap::new(),
            activities: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn parent(&self) -> Option<PackageId> {
        self.parent
    }

    pub fn children(&self) -> &[PackageId] {
        &self.children
    }

    pub fn activity_ids(&self) -> &[ActivityId] {
        &self.activities
    }
}

/// Arena of work packages rooted at a package named [`ROOT_NAME`].
#[derive(Debug, Clone)]
pub struct PackageTree {
    nodes: Vec<WorkPackage>,
}

impl Default for PackageTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![WorkPackage::new(ROOT_NAME, None)],
        }
    }

    pub const fn root(&self) -> PackageId {
        PackageId(0)
    }

    pub fn get(&self, id: PackageId) -> &WorkPackage {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: PackageId) -> &mut WorkPackage {
        &mut self.nodes[id.0]
    }

    /// Looks up a direct child by name.
    pub fn child(&self, parent: PackageId, name: &str) -> Option<PackageId> {
        let node = self.get(parent);
        node.by_name.get(name).map(|&idx| node.children[idx])
    }

    /// Adds a child under `parent`. An existing child of the same name is
    /// replaced and its subtree detached from the tree.
    pub fn add_child(&mut self, parent: PackageId, name: &str) -> PackageId {
        let id = PackageId(self.nodes.len());
        self.nodes.push(WorkPackage::new(name, Some(parent)));

        let node = &mut self.nodes[parent.0];
        let replaced = match node.by_name.get(name) {
            Some(&idx) => Some(std::mem::replace(&mut node.children[idx], id)),
            None => {
                node.by_name.insert(name.to_string(), node.children.len());
                node.children.push(id);
                None
            }
        };

        if let Some(old) = replaced {
            self.nodes[old.0].parent = None;
        }
        id
    }

    /// Resolves a dot-separated path relative to `from`.
    pub fn find(&self, from: PackageId, path: &str) -> Option<PackageId> {
        path.split('.')
            .try_fold(from, |node, name| self.child(node, name))
    }

    /// Resolves a dot-separated path relative to `from`, creating missing
    /// packages along the way. Existing packages are never duplicated.
    pub fn find_or_create(&mut self, from: PackageId, path: &str) -> PackageId {
        let mut node = from;
        for name in path.split('.') {
            node = match self.child(node, name) {
                Some(child) => child,
                None => self.add_child(node, name),
            };
        }
        node
    }

    /// Dot-separated path from the root, excluding the root itself.
    pub fn path(&self, id: PackageId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let package = self.get(node);
            if package.parent.is_some() {
                names.push(package.name.as_str());
            }
            current = package.parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Declared effort summed over the subtree rooted at `id`.
    pub fn total_effort(&self, id: PackageId) -> f64 {
        let node = self.get(id);
        node.children
            .iter()
            .fold(node.effort, |total, &child| total + self.total_effort(child))
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut WorkPackage> {
        self.nodes.iter_mut()
    }
}

/// Returns true if `path` is a non-empty dot-separated list of non-empty names.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(|name| !name.is_empty())
}
