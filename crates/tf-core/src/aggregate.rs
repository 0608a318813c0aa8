//! Activity roll-up over the work package tree.
//!
//! [`calc_activity`] folds the activities that pass a [`DayFilter`] into a
//! tree of [`ValueNode`]s mirroring the work package tree, with every node
//! carrying the hours of its whole subtree.
//!
//! # Pruning
//!
//! Subtrees with no filtered hours are left out entirely, so only the
//! requested node itself may come back with a zero value.
//!
//! # Self nodes
//!
//! A package with hours booked both on itself and on some of its children
//! gets an extra first child named [`SELF_NAME`]. It takes over the
//! package's own activities, so that the package's value is always the sum
//! of its children's.

use serde::Serialize;

use crate::filter::DayFilter;
use crate::package::PackageId;
use crate::universe::{Activity, Universe};

/// Name of the synthetic node holding a package's own hours.
pub const SELF_NAME: &str = "_self";

/// Filtered hours of one work package and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueNode<'a> {
    /// Package name, or [`SELF_NAME`] for a self node.
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// The package this node reports on. `None` for a self node.
    #[serde(skip)]
    pub package: Option<PackageId>,
    /// Hours of this node and all its children.
    pub value: f64,
    /// Filtered activities booked directly on this node, by date.
    pub activities: Vec<&'a Activity>,
    pub children: Vec<ValueNode<'a>>,
}

impl<'a> ValueNode<'a> {
    fn for_package(universe: &'a Universe, id: PackageId) -> Self {
        let package = universe.packages().get(id);
        Self {
            name: package.name(),
            description: package.description.as_deref(),
            package: Some(id),
            value: 0.0,
            activities: Vec::new(),
            children: Vec::new(),
        }
    }

    fn self_node(value: f64, activities: Vec<&'a Activity>) -> Self {
        Self {
            name: SELF_NAME,
            description: None,
            package: None,
            value,
            activities,
            children: Vec::new(),
        }
    }

    pub const fn is_self(&self) -> bool {
        self.package.is_none()
    }

    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Resolves a dot-separated path of child names.
    pub fn get_node(&self, path: &str) -> Option<&Self> {
        path.split('.').try_fold(self, |node, name| node.child(name))
    }
}

/// Rolls up the hours of activities passing `filter` below package `id`.
pub fn calc_activity<'a>(
    universe: &'a Universe,
    id: PackageId,
    filter: &DayFilter,
) -> ValueNode<'a> {
    let mut node = ValueNode::for_package(universe, id);
    let package = universe.packages().get(id);

    node.activities = universe
        .activities(package.activity_ids())
        .filter(|activity| filter.passes(activity.date()))
        .collect();
    let own = node
        .activities
        .iter()
        .fold(0.0, |total, activity| total + activity.duration);

    let mut total = own;
    for &child in package.children() {
        let result = calc_activity(universe, child, filter);
        if result.value == 0.0 {
            continue;
        }
        if !node.activities.is_empty() {
            let activities = std::mem::take(&mut node.activities);
            node.children.push(ValueNode::self_node(own, activities));
        }
        total += result.value;
        node.children.push(result);
    }

    node.value = total;
    node
}
