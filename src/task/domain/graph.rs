//! In-memory dependency graph with reachability-based cycle detection.

use super::TaskId;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Directed dependency graph between tasks.
///
/// An edge `task -> dependency` records that `task` cannot move forward
/// until `dependency` is completed. The graph keeps both edge directions
/// indexed so dependency and dependent lookups are symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    depends_on: BTreeMap<TaskId, BTreeSet<TaskId>>,
    dependents: BTreeMap<TaskId, BTreeSet<TaskId>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            depends_on: BTreeMap::new(),
            dependents: BTreeMap::new(),
        }
    }

    /// Inserts the edge `task -> dependency`.
    ///
    /// Inserting an existing edge is a no-op. The graph itself accepts any
    /// edge; callers run [`DependencyGraph::would_close_cycle`] first.
    pub fn insert_edge(&mut self, task: TaskId, dependency: TaskId) {
        self.depends_on.entry(task).or_default().insert(dependency);
        self.dependents.entry(dependency).or_default().insert(task);
    }

    /// Removes the edge `task -> dependency`, if present.
    pub fn remove_edge(&mut self, task: TaskId, dependency: TaskId) {
        prune(&mut self.depends_on, task, dependency);
        prune(&mut self.dependents, dependency, task);
    }

    /// Replaces every outgoing edge of `task` with the given dependency set.
    pub fn replace_dependencies(&mut self, task: TaskId, dependencies: BTreeSet<TaskId>) {
        let previous = self.depends_on.remove(&task).unwrap_or_default();
        for dependency in previous {
            prune(&mut self.dependents, dependency, task);
        }
        for &dependency in &dependencies {
            self.dependents.entry(dependency).or_default().insert(task);
        }
        if !dependencies.is_empty() {
            self.depends_on.insert(task, dependencies);
        }
    }

    /// Removes every edge touching `task` in either direction.
    pub fn clear_task(&mut self, task: TaskId) {
        if let Some(dependencies) = self.depends_on.remove(&task) {
            for dependency in dependencies {
                prune(&mut self.dependents, dependency, task);
            }
        }
        if let Some(dependents) = self.dependents.remove(&task) {
            for dependent in dependents {
                prune(&mut self.depends_on, dependent, task);
            }
        }
    }

    /// Iterates over the direct dependencies of `task`.
    pub fn depends_on(&self, task: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.depends_on.get(&task).into_iter().flatten().copied()
    }

    /// Iterates over the direct dependents of `task`.
    pub fn dependents_of(&self, task: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.dependents.get(&task).into_iter().flatten().copied()
    }

    /// Returns whether `to` is reachable from `from` along dependency edges.
    ///
    /// Reachability is reflexive. The walk is an iterative depth-first
    /// search with a visited set, so it terminates even when the stored
    /// graph already contains a cycle.
    #[must_use]
    pub fn reaches(&self, from: TaskId, to: TaskId) -> bool {
        if from == to {
            return true;
        }
        let mut visited: HashSet<TaskId> = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            for dependency in self.depends_on.get(&current).into_iter().flatten() {
                if *dependency == to {
                    return true;
                }
                if !visited.contains(dependency) {
                    stack.push(*dependency);
                }
            }
        }
        false
    }

    /// Returns whether adding the edge `task -> dependency` would close a
    /// dependency cycle.
    ///
    /// A self-edge always closes a cycle; otherwise the edge is cyclic
    /// exactly when `dependency` already reaches `task`.
    #[must_use]
    pub fn would_close_cycle(&self, task: TaskId, dependency: TaskId) -> bool {
        task == dependency || self.reaches(dependency, task)
    }
}

/// Removes `value` from the set at `key`, dropping the set once empty.
fn prune(index: &mut BTreeMap<TaskId, BTreeSet<TaskId>>, key: TaskId, value: TaskId) {
    if let Some(set) = index.get_mut(&key) {
        set.remove(&value);
        if set.is_empty() {
            index.remove(&key);
        }
    }
}
