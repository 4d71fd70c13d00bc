//! Reachability and cycle-detection tests for the dependency graph.

use crate::task::domain::{DependencyGraph, TaskId};
use rstest::rstest;
use std::collections::BTreeSet;

fn ids<const N: usize>() -> [TaskId; N] {
    std::array::from_fn(|_| TaskId::new())
}

// ── Edge bookkeeping ───────────────────────────────────────────────

#[rstest]
fn insert_edge_is_visible_from_both_directions() {
    let [a, b] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(a, b);

    assert_eq!(graph.depends_on(a).collect::<Vec<_>>(), vec![b]);
    assert_eq!(graph.dependents_of(b).collect::<Vec<_>>(), vec![a]);
    assert_eq!(graph.depends_on(b).count(), 0);
}

#[rstest]
fn remove_edge_clears_both_directions() {
    let [a, b] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(a, b);
    graph.remove_edge(a, b);

    assert_eq!(graph.depends_on(a).count(), 0);
    assert_eq!(graph.dependents_of(b).count(), 0);
}

#[rstest]
fn replace_dependencies_drops_stale_reverse_entries() {
    let [task, old_dep, new_dep] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(task, old_dep);

    graph.replace_dependencies(task, BTreeSet::from([new_dep]));

    assert_eq!(graph.depends_on(task).collect::<Vec<_>>(), vec![new_dep]);
    assert_eq!(graph.dependents_of(old_dep).count(), 0);
    assert_eq!(graph.dependents_of(new_dep).collect::<Vec<_>>(), vec![task]);
}

#[rstest]
fn clear_task_removes_incident_edges_in_both_roles() {
    let [upstream, task, downstream] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(task, upstream);
    graph.insert_edge(downstream, task);

    graph.clear_task(task);

    assert_eq!(graph.dependents_of(upstream).count(), 0);
    assert_eq!(graph.depends_on(downstream).count(), 0);
    assert_eq!(graph.depends_on(task).count(), 0);
    assert_eq!(graph.dependents_of(task).count(), 0);
}

// ── Reachability ───────────────────────────────────────────────────

#[rstest]
fn reaches_is_reflexive() {
    let [a] = ids();
    let graph = DependencyGraph::new();
    assert!(graph.reaches(a, a));
}

#[rstest]
fn reaches_follows_transitive_chains() {
    let [a, b, c, d] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(a, b);
    graph.insert_edge(b, c);
    graph.insert_edge(c, d);

    assert!(graph.reaches(a, d));
    assert!(!graph.reaches(d, a));
}

#[rstest]
fn reaches_handles_diamonds_without_revisiting() {
    let [top, left, right, bottom] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(top, left);
    graph.insert_edge(top, right);
    graph.insert_edge(left, bottom);
    graph.insert_edge(right, bottom);

    assert!(graph.reaches(top, bottom));
    assert!(!graph.reaches(bottom, top));
}

// ── Cycle detection ────────────────────────────────────────────────

#[rstest]
fn self_dependency_closes_a_cycle() {
    let [a] = ids();
    let graph = DependencyGraph::new();
    assert!(graph.would_close_cycle(a, a));
}

#[rstest]
fn direct_back_edge_closes_a_cycle() {
    let [a, b] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(b, a);

    assert!(graph.would_close_cycle(a, b));
}

#[rstest]
fn long_chain_back_edge_closes_a_cycle() {
    let [a, b, c, d] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(b, a);
    graph.insert_edge(c, b);
    graph.insert_edge(d, c);

    assert!(graph.would_close_cycle(a, d));
}

#[rstest]
fn forward_edge_does_not_close_a_cycle() {
    let [a, b, c] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(b, a);
    graph.insert_edge(c, b);

    assert!(!graph.would_close_cycle(c, a));
}

#[rstest]
fn sibling_dependency_does_not_close_a_cycle() {
    // Two tasks sharing a dependency may also depend on each other in
    // one direction.
    let [shared, left, right] = ids();
    let mut graph = DependencyGraph::new();
    graph.insert_edge(left, shared);
    graph.insert_edge(right, shared);

    assert!(!graph.would_close_cycle(left, right));
}
