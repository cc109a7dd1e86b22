//! FILENAME: core/engine/src/recalc.rs
//! PURPOSE: Computes the recalculation order after a cell changes.
//! CONTEXT: Starting from the changed cell, a depth-first walk over the
//! dependents relation collects every cell whose value may change. The
//! reverse postorder of that walk is a topological order: each cell comes
//! after every affected cell it reads from, and the changed cell comes first.
//!
//! A cell reached again while it is still on the walk's path closes a cycle.
//! The walk is iterative so long dependency chains cannot overflow the stack.

use crate::dependency_graph::DependencyGraph;
use crate::error::CycleError;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Returns `start` followed by all of its transitive dependents, ordered so
/// that evaluating left to right always sees up-to-date inputs.
pub fn cells_to_recalculate(graph: &DependencyGraph, start: &str) -> Result<Vec<String>, CycleError> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut postorder: Vec<&str> = Vec::new();

    // Each frame is a node on the current path plus its unvisited dependents.
    let mut stack: Vec<(&str, Vec<&str>)> = Vec::new();
    marks.insert(start, Mark::InProgress);
    stack.push((start, sorted_dependents(graph, start)));

    while let Some((node, pending)) = stack.last_mut() {
        let node = *node;
        match pending.pop() {
            Some(next) => match marks.get(next) {
                Some(Mark::InProgress) => {
                    return Err(CycleError {
                        cycle_path: cycle_path(&stack, next),
                    });
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::InProgress);
                    stack.push((next, sorted_dependents(graph, next)));
                }
            },
            None => {
                marks.insert(node, Mark::Done);
                postorder.push(node);
                stack.pop();
            }
        }
    }

    Ok(postorder.into_iter().rev().map(str::to_string).collect())
}

/// Dependents in reverse name order; popping from the end then visits them
/// alphabetically, which keeps the resulting order deterministic.
fn sorted_dependents<'a>(graph: &'a DependencyGraph, node: &str) -> Vec<&'a str> {
    let mut dependents: Vec<&str> = graph.dependents_of(node).collect();
    dependents.sort_unstable_by(|a, b| b.cmp(a));
    dependents
}

/// The path from the first occurrence of `repeated` on the stack back to itself.
fn cycle_path(stack: &[(&str, Vec<&str>)], repeated: &str) -> Vec<String> {
    let from = stack
        .iter()
        .position(|(node, _)| *node == repeated)
        .unwrap_or(0);

    stack[from..]
        .iter()
        .map(|(node, _)| node.to_string())
        .chain(std::iter::once(repeated.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a graph from (cell, space-separated dependees) entries.
    fn graph_of(formulas: &[(&str, &str)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for &(cell, dependees) in formulas {
            graph.replace_dependees(cell, dependees.split_whitespace());
        }
        graph
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_no_dependents() {
        let graph = DependencyGraph::new();
        assert_eq!(cells_to_recalculate(&graph, "A1").unwrap(), vec!["A1"]);
    }

    #[test]
    fn test_chain() {
        // B1 = A1, C1 = B1
        let graph = graph_of(&[("B1", "A1"), ("C1", "B1")]);
        assert_eq!(
            cells_to_recalculate(&graph, "A1").unwrap(),
            vec!["A1", "B1", "C1"]
        );
        assert_eq!(cells_to_recalculate(&graph, "B1").unwrap(), vec!["B1", "C1"]);
    }

    #[test]
    fn test_diamond() {
        //     A1
        //    /  \
        //   B1  C1
        //    \  /
        //     D1
        let graph = graph_of(&[("B1", "A1"), ("C1", "A1"), ("D1", "B1 C1")]);
        let order = cells_to_recalculate(&graph, "A1").unwrap();

        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "A1");
        assert!(position(&order, "D1") > position(&order, "B1"));
        assert!(position(&order, "D1") > position(&order, "C1"));
    }

    #[test]
    fn test_skip_level_dependency() {
        // C1 reads both A1 and B1, and B1 reads A1
        let graph = graph_of(&[("B1", "A1"), ("C1", "A1 B1")]);
        let order = cells_to_recalculate(&graph, "A1").unwrap();
        assert_eq!(order, vec!["A1", "B1", "C1"]);
    }

    #[test]
    fn test_unrelated_cells_excluded() {
        let graph = graph_of(&[("B1", "A1"), ("Z9", "Y9")]);
        assert_eq!(cells_to_recalculate(&graph, "A1").unwrap(), vec!["A1", "B1"]);
    }

    #[test]
    fn test_self_cycle() {
        let graph = graph_of(&[("A1", "A1")]);
        let err = cells_to_recalculate(&graph, "A1").unwrap_err();
        assert_eq!(err.cycle_path, vec!["A1", "A1"]);
    }

    #[test]
    fn test_transitive_cycle() {
        let graph = graph_of(&[("B1", "A1"), ("C1", "B1"), ("A1", "C1")]);
        let err = cells_to_recalculate(&graph, "A1").unwrap_err();
        assert_eq!(err.cycle_path, vec!["A1", "B1", "C1", "A1"]);
        assert_eq!(err.to_string(), "Circular reference detected: A1 -> B1 -> C1 -> A1");
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut graph = DependencyGraph::new();
        for i in 0..5000 {
            graph.add_dependency(&format!("X{}", i), &format!("X{}", i + 1));
        }
        let order = cells_to_recalculate(&graph, "X0").unwrap();
        assert_eq!(order.len(), 5001);
        assert_eq!(order[0], "X0");
        assert_eq!(order[5000], "X5000");
    }
}
