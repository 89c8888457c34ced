//! repl-planner — computes the table insertion/deletion order from the
//! foreign-key graph the Schema Inspector produced (`spec.md` §4.4).
//!
//! Depth-first, post-order topological sort. Siblings are visited in the
//! upstream discovery order so two runs against an unchanged schema always
//! produce the same plan.

use std::collections::{HashMap, HashSet};

use log::warn;
use repl_domain::ForeignKeyEdge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub insertion_order: Vec<String>,
    pub deletion_order: Vec<String>,
    pub cycle_detected: bool,
}

/// `tables` must be in upstream discovery order; `edges` may reference
/// tables outside that set, which are silently ignored.
pub fn plan(tables: &[String], edges: &[ForeignKeyEdge]) -> Plan {
    let table_set: HashSet<&str> = tables.iter().map(String::as_str).collect();

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for table in tables {
        adjacency.insert(table.as_str(), Vec::new());
    }
    for edge in edges {
        if table_set.contains(edge.dependent.as_str()) && table_set.contains(edge.referenced.as_str()) {
            adjacency.entry(edge.dependent.as_str()).or_default().push(edge.referenced.as_str());
        }
    }
    // Preserve discovery order among a node's referenced tables regardless
    // of the order ForeignKeys() happened to return edges in.
    let discovery_index: HashMap<&str, usize> = tables.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
    for refs in adjacency.values_mut() {
        refs.sort_by_key(|t| discovery_index[t]);
        refs.dedup();
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut insertion_order: Vec<&str> = Vec::with_capacity(tables.len());
    let mut cycle_detected = false;

    for table in tables {
        visit(table.as_str(), &adjacency, &mut visited, &mut on_stack, &mut insertion_order, &mut cycle_detected);
    }

    if cycle_detected {
        warn!("cycle detected among foreign-key edges; insertion order is best-effort");
    }

    let deletion_order: Vec<String> = insertion_order.iter().rev().map(|s| s.to_string()).collect();
    let insertion_order: Vec<String> = insertion_order.into_iter().map(str::to_string).collect();

    Plan { insertion_order, deletion_order, cycle_detected }
}

fn visit<'a>(
    table: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    order: &mut Vec<&'a str>,
    cycle_detected: &mut bool,
) {
    if visited.contains(table) {
        return;
    }
    if on_stack.contains(table) {
        *cycle_detected = true;
        return;
    }

    on_stack.insert(table);
    if let Some(refs) = adjacency.get(table) {
        for referenced in refs {
            visit(referenced, adjacency, visited, on_stack, order, cycle_detected);
        }
    }
    on_stack.remove(table);

    visited.insert(table);
    order.push(table);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn referenced_tables_precede_dependents() {
        let tables = names(&["users", "orders", "products", "order_items"]);
        let edges = vec![
            ForeignKeyEdge::new("orders", "users"),
            ForeignKeyEdge::new("order_items", "orders"),
            ForeignKeyEdge::new("order_items", "products"),
        ];

        let result = plan(&tables, &edges);

        assert_eq!(result.insertion_order, names(&["users", "orders", "products", "order_items"]));
        assert!(!result.cycle_detected);
    }

    #[test]
    fn deletion_order_is_exact_reverse_of_insertion_order() {
        let tables = names(&["users", "orders", "products", "order_items"]);
        let edges = vec![
            ForeignKeyEdge::new("orders", "users"),
            ForeignKeyEdge::new("order_items", "orders"),
            ForeignKeyEdge::new("order_items", "products"),
        ];

        let result = plan(&tables, &edges);
        let mut expected_deletion = result.insertion_order.clone();
        expected_deletion.reverse();
        assert_eq!(result.deletion_order, expected_deletion);
    }

    #[test]
    fn edges_pointing_outside_the_table_set_are_ignored() {
        let tables = names(&["orders"]);
        let edges = vec![ForeignKeyEdge::new("orders", "users")];

        let result = plan(&tables, &edges);
        assert_eq!(result.insertion_order, names(&["orders"]));
    }

    #[test]
    fn a_cycle_emits_both_participants_and_is_flagged() {
        let tables = names(&["a", "b"]);
        let edges = vec![ForeignKeyEdge::new("a", "b"), ForeignKeyEdge::new("b", "a")];

        let result = plan(&tables, &edges);

        assert!(result.cycle_detected);
        assert_eq!(result.insertion_order.len(), 2);
        assert!(result.insertion_order.contains(&"a".to_string()));
        assert!(result.insertion_order.contains(&"b".to_string()));
    }

    #[test]
    fn tables_with_no_edges_keep_discovery_order() {
        let tables = names(&["alpha", "beta", "gamma"]);
        let result = plan(&tables, &[]);
        assert_eq!(result.insertion_order, tables);
    }
}
