//! Tree Utilities
//!
//! Helper functions for rendering tasks with subtasks.

use std::collections::{HashMap, HashSet};

use crate::models::Task;

/// Render tasks as an indented tree using recursive DFS
/// Returns (Task, depth) pairs in display order
///
/// Tasks whose parent is not in the slice are shown as roots, and so is the
/// first task of a parent cycle. Children of a collapsed task are skipped.
pub fn flatten_tasks(tasks: &[Task], collapsed: &HashSet<u32>) -> Vec<(Task, usize)> {
    let ids: HashSet<u32> = tasks.iter().map(|t| t.id).collect();

    // Build parent -> children map
    let mut children_map: HashMap<Option<u32>, Vec<&Task>> = HashMap::new();
    for task in tasks {
        let parent = task.parent_id.filter(|p| ids.contains(p) && *p != task.id);
        children_map.entry(parent).or_default().push(task);
    }

    for children in children_map.values_mut() {
        children.sort_by_key(|t| (t.position, t.id));
    }

    fn collect(
        parent_id: Option<u32>,
        depth: usize,
        children_map: &HashMap<Option<u32>, Vec<&Task>>,
        collapsed: &HashSet<u32>,
        visited: &mut HashSet<u32>,
        result: &mut Vec<(Task, usize)>,
    ) {
        let Some(children) = children_map.get(&parent_id) else { return };
        for task in children {
            if !visited.insert(task.id) {
                continue;
            }
            result.push(((*task).clone(), depth));
            if !collapsed.contains(&task.id) {
                collect(Some(task.id), depth + 1, children_map, collapsed, visited, result);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut result = Vec::new();
    collect(None, 0, &children_map, collapsed, &mut visited, &mut result);

    // Parent cycles have no root; surface them instead of dropping them
    let mut remaining: Vec<&Task> = tasks.iter().filter(|t| !visited.contains(&t.id)).collect();
    remaining.sort_by_key(|t| (t.position, t.id));
    for task in remaining {
        if !visited.insert(task.id) {
            continue;
        }
        result.push((task.clone(), 0));
        if !collapsed.contains(&task.id) {
            collect(Some(task.id), 1, &children_map, collapsed, &mut visited, &mut result);
        }
    }
    result
}

/// Number of direct subtasks per task id
pub fn child_counts(tasks: &[Task]) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for parent in tasks.iter().filter_map(|t| t.parent_id) {
        *counts.entry(parent).or_insert(0) += 1;
    }
    counts
}
