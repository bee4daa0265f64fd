use std::collections::VecDeque;

use log::info;
use serde::Serialize;
use sparsemc::{
    Direction, GraphTransitions, ParseResult, SparseMatrix, linalg::fields::PseudoField,
};

/// Statistics about a parsed model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Summary {
    pub states: usize,
    pub rows: usize,
    pub groups: usize,
    pub columns: usize,
    pub entries: usize,
    pub stochastic: bool,
    pub deadlocks: Vec<usize>,
    pub reachable: usize,
    pub reaching_deadlocks: usize,
    pub matrix_bytes: usize,
    pub graph_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<RewardSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RewardSummary {
    pub entries: usize,
    pub matrix_bytes: usize,
}

/// States visited by a breadth-first search from *initial* along *graph*.
fn explore(graph: &GraphTransitions, initial: impl IntoIterator<Item = usize>) -> Vec<bool> {
    let mut visited = vec![false; graph.state_count()];
    let mut queue = VecDeque::new();
    for state in initial {
        if !visited[state] {
            visited[state] = true;
            queue.push_back(state);
        }
    }
    while let Some(state) = queue.pop_front() {
        for &next in graph.successors(state) {
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    visited
}

fn count(visited: &[bool]) -> usize {
    visited.iter().filter(|&&visited| visited).count()
}

pub fn summarize<F: PseudoField>(
    model: &ParseResult<F>,
    rewards: Option<&SparseMatrix<F>>,
) -> Summary {
    let forward = GraphTransitions::new(&model.matrix, Direction::Forward);
    let backward = GraphTransitions::new(&model.matrix, Direction::Backward);
    let reachable = if forward.state_count() > 0 {
        count(&explore(&forward, [0]))
    } else {
        0
    };
    let reaching_deadlocks = count(&explore(&backward, model.deadlocks.iter().copied()));

    Summary {
        states: model.state_count(),
        rows: model.matrix.row_count(),
        groups: model.matrix.row_group_count(),
        columns: model.matrix.column_count(),
        entries: model.matrix.entry_count(),
        stochastic: model.matrix.is_stochastic(),
        deadlocks: model.deadlocks.clone(),
        reachable,
        reaching_deadlocks,
        matrix_bytes: model.matrix.size_in_memory(),
        graph_bytes: forward.size_in_memory() + backward.size_in_memory(),
        rewards: rewards.map(|rewards| RewardSummary {
            entries: rewards.entry_count(),
            matrix_bytes: rewards.size_in_memory(),
        }),
    }
}

impl Summary {
    pub fn log(&self) {
        info!(
            "Model: {} states, {} row groups, {} rows, {} columns, {} entries.",
            self.states, self.groups, self.rows, self.columns, self.entries
        );
        info!("Stochastic: {}.", self.stochastic);
        if !self.deadlocks.is_empty() {
            info!(
                "{} deadlock(s) repaired, {} state(s) can reach one of them.",
                self.deadlocks.len(),
                self.reaching_deadlocks
            );
        }
        info!("{} state(s) reachable from state 0.", self.reachable);
        info!(
            "Memory: matrix {} bytes, graphs {} bytes.",
            self.matrix_bytes, self.graph_bytes
        );
        if let Some(rewards) = &self.rewards {
            info!(
                "Rewards: {} entries, {} bytes.",
                rewards.entries, rewards.matrix_bytes
            );
        }
    }
}
