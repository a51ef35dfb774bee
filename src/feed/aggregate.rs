// Aggregation engine.
// Groups classified events by action and repository into an ordered report.

use std::collections::HashMap;

use serde::Serialize;

use crate::github::RawEvent;

use super::classify::classify_event;

/// One action and the repositories it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub action: String,
    /// Repository name and count, highest count first.
    pub repos: Vec<RepoCount>,
    pub total_events: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCount {
    pub repo: String,
    pub count: u64,
}

/// Aggregated activity, busiest action first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub actions: Vec<ActionSummary>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Total events across all actions.
    pub fn total_events(&self) -> u64 {
        self.actions.iter().map(|a| a.total_events).sum()
    }

    pub fn get(&self, action: &str) -> Option<&ActionSummary> {
        self.actions.iter().find(|a| a.action == action)
    }
}

/// Accumulates counts while remembering first-seen order.
#[derive(Default)]
struct Bucket {
    index: HashMap<String, usize>,
    repos: Vec<RepoCount>,
}

impl Bucket {
    fn add(&mut self, repo: String) {
        match self.index.get(&repo) {
            Some(&i) => self.repos[i].count += 1,
            None => {
                self.index.insert(repo.clone(), self.repos.len());
                self.repos.push(RepoCount { repo, count: 1 });
            }
        }
    }
}

/// Group events by action and repository.
///
/// Actions are ordered by total descending, repositories by count
/// descending. Ties keep first-seen order from `events`.
pub fn aggregate(events: &[RawEvent]) -> Report {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Bucket)> = Vec::new();

    for event in events {
        let classified = classify_event(event);
        let slot = match index.get(&classified.action) {
            Some(&i) => i,
            None => {
                index.insert(classified.action.clone(), buckets.len());
                buckets.push((classified.action, Bucket::default()));
                buckets.len() - 1
            }
        };
        buckets[slot].1.add(classified.repo_name);
    }

    let mut actions: Vec<ActionSummary> = buckets
        .into_iter()
        .map(|(action, bucket)| {
            let mut repos = bucket.repos;
            // sort_by is stable, so equal counts stay in arrival order
            repos.sort_by(|a, b| b.count.cmp(&a.count));
            let total_events = repos.iter().map(|r| r.count).sum();
            ActionSummary {
                action,
                repos,
                total_events,
            }
        })
        .collect();
    actions.sort_by(|a, b| b.total_events.cmp(&a.total_events));

    Report { actions }
}
