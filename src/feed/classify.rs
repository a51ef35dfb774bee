// Event classification.
// Maps GitHub event types onto the action labels shown in reports.

use std::borrow::Cow;

use serde::Serialize;

use crate::github::RawEvent;

/// Known event types and their labels.
const ACTION_LABELS: &[(&str, &str)] = &[
    ("PushEvent", "Commits Pushed"),
    ("WatchEvent", "Repositories Starred"),
    ("CreateEvent", "Branches or Repositories Created"),
    ("DeleteEvent", "Branches or Tags Deleted"),
    ("ForkEvent", "Repositories Forked"),
    ("IssuesEvent", "Issues Opened or Updated"),
    ("IssueCommentEvent", "Issue Comments"),
    ("PullRequestEvent", "Pull Requests Opened or Updated"),
    ("PullRequestReviewEvent", "Pull Request Reviews"),
    ("PullRequestReviewCommentEvent", "Pull Request Review Comments"),
    ("PullRequestReviewThreadEvent", "Pull Request Review Threads"),
    ("ReleaseEvent", "Releases Published"),
    ("PublicEvent", "Repositories Made Public"),
    ("MemberEvent", "Collaborators Added"),
    ("GollumEvent", "Wiki Pages Edited"),
    ("CommitCommentEvent", "Commit Comments"),
    ("DiscussionEvent", "Discussions"),
    ("SponsorshipEvent", "Sponsorships"),
];

const EVENT_SUFFIX: &str = "Event";
const FALLBACK_QUALIFIER: &str = "Activity";

/// An event reduced to what the report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEvent {
    pub action: String,
    pub repo_name: String,
}

/// Label for an event type. Total: unknown types get `"<Name> Activity"`.
pub fn classify(event_type: &str) -> Cow<'static, str> {
    if let Some((_, label)) = ACTION_LABELS.iter().find(|(ty, _)| *ty == event_type) {
        return Cow::Borrowed(*label);
    }

    let trimmed = event_type.trim();
    let base = trimmed.strip_suffix(EVENT_SUFFIX).unwrap_or(trimmed).trim();
    if base.is_empty() {
        Cow::Owned(format!("Other {}", FALLBACK_QUALIFIER))
    } else {
        Cow::Owned(format!("{} {}", base, FALLBACK_QUALIFIER))
    }
}

pub fn classify_event(event: &RawEvent) -> ClassifiedEvent {
    ClassifiedEvent {
        action: classify(&event.event_type).into_owned(),
        repo_name: event.repo.name.clone(),
    }
}
