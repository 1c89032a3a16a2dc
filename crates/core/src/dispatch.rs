// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sends a payload map to the remote platform, one group at a time.

use tracing::{debug, info, warn};
use ugsync_domain::{GroupId, GroupTarget, UserGroup, UserId};

use crate::payload::PayloadMap;

/// The remote operations reconciliation needs.
///
/// Implemented by the HTTP resource client; tests use an in-memory fake.
pub trait GroupDirectory: Sync {
    /// Error reported by a failed remote call.
    type Error: std::fmt::Display + Send;

    /// Adds users to an existing group.
    ///
    /// Resolves to `Ok(None)` when the platform reports that the group does
    /// not exist.
    fn append_members(
        &self,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> impl Future<Output = Result<Option<UserGroup>, Self::Error>> + Send;

    /// Creates a group with the given initial members and an empty description.
    fn create_with_members(
        &self,
        name: &str,
        user_ids: &[UserId],
    ) -> impl Future<Output = Result<UserGroup, Self::Error>> + Send;

    /// Returns the browser URL of a group's page.
    fn group_url(&self, group_id: GroupId) -> String;
}

/// What happened to one group target during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Users were added to an existing group.
    Updated {
        /// The group as returned by the platform.
        group: UserGroup,
        /// How many user IDs were sent.
        added: usize,
    },
    /// A new group was created with the users as members.
    Created {
        /// The created group.
        group: UserGroup,
        /// How many user IDs were sent.
        added: usize,
    },
    /// The platform no longer knows the group; it was skipped.
    NotFound {
        /// The group ID from the snapshot.
        group_id: GroupId,
    },
    /// The remote call failed; the group was skipped.
    Failed {
        /// The target that could not be applied.
        target: GroupTarget,
        /// The failure as reported by the directory.
        reason: String,
    },
}

/// Per-group outcomes of a dispatch run, in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// One outcome per payload bucket.
    pub outcomes: Vec<GroupOutcome>,
}

impl DispatchReport {
    /// Number of groups created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Created { .. }))
    }

    /// Number of existing groups that received members.
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Updated { .. }))
    }

    /// Number of groups skipped because the platform did not find them.
    #[must_use]
    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::NotFound { .. }))
    }

    /// Number of groups whose remote call failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

/// Applies every bucket of the payload map through `directory`.
///
/// Existing groups get an add-members call, new groups a create call.
/// Groups are processed sequentially and a failure on one group never stops
/// the others.
pub async fn dispatch<D: GroupDirectory>(payload: &PayloadMap, directory: &D) -> DispatchReport {
    let mut outcomes: Vec<GroupOutcome> = Vec::with_capacity(payload.len());

    for bucket in payload {
        let outcome: GroupOutcome = match &bucket.target {
            GroupTarget::Existing(group_id) => {
                add_to_existing(directory, *group_id, &bucket.user_ids).await
            }
            GroupTarget::New(name) => create_new(directory, name, &bucket.user_ids).await,
        };
        outcomes.push(outcome);
    }

    DispatchReport { outcomes }
}

async fn add_to_existing<D: GroupDirectory>(
    directory: &D,
    group_id: GroupId,
    user_ids: &[UserId],
) -> GroupOutcome {
    match directory.append_members(group_id, user_ids).await {
        Ok(Some(group)) => {
            info!(
                "Added {} user(s) to user group '{}' with ID {}",
                user_ids.len(),
                group.name,
                group.id
            );
            info!("View user group at {}", directory.group_url(group.id));
            GroupOutcome::Updated {
                group,
                added: user_ids.len(),
            }
        }
        Ok(None) => {
            debug!("Skipped user group {group_id}");
            GroupOutcome::NotFound { group_id }
        }
        Err(err) => {
            warn!("Failed to add users to user group {group_id}: {err}");
            GroupOutcome::Failed {
                target: GroupTarget::Existing(group_id),
                reason: err.to_string(),
            }
        }
    }
}

async fn create_new<D: GroupDirectory>(
    directory: &D,
    name: &str,
    user_ids: &[UserId],
) -> GroupOutcome {
    match directory.create_with_members(name, user_ids).await {
        Ok(group) => {
            info!(
                "Created user group '{}' with ID {} and added {} user(s) to it",
                group.name,
                group.id,
                user_ids.len()
            );
            info!("View user group at {}", directory.group_url(group.id));
            GroupOutcome::Created {
                group,
                added: user_ids.len(),
            }
        }
        Err(err) => {
            warn!("Failed to create user group '{name}': {err}");
            GroupOutcome::Failed {
                target: GroupTarget::New(name.to_string()),
                reason: err.to_string(),
            }
        }
    }
}
