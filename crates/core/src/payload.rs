// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use ugsync_domain::{GroupTarget, UserId};

/// The users bound for a single group target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBucket {
    /// Where the users go.
    pub target: GroupTarget,
    /// Resolved user IDs in CSV order. Duplicates are kept.
    pub user_ids: Vec<UserId>,
}

/// Resolved user IDs bucketed per group target.
///
/// Buckets keep the order in which their target was first seen, so dispatch
/// follows the CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadMap {
    buckets: Vec<GroupBucket>,
    index: HashMap<GroupTarget, usize>,
}

impl PayloadMap {
    /// Creates an empty payload map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user to the bucket for `target`, creating the bucket on first use.
    pub fn push(&mut self, target: GroupTarget, user_id: UserId) {
        if let Some(&slot) = self.index.get(&target) {
            self.buckets[slot].user_ids.push(user_id);
            return;
        }
        self.index.insert(target.clone(), self.buckets.len());
        self.buckets.push(GroupBucket {
            target,
            user_ids: vec![user_id],
        });
    }

    /// Returns the users bucketed for `target`, if any.
    #[cfg(test)]
    #[must_use]
    pub fn get(&self, target: &GroupTarget) -> Option<&[UserId]> {
        self.index
            .get(target)
            .map(|&slot| self.buckets[slot].user_ids.as_slice())
    }

    /// Iterates over buckets in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, GroupBucket> {
        self.buckets.iter()
    }

    /// Number of distinct group targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no row made it into the payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for &'a PayloadMap {
    type Item = &'a GroupBucket;
    type IntoIter = std::slice::Iter<'a, GroupBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
