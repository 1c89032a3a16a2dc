// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::resolver::Resolution;
use crate::types::GroupId;

/// Header of the CSV column holding group names or IDs.
pub const GROUP_COLUMN: &str = "group_name_or_id";

/// Header of the CSV column holding user emails or IDs.
pub const USER_COLUMN: &str = "user_email_or_id";

/// One data row of the membership CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRow {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// Group name or numeric group ID, untrimmed.
    pub group_token: String,
    /// User email or numeric user ID, untrimmed.
    pub user_token: String,
}

impl MembershipRow {
    /// Creates a membership row.
    #[must_use]
    pub fn new(row_number: usize, group_token: &str, user_token: &str) -> Self {
        Self {
            row_number,
            group_token: group_token.to_string(),
            user_token: user_token.to_string(),
        }
    }
}

/// The group a bucket of users is destined for.
///
/// The variant is the create-vs-update decision: `Existing` groups receive
/// an add-members call, `New` groups are created with the bucket as their
/// initial members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupTarget {
    /// A group that existed when the snapshot was taken.
    Existing(GroupId),
    /// A group to be created under this name.
    New(String),
}

impl GroupTarget {
    /// Converts a group token resolution into a target.
    ///
    /// Returns `None` for `Resolution::Missing`, i.e. a numeric ID that does
    /// not exist. Such a token never becomes a creation request.
    #[must_use]
    pub fn from_resolution(resolution: Resolution) -> Option<Self> {
        match resolution {
            Resolution::Canonical(id) => Some(Self::Existing(GroupId::new(id))),
            Resolution::Unmatched(name) => Some(Self::New(name)),
            Resolution::Missing => None,
        }
    }
}

impl std::fmt::Display for GroupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Existing(id) => write!(f, "group {id}"),
            Self::New(name) => write!(f, "new group '{name}'"),
        }
    }
}
