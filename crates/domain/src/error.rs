// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Reasons a CSV membership row cannot contribute to the payload.
///
/// None of these are fatal. The reconciliation step logs them and moves on
/// to the next row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The group or user cell is empty or whitespace only.
    BlankToken {
        /// Which column was blank.
        column: &'static str,
    },
    /// The group token was a numeric ID that matches no existing group.
    GroupNotFound {
        /// The token as it appeared in the CSV.
        token: String,
    },
    /// The user token matched no user, either by ID or by email.
    UserNotFound {
        /// The token as it appeared in the CSV.
        token: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankToken { column } => {
                write!(f, "CSV row has no value for '{column}'")
            }
            Self::GroupNotFound { token } => {
                write!(f, "Group ({token}) not found on the platform")
            }
            Self::UserNotFound { token } => {
                write!(f, "User ({token}) not found on the platform")
            }
        }
    }
}

impl std::error::Error for DomainError {}
