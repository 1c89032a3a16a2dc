// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Turns CSV membership rows into a payload map.

use tracing::{debug, warn};
use ugsync_domain::{
    DomainError, GROUP_COLUMN, GroupTarget, MembershipRow, PlatformUser, Resolution, USER_COLUMN,
    UserGroup, UserId, resolve,
};

use crate::payload::PayloadMap;

/// A row that did not make it into the payload, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// Why the row was skipped.
    pub reason: DomainError,
}

/// Result of reconciling a CSV against the group and user snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadBuild {
    /// Users bucketed per group target.
    pub payload: PayloadMap,
    /// Rows that were skipped, in CSV order.
    pub rejected: Vec<RowRejection>,
}

/// Resolves one membership row to a group target and a user.
///
/// Blank cells are rejected before any lookup happens. A group token may
/// resolve to an existing group or degrade into a creation request; a user
/// token must resolve to an existing user.
///
/// # Errors
///
/// Returns an error if:
/// - Either cell is blank
/// - The group token is a numeric ID that matches no group
/// - The user token matches no user by ID or email
pub fn resolve_row(
    row: &MembershipRow,
    users: &[PlatformUser],
    groups: &[UserGroup],
) -> Result<(GroupTarget, UserId), DomainError> {
    if row.group_token.trim().is_empty() {
        return Err(DomainError::BlankToken {
            column: GROUP_COLUMN,
        });
    }
    if row.user_token.trim().is_empty() {
        return Err(DomainError::BlankToken {
            column: USER_COLUMN,
        });
    }

    let group_resolution: Resolution = resolve(&row.group_token, groups);
    let user_resolution: Resolution = resolve(&row.user_token, users);

    let Some(target) = GroupTarget::from_resolution(group_resolution) else {
        return Err(DomainError::GroupNotFound {
            token: row.group_token.clone(),
        });
    };

    // Users are never created, so unmatched text is as fatal to the row as a missing ID.
    let Resolution::Canonical(user_id) = user_resolution else {
        return Err(DomainError::UserNotFound {
            token: row.user_token.clone(),
        });
    };

    Ok((target, UserId::new(user_id)))
}

/// Builds the payload map for a batch of CSV rows.
///
/// Rows that fail resolution are logged, recorded in
/// [`PayloadBuild::rejected`], and otherwise ignored.
#[must_use]
pub fn build_payload(
    rows: &[MembershipRow],
    users: &[PlatformUser],
    groups: &[UserGroup],
) -> PayloadBuild {
    let mut build: PayloadBuild = PayloadBuild::default();

    for row in rows {
        debug!(
            row = row.row_number,
            group = %row.group_token,
            user = %row.user_token,
            "Processing row"
        );

        match resolve_row(row, users, groups) {
            Ok((target, user_id)) => build.payload.push(target, user_id),
            Err(reason) => {
                warn!(row = row.row_number, "{reason}. Skipping row");
                build.rejected.push(RowRejection {
                    row_number: row.row_number,
                    reason,
                });
            }
        }
    }

    build
}
