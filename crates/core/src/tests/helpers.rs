// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Mutex;
use ugsync_domain::{GroupId, GroupMember, MembershipRow, PlatformUser, UserGroup, UserId};

use crate::GroupDirectory;

pub fn create_test_group(id: u64, name: &str) -> UserGroup {
    UserGroup {
        id: GroupId::new(id),
        name: name.to_string(),
        description: None,
        users: Vec::new(),
        user_count: Some(0),
    }
}

pub fn create_test_user(id: u64, email: &str) -> PlatformUser {
    PlatformUser {
        user_id: UserId::new(id),
        email: Some(email.to_string()),
        display_name: None,
    }
}

/// Groups: Engineering (5), Design (9).
pub fn create_test_groups() -> Vec<UserGroup> {
    vec![create_test_group(5, "Engineering"), create_test_group(9, "Design")]
}

/// Users: alice (42), bob (43), x@y.com (7).
pub fn create_test_users() -> Vec<PlatformUser> {
    vec![
        create_test_user(42, "alice@example.com"),
        create_test_user(43, "bob@example.com"),
        create_test_user(7, "x@y.com"),
    ]
}

pub fn row(row_number: usize, group: &str, user: &str) -> MembershipRow {
    MembershipRow::new(row_number, group, user)
}

/// A remote call observed by [`FakeDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    AppendMembers(GroupId, Vec<UserId>),
    Create(String, Vec<UserId>),
}

/// In-memory stand-in for the platform's user group endpoints.
pub struct FakeDirectory {
    groups: Vec<UserGroup>,
    rejected_names: Vec<String>,
    calls: Mutex<Vec<DirectoryCall>>,
}

impl FakeDirectory {
    pub fn new(groups: Vec<UserGroup>) -> Self {
        Self {
            groups,
            rejected_names: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes creation of a group with this name fail.
    pub fn rejecting(mut self, name: &str) -> Self {
        self.rejected_names.push(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DirectoryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GroupDirectory for FakeDirectory {
    type Error = String;

    async fn append_members(
        &self,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> Result<Option<UserGroup>, String> {
        self.record(DirectoryCall::AppendMembers(group_id, user_ids.to_vec()));
        Ok(self.groups.iter().find(|g| g.id == group_id).map(|g| {
            let mut updated: UserGroup = g.clone();
            updated.users.extend(user_ids.iter().map(|&id| GroupMember { id, name: None }));
            updated
        }))
    }

    async fn create_with_members(&self, name: &str, user_ids: &[UserId]) -> Result<UserGroup, String> {
        self.record(DirectoryCall::Create(name.to_string(), user_ids.to_vec()));
        if self.rejected_names.iter().any(|n| n == name) {
            return Err(String::from("API returned status 400: Name is invalid"));
        }
        let mut group: UserGroup = create_test_group(1000 + self.calls().len() as u64, name);
        group.users = user_ids.iter().map(|&id| GroupMember { id, name: None }).collect();
        Ok(group)
    }

    fn group_url(&self, group_id: GroupId) -> String {
        format!("https://so.example.com/enterprise/user-groups/-{group_id}")
    }
}
