// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod membership;
mod resolver;
mod types;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use membership::{GROUP_COLUMN, GroupTarget, MembershipRow, USER_COLUMN};
pub use resolver::{Resolvable, Resolution, is_literal_id, resolve};
pub use types::{GroupId, GroupMember, PlatformUser, UserGroup, UserId};
