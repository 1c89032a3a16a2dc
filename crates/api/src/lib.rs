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
#![allow(clippy::multiple_crate_versions)]

//! HTTP layer of the user group synchronizer.
//!
//! [`Transport`] owns the authenticated session and its TLS decision,
//! [`CallEngine`] turns paginated reads into one collection, and
//! [`UserGroupClient`] / [`LegacyUserClient`] expose the resource
//! operations the reconciliation engine needs.

mod config;
mod csv_input;
mod error;
mod groups;
mod legacy;
mod paging;
mod transport;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use config::{ClientConfig, Platform, USER_AGENT};
pub use csv_input::{parse_membership_csv, read_membership_csv};
pub use error::{ApiError, ApiResult};
pub use groups::{GROUPS_PAGE_SIZE, GroupRequest, UserGroupClient, is_group_not_found};
pub use legacy::{LegacyUserClient, USERS_PAGE_SIZE};
pub use paging::{CallData, CallEngine, Paged};
pub use transport::{Outcome, Payload, QueryParams, Transport, is_tls_trust_failure};
