// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # ugsync
//!
//! Adds users to user groups from a CSV file.
//!
//! Each CSV row names a group (by name or numeric ID) and a user (by email
//! or numeric ID). Rows are resolved against the groups and users already
//! on the instance; known groups get the users appended, unknown group
//! names are created with their users.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;
use ugsync::{DispatchReport, PayloadBuild, build_payload, dispatch};
use ugsync_api::{
    ApiError, ClientConfig, LegacyUserClient, UserGroupClient, read_membership_csv,
};
use ugsync_domain::{MembershipRow, PlatformUser, UserGroup};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(args.log_level().into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Add users to user groups from a CSV file
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the instance
    #[arg(long)]
    url: Option<String>,

    /// API access token
    #[arg(long)]
    token: Option<String>,

    /// API key; required on Enterprise to read user email addresses
    #[arg(long)]
    key: Option<String>,

    /// CSV file with `group_name_or_id` and `user_email_or_id` columns
    #[arg(long)]
    csv: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    async fn run(self) -> Result<()> {
        let config: ClientConfig = ClientConfig::new(self.url, self.token, self.key)?;
        let csv_path: PathBuf = self
            .csv
            .ok_or(ApiError::MissingConfiguration("Please provide a path to the CSV file."))?;

        let client: UserGroupClient = UserGroupClient::connect(&config).await?;
        // Hosted instances are rejected here, before anything is fetched.
        let directory: LegacyUserClient =
            LegacyUserClient::new(client.transport().clone(), client.platform(), &config)?;

        info!("Getting users from the API...");
        let users: Vec<PlatformUser> = directory.users_with_email().await?;
        info!("Found {} user(s)", users.len());

        info!("Getting user groups from the API...");
        let groups: Vec<UserGroup> = client.list_groups().await?.into_items()?;
        info!("Found {} user group(s)", groups.len());

        let rows: Vec<MembershipRow> = read_membership_csv(&csv_path)?;
        info!("Read {} row(s) from {}", rows.len(), csv_path.display());

        let build: PayloadBuild = build_payload(&rows, &users, &groups);
        if !build.rejected.is_empty() {
            warn!("Skipped {} row(s) that could not be resolved", build.rejected.len());
        }

        let report: DispatchReport = dispatch(&build.payload, &client).await;
        log_summary(&report);

        info!("User groups have been created and/or updated!");
        Ok(())
    }
}

fn log_summary(report: &DispatchReport) {
    info!(
        "{} group(s) updated, {} created, {} not found, {} failed",
        report.updated(),
        report.created(),
        report.not_found(),
        report.failed()
    );
    if report.failed() > 0 {
        warn!("Some user groups could not be changed; see the messages above");
    }
}
