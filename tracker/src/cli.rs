//! CLI pieces shared by the three binaries

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use clap::{ArgAction, Args};
use github_api::Credentials;
use std::fmt;
use std::process::ExitCode;
use std::str::FromStr;

/// Organization and credential arguments
#[derive(Args, Debug)]
pub struct GitHubArgs {
    /// Organization to scan
    #[arg(short, long)]
    pub organization: String,

    /// Your GitHub username
    #[arg(short, long, env = "GITHUB_USERNAME")]
    pub username: String,

    /// Your GitHub password or personal access token
    #[arg(short, long, env = "GITHUB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Longest look-back window accepted on the command line
pub const MAX_DAYS: i64 = 36_500;

/// Look-back window for the digests
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Days to look back (0 to 36500)
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=MAX_DAYS))]
    pub days: i64,
}

impl GitHubArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Reference to an issue in the form `{account}/{repository}/issues/{number}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub account: String,
    pub repository: String,
    pub number: u64,
}

impl FromStr for IssueRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            [account, repository, "issues", number]
                if !account.is_empty() && !repository.is_empty() =>
            {
                let number = number
                    .parse()
                    .map_err(|_| anyhow!("invalid issue number in {:?}", s))?;
                Ok(Self {
                    account: account.to_string(),
                    repository: repository.to_string(),
                    number,
                })
            }
            _ => bail!(
                "expected {{account}}/{{repository}}/issues/{{number}}, got {:?}",
                s
            ),
        }
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/issues/{}", self.account, self.repository, self.number)
    }
}

/// Parse an Olson timezone name such as `America/Los_Angeles`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| anyhow!("unknown timezone {:?}: {}", name, e))
}

/// Print the full error chain and map failures to exit status 2
pub fn exit_status(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\nError: {:?}\n", err);
            ExitCode::from(2)
        }
    }
}
