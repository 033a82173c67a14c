//! GitHub repository listing fetcher.
//!
//! Endpoint: `https://api.github.com/users/{user}/repos`, paginated
//! at 100 repos per page. A bearer token is optional but raises the
//! rate limit considerably.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use chrono::Local;
use log::info;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::GithubSettings;
use crate::model::Record;

const API_BASE: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
/// Long descriptions are cut to keep snapshot rows readable.
const DESCRIPTION_LIMIT: usize = 200;

/// The subset of the repository object the snapshot keeps.
#[derive(Debug, Deserialize)]
struct RepoInfo {
    name: Option<String>,
    full_name: Option<String>,
    html_url: Option<String>,
    description: Option<String>,
    #[serde(default)]
    private: bool,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    created_at: Option<String>,
    updated_at: Option<String>,
    pushed_at: Option<String>,
    /// Repository size in kilobytes.
    #[serde(default)]
    size: u64,
}

/// Fetches all repositories owned by the configured user.
pub fn fetch_repos(settings: &GithubSettings) -> Result<Vec<Record>> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let snapshot_date = Local::now().format("%Y-%m-%d").to_string();
    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        let url = format!(
            "{API_BASE}/users/{}/repos?per_page={PER_PAGE}&page={page}&type=owner&sort=updated",
            settings.username
        );

        let mut request = client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", settings.username.as_str());
        if let Some(token) = &settings.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().context("GitHub request failed")?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            bail!(
                "[403] GitHub rate limit hit. Configure a token or wait{}",
                rate_limit_hint(&response)
            );
        }
        if status == StatusCode::NOT_FOUND {
            bail!("[404] GitHub user '{}' not found", settings.username);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("[{}] Unexpected GitHub error: {}", status.as_u16(), body);
        }

        let batch: Vec<RepoInfo> = response.json().context("Invalid GitHub response body")?;
        if batch.is_empty() {
            break;
        }

        records.extend(batch.iter().map(|repo| simplify(repo, &snapshot_date)));
        page += 1;
    }

    info!(
        "Fetched {} repositories for user '{}'",
        records.len(),
        settings.username
    );
    Ok(records)
}

/// Reduces a repository object to the snapshot's flat field set.
fn simplify(repo: &RepoInfo, snapshot_date: &str) -> Record {
    let description: String = repo
        .description
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(DESCRIPTION_LIMIT)
        .collect();

    Record::from_pairs([
        ("name", repo.name.clone().unwrap_or_default()),
        ("full_name", repo.full_name.clone().unwrap_or_default()),
        ("html_url", repo.html_url.clone().unwrap_or_default()),
        ("description", description),
        (
            "visibility",
            if repo.private { "private" } else { "public" }.to_string(),
        ),
        ("language", repo.language.clone().unwrap_or_default()),
        ("stargazers_count", repo.stargazers_count.to_string()),
        ("forks_count", repo.forks_count.to_string()),
        ("open_issues_count", repo.open_issues_count.to_string()),
        ("created_at", repo.created_at.clone().unwrap_or_default()),
        ("updated_at", repo.updated_at.clone().unwrap_or_default()),
        ("pushed_at", repo.pushed_at.clone().unwrap_or_default()),
        ("size_kb", repo.size.to_string()),
        ("snapshot_date", snapshot_date.to_string()),
    ])
}

/// "Try again in ~Ns" suffix derived from the rate-limit reset header.
fn rate_limit_hint(response: &reqwest::blocking::Response) -> String {
    let reset = response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let Some(reset) = reset else {
        return String::new();
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!(". Try again in ~{}s", reset.saturating_sub(now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_flattens_and_truncates() {
        let repo = RepoInfo {
            name: Some("vigil".to_string()),
            full_name: Some("octocat/vigil".to_string()),
            html_url: Some("https://github.com/octocat/vigil".to_string()),
            description: Some("x".repeat(500)),
            private: false,
            language: None,
            stargazers_count: 42,
            forks_count: 3,
            open_issues_count: 1,
            created_at: None,
            updated_at: None,
            pushed_at: Some("2026-08-28T10:00:00Z".to_string()),
            size: 128,
        };

        let record = simplify(&repo, "2026-08-29");

        assert_eq!(record.get("name"), Some("vigil"));
        assert_eq!(record.get("visibility"), Some("public"));
        assert_eq!(record.get("stargazers_count"), Some("42"));
        assert_eq!(record.get("language"), Some(""));
        assert_eq!(record.get("description").map(str::len), Some(200));
        assert_eq!(record.get("snapshot_date"), Some("2026-08-29"));
    }
}
