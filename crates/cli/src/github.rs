//! GitHub API integration

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::blocking::Client,
    token: Option<String>,
    api_base: String,
}

/// A comment on an issue or pull request
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("size-report"));

        if let Some(ref t) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", t))
                    .map_err(|_| Error::GitHub("Invalid token format".to_string()))?,
            );
        }

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at another API root (GitHub Enterprise)
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self> {
        let url = url::Url::parse(api_base)?;
        self.api_base = url.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn require_token(&self, action: &str) -> Result<()> {
        if !self.is_authenticated() {
            return Err(Error::GitHub(format!(
                "GitHub token required for {}",
                action
            )));
        }
        Ok(())
    }

    pub fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<IssueComment>> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments?per_page=100",
            self.api_base, owner, repo, issue_number
        );

        let comments = self
            .client
            .get(&url)
            .send()?
            .error_for_status()
            .map_err(|e| Error::GitHub(format!("Failed to list comments: {}", e)))?
            .json()?;

        Ok(comments)
    }

    /// Find the first comment whose body starts with `prefix`
    pub fn find_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        prefix: &str,
    ) -> Result<Option<IssueComment>> {
        let comments = self.list_issue_comments(owner, repo, issue_number)?;
        Ok(find_comment_by_prefix(comments, prefix))
    }

    pub fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<String> {
        self.require_token("creating comments")?;

        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, owner, repo, issue_number
        );

        let payload = serde_json::json!({ "body": body });

        let response: IssueComment = self
            .client
            .post(&url)
            .json(&payload)
            .send()?
            .error_for_status()
            .map_err(|e| Error::GitHub(format!("Failed to create comment: {}", e)))?
            .json()?;

        Ok(response.html_url)
    }

    pub fn update_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
        body: &str,
    ) -> Result<String> {
        self.require_token("updating comments")?;

        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, owner, repo, comment_id
        );

        let payload = serde_json::json!({ "body": body });

        let response: IssueComment = self
            .client
            .patch(&url)
            .json(&payload)
            .send()?
            .error_for_status()
            .map_err(|e| Error::GitHub(format!("Failed to update comment: {}", e)))?
            .json()?;

        Ok(response.html_url)
    }
}

pub fn find_comment_by_prefix(comments: Vec<IssueComment>, prefix: &str) -> Option<IssueComment> {
    comments.into_iter().find(|c| {
        c.body
            .as_deref()
            .map(|body| body.starts_with(prefix))
            .unwrap_or(false)
    })
}

/// Parse a GitHub repository URL or string into owner and repo
pub fn parse_github_repo(repo: &str) -> Result<(String, String)> {
    let repo = repo.trim();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    // Try simple owner/repo format
    if !repo.contains("://") && !repo.contains('@') && !repo.contains("github.com") {
        let parts: Vec<&str> = repo.split('/').collect();
        if parts.len() == 2 && parts.iter().all(|p| !p.is_empty()) {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try URL format
    if let Ok(url) = url::Url::parse(repo) {
        let path = url.path().trim_start_matches('/');
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try SSH format
    if let Some(path) = repo.strip_prefix("git@github.com:") {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() == 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    // Try github.com/owner/repo
    if let Some(path) = repo.strip_prefix("github.com/") {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() >= 2 {
            return Ok((parts[0].to_string(), parts[1].to_string()));
        }
    }

    Err(Error::GitHub(format!(
        "Could not parse GitHub repository from: {}",
        repo
    )))
}

#[derive(Deserialize)]
struct PullRequestEvent {
    pull_request: Option<PullRequestRef>,
}

#[derive(Deserialize)]
struct PullRequestRef {
    number: u64,
}

/// Extract the pull request number from a workflow event payload
pub fn pull_request_number(event: &str) -> Result<Option<u64>> {
    let event: PullRequestEvent = serde_json::from_str(event)?;
    Ok(event.pull_request.map(|pr| pr.number))
}

/// Environment variables for GitHub Actions
#[derive(Debug, Clone, Default)]
pub struct GitHubActionsEnv {
    pub token: Option<String>,
    pub repository: Option<String>,
    pub event_path: Option<String>,
    pub api_url: Option<String>,
}

impl GitHubActionsEnv {
    pub fn from_env() -> Self {
        Self {
            token: std::env::var("GITHUB_TOKEN").ok(),
            repository: std::env::var("GITHUB_REPOSITORY").ok(),
            event_path: std::env::var("GITHUB_EVENT_PATH").ok(),
            api_url: std::env::var("GITHUB_API_URL").ok(),
        }
    }

    pub fn is_github_actions() -> bool {
        std::env::var("GITHUB_ACTIONS")
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    /// Pull request number of the triggering event, if any
    pub fn pull_request_number(&self) -> Result<Option<u64>> {
        let Some(path) = self.event_path.as_deref() else {
            return Ok(None);
        };

        let event = std::fs::read_to_string(Path::new(path)).map_err(|e| Error::FileRead {
            path: path.to_string(),
            source: e,
        })?;

        pull_request_number(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn comment(id: u64, body: Option<&str>) -> IssueComment {
        IssueComment {
            id,
            body: body.map(str::to_string),
            html_url: format!("https://github.com/o/r/pull/1#issuecomment-{}", id),
        }
    }

    #[test]
    fn test_parse_github_repo_simple() {
        let (owner, repo) = parse_github_repo("owner/repo").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_github_repo_https() {
        let (owner, repo) = parse_github_repo("https://github.com/owner/repo").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_github_repo_ssh() {
        let (owner, repo) = parse_github_repo("git@github.com:owner/repo.git").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_github_repo_invalid() {
        assert!(parse_github_repo("just-a-name").is_err());
    }

    #[test]
    fn test_find_comment_by_prefix() {
        let comments = vec![
            comment(1, None),
            comment(2, Some("LGTM")),
            comment(3, Some("## size-limit report 📦 \r\n| Path |")),
            comment(4, Some("## size-limit report 📦 \r\nolder")),
        ];

        let found = find_comment_by_prefix(comments, "## size-limit report 📦 ");
        assert_eq!(found.map(|c| c.id), Some(3));

        assert!(find_comment_by_prefix(vec![comment(1, Some("hi"))], "## size").is_none());
    }

    #[test]
    fn test_pull_request_number() {
        let event = r#"{ "action": "opened", "pull_request": { "number": 42, "title": "x" } }"#;
        assert_eq!(pull_request_number(event).unwrap(), Some(42));

        let event = r#"{ "ref": "refs/heads/main" }"#;
        assert_eq!(pull_request_number(event).unwrap(), None);

        assert!(pull_request_number("not json").is_err());
    }

    #[test]
    fn test_pull_request_number_from_event_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pull_request": {{ "number": 7 }} }}"#).unwrap();

        let env = GitHubActionsEnv {
            event_path: Some(file.path().display().to_string()),
            ..Default::default()
        };
        assert_eq!(env.pull_request_number().unwrap(), Some(7));

        let env = GitHubActionsEnv::default();
        assert_eq!(env.pull_request_number().unwrap(), None);
    }

    #[test]
    fn test_with_api_base() {
        let client = GitHubClient::new(None)
            .unwrap()
            .with_api_base("https://ghe.example.com/api/v3/")
            .unwrap();
        assert_eq!(client.api_base, "https://ghe.example.com/api/v3");
        assert!(!client.is_authenticated());

        assert!(GitHubClient::new(None)
            .unwrap()
            .with_api_base("not a url")
            .is_err());
    }

    #[test]
    fn test_create_comment_requires_token() {
        let client = GitHubClient::new(None).unwrap();
        let result = client.create_issue_comment("o", "r", 1, "body");
        assert!(matches!(result, Err(Error::GitHub(_))));
    }
}
