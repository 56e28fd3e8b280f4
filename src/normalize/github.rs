//! Recognize the many spellings of a GitHub repository reference found in
//! `repository.url` fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RepoUrlError;

// GitHub user names cannot contain dots, so `host.tld/path` never matches here.
static SHORTHAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:github:)?([\w-]+)/([\w.-]+)$").expect("shorthand regex"));

// scheme://[user@]host[:port]/path, with an optional `git+` prefix on the scheme.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:git\+)?[a-z][a-z0-9+.-]*://(?:[^@/]+@)?([^/:]+)(?::\d+)?/(.*)$")
        .expect("url regex")
});

// scp-like ssh syntax: git@github.com:user/repo.git
static SCP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[^@/:]+@)?([^/:]+):(.*)$").expect("scp regex"));

static BARE_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:www\.)?github\.com)/(.*)$").expect("bare host regex"));

/// A repository on github.com.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub user: String,
    pub repo: String,
    pub branch: Option<String>,
}

impl GitHubRepo {
    /// Browser URL of the repository, pointing at `branch` when one other than
    /// `master` was named.
    pub fn https_url(&self) -> String {
        let base = format!("https://github.com/{}/{}", self.user, self.repo);
        match self.branch.as_deref() {
            Some(branch) if branch != "master" => format!("{}/tree/{}", base, branch),
            _ => base,
        }
    }
}

/// Parse a repository reference into its GitHub coordinates.
///
/// Accepts full URLs (`https`, `git+https`, `git`, `ssh`), scp-style
/// `git@github.com:user/repo`, `github:user/repo` and bare `user/repo`.
/// A trailing `#branch` fragment selects a branch.
pub fn parse_github_url(url: &str) -> Result<GitHubRepo, RepoUrlError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(RepoUrlError::Empty);
    }

    let (location, fragment) = match url.split_once('#') {
        Some((loc, frag)) if !frag.is_empty() => (loc, Some(frag.to_string())),
        Some((loc, _)) => (loc, None),
        None => (url, None),
    };
    let location = location.split('?').next().unwrap_or(location);

    if let Some(caps) = SHORTHAND_RE.captures(location) {
        return Ok(GitHubRepo {
            user: caps[1].to_string(),
            repo: strip_git_suffix(&caps[2]).to_string(),
            branch: fragment,
        });
    }

    let (host, path) = if let Some(caps) = URL_RE.captures(location) {
        (caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = BARE_HOST_RE.captures(location) {
        (caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = SCP_RE.captures(location) {
        (caps[1].to_string(), caps[2].to_string())
    } else {
        return Err(RepoUrlError::NotGitHub(url.to_string()));
    };

    let host = host.to_ascii_lowercase();
    if host.trim_start_matches("www.") != "github.com" {
        return Err(RepoUrlError::NotGitHub(url.to_string()));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (user, repo) = match segments.as_slice() {
        [user, repo, ..] => (*user, strip_git_suffix(repo)),
        _ => return Err(RepoUrlError::MissingSegment(url.to_string())),
    };
    if repo.is_empty() {
        return Err(RepoUrlError::MissingSegment(url.to_string()));
    }

    // https://github.com/user/repo/tree/<branch>
    let branch = fragment.or_else(|| match segments.as_slice() {
        [_, _, "tree" | "blob", branch, ..] => Some(branch.to_string()),
        _ => None,
    });

    Ok(GitHubRepo {
        user: user.to_string(),
        repo: repo.to_string(),
        branch,
    })
}

fn strip_git_suffix(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}
