//! Upstream service URLs

/// GitHub REST API base URL
pub const GITHUB_API: &str = "https://api.github.com";

/// Tag listing endpoint for a GitHub `owner/name` repository
pub fn github_tags_url(repo: &str) -> String {
    format!("{GITHUB_API}/repos/{repo}/tags?per_page=100")
}

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("testsync/{}", env!("CARGO_PKG_VERSION"))
}
