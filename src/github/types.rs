//! Records returned by the GitHub REST API.
//!
//! Responses are decoded into `Raw*` shapes first and then checked field by field before
//! they become [`User`] / [`Repository`] values the rest of the crate relies on.

use serde::Deserialize;

use crate::error::FetchError;

pub type UserId = u64;

/// Account type reported by GitHub.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum AccountKind {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Other,
}

/// A search hit: one GitHub account.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub kind: AccountKind,
    pub score: Option<f64>,
}

/// A repository owned by a [`User`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
}

/// One page of `/search/users`.
#[derive(Clone, Debug, PartialEq)]
pub struct UserSearchPage {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    login: String,
    id: u64,
    #[serde(default)]
    avatar_url: String,
    html_url: String,
    #[serde(rename = "type", default)]
    kind: AccountKind,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUserSearch {
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRepository {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

fn check_url(what: &str, url: &str) -> Result<(), FetchError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(FetchError::Schema(format!("{what}: not an http(s) url: {url:?}")))
    }
}

impl TryFrom<RawUser> for User {
    type Error = FetchError;

    fn try_from(raw: RawUser) -> Result<Self, Self::Error> {
        if raw.id == 0 {
            return Err(FetchError::Schema("user: id must be non-zero".into()));
        }
        if raw.login.trim().is_empty() {
            return Err(FetchError::Schema(format!("user {}: empty login", raw.id)));
        }
        check_url("user html_url", &raw.html_url)?;
        Ok(Self {
            id: raw.id,
            login: raw.login,
            avatar_url: raw.avatar_url,
            html_url: raw.html_url,
            kind: raw.kind,
            score: raw.score,
        })
    }
}

impl TryFrom<RawRepository> for Repository {
    type Error = FetchError;

    fn try_from(raw: RawRepository) -> Result<Self, Self::Error> {
        if raw.id == 0 {
            return Err(FetchError::Schema("repository: id must be non-zero".into()));
        }
        if raw.name.trim().is_empty() {
            return Err(FetchError::Schema(format!("repository {}: empty name", raw.id)));
        }
        check_url("repository html_url", &raw.html_url)?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            description: raw.description.filter(|d| !d.trim().is_empty()),
            language: raw.language.filter(|l| !l.trim().is_empty()),
            html_url: raw.html_url,
            stargazers_count: raw.stargazers_count,
            forks_count: raw.forks_count,
        })
    }
}

impl TryFrom<RawUserSearch> for UserSearchPage {
    type Error = FetchError;

    fn try_from(raw: RawUserSearch) -> Result<Self, Self::Error> {
        let items = raw
            .items
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { total_count: raw.total_count, incomplete_results: raw.incomplete_results, items })
    }
}

/// Decode and validate a `/search/users` body.
pub fn decode_user_search(body: &str) -> Result<UserSearchPage, FetchError> {
    let raw: RawUserSearch = serde_json::from_str(body)?;
    raw.try_into()
}

/// Decode and validate a `/users/{owner}/repos` body.
pub fn decode_repositories(body: &str) -> Result<Vec<Repository>, FetchError> {
    let raw: Vec<RawRepository> = serde_json::from_str(body)?;
    raw.into_iter().map(Repository::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_search_page_and_ignores_extra_fields() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"login": "octocat", "id": 583231, "node_id": "x", "avatar_url": "https://a/1",
                 "html_url": "https://github.com/octocat", "type": "User", "score": 1.0},
                {"login": "octo-org", "id": 9919, "avatar_url": "https://a/2",
                 "html_url": "https://github.com/octo-org", "type": "Organization"}
            ]
        }"#;
        let page = decode_user_search(body).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].login, "octocat");
        assert_eq!(page.items[1].kind, AccountKind::Organization);
        assert_eq!(page.items[1].score, None);
    }

    #[test]
    fn unknown_account_type_is_tolerated() {
        let body = r#"{"total_count":1,"items":[{"login":"x","id":1,"html_url":"https://github.com/x","type":"Enterprise"}]}"#;
        let page = decode_user_search(body).unwrap();
        assert_eq!(page.items[0].kind, AccountKind::Other);
    }

    #[test]
    fn rejects_user_without_login() {
        let body = r#"{"total_count":1,"items":[{"login":" ","id":1,"html_url":"https://github.com/x"}]}"#;
        assert!(matches!(decode_user_search(body), Err(FetchError::Schema(_))));
    }

    #[test]
    fn rejects_missing_required_field() {
        let body = r#"[{"id": 1, "html_url": "https://github.com/o/r"}]"#;
        assert!(matches!(decode_repositories(body), Err(FetchError::Schema(_))));
    }

    #[test]
    fn repository_blank_description_becomes_none() {
        let body = r#"[{"id": 7, "name": "hello", "description": "", "language": null,
                        "html_url": "https://github.com/o/hello", "stargazers_count": 3}]"#;
        let repos = decode_repositories(body).unwrap();
        assert_eq!(repos[0].description, None);
        assert_eq!(repos[0].language, None);
        assert_eq!(repos[0].stargazers_count, 3);
        assert_eq!(repos[0].forks_count, 0);
    }

    #[test]
    fn rejects_non_http_url() {
        let body = r#"[{"id": 7, "name": "hello", "html_url": "javascript:alert(1)"}]"#;
        assert!(matches!(decode_repositories(body), Err(FetchError::Schema(_))));
    }
}
