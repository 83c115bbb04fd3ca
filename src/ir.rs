use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level payload as returned by the GitHub GraphQL `user` query.
///
/// Accepts both the bare `{ "user": ... }` object and the full response
/// envelope `{ "data": { "user": ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LanguageStatsInput {
    Envelope { data: UserData },
    Bare(UserData),
}

impl LanguageStatsInput {
    pub fn into_user(self) -> User {
        match self {
            Self::Envelope { data } => data.user,
            Self::Bare(data) => data.user,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<Repository>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Internal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    pub is_template: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub languages: LanguageConnection,
}

impl Repository {
    /// Flattens the GraphQL edge list into plain samples.
    pub fn samples(&self) -> impl Iterator<Item = LanguageSample<'_>> {
        self.languages.edges.iter().map(|edge| LanguageSample {
            size: edge.size,
            name: edge.node.name.as_str(),
            color: edge.node.color.as_deref(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConnection {
    #[serde(default)]
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: Language,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub name: String,
    /// GitHub reports `null` for languages without a linguist color.
    pub color: Option<String>,
}

/// One `(size, name, color)` observation from a single repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSample<'a> {
    pub size: u64,
    pub name: &'a str,
    pub color: Option<&'a str>,
}

/// Sum of all accepted samples sharing a language name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageTotal {
    pub size: u64,
    /// Color of the first sample seen for this name.
    pub color: Option<String>,
}

/// A selected language with its layout weight.
///
/// `size` is the mapped value used only to weight the layout; the raw byte
/// total stays in the aggregated map and drives the percentage label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub name: String,
    pub size: f64,
    pub color: Option<String>,
}
