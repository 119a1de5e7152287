use crate::model::{de::deserialize_or_default, Node};
use serde::Deserialize;

/// An issue as returned by `GET /rest/api/3/issue/{key}`
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub fields: RawFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub summary: Option<String>,
    /// The description as an ADF document
    #[serde(default)]
    pub description: Option<Node>,
    pub status: RawNamed,
    #[serde(default)]
    pub priority: Option<RawNamed>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(rename = "issuetype")]
    pub issue_type: RawNamed,
    pub created: String,
    pub updated: String,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub subtasks: Vec<RawSubtask>,
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub attachment: Vec<RawAttachment>,
    pub comment: RawCommentPage,
}

/// Any Jira entity that only matters by its name (status, priority, type)
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSubtask {
    pub key: String,
    pub fields: RawSubtaskFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSubtaskFields {
    pub summary: String,
    pub status: RawNamed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttachment {
    pub filename: String,
    /// The download URL of the attachment
    pub content: String,
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommentPage {
    #[serde(default, deserialize_with = "deserialize_or_default")]
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    pub author: RawUser,
    #[serde(default)]
    pub body: Option<Node>,
    pub created: String,
}
