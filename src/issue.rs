//! # The simplified issue
//!
//! The shape that the proxy hands to the frontend: flat names instead of
//! nested Jira entities and rendered HTML instead of ADF documents.

use crate::jira::{RawAttachment, RawComment, RawIssue, RawSubtask};
use crate::render::render;
use serde::Serialize;

/// What is shown when nobody is assigned to an issue
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueView {
    pub key: String,
    pub summary: Option<String>,
    /// The description, rendered to HTML
    pub description: String,
    pub status: String,
    pub priority: Option<String>,
    pub assignee: String,
    pub issue_type: String,
    pub created: String,
    pub updated: String,
    pub subtasks: Vec<SubtaskView>,
    pub attachments: Vec<AttachmentView>,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtaskView {
    pub key: String,
    pub summary: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentView {
    pub filename: String,
    pub url: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub author: String,
    /// The comment body, rendered to HTML
    pub body: String,
    pub created: String,
}

impl From<RawIssue> for IssueView {
    fn from(issue: RawIssue) -> Self {
        let fields = issue.fields;
        Self {
            key: issue.key,
            summary: fields.summary,
            description: render(fields.description.as_ref()),
            status: fields.status.name,
            priority: fields.priority.map(|p| p.name),
            assignee: fields
                .assignee
                .map(|a| a.display_name)
                .unwrap_or_else(|| UNASSIGNED.to_owned()),
            issue_type: fields.issue_type.name,
            created: fields.created,
            updated: fields.updated,
            subtasks: fields.subtasks.into_iter().map(SubtaskView::from).collect(),
            attachments: fields
                .attachment
                .into_iter()
                .map(AttachmentView::from)
                .collect(),
            comments: fields
                .comment
                .comments
                .into_iter()
                .map(CommentView::from)
                .collect(),
        }
    }
}

impl From<RawSubtask> for SubtaskView {
    fn from(subtask: RawSubtask) -> Self {
        Self {
            key: subtask.key,
            summary: subtask.fields.summary,
            status: subtask.fields.status.name,
        }
    }
}

impl From<RawAttachment> for AttachmentView {
    fn from(attachment: RawAttachment) -> Self {
        Self {
            filename: attachment.filename,
            url: attachment.content,
            size: attachment.size,
        }
    }
}

impl From<RawComment> for CommentView {
    fn from(comment: RawComment) -> Self {
        Self {
            author: comment.author.display_name,
            body: render(comment.body.as_ref()),
            created: comment.created,
        }
    }
}
