//! Submission gate for the article editor.

use crate::models::ArticleDraft;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fields a draft must fill in before it is sent to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Title,
    Slug,
    CategoryId,
    Content,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::Title,
        RequiredField::Slug,
        RequiredField::CategoryId,
        RequiredField::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Slug => "slug",
            RequiredField::CategoryId => "category_id",
            RequiredField::Content => "content",
        }
    }

    fn is_missing(&self, draft: &ArticleDraft) -> bool {
        match self {
            RequiredField::Title => draft.title.is_empty(),
            RequiredField::Slug => draft.slug.is_empty(),
            RequiredField::CategoryId => draft.category_id.is_empty(),
            RequiredField::Content => draft.content.is_empty(),
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required fields: {}", join_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reject a draft with an empty title, slug, category or content.
///
/// Only emptiness is checked; whitespace counts as content.
pub fn validate_submission(draft: &ArticleDraft) -> Result<(), ValidationError> {
    let missing: Vec<RequiredField> = RequiredField::ALL
        .into_iter()
        .filter(|field| field.is_missing(draft))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}
