//! Validation and record construction shared by the `POST /api/submissions` handler
//! and the client-side submission workflow.

use crate::{
    error::ValidationError,
    models::{Category, NewSubmission, SubmissionDraft},
};

/// Identity fields denormalized into every submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submitter {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A draft whose required fields are non-empty after trimming and whose category
/// has been coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub link: String,
    pub category: Category,
}

/// validate_draft
///
/// Trims every field, rejects blank `name`, `description` or `link`, and coerces
/// the category. Nothing is written on rejection.
pub fn validate_draft(draft: &SubmissionDraft) -> Result<ValidDraft, ValidationError> {
    let name = required(&draft.name, "name")?;
    let description = required(&draft.description, "description")?;
    let link = required(&draft.link, "link")?;

    Ok(ValidDraft {
        name,
        description,
        icon: draft.icon.trim().to_string(),
        link,
        category: Category::coerce(&draft.category),
    })
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Builds the pending record. `approved` is always false; missing email or display
/// name become empty strings.
pub fn build_submission(valid: ValidDraft, submitter: &Submitter) -> NewSubmission {
    NewSubmission {
        name: valid.name,
        description: valid.description,
        icon: valid.icon,
        link: valid.link,
        category: valid.category,
        approved: false,
        user_id: submitter.user_id.clone(),
        user_email: submitter.email.clone().unwrap_or_default(),
        user_name: submitter.name.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, description: &str, link: &str, category: &str) -> SubmissionDraft {
        SubmissionDraft {
            name: name.to_string(),
            description: description.to_string(),
            icon: String::new(),
            link: link.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = validate_draft(&draft("", "x", "http://x", "plugin"));
        assert_eq!(result, Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn whitespace_only_link_is_rejected() {
        let result = validate_draft(&draft("n", "d", "   ", "plugin"));
        assert_eq!(result, Err(ValidationError::MissingField("link")));
    }

    #[test]
    fn fields_are_trimmed_and_category_coerced() {
        let valid = validate_draft(&draft("  Tool ", " desc\n", " https://t.dev ", "banana")).unwrap();
        assert_eq!(valid.name, "Tool");
        assert_eq!(valid.description, "desc");
        assert_eq!(valid.link, "https://t.dev");
        assert_eq!(valid.category, Category::Software);
    }

    #[test]
    fn record_starts_unapproved_with_identity() {
        let valid = validate_draft(&draft("a", "b", "http://c", "script")).unwrap();
        let submitter = Submitter {
            user_id: "uid-1".to_string(),
            email: None,
            name: Some("Ada".to_string()),
        };
        let record = build_submission(valid, &submitter);
        assert!(!record.approved);
        assert_eq!(record.user_id, "uid-1");
        assert_eq!(record.user_email, "");
        assert_eq!(record.user_name, "Ada");
        assert_eq!(record.category, Category::Script);
    }
}
