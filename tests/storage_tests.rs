use card_portal::{
    error::StoreError,
    models::{Category, NewSubmission, Submission},
    storage::{InMemorySubmissionStore, SubmissionStore},
};
use chrono::Utc;
use uuid::Uuid;

fn new_submission(name: &str, user_id: &str) -> NewSubmission {
    NewSubmission {
        name: name.to_string(),
        description: "desc".to_string(),
        icon: String::new(),
        link: "https://example.com".to_string(),
        category: Category::Plugin,
        approved: false,
        user_id: user_id.to_string(),
        user_email: String::new(),
        user_name: String::new(),
    }
}

#[cfg(test)]
mod in_memory_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_assigns_id_and_timestamp() {
        let store = InMemorySubmissionStore::new();
        let before = Utc::now();

        let first = store.add(new_submission("a", "u1")).await.unwrap();
        let second = store.add(new_submission("b", "u1")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.created_at >= before);
        assert!(!first.approved);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_is_newest_first() {
        let store = InMemorySubmissionStore::new();
        for name in ["a", "b", "c"] {
            store.add(new_submission(name, "u1")).await.unwrap();
        }

        let names: Vec<String> = store
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_list_by_user_filters() {
        let store = InMemorySubmissionStore::new();
        store.add(new_submission("mine", "u1")).await.unwrap();
        store.add(new_submission("theirs", "u2")).await.unwrap();

        let mine = store.list_by_user("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "mine");
        assert!(store.list_by_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_store_never_records() {
        let store =
            InMemorySubmissionStore::new_failing(StoreError::PermissionDenied("rules".into()));

        let result = store.add(new_submission("a", "u1")).await;
        assert!(matches!(result, Err(StoreError::PermissionDenied(_))));
        assert!(store.is_empty());
        assert!(store.list_pending().await.unwrap().is_empty());
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn test_category_coercion() {
        assert_eq!(Category::coerce("plugin"), Category::Plugin);
        assert_eq!(Category::coerce("  SCRIPT "), Category::Script);
        assert_eq!(Category::coerce("software"), Category::Software);
        assert_eq!(Category::coerce("banana"), Category::Software);
        assert_eq!(Category::coerce(""), Category::Software);
    }

    #[test]
    fn test_submission_serializes_camel_case() {
        let record = Submission::from_new(
            new_submission("a", "u1"),
            Uuid::new_v4(),
            Utc::now(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userEmail"], "");
        assert_eq!(json["category"], "plugin");
        assert_eq!(json["approved"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }
}
