use serde::{Deserialize, Serialize};

/// An issue fetched from the tracker at the start of a run.
///
/// Immutable input for the rest of the workflow: the title feeds the
/// branch name, commit message fallback, and PR title; the body feeds
/// the model prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_issue() {
        let raw = r#"{
            "number": 42,
            "title": "Fix crash on empty input",
            "body": "Steps to reproduce: run with no args.",
            "labels": ["bug", "good first issue"]
        }"#;

        let issue: IssueRef = serde_json::from_str(raw).unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.title, "Fix crash on empty input");
        assert_eq!(issue.labels, vec!["bug", "good first issue"]);
    }

    #[test]
    fn body_and_labels_default_when_absent() {
        let raw = r#"{"number": 7, "title": "Docs typo"}"#;

        let issue: IssueRef = serde_json::from_str(raw).unwrap();
        assert_eq!(issue.body, "");
        assert!(issue.labels.is_empty());
    }
}
