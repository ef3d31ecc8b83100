use serde::Deserialize;

use crate::error::Error;

/// Display text of the confirmation surface and its outcome messages.
///
/// `action_subtext` may contain `{count}` and `{object}` placeholders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeletionTexts {
    pub action_label: String,
    pub action_subtext: String,
    pub object_label: String,
    pub button_label: String,
    pub cancel_label: String,
    pub action_past_tense: String,
}

impl Default for DeletionTexts {
    fn default() -> Self {
        Self {
            action_label: "Delete".to_string(),
            action_subtext: "Are you sure you want to delete {count} {object}?".to_string(),
            object_label: "Objects".to_string(),
            button_label: "Delete".to_string(),
            cancel_label: "Cancel".to_string(),
            action_past_tense: "deleted".to_string(),
        }
    }
}

impl DeletionTexts {
    /// Loads overrides from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.action_label, self.object_label)
    }

    pub fn subtext(&self, count: usize) -> String {
        self.action_subtext
            .replace("{count}", &count.to_string())
            .replace("{object}", &self.object_label)
    }

    pub fn success_message(&self, count: usize) -> String {
        format!(
            "Successfully {} {} {}",
            self.action_past_tense, count, self.object_label
        )
    }

    pub fn failure_message(&self, count: usize) -> String {
        format!(
            "Failed to {} {} {}",
            self.action_label.to_lowercase(),
            count,
            self.object_label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let texts = DeletionTexts::from_json(r#"{"object_label": "Users"}"#).unwrap();
        assert_eq!(texts.object_label, "Users");
        assert_eq!(texts.action_label, "Delete");
        assert_eq!(texts.success_message(2), "Successfully deleted 2 Users");
        assert_eq!(texts.failure_message(2), "Failed to delete 2 Users");
    }

    #[test]
    fn test_subtext_placeholders() {
        let texts = DeletionTexts::default();
        assert_eq!(texts.subtext(3), "Are you sure you want to delete 3 Objects?");
    }

    #[test]
    fn test_invalid_json() {
        let result = DeletionTexts::from_json("{not json");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
