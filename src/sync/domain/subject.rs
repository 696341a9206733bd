//! Subject-line composition for synchronized tasks.

use super::EventProperties;
use serde_json::Value;

/// HTML entity some trackers emit in place of a typographic apostrophe.
const APOSTROPHE_ENTITY: &str = "&#8217;";

/// Ordered list of property keys whose values extend the task subject.
///
/// A subject renders as `"<event>: <v1> - <v2> ..."`. When any configured key
/// is absent, or the list is empty, the subject is the bare event name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectTemplate {
    keys: Vec<String>,
}

impl SubjectTemplate {
    /// Creates a template from ordered property keys.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Renders the subject for an event.
    ///
    /// # Errors
    ///
    /// Returns a [`SubjectFallback`] carrying the bare event name and the
    /// first missing key when the template cannot be filled.
    pub fn render(
        &self,
        event_name: &str,
        properties: &EventProperties,
    ) -> Result<String, SubjectFallback> {
        if self.keys.is_empty() {
            return Ok(event_name.to_owned());
        }

        let mut components = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            let Some(component) = properties.get(key).and_then(subject_component) else {
                return Err(SubjectFallback {
                    subject: event_name.to_owned(),
                    missing_key: key.clone(),
                });
            };
            components.push(component);
        }

        Ok(format!("{event_name}: {}", components.join(" - ")))
    }
}

/// Bare-name subject produced when a configured key is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFallback {
    /// The subject to use instead.
    pub subject: String,
    /// The first configured key that could not be filled.
    pub missing_key: String,
}

fn subject_component(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.replace(APOSTROPHE_ENTITY, "'")),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
