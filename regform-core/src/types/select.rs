//! Selection control model

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One entry of a selection control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Opaque id as sent by the server; empty for the placeholder
    pub id: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Non-selectable leading entry
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self::new(String::new(), label)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// Load state of a selection control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    #[default]
    Idle,
    Loading,
    Populated,
    Empty,
    Error,
}

/// Selection control
///
/// After any reset `options[0]` is a placeholder and `selected_index == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectField {
    pub id: String,
    pub options: Vec<SelectOption>,
    pub selected_index: usize,
    pub disabled: bool,
    pub state: FieldState,
}

impl SelectField {
    /// A disabled control holding only `placeholder`
    pub fn new(id: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: vec![SelectOption::placeholder(placeholder)],
            selected_index: 0,
            disabled: true,
            state: FieldState::Idle,
        }
    }

    /// Label of the leading placeholder, if the control has one
    pub fn placeholder_label(&self) -> Option<&str> {
        self.options
            .first()
            .filter(|o| o.is_placeholder())
            .map(|o| o.label.as_str())
    }

    /// The chosen option, `None` while the placeholder is selected
    pub fn selected(&self) -> Option<&SelectOption> {
        self.options
            .get(self.selected_index)
            .filter(|o| !o.is_placeholder())
    }

    /// Record the user's choice. Returns `false` if no option carries `id`.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.options.iter().position(|o| o.id == id) {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }

    /// Options excluding the placeholder
    pub fn items(&self) -> &[SelectOption] {
        match self.options.first() {
            Some(first) if first.is_placeholder() => &self.options[1..],
            _ => &self.options,
        }
    }
}

/// Result of one dependent lookup
#[derive(Debug)]
pub enum LoadOutcome {
    /// Select populated with this many items
    Populated(usize),
    /// Server answered with an empty list
    Empty,
    /// Lookup failed; the select shows the error placeholder
    Failed(CoreError),
    /// A newer trigger replaced this request; nothing was touched
    Superseded,
}

impl LoadOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}
