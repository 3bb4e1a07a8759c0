//! Form model

use serde::{Deserialize, Serialize};

/// `type` attribute of an input control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Password,
    Email,
    Hidden,
    Select,
    Other,
}

/// One field of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub input_type: InputType,
    pub value: String,
    /// Set once the value holds ciphertext; never cleared for the page lifetime
    #[serde(default)]
    pub encrypted: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, input_type: InputType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_type,
            value: value.into(),
            encrypted: false,
        }
    }

    pub fn password(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, InputType::Password, value)
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, InputType::Text, value)
    }

    pub fn is_password(&self) -> bool {
        self.input_type == InputType::Password
    }
}

/// A submittable form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn new(id: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn password_fields(&self) -> impl Iterator<Item = (usize, &FormField)> {
        self.fields.iter().enumerate().filter(|(_, f)| f.is_password())
    }
}

/// What a submit does when the password fields could not be encrypted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitPolicy {
    /// Block the submission
    #[default]
    FailClosed,
    /// Let the submission proceed with the plaintext values
    FailOpen,
}

/// Summary of one encryption pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EncryptionReport {
    pub encrypted: usize,
    pub skipped_empty: usize,
    pub already_encrypted: usize,
}
