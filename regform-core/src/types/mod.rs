//! 类型定义模块

mod event;
mod form;
mod key;
mod level;
mod select;

pub use event::{LinkClick, PageEvent, SharedForm};
pub use form::{EncryptionReport, Form, FormField, InputType, SubmitPolicy};
pub use key::KeyState;
pub use level::Level;
pub use select::{FieldState, LoadOutcome, SelectField, SelectOption};
