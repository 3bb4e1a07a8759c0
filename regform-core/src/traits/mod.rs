//! Transport and host abstraction trait definition

mod cipher;
mod event_source;
mod key_source;
mod option_source;

pub use cipher::PasswordCipher;
pub use event_source::{EventDisposition, EventSource, InMemoryEventSource, PageEventHandler};
pub use key_source::KeySource;
pub use option_source::OptionSource;
