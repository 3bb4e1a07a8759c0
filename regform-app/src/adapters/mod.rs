//! HTTP adapters implementing the core transport traits.

mod http_client;
mod key_source;
mod option_source;

pub use http_client::{build_client, HttpUtils};
pub use key_source::HttpKeySource;
pub use option_source::HttpOptionSource;
