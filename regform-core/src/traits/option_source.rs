//! Option list lookup abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Level, SelectOption};

/// Option list lookup Trait
///
/// Platform implementations:
/// - `regform-app`: `HttpOptionSource` (reqwest)
/// - tests: `ScriptedOptionSource`
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Endpoint serving `level` for `parent_id` (used for logging and request bookkeeping)
    ///
    /// # Arguments
    /// * `level` - Level being loaded
    /// * `parent_id` - Selected id of the parent level, `None` for the top level
    fn endpoint(&self, level: Level, parent_id: Option<&str>) -> String;

    /// Fetch the options of `level`
    ///
    /// # Returns
    /// * `Ok(vec![])` - valid, empty list
    /// * `Err(CoreError::Transport)` - network, status or parse failure
    async fn fetch_options(
        &self,
        level: Level,
        parent_id: Option<&str>,
    ) -> CoreResult<Vec<SelectOption>>;
}
