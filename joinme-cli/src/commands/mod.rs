pub mod events;
pub mod groups;
pub mod history;
pub mod join;
pub mod remind;
pub mod show;
pub mod sync;

use anyhow::Result;
use joinme_core::view_state::ListState;

/// Turn a published error into a command failure.
fn into_items<T>(state: ListState<T>) -> Result<Vec<T>> {
    match state.error_message {
        Some(error) => anyhow::bail!(error),
        None => Ok(state.items),
    }
}
