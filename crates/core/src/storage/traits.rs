//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, remote backend).

use crate::context::SessionCode;
use crate::error::Result;
use crate::store::LayoutSnapshot;

use super::layouts::LayoutInfo;

/// Layout persistence keyed by session code
pub trait LayoutRepository {
    /// Save a layout, overwriting an earlier save with the same code
    fn save_layout(&self, snapshot: &LayoutSnapshot) -> Result<()>;

    /// Load a layout by session code
    fn load_layout(&self, code: &SessionCode) -> Result<Option<LayoutSnapshot>>;

    /// List saved layouts
    fn list_layouts(&self) -> Result<Vec<LayoutInfo>>;

    /// Delete a layout; `false` if there was none
    fn delete_layout(&self, code: &SessionCode) -> Result<bool>;
}
