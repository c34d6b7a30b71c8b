//! Effects - side effects declared by the reducer

use crate::coordinator::RefreshRequest;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Run one refresh cycle
    Refresh(RefreshRequest),
    LoadTypes,
    LoadGenerations,
    LoadDetail { url: String },
    LoadSprite { name: String, url: String },
}
