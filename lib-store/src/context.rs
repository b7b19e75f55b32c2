//! Per-transaction execution context.

use lib_types::{BlockHeight, BlockTime};

use crate::MultiStore;

/// Everything a keeper needs while applying a message or a sweep: the
/// store, and the block clock. "Now" is always `ctx.time`.
pub struct Context<'a> {
    pub store: &'a mut dyn MultiStore,
    pub height: BlockHeight,
    pub time: BlockTime,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a mut dyn MultiStore, height: BlockHeight, time: BlockTime) -> Self {
        Self {
            store,
            height,
            time,
        }
    }
}
