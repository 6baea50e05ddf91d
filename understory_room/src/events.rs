// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor lifecycle notifications.

use understory_anchor::Anchor;

use crate::room::AnchorId;

/// What happened to an anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnchorEvent {
    /// The anchor was added to the room.
    Created(AnchorId),
    /// The anchor's labels, pose or geometry changed. The id is unchanged.
    Updated(AnchorId),
    /// The anchor was removed. The id is stale once the mutating call returns.
    Removed(AnchorId),
}

impl AnchorEvent {
    /// The affected anchor.
    pub fn anchor(self) -> AnchorId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Removed(id) => id,
        }
    }
}

/// Receives [`AnchorEvent`]s synchronously, before the mutating call returns.
///
/// Closures taking `(AnchorEvent, &Anchor)` implement this trait.
pub trait RoomObserver {
    /// Called once per affected anchor. `anchor` is the state after creation or update, or the
    /// state being dropped on removal.
    fn on_anchor_event(&mut self, event: AnchorEvent, anchor: &Anchor);
}

impl<F: FnMut(AnchorEvent, &Anchor)> RoomObserver for F {
    fn on_anchor_event(&mut self, event: AnchorEvent, anchor: &Anchor) {
        self(event, anchor);
    }
}

pub(crate) fn emit(observers: &mut [Box<dyn RoomObserver>], event: AnchorEvent, anchor: &Anchor) {
    for observer in observers {
        observer.on_anchor_event(event, anchor);
    }
}
