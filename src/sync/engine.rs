//! Save-state synchronization engine.
//!
//! ARCHITECTURE
//! ============
//! `SaveSync` is written against three seams so it runs the same in the
//! browser and in native tests:
//!
//! - [`KeyValueStore`]: the origin-wide persistent cache.
//! - [`SaveChannel`]: fan-out of a confirmed change to the page and to
//!   sibling tabs.
//! - [`ChipSurface`]: lookup of save chips in the current page.
//!
//! The network request is passed into [`SaveSync::handle_toggle`] as a
//! closure, which keeps the engine free of any HTTP client.
//!
//! INVARIANTS
//! ==========
//! - A chip is only ever repainted through its [`ChipState`].
//! - The cache is written only with server-confirmed values.
//! - Externally relayed changes repaint chips but never publish again.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::future::Future;

use super::cache::{KeyValueStore, SaveCache};
use super::channel::{SaveBroadcast, SaveChannel, decode_signal};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::state::save::{ChipState, SAVE_FAILED_MESSAGE};

/// One save chip as the engine sees it.
pub trait ChipHandle {
    /// Bound recipe id; `None` when missing or non-positive.
    fn recipe_id(&self) -> Option<u32>;
    /// State previously rendered onto this chip, `None` before initialization.
    fn state(&self) -> Option<ChipState>;
    /// Saved flag rendered by the server into the chip's markup.
    fn markup_saved(&self) -> bool;
    /// Paint `state` (classes, pressed flag, label, disabled).
    fn render(&self, state: ChipState);
    /// Whether both handles refer to the same control.
    fn same_control(&self, other: &Self) -> bool;
}

/// The page (or a stand-in) that holds save chips.
pub trait ChipSurface {
    /// Subtree handle passed to [`SaveSync::initialize`].
    type Root;
    type Chip: ChipHandle;

    fn chips_in(&self, root: &Self::Root) -> Vec<Self::Chip>;
    fn chips_for(&self, recipe_id: u32) -> Vec<Self::Chip>;
    fn all_chips(&self) -> Vec<Self::Chip>;
}

/// What the caller must do after a toggle completes.
#[derive(Clone, Debug, PartialEq)]
pub enum ToggleOutcome {
    /// Nothing happened (no id, or a request already in flight).
    Ignored,
    /// The change was confirmed and fanned out.
    Applied { recipe_id: u32, saved: bool },
    /// The session is gone; navigate to this location.
    Redirect(String),
    /// Show this message in a blocking notice.
    Failed(String),
}

/// An accepted activation awaiting the server's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleTicket {
    pub recipe_id: u32,
    pub intended: bool,
}

/// Keeps every save chip consistent with the last confirmed state.
pub struct SaveSync<S, C, P> {
    cache: SaveCache<S>,
    channel: C,
    surface: P,
    config: ClientConfig,
    clock: fn() -> f64,
}

impl<S, C, P> SaveSync<S, C, P>
where
    S: KeyValueStore,
    C: SaveChannel,
    P: ChipSurface,
{
    pub fn new(store: S, channel: C, surface: P, config: ClientConfig, clock: fn() -> f64) -> Self {
        Self {
            cache: SaveCache::new(store, &config),
            channel,
            surface,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    /// Paint every chip under `root` with its resolved initial state.
    ///
    /// Cached state wins over markup. Chips with a request in flight are
    /// left alone, so re-scanning a subtree is always safe. Returns the
    /// number of chips painted.
    pub fn initialize(&self, root: &P::Root) -> usize {
        let mut painted = 0;
        for chip in self.surface.chips_in(root) {
            if chip.state().is_some_and(ChipState::is_pending) {
                continue;
            }
            chip.render(self.resolve_initial(&chip));
            painted += 1;
        }
        painted
    }

    fn resolve_initial(&self, chip: &P::Chip) -> ChipState {
        let cached = chip.recipe_id().and_then(|id| self.cache.read(id));
        ChipState::from_saved(cached.unwrap_or_else(|| chip.markup_saved()))
    }

    /// Accept an activation: move the chip to `Pending` and report the
    /// intended value. `None` means the activation is a no-op.
    pub fn begin_toggle(&self, chip: &P::Chip) -> Option<ToggleTicket> {
        let recipe_id = chip.recipe_id()?;
        let current = chip
            .state()
            .unwrap_or_else(|| ChipState::from_saved(chip.markup_saved()));
        let (pending, intended) = current.activate()?;
        chip.render(pending);
        Some(ToggleTicket { recipe_id, intended })
    }

    /// Settle a toggle with the server's answer.
    ///
    /// `result` carries the `saved` flag the server returned, if any.
    pub fn finish_toggle(
        &self,
        chip: &P::Chip,
        ticket: ToggleTicket,
        result: Result<Option<bool>, ApiError>,
    ) -> ToggleOutcome {
        let current = chip.state().unwrap_or(ChipState::Pending {
            was_saved: !ticket.intended,
        });
        match result {
            Err(ApiError::Unauthorized) => {
                chip.render(current.fail());
                ToggleOutcome::Redirect(self.config.login_path.clone())
            }
            Err(e) => {
                leptos::logging::warn!("save toggle for recipe {} failed: {e}", ticket.recipe_id);
                chip.render(current.fail());
                ToggleOutcome::Failed(e.user_message(SAVE_FAILED_MESSAGE))
            }
            Ok(confirmed) => {
                let saved = confirmed.unwrap_or(ticket.intended);
                chip.render(current.succeed(saved));
                self.repaint_bound(ticket.recipe_id, saved, Some(chip));
                if let Err(e) = self.cache.write(ticket.recipe_id, saved, (self.clock)()) {
                    leptos::logging::warn!("save state for recipe {} not cached: {e}", ticket.recipe_id);
                }
                self.broadcast(ticket.recipe_id, saved);
                ToggleOutcome::Applied {
                    recipe_id: ticket.recipe_id,
                    saved,
                }
            }
        }
    }

    /// Full toggle: activate, run `send(recipe_id, intended)`, settle.
    pub async fn handle_toggle<F, Fut>(&self, chip: &P::Chip, send: F) -> ToggleOutcome
    where
        F: FnOnce(u32, bool) -> Fut,
        Fut: Future<Output = Result<Option<bool>, ApiError>>,
    {
        let Some(ticket) = self.begin_toggle(chip) else {
            return ToggleOutcome::Ignored;
        };
        let result = send(ticket.recipe_id, ticket.intended).await;
        self.finish_toggle(chip, ticket, result)
    }

    /// Publish a confirmed change to the page and to sibling tabs.
    pub fn broadcast(&self, recipe_id: u32, saved: bool) {
        self.channel
            .publish(&SaveBroadcast::new(recipe_id, saved, (self.clock)()));
    }

    /// Repaint every chip bound to `recipe_id`. No network, no re-publish.
    pub fn apply_external(&self, recipe_id: u32, saved: bool) -> usize {
        self.repaint_bound(recipe_id, saved, None)
    }

    fn repaint_bound(&self, recipe_id: u32, saved: bool, skip: Option<&P::Chip>) -> usize {
        let mut painted = 0;
        for chip in self.surface.chips_for(recipe_id) {
            if skip.is_some_and(|origin| origin.same_control(&chip)) {
                continue;
            }
            let current = chip
                .state()
                .unwrap_or_else(|| ChipState::from_saved(chip.markup_saved()));
            chip.render(current.external(saved));
            painted += 1;
        }
        painted
    }

    /// Handle a `storage` notification from a sibling tab.
    ///
    /// Returns `true` when it carried a save broadcast.
    pub fn on_storage_event(&self, key: Option<&str>, new_value: Option<&str>) -> bool {
        match decode_signal(&self.config.channel_key, key, new_value) {
            Some(msg) => {
                self.apply_external(msg.id, msg.saved);
                true
            }
            None => false,
        }
    }

    /// Handle the in-page `save-changed` event, given its serialized detail.
    pub fn on_page_event(&self, detail: &str) -> bool {
        match SaveBroadcast::decode(detail) {
            Some(msg) => {
                self.apply_external(msg.id, msg.saved);
                true
            }
            None => false,
        }
    }

    /// Re-apply cached state after the page is shown again (back/forward
    /// cache), overriding stale server markup. Pending chips are skipped.
    pub fn reapply_cached(&self) -> usize {
        let mut painted = 0;
        for chip in self.surface.all_chips() {
            let state = chip
                .state()
                .unwrap_or_else(|| ChipState::from_saved(chip.markup_saved()));
            if state.is_pending() {
                continue;
            }
            let Some(cached) = chip.recipe_id().and_then(|id| self.cache.read(id)) else {
                continue;
            };
            chip.render(state.external(cached));
            painted += 1;
        }
        painted
    }
}
