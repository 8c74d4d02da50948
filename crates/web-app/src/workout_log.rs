use std::collections::BTreeMap;

use coachfit_domain::{BlockID, ReadError, WorkoutLog, WorkoutSessionID};
use log::warn;

use crate::{LoadState, Settings, view};

/// View state of the workout log page. Holds the identifier of the
/// session being shown so that responses for a previously shown session
/// can be recognized and discarded.
pub struct Model {
    session_id: WorkoutSessionID,
    state: LoadState<view::WorkoutLogView>,
    expanded: BTreeMap<BlockID, bool>,
}

impl Model {
    #[must_use]
    pub fn new(session_id: WorkoutSessionID) -> Self {
        Self {
            session_id,
            state: LoadState::Loading,
            expanded: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> WorkoutSessionID {
        self.session_id
    }

    #[must_use]
    pub fn state(&self) -> &LoadState<view::WorkoutLogView> {
        &self.state
    }

    /// Switches the page to another session. All state derived from the
    /// previous session is dropped.
    pub fn switch_to(&mut self, session_id: WorkoutSessionID) {
        self.session_id = session_id;
        self.state = LoadState::Loading;
        self.expanded.clear();
    }

    /// Applies a fetch response. Responses for a session other than the
    /// currently shown one are discarded. Returns whether the response
    /// was applied.
    pub fn apply(
        &mut self,
        session_id: WorkoutSessionID,
        result: Result<WorkoutLog, ReadError>,
        settings: &Settings,
    ) -> bool {
        if session_id != self.session_id {
            warn!("discarding stale workout log response");
            return false;
        }

        match result {
            Ok(log) => {
                let view = view::workout_log_view(&log, settings);
                self.expanded = view
                    .blocks
                    .iter()
                    .enumerate()
                    .map(|(index, block)| (block.block_id, index == 0))
                    .collect();
                self.state = LoadState::Loaded(view);
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
            }
        }
        true
    }

    #[must_use]
    pub fn is_expanded(&self, block_id: BlockID) -> bool {
        self.expanded.get(&block_id).copied().unwrap_or_default()
    }

    pub fn toggle_block(&mut self, block_id: BlockID) {
        let expanded = self.expanded.entry(block_id).or_default();
        *expanded = !*expanded;
    }
}
