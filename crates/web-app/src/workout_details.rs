use coachfit_domain::{ReadError, WorkoutDetails, WorkoutTemplateID};
use log::warn;

use crate::{LoadState, Settings, view};

/// View state of the workout details page, keyed by the shown template.
pub struct Model {
    template_id: WorkoutTemplateID,
    state: LoadState<view::WorkoutDetailsView>,
}

impl Model {
    #[must_use]
    pub fn new(template_id: WorkoutTemplateID) -> Self {
        Self {
            template_id,
            state: LoadState::Loading,
        }
    }

    #[must_use]
    pub fn template_id(&self) -> WorkoutTemplateID {
        self.template_id
    }

    #[must_use]
    pub fn state(&self) -> &LoadState<view::WorkoutDetailsView> {
        &self.state
    }

    pub fn switch_to(&mut self, template_id: WorkoutTemplateID) {
        self.template_id = template_id;
        self.state = LoadState::Loading;
    }

    /// Applies a fetch response, discarding responses for templates
    /// other than the currently shown one.
    pub fn apply(
        &mut self,
        template_id: WorkoutTemplateID,
        result: Result<WorkoutDetails, ReadError>,
        settings: &Settings,
    ) -> bool {
        if template_id != self.template_id {
            warn!("discarding stale workout details response");
            return false;
        }

        self.state = match result {
            Ok(details) => LoadState::Loaded(view::workout_details_view(&details, settings)),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        true
    }
}
