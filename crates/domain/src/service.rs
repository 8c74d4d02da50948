use std::collections::BTreeSet;

use log::{debug, error};

use crate::{
    Block, CreateError, DeleteError, ExerciseID, ExerciseNameTable, ExerciseRepository, LoggedSet,
    LoggedSetID, Name, ReadError, SetRow, TemplateExercise, TemplateRepository, UpdateError,
    WorkoutSession, WorkoutSessionID, WorkoutSessionRepository, WorkoutTemplate, WorkoutTemplateID,
    assemble_blocks,
};

/// A workout session resolved into renderable blocks, with every
/// referenced exercise ID resolvable through the name table or a
/// placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutLog {
    pub session: WorkoutSession,
    pub blocks: Vec<Block>,
    pub names: ExerciseNameTable,
}

/// A workout template resolved into renderable blocks, without any
/// logged sets.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetails {
    pub template: WorkoutTemplate,
    pub blocks: Vec<Block>,
    pub names: ExerciseNameTable,
}

#[allow(async_fn_in_trait)]
pub trait WorkoutLogService {
    async fn get_workout_sessions(&self) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn get_workout_log(&self, id: WorkoutSessionID) -> Result<WorkoutLog, ReadError>;
    async fn log_set(&self, row: SetRow) -> Result<LoggedSet, CreateError>;
    async fn delete_logged_set(&self, id: LoggedSetID) -> Result<LoggedSetID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutTemplateService {
    async fn get_workout_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError>;
    async fn get_workout_details(&self, id: WorkoutTemplateID)
    -> Result<WorkoutDetails, ReadError>;
    async fn create_workout_template(
        &self,
        name: Name,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate, CreateError>;
    async fn modify_workout_template(
        &self,
        id: WorkoutTemplateID,
        name: Option<Name>,
        archived: Option<bool>,
        exercises: Option<Vec<TemplateExercise>>,
    ) -> Result<WorkoutTemplate, UpdateError>;
    async fn delete_workout_template(
        &self,
        id: WorkoutTemplateID,
    ) -> Result<WorkoutTemplateID, DeleteError>;
}

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R>
where
    R: ExerciseRepository + TemplateRepository + WorkoutSessionRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

/// Classifies logged set rows, resolves them into blocks and seeds the
/// name table. Template names take precedence over names carried on the
/// rows, later duplicates are ignored.
#[must_use]
pub fn assemble_log_blocks(
    template: &[TemplateExercise],
    rows: &[SetRow],
) -> (Vec<Block>, ExerciseNameTable) {
    let mut names = ExerciseNameTable::new();
    for exercise in template {
        for (id, name) in exercise.declared_names() {
            names.declare(id, name);
        }
    }
    for row in rows {
        for (id, name) in row.declared_names() {
            names.declare(id, name);
        }
    }

    let sets = rows.iter().map(LoggedSet::from_row).collect();
    (assemble_blocks(template, sets), names)
}

/// Exercise IDs referenced by the blocks that the name table cannot
/// resolve yet. These are the candidates for one batched lookup.
#[must_use]
pub fn unresolved_refs(blocks: &[Block], names: &ExerciseNameTable) -> BTreeSet<ExerciseID> {
    let mut refs = BTreeSet::new();
    for block in blocks {
        for exercise in &block.template {
            refs.extend(exercise.exercise_refs());
        }
        for set in &block.sets {
            refs.extend(set.exercise_refs());
        }
    }
    names.missing(&refs)
}

impl<R: ExerciseRepository> Service<R> {
    /// Fills the gaps in the name table with one batched repository
    /// lookup. Lookup failures leave the gaps to the role placeholders.
    async fn resolve_names(&self, blocks: &[Block], names: &mut ExerciseNameTable) {
        let missing = unresolved_refs(blocks, names);
        if missing.is_empty() {
            return;
        }
        if let Ok(exercises) = log_on_error!(
            self.repository.read_exercise_names(&missing),
            ReadError,
            "get",
            "exercise names"
        ) {
            for exercise in exercises {
                names.declare(exercise.id, exercise.name.as_ref());
            }
        }
    }
}

impl<R> WorkoutLogService for Service<R>
where
    R: ExerciseRepository + TemplateRepository + WorkoutSessionRepository,
{
    async fn get_workout_sessions(&self) -> Result<Vec<WorkoutSession>, ReadError> {
        log_on_error!(
            self.repository.read_workout_sessions(),
            ReadError,
            "get",
            "workout sessions"
        )
    }

    async fn get_workout_log(&self, id: WorkoutSessionID) -> Result<WorkoutLog, ReadError> {
        let session = log_on_error!(
            self.repository.read_workout_session(id),
            ReadError,
            "get",
            "workout session"
        )?;
        let rows = log_on_error!(
            self.repository.read_logged_set_rows(id),
            ReadError,
            "get",
            "logged sets"
        )
        .unwrap_or_default();
        let template = log_on_error!(
            self.repository.read_workout_template(session.template_id),
            ReadError,
            "get",
            "workout template"
        )
        .map(|template| template.exercises)
        .unwrap_or_default();

        let (blocks, mut names) = assemble_log_blocks(&template, &rows);
        self.resolve_names(&blocks, &mut names).await;

        Ok(WorkoutLog {
            session,
            blocks,
            names,
        })
    }

    async fn log_set(&self, row: SetRow) -> Result<LoggedSet, CreateError> {
        let row = log_on_error!(
            self.repository.create_logged_set(row),
            CreateError,
            "create",
            "logged set"
        )?;
        Ok(LoggedSet::from_row(&row))
    }

    async fn delete_logged_set(&self, id: LoggedSetID) -> Result<LoggedSetID, DeleteError> {
        log_on_error!(
            self.repository.delete_logged_set(id),
            DeleteError,
            "delete",
            "logged set"
        )
    }
}

impl<R> WorkoutTemplateService for Service<R>
where
    R: ExerciseRepository + TemplateRepository + WorkoutSessionRepository,
{
    async fn get_workout_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError> {
        log_on_error!(
            self.repository.read_workout_templates(),
            ReadError,
            "get",
            "workout templates"
        )
    }

    async fn get_workout_details(
        &self,
        id: WorkoutTemplateID,
    ) -> Result<WorkoutDetails, ReadError> {
        let template = log_on_error!(
            self.repository.read_workout_template(id),
            ReadError,
            "get",
            "workout template"
        )?;

        let (blocks, mut names) = assemble_log_blocks(&template.exercises, &[]);
        self.resolve_names(&blocks, &mut names).await;

        Ok(WorkoutDetails {
            template,
            blocks,
            names,
        })
    }

    async fn create_workout_template(
        &self,
        name: Name,
        exercises: Vec<TemplateExercise>,
    ) -> Result<WorkoutTemplate, CreateError> {
        log_on_error!(
            self.repository.create_workout_template(name, exercises),
            CreateError,
            "create",
            "workout template"
        )
    }

    async fn modify_workout_template(
        &self,
        id: WorkoutTemplateID,
        name: Option<Name>,
        archived: Option<bool>,
        exercises: Option<Vec<TemplateExercise>>,
    ) -> Result<WorkoutTemplate, UpdateError> {
        log_on_error!(
            self.repository
                .modify_workout_template(id, name, archived, exercises),
            UpdateError,
            "modify",
            "workout template"
        )
    }

    async fn delete_workout_template(
        &self,
        id: WorkoutTemplateID,
    ) -> Result<WorkoutTemplateID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout_template(id),
            DeleteError,
            "delete",
            "workout template"
        )
    }
}
