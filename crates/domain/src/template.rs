use std::collections::BTreeSet;
use std::fmt;

use derive_more::Deref;
use uuid::Uuid;

use crate::{
    BlockID, CreateError, DeleteError, ExerciseID, Name, Percentage, ReadError, Reps, Seconds,
    UpdateError, VariantTag, Weight,
};

#[allow(async_fn_in_trait)]
pub trait TemplateRepository {
    async fn read_workout_templates(&self) -> Result<Vec<WorkoutTemplate>, ReadError>;
    async fn read_workout_template(
        &self,
        id: WorkoutTemplateID,
    ) -> Result<WorkoutTemplate, ReadError>;
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

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutTemplateID(Uuid);

impl WorkoutTemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutTemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutTemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateExerciseID(Uuid);

impl TemplateExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for TemplateExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TemplateExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Planned load for an exercise slot. Exactly one of the two cases is
/// populated at a time; switching the input mode replaces the value,
/// which structurally clears the other case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Load {
    ByPercentage(Percentage),
    ByWeight(Weight),
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Load::ByPercentage(percentage) => write!(f, "{percentage} %"),
            Load::ByWeight(weight) => write!(f, "{weight} kg"),
        }
    }
}

/// Member of a multi-exercise template slot (giant set, circuit or
/// tabata station, superset or pre-exhaustion partner).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TemplateMember {
    pub exercise_id: Option<ExerciseID>,
    pub exercise_name: Option<String>,
    pub order: u32,
    pub letter: Option<char>,
    pub set_number: Option<u32>,
    pub target_reps: Option<Reps>,
    pub work: Option<Seconds>,
    pub rest_after: Option<Seconds>,
}

/// A planned exercise slot inside a workout block. Authored by the
/// coach; read-only for the logging flow.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub id: TemplateExerciseID,
    pub block_id: BlockID,
    pub block_label: Option<Name>,
    pub block_order: u32,
    pub order: u32,
    pub tag: VariantTag,
    pub exercise_id: Option<ExerciseID>,
    pub exercise_name: Option<String>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<Reps>,
    pub rest: Option<Seconds>,
    pub load: Option<Load>,
    pub tempo: Option<String>,
    pub notes: String,
    pub rounds: Option<u32>,
    pub members: Vec<TemplateMember>,
}

impl TemplateExercise {
    #[must_use]
    pub fn new(id: TemplateExerciseID, block_id: BlockID, tag: VariantTag) -> Self {
        Self {
            id,
            block_id,
            block_label: None,
            block_order: 0,
            order: 0,
            tag,
            exercise_id: None,
            exercise_name: None,
            target_sets: None,
            target_reps: None,
            rest: None,
            load: None,
            tempo: None,
            notes: String::new(),
            rounds: None,
            members: Vec::new(),
        }
    }

    /// Switches the slot to a percentage-of-1RM load, clearing any
    /// absolute weight.
    pub fn set_load_percentage(&mut self, percentage: Percentage) {
        self.load = Some(Load::ByPercentage(percentage));
    }

    /// Switches the slot to an absolute weight, clearing any
    /// percentage load.
    pub fn set_load_weight(&mut self, weight: Weight) {
        self.load = Some(Load::ByWeight(weight));
    }

    #[must_use]
    pub fn exercise_refs(&self) -> BTreeSet<ExerciseID> {
        let mut refs = BTreeSet::new();
        refs.extend(self.exercise_id);
        refs.extend(self.members.iter().filter_map(|m| m.exercise_id));
        refs
    }

    /// Names declared on the template, in declaration order. These
    /// seed the name table and take precedence over logged names, so a
    /// block header can show names before any set exists.
    #[must_use]
    pub fn declared_names(&self) -> Vec<(ExerciseID, &str)> {
        let mut names = Vec::new();
        if let (Some(id), Some(name)) = (self.exercise_id, self.exercise_name.as_deref()) {
            names.push((id, name));
        }
        for member in &self.members {
            if let (Some(id), Some(name)) = (member.exercise_id, member.exercise_name.as_deref()) {
                names.push((id, name));
            }
        }
        names
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
    pub id: WorkoutTemplateID,
    pub name: Name,
    pub archived: bool,
    pub exercises: Vec<TemplateExercise>,
}

impl WorkoutTemplate {
    #[must_use]
    pub fn exercise_refs(&self) -> BTreeSet<ExerciseID> {
        self.exercises
            .iter()
            .flat_map(TemplateExercise::exercise_refs)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_load_mutual_exclusion() {
        let mut exercise = TemplateExercise::new(1.into(), 1.into(), VariantTag::StraightSet);
        assert_eq!(exercise.load, None);

        exercise.set_load_percentage(Percentage::new(75.0).unwrap());
        assert_eq!(
            exercise.load,
            Some(Load::ByPercentage(Percentage::new(75.0).unwrap()))
        );

        exercise.set_load_weight(Weight::new(80.0).unwrap());
        assert_eq!(exercise.load, Some(Load::ByWeight(Weight::new(80.0).unwrap())));

        exercise.set_load_percentage(Percentage::new(70.0).unwrap());
        assert_eq!(
            exercise.load,
            Some(Load::ByPercentage(Percentage::new(70.0).unwrap()))
        );
    }

    #[rstest]
    #[case(Load::ByPercentage(Percentage::new(77.5).unwrap()), "77.5 %")]
    #[case(Load::ByWeight(Weight::new(102.5).unwrap()), "102.5 kg")]
    fn test_load_display(#[case] load: Load, #[case] expected: &str) {
        assert_eq!(load.to_string(), expected);
    }

    #[test]
    fn test_template_exercise_refs_and_names() {
        let mut exercise = TemplateExercise::new(1.into(), 1.into(), VariantTag::GiantSet);
        exercise.exercise_id = Some(1.into());
        exercise.exercise_name = Some(String::from("Squat"));
        exercise.members = vec![
            TemplateMember {
                exercise_id: Some(2.into()),
                exercise_name: Some(String::from("Leg Press")),
                order: 0,
                ..TemplateMember::default()
            },
            TemplateMember {
                exercise_id: Some(3.into()),
                exercise_name: None,
                order: 1,
                ..TemplateMember::default()
            },
        ];

        assert_eq!(
            exercise.exercise_refs(),
            BTreeSet::from([1.into(), 2.into(), 3.into()])
        );
        assert_eq!(
            exercise.declared_names(),
            vec![(1.into(), "Squat"), (2.into(), "Leg Press")]
        );
    }

    #[test]
    fn test_workout_template_id_nil() {
        assert!(WorkoutTemplateID::nil().is_nil());
        assert_eq!(WorkoutTemplateID::nil(), WorkoutTemplateID::default());
    }
}
