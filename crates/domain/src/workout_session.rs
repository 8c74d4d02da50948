use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    BlockID, CircuitMember, CreateError, DeleteError, ExerciseID, GiantSetMember, Percentage,
    ReadError, Reps, Seconds, SetVariant, WorkoutTemplateID, Weight,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionRepository {
    async fn read_workout_sessions(&self) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn read_workout_session(&self, id: WorkoutSessionID)
    -> Result<WorkoutSession, ReadError>;
    async fn read_logged_set_rows(&self, id: WorkoutSessionID) -> Result<Vec<SetRow>, ReadError>;
    async fn create_logged_set(&self, row: SetRow) -> Result<SetRow, CreateError>;
    async fn delete_logged_set(&self, id: LoggedSetID) -> Result<LoggedSetID, DeleteError>;
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSessionID(Uuid);

impl WorkoutSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoggedSetID(Uuid);

impl LoggedSetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for LoggedSetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for LoggedSetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Raw logged-set record as delivered by the data collaborator. All
/// tag-dependent fields are optional; which of them are meaningful is
/// decided by classification, which happens exactly once per row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SetRow {
    pub id: LoggedSetID,
    pub session_id: WorkoutSessionID,
    pub block_id: BlockID,
    pub exercise_type: Option<String>,
    pub exercise_id: Option<ExerciseID>,
    pub exercise_name: Option<String>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub drop_weight: Option<Weight>,
    pub drop_reps: Option<Reps>,
    pub drop_percentage: Option<Percentage>,
    pub superset_exercise_id: Option<ExerciseID>,
    pub superset_exercise_name: Option<String>,
    pub superset_weight: Option<Weight>,
    pub superset_reps: Option<Reps>,
    pub giant_set_exercises: Vec<GiantSetMember>,
    pub cluster_number: Option<u32>,
    pub rest_pause_number: Option<u32>,
    pub rest_pause_reps: Option<Reps>,
    pub isolation_exercise_id: Option<ExerciseID>,
    pub isolation_exercise_name: Option<String>,
    pub compound_exercise_id: Option<ExerciseID>,
    pub compound_exercise_name: Option<String>,
    pub compound_weight: Option<Weight>,
    pub compound_reps: Option<Reps>,
    pub total_reps: Option<Reps>,
    pub target_reps: Option<Reps>,
    pub elapsed_seconds: Option<Seconds>,
    pub time_cap_seconds: Option<Seconds>,
    pub minute_number: Option<u32>,
    pub round_number: Option<u32>,
    pub rounds_completed: Option<u32>,
    pub total_duration_seconds: Option<Seconds>,
    pub circuit_exercises: Vec<CircuitMember>,
    pub circuit_set_number: Option<u32>,
    pub set_number: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SetRow {
    /// Names attached to the row itself, in any role. Used to seed the
    /// name table after template-declared names.
    #[must_use]
    pub fn declared_names(&self) -> Vec<(ExerciseID, &str)> {
        let direct = [
            (self.exercise_id, self.exercise_name.as_deref()),
            (
                self.superset_exercise_id,
                self.superset_exercise_name.as_deref(),
            ),
            (
                self.isolation_exercise_id,
                self.isolation_exercise_name.as_deref(),
            ),
            (
                self.compound_exercise_id,
                self.compound_exercise_name.as_deref(),
            ),
        ];
        let members = self
            .giant_set_exercises
            .iter()
            .map(|member| (member.exercise_id, member.exercise_name.as_deref()))
            .chain(
                self.circuit_exercises
                    .iter()
                    .map(|member| (member.exercise_id, member.exercise_name.as_deref())),
            );

        direct
            .into_iter()
            .chain(members)
            .filter_map(|(id, name)| Some((id?, name?)))
            .collect()
    }
}

/// One completed performance unit within a workout session. Immutable
/// once created; all views in scope read it, none mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedSet {
    pub id: LoggedSetID,
    pub session_id: WorkoutSessionID,
    pub block_id: BlockID,
    pub exercise_id: Option<ExerciseID>,
    pub set_number: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub variant: SetVariant,
}

impl LoggedSet {
    #[must_use]
    pub fn from_row(row: &SetRow) -> Self {
        Self {
            id: row.id,
            session_id: row.session_id,
            block_id: row.block_id,
            exercise_id: row.exercise_id,
            set_number: row.set_number,
            completed_at: row.completed_at,
            variant: SetVariant::classify(row),
        }
    }

    /// Ordering within a block: by set number ascending, with numbered
    /// rows before unnumbered ones, which fall back to completion time.
    #[must_use]
    pub fn cmp_order(&self, other: &Self) -> Ordering {
        match (self.set_number, other.set_number) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.completed_at.cmp(&other.completed_at),
        }
    }

    #[must_use]
    pub fn exercise_refs(&self) -> BTreeSet<ExerciseID> {
        let mut refs = self.variant.exercise_refs();
        refs.extend(self.exercise_id);
        refs
    }
}

/// Workout-level summary stored on the session record by the logging
/// flow. When present it is authoritative and preferred over a
/// client-side recomputation from set rows.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StoredTotals {
    pub sets: u32,
    pub reps: u32,
    pub weight_volume: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WorkoutTotals {
    pub sets: u32,
    pub reps: u32,
    pub weight_volume: f32,
    pub unique_exercises: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: WorkoutSessionID,
    pub template_id: WorkoutTemplateID,
    pub date: NaiveDate,
    pub notes: String,
    pub stored_totals: Option<StoredTotals>,
}

impl WorkoutSession {
    /// Workout totals, preferring the stored summary over a derivation
    /// from set rows. The unique-exercise count is always derived, as
    /// it is not part of the stored summary.
    #[must_use]
    pub fn totals(&self, sets: &[LoggedSet]) -> WorkoutTotals {
        let unique_exercises = sets
            .iter()
            .filter_map(|set| set.exercise_id)
            .collect::<BTreeSet<_>>()
            .len();

        if let Some(stored) = self.stored_totals {
            return WorkoutTotals {
                sets: stored.sets,
                reps: stored.reps,
                weight_volume: stored.weight_volume,
                unique_exercises,
            };
        }

        #[allow(clippy::cast_possible_truncation)]
        WorkoutTotals {
            sets: sets.len() as u32,
            reps: sets.iter().map(|set| set.variant.total_reps()).sum(),
            weight_volume: sets.iter().map(|set| set.variant.weight_volume()).sum(),
            unique_exercises,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn straight_set(
        id: u128,
        exercise_id: Option<u128>,
        weight: Option<f32>,
        reps: Option<u32>,
        set_number: Option<u32>,
        completed_at: Option<i64>,
    ) -> LoggedSet {
        LoggedSet {
            id: id.into(),
            session_id: 1.into(),
            block_id: 1.into(),
            exercise_id: exercise_id.map(Into::into),
            set_number,
            completed_at: completed_at.map(|t| Utc.timestamp_opt(t, 0).unwrap()),
            variant: SetVariant::StraightSet {
                weight: weight.map(|w| Weight::new(w).unwrap()),
                reps: reps.map(|r| Reps::new(r).unwrap()),
            },
        }
    }

    fn session(stored_totals: Option<StoredTotals>) -> WorkoutSession {
        WorkoutSession {
            id: 1.into(),
            template_id: 2.into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            notes: String::new(),
            stored_totals,
        }
    }

    #[test]
    fn test_logged_set_from_row() {
        let row = SetRow {
            id: 7.into(),
            session_id: 1.into(),
            block_id: 3.into(),
            exercise_type: Some(String::from("drop_set")),
            exercise_id: Some(4.into()),
            weight: Some(Weight::new(100.0).unwrap()),
            reps: Some(Reps::new(8).unwrap()),
            drop_weight: Some(Weight::new(80.0).unwrap()),
            drop_reps: Some(Reps::new(6).unwrap()),
            set_number: Some(2),
            ..SetRow::default()
        };

        let set = LoggedSet::from_row(&row);

        assert_eq!(set.id, 7.into());
        assert_eq!(set.block_id, 3.into());
        assert_eq!(set.set_number, Some(2));
        assert_eq!(
            set.variant,
            SetVariant::DropSet {
                weight: Some(Weight::new(100.0).unwrap()),
                reps: Some(Reps::new(8).unwrap()),
                drop_weight: Some(Weight::new(80.0).unwrap()),
                drop_reps: Some(Reps::new(6).unwrap()),
                drop_percentage: None,
            }
        );
    }

    #[test]
    fn test_set_row_declared_names() {
        let row = SetRow {
            exercise_id: Some(1.into()),
            exercise_name: Some(String::from("Leg Extension")),
            superset_exercise_id: Some(2.into()),
            superset_exercise_name: Some(String::from("Leg Curl")),
            giant_set_exercises: vec![GiantSetMember {
                exercise_id: Some(3.into()),
                exercise_name: Some(String::from("Lunge")),
                ..GiantSetMember::default()
            }],
            ..SetRow::default()
        };

        assert_eq!(
            row.declared_names(),
            vec![
                (1.into(), "Leg Extension"),
                (2.into(), "Leg Curl"),
                (3.into(), "Lunge"),
            ]
        );
    }

    #[test]
    fn test_logged_set_ordering_numbered_before_unnumbered() {
        let mut sets = vec![
            straight_set(1, None, None, None, None, Some(100)),
            straight_set(2, None, None, None, Some(2), None),
            straight_set(3, None, None, None, None, Some(50)),
            straight_set(4, None, None, None, Some(1), None),
        ];

        sets.sort_by(LoggedSet::cmp_order);

        assert_eq!(
            sets.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![4.into(), 2.into(), 3.into(), 1.into()]
        );
    }

    #[test]
    fn test_workout_totals_derived() {
        let sets = vec![
            straight_set(1, Some(1), Some(100.0), Some(5), Some(1), None),
            straight_set(2, Some(1), Some(0.0), Some(10), Some(2), None),
            straight_set(3, Some(2), Some(50.0), None, Some(3), None),
        ];

        let totals = session(None).totals(&sets);

        assert_eq!(totals.sets, 3);
        assert_eq!(totals.reps, 15);
        assert_eq!(totals.weight_volume, 500.0);
        assert_eq!(totals.unique_exercises, 2);
    }

    #[test]
    fn test_workout_totals_prefer_stored() {
        let sets = vec![straight_set(1, Some(1), Some(100.0), Some(5), Some(1), None)];
        let stored = StoredTotals {
            sets: 12,
            reps: 96,
            weight_volume: 7200.0,
        };

        let totals = session(Some(stored)).totals(&sets);

        assert_eq!(totals.sets, 12);
        assert_eq!(totals.reps, 96);
        assert_eq!(totals.weight_volume, 7200.0);
        assert_eq!(totals.unique_exercises, 1);
    }

    #[rstest]
    #[case(vec![0, 1, 2], vec![2, 0, 1])]
    #[case(vec![0, 1, 2], vec![1, 2, 0])]
    fn test_workout_totals_order_independent(
        #[case] first: Vec<usize>,
        #[case] second: Vec<usize>,
    ) {
        let sets = [
            straight_set(1, Some(1), Some(100.0), Some(5), Some(1), None),
            straight_set(2, Some(1), Some(80.0), Some(8), Some(2), None),
            straight_set(3, Some(2), Some(60.0), Some(12), Some(3), None),
        ];
        let a = first.iter().map(|i| sets[*i].clone()).collect::<Vec<_>>();
        let b = second.iter().map(|i| sets[*i].clone()).collect::<Vec<_>>();

        assert_eq!(session(None).totals(&a), session(None).totals(&b));
    }

    #[test]
    fn test_workout_session_id_nil() {
        assert!(WorkoutSessionID::nil().is_nil());
        assert_eq!(WorkoutSessionID::nil(), WorkoutSessionID::default());
    }
}
