use coachfit_domain::{
    Block, BlockID, DisplayLine, ExerciseNameTable, WorkoutDetails, WorkoutLog, WorkoutSessionID,
    format_block,
};

use crate::{Settings, WeightUnit};

/// A block rendered into plain strings, ready for any frontend.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockView {
    pub block_id: BlockID,
    pub title: String,
    pub lines: Vec<DisplayLine>,
    pub totals: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutLogView {
    pub session_id: WorkoutSessionID,
    pub date: String,
    pub notes: String,
    pub totals: Option<String>,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetailsView {
    pub name: String,
    pub archived: bool,
    pub blocks: Vec<BlockView>,
}

fn format_volume(kilograms: f32, unit: WeightUnit) -> String {
    let converted = unit.convert(kilograms);
    if (converted - converted.round()).abs() < f32::EPSILON {
        format!("{converted:.0} {}", unit.label())
    } else {
        format!("{converted:.1} {}", unit.label())
    }
}

fn summary(sets: u32, reps: u32, weight_volume: f32, unit: WeightUnit) -> Option<String> {
    let mut parts = Vec::new();
    if sets > 0 {
        parts.push(format!("{sets} sets"));
    }
    if reps > 0 {
        parts.push(format!("{reps} reps"));
    }
    if weight_volume > 0.0 {
        parts.push(format_volume(weight_volume, unit));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

fn block_view(block: &Block, names: &ExerciseNameTable, settings: &Settings) -> BlockView {
    let mut lines = format_block(block, names);
    if !settings.show_annotations {
        for line in &mut lines {
            line.annotation = None;
        }
    }

    let totals = if block.sets.is_empty() {
        None
    } else {
        let totals = block.totals();
        summary(
            totals.sets,
            totals.reps,
            totals.weight_volume,
            settings.weight_unit,
        )
    };

    BlockView {
        block_id: block.id,
        title: block.label.clone(),
        lines,
        totals,
    }
}

#[must_use]
pub fn workout_log_view(log: &WorkoutLog, settings: &Settings) -> WorkoutLogView {
    let sets = log
        .blocks
        .iter()
        .flat_map(|block| block.sets.iter().cloned())
        .collect::<Vec<_>>();
    let totals = log.session.totals(&sets);
    let mut summary_parts = summary(
        totals.sets,
        totals.reps,
        totals.weight_volume,
        settings.weight_unit,
    );
    if totals.unique_exercises > 0 {
        let exercises = if totals.unique_exercises == 1 {
            String::from("1 exercise")
        } else {
            format!("{} exercises", totals.unique_exercises)
        };
        summary_parts = Some(match summary_parts {
            Some(parts) => format!("{parts} · {exercises}"),
            None => exercises,
        });
    }

    WorkoutLogView {
        session_id: log.session.id,
        date: log.session.date.to_string(),
        notes: log.session.notes.clone(),
        totals: summary_parts,
        blocks: log
            .blocks
            .iter()
            .map(|block| block_view(block, &log.names, settings))
            .collect(),
    }
}

#[must_use]
pub fn workout_details_view(details: &WorkoutDetails, settings: &Settings) -> WorkoutDetailsView {
    WorkoutDetailsView {
        name: details.template.name.to_string(),
        archived: details.template.archived,
        blocks: details
            .blocks
            .iter()
            .map(|block| block_view(block, &details.names, settings))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use coachfit_domain::{
        LoggedSet, Reps, SetVariant, VariantTag, Weight, WorkoutSession, WorkoutTemplate,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn block_with_sets(sets: Vec<LoggedSet>) -> Block {
        Block {
            id: 1.into(),
            label: String::from("Straight set"),
            tag: VariantTag::StraightSet,
            order: 0,
            template: vec![],
            sets,
        }
    }

    fn straight_set(weight: f32, reps: u32, set_number: u32) -> LoggedSet {
        LoggedSet {
            id: u128::from(set_number).into(),
            session_id: 1.into(),
            block_id: 1.into(),
            exercise_id: Some(1.into()),
            set_number: Some(set_number),
            completed_at: None,
            variant: SetVariant::StraightSet {
                weight: Some(Weight::new(weight).unwrap()),
                reps: Some(Reps::new(reps).unwrap()),
            },
        }
    }

    fn workout_log(blocks: Vec<Block>) -> WorkoutLog {
        WorkoutLog {
            session: WorkoutSession {
                id: 1.into(),
                template_id: 1.into(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
                notes: String::new(),
                stored_totals: None,
            },
            blocks,
            names: ExerciseNameTable::new(),
        }
    }

    #[test]
    fn test_block_view_totals() {
        let block = block_with_sets(vec![straight_set(100.0, 5, 1), straight_set(100.0, 5, 2)]);

        let view = block_view(&block, &ExerciseNameTable::new(), &Settings::default());

        assert_eq!(view.totals, Some(String::from("2 sets · 10 reps · 1000 kg")));
    }

    #[test]
    fn test_block_view_without_sets_has_no_totals() {
        let block = block_with_sets(vec![]);

        let view = block_view(&block, &ExerciseNameTable::new(), &Settings::default());

        assert_eq!(view.totals, None);
        assert_eq!(view.lines[0].title, "No exercises configured");
    }

    #[test]
    fn test_annotations_stripped_when_disabled() {
        let set = LoggedSet {
            variant: SetVariant::Amrap {
                weight: None,
                reps: Some(Reps::new(10).unwrap()),
                total_reps: None,
                target_reps: Some(Reps::new(60).unwrap()),
                elapsed: None,
            },
            ..straight_set(0.1, 1, 1)
        };
        let block = block_with_sets(vec![set]);
        let settings = Settings {
            show_annotations: false,
            ..Settings::default()
        };

        let view = block_view(&block, &ExerciseNameTable::new(), &settings);

        assert_eq!(view.lines[0].annotation, None);
    }

    #[rstest]
    #[case(WeightUnit::Kg, "1000 kg")]
    #[case(WeightUnit::Lb, "2204.6 lb")]
    fn test_volume_unit_conversion(#[case] unit: WeightUnit, #[case] expected: &str) {
        assert_eq!(format_volume(1000.0, unit), expected);
    }

    #[test]
    fn test_workout_log_view_totals_include_exercise_count() {
        let log = workout_log(vec![block_with_sets(vec![
            straight_set(100.0, 5, 1),
            straight_set(100.0, 5, 2),
        ])]);

        let view = workout_log_view(&log, &Settings::default());

        assert_eq!(view.date, "2024-05-14");
        assert_eq!(
            view.totals,
            Some(String::from("2 sets · 10 reps · 1000 kg · 1 exercise"))
        );
    }

    #[test]
    fn test_workout_details_view() {
        let details = WorkoutDetails {
            template: WorkoutTemplate {
                id: 1.into(),
                name: coachfit_domain::Name::new("Push Day").unwrap(),
                archived: false,
                exercises: vec![],
            },
            blocks: vec![],
            names: ExerciseNameTable::new(),
        };

        let view = workout_details_view(&details, &Settings::default());

        assert_eq!(view.name, "Push Day");
        assert!(!view.archived);
        assert!(view.blocks.is_empty());
    }
}
