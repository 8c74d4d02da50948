use std::collections::BTreeMap;

use crate::{
    Block, ExerciseID, ExerciseNameTable, LoggedSet, NameRole, Reps, Seconds, SetVariant,
    TemplateExercise, TemplateMember, VariantTag, Weight,
};

/// One rendered line of a block: a title ("Set 3", "Round 2",
/// "Minute 4"), the core values, and an optional annotation. Absent
/// optional fields omit their part instead of rendering a zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub title: String,
    pub values: Vec<String>,
    pub annotation: Option<String>,
}

fn weight_reps(weight: Option<Weight>, reps: Option<Reps>) -> Option<String> {
    match (weight, reps) {
        (Some(weight), Some(reps)) => Some(format!("{weight} kg × {reps}")),
        (Some(weight), None) => Some(format!("{weight} kg")),
        (None, Some(reps)) => Some(format!("{reps} reps")),
        (None, None) => None,
    }
}

fn join(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

fn partner_value(
    letter: char,
    exercise_id: Option<ExerciseID>,
    role: NameRole,
    performance: Option<String>,
    names: &ExerciseNameTable,
) -> String {
    let name = names.get_or_placeholder(exercise_id, role);
    match performance {
        Some(performance) => format!("{letter}: {name} · {performance}"),
        None => format!("{letter}: {name}"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn position_letter(index: usize) -> char {
    char::from(b'A' + index.min(25) as u8)
}

/// Renders one logged set. `ordinal` is the 1-based position of the set
/// within its block, used when the row carries no set number.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn format_set(
    set: &LoggedSet,
    names: &ExerciseNameTable,
    letters: &BTreeMap<ExerciseID, char>,
    ordinal: u32,
) -> DisplayLine {
    let number = set.set_number.unwrap_or(ordinal);
    let title = format!("{} {number}", set.variant.tag().unit_label());

    match &set.variant {
        SetVariant::StraightSet { weight, reps } => DisplayLine {
            title,
            values: weight_reps(*weight, *reps).into_iter().collect(),
            annotation: None,
        },
        SetVariant::DropSet {
            weight,
            reps,
            drop_weight,
            drop_reps,
            drop_percentage,
        } => {
            let initial = weight_reps(*weight, *reps);
            let dropped = weight_reps(*drop_weight, *drop_reps);
            let values = match (initial, dropped) {
                (Some(initial), Some(dropped)) => vec![format!("{initial} → {dropped}")],
                (Some(single), None) | (None, Some(single)) => vec![single],
                (None, None) => vec![],
            };
            DisplayLine {
                title,
                values,
                annotation: drop_percentage.map(|percentage| format!("-{percentage} %")),
            }
        }
        SetVariant::Superset { first, second } => DisplayLine {
            title,
            values: vec![
                partner_value(
                    'A',
                    first.exercise_id,
                    NameRole::Partner('A'),
                    weight_reps(first.weight, first.reps),
                    names,
                ),
                partner_value(
                    'B',
                    second.exercise_id,
                    NameRole::Partner('B'),
                    weight_reps(second.weight, second.reps),
                    names,
                ),
            ],
            annotation: None,
        },
        SetVariant::GiantSet { members } => DisplayLine {
            title,
            values: members
                .iter()
                .enumerate()
                .map(|(index, member)| {
                    let letter = member
                        .letter
                        .or_else(|| {
                            member
                                .exercise_id
                                .and_then(|id| letters.get(&id).copied())
                        })
                        .unwrap_or_else(|| position_letter(index));
                    partner_value(
                        letter,
                        member.exercise_id,
                        NameRole::Partner(letter),
                        weight_reps(member.weight, member.reps),
                        names,
                    )
                })
                .collect(),
            annotation: None,
        },
        SetVariant::ClusterSet {
            weight,
            reps,
            cluster,
        } => DisplayLine {
            title: match cluster {
                Some(cluster) => format!("Cluster {cluster} · Set {number}"),
                None => title,
            },
            values: weight_reps(*weight, *reps).into_iter().collect(),
            annotation: None,
        },
        SetVariant::RestPause {
            weight,
            reps,
            pause_reps,
            pause_number,
        } => {
            let initial = weight_reps(*weight, *reps);
            let values = match (initial, pause_reps) {
                (Some(initial), Some(pause_reps)) => {
                    vec![format!("{initial} → {pause_reps} reps")]
                }
                (Some(initial), None) => vec![initial],
                (None, Some(pause_reps)) => vec![format!("{pause_reps} reps")],
                (None, None) => vec![],
            };
            DisplayLine {
                title,
                values,
                annotation: pause_number.map(|number| format!("Rest-pause {number}")),
            }
        }
        SetVariant::PreExhaustion {
            isolation,
            compound,
        } => DisplayLine {
            title,
            values: vec![
                partner_value(
                    'A',
                    isolation.exercise_id,
                    NameRole::Isolation,
                    weight_reps(isolation.weight, isolation.reps),
                    names,
                ),
                partner_value(
                    'B',
                    compound.exercise_id,
                    NameRole::Compound,
                    weight_reps(compound.weight, compound.reps),
                    names,
                ),
            ],
            annotation: None,
        },
        SetVariant::Amrap {
            weight,
            reps,
            total_reps,
            target_reps,
            elapsed,
        } => {
            let mut annotations = Vec::new();
            if let Some(target_reps) = target_reps {
                annotations.push(format!("target {target_reps}"));
            }
            if let Some(elapsed) = elapsed {
                annotations.push(elapsed.mm_ss());
            }
            DisplayLine {
                title,
                values: weight_reps(*weight, total_reps.or(*reps))
                    .into_iter()
                    .collect(),
                annotation: join(annotations),
            }
        }
        SetVariant::ForTime {
            weight,
            reps,
            total_reps,
            target_reps,
            elapsed,
            cap,
        } => {
            let mut annotations = Vec::new();
            match (elapsed, cap) {
                (Some(elapsed), Some(cap)) => {
                    annotations.push(format!("{} / {}", elapsed.mm_ss(), cap.mm_ss()));
                }
                (Some(elapsed), None) => annotations.push(elapsed.mm_ss()),
                (None, Some(cap)) => annotations.push(format!("cap {}", cap.mm_ss())),
                (None, None) => {}
            }
            if let Some(target_reps) = target_reps {
                annotations.push(format!("target {target_reps}"));
            }
            DisplayLine {
                title,
                values: weight_reps(*weight, total_reps.or(*reps))
                    .into_iter()
                    .collect(),
                annotation: join(annotations),
            }
        }
        SetVariant::Emom {
            reps,
            minute,
            duration,
        } => DisplayLine {
            title: format!("Minute {}", minute.unwrap_or(number)),
            values: reps.map(|reps| format!("{reps} reps")).into_iter().collect(),
            annotation: duration.map(Seconds::mm_ss),
        },
        SetVariant::Tabata {
            round,
            rounds_completed,
            duration,
        } => DisplayLine {
            title: format!("Round {}", round.unwrap_or(number)),
            values: rounds_completed
                .map(|rounds| format!("{rounds} rounds completed"))
                .into_iter()
                .collect(),
            annotation: duration.map(Seconds::mm_ss),
        },
        SetVariant::Circuit {
            members,
            set_number,
        } => DisplayLine {
            title: format!("Set {}", set_number.unwrap_or(number)),
            values: members
                .iter()
                .enumerate()
                .map(|(index, member)| {
                    let name =
                        names.get_or_placeholder(member.exercise_id, NameRole::Member(index));
                    let mut parts = vec![name];
                    if let Some(work) = member.work {
                        parts.push(format!("{} work", work.mm_ss()));
                    }
                    if let Some(rest) = member.rest_after {
                        parts.push(format!("{} rest", rest.mm_ss()));
                    }
                    parts.join(" · ")
                })
                .collect(),
            annotation: None,
        },
    }
}

fn target_summary(exercise: &TemplateExercise) -> Option<String> {
    let mut parts = Vec::new();
    match (exercise.target_sets, exercise.target_reps) {
        (Some(sets), Some(reps)) => parts.push(format!("{sets} × {reps}")),
        (Some(sets), None) => parts.push(format!("{sets} sets")),
        (None, Some(reps)) => parts.push(format!("{reps} reps")),
        (None, None) => {}
    }
    if let Some(load) = exercise.load {
        parts.push(load.to_string());
    }
    if let Some(rest) = exercise.rest {
        parts.push(format!("rest {}", rest.mm_ss()));
    }
    if let Some(tempo) = &exercise.tempo {
        parts.push(format!("tempo {tempo}"));
    }
    join(parts)
}

fn member_role(tag: VariantTag, index: usize, letter: char) -> NameRole {
    match (tag, index) {
        (VariantTag::PreExhaustion, 0) => NameRole::Isolation,
        (VariantTag::PreExhaustion, _) => NameRole::Compound,
        (VariantTag::Circuit | VariantTag::Tabata, _) => NameRole::Member(index),
        _ => NameRole::Partner(letter),
    }
}

fn template_member_value(
    tag: VariantTag,
    index: usize,
    member: &TemplateMember,
    names: &ExerciseNameTable,
) -> String {
    let letter = member.letter.unwrap_or_else(|| position_letter(index));
    let name = names.get_or_placeholder(member.exercise_id, member_role(tag, index, letter));
    let mut parts = vec![format!("{letter}: {name}")];
    if let Some(reps) = member.target_reps {
        parts.push(format!("{reps} reps"));
    }
    if let Some(work) = member.work {
        parts.push(format!("{} work", work.mm_ss()));
    }
    if let Some(rest) = member.rest_after {
        parts.push(format!("{} rest", rest.mm_ss()));
    }
    parts.join(" · ")
}

fn tabata_template_lines(block: &Block, names: &ExerciseNameTable) -> Vec<DisplayLine> {
    let rounds = block.template.iter().find_map(|e| e.rounds);
    let mut grouped: BTreeMap<u32, Vec<&TemplateMember>> = BTreeMap::new();
    for exercise in &block.template {
        for member in &exercise.members {
            grouped
                .entry(member.set_number.unwrap_or(1))
                .or_default()
                .push(member);
        }
    }

    grouped
        .into_iter()
        .map(|(set_number, mut members)| {
            members.sort_by_key(|member| member.order);
            DisplayLine {
                title: format!("Set {set_number}"),
                values: members
                    .iter()
                    .enumerate()
                    .map(|(index, member)| {
                        let name = names
                            .get_or_placeholder(member.exercise_id, NameRole::Member(index));
                        let mut parts = vec![name];
                        if let Some(work) = member.work {
                            parts.push(format!("{} work", work.mm_ss()));
                        }
                        if let Some(rest) = member.rest_after {
                            parts.push(format!("{} rest", rest.mm_ss()));
                        }
                        parts.join(" · ")
                    })
                    .collect(),
                annotation: rounds.map(|rounds| format!("{rounds} rounds")),
            }
        })
        .collect()
}

/// Renders a block from its template definition. Used whenever a block
/// has no logged sets yet, so the block is never hidden or blank.
#[must_use]
pub fn format_template(block: &Block, names: &ExerciseNameTable) -> Vec<DisplayLine> {
    if block.template.is_empty() {
        return vec![DisplayLine {
            title: String::from("No exercises configured"),
            values: vec![],
            annotation: None,
        }];
    }

    if block.tag == VariantTag::Tabata {
        let lines = tabata_template_lines(block, names);
        if lines.is_empty() {
            return vec![DisplayLine {
                title: String::from("No exercises configured"),
                values: vec![],
                annotation: None,
            }];
        }
        return lines;
    }

    let mut exercises = block.template.iter().collect::<Vec<_>>();
    exercises.sort_by_key(|exercise| exercise.order);
    exercises
        .iter()
        .map(|exercise| {
            let title = names.get_or_placeholder(exercise.exercise_id, NameRole::Primary);
            let mut values = Vec::new();
            if let Some(summary) = target_summary(exercise) {
                values.push(summary);
            }
            for (index, member) in exercise.members.iter().enumerate() {
                values.push(template_member_value(block.tag, index, member, names));
            }
            DisplayLine {
                title,
                values,
                annotation: None,
            }
        })
        .collect()
}

/// Renders a whole block: its logged sets in display order, or the
/// template fallback when nothing has been logged.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_block(block: &Block, names: &ExerciseNameTable) -> Vec<DisplayLine> {
    if block.sets.is_empty() {
        return format_template(block, names);
    }

    let letters = block.letter_map();
    block
        .sorted_sets()
        .into_iter()
        .enumerate()
        .map(|(index, set)| format_set(set, names, &letters, index as u32 + 1))
        .collect()
}
