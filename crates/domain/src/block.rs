use std::collections::BTreeMap;

use derive_more::Deref;
use uuid::Uuid;

use crate::{ExerciseID, LoggedSet, SetVariant, TemplateExercise, VariantTag};

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockID(Uuid);

impl BlockID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for BlockID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for BlockID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Aggregate over the sets of one block or one exercise group within a
/// block. Missing numeric values count as zero, so the fold is total
/// and independent of input order.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BlockTotals {
    pub sets: u32,
    pub reps: u32,
    pub weight_volume: f32,
}

impl BlockTotals {
    fn fold<'a>(sets: impl Iterator<Item = &'a LoggedSet>) -> Self {
        let mut totals = BlockTotals::default();
        for set in sets {
            totals.sets += 1;
            totals.reps += set.variant.total_reps();
            totals.weight_volume += set.variant.weight_volume();
        }
        totals
    }
}

/// Sets of a block, grouped per exercise where that is meaningful.
///
/// The three inherently multi-exercise tags (superset, giant set,
/// pre-exhaustion) stay flat: grouping their sets by a single exercise
/// ID would misrepresent rows that span several exercises.
#[derive(Debug, PartialEq)]
pub enum SetGroups<'a> {
    Flat(Vec<&'a LoggedSet>),
    ByExercise(Vec<ExerciseGroup<'a>>),
}

#[derive(Debug, PartialEq)]
pub struct ExerciseGroup<'a> {
    pub exercise_id: Option<ExerciseID>,
    pub sets: Vec<&'a LoggedSet>,
    pub totals: BlockTotals,
}

/// A named, ordered group of logged sets and template slots sharing one
/// variant tag within a workout. A block with zero logged sets still
/// renders from its template definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockID,
    pub label: String,
    pub tag: VariantTag,
    pub order: u32,
    pub template: Vec<TemplateExercise>,
    pub sets: Vec<LoggedSet>,
}

impl Block {
    #[must_use]
    pub fn totals(&self) -> BlockTotals {
        BlockTotals::fold(self.sets.iter())
    }

    /// Sets in display order: by set number ascending, numbered rows
    /// before unnumbered ones, then by completion time.
    #[must_use]
    pub fn sorted_sets(&self) -> Vec<&LoggedSet> {
        let mut sets = self.sets.iter().collect::<Vec<_>>();
        sets.sort_by(|a, b| a.cmp_order(b));
        sets
    }

    #[must_use]
    pub fn set_groups(&self) -> SetGroups<'_> {
        let sorted = self.sorted_sets();
        if self.tag.is_multi_exercise() {
            return SetGroups::Flat(sorted);
        }

        let mut groups: Vec<ExerciseGroup<'_>> = Vec::new();
        for set in sorted {
            match groups
                .iter_mut()
                .find(|group| group.exercise_id == set.exercise_id)
            {
                Some(group) => group.sets.push(set),
                None => groups.push(ExerciseGroup {
                    exercise_id: set.exercise_id,
                    sets: vec![set],
                    totals: BlockTotals::default(),
                }),
            }
        }
        for group in &mut groups {
            group.totals = BlockTotals::fold(group.sets.iter().copied());
        }
        SetGroups::ByExercise(groups)
    }

    /// Letter assignment for multi-exercise variants: declared letters
    /// win, then template declaration order, then the order in which
    /// exercises appear in the logged sets.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn letter_map(&self) -> BTreeMap<ExerciseID, char> {
        let mut ordered: Vec<(Option<char>, ExerciseID)> = Vec::new();

        for exercise in &self.template {
            ordered.extend(exercise.exercise_id.map(|id| (None, id)));
            for member in &exercise.members {
                ordered.extend(member.exercise_id.map(|id| (member.letter, id)));
            }
        }
        for set in self.sorted_sets() {
            match &set.variant {
                SetVariant::GiantSet { members } => {
                    for member in members {
                        ordered.extend(member.exercise_id.map(|id| (member.letter, id)));
                    }
                }
                SetVariant::Superset { first, second }
                | SetVariant::PreExhaustion {
                    isolation: first,
                    compound: second,
                } => {
                    ordered.extend(first.exercise_id.map(|id| (None, id)));
                    ordered.extend(second.exercise_id.map(|id| (None, id)));
                }
                _ => ordered.extend(set.exercise_id.map(|id| (None, id))),
            }
        }

        let mut map = BTreeMap::new();
        for (declared, id) in ordered {
            if map.contains_key(&id) {
                continue;
            }
            let position = map.len().min(25) as u8;
            map.insert(id, declared.unwrap_or(char::from(b'A' + position)));
        }
        map
    }
}

/// Builds the ordered block list for one workout: template-declared
/// blocks first (present even without any logged set), then blocks that
/// exist only in the log, in order of appearance.
#[must_use]
pub fn assemble_blocks(template: &[TemplateExercise], sets: Vec<LoggedSet>) -> Vec<Block> {
    let mut declared = template.iter().collect::<Vec<_>>();
    declared.sort_by_key(|e| (e.block_order, e.order));

    let mut blocks: Vec<Block> = Vec::new();
    for exercise in declared {
        match blocks.iter_mut().find(|b| b.id == exercise.block_id) {
            Some(block) => block.template.push(exercise.clone()),
            None => blocks.push(Block {
                id: exercise.block_id,
                label: exercise
                    .block_label
                    .as_ref()
                    .map_or_else(|| exercise.tag.label().to_string(), ToString::to_string),
                tag: exercise.tag,
                order: exercise.block_order,
                template: vec![exercise.clone()],
                sets: Vec::new(),
            }),
        }
    }

    let mut next_order = blocks.iter().map(|b| b.order + 1).max().unwrap_or(0);
    for set in sets {
        match blocks.iter_mut().find(|b| b.id == set.block_id) {
            Some(block) => block.sets.push(set),
            None => {
                let tag = set.variant.tag();
                blocks.push(Block {
                    id: set.block_id,
                    label: tag.label().to_string(),
                    tag,
                    order: next_order,
                    template: Vec::new(),
                    sets: vec![set],
                });
                next_order += 1;
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{GiantSetMember, PartnerSet, Reps, SetVariant, Weight};

    use super::*;

    fn set(id: u128, block_id: u128, exercise_id: Option<u128>, variant: SetVariant) -> LoggedSet {
        LoggedSet {
            id: id.into(),
            session_id: 1.into(),
            block_id: block_id.into(),
            exercise_id: exercise_id.map(Into::into),
            set_number: Some(u32::try_from(id).unwrap()),
            completed_at: None,
            variant,
        }
    }

    fn straight(weight: f32, reps: Option<u32>) -> SetVariant {
        SetVariant::StraightSet {
            weight: Some(Weight::new(weight).unwrap()),
            reps: reps.map(|r| Reps::new(r).unwrap()),
        }
    }

    fn template_exercise(block_id: u128, block_order: u32, tag: VariantTag) -> TemplateExercise {
        let mut exercise = TemplateExercise::new(1.into(), block_id.into(), tag);
        exercise.block_order = block_order;
        exercise
    }

    #[test]
    fn test_block_totals() {
        let block = Block {
            id: 1.into(),
            label: String::from("Straight set"),
            tag: VariantTag::StraightSet,
            order: 0,
            template: vec![],
            sets: vec![
                set(1, 1, Some(1), straight(100.0, Some(5))),
                set(2, 1, Some(1), straight(0.0, Some(10))),
                set(3, 1, Some(2), straight(50.0, None)),
            ],
        };

        assert_eq!(
            block.totals(),
            BlockTotals {
                sets: 3,
                reps: 15,
                weight_volume: 500.0,
            }
        );
    }

    #[test]
    fn test_superset_sets_stay_flat() {
        let superset = SetVariant::Superset {
            first: PartnerSet {
                exercise_id: Some(1.into()),
                weight: Some(Weight::new(60.0).unwrap()),
                reps: Some(Reps::new(8).unwrap()),
            },
            second: PartnerSet {
                exercise_id: Some(2.into()),
                weight: Some(Weight::new(40.0).unwrap()),
                reps: Some(Reps::new(12).unwrap()),
            },
        };
        let block = Block {
            id: 1.into(),
            label: String::from("Superset"),
            tag: VariantTag::Superset,
            order: 0,
            template: vec![],
            sets: vec![set(2, 1, Some(1), superset.clone()), set(1, 1, Some(1), superset)],
        };

        match block.set_groups() {
            SetGroups::Flat(sets) => {
                assert_eq!(
                    sets.iter().map(|s| s.id).collect::<Vec<_>>(),
                    vec![1.into(), 2.into()]
                );
            }
            SetGroups::ByExercise(_) => panic!("superset block must not be grouped by exercise"),
        }
    }

    #[test]
    fn test_grouping_by_exercise_with_subtotals() {
        let block = Block {
            id: 1.into(),
            label: String::from("Straight set"),
            tag: VariantTag::StraightSet,
            order: 0,
            template: vec![],
            sets: vec![
                set(1, 1, Some(1), straight(100.0, Some(5))),
                set(2, 1, Some(2), straight(60.0, Some(10))),
                set(3, 1, Some(1), straight(100.0, Some(3))),
            ],
        };

        match block.set_groups() {
            SetGroups::ByExercise(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].exercise_id, Some(1.into()));
                assert_eq!(
                    groups[0].totals,
                    BlockTotals {
                        sets: 2,
                        reps: 8,
                        weight_volume: 800.0,
                    }
                );
                assert_eq!(groups[1].exercise_id, Some(2.into()));
                assert_eq!(groups[1].totals.weight_volume, 600.0);
            }
            SetGroups::Flat(_) => panic!("straight set block must be grouped by exercise"),
        }
    }

    #[test]
    fn test_letter_map_by_member_position() {
        let block = Block {
            id: 1.into(),
            label: String::from("Giant set"),
            tag: VariantTag::GiantSet,
            order: 0,
            template: vec![],
            sets: vec![set(
                1,
                1,
                None,
                SetVariant::GiantSet {
                    members: vec![
                        GiantSetMember {
                            exercise_id: Some(10.into()),
                            ..GiantSetMember::default()
                        },
                        GiantSetMember {
                            exercise_id: Some(11.into()),
                            ..GiantSetMember::default()
                        },
                    ],
                },
            )],
        };

        assert_eq!(
            block.letter_map(),
            BTreeMap::from([(10.into(), 'A'), (11.into(), 'B')])
        );
    }

    #[test]
    fn test_letter_map_declared_letters_win() {
        let mut exercise = TemplateExercise::new(1.into(), 1.into(), VariantTag::GiantSet);
        exercise.members = vec![
            crate::TemplateMember {
                exercise_id: Some(10.into()),
                letter: Some('C'),
                ..crate::TemplateMember::default()
            },
            crate::TemplateMember {
                exercise_id: Some(11.into()),
                ..crate::TemplateMember::default()
            },
        ];
        let block = Block {
            id: 1.into(),
            label: String::from("Giant set"),
            tag: VariantTag::GiantSet,
            order: 0,
            template: vec![exercise],
            sets: vec![],
        };

        assert_eq!(
            block.letter_map(),
            BTreeMap::from([(10.into(), 'C'), (11.into(), 'B')])
        );
    }

    #[test]
    fn test_assemble_blocks_keeps_template_only_blocks() {
        let template = vec![
            template_exercise(1, 0, VariantTag::StraightSet),
            template_exercise(2, 1, VariantTag::Superset),
        ];
        let sets = vec![set(1, 2, Some(1), straight(60.0, Some(8)))];

        let blocks = assemble_blocks(&template, sets);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, 1.into());
        assert!(blocks[0].sets.is_empty());
        assert_eq!(blocks[0].template.len(), 1);
        assert_eq!(blocks[1].id, 2.into());
        assert_eq!(blocks[1].sets.len(), 1);
    }

    #[test]
    fn test_assemble_blocks_appends_log_only_blocks() {
        let template = vec![template_exercise(1, 0, VariantTag::StraightSet)];
        let sets = vec![
            set(1, 9, Some(1), straight(60.0, Some(8))),
            set(2, 9, Some(1), straight(60.0, Some(8))),
        ];

        let blocks = assemble_blocks(&template, sets);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].id, 9.into());
        assert_eq!(blocks[1].order, 1);
        assert_eq!(blocks[1].label, "Straight set");
        assert_eq!(blocks[1].sets.len(), 2);
    }
}
