use std::collections::BTreeSet;

use strum::{Display, EnumIter, EnumString};

use crate::{ExerciseID, Percentage, Reps, Seconds, SetRow, Weight};

/// Exercise type vocabulary shared by logged sets and template
/// exercises. The wire representation is the snake_case tag stored on
/// each row.
#[derive(
    Debug, Display, EnumString, EnumIter, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
)]
#[strum(serialize_all = "snake_case")]
pub enum VariantTag {
    #[default]
    StraightSet,
    Superset,
    GiantSet,
    DropSet,
    ClusterSet,
    RestPause,
    PreExhaustion,
    Amrap,
    Emom,
    ForTime,
    Tabata,
    Circuit,
}

impl VariantTag {
    /// Total classification of a raw tag field. Unknown or missing tags
    /// fall back to the straight set, never an error.
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        raw.and_then(|tag| tag.parse().ok()).unwrap_or_default()
    }

    /// Tags whose sets span more than one exercise. Their sets are
    /// never grouped by a single exercise ID.
    #[must_use]
    pub fn is_multi_exercise(self) -> bool {
        matches!(
            self,
            VariantTag::Superset | VariantTag::GiantSet | VariantTag::PreExhaustion
        )
    }

    /// Noun used when titling the n-th entry of a block.
    #[must_use]
    pub fn unit_label(self) -> &'static str {
        match self {
            VariantTag::GiantSet | VariantTag::Tabata => "Round",
            VariantTag::Emom => "Minute",
            _ => "Set",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VariantTag::StraightSet => "Straight set",
            VariantTag::Superset => "Superset",
            VariantTag::GiantSet => "Giant set",
            VariantTag::DropSet => "Drop set",
            VariantTag::ClusterSet => "Cluster set",
            VariantTag::RestPause => "Rest-pause",
            VariantTag::PreExhaustion => "Pre-exhaustion",
            VariantTag::Amrap => "AMRAP",
            VariantTag::Emom => "EMOM",
            VariantTag::ForTime => "For time",
            VariantTag::Tabata => "Tabata",
            VariantTag::Circuit => "Circuit",
        }
    }
}

/// One half of a two-exercise set (superset partner, pre-exhaustion
/// isolation or compound part).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PartnerSet {
    pub exercise_id: Option<ExerciseID>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GiantSetMember {
    pub exercise_id: Option<ExerciseID>,
    pub exercise_name: Option<String>,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
    pub letter: Option<char>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CircuitMember {
    pub exercise_id: Option<ExerciseID>,
    pub exercise_name: Option<String>,
    pub work: Option<Seconds>,
    pub rest_after: Option<Seconds>,
}

/// Typed interpretation of a logged set. Each variant carries only the
/// fields its tag uses; everything else on the raw row is dropped at
/// classification and cannot leak into later computation.
#[derive(Debug, Clone, PartialEq)]
pub enum SetVariant {
    StraightSet {
        weight: Option<Weight>,
        reps: Option<Reps>,
    },
    Superset {
        first: PartnerSet,
        second: PartnerSet,
    },
    GiantSet {
        members: Vec<GiantSetMember>,
    },
    DropSet {
        weight: Option<Weight>,
        reps: Option<Reps>,
        drop_weight: Option<Weight>,
        drop_reps: Option<Reps>,
        drop_percentage: Option<Percentage>,
    },
    ClusterSet {
        weight: Option<Weight>,
        reps: Option<Reps>,
        cluster: Option<u32>,
    },
    RestPause {
        weight: Option<Weight>,
        reps: Option<Reps>,
        pause_reps: Option<Reps>,
        pause_number: Option<u32>,
    },
    PreExhaustion {
        isolation: PartnerSet,
        compound: PartnerSet,
    },
    Amrap {
        weight: Option<Weight>,
        reps: Option<Reps>,
        total_reps: Option<Reps>,
        target_reps: Option<Reps>,
        elapsed: Option<Seconds>,
    },
    Emom {
        reps: Option<Reps>,
        minute: Option<u32>,
        duration: Option<Seconds>,
    },
    ForTime {
        weight: Option<Weight>,
        reps: Option<Reps>,
        total_reps: Option<Reps>,
        target_reps: Option<Reps>,
        elapsed: Option<Seconds>,
        cap: Option<Seconds>,
    },
    Tabata {
        round: Option<u32>,
        rounds_completed: Option<u32>,
        duration: Option<Seconds>,
    },
    Circuit {
        members: Vec<CircuitMember>,
        set_number: Option<u32>,
    },
}

impl SetVariant {
    /// The single classification step at the boundary: interprets a raw
    /// row according to its tag and keeps only the tag-relevant fields.
    #[must_use]
    pub fn classify(row: &SetRow) -> Self {
        let tag = VariantTag::classify(row.exercise_type.as_deref());
        match tag {
            VariantTag::StraightSet => SetVariant::StraightSet {
                weight: row.weight,
                reps: row.reps,
            },
            VariantTag::Superset => SetVariant::Superset {
                first: PartnerSet {
                    exercise_id: row.exercise_id,
                    weight: row.weight,
                    reps: row.reps,
                },
                second: PartnerSet {
                    exercise_id: row.superset_exercise_id,
                    weight: row.superset_weight,
                    reps: row.superset_reps,
                },
            },
            VariantTag::GiantSet => SetVariant::GiantSet {
                members: row.giant_set_exercises.clone(),
            },
            VariantTag::DropSet => SetVariant::DropSet {
                weight: row.weight,
                reps: row.reps,
                drop_weight: row.drop_weight,
                drop_reps: row.drop_reps,
                drop_percentage: row.drop_percentage,
            },
            VariantTag::ClusterSet => SetVariant::ClusterSet {
                weight: row.weight,
                reps: row.reps,
                cluster: row.cluster_number,
            },
            VariantTag::RestPause => SetVariant::RestPause {
                weight: row.weight,
                reps: row.reps,
                pause_reps: row.rest_pause_reps,
                pause_number: row.rest_pause_number,
            },
            VariantTag::PreExhaustion => SetVariant::PreExhaustion {
                isolation: PartnerSet {
                    exercise_id: row.isolation_exercise_id,
                    weight: row.weight,
                    reps: row.reps,
                },
                compound: PartnerSet {
                    exercise_id: row.compound_exercise_id,
                    weight: row.compound_weight,
                    reps: row.compound_reps,
                },
            },
            VariantTag::Amrap => SetVariant::Amrap {
                weight: row.weight,
                reps: row.reps,
                total_reps: row.total_reps,
                target_reps: row.target_reps,
                elapsed: row.elapsed_seconds,
            },
            VariantTag::Emom => SetVariant::Emom {
                reps: row.reps,
                minute: row.minute_number,
                duration: row.total_duration_seconds,
            },
            VariantTag::ForTime => SetVariant::ForTime {
                weight: row.weight,
                reps: row.reps,
                total_reps: row.total_reps,
                target_reps: row.target_reps,
                elapsed: row.elapsed_seconds,
                cap: row.time_cap_seconds,
            },
            VariantTag::Tabata => SetVariant::Tabata {
                round: row.round_number,
                rounds_completed: row.rounds_completed,
                duration: row.total_duration_seconds,
            },
            VariantTag::Circuit => SetVariant::Circuit {
                members: row.circuit_exercises.clone(),
                set_number: row.circuit_set_number,
            },
        }
    }

    #[must_use]
    pub fn tag(&self) -> VariantTag {
        match self {
            SetVariant::StraightSet { .. } => VariantTag::StraightSet,
            SetVariant::Superset { .. } => VariantTag::Superset,
            SetVariant::GiantSet { .. } => VariantTag::GiantSet,
            SetVariant::DropSet { .. } => VariantTag::DropSet,
            SetVariant::ClusterSet { .. } => VariantTag::ClusterSet,
            SetVariant::RestPause { .. } => VariantTag::RestPause,
            SetVariant::PreExhaustion { .. } => VariantTag::PreExhaustion,
            SetVariant::Amrap { .. } => VariantTag::Amrap,
            SetVariant::Emom { .. } => VariantTag::Emom,
            SetVariant::ForTime { .. } => VariantTag::ForTime,
            SetVariant::Tabata { .. } => VariantTag::Tabata,
            SetVariant::Circuit { .. } => VariantTag::Circuit,
        }
    }

    /// All exercise IDs referenced in any role within the variant.
    #[must_use]
    pub fn exercise_refs(&self) -> BTreeSet<ExerciseID> {
        let mut refs = BTreeSet::new();
        match self {
            SetVariant::Superset { first, second } => {
                refs.extend(first.exercise_id);
                refs.extend(second.exercise_id);
            }
            SetVariant::GiantSet { members } => {
                refs.extend(members.iter().filter_map(|m| m.exercise_id));
            }
            SetVariant::PreExhaustion {
                isolation,
                compound,
            } => {
                refs.extend(isolation.exercise_id);
                refs.extend(compound.exercise_id);
            }
            SetVariant::Circuit { members, .. } => {
                refs.extend(members.iter().filter_map(|m| m.exercise_id));
            }
            _ => {}
        }
        refs
    }

    /// Total repetitions performed, with missing values counted as
    /// zero. AMRAP and for-time sets report their total rep count and
    /// fall back to the generic rep field.
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        fn reps(value: Option<Reps>) -> u32 {
            value.map_or(0, u32::from)
        }

        match self {
            SetVariant::StraightSet { reps: r, .. }
            | SetVariant::ClusterSet { reps: r, .. }
            | SetVariant::Emom { reps: r, .. } => reps(*r),
            SetVariant::Superset { first, second }
            | SetVariant::PreExhaustion {
                isolation: first,
                compound: second,
            } => reps(first.reps) + reps(second.reps),
            SetVariant::GiantSet { members } => members.iter().map(|m| reps(m.reps)).sum(),
            SetVariant::DropSet {
                reps: r,
                drop_reps,
                ..
            }
            | SetVariant::RestPause {
                reps: r,
                pause_reps: drop_reps,
                ..
            } => reps(*r) + reps(*drop_reps),
            SetVariant::Amrap {
                reps: r,
                total_reps,
                ..
            }
            | SetVariant::ForTime {
                reps: r,
                total_reps,
                ..
            } => reps(total_reps.or(*r)),
            SetVariant::Tabata { .. } | SetVariant::Circuit { .. } => 0,
        }
    }

    /// Weight-volume (Σ weight × reps) contributed by the set, with
    /// missing values counted as zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weight_volume(&self) -> f32 {
        fn volume(weight: Option<Weight>, reps: Option<Reps>) -> f32 {
            weight.map_or(0.0, f32::from) * reps.map_or(0, u32::from) as f32
        }

        match self {
            SetVariant::StraightSet { weight, reps }
            | SetVariant::ClusterSet { weight, reps, .. } => volume(*weight, *reps),
            SetVariant::Superset { first, second }
            | SetVariant::PreExhaustion {
                isolation: first,
                compound: second,
            } => volume(first.weight, first.reps) + volume(second.weight, second.reps),
            SetVariant::GiantSet { members } => {
                members.iter().map(|m| volume(m.weight, m.reps)).sum()
            }
            SetVariant::DropSet {
                weight,
                reps,
                drop_weight,
                drop_reps,
                ..
            } => volume(*weight, *reps) + volume(*drop_weight, *drop_reps),
            SetVariant::RestPause {
                weight,
                reps,
                pause_reps,
                ..
            } => volume(*weight, *reps) + volume(*weight, *pause_reps),
            SetVariant::Amrap {
                weight,
                reps,
                total_reps,
                ..
            }
            | SetVariant::ForTime {
                weight,
                reps,
                total_reps,
                ..
            } => volume(*weight, total_reps.or(*reps)),
            SetVariant::Emom { .. } | SetVariant::Tabata { .. } | SetVariant::Circuit { .. } => 0.0,
        }
    }
}
