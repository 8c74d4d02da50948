use std::collections::{BTreeMap, BTreeSet};

use derive_more::Deref;
use uuid::Uuid;

use crate::{Name, NameRole, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    /// Resolves exercise names for all given IDs in one batched lookup.
    /// IDs without a stored name are simply absent from the result.
    async fn read_exercise_names(
        &self,
        ids: &BTreeSet<ExerciseID>,
    ) -> Result<Vec<Exercise>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Exercise ID to display name mapping for a single page load.
///
/// Names are declared in precedence order: template-declared names
/// first, then names attached to logged rows, then the results of the
/// batched lookup. The first declaration for an ID wins, so a
/// template-declared name is never overridden by a logged one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseNameTable(BTreeMap<ExerciseID, String>);

impl ExerciseNameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, id: ExerciseID, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        self.0.entry(id).or_insert_with(|| trimmed.to_string());
    }

    #[must_use]
    pub fn get(&self, id: ExerciseID) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Resolution never fails. An unresolvable or absent reference
    /// yields the placeholder for the role the reference appears in.
    #[must_use]
    pub fn get_or_placeholder(&self, id: Option<ExerciseID>, role: NameRole) -> String {
        id.and_then(|id| self.get(id))
            .map_or_else(|| role.placeholder(), ToString::to_string)
    }

    #[must_use]
    pub fn missing(&self, referenced: &BTreeSet<ExerciseID>) -> BTreeSet<ExerciseID> {
        referenced
            .iter()
            .filter(|id| !self.0.contains_key(*id))
            .copied()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exercise_name_table_first_declaration_wins() {
        let mut names = ExerciseNameTable::new();
        names.declare(1.into(), "Squat");
        names.declare(1.into(), "Back Squat");

        assert_eq!(names.get(1.into()), Some("Squat"));
    }

    #[test]
    fn test_exercise_name_table_ignores_blank_names() {
        let mut names = ExerciseNameTable::new();
        names.declare(1.into(), "  ");

        assert!(names.is_empty());
        assert_eq!(names.get(1.into()), None);
    }

    #[test]
    fn test_exercise_name_table_placeholder() {
        let mut names = ExerciseNameTable::new();
        names.declare(1.into(), "Leg Extension");

        assert_eq!(
            names.get_or_placeholder(Some(1.into()), NameRole::Isolation),
            "Leg Extension"
        );
        assert_eq!(
            names.get_or_placeholder(Some(2.into()), NameRole::Isolation),
            "Isolation"
        );
        assert_eq!(
            names.get_or_placeholder(None, NameRole::Partner('B')),
            "Exercise B"
        );
    }

    #[test]
    fn test_exercise_name_table_missing() {
        let mut names = ExerciseNameTable::new();
        names.declare(1.into(), "Squat");

        assert_eq!(
            names.missing(&BTreeSet::from([1.into(), 2.into(), 3.into()])),
            BTreeSet::from([2.into(), 3.into()])
        );
    }

    #[test]
    fn test_exercise_id_nil() {
        assert!(ExerciseID::nil().is_nil());
        assert_eq!(ExerciseID::nil(), ExerciseID::default());
    }
}
