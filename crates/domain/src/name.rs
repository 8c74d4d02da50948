use derive_more::{AsRef, Display};

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed_name.len();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}

/// Role in which an exercise reference appears within a set or template
/// entry. Determines the placeholder shown when the reference cannot be
/// resolved to a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    Primary,
    Partner(char),
    Member(usize),
    Isolation,
    Compound,
}

impl NameRole {
    #[must_use]
    pub fn placeholder(self) -> String {
        match self {
            NameRole::Primary => String::from("Exercise"),
            NameRole::Partner(letter) => format!("Exercise {letter}"),
            NameRole::Member(index) => format!("Exercise {}", index + 1),
            NameRole::Isolation => String::from("Isolation"),
            NameRole::Compound => String::from("Compound"),
        }
    }
}
