use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::career_path::errors::CareerPathIdError;
use crate::career_path::errors::TextFieldError;
use crate::user::models::UserId;

/// Career path owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerPath {
    pub id: CareerPathId,
    pub owner: UserId,
    pub title: Title,
    pub description: Description,
    pub required_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CareerPathId(pub Uuid);

impl CareerPathId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, CareerPathIdError> {
        Uuid::parse_str(s)
            .map(CareerPathId)
            .map_err(|e| CareerPathIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CareerPathId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CareerPathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn required_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, TextFieldError> {
    let value = value.trim().to_string();
    let length = value.chars().count();

    if length == 0 {
        return Err(TextFieldError::Empty { field });
    }
    if length > max {
        return Err(TextFieldError::TooLong {
            field,
            max,
            actual: length,
        });
    }
    Ok(value)
}

/// Career path title: trimmed, non-empty, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    const MAX_LENGTH: usize = 200;

    pub fn new(title: String) -> Result<Self, TextFieldError> {
        required_text("Title", title, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Career path description: trimmed, non-empty, at most 5000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    const MAX_LENGTH: usize = 5000;

    pub fn new(description: String) -> Result<Self, TextFieldError> {
        required_text("Description", description, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a career path for the calling identity
#[derive(Debug)]
pub struct CreateCareerPathCommand {
    pub title: Title,
    pub description: Description,
    pub required_skills: Vec<String>,
}

impl CreateCareerPathCommand {
    /// Build a command, dropping blank skills and trimming the rest.
    pub fn new(title: Title, description: Description, required_skills: Vec<String>) -> Self {
        let required_skills = required_skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        Self {
            title,
            description,
            required_skills,
        }
    }
}
