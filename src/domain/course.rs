//! Course entity. Courses belong to exactly one bootcamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ApiError, BootcampId, CourseId, UserId, ValidationError};

/// Minimum skill level required by a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

impl MinimumSkill {
    pub fn as_str(&self) -> &'static str {
        match self {
            MinimumSkill::Beginner => "beginner",
            MinimumSkill::Intermediate => "intermediate",
            MinimumSkill::Advanced => "advanced",
        }
    }
}

impl fmt::Display for MinimumSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MinimumSkill {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(MinimumSkill::Beginner),
            "intermediate" => Ok(MinimumSkill::Intermediate),
            "advanced" => Ok(MinimumSkill::Advanced),
            other => Err(ApiError::bad_request(format!(
                "Unknown minimum skill: {}",
                other
            ))),
        }
    }
}

/// Client-supplied fields for creating a course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarships_available: bool,
}

/// Client-supplied partial update for a course.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<f64>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarships_available: Option<bool>,
}

/// A course offered by a bootcamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    bootcamp: BootcampId,
    user: UserId,
    title: String,
    description: String,
    weeks: String,
    tuition: f64,
    minimum_skill: MinimumSkill,
    scholarships_available: bool,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course under `bootcamp`, owned by `user`.
    pub fn new(
        id: CourseId,
        bootcamp: BootcampId,
        user: UserId,
        input: NewCourse,
    ) -> Result<Self, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        if input.description.trim().is_empty() {
            return Err(ValidationError::empty_field("description").into());
        }
        validate_tuition(input.tuition)?;

        Ok(Self {
            id,
            bootcamp,
            user,
            title: input.title,
            description: input.description,
            weeks: input.weeks,
            tuition: input.tuition,
            minimum_skill: input.minimum_skill,
            scholarships_available: input.scholarships_available,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a course from stored state. No validation is applied.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: CourseId,
        bootcamp: BootcampId,
        user: UserId,
        title: String,
        description: String,
        weeks: String,
        tuition: f64,
        minimum_skill: MinimumSkill,
        scholarships_available: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            bootcamp,
            user,
            title,
            description,
            weeks,
            tuition,
            minimum_skill,
            scholarships_available,
            created_at,
        }
    }

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    /// The parent bootcamp this course belongs to.
    pub fn bootcamp(&self) -> &BootcampId {
        &self.bootcamp
    }

    /// The immutable owner set at creation.
    pub fn owner(&self) -> &UserId {
        &self.user
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn weeks(&self) -> &str {
        &self.weeks
    }

    pub fn tuition(&self) -> f64 {
        self.tuition
    }

    pub fn minimum_skill(&self) -> MinimumSkill {
        self.minimum_skill
    }

    pub fn scholarships_available(&self) -> bool {
        self.scholarships_available
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a client update. Parent and owner are untouchable.
    pub fn apply_update(&mut self, update: CourseUpdate) -> Result<(), ApiError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::empty_field("title").into());
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(ValidationError::empty_field("description").into());
            }
            self.description = description;
        }
        if let Some(weeks) = update.weeks {
            self.weeks = weeks;
        }
        if let Some(tuition) = update.tuition {
            validate_tuition(tuition)?;
            self.tuition = tuition;
        }
        if let Some(minimum_skill) = update.minimum_skill {
            self.minimum_skill = minimum_skill;
        }
        if let Some(scholarships_available) = update.scholarships_available {
            self.scholarships_available = scholarships_available;
        }
        Ok(())
    }
}

fn validate_tuition(tuition: f64) -> Result<(), ApiError> {
    if !tuition.is_finite() || tuition < 0.0 {
        return Err(ValidationError::invalid_format("tuition", "must be a non-negative number").into());
    }
    Ok(())
}
