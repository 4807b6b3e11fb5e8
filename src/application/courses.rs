//! Course CRUD service.
//!
//! Every successful mutation triggers a best-effort recompute of the
//! parent bootcamp's `averageCost`. Updates recompute unconditionally,
//! even when tuition did not change.

use std::sync::Arc;

use crate::domain::{
    Actor, AggregateMetric, ApiError, BootcampId, Course, CourseId, CourseUpdate, ListParams,
    ListResult, NewCourse, OwnershipGuard, Role,
};
use crate::ports::{BootcampRepository, CourseRepository};

use super::AggregateRecomputer;

/// Fields clients may filter, sort or select on for course lists.
pub const COURSE_QUERY_FIELDS: &[&str] = &[
    "title",
    "description",
    "weeks",
    "tuition",
    "minimumSkill",
    "scholarshipsAvailable",
    "createdAt",
];

const MUTATE_ROLES: &[Role] = &[Role::Publisher];

/// CRUD operations for courses under a bootcamp.
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    bootcamps: Arc<dyn BootcampRepository>,
    recomputer: Arc<AggregateRecomputer>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        bootcamps: Arc<dyn BootcampRepository>,
        recomputer: Arc<AggregateRecomputer>,
    ) -> Self {
        Self {
            courses,
            bootcamps,
            recomputer,
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<ListResult<Course>, ApiError> {
        self.courses.list(params).await
    }

    pub async fn list_for_bootcamp(
        &self,
        bootcamp: &BootcampId,
    ) -> Result<Vec<Course>, ApiError> {
        self.courses.find_by_bootcamp(bootcamp).await
    }

    pub async fn get(&self, id: &CourseId) -> Result<Course, ApiError> {
        self.require_course(id).await
    }

    /// Adds a course to a bootcamp. Only the bootcamp owner (or an admin)
    /// may add courses to it.
    pub async fn create(
        &self,
        actor: &Actor,
        bootcamp_id: &BootcampId,
        input: NewCourse,
    ) -> Result<Course, ApiError> {
        let bootcamp = self.bootcamps.find_by_id(bootcamp_id).await?.ok_or_else(|| {
            ApiError::not_found(format!("Bootcamp not found with id of {}", bootcamp_id))
        })?;
        OwnershipGuard::authorize(actor, bootcamp.owner(), MUTATE_ROLES, "bootcamp")?;

        let course = Course::new(CourseId::new(), *bootcamp_id, actor.id, input)?;
        self.courses.insert(&course).await?;

        self.recomputer
            .resync(bootcamp_id, AggregateMetric::AverageCost)
            .await;
        Ok(course)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &CourseId,
        update: CourseUpdate,
    ) -> Result<Course, ApiError> {
        let mut course = self.require_course(id).await?;
        OwnershipGuard::authorize(actor, course.owner(), MUTATE_ROLES, "course")?;

        course.apply_update(update)?;
        self.courses.update(&course).await?;

        self.recomputer
            .resync(course.bootcamp(), AggregateMetric::AverageCost)
            .await;
        Ok(course)
    }

    pub async fn delete(&self, actor: &Actor, id: &CourseId) -> Result<(), ApiError> {
        let course = self.require_course(id).await?;
        OwnershipGuard::authorize(actor, course.owner(), MUTATE_ROLES, "course")?;

        self.courses.delete(id).await?;

        self.recomputer
            .resync(course.bootcamp(), AggregateMetric::AverageCost)
            .await;
        Ok(())
    }

    async fn require_course(&self, id: &CourseId) -> Result<Course, ApiError> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Course not found with id of {}", id)))
    }
}
