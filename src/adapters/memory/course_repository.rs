//! In-memory implementation of CourseRepository.

use async_trait::async_trait;
use std::sync::RwLock;

use super::filtering::select_page;
use super::poisoned;
use crate::domain::{ApiError, BootcampId, Course, CourseId, ListParams, ListResult};
use crate::ports::CourseRepository;

/// In-memory course store. Backs tests and local runs without a database.
#[derive(Default)]
pub struct MemoryCourseRepository {
    courses: RwLock<Vec<Course>>,
}

impl MemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for MemoryCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), ApiError> {
        let mut courses = self.courses.write().map_err(poisoned)?;
        courses.push(course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), ApiError> {
        let mut courses = self.courses.write().map_err(poisoned)?;
        match courses.iter_mut().find(|c| c.id() == course.id()) {
            Some(existing) => {
                *existing = course.clone();
                Ok(())
            }
            None => Err(ApiError::not_found("No course found")),
        }
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, ApiError> {
        let courses = self.courses.read().map_err(poisoned)?;
        Ok(courses.iter().find(|c| c.id() == id).cloned())
    }

    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Course>, ApiError> {
        let courses = self.courses.read().map_err(poisoned)?;
        Ok(courses
            .iter()
            .filter(|c| c.bootcamp() == bootcamp)
            .cloned()
            .collect())
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Course>, ApiError> {
        let courses = self.courses.read().map_err(poisoned)?;
        Ok(select_page(&courses, params))
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, ApiError> {
        let mut courses = self.courses.write().map_err(poisoned)?;
        let before = courses.len();
        courses.retain(|c| c.id() != id);
        Ok(courses.len() < before)
    }

    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError> {
        let mut courses = self.courses.write().map_err(poisoned)?;
        let before = courses.len();
        courses.retain(|c| c.bootcamp() != bootcamp);
        Ok((before - courses.len()) as u64)
    }
}
