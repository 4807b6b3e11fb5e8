//! PostgreSQL course repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{
    ApiError, BootcampId, Course, CourseId, ListParams, ListResult, MinimumSkill, UserId,
};
use crate::ports::CourseRepository;

use super::db_err;
use super::filters::{push_order, push_where, push_window, Column, ColumnMap};

const COLUMNS: ColumnMap = &[
    ("title", Column::Scalar("title")),
    ("description", Column::Scalar("description")),
    ("weeks", Column::Scalar("weeks")),
    ("tuition", Column::Scalar("tuition")),
    ("minimumSkill", Column::Scalar("minimum_skill")),
    ("scholarshipsAvailable", Column::Scalar("scholarships_available")),
    ("createdAt", Column::Scalar("created_at")),
];

const SELECT: &str = "SELECT id, bootcamp_id, user_id, title, description, weeks, tuition, \
     minimum_skill, scholarships_available, created_at FROM courses";

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    bootcamp_id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    weeks: String,
    tuition: f64,
    minimum_skill: String,
    scholarships_available: bool,
    created_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> Result<Course, ApiError> {
        let minimum_skill = parse_skill(&self.minimum_skill)?;
        Ok(Course::from_storage(
            CourseId::from_uuid(self.id),
            BootcampId::from_uuid(self.bootcamp_id),
            UserId::from_uuid(self.user_id),
            self.title,
            self.description,
            self.weeks,
            self.tuition,
            minimum_skill,
            self.scholarships_available,
            self.created_at,
        ))
    }
}

fn parse_skill(raw: &str) -> Result<MinimumSkill, ApiError> {
    match raw {
        "beginner" => Ok(MinimumSkill::Beginner),
        "intermediate" => Ok(MinimumSkill::Intermediate),
        "advanced" => Ok(MinimumSkill::Advanced),
        other => Err(ApiError::database(format!(
            "unknown minimum_skill value: {}",
            other
        ))),
    }
}

pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO courses (id, bootcamp_id, user_id, title, description, weeks, \
             tuition, minimum_skill, scholarships_available, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(course.id().as_uuid())
        .bind(course.bootcamp().as_uuid())
        .bind(course.owner().as_uuid())
        .bind(course.title())
        .bind(course.description())
        .bind(course.weeks())
        .bind(course.tuition())
        .bind(course.minimum_skill().as_str())
        .bind(course.scholarships_available())
        .bind(course.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE courses SET title = $2, description = $3, weeks = $4, tuition = $5, \
             minimum_skill = $6, scholarships_available = $7 WHERE id = $1",
        )
        .bind(course.id().as_uuid())
        .bind(course.title())
        .bind(course.description())
        .bind(course.weeks())
        .bind(course.tuition())
        .bind(course.minimum_skill().as_str())
        .bind(course.scholarships_available())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!(
                "Course not found with id of {}",
                course.id()
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, ApiError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(CourseRow::into_course).transpose()
    }

    async fn find_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<Vec<Course>, ApiError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "{} WHERE bootcamp_id = $1 ORDER BY created_at DESC",
            SELECT
        ))
        .bind(bootcamp.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Course>, ApiError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM courses");
        push_where(&mut count, &params.filters, COLUMNS)?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let mut query = QueryBuilder::<Postgres>::new(SELECT);
        push_where(&mut query, &params.filters, COLUMNS)?;
        push_order(&mut query, &params.sort, COLUMNS)?;
        push_window(&mut query, params);

        let rows: Vec<CourseRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(ListResult {
            items: rows
                .into_iter()
                .map(CourseRow::into_course)
                .collect::<Result<_, _>>()?,
            total: total as u64,
        })
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_bootcamp(&self, bootcamp: &BootcampId) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM courses WHERE bootcamp_id = $1")
            .bind(bootcamp.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
