//! PostgreSQL bootcamp repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{
    AggregateMetric, ApiError, Bootcamp, BootcampId, GeoPoint, ListParams, ListResult,
    NewBootcamp, UserId,
};
use crate::ports::BootcampRepository;

use super::db_err;
use super::filters::{push_order, push_where, push_window, Column, ColumnMap};

const COLUMNS: ColumnMap = &[
    ("name", Column::Scalar("name")),
    ("description", Column::Scalar("description")),
    ("website", Column::Scalar("website")),
    ("phone", Column::Scalar("phone")),
    ("email", Column::Scalar("email")),
    ("address", Column::Scalar("address")),
    ("careers", Column::TextArray("careers")),
    ("housing", Column::Scalar("housing")),
    ("jobAssistance", Column::Scalar("job_assistance")),
    ("jobGuarantee", Column::Scalar("job_guarantee")),
    ("acceptGi", Column::Scalar("accept_gi")),
    ("photo", Column::Scalar("photo")),
    ("averageCost", Column::Scalar("average_cost")),
    ("averageRating", Column::Scalar("average_rating")),
    ("createdAt", Column::Scalar("created_at")),
];

const SELECT: &str = "SELECT id, user_id, name, description, website, phone, email, address, \
     latitude, longitude, careers, housing, job_assistance, job_guarantee, accept_gi, \
     photo, average_cost, average_rating, created_at FROM bootcamps";

#[derive(sqlx::FromRow)]
struct BootcampRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    website: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    careers: Vec<String>,
    housing: bool,
    job_assistance: bool,
    job_guarantee: bool,
    accept_gi: bool,
    photo: Option<String>,
    average_cost: Option<f64>,
    average_rating: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<BootcampRow> for Bootcamp {
    fn from(row: BootcampRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        Bootcamp::from_storage(
            BootcampId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            NewBootcamp {
                name: row.name,
                description: row.description,
                website: row.website,
                phone: row.phone,
                email: row.email,
                address: row.address,
                location,
                careers: row.careers,
                housing: row.housing,
                job_assistance: row.job_assistance,
                job_guarantee: row.job_guarantee,
                accept_gi: row.accept_gi,
            },
            row.photo,
            row.average_cost,
            row.average_rating,
            row.created_at,
        )
    }
}

pub struct PgBootcampRepository {
    pool: PgPool,
}

impl PgBootcampRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BootcampRepository for PgBootcampRepository {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), ApiError> {
        let fields = bootcamp.to_new_bootcamp();
        sqlx::query(
            "INSERT INTO bootcamps (id, user_id, name, description, website, phone, email, \
             address, latitude, longitude, careers, housing, job_assistance, job_guarantee, \
             accept_gi, photo, average_cost, average_rating, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(bootcamp.id().as_uuid())
        .bind(bootcamp.owner().as_uuid())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.website)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(fields.location.map(|p| p.lat))
        .bind(fields.location.map(|p| p.lng))
        .bind(&fields.careers)
        .bind(fields.housing)
        .bind(fields.job_assistance)
        .bind(fields.job_guarantee)
        .bind(fields.accept_gi)
        .bind(bootcamp.photo())
        .bind(bootcamp.average_cost())
        .bind(bootcamp.average_rating())
        .bind(bootcamp.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), ApiError> {
        let fields = bootcamp.to_new_bootcamp();
        let result = sqlx::query(
            "UPDATE bootcamps SET name = $2, description = $3, website = $4, phone = $5, \
             email = $6, address = $7, latitude = $8, longitude = $9, careers = $10, \
             housing = $11, job_assistance = $12, job_guarantee = $13, accept_gi = $14 \
             WHERE id = $1",
        )
        .bind(bootcamp.id().as_uuid())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.website)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(fields.location.map(|p| p.lat))
        .bind(fields.location.map(|p| p.lng))
        .bind(&fields.careers)
        .bind(fields.housing)
        .bind(fields.job_assistance)
        .bind(fields.job_guarantee)
        .bind(fields.accept_gi)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(format!(
                "Bootcamp not found with id of {}",
                bootcamp.id()
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BootcampId) -> Result<Option<Bootcamp>, ApiError> {
        let row: Option<BootcampRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Bootcamp>, ApiError> {
        let row: Option<BootcampRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1 LIMIT 1", SELECT))
                .bind(owner.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn list(&self, params: &ListParams) -> Result<ListResult<Bootcamp>, ApiError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM bootcamps");
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

        let rows: Vec<BootcampRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(ListResult {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn find_within_radius(
        &self,
        center: GeoPoint,
        radius_miles: f64,
    ) -> Result<Vec<Bootcamp>, ApiError> {
        // Great-circle distance; least() guards acos against rounding
        // slightly above 1.
        let rows: Vec<BootcampRow> = sqlx::query_as(&format!(
            "{} WHERE latitude IS NOT NULL AND longitude IS NOT NULL \
             AND 3958.8 * acos(least(1.0, \
                 cos(radians($1)) * cos(radians(latitude)) * \
                 cos(radians(longitude) - radians($2)) + \
                 sin(radians($1)) * sin(radians(latitude)))) <= $3",
            SELECT
        ))
        .bind(center.lat)
        .bind(center.lng)
        .bind(radius_miles)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_aggregate(
        &self,
        id: &BootcampId,
        metric: AggregateMetric,
        value: f64,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(&format!(
            "UPDATE bootcamps SET {} = $2 WHERE id = $1",
            metric.field_name()
        ))
        .bind(id.as_uuid())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_photo(&self, id: &BootcampId, filename: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE bootcamps SET photo = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(filename)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &BootcampId) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
