//! Bootcamp listing entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, BootcampId, UserId, ValidationError};

/// A geographic point, produced by the geocoder and stored on listings
/// for radius lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A derived numeric field on a bootcamp, recomputed from a child
/// collection and persisted via a targeted partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMetric {
    AverageCost,
    AverageRating,
}

impl AggregateMetric {
    /// Column/field name the metric is stored under.
    pub fn field_name(&self) -> &'static str {
        match self {
            AggregateMetric::AverageCost => "average_cost",
            AggregateMetric::AverageRating => "average_rating",
        }
    }
}

/// Client-supplied fields for creating a bootcamp.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBootcamp {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

/// Client-supplied partial update. Absent fields are left untouched.
///
/// The derived aggregates and the owner are deliberately not represented
/// here; they can never be written by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootcampUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

/// A bootcamp listing.
///
/// `average_cost` and `average_rating` are derived from the course and
/// review collections and only ever written by the aggregate recomputer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootcamp {
    id: BootcampId,
    user: UserId,
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<GeoPoint>,
    careers: Vec<String>,
    housing: bool,
    job_assistance: bool,
    job_guarantee: bool,
    accept_gi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    average_rating: Option<f64>,
    created_at: DateTime<Utc>,
}

impl Bootcamp {
    /// Creates a bootcamp owned by `user`.
    pub fn new(id: BootcampId, user: UserId, input: NewBootcamp) -> Result<Self, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name").into());
        }
        if input.description.trim().is_empty() {
            return Err(ValidationError::empty_field("description").into());
        }

        Ok(Self {
            id,
            user,
            name: input.name,
            description: input.description,
            website: input.website,
            phone: input.phone,
            email: input.email,
            address: input.address,
            location: input.location,
            careers: input.careers,
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            photo: None,
            average_cost: None,
            average_rating: None,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a bootcamp from stored state. No validation is applied.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: BootcampId,
        user: UserId,
        input: NewBootcamp,
        photo: Option<String>,
        average_cost: Option<f64>,
        average_rating: Option<f64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            name: input.name,
            description: input.description,
            website: input.website,
            phone: input.phone,
            email: input.email,
            address: input.address,
            location: input.location,
            careers: input.careers,
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            photo,
            average_cost,
            average_rating,
            created_at,
        }
    }

    pub fn id(&self) -> &BootcampId {
        &self.id
    }

    /// The immutable owner set at creation.
    pub fn owner(&self) -> &UserId {
        &self.user
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn careers(&self) -> &[String] {
        &self.careers
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn average_cost(&self) -> Option<f64> {
        self.average_cost
    }

    pub fn average_rating(&self) -> Option<f64> {
        self.average_rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a client update. The owner and derived fields are untouchable.
    pub fn apply_update(&mut self, update: BootcampUpdate) -> Result<(), ApiError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("name").into());
            }
            self.name = name;
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(ValidationError::empty_field("description").into());
            }
            self.description = description;
        }
        if let Some(website) = update.website {
            self.website = Some(website);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(careers) = update.careers {
            self.careers = careers;
        }
        if let Some(housing) = update.housing {
            self.housing = housing;
        }
        if let Some(job_assistance) = update.job_assistance {
            self.job_assistance = job_assistance;
        }
        if let Some(job_guarantee) = update.job_guarantee {
            self.job_guarantee = job_guarantee;
        }
        if let Some(accept_gi) = update.accept_gi {
            self.accept_gi = accept_gi;
        }
        Ok(())
    }

    /// Store-adapter hook: records the uploaded photo filename.
    pub fn set_photo(&mut self, filename: String) {
        self.photo = Some(filename);
    }

    /// Recomputer hook: writes the derived average course cost.
    pub fn set_average_cost(&mut self, value: f64) {
        self.average_cost = Some(value);
    }

    /// Recomputer hook: writes the derived average review rating.
    pub fn set_average_rating(&mut self, value: f64) {
        self.average_rating = Some(value);
    }

    /// Extracts the mutable fields for storage adapters.
    pub fn to_new_bootcamp(&self) -> NewBootcamp {
        NewBootcamp {
            name: self.name.clone(),
            description: self.description.clone(),
            website: self.website.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            location: self.location,
            careers: self.careers.clone(),
            housing: self.housing,
            job_assistance: self.job_assistance,
            job_guarantee: self.job_guarantee,
            accept_gi: self.accept_gi,
        }
    }
}
