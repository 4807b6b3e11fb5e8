//! Bootcamp CRUD service.

use std::sync::Arc;

use crate::domain::{
    Actor, ApiError, Bootcamp, BootcampId, BootcampUpdate, ListParams, ListResult, NewBootcamp,
    OwnershipGuard, Role,
};
use crate::ports::{
    BootcampRepository, CourseRepository, Geocoder, PhotoStorage, ReviewRepository,
};

/// Fields clients may filter, sort or select on for bootcamp lists.
pub const BOOTCAMP_QUERY_FIELDS: &[&str] = &[
    "name",
    "description",
    "website",
    "phone",
    "email",
    "address",
    "careers",
    "housing",
    "jobAssistance",
    "jobGuarantee",
    "acceptGi",
    "photo",
    "averageCost",
    "averageRating",
    "createdAt",
];

/// Roles allowed to publish and mutate bootcamps (admin always passes).
const PUBLISH_ROLES: &[Role] = &[Role::Publisher];

/// Accepted photo content types and their file extensions.
const PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
];

/// CRUD operations for bootcamp listings, with ownership authorization and
/// cascade deletion of child collections.
pub struct BootcampService {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    reviews: Arc<dyn ReviewRepository>,
    geocoder: Arc<dyn Geocoder>,
    photos: Arc<dyn PhotoStorage>,
    max_photo_bytes: u64,
}

impl BootcampService {
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        courses: Arc<dyn CourseRepository>,
        reviews: Arc<dyn ReviewRepository>,
        geocoder: Arc<dyn Geocoder>,
        photos: Arc<dyn PhotoStorage>,
        max_photo_bytes: u64,
    ) -> Self {
        Self {
            bootcamps,
            courses,
            reviews,
            geocoder,
            photos,
            max_photo_bytes,
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<ListResult<Bootcamp>, ApiError> {
        self.bootcamps.list(params).await
    }

    pub async fn get(&self, id: &BootcampId) -> Result<Bootcamp, ApiError> {
        self.require_bootcamp(id).await
    }

    /// Publishes a bootcamp owned by the actor, enforcing the
    /// one-bootcamp-per-publisher cap.
    pub async fn create(&self, actor: &Actor, input: NewBootcamp) -> Result<Bootcamp, ApiError> {
        OwnershipGuard::require_role(actor, PUBLISH_ROLES)?;

        let already_owns = self.bootcamps.find_by_owner(&actor.id).await?.is_some();
        OwnershipGuard::enforce_bootcamp_cap(actor, already_owns)?;

        let bootcamp = Bootcamp::new(BootcampId::new(), actor.id, input)?;
        self.bootcamps.insert(&bootcamp).await?;
        Ok(bootcamp)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &BootcampId,
        update: BootcampUpdate,
    ) -> Result<Bootcamp, ApiError> {
        let mut bootcamp = self.require_bootcamp(id).await?;
        OwnershipGuard::authorize(actor, bootcamp.owner(), PUBLISH_ROLES, "bootcamp")?;

        bootcamp.apply_update(update)?;
        self.bootcamps.update(&bootcamp).await?;
        Ok(bootcamp)
    }

    /// Deletes a bootcamp and cascades to its courses and reviews.
    pub async fn delete(&self, actor: &Actor, id: &BootcampId) -> Result<(), ApiError> {
        let bootcamp = self.require_bootcamp(id).await?;
        OwnershipGuard::authorize(actor, bootcamp.owner(), PUBLISH_ROLES, "bootcamp")?;

        self.courses.delete_by_bootcamp(id).await?;
        self.reviews.delete_by_bootcamp(id).await?;
        self.bootcamps.delete(id).await?;
        Ok(())
    }

    /// All bootcamps within `distance_miles` of a zipcode.
    pub async fn within_radius(
        &self,
        zipcode: &str,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, ApiError> {
        if !distance_miles.is_finite() || distance_miles <= 0.0 {
            return Err(ApiError::bad_request("Distance must be a positive number"));
        }
        let center = self.geocoder.geocode(zipcode).await?;
        self.bootcamps.find_within_radius(center, distance_miles).await
    }

    /// Stores an uploaded photo and records its filename on the listing.
    pub async fn upload_photo(
        &self,
        actor: &Actor,
        id: &BootcampId,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Bootcamp, ApiError> {
        let bootcamp = self.require_bootcamp(id).await?;
        OwnershipGuard::authorize(actor, bootcamp.owner(), PUBLISH_ROLES, "bootcamp")?;

        let extension = PHOTO_TYPES
            .iter()
            .find(|(mime, _)| *mime == content_type)
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                ApiError::bad_request("File should be an image with extension jpeg, jpg or png")
            })?;

        if bytes.is_empty() {
            return Err(ApiError::bad_request("Please upload a file"));
        }
        if bytes.len() as u64 > self.max_photo_bytes {
            return Err(ApiError::bad_request(format!(
                "Please upload an image smaller than {} bytes",
                self.max_photo_bytes
            )));
        }

        let filename = format!("photo_{}.{}", id, extension);
        self.photos.store(&filename, bytes).await?;
        self.bootcamps.set_photo(id, &filename).await?;

        self.require_bootcamp(id).await
    }

    async fn require_bootcamp(&self, id: &BootcampId) -> Result<Bootcamp, ApiError> {
        self.bootcamps.find_by_id(id).await?.ok_or_else(|| {
            ApiError::not_found(format!("Bootcamp not found with id of {}", id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        MemoryBootcampRepository, MemoryCourseRepository, MemoryReviewRepository,
    };
    use crate::domain::{ErrorCode, GeoPoint, UserId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedGeocoder(GeoPoint);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _zipcode: &str) -> Result<GeoPoint, ApiError> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct RecordingStorage {
        stored: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PhotoStorage for RecordingStorage {
        async fn store(&self, filename: &str, _bytes: &[u8]) -> Result<(), ApiError> {
            self.stored.lock().unwrap().push(filename.to_string());
            Ok(())
        }
    }

    struct Fixture {
        courses: Arc<MemoryCourseRepository>,
        reviews: Arc<MemoryReviewRepository>,
        service: BootcampService,
    }

    fn fixture() -> Fixture {
        let bootcamps = Arc::new(MemoryBootcampRepository::new());
        let courses = Arc::new(MemoryCourseRepository::new());
        let reviews = Arc::new(MemoryReviewRepository::new());
        let service = BootcampService::new(
            bootcamps,
            courses.clone(),
            reviews.clone(),
            Arc::new(FixedGeocoder(GeoPoint { lat: 0.0, lng: 0.0 })),
            Arc::new(RecordingStorage::default()),
            1024,
        );
        Fixture {
            courses,
            reviews,
            service,
        }
    }

    fn publisher() -> Actor {
        Actor::new(UserId::new(), Role::Publisher)
    }

    fn input(name: &str) -> NewBootcamp {
        NewBootcamp {
            name: name.into(),
            description: "desc".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn publisher_cannot_create_two_bootcamps() {
        let fx = fixture();
        let actor = publisher();

        fx.service.create(&actor, input("First")).await.unwrap();
        let err = fx.service.create(&actor, input("Second")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn admin_may_create_many_bootcamps() {
        let fx = fixture();
        let admin = Actor::new(UserId::new(), Role::Admin);

        fx.service.create(&admin, input("First")).await.unwrap();
        fx.service.create(&admin, input("Second")).await.unwrap();
    }

    #[tokio::test]
    async fn plain_user_cannot_publish() {
        let fx = fixture();
        let user = Actor::new(UserId::new(), Role::User);
        let err = fx.service.create(&user, input("Camp")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let fx = fixture();
        let owner = publisher();
        let camp = fx.service.create(&owner, input("Camp")).await.unwrap();

        let intruder = publisher();
        let err = fx
            .service
            .update(&intruder, camp.id(), BootcampUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = fx.service.delete(&intruder, camp.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn delete_cascades_to_children() {
        use crate::domain::{Course, CourseId, MinimumSkill, NewCourse, NewReview, Review, ReviewId};

        let fx = fixture();
        let owner = publisher();
        let camp = fx.service.create(&owner, input("Camp")).await.unwrap();

        let course = Course::new(
            CourseId::new(),
            *camp.id(),
            owner.id,
            NewCourse {
                title: "Course".into(),
                description: "d".into(),
                weeks: "4".into(),
                tuition: 100.0,
                minimum_skill: MinimumSkill::Beginner,
                scholarships_available: false,
            },
        )
        .unwrap();
        fx.courses.insert(&course).await.unwrap();

        let review = Review::new(
            ReviewId::new(),
            *camp.id(),
            UserId::new(),
            NewReview {
                title: "r".into(),
                text: "t".into(),
                rating: 5,
            },
        )
        .unwrap();
        fx.reviews.insert(&review).await.unwrap();

        fx.service.delete(&owner, camp.id()).await.unwrap();

        assert!(fx.courses.find_by_bootcamp(camp.id()).await.unwrap().is_empty());
        assert!(fx.reviews.find_by_bootcamp(camp.id()).await.unwrap().is_empty());
        assert_eq!(
            fx.service.get(camp.id()).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[tokio::test]
    async fn photo_upload_validates_type_and_size() {
        let fx = fixture();
        let owner = publisher();
        let camp = fx.service.create(&owner, input("Camp")).await.unwrap();

        let err = fx
            .service
            .upload_photo(&owner, camp.id(), "application/pdf", b"data")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let too_big = vec![0u8; 2048];
        let err = fx
            .service
            .upload_photo(&owner, camp.id(), "image/png", &too_big)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let updated = fx
            .service
            .upload_photo(&owner, camp.id(), "image/png", b"png-bytes")
            .await
            .unwrap();
        assert_eq!(
            updated.photo(),
            Some(format!("photo_{}.png", camp.id()).as_str())
        );
    }
}
