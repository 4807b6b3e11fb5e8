//! Derived-aggregate recomputation.
//!
//! Each bootcamp caches two numbers derived from its child collections:
//! `averageCost` from course tuitions and `averageRating` from review
//! ratings. The recomputer reads the full child set after every successful
//! child mutation and persists the metric through a targeted partial
//! update, so no other bootcamp field is ever overwritten.
//!
//! The guarantee is eventual consistency, not transactionality: a failed
//! recompute is logged and swallowed so the child mutation that triggered
//! it stays committed. Concurrent recomputes for the same parent are
//! last-write-wins.

use std::sync::Arc;

use crate::domain::{AggregateMetric, ApiError, BootcampId};
use crate::ports::{BootcampRepository, CourseRepository, ReviewRepository};

/// Outcome of a recomputation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecomputeOutcome {
    /// The metric was recomputed and persisted.
    Updated(f64),
    /// The parent no longer exists; nothing was written.
    ParentMissing,
    /// The child set is empty; the parent keeps its previous value.
    /// The original system behaves this way rather than resetting the
    /// field, and that behavior is preserved deliberately.
    NoChildren,
}

/// Recomputes one derived numeric field on a bootcamp from the full
/// current set of its children.
pub struct AggregateRecomputer {
    bootcamps: Arc<dyn BootcampRepository>,
    courses: Arc<dyn CourseRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl AggregateRecomputer {
    pub fn new(
        bootcamps: Arc<dyn BootcampRepository>,
        courses: Arc<dyn CourseRepository>,
        reviews: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            bootcamps,
            courses,
            reviews,
        }
    }

    /// Recomputes `metric` for `bootcamp`.
    pub async fn recompute(
        &self,
        bootcamp: &BootcampId,
        metric: AggregateMetric,
    ) -> Result<RecomputeOutcome, ApiError> {
        let value = match metric {
            AggregateMetric::AverageCost => {
                let courses = self.courses.find_by_bootcamp(bootcamp).await?;
                if courses.is_empty() {
                    return Ok(RecomputeOutcome::NoChildren);
                }
                let mean =
                    courses.iter().map(|c| c.tuition()).sum::<f64>() / courses.len() as f64;
                // Round up to the nearest multiple of 10.
                (mean / 10.0).ceil() * 10.0
            }
            AggregateMetric::AverageRating => {
                let reviews = self.reviews.find_by_bootcamp(bootcamp).await?;
                if reviews.is_empty() {
                    return Ok(RecomputeOutcome::NoChildren);
                }
                reviews
                    .iter()
                    .map(|r| f64::from(r.rating().value()))
                    .sum::<f64>()
                    / reviews.len() as f64
            }
        };

        let persisted = self.bootcamps.set_aggregate(bootcamp, metric, value).await?;
        if persisted {
            Ok(RecomputeOutcome::Updated(value))
        } else {
            Ok(RecomputeOutcome::ParentMissing)
        }
    }

    /// Best-effort recompute after a child mutation already committed.
    /// Failures are reported, never propagated.
    pub async fn resync(&self, bootcamp: &BootcampId, metric: AggregateMetric) {
        if let Err(err) = self.recompute(bootcamp, metric).await {
            tracing::warn!(
                bootcamp = %bootcamp,
                metric = metric.field_name(),
                error = %err,
                "aggregate recompute failed; child mutation stays committed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        MemoryBootcampRepository, MemoryCourseRepository, MemoryReviewRepository,
    };
    use crate::domain::{
        Bootcamp, Course, CourseId, MinimumSkill, NewBootcamp, NewCourse, NewReview, Review,
        ReviewId, UserId,
    };
    use crate::ports::BootcampRepository as _;

    struct Fixture {
        bootcamps: Arc<MemoryBootcampRepository>,
        courses: Arc<MemoryCourseRepository>,
        reviews: Arc<MemoryReviewRepository>,
        recomputer: AggregateRecomputer,
    }

    fn fixture() -> Fixture {
        let bootcamps = Arc::new(MemoryBootcampRepository::new());
        let courses = Arc::new(MemoryCourseRepository::new());
        let reviews = Arc::new(MemoryReviewRepository::new());
        let recomputer = AggregateRecomputer::new(
            bootcamps.clone(),
            courses.clone(),
            reviews.clone(),
        );
        Fixture {
            bootcamps,
            courses,
            reviews,
            recomputer,
        }
    }

    async fn seeded_bootcamp(fx: &Fixture) -> Bootcamp {
        let camp = Bootcamp::new(
            BootcampId::new(),
            UserId::new(),
            NewBootcamp {
                name: "Devworks".into(),
                description: "desc".into(),
                ..Default::default()
            },
        )
        .unwrap();
        fx.bootcamps.insert(&camp).await.unwrap();
        camp
    }

    async fn add_course(fx: &Fixture, bootcamp: &BootcampId, tuition: f64) {
        let course = Course::new(
            CourseId::new(),
            *bootcamp,
            UserId::new(),
            NewCourse {
                title: "Course".into(),
                description: "desc".into(),
                weeks: "8".into(),
                tuition,
                minimum_skill: MinimumSkill::Beginner,
                scholarships_available: false,
            },
        )
        .unwrap();
        fx.courses.insert(&course).await.unwrap();
    }

    async fn add_review(fx: &Fixture, bootcamp: &BootcampId, rating: i32) {
        let review = Review::new(
            ReviewId::new(),
            *bootcamp,
            UserId::new(),
            NewReview {
                title: "Review".into(),
                text: "text".into(),
                rating,
            },
        )
        .unwrap();
        fx.reviews.insert(&review).await.unwrap();
    }

    #[tokio::test]
    async fn average_cost_rounds_up_to_nearest_ten() {
        let fx = fixture();
        let camp = seeded_bootcamp(&fx).await;
        for tuition in [100.0, 200.0, 300.0] {
            add_course(&fx, camp.id(), tuition).await;
        }

        let outcome = fx
            .recomputer
            .recompute(camp.id(), AggregateMetric::AverageCost)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::Updated(200.0));
        let stored = fx.bootcamps.find_by_id(camp.id()).await.unwrap().unwrap();
        assert_eq!(stored.average_cost(), Some(200.0));
    }

    #[tokio::test]
    async fn average_cost_ceiling_behavior() {
        let fx = fixture();
        let camp = seeded_bootcamp(&fx).await;
        // mean = 101 -> ceil(10.1) * 10 = 110
        add_course(&fx, camp.id(), 100.0).await;
        add_course(&fx, camp.id(), 102.0).await;

        let outcome = fx
            .recomputer
            .recompute(camp.id(), AggregateMetric::AverageCost)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::Updated(110.0));
    }

    #[tokio::test]
    async fn average_rating_is_unrounded_mean() {
        let fx = fixture();
        let camp = seeded_bootcamp(&fx).await;
        add_review(&fx, camp.id(), 4).await;
        add_review(&fx, camp.id(), 8).await;

        let outcome = fx
            .recomputer
            .recompute(camp.id(), AggregateMetric::AverageRating)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::Updated(6.0));
        let stored = fx.bootcamps.find_by_id(camp.id()).await.unwrap().unwrap();
        assert_eq!(stored.average_rating(), Some(6.0));
    }

    #[tokio::test]
    async fn empty_child_set_keeps_previous_value() {
        let fx = fixture();
        let camp = seeded_bootcamp(&fx).await;
        add_course(&fx, camp.id(), 500.0).await;
        fx.recomputer
            .recompute(camp.id(), AggregateMetric::AverageCost)
            .await
            .unwrap();

        // Remove every child, then recompute again.
        fx.courses.delete_by_bootcamp(camp.id()).await.unwrap();
        let outcome = fx
            .recomputer
            .recompute(camp.id(), AggregateMetric::AverageCost)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::NoChildren);
        let stored = fx.bootcamps.find_by_id(camp.id()).await.unwrap().unwrap();
        assert_eq!(stored.average_cost(), Some(500.0));
    }

    #[tokio::test]
    async fn missing_parent_is_a_noop() {
        let fx = fixture();
        let orphan = BootcampId::new();
        add_course(&fx, &orphan, 100.0).await;

        let outcome = fx
            .recomputer
            .recompute(&orphan, AggregateMetric::AverageCost)
            .await
            .unwrap();

        assert_eq!(outcome, RecomputeOutcome::ParentMissing);
    }

    #[tokio::test]
    async fn resync_swallows_failures() {
        let fx = fixture();
        // No panic and no error surface even when the parent is gone.
        fx.recomputer
            .resync(&BootcampId::new(), AggregateMetric::AverageRating)
            .await;
    }
}
