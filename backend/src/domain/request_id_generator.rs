//! Tracking code allocation.
//!
//! Codes are drawn uniformly from `1000..=9999` and checked against the store
//! and the codes already reserved by the current batch. Draws are bounded so a
//! saturated code space fails fast instead of looping.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use super::ports::{InteractionRepository, InteractionRepositoryError};
use super::request_id::{REQUEST_ID_MAX, REQUEST_ID_MIN};
use super::RequestId;

/// Draws allowed per code before giving up.
pub const DEFAULT_DRAW_LIMIT: u32 = 64;

/// Source of candidate tracking codes.
pub trait RequestIdSource: Send + Sync {
    /// Draw one candidate in `1000..=9999`.
    fn draw(&self) -> u16;
}

/// Uniform draws from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomRequestIdSource;

impl RequestIdSource for RandomRequestIdSource {
    fn draw(&self) -> u16 {
        rand::thread_rng().gen_range(REQUEST_ID_MIN..=REQUEST_ID_MAX)
    }
}

/// Reasons allocation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Every draw hit a code that was already taken.
    #[error("no free tracking code after {attempts} draws")]
    Exhausted {
        /// Number of draws made.
        attempts: u32,
    },
    /// The uniqueness check itself failed.
    #[error(transparent)]
    Repository(#[from] InteractionRepositoryError),
}

/// Allocates tracking codes that are unused at the time of the check.
///
/// Uniqueness against concurrent writers is enforced by the store's unique
/// constraint; callers retry on [`InteractionRepositoryError::DuplicateRequestId`].
#[derive(Clone)]
pub struct RequestIdGenerator {
    source: Arc<dyn RequestIdSource>,
    draw_limit: u32,
}

impl RequestIdGenerator {
    /// Build a generator over `source`; a zero limit is raised to one.
    pub fn new(source: Arc<dyn RequestIdSource>, draw_limit: u32) -> Self {
        Self {
            source,
            draw_limit: draw_limit.max(1),
        }
    }

    /// Random generator with [`DEFAULT_DRAW_LIMIT`].
    pub fn random() -> Self {
        Self::new(Arc::new(RandomRequestIdSource), DEFAULT_DRAW_LIMIT)
    }

    /// Draw limit in effect.
    pub fn draw_limit(&self) -> u32 {
        self.draw_limit
    }

    /// Allocate one code that is neither stored in `repo` nor in `reserved`.
    pub async fn allocate<R>(
        &self,
        repo: &R,
        reserved: &HashSet<RequestId>,
    ) -> Result<RequestId, AllocationError>
    where
        R: InteractionRepository + ?Sized,
    {
        for attempt in 1..=self.draw_limit {
            let code = self.source.draw();
            let Ok(candidate) = RequestId::from_code(code) else {
                debug!(code, attempt, "discarding out-of-range tracking code draw");
                continue;
            };
            if reserved.contains(&candidate) {
                debug!(request_id = %candidate, attempt, "tracking code reserved by batch");
                continue;
            }
            if repo.request_id_exists(&candidate).await? {
                debug!(request_id = %candidate, attempt, "tracking code already stored");
                continue;
            }
            return Ok(candidate);
        }
        Err(AllocationError::Exhausted {
            attempts: self.draw_limit,
        })
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Debug for RequestIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestIdGenerator")
            .field("draw_limit", &self.draw_limit)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SequenceRequestIdSource;
    use super::*;
    use crate::domain::ports::MockInteractionRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn generator(draws: impl IntoIterator<Item = u16>, limit: u32) -> RequestIdGenerator {
        RequestIdGenerator::new(Arc::new(SequenceRequestIdSource::new(draws)), limit)
    }

    fn code(raw: &str) -> RequestId {
        RequestId::new(raw).expect("valid code")
    }

    #[rstest]
    fn random_source_stays_in_range() {
        let source = RandomRequestIdSource;
        for _ in 0..1_000 {
            let drawn = source.draw();
            assert!((REQUEST_ID_MIN..=REQUEST_ID_MAX).contains(&drawn));
        }
    }

    #[rstest]
    fn zero_limit_is_raised_to_one() {
        assert_eq!(generator([1234], 0).draw_limit(), 1);
    }

    #[tokio::test]
    async fn first_free_draw_is_returned() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_request_id_exists()
            .with(eq(code("1234")))
            .times(1)
            .return_once(|_| Ok(false));

        let allocated = generator([1234], 4)
            .allocate(&repo, &HashSet::new())
            .await
            .expect("free code");
        assert_eq!(allocated.as_str(), "1234");
    }

    #[tokio::test]
    async fn stored_codes_are_redrawn() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_request_id_exists()
            .with(eq(code("1111")))
            .times(1)
            .return_once(|_| Ok(true));
        repo.expect_request_id_exists()
            .with(eq(code("2222")))
            .times(1)
            .return_once(|_| Ok(false));

        let allocated = generator([1111, 2222], 4)
            .allocate(&repo, &HashSet::new())
            .await
            .expect("second draw is free");
        assert_eq!(allocated.as_str(), "2222");
    }

    #[tokio::test]
    async fn batch_reservations_skip_the_store() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_request_id_exists()
            .with(eq(code("3333")))
            .times(1)
            .return_once(|_| Ok(false));
        let reserved = HashSet::from([code("1111")]);

        let allocated = generator([1111, 3333], 4)
            .allocate(&repo, &reserved)
            .await
            .expect("second draw is free");
        assert_eq!(allocated.as_str(), "3333");
    }

    #[tokio::test]
    async fn saturated_space_reports_exhaustion() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_request_id_exists()
            .times(3)
            .returning(|_| Ok(true));

        let err = generator([5555], 3)
            .allocate(&repo, &HashSet::new())
            .await
            .expect_err("all draws collide");
        assert_eq!(err, AllocationError::Exhausted { attempts: 3 });
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_request_id_exists()
            .times(1)
            .return_once(|_| Err(InteractionRepositoryError::connection("down")));

        let err = generator([1234], 8)
            .allocate(&repo, &HashSet::new())
            .await
            .expect_err("store offline");
        assert!(matches!(err, AllocationError::Repository(_)));
    }
}
