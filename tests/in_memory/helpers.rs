//! Shared fixtures for the in-memory integration suite.
//!
//! Every scenario runs against one [`Stack`]: the store, cache, report
//! queue, and policy wired into both the task service and the status
//! engine exactly as a deployment would wire them.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use mockable::DefaultClock;
use rstest::fixture;

use foreman::access::domain::{Actor, RoleName, UserId};
use foreman::access::services::TaskPolicy;
use foreman::task::adapters::memory::{InMemoryCache, InMemoryTaskStore, RecordingReportQueue};
use foreman::task::domain::{Task, TaskId, TaskKind, TaskPriority};
use foreman::task::ports::CacheConfig;
use foreman::task::services::{CreateTaskRequest, StatusEngine, TaskService};

/// Task service specialised to the in-memory adapters.
pub type MemoryTaskService =
    TaskService<InMemoryTaskStore, InMemoryCache<DefaultClock>, DefaultClock>;

/// Status engine specialised to the in-memory adapters.
pub type MemoryStatusEngine = StatusEngine<
    InMemoryTaskStore,
    InMemoryCache<DefaultClock>,
    RecordingReportQueue,
    DefaultClock,
>;

/// A fully wired application stack backed by in-memory adapters.
pub struct Stack {
    /// Shared task store, also handed to the service and engine.
    pub store: Arc<InMemoryTaskStore>,
    /// Shared cache, visible for direct inspection.
    pub cache: Arc<InMemoryCache<DefaultClock>>,
    /// Recording queue capturing dispatched report jobs.
    pub reports: Arc<RecordingReportQueue>,
    /// CRUD and lifecycle service under test.
    pub service: MemoryTaskService,
    /// Status transition engine under test.
    pub engine: MemoryStatusEngine,
}

/// Builds a stack whose service and engine share one store, cache, and
/// policy, mirroring production wiring.
#[fixture]
pub fn stack() -> Stack {
    let store = Arc::new(InMemoryTaskStore::new());
    let clock = Arc::new(DefaultClock);
    let cache = Arc::new(InMemoryCache::new(
        CacheConfig::default(),
        Arc::clone(&clock),
    ));
    let reports = Arc::new(RecordingReportQueue::new());
    let policy = Arc::new(TaskPolicy::builtin());
    let service = TaskService::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        Arc::clone(&policy),
        Arc::clone(&clock),
    );
    let engine = StatusEngine::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        Arc::clone(&reports),
        policy,
        clock,
    );
    Stack {
        store,
        cache,
        reports,
        service,
        engine,
    }
}

/// An administrator actor.
#[must_use]
pub fn admin() -> Actor {
    Actor::new(UserId::new()).with_role(RoleName::admin())
}

/// A manager actor.
#[must_use]
pub fn manager() -> Actor {
    Actor::new(UserId::new()).with_role(RoleName::manager())
}

/// A plain user actor with no management grants.
#[must_use]
pub fn plain_user() -> Actor {
    Actor::new(UserId::new()).with_role(RoleName::user())
}

/// Today's calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Tomorrow's calendar date, a safe default due date.
///
/// # Panics
///
/// Panics if the calendar overflows, which cannot happen before the
/// year 262143.
#[must_use]
pub fn tomorrow() -> NaiveDate {
    today()
        .checked_add_days(Days::new(1))
        .expect("tomorrow fits in the calendar")
}

/// Creates a feature task due tomorrow through the service.
///
/// # Panics
///
/// Panics if the service rejects the request; fixtures feed it valid
/// input.
pub async fn create_task(
    stack: &Stack,
    actor: &Actor,
    title: &str,
    dependencies: impl IntoIterator<Item = TaskId>,
) -> Task {
    let request = CreateTaskRequest::new(title, TaskKind::Feature, TaskPriority::Medium, tomorrow())
        .with_dependencies(dependencies.into_iter().collect::<BTreeSet<_>>());
    stack
        .service
        .create(request, actor)
        .await
        .expect("fixture task creation succeeds")
}
