//! Transport independent service facade.
//!
//! [`UserDataService`] exposes every user data operation as a plain async method.
//! Each method takes a [`ProgressSink`] receiving that call's progress and status
//! events; protocol adapters such as [`crate::mcp_integration`] decide where the
//! events go.
//!
//! # Consistency
//!
//! Every operation loads the full collection from the store. Mutating operations
//! (`add_user`, `bulk_add`) hold the service's write lock across their
//! load-modify-save cycle, so concurrent writers within one process never lose
//! each other's updates. Processes sharing one file are not coordinated.
//!
//! # Example
//!
//! ```rust
//! use user_data_server::UserDataService;
//! use user_data_server::progress::NoopSink;
//! use user_data_server::storage::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = UserDataService::new(InMemoryStore::new());
//! service.add_user("Alice", "alice@x.com", &NoopSink).await?;
//! assert_eq!(service.count_users(&NoopSink).await?, 1);
//! # Ok(())
//! # }
//! ```

use crate::analytics::insights::analyze_users;
use crate::analytics::report::generate_report;
use crate::analytics::stats::compute_basic_stats;
use crate::analytics::{AnalysisOutcome, ReportOutcome, StatsOutcome, TextInsightGenerator};
use crate::bulk::{BulkResult, apply_candidates};
use crate::config::ServerConfig;
use crate::error::{UserDataError, UserDataResult};
use crate::model::{RecordCollection, UserCandidate, UserRecord, require_field};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::simulation::{SimulationSummary, simulate_long_running_task};
use crate::storage::{JsonFileStore, RecordStore, StorageError};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Confirmation returned by [`UserDataService::add_user`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddUserConfirmation {
    pub status: String,
    pub message: String,
    pub total_users: usize,
}

/// Outcome of a lookup by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Found(UserRecord),
    NotFound { name: String },
}

impl UserLookup {
    pub fn found(&self) -> Option<&UserRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound { .. } => None,
        }
    }

    /// Turn a miss into [`UserDataError::NotFound`] for callers that treat it as fatal.
    pub fn into_result(self) -> UserDataResult<UserRecord> {
        match self {
            Self::Found(record) => Ok(record),
            Self::NotFound { name } => Err(UserDataError::NotFound { name }),
        }
    }
}

/// The user data operations over a record store.
pub struct UserDataService<S: RecordStore> {
    store: S,
    insight_generator: Option<Arc<dyn TextInsightGenerator>>,
    write_lock: Mutex<()>,
}

impl UserDataService<JsonFileStore> {
    /// Open the JSON store named by `config` and build a service over it.
    pub async fn from_config(config: &ServerConfig) -> UserDataResult<Self> {
        config.validate()?;
        let store = JsonFileStore::open(config.users_path()).await?;
        info!("User data stored at {}", store.describe());
        Ok(Self::new(store))
    }
}

impl<S: RecordStore> UserDataService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            insight_generator: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Attach an external text generator used by [`Self::analyze`].
    pub fn with_insight_generator(mut self, generator: Arc<dyn TextInsightGenerator>) -> Self {
        self.insight_generator = Some(generator);
        self
    }

    pub fn set_insight_generator(&mut self, generator: Option<Arc<dyn TextInsightGenerator>>) {
        self.insight_generator = generator;
    }

    pub fn has_insight_generator(&self) -> bool {
        self.insight_generator.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load(&self, progress: &dyn ProgressSink) -> Result<RecordCollection, StorageError> {
        self.store.load().await.inspect_err(|e| {
            progress.error(&format!("Failed to load users: {}", e));
        })
    }

    async fn save(
        &self,
        collection: &RecordCollection,
        progress: &dyn ProgressSink,
    ) -> Result<(), StorageError> {
        self.store.save(collection).await.inspect_err(|e| {
            progress.error(&format!("Failed to save users: {}", e));
        })
    }

    /// Append one user and persist the collection.
    ///
    /// Any strings are accepted; a record with an empty field is stored as given
    /// and shows up as invalid in the report.
    pub async fn add_user(
        &self,
        name: &str,
        email: &str,
        progress: &dyn ProgressSink,
    ) -> Result<AddUserConfirmation, StorageError> {
        progress.info(&format!("Adding new user: {} with email: {}", name, email));
        let record = UserRecord::new(name, email);

        let _guard = self.write_lock.lock().await;
        let mut users = self.load(progress).await?;
        progress.debug(&format!("Current user count: {}", users.len()));

        users.push(record);
        self.save(&users, progress).await?;

        progress.info(&format!(
            "User {} successfully added. Total users: {}",
            name,
            users.len()
        ));
        Ok(AddUserConfirmation {
            status: "success".to_string(),
            message: format!("User {} added", name),
            total_users: users.len(),
        })
    }

    /// Number of stored users; zero when nothing has been stored.
    pub async fn count_users(&self, progress: &dyn ProgressSink) -> Result<usize, StorageError> {
        progress.debug("Retrieving user count from storage");
        let users = self.load(progress).await?;
        if users.is_missing() {
            progress.info("No users file found, returning 0");
            return Ok(0);
        }
        progress.info(&format!("User count retrieved: {}", users.len()));
        Ok(users.len())
    }

    /// All stored users in storage order.
    pub async fn list_users(
        &self,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<UserRecord>, StorageError> {
        progress.debug("Accessing user data resource");
        let users = self.load(progress).await?;
        if users.is_missing() {
            progress.warning("No users file found, returning empty list");
        } else {
            progress.info(&format!("Retrieved {} users from storage", users.len()));
        }
        Ok(users.into_records())
    }

    /// First user whose name matches `name`, ignoring case.
    pub async fn find_user(
        &self,
        name: &str,
        progress: &dyn ProgressSink,
    ) -> Result<UserLookup, StorageError> {
        progress.debug(&format!("Searching for user with name: {}", name));
        let users = self.load(progress).await?;
        if users.is_missing() {
            progress.warning("No users file found");
        }

        let wanted = name.to_lowercase();
        let found = users
            .into_records()
            .into_iter()
            .find(|user| user.name_or_empty().to_lowercase() == wanted);

        Ok(match found {
            Some(user) => {
                progress.info(&format!("Found user: {}", user.name_or_empty()));
                UserLookup::Found(user)
            }
            None => {
                progress.warning(&format!("No user found with name: {}", name));
                UserLookup::NotFound {
                    name: name.to_string(),
                }
            }
        })
    }

    /// Domain histogram and name length statistics over all users.
    pub async fn basic_stats(&self, progress: &dyn ProgressSink) -> Result<StatsOutcome, StorageError> {
        progress.info("Generating user statistics");
        let mut tracker = ProgressTracker::percent(progress);
        tracker.advance_to(0);

        let users = self.load(progress).await?;
        if users.is_missing() {
            progress.warning("No users file found for statistics");
            return Ok(StatsOutcome::NoData);
        }
        progress.info("Loading user data...");
        tracker.advance_to(30);

        Ok(StatsOutcome::Stats(compute_basic_stats(
            users.records(),
            &mut tracker,
        )))
    }

    /// Validation and data quality report.
    ///
    /// Absent storage yields [`ReportOutcome::NoData`]; existing but empty storage
    /// yields a populated report with zero counts.
    pub async fn generate_report(
        &self,
        progress: &dyn ProgressSink,
    ) -> Result<ReportOutcome, StorageError> {
        progress.info("Starting comprehensive user report generation");
        let mut tracker = ProgressTracker::percent(progress);
        tracker.advance_to(0);

        let users = self.load(progress).await?;
        if users.is_missing() {
            progress.warning("No users file found for report");
            return Ok(ReportOutcome::NoData);
        }
        progress.info("Loading and validating user data...");

        Ok(ReportOutcome::Report(generate_report(
            users.records(),
            &mut tracker,
        )))
    }

    /// Statistics plus textual insights, enriched by the optional text generator.
    ///
    /// A missing or failing generator never fails the call.
    pub async fn analyze(&self, progress: &dyn ProgressSink) -> Result<AnalysisOutcome, StorageError> {
        self.analyze_with(self.insight_generator.as_deref(), progress)
            .await
    }

    /// [`Self::analyze`] with the external insights taken from `generator`
    /// instead of the configured one.
    pub async fn analyze_with(
        &self,
        generator: Option<&dyn TextInsightGenerator>,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisOutcome, StorageError> {
        progress.info("Starting user data analysis");
        let mut tracker = ProgressTracker::percent(progress);
        tracker.advance_to(0);
        progress.info("Loading user data...");

        let users = self.load(progress).await.inspect_err(|e| {
            progress.error(&format!("Analysis failed: {}", e));
        })?;
        if users.is_missing() {
            progress.warning("No users file found");
        } else {
            progress.info(&format!("Loaded {} users from file", users.len()));
        }
        if users.is_empty() {
            progress.warning("No users found for analysis");
            return Ok(AnalysisOutcome::NoUsers);
        }
        tracker.advance_to(20);

        let analysis = analyze_users(users.records(), generator, &mut tracker).await;
        Ok(AnalysisOutcome::Analysis(analysis))
    }

    /// Validate and append many candidates, persisting once.
    ///
    /// Invalid candidates are reported in the result and do not stop the batch.
    /// The combined collection is saved before the result is composed: if the save
    /// fails the call returns the [`StorageError`] and reports no successes. An
    /// empty batch returns immediately without touching storage.
    pub async fn bulk_add(
        &self,
        candidates: &[UserCandidate],
        progress: &dyn ProgressSink,
    ) -> Result<BulkResult, StorageError> {
        progress.info(&format!(
            "Starting bulk addition of {} users",
            candidates.len()
        ));
        if candidates.is_empty() {
            return Ok(BulkResult::nothing_to_add());
        }

        let mut tracker = ProgressTracker::new(progress, candidates.len() as u64);
        tracker.advance_to(0);

        let _guard = self.write_lock.lock().await;
        let mut users = self.load(progress).await?;
        let existing = users.len();
        let result = apply_candidates(&mut users, candidates, &mut tracker);

        self.save(&users, progress).await?;
        progress.info("All users saved to storage");
        debug!(
            "Bulk add: {} existing, {} added, {} rejected",
            existing, result.successful, result.failed
        );
        Ok(result)
    }

    /// Progress reporting demonstration; touches no data.
    pub async fn simulate_long_running_task(
        &self,
        duration_seconds: u64,
        progress: &dyn ProgressSink,
    ) -> SimulationSummary {
        simulate_long_running_task(duration_seconds, progress).await
    }
}

/// Check a name received from a caller before it is used for lookup.
pub fn validate_lookup_name(name: &str) -> UserDataResult<&str> {
    Ok(require_field("name", Some(name))?)
}
