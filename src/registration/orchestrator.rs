// ABOUTME: Registration state machine reconciling the local write with the upstream mirror
// ABOUTME: Validation and conflicts reject; upstream failures downgrade to a warning on a created user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Registration Orchestrator
//!
//! | Stage | Failure | Result |
//! |---|---|---|
//! | `Validating` | any rule | `Rejected(Validation)` |
//! | `PersistingLocal` | identity key taken | `Rejected(Conflict)` |
//! | `PersistingLocal` | store failure | `Rejected(InternalError)` |
//! | `RegisteringUpstream` | anything | `CreatedWithUpstreamWarning` |
//!
//! Upstream is never called unless the local record is committed.
//!
//! A request that repeats an earlier registration exactly (same username,
//! same email, matching password) while that record has not yet been
//! mirrored upstream is a replay: nothing is inserted and only the upstream
//! step runs again.

use crate::config::RegistrationConfig;
use crate::database::UserRepository;
use crate::errors::{AuthError, ClientError, DatabaseError};
use crate::logging::AppLogger;
use crate::models::{NewUser, UpstreamOutcome, User, UserRegistration};
use crate::registration::validation::{
    RegistrationRequest, RegistrationValidator, ValidatedRegistration, ValidationRules,
};
use crate::upstream::RegistrationClient;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, field, info, info_span, warn, Instrument, Span};

/// Position in the registration state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    /// Checking input
    Validating,
    /// Writing the local record
    PersistingLocal,
    /// Mirroring to upstream
    RegisteringUpstream,
    /// Outcome decided
    Done,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::PersistingLocal => write!(f, "persisting_local"),
            Self::RegisteringUpstream => write!(f, "registering_upstream"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Which identity key collided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    /// Username taken
    Username,
    /// Email taken
    Email,
}

impl ConflictField {
    fn from_column(column: &str) -> Self {
        if column == "email" {
            Self::Email
        } else {
            Self::Username
        }
    }
}

/// Why a registration was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Input failed validation; carries the user-facing message
    Validation(String),
    /// Username or email already registered locally
    Conflict(ConflictField),
    /// The local write failed and left no record
    InternalError,
}

/// Why the upstream mirror did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamWarning {
    /// No admin token could be obtained
    NotAuthenticated(AuthError),
    /// Upstream answered with a non-success outcome
    Outcome(UpstreamOutcome),
    /// Upstream answered with an unclassified status
    UnexpectedStatus(u16),
}

impl From<ClientError> for UpstreamWarning {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotAuthenticated(cause) => Self::NotAuthenticated(cause),
            ClientError::UnexpectedStatus(status) => Self::UnexpectedStatus(status),
        }
    }
}

impl fmt::Display for UpstreamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated(cause) => write!(f, "not authenticated: {cause}"),
            Self::Outcome(outcome) => write!(f, "upstream outcome: {outcome}"),
            Self::UnexpectedStatus(status) => write!(f, "unexpected upstream status {status}"),
        }
    }
}

/// Result of one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Persisted locally and mirrored upstream
    Created(User),
    /// Persisted locally; upstream mirror failed
    CreatedWithUpstreamWarning {
        /// Local record
        user: User,
        /// Upstream failure
        warning: UpstreamWarning,
    },
    /// Nothing persisted
    Rejected(RejectionReason),
}

impl RegistrationOutcome {
    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::CreatedWithUpstreamWarning { .. } => "created_with_upstream_warning",
            Self::Rejected(RejectionReason::Validation(_)) => "rejected_validation",
            Self::Rejected(RejectionReason::Conflict(_)) => "rejected_conflict",
            Self::Rejected(RejectionReason::InternalError) => "rejected_internal_error",
        }
    }

    /// Local record, if one exists
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Created(user) | Self::CreatedWithUpstreamWarning { user, .. } => Some(user),
            Self::Rejected(_) => None,
        }
    }
}

/// Outcome of the `PersistingLocal` stage
enum LocalRecord {
    Inserted(User),
    Replayed(User),
}

/// Public entry point for end-user registration
pub struct RegistrationOrchestrator {
    users: Arc<dyn UserRepository>,
    upstream: Arc<RegistrationClient>,
    validator: RegistrationValidator,
    password_hash_cost: u32,
    retry_on_unauthorized: bool,
}

impl RegistrationOrchestrator {
    /// Wire the orchestrator to its store and upstream client
    pub fn new(
        users: Arc<dyn UserRepository>,
        upstream: Arc<RegistrationClient>,
        config: &RegistrationConfig,
        retry_on_unauthorized: bool,
    ) -> Self {
        Self {
            users,
            upstream,
            validator: RegistrationValidator::new(ValidationRules::from_config(config)),
            password_hash_cost: config.password_hash_cost,
            retry_on_unauthorized,
        }
    }

    /// Run one registration to completion
    pub async fn register(&self, request: RegistrationRequest) -> RegistrationOutcome {
        let span = info_span!(
            "registration",
            stage = %RegistrationStage::Validating,
            username = field::Empty,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: RegistrationRequest) -> RegistrationOutcome {
        let validated = match self.validator.validate(&request) {
            Ok(validated) => validated,
            Err(e) => {
                debug!(reason = %e, "Registration input rejected");
                return Self::finish(
                    "",
                    RegistrationOutcome::Rejected(RejectionReason::Validation(e.to_string())),
                );
            }
        };
        drop(request);
        Span::current().record("username", validated.username.as_str());

        enter(RegistrationStage::PersistingLocal);
        let user = match self.persist_local(&validated).await {
            Ok(LocalRecord::Inserted(user)) => user,
            Ok(LocalRecord::Replayed(user)) => {
                info!(user_id = %user.id, "Replayed registration, retrying upstream mirror");
                user
            }
            Err(reason) => {
                return Self::finish(&validated.username, RegistrationOutcome::Rejected(reason))
            }
        };

        enter(RegistrationStage::RegisteringUpstream);
        let outcome = self.mirror_upstream(&validated, user).await;
        Self::finish(&validated.username, outcome)
    }

    fn finish(username: &str, outcome: RegistrationOutcome) -> RegistrationOutcome {
        enter(RegistrationStage::Done);
        AppLogger::log_registration_outcome(
            username,
            outcome.label(),
            outcome.user().is_some_and(|user| user.upstream_synced),
        );
        outcome
    }

    async fn persist_local(
        &self,
        validated: &ValidatedRegistration,
    ) -> Result<LocalRecord, RejectionReason> {
        let existing = self
            .users
            .find_by_username_or_email(&validated.username, &validated.email)
            .await
            .map_err(|e| {
                error!(error = %e, "Local user lookup failed");
                RejectionReason::InternalError
            })?;

        if let Some(existing) = existing {
            if self.is_replay(&existing, validated).await {
                return Ok(LocalRecord::Replayed(existing));
            }
            let field = if existing.username == validated.username {
                ConflictField::Username
            } else {
                ConflictField::Email
            };
            debug!(?field, "Identity key already registered");
            return Err(RejectionReason::Conflict(field));
        }

        let password_hash = hash_password(&validated.password, self.password_hash_cost)
            .await
            .ok_or(RejectionReason::InternalError)?;

        let new_user = NewUser {
            name: validated.name.clone(),
            username: validated.username.clone(),
            email: validated.email.clone(),
            password_hash,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, "User persisted locally");
                Ok(LocalRecord::Inserted(user))
            }
            Err(DatabaseError::Conflict { field }) => {
                debug!(field, "Identity key taken by a concurrent registration");
                Err(RejectionReason::Conflict(ConflictField::from_column(field)))
            }
            Err(e) => {
                error!(error = %e, "Local user write failed");
                Err(RejectionReason::InternalError)
            }
        }
    }

    async fn is_replay(&self, existing: &User, validated: &ValidatedRegistration) -> bool {
        existing.username == validated.username
            && existing.email == validated.email
            && !existing.upstream_synced
            && verify_password(&validated.password, &existing.password_hash).await
    }

    async fn mirror_upstream(
        &self,
        validated: &ValidatedRegistration,
        mut user: User,
    ) -> RegistrationOutcome {
        let payload = UserRegistration::from_display_name(
            &validated.name,
            &validated.username,
            &validated.email,
            &validated.password,
            validated.image.clone(),
        );

        let mut result = self.upstream.register(&payload).await;

        if self.retry_on_unauthorized && matches!(result, Ok(UpstreamOutcome::Unauthorized)) {
            warn!("Upstream rejected the admin token, refreshing and retrying once");
            self.upstream.invalidate_token().await;
            result = self.upstream.register(&payload).await;
        }

        match result {
            Ok(UpstreamOutcome::Created) => {
                match self.users.mark_upstream_synced(user.id).await {
                    Ok(()) => user.upstream_synced = true,
                    Err(e) => {
                        error!(user_id = %user.id, error = %e, "Failed to record upstream sync");
                    }
                }
                RegistrationOutcome::Created(user)
            }
            Ok(outcome) => {
                warn!(%outcome, "Upstream registration did not succeed");
                RegistrationOutcome::CreatedWithUpstreamWarning {
                    user,
                    warning: UpstreamWarning::Outcome(outcome),
                }
            }
            Err(e) => {
                warn!(error = %e, "Upstream registration failed");
                RegistrationOutcome::CreatedWithUpstreamWarning {
                    user,
                    warning: e.into(),
                }
            }
        }
    }
}

fn enter(stage: RegistrationStage) {
    Span::current().record("stage", field::display(stage));
    debug!(%stage, "Registration stage");
}

/// Hash a password with bcrypt off the async executor
async fn hash_password(password: &str, cost: u32) -> Option<String> {
    let password = zeroize::Zeroizing::new(password.to_owned());
    let result = tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost)).await;
    match result {
        Ok(Ok(hash)) => Some(hash),
        Ok(Err(e)) => {
            error!(error = %e, "Password hashing failed");
            None
        }
        Err(e) => {
            error!(error = %e, "Password hashing task failed");
            None
        }
    }
}

/// Verify password against hash using bcrypt with `spawn_blocking`
async fn verify_password(password: &str, hash: &str) -> bool {
    if hash.is_empty() {
        return false;
    }
    let password = zeroize::Zeroizing::new(password.to_owned());
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}
