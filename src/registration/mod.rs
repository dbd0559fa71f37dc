// ABOUTME: Registration flow: input validation and the orchestrating state machine
// ABOUTME: Local persistence is the source of truth; upstream is a best-effort mirror
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! # Registration
//!
//! [`RegistrationOrchestrator::register`] walks
//! `Validating -> PersistingLocal -> RegisteringUpstream -> Done` and folds
//! the local and upstream results into one [`RegistrationOutcome`].

/// End-to-end registration state machine
pub mod orchestrator;
/// Field presence, length, and email shape checks
pub mod validation;

pub use orchestrator::{
    ConflictField, RegistrationOrchestrator, RegistrationOutcome, RegistrationStage,
    RejectionReason, UpstreamWarning,
};
pub use validation::{
    RegistrationRequest, RegistrationValidator, ValidatedRegistration, ValidationError,
    ValidationRules,
};
