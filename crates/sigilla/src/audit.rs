/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Audit logging for the signing workflow.
//!
//! Signing is security-sensitive: every batch, every per-package outcome,
//! and every skipped trigger is logged as a structured `tracing` event
//! with a stable `event_type` field for SIEM consumption.

/// Event types for signing operations.
pub mod events {
    /// A signing batch started for a build.
    pub const BUILD_SIGN_STARTED: &str = "build.sign.started";
    /// A signing batch finished with every package signed or skipped.
    pub const BUILD_SIGN_COMPLETED: &str = "build.sign.completed";
    /// A signing batch aborted before completing.
    pub const BUILD_SIGN_ABORTED: &str = "build.sign.aborted";

    /// A package was signed and its signature stored.
    pub const RPM_SIGNED: &str = "rpm.signed";
    /// A package already carried a stored signature under the derived key.
    pub const RPM_SIGN_SKIPPED: &str = "rpm.sign.skipped";
    /// A package failed to sign.
    pub const RPM_SIGN_FAILURE: &str = "rpm.sign.failure";

    /// A tag event did not match the allow-list and was ignored.
    pub const TRIGGER_SKIPPED: &str = "trigger.skipped";
}

/// Log the start of a signing batch.
pub fn log_build_sign_started(build_id: u32, nvr: &str, rpm_count: usize) {
    tracing::info!(
        event_type = events::BUILD_SIGN_STARTED,
        build_id = build_id,
        nvr = %nvr,
        rpm_count = rpm_count,
        "Signing build"
    );
}

/// Log a fully signed batch.
pub fn log_build_sign_completed(build_id: u32, signed: usize, skipped: usize) {
    tracing::info!(
        event_type = events::BUILD_SIGN_COMPLETED,
        build_id = build_id,
        signed = signed,
        skipped = skipped,
        "Build signed"
    );
}

/// Log an aborted batch.
pub fn log_build_sign_aborted(build_id: u32, error: &str) {
    tracing::error!(
        event_type = events::BUILD_SIGN_ABORTED,
        build_id = build_id,
        error = %error,
        "Signing aborted"
    );
}

/// Log a stored signature.
pub fn log_rpm_signed(rpm: &str, sigkey: &str) {
    tracing::info!(
        event_type = events::RPM_SIGNED,
        rpm = %rpm,
        sigkey = %sigkey,
        "Package signed"
    );
}

/// Log an already-signed skip.
pub fn log_rpm_sign_skipped(rpm: &str, sigkey: &str) {
    tracing::info!(
        event_type = events::RPM_SIGN_SKIPPED,
        rpm = %rpm,
        sigkey = %sigkey,
        "Package already signed, skipping"
    );
}

/// Log a per-package signing failure.
pub fn log_rpm_sign_failed(rpm: &str, error: &str) {
    tracing::error!(
        event_type = events::RPM_SIGN_FAILURE,
        rpm = %rpm,
        error = %error,
        "Failed to sign package"
    );
}

/// Log a tag event that did not match the allow-list.
pub fn log_trigger_skipped(tag: &str, nvr: &str) {
    tracing::debug!(
        event_type = events::TRIGGER_SKIPPED,
        tag = %tag,
        nvr = %nvr,
        "Tag not configured for signing, ignoring"
    );
}
