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

//! Batch orchestration tests.

use std::sync::Arc;
use tempfile::TempDir;
use tracing_test::traced_test;

use sigilla::{
    ArtifactSigner, BatchOutcome, BuildSigner, RpmInfo, SignError, SignerConfig, TreeLayout,
};

use crate::fixtures::{
    fake_build, fake_rpm, materialize_build, signed_rpm_bytes, CannedSigner, MemoryHub,
    SignerScript,
};

fn three_rpms() -> Vec<RpmInfo> {
    vec![
        fake_rpm(7, "bash", "x86_64"),
        fake_rpm(8, "bash", "aarch64"),
        fake_rpm(9, "bash", "src"),
    ]
}

struct Harness {
    _topdir: TempDir,
    hub: Arc<MemoryHub>,
    command: Arc<CannedSigner>,
    signer: BuildSigner,
}

fn harness(command: CannedSigner, rpms: Vec<RpmInfo>) -> Harness {
    let topdir = TempDir::new().unwrap();
    let layout = TreeLayout::new(topdir.path());
    let build = fake_build();

    let on_disk: Vec<_> = rpms
        .iter()
        .map(|rpm| (rpm.clone(), format!("unsigned {}", rpm.id).into_bytes()))
        .collect();
    materialize_build(&layout, &build, &on_disk).unwrap();

    let hub = Arc::new(MemoryHub::with_rpms(rpms));
    let command = Arc::new(command);
    let artifact_signer = ArtifactSigner::new(
        command.clone(),
        hub.clone(),
        Arc::new(layout),
        &SignerConfig::builder().build(),
    );

    Harness {
        _topdir: topdir,
        hub: hub.clone(),
        command,
        signer: BuildSigner::new(hub, artifact_signer),
    }
}

#[tokio::test]
async fn test_all_artifacts_signed() {
    let h = harness(
        CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())),
        three_rpms(),
    );

    let outcome = h.signer.sign_build(&fake_build()).await;
    assert!(matches!(
        outcome,
        BatchOutcome::AllSigned {
            signed: 3,
            skipped: 0
        }
    ));
    assert_eq!(h.hub.record_count(), 3);
    assert_eq!(h.command.call_count(), 3);
}

#[tokio::test]
async fn test_failure_aborts_remaining_batch() {
    let command = CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())).with_override(
        "bash-5.2.26-3.aarch64.rpm",
        SignerScript::Fail("signer unreachable".to_string()),
    );
    let h = harness(command, three_rpms());

    let outcome = h.signer.sign_build(&fake_build()).await;

    match outcome {
        BatchOutcome::PartialFailure { completed, error } => {
            assert_eq!(completed, 1);
            match error {
                SignError::SigningCommand { rpm, .. } => {
                    assert_eq!(rpm, "bash-5.2.26-3.aarch64.rpm")
                }
                other => panic!("expected SigningCommand, got {other:?}"),
            }
        }
        other => panic!("expected PartialFailure, got {other:?}"),
    }

    // The third artifact was never handed to the signer.
    assert_eq!(
        h.command.called_basenames(),
        vec!["bash-5.2.26-3.x86_64.rpm", "bash-5.2.26-3.aarch64.rpm"]
    );
    assert_eq!(h.hub.record_count(), 1);
}

#[tokio::test]
async fn test_listing_failure_aborts_before_any_artifact() {
    let topdir = TempDir::new().unwrap();
    let layout = TreeLayout::new(topdir.path());
    let hub = Arc::new(MemoryHub {
        fail_listing: true,
        ..MemoryHub::default()
    });
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())));
    let artifact_signer = ArtifactSigner::new(
        command.clone(),
        hub.clone(),
        Arc::new(layout),
        &SignerConfig::builder().build(),
    );
    let signer = BuildSigner::new(hub, artifact_signer);

    let outcome = signer.sign_build(&fake_build()).await;
    match outcome {
        BatchOutcome::Aborted { error } => {
            assert!(matches!(error, SignError::Lookup { build_id: 41, .. }))
        }
        other => panic!("expected Aborted, got {other:?}"),
    }
    assert_eq!(command.call_count(), 0);
}

/// Running the batch twice produces exactly one record per artifact; the
/// second run is a skip for every package.
#[traced_test]
#[tokio::test]
async fn test_rerun_is_idempotent() {
    let h = harness(
        CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())),
        three_rpms(),
    );

    let first = h.signer.sign_build(&fake_build()).await;
    assert!(matches!(
        first,
        BatchOutcome::AllSigned {
            signed: 3,
            skipped: 0
        }
    ));

    let second = h.signer.sign_build(&fake_build()).await;
    assert!(matches!(
        second,
        BatchOutcome::AllSigned {
            signed: 0,
            skipped: 3
        }
    ));

    assert_eq!(h.hub.record_count(), 3);
    assert!(logs_contain("Package already signed, skipping"));
}

#[tokio::test]
async fn test_outcome_into_result() {
    let h = harness(
        CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())),
        three_rpms(),
    );
    assert!(h.signer.sign_build(&fake_build()).await.into_result().is_ok());

    let failing = harness(
        CannedSigner::new(SignerScript::Fail("boom".to_string())),
        three_rpms(),
    );
    let err = failing
        .signer
        .sign_build(&fake_build())
        .await
        .into_result()
        .unwrap_err();
    assert!(matches!(err, SignError::SigningCommand { .. }));
}
