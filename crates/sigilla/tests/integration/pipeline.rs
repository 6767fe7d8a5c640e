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

//! Per-artifact pipeline tests.

use std::sync::Arc;
use tempfile::TempDir;

use sigilla::rpm::SignatureHeader;
use sigilla::{ArtifactOutcome, ArtifactSigner, SignError, SignerConfig, TreeLayout};

use crate::fixtures::{
    fake_build, fake_rpm, materialize_build, signed_rpm_bytes, unsigned_rpm_bytes, CannedSigner,
    MemoryHub, SignerScript, SIGKEY,
};

struct Harness {
    _topdir: TempDir,
    hub: Arc<MemoryHub>,
    command: Arc<CannedSigner>,
    signer: ArtifactSigner,
}

/// One build with one RPM on disk, signed by the given script.
fn harness(script: SignerScript, config: SignerConfig) -> Harness {
    let topdir = TempDir::new().unwrap();
    let layout = TreeLayout::new(topdir.path());
    let build = fake_build();
    let rpm = fake_rpm(7, "bash", "x86_64");
    materialize_build(&layout, &build, &[(rpm, b"unsigned rpm".to_vec())]).unwrap();

    let hub = Arc::new(MemoryHub::default());
    let command = Arc::new(CannedSigner::new(script));
    let signer = ArtifactSigner::new(command.clone(), hub.clone(), Arc::new(layout), &config);

    Harness {
        _topdir: topdir,
        hub,
        command,
        signer,
    }
}

#[tokio::test]
async fn test_signed_artifact_stores_signature() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().build(),
    );

    let outcome = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ArtifactOutcome::Signed {
            sigkey: SIGKEY.to_string()
        }
    );

    // The stored bytes are the raw signature header region of the signed
    // candidate, padding included.
    let expected = SignatureHeader::parse(&signed_rpm_bytes()).unwrap();
    let records = h.hub.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rpm_id, 7);
    assert_eq!(records[0].sigkey, SIGKEY);
    assert_eq!(records[0].sighdr, expected.raw());
}

#[tokio::test]
async fn test_signed_copy_materialized_by_default() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().build(),
    );

    h.signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap();

    let copies = h.hub.signed_copies.lock().unwrap();
    assert_eq!(
        copies.as_slice(),
        &[("bash-5.2.26-3.x86_64.rpm".to_string(), SIGKEY.to_string())]
    );
}

#[tokio::test]
async fn test_signed_copy_disabled() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().write_signed_copies(false).build(),
    );

    h.signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap();

    assert!(h.hub.signed_copies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_file_fails_before_signer_runs() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().build(),
    );

    // An RPM the build never produced on disk.
    let absent = fake_rpm(8, "bash-doc", "noarch");
    let err = h.signer.sign_rpm(&fake_build(), &absent).await.unwrap_err();

    assert!(matches!(err, SignError::FileNotFound { .. }));
    assert_eq!(h.command.call_count(), 0);
    assert_eq!(h.hub.record_count(), 0);
}

#[tokio::test]
async fn test_unsigned_response_rejected() {
    let h = harness(
        SignerScript::Emit(unsigned_rpm_bytes()),
        SignerConfig::builder().build(),
    );

    let err = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::UnsignedResponse { .. }));
    assert_eq!(h.hub.record_count(), 0);
}

#[tokio::test]
async fn test_corrupt_response_rejected() {
    let h = harness(
        SignerScript::Emit(b"not an rpm at all".to_vec()),
        SignerConfig::builder().build(),
    );

    let err = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::CorruptSignedArtifact { .. }));
}

#[tokio::test]
async fn test_empty_response_rejected() {
    let h = harness(
        SignerScript::Emit(Vec::new()),
        SignerConfig::builder().build(),
    );

    let err = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::CorruptSignedArtifact { .. }));
}

#[tokio::test]
async fn test_already_signed_is_skipped_without_write() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().build(),
    );
    h.hub.seed_signature(7, SIGKEY);

    let outcome = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ArtifactOutcome::AlreadySigned {
            sigkey: SIGKEY.to_string()
        }
    );
    // Only the seeded record remains and no signed copy was written.
    assert_eq!(h.hub.record_count(), 1);
    assert!(h.hub.signed_copies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_signature_under_other_key_does_not_skip() {
    let h = harness(
        SignerScript::Emit(signed_rpm_bytes()),
        SignerConfig::builder().build(),
    );
    h.hub.seed_signature(7, "ffffffff");

    let outcome = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ArtifactOutcome::Signed {
            sigkey: SIGKEY.to_string()
        }
    );
    assert_eq!(h.hub.record_count(), 2);
}

#[tokio::test]
async fn test_command_failure_names_the_artifact() {
    let h = harness(
        SignerScript::Fail("no such key".to_string()),
        SignerConfig::builder().build(),
    );

    let err = h
        .signer
        .sign_rpm(&fake_build(), &fake_rpm(7, "bash", "x86_64"))
        .await
        .unwrap_err();

    match &err {
        SignError::SigningCommand { rpm, detail } => {
            assert_eq!(rpm, "bash-5.2.26-3.x86_64.rpm");
            assert!(detail.contains("no such key"));
        }
        other => panic!("expected SigningCommand, got {other:?}"),
    }
    assert!(err.to_string().contains("bash-5.2.26-3.x86_64.rpm"));
}

#[tokio::test]
async fn test_store_failure_is_persist_error() {
    let topdir = TempDir::new().unwrap();
    let layout = TreeLayout::new(topdir.path());
    let build = fake_build();
    let rpm = fake_rpm(7, "bash", "x86_64");
    materialize_build(&layout, &build, &[(rpm.clone(), b"unsigned".to_vec())]).unwrap();

    let hub = Arc::new(MemoryHub {
        fail_writes: true,
        ..MemoryHub::default()
    });
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())));
    let signer = ArtifactSigner::new(
        command,
        hub.clone(),
        Arc::new(layout),
        &SignerConfig::builder().build(),
    );

    let err = signer.sign_rpm(&build, &rpm).await.unwrap_err();
    assert!(matches!(err, SignError::Persist { .. }));
}

/// Temporary candidates are removed on the success, skip, and failure
/// paths alike.
#[tokio::test]
async fn test_no_temporary_files_survive() {
    let spool = TempDir::new().unwrap();
    let topdir = TempDir::new().unwrap();
    let layout = TreeLayout::new(topdir.path());
    let build = fake_build();
    let rpm = fake_rpm(7, "bash", "x86_64");
    materialize_build(&layout, &build, &[(rpm.clone(), b"unsigned".to_vec())]).unwrap();

    let config = SignerConfig::builder().spool_dir(spool.path()).build();
    let layout = Arc::new(layout);
    let hub = Arc::new(MemoryHub::default());

    let spool_entries = || {
        std::fs::read_dir(spool.path())
            .unwrap()
            .collect::<Vec<_>>()
            .len()
    };

    // Success.
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())));
    let signer = ArtifactSigner::new(command, hub.clone(), layout.clone(), &config);
    signer.sign_rpm(&build, &rpm).await.unwrap();
    assert_eq!(spool_entries(), 0);

    // Already-signed skip.
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())));
    let signer = ArtifactSigner::new(command, hub.clone(), layout.clone(), &config);
    signer.sign_rpm(&build, &rpm).await.unwrap();
    assert_eq!(spool_entries(), 0);

    // Validation failure.
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(b"garbage".to_vec())));
    let signer = ArtifactSigner::new(command, hub.clone(), layout.clone(), &config);
    signer.sign_rpm(&build, &rpm).await.unwrap_err();
    assert_eq!(spool_entries(), 0);

    // Store failure after a successful sign.
    let failing_hub = Arc::new(MemoryHub {
        fail_writes: true,
        ..MemoryHub::default()
    });
    let command = Arc::new(CannedSigner::new(SignerScript::Emit(signed_rpm_bytes())));
    let signer = ArtifactSigner::new(command, failing_hub, layout, &config);
    signer.sign_rpm(&build, &rpm).await.unwrap_err();
    assert_eq!(spool_entries(), 0);
}
