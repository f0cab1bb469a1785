//! End-to-end behaviour of the registry through its public API

use umbra_core::{
    AttestationState, AttestationStatus, ChallengeNonce, CredentialTypeId, Digest, Principal,
    RegistryError,
};
use umbra_crypto::{proof_digest, status_leaf, RevocationTree};
use umbra_registry::{RegistryConfig, RegistryEvent};

mod common;
use common::TestRegistry;

fn digest(byte: u8) -> Digest {
    Digest::from([byte; 32])
}

// ── Issuer directory ────────────────────────────────────────────

#[test]
fn test_only_owner_registers_issuers() {
    let t = TestRegistry::new();

    for caller in ["alice", "dmv", "Owner", ""] {
        let err = t
            .registry
            .register_issuer(&Principal::new(caller), Principal::new("dmv"), "DMV", vec![])
            .unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized, "caller {caller:?}");
    }

    assert_eq!(t.registry.counters().unwrap().total_issuers, 0);
}

#[test]
fn test_duplicate_issuer_rejected() {
    let t = TestRegistry::new();
    let dmv = Principal::new("dmv");

    t.registry.register_issuer(&t.owner, dmv.clone(), "DMV", vec![]).unwrap();
    assert_eq!(t.registry.counters().unwrap().total_issuers, 1);

    let err = t
        .registry
        .register_issuer(&t.owner, dmv.clone(), "DMV again", vec![])
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists(_)));
    assert_eq!(t.registry.counters().unwrap().total_issuers, 1);
    assert_eq!(t.registry.get_issuer(&dmv).unwrap().unwrap().name, "DMV");

    t.registry
        .register_issuer(&t.owner, Principal::new("bank"), "Bank", vec![])
        .unwrap();
    assert_eq!(t.registry.counters().unwrap().total_issuers, 2);
}

#[test]
fn test_empty_issuer_name_rejected() {
    let t = TestRegistry::new();
    let err = t
        .registry
        .register_issuer(&t.owner, Principal::new("dmv"), "", vec![])
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidInput(_)));
}

#[test]
fn test_issuer_status_is_owner_only() {
    let t = TestRegistry::new();
    let (dmv, _) = t.issuer_with_type("dmv");

    assert_eq!(
        t.registry.set_issuer_status(&dmv, &dmv, false).unwrap_err(),
        RegistryError::Unauthorized
    );
    assert!(matches!(
        t.registry.set_issuer_status(&t.owner, &Principal::new("ghost"), false),
        Err(RegistryError::NotFound(_))
    ));

    t.registry.set_issuer_status(&t.owner, &dmv, false).unwrap();
    assert!(!t.registry.is_active_issuer(&dmv).unwrap());
    assert!(t.registry.get_issuer(&dmv).unwrap().is_some());

    t.registry.set_issuer_status(&t.owner, &dmv, true).unwrap();
    assert!(t.registry.is_active_issuer(&dmv).unwrap());
}

#[test]
fn test_supported_type_capacity() {
    let t = TestRegistry::new();
    let dmv = Principal::new("dmv");
    t.registry.register_issuer(&t.owner, dmv.clone(), "DMV", vec![]).unwrap();

    let limit = t.registry.config().max_supported_types as u64;
    for id in 1..=limit {
        t.registry
            .add_supported_type(&t.owner, &dmv, CredentialTypeId(id))
            .unwrap();
    }
    let before = t.registry.get_issuer(&dmv).unwrap().unwrap().supported_types;

    let err = t
        .registry
        .add_supported_type(&t.owner, &dmv, CredentialTypeId(limit + 1))
        .unwrap_err();
    assert_eq!(err, RegistryError::CapacityExceeded { limit: limit as usize });

    let after = t.registry.get_issuer(&dmv).unwrap().unwrap().supported_types;
    assert_eq!(before, after);
    assert_eq!(after, (1..=limit).map(CredentialTypeId).collect::<Vec<_>>());
}

#[test]
fn test_add_supported_type_errors() {
    let t = TestRegistry::new();
    let (dmv, _) = t.issuer_with_type("dmv");

    assert_eq!(
        t.registry
            .add_supported_type(&dmv, &dmv, CredentialTypeId(7))
            .unwrap_err(),
        RegistryError::Unauthorized
    );
    assert!(matches!(
        t.registry
            .add_supported_type(&t.owner, &Principal::new("ghost"), CredentialTypeId(7)),
        Err(RegistryError::NotFound(_))
    ));
}

// ── Credential type catalog ─────────────────────────────────────

#[test]
fn test_credential_type_ids_start_at_one_and_increase() {
    let t = TestRegistry::new();
    let dmv = Principal::new("dmv");
    t.registry.register_issuer(&t.owner, dmv.clone(), "DMV", vec![]).unwrap();

    let ids: Vec<_> = (0..5)
        .map(|i| {
            t.registry
                .issue_credential_type(&dmv, format!("claim-{i}"), "")
                .unwrap()
        })
        .collect();

    assert_eq!(ids[0], CredentialTypeId(1));
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let entry = t.registry.get_credential_type(ids[2]).unwrap().unwrap();
    assert_eq!(entry.name, "claim-2");
    assert_eq!(entry.owner, dmv);
    assert_eq!(entry.created_at, 1000);
}

#[test]
fn test_credential_type_requires_active_issuer() {
    let t = TestRegistry::new();
    let (dmv, _) = t.issuer_with_type("dmv");

    assert_eq!(
        t.registry
            .issue_credential_type(&Principal::new("stranger"), "claim", "")
            .unwrap_err(),
        RegistryError::Unauthorized
    );

    t.registry.set_issuer_status(&t.owner, &dmv, false).unwrap();
    assert_eq!(
        t.registry.issue_credential_type(&dmv, "claim", "").unwrap_err(),
        RegistryError::Unauthorized
    );

    let next = t.registry.counters().unwrap().next_credential_type_id;
    assert_eq!(next, CredentialTypeId(2));
}

#[test]
fn test_credential_type_name_required() {
    let t = TestRegistry::new();
    let (dmv, _) = t.issuer_with_type("dmv");

    assert!(matches!(
        t.registry.issue_credential_type(&dmv, "  ", "blank"),
        Err(RegistryError::InvalidInput(_))
    ));
}

#[test]
fn test_credential_type_description_bounded() {
    let t = TestRegistry::new();
    let (dmv, _) = t.issuer_with_type("dmv");
    let max = t.registry.config().max_description_len;

    assert!(matches!(
        t.registry.issue_credential_type(&dmv, "age", "x".repeat(max + 1)),
        Err(RegistryError::InvalidInput(_))
    ));
    assert_eq!(
        t.registry.counters().unwrap().next_credential_type_id,
        CredentialTypeId(2)
    );

    let id = t.registry.issue_credential_type(&dmv, "age", "x".repeat(max)).unwrap();
    assert_eq!(
        t.registry.get_credential_type(id).unwrap().unwrap().description.len(),
        max
    );
}

// ── Revocation anchors ──────────────────────────────────────────

#[test]
fn test_anchor_overwrites_in_place() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");

    assert!(t.registry.get_merkle_anchor(&dmv, type_id).unwrap().is_none());

    t.registry.update_merkle_anchor(&dmv, type_id, digest(1)).unwrap();
    t.clock.advance(5);
    t.registry.update_merkle_anchor(&dmv, type_id, digest(2)).unwrap();

    let anchor = t.registry.get_merkle_anchor(&dmv, type_id).unwrap().unwrap();
    assert_eq!(anchor.root, digest(2));
    assert_eq!(anchor.updated_at, 1005);
    assert_eq!(anchor.anchor_height, 1005);
}

#[test]
fn test_anchor_authorization_and_input() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let (bank, bank_type) = t.issuer_with_type("bank");

    assert_eq!(
        t.registry.update_merkle_anchor(&bank, type_id, digest(1)).unwrap_err(),
        RegistryError::Unauthorized
    );
    assert!(matches!(
        t.registry.update_merkle_anchor(&dmv, type_id, Digest::default()),
        Err(RegistryError::InvalidInput(_))
    ));

    t.registry.update_merkle_anchor(&bank, bank_type, digest(3)).unwrap();
    assert!(t.registry.get_merkle_anchor(&dmv, bank_type).unwrap().is_none());
}

#[test]
fn test_anchored_root_checks_witnesses_off_registry() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");
    let bob = Principal::new("bob");
    let alice_proof = proof_digest(b"alice-proof");
    let bob_proof = proof_digest(b"bob-proof");

    let mut tree = RevocationTree::new(8).unwrap();
    let alice_index = tree.append(status_leaf(&alice, type_id, &alice_proof)).unwrap();
    let bob_index = tree.append(status_leaf(&bob, type_id, &bob_proof)).unwrap();
    t.registry
        .update_merkle_anchor(&dmv, type_id, tree.root_digest())
        .unwrap();

    let anchor = t.registry.get_merkle_anchor(&dmv, type_id).unwrap().unwrap();
    assert!(tree.witness(alice_index).unwrap().verify(&anchor.root));

    let bob_witness = tree.witness(bob_index).unwrap();
    tree.revoke(bob_index).unwrap();
    t.registry
        .update_merkle_anchor(&dmv, type_id, tree.root_digest())
        .unwrap();

    let anchor = t.registry.get_merkle_anchor(&dmv, type_id).unwrap().unwrap();
    assert!(!bob_witness.verify(&anchor.root));
    assert!(tree.witness(alice_index).unwrap().verify(&anchor.root));
}

// ── Attestations ────────────────────────────────────────────────

#[test]
fn test_attestation_valid_until_window_end() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");
    let h = t.now();

    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(9), h + 100)
        .unwrap();

    assert!(t.registry.is_valid(&alice, type_id).unwrap());
    t.clock.set(h + 99);
    assert!(t.registry.is_valid(&alice, type_id).unwrap());
    t.clock.set(h + 100);
    assert!(!t.registry.is_valid(&alice, type_id).unwrap());
    assert_eq!(
        t.registry.attestation_state(&alice, type_id).unwrap(),
        AttestationState::Expired
    );
    assert!(!t.registry.is_revoked(&alice, type_id).unwrap());
}

#[test]
fn test_attestation_window_bounds() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");
    let h = t.now();
    let max = t.registry.config().max_validity_period;

    for valid_until in [0, h - 1, h] {
        assert_eq!(
            t.registry
                .verify_attestation(&dmv, alice.clone(), type_id, digest(1), valid_until)
                .unwrap_err(),
            RegistryError::ExpiredWindow
        );
    }
    for valid_until in [h + max, h + max + 1] {
        assert_eq!(
            t.registry
                .verify_attestation(&dmv, alice.clone(), type_id, digest(1), valid_until)
                .unwrap_err(),
            RegistryError::WindowTooLong { max }
        );
    }

    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(1), h + max - 1)
        .unwrap();
    assert_eq!(t.registry.counters().unwrap().total_attestations, 1);
}

#[test]
fn test_attestation_requires_proof_and_authorization() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let (bank, _) = t.issuer_with_type("bank");
    let alice = Principal::new("alice");
    let until = t.now() + 10;

    assert_eq!(
        t.registry
            .verify_attestation(&dmv, alice.clone(), type_id, Digest::default(), until)
            .unwrap_err(),
        RegistryError::InvalidProof
    );
    assert_eq!(
        t.registry
            .verify_attestation(&bank, alice.clone(), type_id, digest(1), until)
            .unwrap_err(),
        RegistryError::Unauthorized
    );

    t.registry.set_issuer_status(&t.owner, &dmv, false).unwrap();
    assert_eq!(
        t.registry
            .verify_attestation(&dmv, alice.clone(), type_id, digest(1), until)
            .unwrap_err(),
        RegistryError::Unauthorized
    );
    assert!(t.registry.get_attestation(&alice, type_id).unwrap().is_none());
    assert_eq!(t.registry.counters().unwrap().total_attestations, 0);
}

#[test]
fn test_reissue_overwrites_and_counts() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");
    let h = t.now();

    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(1), h + 10)
        .unwrap();
    t.registry.revoke_attestation(&dmv, &alice, type_id).unwrap();
    t.clock.advance(3);
    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(2), h + 50)
        .unwrap();

    let att = t.registry.get_attestation(&alice, type_id).unwrap().unwrap();
    assert_eq!(att.proof_digest, digest(2));
    assert_eq!(att.issued_at, h + 3);
    assert_eq!(att.status, AttestationStatus::Active);
    assert_eq!(t.registry.counters().unwrap().total_attestations, 2);
}

#[test]
fn test_revocation_by_original_issuer_only() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let (bank, _) = t.issuer_with_type("bank");
    t.registry.add_supported_type(&t.owner, &bank, type_id).unwrap();
    let alice = Principal::new("alice");

    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(1), t.now() + 100)
        .unwrap();

    assert_eq!(
        t.registry.revoke_attestation(&bank, &alice, type_id).unwrap_err(),
        RegistryError::Unauthorized
    );
    assert_eq!(
        t.registry.revoke_attestation(&t.owner, &alice, type_id).unwrap_err(),
        RegistryError::Unauthorized
    );
    assert!(t.registry.is_valid(&alice, type_id).unwrap());

    t.registry.revoke_attestation(&dmv, &alice, type_id).unwrap();
    assert!(!t.registry.is_valid(&alice, type_id).unwrap());
    assert!(t.registry.is_revoked(&alice, type_id).unwrap());
    assert_eq!(
        t.registry.attestation_state(&alice, type_id).unwrap(),
        AttestationState::Revoked
    );
    assert!(t.registry.get_attestation(&alice, type_id).unwrap().is_some());
}

#[test]
fn test_revoke_missing_attestation() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");

    assert!(matches!(
        t.registry.revoke_attestation(&dmv, &Principal::new("alice"), type_id),
        Err(RegistryError::NotFound(_))
    ));
}

#[test]
fn test_absence_reads_as_revoked() {
    let t = TestRegistry::new();
    let alice = Principal::new("alice");

    assert!(t.registry.is_revoked(&alice, CredentialTypeId(42)).unwrap());
    assert!(!t.registry.is_valid(&alice, CredentialTypeId(42)).unwrap());
    assert_eq!(
        t.registry.attestation_state(&alice, CredentialTypeId(42)).unwrap(),
        AttestationState::Missing
    );
}

#[test]
fn test_batch_check_matches_individual_checks() {
    let t = TestRegistry::new();
    let (dmv, t1) = t.issuer_with_type("dmv");
    let (bank, t2) = t.issuer_with_type("bank");
    let t3 = CredentialTypeId(99);
    let alice = Principal::new("alice");

    t.registry
        .verify_attestation(&dmv, alice.clone(), t1, digest(1), t.now() + 10)
        .unwrap();
    t.registry
        .verify_attestation(&bank, alice.clone(), t2, digest(2), t.now() + 10)
        .unwrap();
    t.registry.revoke_attestation(&bank, &alice, t2).unwrap();

    let ids = [t1, t2, t3];
    let batch = t.registry.batch_check(&alice, &ids).unwrap();
    let individual: Vec<bool> = ids
        .iter()
        .map(|id| t.registry.is_valid(&alice, *id).unwrap())
        .collect();

    assert_eq!(batch, vec![true, false, false]);
    assert_eq!(batch, individual);

    let reversed = t.registry.batch_check(&alice, &[t3, t2, t1]).unwrap();
    assert_eq!(reversed, vec![false, false, true]);

    let too_many: Vec<_> = (1..=11).map(CredentialTypeId).collect();
    assert!(matches!(
        t.registry.batch_check(&alice, &too_many),
        Err(RegistryError::InvalidInput(_))
    ));
}

// ── Challenges ──────────────────────────────────────────────────

#[test]
fn test_challenge_single_use() {
    let t = TestRegistry::new();
    let alice = Principal::new("alice");

    let nonce = t.registry.create_challenge(&alice, digest(5)).unwrap();
    t.clock.advance(10);

    t.registry.respond_to_challenge(&alice, nonce, &digest(6)).unwrap();
    assert!(t.registry.get_challenge(&alice, nonce).unwrap().unwrap().used);

    assert_eq!(
        t.registry.respond_to_challenge(&alice, nonce, &digest(6)).unwrap_err(),
        RegistryError::AlreadyUsed
    );
}

#[test]
fn test_challenge_freshness_window() {
    let t = TestRegistry::new();
    let alice = Principal::new("alice");
    let window = t.registry.config().challenge_window;

    let late = t.registry.create_challenge(&alice, digest(1)).unwrap();
    let edge = t.registry.create_challenge(&alice, digest(2)).unwrap();

    t.clock.advance(window - 1);
    t.registry.respond_to_challenge(&alice, edge, &digest(0)).unwrap();

    t.clock.advance(1);
    assert_eq!(
        t.registry.respond_to_challenge(&alice, late, &digest(0)).unwrap_err(),
        RegistryError::Stale
    );
    assert!(!t.registry.get_challenge(&alice, late).unwrap().unwrap().used);
}

#[test]
fn test_challenge_nonces_increase_across_requesters() {
    let t = TestRegistry::new();
    let alice = Principal::new("alice");
    let bob = Principal::new("bob");

    let n1 = t.registry.create_challenge(&alice, digest(1)).unwrap();
    let n2 = t.registry.create_challenge(&bob, digest(1)).unwrap();
    let n3 = t.registry.create_challenge(&alice, digest(1)).unwrap();

    assert_eq!(n1, ChallengeNonce::FIRST);
    assert!(n1 < n2 && n2 < n3);

    assert!(matches!(
        t.registry.respond_to_challenge(&bob, n1, &digest(0)),
        Err(RegistryError::NotFound(_))
    ));
    assert!(matches!(
        t.registry.respond_to_challenge(&alice, ChallengeNonce(999), &digest(0)),
        Err(RegistryError::NotFound(_))
    ));
}

// ── Cross-cutting ───────────────────────────────────────────────

#[test]
fn test_failed_calls_leave_state_untouched() {
    let t = TestRegistry::with_config(RegistryConfig {
        max_supported_types: 1,
        ..Default::default()
    });
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");
    let before = t.registry.snapshot().unwrap();
    let events_before = t.events.records().len();

    let failures = [
        t.registry
            .register_issuer(&alice, Principal::new("x"), "X", vec![])
            .unwrap_err(),
        t.registry
            .add_supported_type(&t.owner, &dmv, CredentialTypeId(2))
            .unwrap_err(),
        t.registry.issue_credential_type(&alice, "claim", "").unwrap_err(),
        t.registry
            .update_merkle_anchor(&dmv, type_id, Digest::default())
            .unwrap_err(),
        t.registry
            .verify_attestation(&dmv, alice.clone(), type_id, digest(1), 0)
            .unwrap_err(),
        t.registry.revoke_attestation(&dmv, &alice, type_id).unwrap_err(),
        t.registry.create_challenge(&alice, Digest::default()).unwrap_err(),
        t.registry
            .respond_to_challenge(&alice, ChallengeNonce(1), &digest(1))
            .unwrap_err(),
    ];

    assert_eq!(failures.len(), 8);
    assert_eq!(t.registry.snapshot().unwrap(), before);
    assert_eq!(t.events.records().len(), events_before);
}

#[test]
fn test_events_follow_successful_mutations() {
    let t = TestRegistry::new();
    let (dmv, type_id) = t.issuer_with_type("dmv");
    let alice = Principal::new("alice");

    t.registry
        .verify_attestation(&dmv, alice.clone(), type_id, digest(1), t.now() + 10)
        .unwrap();
    t.registry.revoke_attestation(&dmv, &alice, type_id).unwrap();

    let names: Vec<_> = t.events.events().iter().map(RegistryEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "contract-deployed",
            "issuer-registered",
            "credential-type-issued",
            "supported-type-added",
            "attestation-verified",
            "attestation-revoked",
        ]
    );
}
