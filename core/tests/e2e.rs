//! End-to-end integration tests for the UMI core formats.
//!
//! These tests exercise the full record lifecycle across module boundaries:
//! key generation, address derivation and Bech32 display, transaction
//! construction, signing and validation, block assembly, Merkle root
//! binding, and the byte-for-byte serialization round trips that every
//! other UMI implementation must agree with.
//!
//! Each test stands alone. No shared state, no test ordering dependencies,
//! no flaky failures.

use std::sync::Arc;

use umi_core::{
    Address, Block, MerkleBuilder, ScratchPool, SecretKey, Transaction, ValidationError, Version,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Builds a signed basic transfer between two freshly derived addresses.
fn build_signed_transfer(sender: &SecretKey, recipient: &Address, value: u64, nonce: u64) -> Transaction {
    let mut tx = Transaction::new();
    tx.set_sender(&Address::from_key(&sender.public_key()))
        .set_recipient(recipient)
        .set_value(value)
        .set_nonce(nonce)
        .sign(sender);
    tx
}

/// Assembles a signed block over the given transactions, Merkle root
/// included.
fn build_signed_block(publisher: &SecretKey, txs: &[Transaction]) -> Block {
    let builder = MerkleBuilder::new(Arc::new(ScratchPool::new()));
    let mut block = Block::new();
    for tx in txs {
        block.append_transaction(tx).unwrap();
    }
    let root = builder.root(&block).unwrap();
    block
        .set_merkle_root(&root)
        .set_timestamp(1_700_000_000)
        .sign(publisher);
    block
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_transfer_lifecycle() {
    let alice = SecretKey::generate();
    let bob = SecretKey::generate();
    let publisher = SecretKey::generate();

    let bob_addr = Address::from_key(&bob.public_key());
    let txs: Vec<Transaction> = (0..3)
        .map(|nonce| build_signed_transfer(&alice, &bob_addr, 500 + nonce, nonce))
        .collect();

    for tx in &txs {
        assert_eq!(tx.verify(), Ok(()));
    }

    let block = build_signed_block(&publisher, &txs);
    assert_eq!(block.tx_count(), 3);
    assert!(block.verify());

    // Every transaction extracted from the block still verifies and still
    // matches its original bytes.
    for (i, original) in txs.iter().enumerate() {
        let extracted = block.transaction(i as u16).unwrap();
        assert_eq!(extracted.to_bytes(), original.to_bytes());
        assert_eq!(extracted.verify(), Ok(()));
    }
}

#[test]
fn block_survives_the_wire() {
    let publisher = SecretKey::generate();
    let alice = SecretKey::generate();
    let bob_addr = Address::from_key(&SecretKey::generate().public_key());

    let txs: Vec<Transaction> = (0..5)
        .map(|nonce| build_signed_transfer(&alice, &bob_addr, 1, nonce))
        .collect();
    let block = build_signed_block(&publisher, &txs);

    // Serialize, reparse, and check that nothing drifted: header fields,
    // signature, hash, and the recomputed Merkle root.
    let restored = Block::from_bytes(&block.to_bytes()).unwrap();
    assert_eq!(restored.hash(), block.hash());
    assert_eq!(restored.merkle_root(), block.merkle_root());
    assert!(restored.verify());

    let builder = MerkleBuilder::default();
    assert_eq!(builder.root(&restored).unwrap(), restored.merkle_root());
}

#[test]
fn tampered_block_transaction_is_detectable_via_merkle_root() {
    let publisher = SecretKey::generate();
    let alice = SecretKey::generate();
    let bob_addr = Address::from_key(&SecretKey::generate().public_key());

    let txs: Vec<Transaction> = (0..4)
        .map(|nonce| build_signed_transfer(&alice, &bob_addr, 100, nonce))
        .collect();
    let block = build_signed_block(&publisher, &txs);

    // Swap one transaction for a different (even validly signed) one.
    let mut bytes = block.to_bytes();
    let tampered_tx = build_signed_transfer(&alice, &bob_addr, 999_999, 2);
    let offset = 167 + 150 * 2;
    bytes[offset..offset + 150].copy_from_slice(&tampered_tx.to_bytes());

    let tampered = Block::from_bytes(&bytes).unwrap();
    // The header (and so its signature) is untouched...
    assert!(tampered.verify());
    // ...but the Merkle root no longer matches the transaction set.
    let builder = MerkleBuilder::default();
    assert_ne!(builder.root(&tampered).unwrap(), tampered.merkle_root());
}

#[test]
fn address_display_roundtrip_through_text() {
    let key = SecretKey::generate();
    let addr = Address::from_key(&key.public_key());

    let text = addr.to_bech32().unwrap();
    assert!(text.starts_with("umi1"), "address was: {text}");
    assert!(text.len() <= 90);

    let parsed = Address::from_bech32(&text).unwrap();
    assert_eq!(parsed.to_bytes(), addr.to_bytes());
    assert_eq!(parsed.public_key().to_bytes(), key.public_key().to_bytes());
}

#[test]
fn signature_does_not_survive_field_tampering() {
    let alice = SecretKey::generate();
    let bob_addr = Address::from_key(&SecretKey::generate().public_key());
    let mut tx = build_signed_transfer(&alice, &bob_addr, 1000, 7);

    assert_eq!(tx.verify(), Ok(()));
    tx.set_value(1001);
    assert_eq!(tx.verify(), Err(ValidationError::InvalidSignature));
}

#[test]
fn smart_contract_rules_compose_with_signatures() {
    let alice = SecretKey::generate();
    let mut contract = Address::new();
    contract.set_prefix("abc").unwrap();

    let mut tx = Transaction::new();
    tx.set_version(Version::CreateSmartContract)
        .set_sender(&Address::from_key(&alice.public_key()))
        .set_recipient(&contract)
        .set_profit_percent(300)
        .set_fee_percent(1500)
        .sign(&alice);

    assert_eq!(tx.verify(), Ok(()));

    // Rule checks run before the signature check: breaking a percent bound
    // on a correctly signed transaction reports the percent, and re-signing
    // after the mutation doesn't rescue it.
    tx.set_profit_percent(501).sign(&alice);
    assert_eq!(tx.verify(), Err(ValidationError::InvalidProfitPercent));
}

#[test]
fn one_pool_serves_many_threads() {
    let pool = Arc::new(ScratchPool::new());
    let builder = MerkleBuilder::new(Arc::clone(&pool));

    let alice = SecretKey::generate();
    let bob_addr = Address::from_key(&SecretKey::generate().public_key());

    std::thread::scope(|scope| {
        for t in 0u64..4 {
            let builder = builder.clone();
            let alice = &alice;
            let bob_addr = &bob_addr;
            scope.spawn(move || {
                let mut block = Block::new();
                for nonce in 0..9 {
                    let tx = build_signed_transfer(alice, bob_addr, t + 1, nonce);
                    block.append_transaction(&tx).unwrap();
                }
                let root = builder.root(&block).unwrap();
                // Same work, same root, every iteration.
                assert_eq!(builder.root(&block).unwrap(), root);
            });
        }
    });

    assert!(pool.available() >= 1);
}
