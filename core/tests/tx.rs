// Copyright (c) 2025-2026 The Ledger-CN Developers

//! End-to-end transaction construction through the engine

use encdec::DecodeOwned;
use heapless::Vec;

use ledger_cn_core::{
    apdu::tx::TxCommitResp,
    crypto::ring::verify,
    engine::{Engine, Event, Output, State},
    Error,
};

mod helpers;
use helpers::{decoy, owned_output, TestDriver};

#[test]
fn single_input_transaction() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());

    let drv = TestDriver::new();
    let keys = drv.keys();
    let mut e = Engine::new(drv);

    // Start session: one input, one output
    let r = e
        .update(&Event::TxStart {
            num_inputs: 1,
            num_outputs: 1,
        })
        .expect("start session");
    assert_eq!(r, State::InputsReceived);

    // Load the output
    let (tx_public_key, output_key) = owned_output(&keys, 0);
    let r = e
        .update(&Event::TxAddOutput {
            tx_public_key,
            output_index: 0,
            output_key,
        })
        .expect("add output");
    assert_eq!(r, State::OutputsReceived);

    // Finalize the prefix
    let prefix_hash = match e.update(&Event::TxFinalizePrefix).expect("finalize prefix") {
        Output::TxPrefixHash { prefix_hash } => prefix_hash,
        r => panic!("unexpected output: {r:?}"),
    };
    assert_eq!(e.state(), State::PrefixFinalized);

    // Sign the input with a 3-ring, real member in the middle
    let mut ring = Vec::new();
    let _ = ring.push(decoy());
    let _ = ring.push(output_key);
    let _ = ring.push(decoy());

    let sig = match e
        .update(&Event::TxSignInput {
            output_index: 0,
            real_index: 1,
            ring: ring.clone(),
        })
        .expect("sign input")
    {
        Output::TxSignature(sig) => sig,
        r => panic!("unexpected output: {r:?}"),
    };
    assert_eq!(e.state(), State::Signing);
    assert_eq!(sig.ring.len(), 3);

    // Commit, fetching the assembled set
    let sigs = match e.update(&Event::TxCommit).expect("commit") {
        Output::TxSignatures(sigs) => sigs,
        r => panic!("unexpected output: {r:?}"),
    };
    assert_eq!(e.state(), State::Complete);
    assert_eq!(sigs.len(), 1);
    assert_eq!(sigs[0], sig);

    // The emitted signature verifies against the session material
    assert!(verify(&prefix_hash, &sig.key_image, &ring, &sig.ring));

    // And fails against anything else
    assert!(!verify(&[0xaa; 32], &sig.key_image, &ring, &sig.ring));
}

#[test]
fn multi_input_transaction() {
    let drv = TestDriver::new();
    let keys = drv.keys();
    let mut e = Engine::new(drv);

    e.update(&Event::TxStart {
        num_inputs: 2,
        num_outputs: 2,
    })
    .unwrap();

    let outputs = [owned_output(&keys, 0), owned_output(&keys, 1)];

    for (i, (tx_public_key, output_key)) in outputs.iter().enumerate() {
        e.update(&Event::TxAddOutput {
            tx_public_key: *tx_public_key,
            output_index: i as u64,
            output_key: *output_key,
        })
        .unwrap();
    }

    let prefix_hash = match e.update(&Event::TxFinalizePrefix).unwrap() {
        Output::TxPrefixHash { prefix_hash } => prefix_hash,
        r => panic!("unexpected output: {r:?}"),
    };

    // Commit before signing is rejected
    assert_eq!(e.update(&Event::TxCommit), Err(Error::UnexpectedEvent));
    assert_eq!(e.state(), State::PrefixFinalized);

    let mut rings = std::vec::Vec::new();

    for i in 0..2u64 {
        let mut ring = Vec::new();
        let _ = ring.push(outputs[i as usize].1);
        let _ = ring.push(decoy());

        e.update(&Event::TxSignInput {
            output_index: i,
            real_index: 0,
            ring: ring.clone(),
        })
        .unwrap();

        rings.push(ring);
    }

    // A third input exceeds the declared count
    let r = e.update(&Event::TxSignInput {
        output_index: 0,
        real_index: 0,
        ring: rings[0].clone(),
    });
    assert_eq!(r, Err(Error::UnexpectedEvent));

    let sigs = match e.update(&Event::TxCommit).unwrap() {
        Output::TxSignatures(sigs) => sigs,
        r => panic!("unexpected output: {r:?}"),
    };
    assert_eq!(sigs.len(), 2);

    // Key images are distinct per input and every signature verifies
    assert_ne!(sigs[0].key_image, sigs[1].key_image);

    for (i, sig) in sigs.iter().enumerate() {
        assert_eq!(sig.input_index, i as u8);
        assert!(verify(&prefix_hash, &sig.key_image, &rings[i], &sig.ring));
    }

    // The commit response survives the wire
    let out = Output::TxSignatures(sigs.clone());
    let mut buff = [0u8; 2048];
    let n = out.encode(&mut buff).unwrap();

    let (resp, m) = TxCommitResp::decode_owned(&buff[..n]).unwrap();
    assert_eq!(n, m);
    assert_eq!(resp.signatures, sigs);
}

#[test]
fn sign_before_finalize_rejected() {
    let drv = TestDriver::new();
    let keys = drv.keys();
    let mut e = Engine::new(drv);

    e.update(&Event::TxStart {
        num_inputs: 1,
        num_outputs: 1,
    })
    .unwrap();

    let (tx_public_key, output_key) = owned_output(&keys, 0);
    e.update(&Event::TxAddOutput {
        tx_public_key,
        output_index: 0,
        output_key,
    })
    .unwrap();

    // No prefix digest exists yet, signing must not be reachable
    let mut ring = Vec::new();
    let _ = ring.push(output_key);

    let r = e.update(&Event::TxSignInput {
        output_index: 0,
        real_index: 0,
        ring,
    });
    assert_eq!(r, Err(Error::UnexpectedEvent));
    assert_eq!(e.state(), State::OutputsReceived);
}

#[test]
fn random_values_fresh() {
    let mut e = Engine::new(TestDriver::new());

    let a = match e.update(&Event::GetRandom).unwrap() {
        Output::RandomValue { value } => value,
        r => panic!("unexpected output: {r:?}"),
    };
    let b = match e.update(&Event::GetRandom).unwrap() {
        Output::RandomValue { value } => value,
        r => panic!("unexpected output: {r:?}"),
    };

    assert_ne!(a, b);
}

#[test]
fn session_restart_discards_previous() {
    let drv = TestDriver::new();
    let keys = drv.keys();
    let mut e = Engine::new(drv);

    e.update(&Event::TxStart {
        num_inputs: 1,
        num_outputs: 1,
    })
    .unwrap();

    let (tx_public_key, output_key) = owned_output(&keys, 0);
    e.update(&Event::TxAddOutput {
        tx_public_key,
        output_index: 0,
        output_key,
    })
    .unwrap();

    // Restart mid-session
    let r = e
        .update(&Event::TxStart {
            num_inputs: 1,
            num_outputs: 1,
        })
        .unwrap();
    assert_eq!(r, State::InputsReceived);

    // The previous output is gone: finalizing now is premature
    assert_eq!(
        e.update(&Event::TxFinalizePrefix),
        Err(Error::UnexpectedEvent)
    );
}

#[test]
fn deny_from_any_state() {
    let drv = TestDriver::new();
    let keys = drv.keys();
    let mut e = Engine::new(drv);

    // Deny while idle is harmless
    assert_eq!(e.update(&Event::TxDeny), Err(Error::OperationNotPermitted));
    assert_eq!(e.state(), State::Idle);

    // Deny mid-session resets to idle
    e.update(&Event::TxStart {
        num_inputs: 1,
        num_outputs: 1,
    })
    .unwrap();

    let (tx_public_key, output_key) = owned_output(&keys, 0);
    e.update(&Event::TxAddOutput {
        tx_public_key,
        output_index: 0,
        output_key,
    })
    .unwrap();

    assert_eq!(e.update(&Event::TxDeny), Err(Error::OperationNotPermitted));
    assert_eq!(e.state(), State::Idle);

    // Session commands no longer apply
    assert_eq!(
        e.update(&Event::TxFinalizePrefix),
        Err(Error::UnexpectedEvent)
    );

    // But a fresh session may begin
    let r = e
        .update(&Event::TxStart {
            num_inputs: 1,
            num_outputs: 1,
        })
        .unwrap();
    assert_eq!(r, State::InputsReceived);
}

#[test]
fn foreign_output_rejected() {
    let drv = TestDriver::new();
    let mut e = Engine::new(drv);

    e.update(&Event::TxStart {
        num_inputs: 1,
        num_outputs: 1,
    })
    .unwrap();

    // An output belonging to a different wallet loads fine (the derivation
    // simply will not open it)...
    let stranger = TestDriver::new();
    let (tx_public_key, output_key) = owned_output(&stranger.keys(), 0);

    e.update(&Event::TxAddOutput {
        tx_public_key,
        output_index: 0,
        output_key,
    })
    .unwrap();

    e.update(&Event::TxFinalizePrefix).unwrap();

    // ...but signing it fails, the recovered one-time key cannot open the
    // real slot
    let mut ring = Vec::new();
    let _ = ring.push(output_key);
    let _ = ring.push(decoy());

    let r = e.update(&Event::TxSignInput {
        output_index: 0,
        real_index: 0,
        ring,
    });
    assert_eq!(r, Err(Error::InvalidKey));

    // No partial mutation: the input remains unsigned and the session
    // retryable
    assert_eq!(e.state(), State::PrefixFinalized);
}
