use crate::curve::*;
use crate::*;
use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::Identity};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn keypair(x: u64) -> KeyPair {
    KeyPair::from_secret(SecretKey::from_scalar(Scalar::from(x)).expect("non-zero"))
}

fn account(x: u64, balance: u64, r: u64) -> Account {
    let kp = keypair(x);
    let ct = Ciphertext::encrypt(
        &Params::default(),
        balance,
        &Scalar::from(r),
        kp.public().as_point(),
    )
    .expect("encrypt");
    Account::new(*kp.public(), ct)
}

fn find(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("needle present")
}

fn sample_bundle() -> CommitmentBundle {
    let set = AnonymitySet::new(vec![account(7, 100, 3), account(9, 5, 4)]).expect("set");
    let r = Scalar::from(11u64);
    let commitments = set
        .iter()
        .map(|a| r * a.public_key.as_point())
        .collect::<Vec<_>>();
    let tag = epoch_tag(b"Zether", 3, keypair(7).secret());
    CommitmentBundle::new(3, set, commitments, scalar_base_mul(&r), tag, 0, 1).expect("bundle")
}

// ---------- curve ----------

#[test]
fn invalid_point_encodings_are_rejected() {
    assert!(matches!(
        point_from_bytes(&[0xff; 32]),
        Err(Error::InvalidEncoding(_))
    ));
    assert!(matches!(
        point_from_bytes(&[0u8; 31]),
        Err(Error::InvalidEncoding(_))
    ));
    assert!(matches!(
        Ciphertext::from_bytes(&[0xff; 64]),
        Err(Error::InvalidEncoding(_))
    ));
    assert!(matches!(
        PublicKey::from_bytes(&[0xff; 32]),
        Err(Error::InvalidEncoding(_))
    ));
}

#[test]
fn identity_policy_is_explicit() {
    // identity is a valid ciphertext component ...
    let id = point_from_bytes(&[0u8; 32]).expect("identity decodes");
    assert_eq!(id, RistrettoPoint::identity());
    assert_eq!(
        Ciphertext::from_bytes(&[0u8; 64]).expect("zero ct"),
        Ciphertext::zero()
    );
    // ... but never a public key
    assert_eq!(
        PublicKey::from_bytes(&[0u8; 32]),
        Err(Error::InvalidEncoding("identity public key"))
    );
}

#[test]
fn scalar_decoding_requires_canonical_bytes() {
    assert!(scalar_from_bytes(&[0xff; 32]).is_err());
    assert!(scalar_from_bytes(&[1u8; 16]).is_err());
    let k = Scalar::from(123_456u64);
    assert_eq!(scalar_from_bytes(&scalar_to_bytes(&k)), Ok(k));
    assert_eq!(
        SecretKey::from_bytes(&[0u8; 32]),
        Err(Error::InvalidInput("secret key must be non-zero"))
    );
}

#[test]
fn group_helpers_agree_with_operators() {
    let a = Scalar::from(5u64);
    let b = Scalar::from(8u64);
    let p = scalar_base_mul(&a);
    let q = scalar_base_mul(&b);
    assert_eq!(point_add(&p, &q), scalar_base_mul(&(a + b)));
    assert_eq!(point_sub(&q, &p), amount_point(3));
    assert_eq!(point_add(&p, &negate(&p)), RistrettoPoint::identity());
    assert_eq!(scalar_mul(&G, &a), p);
}

// ---------- elgamal ----------

#[test]
fn concrete_encryption_matches_hand_computation() {
    // x = 7, Y = 7·G, value 42 with r = 3: CR = 3·G, CL = 42·G + 21·G = 63·G
    let kp = keypair(7);
    let ct = Ciphertext::encrypt(
        &Params::default(),
        42,
        &Scalar::from(3u64),
        kp.public().as_point(),
    )
    .expect("encrypt");
    assert_eq!(ct.CR, amount_point(3));
    assert_eq!(ct.CL, amount_point(63));
    assert_eq!(ct.decrypt_point(kp.secret().as_scalar()), amount_point(42));
}

#[test]
fn encrypt_rejects_values_above_max_balance() {
    let params = Params::with_max_balance(1_000);
    let y = keypair(3).public().as_point().to_owned();
    assert!(Ciphertext::encrypt(&params, 1_000, &Scalar::ONE, &y).is_ok());
    assert_eq!(
        Ciphertext::encrypt(&params, 1_001, &Scalar::ONE, &y),
        Err(Error::ValueOutOfRange {
            value: 1_001,
            max: 1_000
        })
    );
}

#[test]
fn decryption_with_wrong_key_does_not_yield_plaintext() {
    let kp = keypair(7);
    let ct = Ciphertext::encrypt(&Params::default(), 42, &Scalar::from(3u64), kp.public().as_point())
        .expect("encrypt");
    assert_ne!(ct.decrypt_point(&Scalar::from(8u64)), amount_point(42));
}

#[test]
fn public_amount_adjustments() {
    let kp = keypair(21);
    let x = kp.secret().as_scalar();
    let ct = Ciphertext::encrypt(&Params::default(), 50, &Scalar::from(9u64), kp.public().as_point())
        .expect("encrypt");
    assert_eq!(ct.add_amount(5).decrypt_point(x), amount_point(55));
    assert_eq!(ct.sub_amount(20).decrypt_point(x), amount_point(30));
    let mut acc = ct;
    acc -= ct;
    assert_eq!(acc.decrypt_point(x), RistrettoPoint::identity());
}

#[test]
fn ciphertext_bytes_round_trip() {
    let ct = account(5, 77, 13).balance;
    assert_eq!(Ciphertext::from_bytes(&ct.to_bytes()), Ok(ct));
    assert!(Ciphertext::from_bytes(&ct.to_bytes()[..63]).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Componentwise addition decrypts to the sum of plaintexts.
    #[test]
    fn prop_homomorphic_add(v1 in 0u64..1_000_000, v2 in 0u64..1_000_000, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let kp = KeyPair::generate(&mut rng);
        let params = Params::default();
        let c1 = Ciphertext::encrypt(&params, v1, &random_scalar(&mut rng), kp.public().as_point()).unwrap();
        let c2 = Ciphertext::encrypt(&params, v2, &random_scalar(&mut rng), kp.public().as_point()).unwrap();
        let sum = c1 + c2;
        prop_assert_eq!(sum.decrypt_point(kp.secret().as_scalar()), amount_point(v1 + v2));
        prop_assert_eq!(sum.homomorphic_sub(&c2).decrypt_point(kp.secret().as_scalar()), amount_point(v1));
    }

    /// Re-randomization changes the encoding but not the plaintext.
    #[test]
    fn prop_rerandomize_preserves_plaintext(v in 0u64..1_000_000, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let kp = KeyPair::generate(&mut rng);
        let y = kp.public().as_point();
        let ct = Ciphertext::encrypt(&Params::default(), v, &random_scalar(&mut rng), y).unwrap();
        let delta = random_nonzero_scalar(&mut rng);
        let fresh = ct.rerandomize(&delta, y);
        prop_assert_ne!(fresh.to_bytes(), ct.to_bytes());
        prop_assert_eq!(fresh.decrypt_point(kp.secret().as_scalar()), amount_point(v));
    }

    /// Random byte strings that do not decompress are always rejected.
    #[test]
    fn prop_decode_never_coerces(bytes in proptest::array::uniform32(any::<u8>())) {
        match point_from_bytes(&bytes) {
            Ok(p) => prop_assert_eq!(point_to_bytes(&p), bytes),
            Err(e) => prop_assert!(matches!(e, Error::InvalidEncoding(_))),
        }
    }
}

// ---------- keys ----------

#[test]
fn keypair_invariant_holds() {
    let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
    let kp = KeyPair::generate(&mut rng);
    assert_eq!(*kp.public().as_point(), scalar_base_mul(kp.secret().as_scalar()));
    assert_eq!(PublicKey::from_bytes(&kp.public().to_bytes()), Ok(*kp.public()));
    assert_eq!(format!("{:?}", kp.secret()), "SecretKey(..)");
}

// ---------- epoch ----------

proptest! {
    #[test]
    fn prop_epoch_tag_deterministic_per_key_and_epoch(
        x in 1u64..u64::MAX,
        epoch in any::<u64>(),
        other in any::<u64>(),
    ) {
        prop_assume!(epoch != other);
        let sk = keypair(x);
        let a = epoch_tag(b"Zether", epoch, sk.secret());
        prop_assert_eq!(a, epoch_tag(b"Zether", epoch, sk.secret()));
        prop_assert_ne!(a, epoch_tag(b"Zether", other, sk.secret()));
    }
}

#[test]
fn epoch_tag_depends_on_domain_and_key() {
    let sk = keypair(7);
    let a = epoch_tag(b"Zether", 42, sk.secret());
    assert_ne!(a, epoch_tag(b"Other", 42, sk.secret()));
    assert_ne!(a, epoch_tag(b"Zether", 42, keypair(8).secret()));
}

#[test]
fn epoch_generator_is_not_a_known_multiple_of_g() {
    let h = epoch_generator(b"Zether", 1);
    assert_ne!(h, G);
    assert_ne!(h, RistrettoPoint::identity());
}

// ---------- bundles ----------

#[test]
fn anonymity_set_rules() {
    assert_eq!(
        AnonymitySet::new(vec![account(1, 0, 1)]),
        Err(Error::InvalidInput("anonymity set needs at least two accounts"))
    );
    assert_eq!(
        AnonymitySet::new(vec![account(1, 0, 1), account(1, 5, 2)]),
        Err(Error::InvalidInput("duplicate public key in anonymity set"))
    );
    let set = AnonymitySet::new(vec![account(1, 0, 1), account(2, 0, 1)]).expect("set");
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.get(2).err(),
        Some(Error::IndexOutOfRange { index: 2, len: 2 })
    );
}

#[test]
fn bundle_constructor_validates_shape() {
    let good = sample_bundle();
    let set = good.anonymity_set().clone();
    let r = *good.randomizer();
    let u = *good.epoch_tag();
    assert_eq!(
        CommitmentBundle::new(3, set.clone(), vec![r], r, u, 0, 1),
        Err(Error::InvalidInput("one commitment per account required"))
    );
    assert_eq!(
        CommitmentBundle::new(3, set.clone(), good.commitments().to_vec(), r, u, 0, 2),
        Err(Error::IndexOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        CommitmentBundle::new(3, set, good.commitments().to_vec(), r, u, 1, 1),
        Err(Error::InvalidInput("sender and receiver must differ"))
    );
}

#[test]
fn bundle_apply_requires_matching_balances() {
    let bundle = sample_bundle();
    let mut balances = vec![Ciphertext::zero()];
    assert!(bundle.apply(&mut balances).is_err());
}

#[test]
fn burn_apply_debits_public_amount() {
    let acct = account(7, 90, 5);
    let bundle = BurnBundle::new(1, acct, 40, epoch_tag(b"Zether", 1, keypair(7).secret()));
    let mut balance = acct.balance;
    bundle.apply(&mut balance);
    assert_eq!(
        balance.decrypt_point(keypair(7).secret().as_scalar()),
        amount_point(50)
    );
}

#[test]
fn burn_bundle_exposes_fields_and_binds_them() {
    let acct = account(7, 90, 5);
    let tag = epoch_tag(b"Zether", 3, keypair(7).secret());
    let bundle = BurnBundle::new(3, acct, 40, tag);
    assert_eq!(bundle.epoch(), 3);
    assert_eq!(bundle.account(), &acct);
    assert_eq!(bundle.amount(), 40);
    assert_eq!(bundle.epoch_tag(), &tag);

    let d = bundle.statement_digest();
    assert_ne!(d, BurnBundle::new(3, acct, 41, tag).statement_digest());
    assert_ne!(d, BurnBundle::new(4, acct, 40, tag).statement_digest());
    let decoded = BurnBundle::from_wire(&bundle.to_wire()).expect("decode");
    assert_eq!(decoded.statement_digest(), d);
}

#[test]
fn statement_digest_binds_every_field() {
    let bundle = sample_bundle();
    let d = bundle.statement_digest();
    assert_eq!(d, sample_bundle().statement_digest());

    let set = bundle.anonymity_set().clone();
    let swapped = CommitmentBundle::new(
        bundle.epoch(),
        set,
        bundle.commitments().to_vec(),
        *bundle.randomizer(),
        *bundle.epoch_tag(),
        1,
        0,
    )
    .expect("swapped");
    assert_ne!(d, swapped.statement_digest());
}

// ---------- wire ----------

#[test]
fn commitment_bundle_wire_round_trip() {
    let bundle = sample_bundle();
    let bytes = bundle.to_wire();
    assert_eq!(bytes[0], WIRE_VERSION);
    assert_eq!(CommitmentBundle::from_wire(&bytes), Ok(bundle));
}

#[test]
fn wire_rejects_version_trailing_bytes_and_bad_points() {
    let bundle = sample_bundle();
    let bytes = bundle.to_wire();

    let mut wrong_version = bytes.clone();
    wrong_version[0] = 9;
    assert_eq!(
        CommitmentBundle::from_wire(&wrong_version),
        Err(Error::UnsupportedVersion(9))
    );

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
        CommitmentBundle::from_wire(&trailing),
        Err(Error::InvalidEncoding(_))
    ));

    let mut bad_point = bytes.clone();
    let at = find(&bytes, &point_to_bytes(bundle.randomizer()));
    bad_point[at..at + 32].copy_from_slice(&[0xff; 32]);
    assert_eq!(
        CommitmentBundle::from_wire(&bad_point),
        Err(Error::InvalidEncoding("not a valid ristretto point"))
    );

    assert_eq!(
        CommitmentBundle::from_wire(&[]),
        Err(Error::InvalidEncoding("empty payload"))
    );
}

#[test]
fn prover_request_wire_checks_digest() {
    let bundle = sample_bundle();
    let witness = TransferWitness {
        amount: 10,
        remainder: 90,
        randomness: Scalar::from(11u64),
        secret: keypair(7).secret().clone(),
    };
    let request = ProverRequest::transfer(bundle, witness);
    let bytes = request.to_wire();
    assert_eq!(ProverRequest::from_wire(&bytes), Ok(request.clone()));

    let mut tampered = bytes.clone();
    let at = find(&bytes, request.digest());
    tampered[at] ^= 1;
    assert_eq!(
        ProverRequest::from_wire(&tampered),
        Err(Error::InvalidEncoding("statement digest mismatch"))
    );
}

#[test]
fn burn_request_and_proof_result_round_trip() {
    let acct = account(7, 90, 5);
    let bundle = BurnBundle::new(12, acct, 40, epoch_tag(b"Zether", 12, keypair(7).secret()));
    let request = ProverRequest::burn(
        bundle.clone(),
        BurnWitness {
            remainder: 50,
            secret: keypair(7).secret().clone(),
        },
    );
    assert_eq!(ProverRequest::from_wire(&request.to_wire()), Ok(request));

    let result = BurnProof::new(bundle, vec![1, 2, 3]);
    assert_eq!(BurnProof::from_wire(&result.to_wire()), Ok(result));
}

#[test]
fn witnesses_do_not_leak_through_debug() {
    let w = BurnWitness {
        remainder: 12_345,
        secret: keypair(7).secret().clone(),
    };
    let s = format!("{w:?}");
    assert!(!s.contains("12345"));
}

// ---------- params ----------

#[test]
fn params_deserialize_with_defaults() {
    let p: Params = serde_json::from_str(r#"{"max_balance": 1000}"#).expect("params");
    assert_eq!(p.max_balance, 1000);
    assert_eq!(p.epoch_domain, DEFAULT_EPOCH_DOMAIN);
    assert!(serde_json::from_str::<Params>(r#"{"bogus": 1}"#).is_err());
    assert_eq!(Params::default().max_balance, u32::MAX as u64);
}
