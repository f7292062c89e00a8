//! End-to-end pairing scenarios: bilinearity, group interoperation and
//! known-answer vectors generated from an independent implementation.

use bn254_pairing::big::Big;
use bn254_pairing::ecp::Ecp;
use bn254_pairing::ecp2::Ecp2;
use bn254_pairing::fp12::Fp12;
use bn254_pairing::{pair, rom};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn order() -> Big {
    Big::from_limbs(&rom::CURVE_ORDER)
}

fn rand_scalar(rng: &mut StdRng) -> Big {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    let mut b = Big::from_bytes(&bytes);
    b.rmod(&order());
    b
}

fn fp12_from_hex(hex: &str) -> Fp12 {
    let hex = hex.trim();
    let mut bytes = [0u8; 384];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).unwrap();
    }
    Fp12::from_bytes(&bytes)
}

#[test]
fn scenario_scalar_shifting_across_slots() {
    // e(7P, Q) = e(P, 7Q) = e(P, Q)^7, against the recorded vector
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let e1 = pair::pairing(&p, &q);
    let seven = Big::from_int(7);
    let lhs = pair::pairing(&pair::g2mul(&p, &seven), &q);
    let mid = pair::pairing(&p, &pair::g1mul(&q, &seven));
    let rhs = pair::gtpow(&e1, &seven);
    assert!(lhs.equals(&mid));
    assert!(mid.equals(&rhs));
    let want = fp12_from_hex(include_str!("vectors/gt7.hex"));
    assert!(rhs.equals(&want));
}

#[test]
fn scenario_three_times_five() {
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let e1 = pair::pairing(&p, &q);
    let lhs = pair::pairing(
        &pair::g2mul(&p, &Big::from_int(3)),
        &pair::g1mul(&q, &Big::from_int(5)),
    );
    assert!(lhs.equals(&pair::gtpow(&e1, &Big::from_int(15))));
    assert!(lhs.equals(&fp12_from_hex(include_str!("vectors/e_3_5.hex"))));
}

#[test]
fn bilinearity_with_random_scalars() {
    let mut rng = StdRng::seed_from_u64(101);
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let e1 = pair::pairing(&p, &q);
    for _ in 0..2 {
        let a = rand_scalar(&mut rng);
        let b = rand_scalar(&mut rng);
        let ab = Big::modmul(&a, &b, &order());
        let lhs = pair::pairing(&pair::g2mul(&p, &a), &pair::g1mul(&q, &b));
        let swapped = pair::pairing(&pair::g2mul(&p, &b), &pair::g1mul(&q, &a));
        let rhs = pair::gtpow(&e1, &ab);
        assert!(lhs.equals(&rhs));
        assert!(swapped.equals(&rhs));
    }
}

#[test]
fn pairing_is_additive_in_the_first_slot() {
    let mut rng = StdRng::seed_from_u64(102);
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let p2 = pair::g2mul(&p, &rand_scalar(&mut rng));
    let sum = pair::pairing(&p.add(&p2), &q);
    let prod = pair::pairing(&p, &q).mul(&pair::pairing(&p2, &q));
    assert!(sum.equals(&prod));
}

#[test]
fn nondegenerate_and_fixed_order() {
    let e1 = pair::pairing(&Ecp2::generator(), &Ecp::generator());
    assert!(!e1.is_one());
    // fexp output lands in the order-r subgroup
    assert!(pair::gtpow(&e1, &order()).is_one());
    assert!(pair::gtmember(&e1));
}

#[test]
fn identity_slots_give_unity() {
    let p = Ecp2::generator();
    let q = Ecp::generator();
    assert!(pair::pairing(&Ecp2::new(), &q).is_one());
    assert!(pair::pairing(&p, &Ecp::new()).is_one());
}

#[test]
fn double_pairing_matches_square() {
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let single = pair::fexp(&pair::ate(&p, &q));
    let twice = pair::fexp(&pair::ate2(&p, &q, &p, &q));
    assert!(twice.equals(&single.usqr()));
    // and infinity in the second pair degrades to the single pairing
    let one = pair::fexp(&pair::ate2(&p, &q, &Ecp2::new(), &Ecp::new()));
    assert!(one.equals(&single));
}

#[test]
fn multi_pairing_matches_product_of_singles() {
    let mut rng = StdRng::seed_from_u64(103);
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let a = rand_scalar(&mut rng);
    let b = rand_scalar(&mut rng);
    let pa = pair::g2mul(&p, &a);
    let qb = pair::g1mul(&q, &b);
    // a single accumulated pair reproduces the plain Miller loop
    let mut acc = pair::initmp();
    pair::another(&mut acc, &p, &q);
    let single = pair::miller(&mut acc);
    assert!(single.equals(&pair::ate(&p, &q)));
    // shared-squaring accumulation of two pairs
    pair::another(&mut acc, &p, &q);
    pair::another(&mut acc, &pa, &qb);
    let multi = pair::fexp(&pair::miller(&mut acc));
    let singles = pair::fexp(&pair::ate(&p, &q)).mul(&pair::fexp(&pair::ate(&pa, &qb)));
    assert!(multi.equals(&singles));
    // the batch helper agrees and skips identity pairs
    let batch = pair::pairing_batch(&[p, Ecp2::new(), pa], &[q, Ecp::new(), qb]);
    assert!(batch.equals(&singles));
}

#[test]
fn ate2_mixed_pairs_match() {
    let mut rng = StdRng::seed_from_u64(104);
    let p = Ecp2::generator();
    let q = Ecp::generator();
    let p2 = pair::g2mul(&p, &rand_scalar(&mut rng));
    let q2 = pair::g1mul(&q, &rand_scalar(&mut rng));
    let joint = pair::fexp(&pair::ate2(&p, &q, &p2, &q2));
    let split = pair::fexp(&pair::ate(&p, &q)).mul(&pair::fexp(&pair::ate(&p2, &q2)));
    assert!(joint.equals(&split));
}

#[test]
fn compressed_exponentiation_matches_trace() {
    let mut rng = StdRng::seed_from_u64(105);
    let e1 = pair::pairing(&Ecp2::generator(), &Ecp::generator());
    for _ in 0..2 {
        let e = rand_scalar(&mut rng);
        let full = pair::gtpow(&e1, &e).trace();
        let compressed = pair::gtpow_compressed(&e1, &e);
        assert!(full.equals(&compressed));
    }
}

#[test]
fn known_scalar_multiples() {
    // 7*G1 against the recorded affine coordinates
    let g = pair::g1mul(&Ecp::generator(), &Big::from_int(7));
    let mut buf = [0u8; 65];
    g.to_bytes(&mut buf, false);
    let want = include_str!("vectors/g1_7.hex").trim();
    let mut exp = [0u8; 64];
    for (i, b) in exp.iter_mut().enumerate() {
        *b = u8::from_str_radix(&want[2 * i..2 * i + 2], 16).unwrap();
    }
    assert_eq!(buf[1..], exp[..]);
    // 7*G2 likewise
    let g2 = pair::g2mul(&Ecp2::generator(), &Big::from_int(7));
    let mut buf2 = [0u8; 128];
    g2.to_bytes(&mut buf2);
    let want2 = include_str!("vectors/g2_7.hex").trim();
    let mut exp2 = [0u8; 128];
    for (i, b) in exp2.iter_mut().enumerate() {
        *b = u8::from_str_radix(&want2[2 * i..2 * i + 2], 16).unwrap();
    }
    assert_eq!(buf2[..], exp2[..]);
}

#[test]
fn generators_have_prime_order() {
    assert!(pair::g1mul(&Ecp::generator(), &order()).is_infinity());
    assert!(pair::g2mul(&Ecp2::generator(), &order()).is_infinity());
}
