//! Optimal Ate pairing: line functions, Miller loop, final exponentiation
//! and the GLV / Galbraith-Scott scalar multiplication strategies

use crate::big::Big;
use crate::ecp::Ecp;
use crate::ecp2::Ecp2;
use crate::fp::Fp;
use crate::fp12::Fp12;
use crate::fp2::Fp2;
use crate::fp4::Fp4;
use crate::rom;

/// The Frobenius constant (FRA, FRB) = (1+i)^((p-1)/6).
fn fb() -> Fp2 {
    Fp2::from_bigs(&Big::from_limbs(&rom::FRA), &Big::from_limbs(&rom::FRB))
}

/// Miller loop counts for the 6u+2 parameterization: n = |6x+2| (x is
/// negative for this curve) and n3 = 3n, whose bits drive the loop.
fn lbits() -> (Big, Big, usize) {
    let mut n = Big::from_limbs(&rom::CURVE_BNX);
    n.pmul(6);
    n.dec(2);
    n.norm();
    let mut n3 = n;
    n3.pmul(3);
    n3.norm();
    let nb = n3.nbits();
    (n, n3, nb)
}

/// Tangent line at a, evaluated at (qx, qy); a is replaced by 2a.
/// Produces a Sparser element (-2YZ qy, 3bZ^2 - Y^2) + (3X^2 qx) w.
fn linedbl(a: &mut Ecp2, qx: &Fp, qy: &Fp) -> Fp12 {
    let tb3 = Ecp2::twist_b().imul(3);
    let a0 = a.y.mul(&a.z).pmul(qy).imul(-2);
    let a1 = a.z.sqr().mul(&tb3).sub(&a.y.sqr());
    let b0 = a.x.sqr().pmul(qx).imul(3);
    let lv = Fp12::new_sparser(&Fp4::from_fp2s(&a0, &a1), &Fp4::from_fp2(&b0));
    *a = a.dbl();
    lv
}

/// Chord line through a and the affine point b, evaluated at (qx, qy);
/// a is replaced by a + b.
fn lineadd(a: &mut Ecp2, b: &Ecp2, qx: &Fp, qy: &Fp) -> Fp12 {
    let t1 = a.x.sub(&a.z.mul(&b.x));
    let t2 = a.y.sub(&a.z.mul(&b.y));
    let a0 = t1.pmul(qy);
    let a1 = t2.mul(&b.x).sub(&t1.mul(&b.y));
    let b0 = t2.pmul(qx).neg();
    let lv = Fp12::new_sparser(&Fp4::from_fp2s(&a0, &a1), &Fp4::from_fp2(&b0));
    *a = a.add(b);
    lv
}

/// Miller loop for a single pair: f_{6u+2, P}(Q), not yet in GT.
pub fn ate(p1: &Ecp2, q1: &Ecp) -> Fp12 {
    if p1.is_infinity() || q1.is_infinity() {
        return Fp12::one();
    }
    let mut p = *p1;
    p.affine();
    let mut q = *q1;
    q.affine();
    let (n, n3, nb) = lbits();
    let np = p.neg();
    let qx = q.x;
    let qy = q.y;
    let mut a = p;
    let mut r = Fp12::one();
    for i in (1..nb - 1).rev() {
        r = r.sqr();
        let mut lv = linedbl(&mut a, &qx, &qy);
        let bt = n3.bit(i) - n.bit(i);
        if bt == 1 {
            lv = lv.smul(&lineadd(&mut a, &p, &qx, &qy));
        } else if bt == -1 {
            lv = lv.smul(&lineadd(&mut a, &np, &qx, &qy));
        }
        r = r.ssmul(&lv);
    }
    // R-ate fixup: x < 0 conjugates the accumulator, then two Frobenius
    // lines complete the 6u+2 construction
    r = r.conj();
    a = a.neg();
    let f = fb();
    let k = p.frob(&f);
    let lv = lineadd(&mut a, &k, &qx, &qy);
    let k2 = k.frob(&f).neg();
    let lv2 = lineadd(&mut a, &k2, &qx, &qy);
    r.ssmul(&lv.smul(&lv2))
}

/// Interleaved Miller loop for two pairs, sharing the squaring chain.
pub fn ate2(p1: &Ecp2, q1: &Ecp, r1: &Ecp2, s1: &Ecp) -> Fp12 {
    if r1.is_infinity() || s1.is_infinity() {
        return ate(p1, q1);
    }
    if p1.is_infinity() || q1.is_infinity() {
        return ate(r1, s1);
    }
    let mut p = *p1;
    p.affine();
    let mut q = *q1;
    q.affine();
    let mut rr = *r1;
    rr.affine();
    let mut s = *s1;
    s.affine();
    let (n, n3, nb) = lbits();
    let np = p.neg();
    let nr = rr.neg();
    let mut a = p;
    let mut b = rr;
    let mut r = Fp12::one();
    for i in (1..nb - 1).rev() {
        r = r.sqr();
        let lv = linedbl(&mut a, &q.x, &q.y);
        let lv2 = linedbl(&mut b, &s.x, &s.y);
        r = r.ssmul(&lv.smul(&lv2));
        let bt = n3.bit(i) - n.bit(i);
        if bt == 1 {
            let la = lineadd(&mut a, &p, &q.x, &q.y);
            let lb = lineadd(&mut b, &rr, &s.x, &s.y);
            r = r.ssmul(&la.smul(&lb));
        } else if bt == -1 {
            let la = lineadd(&mut a, &np, &q.x, &q.y);
            let lb = lineadd(&mut b, &nr, &s.x, &s.y);
            r = r.ssmul(&la.smul(&lb));
        }
    }
    r = r.conj();
    a = a.neg();
    b = b.neg();
    let f = fb();
    let ka = p.frob(&f);
    let la = lineadd(&mut a, &ka, &q.x, &q.y);
    let ka2 = ka.frob(&f).neg();
    let la2 = lineadd(&mut a, &ka2, &q.x, &q.y);
    r = r.ssmul(&la.smul(&la2));
    let kb = rr.frob(&f);
    let lb = lineadd(&mut b, &kb, &s.x, &s.y);
    let kb2 = kb.frob(&f).neg();
    let lb2 = lineadd(&mut b, &kb2, &s.x, &s.y);
    r.ssmul(&lb.smul(&lb2))
}

/// Fresh per-bit accumulators for a multi-pairing.
pub fn initmp() -> Vec<Fp12> {
    vec![Fp12::one(); rom::ATE_BITS]
}

/// Fold another pair into the accumulators: the per-bit line products
/// are collected without squaring, which `miller` supplies once.
pub fn another(r: &mut [Fp12], p1: &Ecp2, q1: &Ecp) {
    if p1.is_infinity() || q1.is_infinity() {
        return;
    }
    let mut p = *p1;
    p.affine();
    let mut q = *q1;
    q.affine();
    let (n, n3, nb) = lbits();
    let np = p.neg();
    let mut a = p;
    for i in (1..nb - 1).rev() {
        let mut lv = linedbl(&mut a, &q.x, &q.y);
        let bt = n3.bit(i) - n.bit(i);
        if bt == 1 {
            lv = lv.smul(&lineadd(&mut a, &p, &q.x, &q.y));
        } else if bt == -1 {
            lv = lv.smul(&lineadd(&mut a, &np, &q.x, &q.y));
        }
        r[i] = r[i].ssmul(&lv);
    }
    a = a.neg();
    let f = fb();
    let k = p.frob(&f);
    let lv = lineadd(&mut a, &k, &q.x, &q.y);
    let k2 = k.frob(&f).neg();
    let lv2 = lineadd(&mut a, &k2, &q.x, &q.y);
    r[0] = r[0].ssmul(&lv.smul(&lv2));
}

/// Run the shared squaring sweep over accumulated line products.
pub fn miller(r: &mut [Fp12]) -> Fp12 {
    let mut res = Fp12::one();
    for i in (1..rom::ATE_BITS).rev() {
        res = res.sqr().ssmul(&r[i]);
        r[i] = Fp12::one();
    }
    res = res.conj();
    let out = res.ssmul(&r[0]);
    r[0] = Fp12::one();
    out
}

/// m^|x|, conjugated for the negative parameter sign; m must be unitary.
fn exp_by_x(m: &Fp12) -> Fp12 {
    let r = m.pow(&Big::from_limbs(&rom::CURVE_BNX));
    if rom::SIGN_OF_X_NEGATIVE {
        r.conj()
    } else {
        r
    }
}

/// Final exponentiation to the group of r-th roots of unity:
/// m^((p^12 - 1)/r).
pub fn fexp(m: &Fp12) -> Fp12 {
    let f = fb();
    // easy part: m^((p^6 - 1)(p^2 + 1))
    let e1 = m.conj().mul(&m.inverse());
    let x = e1.frob(&f).frob(&f).mul(&e1);
    // hard part: the y1..y7 vectorial addition chain for
    // m^((p^4 - p^2 + 1)/r) on BN curves
    let mx = exp_by_x(&x);
    let mxx = exp_by_x(&mx);
    let mxxx = exp_by_x(&mxx);
    let mp = x.frob(&f);
    let mpp = mp.frob(&f);
    let mppp = mpp.frob(&f);
    let y1 = mp.mul(&mpp).mul(&mppp);
    let y2 = x.conj();
    let y3 = mxx.frob(&f).frob(&f);
    let y4 = mx.frob(&f).conj();
    let y5 = mx.mul(&mxx.frob(&f)).conj();
    let y6 = mxx.conj();
    let y7 = mxxx.mul(&mxxx.frob(&f)).conj();
    let t1 = y7.usqr().mul(&y5).mul(&y6);
    let t2 = t1.mul(&y4).mul(&y6);
    let t3 = t1.mul(&y3);
    let t4 = t2.usqr().mul(&t3);
    let t5 = t4.usqr();
    let t6 = t5.mul(&y1);
    let t7 = t5.mul(&y2);
    let mut out = t7.usqr().mul(&t6);
    out.reduce();
    out
}

/// Single pairing e(P, Q) = fexp(ate(P, Q)); identity in either slot
/// maps to the unit of GT.
pub fn pairing(p: &Ecp2, q: &Ecp) -> Fp12 {
    if p.is_infinity() || q.is_infinity() {
        return Fp12::one();
    }
    fexp(&ate(p, q))
}

/// Product of pairings over point slices, one shared final
/// exponentiation; identity pairs are skipped.
pub fn pairing_batch(g2: &[Ecp2], g1: &[Ecp]) -> Fp12 {
    debug_assert_eq!(g2.len(), g1.len());
    let mut r = initmp();
    for (p, q) in g2.iter().zip(g1.iter()) {
        another(&mut r, p, q);
    }
    fexp(&miller(&mut r))
}

/// GLV split of e into two half-length sub-scalars mod the group order.
fn glv(e: &Big) -> [Big; 2] {
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    let mut t = *e;
    t.rmod(&q);
    let mut v = [Big::new(); 2];
    for (j, vj) in v.iter_mut().enumerate() {
        let w = Big::from_limbs(&rom::CURVE_W[j]);
        *vj = Big::mul(&w, &t).div(&q);
    }
    let mut u = [Big::new(); 2];
    for i in 0..2 {
        let mut acc = if i == 0 { t } else { Big::new() };
        for j in 0..2 {
            let sb = Big::from_limbs(&rom::CURVE_SB[j][i]);
            acc.add(&Big::modmul(&v[j], &sb, &q));
            acc.norm();
        }
        acc.rmod(&q);
        u[i] = acc;
    }
    u
}

/// Galbraith-Scott split of e into four quarter-length sub-scalars.
fn gs(e: &Big) -> [Big; 4] {
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    let mut t = *e;
    t.rmod(&q);
    let mut v = [Big::new(); 4];
    for (j, vj) in v.iter_mut().enumerate() {
        let w = Big::from_limbs(&rom::CURVE_WB[j]);
        *vj = Big::mul(&w, &t).div(&q);
    }
    let mut u = [Big::new(); 4];
    for i in 0..4 {
        let mut acc = if i == 0 { t } else { Big::new() };
        for j in 0..4 {
            let bb = Big::from_limbs(&rom::CURVE_BB[j][i]);
            acc.add(&Big::modmul(&v[j], &bb, &q));
            acc.norm();
        }
        acc.rmod(&q);
        u[i] = acc;
    }
    u
}

/// Replace u by min(u, r - u) in bit length, reporting whether the
/// negation (and so the base point) must be flipped.
fn neg_if_shorter(u: &mut Big, q: &Big) -> bool {
    let mut t = *u;
    t.modneg(q);
    if t.nbits() < u.nbits() {
        *u = t;
        return true;
    }
    false
}

/// Scalar multiplication in G1 through the GLV endomorphism
/// (x, y) -> (beta x, y).
pub fn g1mul(p: &Ecp, e: &Big) -> Ecp {
    if !rom::USE_GLV {
        return p.mul(e);
    }
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    let mut u = glv(e);
    let mut pp = *p;
    pp.affine();
    let cru = Fp::from_rom(&rom::CURVE_CRU);
    let mut qq = pp;
    qq.x = qq.x.mul(&cru);
    if neg_if_shorter(&mut u[0], &q) {
        pp = pp.neg();
    }
    if neg_if_shorter(&mut u[1], &q) {
        qq = qq.neg();
    }
    pp.mul2(&u[0], &qq, &u[1])
}

/// Scalar multiplication in G2 through four Frobenius images.
pub fn g2mul(p: &Ecp2, e: &Big) -> Ecp2 {
    if !rom::USE_GS_G2 {
        return p.mul(e);
    }
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    let f = fb();
    let mut u = gs(e);
    let mut qs = [*p; 4];
    qs[0].affine();
    for i in 1..4 {
        qs[i] = qs[i - 1].frob(&f);
    }
    for i in 0..4 {
        if neg_if_shorter(&mut u[i], &q) {
            qs[i] = qs[i].neg();
        }
    }
    Ecp2::mul4(&qs, &u)
}

/// Exponentiation in GT through four Frobenius conjugates; falls back
/// to the compressed-trace path only under the GT_STRONG profile.
pub fn gtpow(d: &Fp12, e: &Big) -> Fp12 {
    if !rom::USE_GS_GT {
        return d.pow(e);
    }
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    let f = fb();
    let mut u = gs(e);
    let mut g = [*d; 4];
    for i in 1..4 {
        g[i] = g[i - 1].frob(&f);
    }
    for i in 0..4 {
        if neg_if_shorter(&mut u[i], &q) {
            g[i] = g[i].conj();
        }
    }
    Fp12::pow4(&g, &u)
}

/// Compressed GT exponentiation returning only the Fp4 trace of d^e.
pub fn gtpow_compressed(d: &Fp12, e: &Big) -> Fp4 {
    let q = Big::from_limbs(&rom::CURVE_ORDER);
    d.compow(e, &q)
}

/// Membership test for GT: unitary and of order r.
pub fn gtmember(d: &Fp12) -> bool {
    if d.mul(&d.conj()).is_one() {
        gtpow(d, &Big::from_limbs(&rom::CURVE_ORDER)).is_one()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand_scalar(rng: &mut StdRng) -> Big {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let mut b = Big::from_bytes(&bytes);
        b.rmod(&Big::from_limbs(&rom::CURVE_ORDER));
        b
    }

    #[test]
    fn pairing_is_nondegenerate_and_in_gt() {
        let e1 = pairing(&Ecp2::generator(), &Ecp::generator());
        assert!(!e1.is_one());
        assert!(gtmember(&e1));
    }

    #[test]
    fn known_pairing_value() {
        let e1 = pairing(&Ecp2::generator(), &Ecp::generator());
        let mut got = [0u8; 384];
        e1.to_bytes(&mut got);
        let want = include_str!("../tests/vectors/e1.hex").trim();
        let mut exp = [0u8; 384];
        for (i, b) in exp.iter_mut().enumerate() {
            *b = u8::from_str_radix(&want[2 * i..2 * i + 2], 16).unwrap();
        }
        assert_eq!(got[..], exp[..]);
    }

    #[test]
    fn small_scalar_bilinearity() {
        let p = Ecp2::generator();
        let q = Ecp::generator();
        let e1 = pairing(&p, &q);
        let p3 = g2mul(&p, &Big::from_int(3));
        let q5 = g1mul(&q, &Big::from_int(5));
        let lhs = pairing(&p3, &q5);
        let rhs = gtpow(&e1, &Big::from_int(15));
        assert!(lhs.equals(&rhs));
    }

    #[test]
    fn decomposed_muls_match_plain_ladders() {
        let mut rng = StdRng::seed_from_u64(91);
        let g = Ecp::generator();
        let g2 = Ecp2::generator();
        for _ in 0..3 {
            let e = rand_scalar(&mut rng);
            assert!(g1mul(&g, &e).equals(&g.mul(&e)));
            assert!(g2mul(&g2, &e).equals(&g2.mul(&e)));
        }
        // order and zero edge cases
        let q = Big::from_limbs(&rom::CURVE_ORDER);
        assert!(g1mul(&g, &q).is_infinity());
        assert!(g2mul(&g2, &q).is_infinity());
        assert!(g1mul(&g, &Big::new()).is_infinity());
    }
}
