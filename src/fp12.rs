//! Degree-12 extension as a cubic over Fp4, with sparsity-aware
//! multiplication for Miller-loop line functions

use crate::big::{teq, Big, DBig};
use crate::fp2::Fp2;
use crate::fp4::Fp4;
use crate::rom;

/// Shape tag dispatching specialized multiplication routines.
///
/// Line functions evaluate to elements where only a few of the twelve
/// coefficients are populated; tracking the shape keeps the Miller loop
/// away from full 12x12 products.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sparsity {
    Zero,
    One,
    /// Coefficient a arbitrary, b restricted to its real Fp2 part, c zero.
    Sparser,
    /// Coefficients a and b arbitrary, c restricted to its real Fp2 part.
    Sparse,
    Dense,
}

/// An element a + b*w + c*w^2 of Fp12, w^3 = j.
#[derive(Clone, Copy, Debug)]
pub struct Fp12 {
    pub a: Fp4,
    pub b: Fp4,
    pub c: Fp4,
    pub stype: Sparsity,
}

impl Fp12 {
    pub fn new() -> Fp12 {
        Fp12 { a: Fp4::new(), b: Fp4::new(), c: Fp4::new(), stype: Sparsity::Zero }
    }

    pub fn one() -> Fp12 {
        Fp12 { a: Fp4::one(), b: Fp4::new(), c: Fp4::new(), stype: Sparsity::One }
    }

    pub fn from_fp4s(a: &Fp4, b: &Fp4, c: &Fp4) -> Fp12 {
        Fp12 { a: *a, b: *b, c: *c, stype: Sparsity::Dense }
    }

    /// A line-function element: full a-coefficient, real-only b.
    pub fn new_sparser(a: &Fp4, b: &Fp4) -> Fp12 {
        debug_assert!(b.is_real());
        Fp12 { a: *a, b: *b, c: Fp4::new(), stype: Sparsity::Sparser }
    }

    pub fn is_one(&self) -> bool {
        self.a.equals(&Fp4::one()) && self.b.is_zero() && self.c.is_zero()
    }

    pub fn equals(&self, o: &Fp12) -> bool {
        self.a.equals(&o.a) && self.b.equals(&o.b) && self.c.equals(&o.c)
    }

    pub fn reduce(&mut self) {
        self.a.reduce();
        self.b.reduce();
        self.c.reduce();
    }

    /// Unitary conjugate, the p^6 power; inverse on the cyclotomic subgroup.
    pub fn conj(&self) -> Fp12 {
        Fp12 { a: self.a.conj(), b: self.b.nconj(), c: self.c.conj(), stype: Sparsity::Dense }
    }

    /// Full Karatsuba-over-cubic product, six Fp4 multiplications.
    pub fn mul(&self, y: &Fp12) -> Fp12 {
        let z0 = self.a.mul(&y.a);
        let z2 = self.b.mul(&y.b);
        let z4 = self.c.mul(&y.c);
        let t1 = self.b.add(&self.c).mul(&y.b.add(&y.c)).sub(&z2).sub(&z4);
        let a = z0.add(&t1.times_i());
        let t2 = self.a.add(&self.b).mul(&y.a.add(&y.b)).sub(&z0).sub(&z2);
        let b = t2.add(&z4.times_i());
        let t3 = self.a.add(&self.c).mul(&y.a.add(&y.c)).sub(&z0).sub(&z4);
        let c = t3.add(&z2);
        Fp12 { a, b, c, stype: Sparsity::Dense }
    }

    /// Chung-Hasan SQR3 squaring.
    pub fn sqr(&self) -> Fp12 {
        let s0 = self.a.sqr();
        let s1 = self.a.mul(&self.b).dbl();
        let s2 = self.a.sub(&self.b).add(&self.c).sqr();
        let s3 = self.b.mul(&self.c).dbl();
        let s4 = self.c.sqr();
        let a = s0.add(&s3.times_i());
        let b = s1.add(&s4.times_i());
        let c = s1.add(&s2).add(&s3).sub(&s0).sub(&s4);
        Fp12 { a, b, c, stype: Sparsity::Dense }
    }

    /// Granger-Scott squaring, valid only on the cyclotomic subgroup
    /// (where the easy part of the final exponentiation lands).
    pub fn usqr(&self) -> Fp12 {
        let a2 = self.a.sqr();
        let na = a2.add(&a2.dbl()).add(&self.a.nconj().dbl());
        let b2 = self.c.sqr().times_i();
        let nb = b2.add(&b2.dbl()).add(&self.b.conj().dbl());
        let c2 = self.b.sqr();
        let nc = c2.add(&c2.dbl()).add(&self.c.nconj().dbl());
        Fp12 { a: na, b: nb, c: nc, stype: Sparsity::Dense }
    }

    /// Product of two line-function elements (both Sparser).
    pub fn smul(&self, y: &Fp12) -> Fp12 {
        debug_assert!(self.stype == Sparsity::Sparser && y.stype == Sparsity::Sparser);
        let ra = self.a.mul(&y.a);
        let rb = self.a.pmul(&y.b.a).add(&y.a.pmul(&self.b.a));
        let rc = Fp4::from_fp2(&self.b.a.mul(&y.b.a));
        Fp12 { a: ra, b: rb, c: rc, stype: Sparsity::Sparse }
    }

    /// General product dispatching on the sparsity of both operands.
    pub fn ssmul(&self, y: &Fp12) -> Fp12 {
        match (self.stype, y.stype) {
            (Sparsity::One, _) => *y,
            (_, Sparsity::One) => *self,
            (Sparsity::Sparser, Sparsity::Sparser) => self.smul(y),
            (_, Sparsity::Sparser) => self.mul_sparser(y),
            (Sparsity::Sparser, _) => y.mul_sparser(self),
            (_, Sparsity::Sparse) => self.mul_sparse(y),
            (Sparsity::Sparse, _) => y.mul_sparse(self),
            _ => self.mul(y),
        }
    }

    /// self (any shape) times a Sparser y: the zero c-coefficient and the
    /// real-only b-coefficient of y turn half the Fp4 products into scalar
    /// ones.
    fn mul_sparser(&self, y: &Fp12) -> Fp12 {
        let bs = &y.b.a;
        let ra = self.a.mul(&y.a).add(&self.c.pmul(bs).times_i());
        let rb = self.a.pmul(bs).add(&self.b.mul(&y.a));
        let rc = self.b.pmul(bs).add(&self.c.mul(&y.a));
        Fp12 { a: ra, b: rb, c: rc, stype: Sparsity::Dense }
    }

    /// self (any shape) times a Sparse y: real-only c-coefficient.
    fn mul_sparse(&self, y: &Fp12) -> Fp12 {
        let cs = &y.c.a;
        let ra = self
            .a
            .mul(&y.a)
            .add(&self.b.pmul(cs).add(&self.c.mul(&y.b)).times_i());
        let rb = self.a.mul(&y.b).add(&self.b.mul(&y.a)).add(&self.c.pmul(cs).times_i());
        let rc = self.a.pmul(cs).add(&self.c.mul(&y.a)).add(&self.b.mul(&y.b));
        Fp12 { a: ra, b: rb, c: rc, stype: Sparsity::Dense }
    }

    /// Inverse via the cubic-norm identity.
    pub fn inverse(&self) -> Fp12 {
        let ja = self.a.sqr().sub(&self.b.mul(&self.c).times_i());
        let jb = self.c.sqr().times_i().sub(&self.a.mul(&self.b));
        let jc = self.b.sqr().sub(&self.a.mul(&self.c));
        let n = self
            .a
            .mul(&ja)
            .add(&self.c.mul(&jb).add(&self.b.mul(&jc)).times_i());
        let ni = n.inverse();
        Fp12 { a: ja.mul(&ni), b: jb.mul(&ni), c: jc.mul(&ni), stype: Sparsity::Dense }
    }

    /// Frobenius p-power: f is the ROM constant (FRA, FRB).
    pub fn frob(&self, f: &Fp2) -> Fp12 {
        let f2 = f.sqr();
        let f3 = f2.mul(f);
        Fp12 {
            a: self.a.frob(&f3),
            b: self.b.frob(&f3).pmul(f),
            c: self.c.frob(&f3).pmul(&f2),
            stype: Sparsity::Dense,
        }
    }

    /// Trace onto Fp4; for cyclotomic elements this is 3 times the
    /// a-coefficient.
    pub fn trace(&self) -> Fp4 {
        let mut t = self.a.imul(3);
        t.reduce();
        t
    }

    /// Power of a unitary element by the 3e-e signed expansion. The
    /// exponent is public; conjugation stands in for inversion.
    pub fn pow(&self, e: &Big) -> Fp12 {
        let mut sf = *self;
        sf.reduce();
        let mut t = *e;
        t.norm();
        let mut e3 = t;
        e3.pmul(3);
        e3.norm();
        let nb = e3.nbits();
        if nb < 2 {
            return Fp12::one();
        }
        let sfc = sf.conj();
        let mut r = sf;
        for i in (1..nb - 1).rev() {
            r = r.usqr();
            let bt = e3.bit(i) - t.bit(i);
            if bt == 1 {
                r = r.mul(&sf);
            } else if bt == -1 {
                r = r.mul(&sfc);
            }
        }
        r.reduce();
        r
    }

    /// Constant-time simultaneous q0^u0 q1^u1 q2^u2 q3^u3 for unitary
    /// bases, by an 8-entry signed table and a sign-aligned recoding of
    /// the exponents against the (odd) pivot u0.
    pub fn pow4(q: &[Fp12; 4], u: &[Big; 4]) -> Fp12 {
        const CT: usize = 265;
        let mut t = [u[0], u[1], u[2], u[3]];
        for ti in t.iter_mut() {
            ti.norm();
        }
        let mut nb = 0;
        for ti in t.iter() {
            let n = ti.nbits();
            if n > nb {
                nb = n;
            }
        }
        nb += 1;
        debug_assert!(nb < CT);
        // force the pivot odd, remembering the fixup
        let pf = 1 - t[0].parity();
        t[0].inc(pf);
        t[0].norm();
        // sign digits of the pivot
        let mut s = [0i8; CT];
        for i in 0..nb - 1 {
            s[i] = (2 * t[0].bit(i + 1) - 1) as i8;
        }
        s[nb - 1] = 1;
        // align the other exponents to the pivot signs
        let mut w = [[0i8; CT]; 3];
        for j in 0..3 {
            let mut a = t[j + 1];
            for i in 0..nb {
                if a.parity() == 1 {
                    w[j][i] = 1;
                    a.dec(s[i] as isize);
                    a.norm();
                }
                a.fshr(1);
            }
            debug_assert!(a.is_zero());
        }
        // table g[k] = q0 * prod q_{j+1}^bit_j(k), all shape-normalized
        // so the constant-time selection moves between like elements
        let mut g = [Fp12::from_fp4s(&q[0].a, &q[0].b, &q[0].c); 8];
        g[1] = g[0].mul(&q[1]);
        g[2] = g[0].mul(&q[2]);
        g[3] = g[1].mul(&q[2]);
        g[4] = g[0].mul(&q[3]);
        g[5] = g[1].mul(&q[3]);
        g[6] = g[2].mul(&q[3]);
        g[7] = g[3].mul(&q[3]);
        let mut r = Fp12::one();
        for i in (0..nb).rev() {
            r = r.usqr();
            let k = (w[0][i] | (w[1][i] << 1) | (w[2][i] << 2)) as isize;
            let mut sel = g[0];
            for (m, gm) in g.iter().enumerate() {
                sel.cmove(gm, teq(k, m as isize));
            }
            let neg = sel.conj();
            sel.cmove(&neg, ((1 - s[i]) / 2) as isize);
            r = r.mul(&sel);
        }
        // undo the parity fixup
        let fix = r.mul(&q[0].conj());
        r.cmove(&fix, pf);
        r.reduce();
        r
    }

    /// Compressed exponentiation through Fp4 traces, used when the
    /// GT_STRONG profile is enabled. Returns tr(self^e).
    pub fn compow(&self, e: &Big, rr: &Big) -> Fp4 {
        let f = Fp2::from_bigs(&Big::from_limbs(&rom::FRA), &Big::from_limbs(&rom::FRB));
        let mut m = Big::from_limbs(&rom::MODULUS);
        m.rmod(rr);
        let mut a = *e;
        a.rmod(&m);
        let b = DBig::from_big(e).div(&m);
        let c = self.trace();
        if b.is_zero() {
            return c.xtr_pow(&a);
        }
        let gp = self.frob(&f);
        let cp = gp.trace();
        let gi = self.conj();
        let gpm1 = gp.mul(&gi);
        let cpm1 = gpm1.trace();
        let cpm2 = gpm1.mul(&gi).trace();
        c.xtr_pow2(&cp, &cpm1, &cpm2, &a, &b)
    }

    /// 384-byte encoding: the twelve Fp coefficients a.a.a .. c.b.b,
    /// each 32 bytes big-endian out of Montgomery form.
    pub fn to_bytes(&self, out: &mut [u8; 384]) {
        let coeffs = [&self.a, &self.b, &self.c];
        let mut off = 0;
        for f4 in coeffs {
            for f2 in [&f4.a, &f4.b] {
                for f in [&f2.a, &f2.b] {
                    let mut chunk = [0u8; 32];
                    f.redc().to_bytes(&mut chunk);
                    out[off..off + 32].copy_from_slice(&chunk);
                    off += 32;
                }
            }
        }
    }

    pub fn from_bytes(bytes: &[u8; 384]) -> Fp12 {
        let mut fs = [Big::new(); 12];
        for (i, f) in fs.iter_mut().enumerate() {
            *f = Big::from_bytes(&bytes[32 * i..32 * (i + 1)]);
        }
        let f4 = |k: usize| {
            Fp4::from_fp2s(
                &Fp2::from_bigs(&fs[k], &fs[k + 1]),
                &Fp2::from_bigs(&fs[k + 2], &fs[k + 3]),
            )
        };
        Fp12::from_fp4s(&f4(0), &f4(4), &f4(8))
    }

    /// Constant-time conditional move; both operands must carry the same
    /// shape tag.
    pub fn cmove(&mut self, o: &Fp12, d: isize) {
        debug_assert!(self.stype == o.stype);
        self.a.cmove(&o.a, d);
        self.b.cmove(&o.b, d);
        self.c.cmove(&o.c, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::Fp;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand_fp4(rng: &mut StdRng) -> Fp4 {
        let mut f = [Fp::new(); 4];
        for v in f.iter_mut() {
            let mut bytes = [0u8; 32];
            rng.fill(&mut bytes);
            bytes[0] &= 0x1f;
            *v = Fp::from_big(&Big::from_bytes(&bytes));
        }
        Fp4::from_fp2s(&Fp2::from_fps(&f[0], &f[1]), &Fp2::from_fps(&f[2], &f[3]))
    }

    fn rand_fp12(rng: &mut StdRng) -> Fp12 {
        Fp12::from_fp4s(&rand_fp4(rng), &rand_fp4(rng), &rand_fp4(rng))
    }

    /// Map into the cyclotomic subgroup via the easy part of the final
    /// exponentiation, so unitary-only operations become valid.
    fn rand_cyclotomic(rng: &mut StdRng) -> Fp12 {
        let m = rand_fp12(rng);
        let f = Fp2::from_bigs(&Big::from_limbs(&rom::FRA), &Big::from_limbs(&rom::FRB));
        let e1 = m.conj().mul(&m.inverse());
        e1.frob(&f).frob(&f).mul(&e1)
    }

    #[test]
    fn ring_laws() {
        let mut rng = StdRng::seed_from_u64(61);
        for _ in 0..10 {
            let a = rand_fp12(&mut rng);
            let b = rand_fp12(&mut rng);
            assert!(a.mul(&b).equals(&b.mul(&a)));
            assert!(a.sqr().equals(&a.mul(&a)));
            assert!(a.mul(&a.inverse()).is_one());
        }
    }

    #[test]
    fn sparse_products_match_full() {
        let mut rng = StdRng::seed_from_u64(62);
        for _ in 0..10 {
            let l1 = Fp12::new_sparser(&rand_fp4(&mut rng), &Fp4::from_fp2(&rand_fp4(&mut rng).a));
            let l2 = Fp12::new_sparser(&rand_fp4(&mut rng), &Fp4::from_fp2(&rand_fp4(&mut rng).a));
            let d = rand_fp12(&mut rng);
            let full = |x: &Fp12, y: &Fp12| {
                Fp12::from_fp4s(&x.a, &x.b, &x.c).mul(&Fp12::from_fp4s(&y.a, &y.b, &y.c))
            };
            assert!(l1.smul(&l2).equals(&full(&l1, &l2)));
            assert!(d.ssmul(&l1).equals(&full(&d, &l1)));
            let sp = l1.smul(&l2);
            assert!(d.ssmul(&sp).equals(&full(&d, &sp)));
            assert!(Fp12::one().ssmul(&l1).equals(&full(&Fp12::one(), &l1)));
        }
    }

    #[test]
    fn usqr_matches_sqr_on_cyclotomic() {
        let mut rng = StdRng::seed_from_u64(63);
        for _ in 0..5 {
            let g = rand_cyclotomic(&mut rng);
            assert!(g.usqr().equals(&g.sqr()));
            // conj is the inverse on the subgroup
            assert!(g.mul(&g.conj()).is_one());
        }
    }

    #[test]
    fn frob_is_multiplicative() {
        let mut rng = StdRng::seed_from_u64(64);
        let f = Fp2::from_bigs(&Big::from_limbs(&rom::FRA), &Big::from_limbs(&rom::FRB));
        let a = rand_fp12(&mut rng);
        let b = rand_fp12(&mut rng);
        assert!(a.mul(&b).frob(&f).equals(&a.frob(&f).mul(&b.frob(&f))));
    }

    #[test]
    fn pow_small_exponents() {
        let mut rng = StdRng::seed_from_u64(65);
        let g = rand_cyclotomic(&mut rng);
        let mut acc = g;
        for e in 2..20isize {
            acc = acc.mul(&g);
            assert!(g.pow(&Big::from_int(e)).equals(&acc));
        }
    }

    #[test]
    fn pow4_matches_separate_powers() {
        let mut rng = StdRng::seed_from_u64(66);
        let q = [
            rand_cyclotomic(&mut rng),
            rand_cyclotomic(&mut rng),
            rand_cyclotomic(&mut rng),
            rand_cyclotomic(&mut rng),
        ];
        let u = [
            Big::from_int(0x3_5b7f),
            Big::from_int(0x1_0000),
            Big::from_int(0),
            Big::from_int(0x7ee1),
        ];
        let want = q[0]
            .pow(&u[0])
            .mul(&q[1].pow(&u[1]))
            .mul(&q[2].pow(&u[2]))
            .mul(&q[3].pow(&u[3]));
        assert!(Fp12::pow4(&q, &u).equals(&want));
    }

    #[test]
    fn bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(67);
        let a = rand_fp12(&mut rng);
        let mut b = [0u8; 384];
        a.to_bytes(&mut b);
        let c = Fp12::from_bytes(&b);
        assert!(a.equals(&c));
        let mut b2 = [0u8; 384];
        c.to_bytes(&mut b2);
        assert_eq!(b[..], b2[..]);
    }
}
