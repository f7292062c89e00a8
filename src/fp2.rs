//! Quadratic extension Fp2 = Fp(i), i^2 = -1

use crate::big::Big;
use crate::fp::Fp;

/// An element a + i*b of Fp2.
#[derive(Clone, Copy, Debug)]
pub struct Fp2 {
    pub a: Fp,
    pub b: Fp,
}

impl Fp2 {
    pub fn new() -> Fp2 {
        Fp2 { a: Fp::new(), b: Fp::new() }
    }

    pub fn from_fps(a: &Fp, b: &Fp) -> Fp2 {
        Fp2 { a: *a, b: *b }
    }

    pub fn from_bigs(a: &Big, b: &Big) -> Fp2 {
        Fp2 { a: Fp::from_big(a), b: Fp::from_big(b) }
    }

    pub fn from_fp(a: &Fp) -> Fp2 {
        Fp2 { a: *a, b: Fp::new() }
    }

    pub fn from_int(a: isize) -> Fp2 {
        Fp2 { a: Fp::from_int(a), b: Fp::new() }
    }

    pub fn one() -> Fp2 {
        Fp2::from_int(1)
    }

    pub fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.equals(&Fp2::one())
    }

    pub fn equals(&self, o: &Fp2) -> bool {
        self.a.equals(&o.a) && self.b.equals(&o.b)
    }

    pub fn reduce(&mut self) {
        self.a.reduce();
        self.b.reduce();
    }

    pub fn conj(&self) -> Fp2 {
        Fp2 { a: self.a, b: self.b.neg() }
    }

    pub fn neg(&self) -> Fp2 {
        Fp2 { a: self.a.neg(), b: self.b.neg() }
    }

    pub fn add(&self, o: &Fp2) -> Fp2 {
        Fp2 { a: self.a.add(&o.a), b: self.b.add(&o.b) }
    }

    pub fn sub(&self, o: &Fp2) -> Fp2 {
        self.add(&o.neg())
    }

    pub fn dbl(&self) -> Fp2 {
        Fp2 { a: self.a.dbl(), b: self.b.dbl() }
    }

    /// Scale by an Fp element.
    pub fn pmul(&self, s: &Fp) -> Fp2 {
        Fp2 { a: self.a.mul(s), b: self.b.mul(s) }
    }

    /// Scale by a small integer.
    pub fn imul(&self, c: isize) -> Fp2 {
        Fp2 { a: self.a.imul(c), b: self.b.imul(c) }
    }

    /// Karatsuba product: three base-field multiplications.
    pub fn mul(&self, o: &Fp2) -> Fp2 {
        let w1 = self.a.mul(&o.a);
        let w2 = self.b.mul(&o.b);
        let s1 = self.a.add(&self.b);
        let s2 = o.a.add(&o.b);
        let w5 = s1.mul(&s2);
        Fp2 { a: w1.sub(&w2), b: w5.sub(&w1).sub(&w2) }
    }

    /// (a + ib)^2 = (a+b)(a-b) + 2ab i.
    pub fn sqr(&self) -> Fp2 {
        let w1 = self.a.add(&self.b);
        let w3 = self.a.sub(&self.b);
        let w2 = self.a.dbl().mul(&self.b);
        Fp2 { a: w1.mul(&w3), b: w2 }
    }

    /// Multiply by i.
    pub fn times_i(&self) -> Fp2 {
        Fp2 { a: self.b.neg(), b: self.a }
    }

    /// Multiply by the quadratic non-residue 1 + i.
    pub fn mul_ip(&self) -> Fp2 {
        self.add(&self.times_i())
    }

    /// Divide by 1 + i.
    pub fn div_ip(&self) -> Fp2 {
        Fp2 { a: self.a.add(&self.b).half(), b: self.b.sub(&self.a).half() }
    }

    /// Divide by (1 + i)/2, i.e. multiply by 1 - i.
    pub fn div_ip2(&self) -> Fp2 {
        Fp2 { a: self.a.add(&self.b), b: self.b.sub(&self.a) }
    }

    pub fn inverse(&self) -> Fp2 {
        let n = self.a.sqr().add(&self.b.sqr());
        let ni = n.inverse();
        Fp2 { a: self.a.mul(&ni), b: self.b.mul(&ni).neg() }
    }

    /// Square root by the norm identity; None for a non-residue.
    pub fn sqrt(&self) -> Option<Fp2> {
        if self.is_zero() {
            return Some(Fp2::new());
        }
        let mut b = self.b;
        b.reduce();
        if b.is_zero() {
            // purely real: sqrt(a) or i*sqrt(-a)
            let mut a = self.a;
            a.reduce();
            if a.jacobi() == 1 {
                return Some(Fp2 { a: a.sqrt(), b: Fp::new() });
            }
            return Some(Fp2 { a: Fp::new(), b: a.neg().sqrt() });
        }
        let n = self.a.sqr().add(&self.b.sqr());
        if n.jacobi() != 1 {
            return None;
        }
        let s = n.sqrt();
        let mut w = self.a.add(&s).half();
        if w.jacobi() != 1 {
            w = self.a.sub(&s).half();
            if w.jacobi() != 1 {
                return None;
            }
        }
        let x = w.sqrt();
        let y = self.b.mul(&x.dbl().inverse());
        let r = Fp2 { a: x, b: y };
        debug_assert!(r.sqr().equals(self));
        Some(r)
    }

    /// Raise to a public exponent by square-and-multiply.
    pub fn pow(&self, e: &Big) -> Fp2 {
        let mut t = *e;
        t.norm();
        let nb = t.nbits();
        let mut r = Fp2::one();
        for i in (0..nb).rev() {
            r = r.sqr();
            if t.bit(i) == 1 {
                r = r.mul(self);
            }
        }
        r
    }

    /// Constant-time conditional move gated by d in {0,1}.
    pub fn cmove(&mut self, o: &Fp2, d: isize) {
        self.a.cmove(&o.a, d);
        self.b.cmove(&o.b, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand_fp2(rng: &mut StdRng) -> Fp2 {
        let mut ba = [0u8; 32];
        let mut bb = [0u8; 32];
        rng.fill(&mut ba);
        rng.fill(&mut bb);
        ba[0] &= 0x1f;
        bb[0] &= 0x1f;
        Fp2::from_bigs(&Big::from_bytes(&ba), &Big::from_bytes(&bb))
    }

    #[test]
    fn field_laws() {
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..40 {
            let a = rand_fp2(&mut rng);
            let b = rand_fp2(&mut rng);
            let c = rand_fp2(&mut rng);
            assert!(a.mul(&b).equals(&b.mul(&a)));
            assert!(a.add(&b).mul(&c).equals(&a.mul(&c).add(&b.mul(&c))));
            assert!(a.sqr().equals(&a.mul(&a)));
            assert!(a.mul(&a.inverse()).equals(&Fp2::one()));
        }
    }

    #[test]
    fn i_plumbing() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let a = rand_fp2(&mut rng);
            // i^2 = -1
            assert!(a.times_i().times_i().equals(&a.neg()));
            // (1+i) round trips
            assert!(a.mul_ip().div_ip().equals(&a));
            assert!(a.div_ip2().equals(&a.mul_ip().div_ip().div_ip().dbl()));
            // conj is the p-power map: conj(ab) = conj(a) conj(b)
            let b = rand_fp2(&mut rng);
            assert!(a.mul(&b).conj().equals(&a.conj().mul(&b.conj())));
        }
    }

    #[test]
    fn sqrt_round_trip() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut fails = 0;
        for _ in 0..25 {
            let a = rand_fp2(&mut rng);
            let s = a.sqr();
            let r = s.sqrt().expect("square must have a root");
            assert!(r.sqr().equals(&s));
            if a.sqrt().is_none() {
                fails += 1;
            }
        }
        // roughly half of random elements are non-residues
        assert!(fails > 0);
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let mut rng = StdRng::seed_from_u64(44);
        let a = rand_fp2(&mut rng);
        let mut acc = Fp2::one();
        for e in 0..24isize {
            assert!(a.pow(&Big::from_int(e)).equals(&acc));
            acc = acc.mul(&a);
        }
        // Fermat in the quadratic extension: a^(p^2) = a
        let p = Big::from_limbs(&crate::rom::MODULUS);
        assert!(a.pow(&p).pow(&p).equals(&a));
    }

    #[test]
    fn real_axis_sqrt() {
        // 2 is a non-residue in Fp but i*sqrt(-2) is a root in Fp2
        let two = Fp2::from_int(2);
        assert_eq!(two.a.jacobi(), -1);
        let r = two.sqrt().unwrap();
        assert!(r.sqr().equals(&two));
        assert!(r.a.is_zero());
    }
}
