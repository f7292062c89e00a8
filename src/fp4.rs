//! Quadratic extension Fp4 = Fp2(j), j^2 = 1 + i, with the XTR trace
//! operations used for compressed GT exponentiation

use crate::big::Big;
use crate::fp::Fp;
use crate::fp2::Fp2;

/// An element a + j*b of Fp4.
#[derive(Clone, Copy, Debug)]
pub struct Fp4 {
    pub a: Fp2,
    pub b: Fp2,
}

impl Fp4 {
    pub fn new() -> Fp4 {
        Fp4 { a: Fp2::new(), b: Fp2::new() }
    }

    pub fn from_fp2s(a: &Fp2, b: &Fp2) -> Fp4 {
        Fp4 { a: *a, b: *b }
    }

    pub fn from_fp2(a: &Fp2) -> Fp4 {
        Fp4 { a: *a, b: Fp2::new() }
    }

    pub fn from_int(a: isize) -> Fp4 {
        Fp4 { a: Fp2::from_int(a), b: Fp2::new() }
    }

    pub fn one() -> Fp4 {
        Fp4::from_int(1)
    }

    pub fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }

    /// True when the j-part is zero.
    pub fn is_real(&self) -> bool {
        self.b.is_zero()
    }

    pub fn equals(&self, o: &Fp4) -> bool {
        self.a.equals(&o.a) && self.b.equals(&o.b)
    }

    pub fn reduce(&mut self) {
        self.a.reduce();
        self.b.reduce();
    }

    pub fn add(&self, o: &Fp4) -> Fp4 {
        Fp4 { a: self.a.add(&o.a), b: self.b.add(&o.b) }
    }

    pub fn sub(&self, o: &Fp4) -> Fp4 {
        Fp4 { a: self.a.sub(&o.a), b: self.b.sub(&o.b) }
    }

    pub fn neg(&self) -> Fp4 {
        Fp4 { a: self.a.neg(), b: self.b.neg() }
    }

    pub fn dbl(&self) -> Fp4 {
        Fp4 { a: self.a.dbl(), b: self.b.dbl() }
    }

    /// Quadratic conjugate a - j*b, the p^2 power map.
    pub fn conj(&self) -> Fp4 {
        Fp4 { a: self.a, b: self.b.neg() }
    }

    /// -a + j*b.
    pub fn nconj(&self) -> Fp4 {
        Fp4 { a: self.a.neg(), b: self.b }
    }

    /// Karatsuba product, three Fp2 multiplications.
    pub fn mul(&self, o: &Fp4) -> Fp4 {
        let t1 = self.a.mul(&o.a);
        let t2 = self.b.mul(&o.b);
        let t3 = self.a.add(&self.b).mul(&o.a.add(&o.b));
        Fp4 { a: t1.add(&t2.mul_ip()), b: t3.sub(&t1).sub(&t2) }
    }

    pub fn sqr(&self) -> Fp4 {
        let t1 = self.a.add(&self.b);
        let t2 = self.a.add(&self.b.mul_ip());
        let t3 = self.a.mul(&self.b);
        let a = t1.mul(&t2).sub(&t3).sub(&t3.mul_ip());
        Fp4 { a, b: t3.dbl() }
    }

    /// Multiply by j.
    pub fn times_i(&self) -> Fp4 {
        Fp4 { a: self.b.mul_ip(), b: self.a }
    }

    /// Scale by an Fp2 element.
    pub fn pmul(&self, s: &Fp2) -> Fp4 {
        Fp4 { a: self.a.mul(s), b: self.b.mul(s) }
    }

    /// Scale by an Fp element.
    pub fn qmul(&self, s: &Fp) -> Fp4 {
        Fp4 { a: self.a.pmul(s), b: self.b.pmul(s) }
    }

    pub fn imul(&self, c: isize) -> Fp4 {
        Fp4 { a: self.a.imul(c), b: self.b.imul(c) }
    }

    pub fn inverse(&self) -> Fp4 {
        let n = self.a.sqr().sub(&self.b.sqr().mul_ip());
        let ni = n.inverse();
        Fp4 { a: self.a.mul(&ni), b: self.b.mul(&ni).neg() }
    }

    /// Frobenius: conjugate both coefficients and twist the j-part by f.
    pub fn frob(&self, f: &Fp2) -> Fp4 {
        Fp4 { a: self.a.conj(), b: self.b.conj().mul(f) }
    }

    /// XTR addition: given self = c_v, w = c_u, y = c_(u-v), z = c_(u-2v),
    /// returns c_(u+v) = c_u*c_v - conj(c_v)*c_(u-v) + c_(u-2v).
    pub fn xtr_a(&self, w: &Fp4, y: &Fp4, z: &Fp4) -> Fp4 {
        w.mul(self).sub(&self.conj().mul(y)).add(z)
    }

    /// XTR doubling: c_2u = c_u^2 - 2*conj(c_u).
    pub fn xtr_d(&self) -> Fp4 {
        self.sqr().sub(&self.conj().dbl())
    }

    /// Trace power ladder: given self = tr(g), returns tr(g^n).
    pub fn xtr_pow(&self, n: &Big) -> Fp4 {
        let three = Fp4::from_int(3);
        let mut e = *n;
        e.norm();
        let nb = e.nbits();
        if nb == 0 {
            return three;
        }
        // walk bits from below the top, keeping traces at k-1, k, k+1
        let mut cm1 = three;
        let mut c0 = *self;
        let mut cp1 = self.xtr_d();
        for i in (0..nb - 1).rev() {
            let c2km1 = cm1
                .mul(&c0)
                .sub(&c0.conj().mul(&self.conj()))
                .add(&cp1.conj());
            let c2k = c0.xtr_d();
            let c2kp1 = c0.xtr_a(&cp1, self, &cm1.conj());
            if e.bit(i) == 0 {
                cm1 = c2km1;
                c0 = c2k;
                cp1 = c2kp1;
            } else {
                let c2kp2 = cp1.xtr_d();
                cm1 = c2k;
                c0 = c2kp1;
                cp1 = c2kp2;
            }
        }
        let mut r = c0;
        r.reduce();
        r
    }

    /// Stam-Lenstra style double exponentiation on traces: given
    /// self = tr(g), ck = tr(g^p), ckml = tr(g^(p-1)), ckm2l = tr(g^(p-2)),
    /// returns tr(g^(a + b*p)). A GCD descent on the two exponents keeps
    /// the four running traces consistent until they merge.
    pub fn xtr_pow2(&self, ck: &Fp4, ckml: &Fp4, ckm2l: &Fp4, a: &Big, b: &Big) -> Fp4 {
        let mut e1 = *b; // coefficient of u = p
        let mut e2 = *a; // coefficient of v = 1
        e1.norm();
        e2.norm();
        if e1.is_zero() {
            return self.xtr_pow(&e2);
        }
        if e2.is_zero() {
            return ck.xtr_pow(&e1);
        }
        let mut cu = *ck;
        let mut cv = *self;
        let mut cumv = *ckml;
        let mut cum2v = *ckm2l;
        let mut f2 = 0usize;
        while e1.parity() == 0 && e2.parity() == 0 {
            e1.fshr(1);
            e2.fshr(1);
            f2 += 1;
        }
        while Big::comp(&e1, &e2) != 0 {
            if e1.parity() == 0 {
                // u <- 2u, halve its exponent
                e1.fshr(1);
                let c2umv = cumv.xtr_a(&cu, &cv, &cum2v.conj());
                cum2v = cumv.xtr_d();
                cu = cu.xtr_d();
                cumv = c2umv;
            } else if e2.parity() == 0 {
                // v <- 2v
                e2.fshr(1);
                let cuv = cv.xtr_a(&cu, &cumv, &cum2v);
                let cu2v = cv.xtr_a(&cuv, &cu, &cumv);
                let c2v = cv.xtr_d();
                let cum4v = c2v.conj().xtr_a(&cum2v, &cu, &cu2v);
                cv = c2v;
                cumv = cum2v;
                cum2v = cum4v;
            } else if Big::comp(&e1, &e2) > 0 {
                // u <- u + v, e1 -= e2
                e1.sub(&e2);
                e1.norm();
                let cuv = cv.xtr_a(&cu, &cumv, &cum2v);
                let cu2v = cv.xtr_a(&cuv, &cu, &cumv);
                cumv = cv.conj();
                cum2v = cu2v.conj();
                cv = cuv;
            } else {
                // v <- u + v, e2 -= e1
                e2.sub(&e1);
                e2.norm();
                let cuv = cv.xtr_a(&cu, &cumv, &cum2v);
                cum2v = cumv;
                cumv = cu;
                cu = cuv;
            }
        }
        let cuv = cv.xtr_a(&cu, &cumv, &cum2v);
        let mut r = cuv.xtr_pow(&e1);
        for _ in 0..f2 {
            r = r.xtr_d();
        }
        r.reduce();
        r
    }

    /// Constant-time conditional move gated by d in {0,1}.
    pub fn cmove(&mut self, o: &Fp4, d: isize) {
        self.a.cmove(&o.a, d);
        self.b.cmove(&o.b, d);
    }
}
