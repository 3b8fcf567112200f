
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Number of significant decimal digits used for the cumulative binomial
/// computation. Probabilities can legitimately underflow f64 for large
/// trial counts, so the whole computation stays in decimal arithmetic.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct MathContext {
    pub precision: u64,
}

impl MathContext {
    pub fn new(precision: u64) -> MathContext {
        MathContext { precision: precision.max(1) }
    }
}

impl Default for MathContext {
    fn default() -> MathContext {
        MathContext { precision: 50 }
    }
}

/// P(X >= k) for X ~ Binomial(n, p), evaluated at the context precision.
/// `p` is taken as an exact decimal (e.g. BigDecimal::new(d.into(), 2)
/// for d percent).
pub fn cumulative_tail_probability(n: u64, k: u64, p: &BigDecimal, ctx: MathContext) -> BigDecimal {
    if k == 0 {
        return BigDecimal::one();
    }
    if k > n {
        return BigDecimal::zero();
    }
    if p >= &BigDecimal::one() {
        return BigDecimal::one();
    }
    if p <= &BigDecimal::zero() {
        return BigDecimal::zero();
    }

    let prec = ctx.precision;
    let q = BigDecimal::one() - p;

    // first term: C(n, k) p^k q^(n-k), then walk the upper tail with the
    // term ratio (n-j+1)/j * p/q
    let coeff = binomial_coefficient(n, k);
    let mut term = (BigDecimal::from(coeff) * decimal_pow(p, k, prec) * decimal_pow(&q, n - k, prec))
        .with_prec(prec);
    let mut sum = term.clone();

    let p_over_q = (p / &q).with_prec(prec);

    let mut j = k;
    while j < n {
        j += 1;
        let ratio = (BigDecimal::from(n - j + 1) / BigDecimal::from(j)).with_prec(prec);
        term = (term * ratio * &p_over_q).with_prec(prec);
        sum += &term;
    }

    let sum = sum.with_prec(prec);
    // term-wise rounding can push the tail marginally above one
    if sum > BigDecimal::one() {
        BigDecimal::one()
    } else {
        sum
    }
}

/// The A-score scale: -10*log10(p). A probability of exactly zero maps to
/// the maximum representable score instead of infinity.
pub fn minus_ten_log10(p: &BigDecimal) -> f64 {
    if p.is_zero() {
        return f64::MAX;
    }

    // value = mantissa * 10^(-scale); log10 of the mantissa is taken from
    // its leading digits, the rest contributes the digit count
    let (mantissa, scale) = p.as_bigint_and_exponent();
    let digits = mantissa.to_string();
    let n_digits = digits.len();
    let n_lead = n_digits.min(15);
    let lead: f64 = digits[..n_lead].parse().unwrap(); // safe: mantissa renders as ASCII digits
    let log10_mantissa = lead.log10() + (n_digits - n_lead) as f64;

    -10.0 * (log10_mantissa - scale as f64)
}

fn binomial_coefficient(n: u64, k: u64) -> BigInt {
    let k = k.min(n - k);
    let mut coeff = BigInt::one();
    for i in 0..k {
        coeff = coeff * BigInt::from(n - i) / BigInt::from(i + 1);
    }
    coeff
}

fn decimal_pow(base: &BigDecimal, mut exp: u64, prec: u64) -> BigDecimal {
    let mut result = BigDecimal::one();
    let mut acc = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result * &acc).with_prec(prec);
        }
        exp >>= 1;
        if exp > 0 {
            acc = (&acc * &acc).with_prec(prec);
        }
    }
    result
}
