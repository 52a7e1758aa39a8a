//! L0 — the domain-element factory.
//!
//! Every domain element is hash-consed: equal primitive inputs always
//! produce the same [`DomainElementRef`], compared and hashed by pointer
//! identity rather than by recursing into the value. Integers inside a
//! configurable fast window are stored in a flat `Vec` for O(1) lookup;
//! everything else lives in a hash map keyed on the canonicalized value.

use std::{
    cell::RefCell,
    cmp::Ordering,
    collections::HashMap,
    fmt, hash,
    rc::Rc,
};

use crate::ids::FunctionId;

#[derive(Debug)]
enum Repr {
    Int(i64),
    Real(f64),
    Str(String),
    Compound(FunctionId, Vec<DomainElementRef>),
}

/// A hash-consed domain element. Cloning is a reference-count bump;
/// equality and hashing are by identity, not by structural value.
#[derive(Clone, Debug)]
pub struct DomainElementRef(Rc<Repr>);

impl PartialEq for DomainElementRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DomainElementRef {}

impl hash::Hash for DomainElementRef {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state)
    }
}

fn variant_rank(repr: &Repr) -> u8 {
    match repr {
        Repr::Int(_) | Repr::Real(_) => 0,
        Repr::Str(_) => 1,
        Repr::Compound(..) => 2,
    }
}

impl PartialOrd for DomainElementRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Int < Real < Str < Compound, except that numerics (Int/Real) always
/// compare by numeric value regardless of which variant they are in.
impl Ord for DomainElementRef {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&*self.0, &*other.0) {
            (Repr::Int(a), Repr::Int(b)) => a.cmp(b),
            (Repr::Real(a), Repr::Real(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Repr::Int(a), Repr::Real(b)) => {
                (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Repr::Real(a), Repr::Int(b)) => {
                a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
            }
            (Repr::Str(a), Repr::Str(b)) => a.cmp(b),
            (Repr::Compound(fa, aa), Repr::Compound(fb, ab)) => {
                fa.cmp(fb).then_with(|| aa.cmp(ab))
            }
            (a, b) => variant_rank(a).cmp(&variant_rank(b)),
        }
    }
}

impl fmt::Display for DomainElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Repr::Int(n) => write!(f, "{n}"),
            Repr::Real(x) => write!(f, "{x}"),
            Repr::Str(s) => write!(f, "{s}"),
            Repr::Compound(func, args) => {
                write!(f, "{func}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl DomainElementRef {
    pub fn as_int(&self) -> Option<i64> {
        match &*self.0 {
            Repr::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match &*self.0 {
            Repr::Real(x) => Some(*x),
            Repr::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &*self.0 {
            Repr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<(FunctionId, &[DomainElementRef])> {
        match &*self.0 {
            Repr::Compound(f, args) => Some((*f, args)),
            _ => None,
        }
    }
}

/// Bit pattern used as a hash-map key for reals: `f64` is not `Eq`/`Hash`,
/// but the factory only ever stores values it produced, so canonical NaN
/// handling never comes up.
fn real_key(x: f64) -> u64 {
    x.to_bits()
}

/// Canonicalized, not-yet-interned element input.
#[derive(Clone, Debug)]
pub enum RawValue {
    Int(i64),
    Real(f64),
    Str(String),
}

#[derive(Default)]
pub struct ElementFactory {
    fast_lo: i64,
    fast_hi: i64,
    fast_ints: RefCell<Vec<Option<DomainElementRef>>>,
    ints: RefCell<HashMap<i64, DomainElementRef>>,
    reals: RefCell<HashMap<u64, DomainElementRef>>,
    strs: RefCell<HashMap<String, DomainElementRef>>,
    compounds: RefCell<HashMap<(FunctionId, Vec<DomainElementRef>), DomainElementRef>>,
}

impl ElementFactory {
    /// `[fast_lo, fast_hi)` is the contiguous window of integers indexed
    /// directly in an array rather than hashed.
    pub fn new(fast_lo: i64, fast_hi: i64) -> Self {
        let width = (fast_hi - fast_lo).max(0) as usize;
        Self {
            fast_lo,
            fast_hi,
            fast_ints: RefCell::new(vec![None; width]),
            ..Self::default()
        }
    }

    fn in_fast_window(&self, n: i64) -> Option<usize> {
        if n >= self.fast_lo && n < self.fast_hi {
            Some((n - self.fast_lo) as usize)
        } else {
            None
        }
    }

    /// O(1) in the fast window, O(log n) (amortized hash-map lookup)
    /// otherwise.
    pub fn create_int(&self, n: i64) -> DomainElementRef {
        if let Some(idx) = self.in_fast_window(n) {
            let mut table = self.fast_ints.borrow_mut();
            if let Some(existing) = &table[idx] {
                return existing.clone();
            }
            let elem = DomainElementRef(Rc::new(Repr::Int(n)));
            table[idx] = Some(elem.clone());
            return elem;
        }
        let mut table = self.ints.borrow_mut();
        table
            .entry(n)
            .or_insert_with(|| DomainElementRef(Rc::new(Repr::Int(n))))
            .clone()
    }

    /// Collapses to `Int` when `x` has no fractional part, unless the
    /// caller asserts the value is definitely not an integer
    /// (`certnotint`).
    pub fn create_real(&self, x: f64, certnotint: bool) -> DomainElementRef {
        if !certnotint && x.floor() == x && x.is_finite() {
            return self.create_int(x as i64);
        }
        let mut table = self.reals.borrow_mut();
        table
            .entry(real_key(x))
            .or_insert_with(|| DomainElementRef(Rc::new(Repr::Real(x))))
            .clone()
    }

    /// Collapses to `Real` (and possibly further to `Int`) when `s` parses
    /// as a number, unless the caller asserts the value is definitely not
    /// a number (`certnotreal`).
    pub fn create_str(&self, s: &str, certnotreal: bool) -> DomainElementRef {
        if !certnotreal {
            if let Ok(n) = s.parse::<i64>() {
                return self.create_int(n);
            }
            if let Ok(x) = s.parse::<f64>() {
                return self.create_real(x, false);
            }
        }
        let mut table = self.strs.borrow_mut();
        table
            .entry(s.to_string())
            .or_insert_with(|| DomainElementRef(Rc::new(Repr::Str(s.to_string()))))
            .clone()
    }

    fn create_raw(&self, raw: RawValue) -> DomainElementRef {
        match raw {
            RawValue::Int(n) => self.create_int(n),
            RawValue::Real(x) => self.create_real(x, false),
            RawValue::Str(s) => self.create_str(&s, false),
        }
    }

    /// Interns a compound element by `(function identity, argument
    /// identity sequence)`. Arguments must already be interned
    /// [`DomainElementRef`]s.
    pub fn create_compound(&self, f: FunctionId, args: Vec<DomainElementRef>) -> DomainElementRef {
        let mut table = self.compounds.borrow_mut();
        if let Some(existing) = table.get(&(f, args.clone())) {
            return existing.clone();
        }
        let elem = DomainElementRef(Rc::new(Repr::Compound(f, args.clone())));
        table.insert((f, args), elem.clone());
        elem
    }

    /// Canonicalizes raw argument values (int/real/string collapsing)
    /// before interning the compound.
    pub fn compound(&self, f: FunctionId, args: Vec<RawValue>) -> DomainElementRef {
        let interned = args.into_iter().map(|a| self.create_raw(a)).collect();
        self.create_compound(f, interned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_identity_stable() {
        let factory = ElementFactory::new(-10, 10);
        assert_eq!(factory.create_int(3), factory.create_int(3));
        assert_eq!(factory.create_int(1000), factory.create_int(1000));
        assert_eq!(
            factory.create_str("42", false),
            factory.create_int(42),
            "string-encoded integers collapse to Int"
        );
        assert_eq!(
            factory.create_real(2.0, false),
            factory.create_int(2),
            "int-valued reals collapse to Int"
        );
        assert_ne!(
            factory.create_real(2.0, true).as_real(),
            None,
            "certnotint suppresses collapsing"
        );
    }

    #[test]
    fn compounds_intern_by_identity_sequence() {
        let factory = ElementFactory::new(0, 4);
        let f = FunctionId(0);
        let a = factory.create_int(1);
        let b = factory.create_int(2);
        let c1 = factory.create_compound(f, vec![a.clone(), b.clone()]);
        let c2 = factory.create_compound(f, vec![a.clone(), b.clone()]);
        assert_eq!(c1, c2);

        let g = FunctionId(1);
        let c3 = factory.create_compound(g, vec![a, b]);
        assert_ne!(c1, c3, "different function identity must not collapse");
    }

    #[test]
    fn ordering_is_numeric_across_variants() {
        let factory = ElementFactory::new(0, 8);
        let one_int = factory.create_int(1);
        let two_real = factory.create_real(2.0, true);
        let three_str = factory.create_str("hello", true);
        assert!(one_int < two_real);
        assert!(two_real < three_str);

        let one_real_noncollapsed = factory.create_real(0.5, true);
        assert!(one_real_noncollapsed < one_int);
    }
}
