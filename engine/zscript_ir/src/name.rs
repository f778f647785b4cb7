//! Interned identifier and string-literal names.
//!
//! `Name` is a 4-byte index into an [`Interner`]. Comparing names is an
//! integer compare; the text is only materialized for diagnostics and
//! rendering. The interpreter is single-threaded by contract, so the
//! interner uses `RefCell` interior mutability rather than locking.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Interned string handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// The empty string, pre-interned at index 0.
    pub const EMPTY: Name = Name(0);

    /// Raw index, for dense side tables.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

struct InternerInner {
    map: FxHashMap<Rc<str>, u32>,
    strings: Vec<Rc<str>>,
}

/// String interner.
///
/// Strings are stored as `Rc<str>`, so [`Interner::lookup`] hands back a
/// cheap clone without borrowing the interner across calls.
pub struct Interner {
    inner: RefCell<InternerInner>,
}

impl Interner {
    /// Create an interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: Rc<str> = Rc::from("");
        let mut map = FxHashMap::default();
        map.insert(Rc::clone(&empty), 0);
        Interner {
            inner: RefCell::new(InternerInner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its stable handle.
    pub fn intern(&self, text: &str) -> Name {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.map.get(text) {
            return Name(idx);
        }
        let idx = u32::try_from(inner.strings.len()).unwrap_or_else(|_| {
            // 4 billion distinct identifiers in one script is not a real input.
            panic!("interner capacity exceeded")
        });
        let stored: Rc<str> = Rc::from(text);
        inner.map.insert(Rc::clone(&stored), idx);
        inner.strings.push(stored);
        Name(idx)
    }

    /// Resolve a handle back to its text.
    ///
    /// # Panics
    /// Panics if `name` was produced by a different interner.
    pub fn lookup(&self, name: Name) -> Rc<str> {
        let inner = self.inner.borrow();
        match inner.strings.get(name.0 as usize) {
            Some(s) => Rc::clone(s),
            None => panic!("name {:?} not found in interner", name),
        }
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.inner.borrow().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.len())
            .finish()
    }
}
