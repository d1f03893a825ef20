//! Symbol module - String interning for identifier handling.
//!
//! A [`Symbol`] is a compact (4-byte) handle to an interned string. The
//! interpreter keys environment frames and resolver scopes by identifier,
//! and the same identifier appears many times in a typical program;
//! interning gives O(1) comparison and hashing and stores each unique
//! string once.
//!
//! Interned strings are heap-allocated with `'static` lifetime and never
//! freed. Total interner memory is bounded by the source text, which is
//! acceptable for a process that runs one script or one REPL session.
//!
//! # Examples
//!
//! ```
//! use loxi_util::Symbol;
//!
//! let a = Symbol::intern("counter");
//! let b = Symbol::intern("counter");
//! let c = Symbol::intern("n");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(a.as_str(), "counter");
//! ```

use std::fmt;
use std::sync::OnceLock;

use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use static_assertions::assert_eq_size;

/// A 4-byte handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

assert_eq_size!(Symbol, u32);

struct Interner {
    /// string -> id, lock-free for concurrent lookups.
    ids: DashMap<&'static str, u32, RandomState>,
    /// id -> string, append-only.
    strings: RwLock<Vec<&'static str>>,
}

static INTERNER: OnceLock<Interner> = OnceLock::new();

fn interner() -> &'static Interner {
    INTERNER.get_or_init(|| Interner {
        ids: DashMap::with_hasher(RandomState::new()),
        strings: RwLock::new(Vec::new()),
    })
}

impl Symbol {
    /// Intern a string, returning its stable handle.
    ///
    /// Interning the same text twice returns the same symbol.
    pub fn intern(text: &str) -> Symbol {
        let interner = interner();

        if let Some(id) = interner.ids.get(text) {
            return Symbol(*id);
        }

        let mut strings = interner.strings.write();
        // Re-check under the write lock: another thread may have interned
        // the same text between our lookup and acquiring the lock.
        if let Some(id) = interner.ids.get(text) {
            return Symbol(*id);
        }

        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let id = strings.len() as u32;
        strings.push(leaked);
        interner.ids.insert(leaked, id);
        Symbol(id)
    }

    /// The interned text.
    pub fn as_str(self) -> &'static str {
        interner().strings.read()[self.0 as usize]
    }

    /// Raw index of this symbol in the interner table.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}
