use indexmap::IndexSet;
use std::hash::{BuildHasher, Hasher};

use crate::error::{ListError, Result};

/// A hasher that only knows how to hash node addresses, simply returning
/// them as `u64`.
pub(crate) struct AddrHasher {
    hash: usize,
}

impl Hasher for AddrHasher {
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("only node addresses are hashed");
    }

    fn write_usize(&mut self, i: usize) {
        self.hash = i;
    }

    fn finish(&self) -> u64 {
        self.hash as u64
    }
}

#[derive(Clone, Default)]
pub(crate) struct BuildAddrHasher;

impl BuildHasher for BuildAddrHasher {
    type Hasher = AddrHasher;

    fn build_hasher(&self) -> Self::Hasher {
        AddrHasher { hash: 0 }
    }
}

/// One slot of the ring. `prev` and `next` are addresses into the same arena
/// and carry no ownership.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) data: Option<T>,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

impl<T> Node<T> {
    /// The sentinel. Its links are set by whoever interns it.
    pub(crate) fn root() -> Self {
        Self {
            data: None,
            prev: 0,
            next: 0,
        }
    }

    pub(crate) fn init(t: T, prev: usize, next: usize) -> Self {
        Self {
            data: Some(t),
            prev,
            next,
        }
    }
}

/// Node storage. Released slots are remembered in `available` and handed out
/// again before the backing vector grows.
#[derive(Clone)]
pub(crate) struct Mem<T> {
    data: Vec<T>,
    available: IndexSet<usize, BuildAddrHasher>,
}

impl<T> Default for Mem<T> {
    fn default() -> Self {
        Self::raw(Vec::new())
    }
}

impl<T> Mem<T> {
    pub(crate) fn raw(data: Vec<T>) -> Self {
        Self {
            data,
            available: IndexSet::with_hasher(BuildAddrHasher),
        }
    }

    pub(crate) fn with_capacity(n: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve(n).map_err(|_| ListError::Alloc)?;
        Ok(Mem::raw(data))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stores `t` and returns its address. Nothing else in the arena is
    /// touched, so a failure here leaves the ring exactly as it was.
    pub(crate) fn intern(&mut self, t: T) -> Result<usize> {
        if let Some(addr) = self.available.pop() {
            self.data[addr] = t;
            return Ok(addr);
        }
        self.data.try_reserve(1).map_err(|_| ListError::Alloc)?;
        let addr = self.data.len();
        self.data.push(t);
        Ok(addr)
    }

    #[inline]
    pub(crate) fn get(&self, addr: usize) -> &T {
        &self.data[addr]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, addr: usize) -> &mut T {
        &mut self.data[addr]
    }

    pub(crate) fn free(&mut self, addr: usize) {
        self.available.insert(addr);
    }

    /// Drops every slot past the first `n` and forgets the free set.
    pub(crate) fn truncate(&mut self, n: usize) {
        self.data.truncate(n);
        self.available.clear();
    }

    #[cfg(test)]
    pub(crate) fn num_free(&self) -> usize {
        self.available.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Mem;
    use crate::error::ListError;

    #[test]
    fn test_free_reuse() {
        let mut mem = Mem::with_capacity(2).unwrap();
        let a = mem.intern('a').unwrap();
        let b = mem.intern('b').unwrap();
        mem.free(a);
        assert_eq!(mem.intern('c').unwrap(), a);
        assert_eq!(*mem.get(a), 'c');
        assert_eq!(mem.intern('d').unwrap(), b + 1);
    }

    #[test]
    fn test_truncate() {
        let mut mem = Mem::with_capacity(4).unwrap();
        for c in "abcd".chars() {
            mem.intern(c).unwrap();
        }
        mem.free(3);
        mem.truncate(1);
        assert_eq!(mem.num_free(), 0);
        assert_eq!(mem.intern('x').unwrap(), 1);
    }

    #[test]
    fn test_alloc_failure() {
        assert_eq!(Mem::<u64>::with_capacity(usize::MAX).err(), Some(ListError::Alloc));
    }

    #[test]
    fn test_default_is_empty() {
        let mem = Mem::<u8>::default();
        assert!(mem.is_empty());
    }
}
