//! Reference-counted string interning for allocation metadata.
//!
//! Source paths and class paths repeat across millions of tracked objects,
//! so each distinct string is stored once in a slot and records hold an
//! [`InternedStr`] handle to it.
//!
//! Handles are deliberately neither `Copy` nor `Clone`: every successful
//! [`StringPool::intern`] yields exactly one handle and [`StringPool::release`]
//! consumes it, so one record field can never give back more than it took.

use std::collections::HashMap;
use std::sync::Arc;

/// Generation counter for handle validation.
type Generation = u32;

/// A counted reference to a string stored in a [`StringPool`].
#[derive(Debug, PartialEq, Eq)]
pub struct InternedStr {
    index: u32,
    generation: Generation,
}

/// One pooled string and the number of live handles to it.
///
/// The buffer is shared with the content index, never copied.
struct Slot {
    content: Option<Arc<str>>,
    refcount: usize,
    generation: Generation,
}

/// Interning table keyed by string content.
///
/// A slot holds content if and only if its reference count is at least one.
pub struct StringPool {
    slots: Vec<Slot>,
    index: HashMap<Arc<str>, u32>,
    free_list: Vec<u32>,
    bytes: usize,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool sized for `capacity` distinct strings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            free_list: Vec::new(),
            bytes: 0,
        }
    }

    /// Intern `content`, bumping its count if it is already pooled.
    ///
    /// Empty strings are valid content. Callers with no value at all skip
    /// interning and store `None` instead.
    pub fn intern(&mut self, content: &str) -> InternedStr {
        if let Some(&index) = self.index.get(content) {
            let slot = &mut self.slots[index as usize];
            slot.refcount += 1;
            return InternedStr {
                index,
                generation: slot.generation,
            };
        }

        let owned: Arc<str> = Arc::from(content);
        self.bytes += owned.len();

        let index = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.content = Some(Arc::clone(&owned));
                slot.refcount = 1;
                slot.generation = slot.generation.wrapping_add(1);
                index
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    content: Some(Arc::clone(&owned)),
                    refcount: 1,
                    generation: 0,
                });
                index
            }
        };

        self.index.insert(owned, index);

        InternedStr {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Give back one reference. The string is freed when its count hits zero.
    ///
    /// Returns `false` if the handle does not belong to a live slot of this
    /// pool. Nothing is changed in that case.
    pub fn release(&mut self, handle: InternedStr) -> bool {
        let Some(slot) = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.refcount > 0)
        else {
            return false;
        };

        slot.refcount -= 1;
        if slot.refcount == 0 {
            if let Some(content) = slot.content.take() {
                self.bytes -= content.len();
                self.index.remove(&*content);
            }
            self.free_list.push(handle.index);
        }

        true
    }

    /// Resolve a handle to its content.
    ///
    /// Returns `None` for handles that do not belong to a live slot.
    pub fn get(&self, handle: &InternedStr) -> Option<&str> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.content.as_deref())
    }

    /// Current reference count for `content`, or 0 if it is not pooled.
    pub fn refcount(&self, content: &str) -> usize {
        self.index
            .get(content)
            .map(|&index| self.slots[index as usize].refcount)
            .unwrap_or(0)
    }

    /// Number of distinct strings currently pooled.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check whether the pool holds no strings.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes of string content currently pooled.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Free every pooled string regardless of reference counts.
    ///
    /// Only valid at session teardown, after which no handle from this pool
    /// may be released. Returns how many strings were freed.
    pub fn drain(&mut self) -> usize {
        let freed = self.index.len();
        self.index.clear();
        self.slots.clear();
        self.free_list.clear();
        self.bytes = 0;
        freed
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringPool")
            .field("strings", &self.len())
            .field("bytes", &self.bytes)
            .field("free_slots", &self.free_list.len())
            .finish()
    }
}
