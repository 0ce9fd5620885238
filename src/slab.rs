use std::mem;
use std::ops::{Index, IndexMut};

#[cfg(test)]
use static_assertions::const_assert_eq;

/// An index into a slab, or "null"
///
/// This type is essentially `Option<usize>`. The value usize::MAX is
/// reserved to represent `None` or "null".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct Ptr(usize);

// Every node stores three of these, so keep them to a single word
#[cfg(test)]
const_assert_eq!(mem::size_of::<Ptr>(), mem::size_of::<usize>());
// Using `Option<usize>` directly would double that
#[cfg(test)]
const_assert_eq!(mem::size_of::<Option<usize>>(), 2 * mem::size_of::<usize>());

impl Default for Ptr {
    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl Ptr {
    #[inline(always)]
    pub fn new(index: usize) -> Option<Self> {
        if index == usize::MAX {
            None
        } else {
            Some(Ptr(index))
        }
    }

    #[inline(always)]
    pub fn null() -> Self {
        Ptr(usize::MAX)
    }

    // Methods on this type must be `#[inline]` to help the compiler see that the `Option` values
    // are only intermediate values used to make writing code easier. Instead of checking for `None`
    // and then `usize::MAX`, we want the compiler to just check the latter.
    #[inline(always)]
    pub fn into_index(self) -> Option<usize> {
        let Ptr(index) = self;
        if index == usize::MAX {
            None
        } else {
            Some(index)
        }
    }

    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.0 == usize::MAX
    }
}

/// A slot in the slab
#[derive(Debug, Clone)]
enum Entry<T> {
    Occupied(T),
    /// Part of the free list. `next` is the following free slot or `Ptr::null()` if this is the
    /// last entry in the free list.
    Vacant { next: Ptr },
}

/// An allocation primitive similar to `Vec`, but implemented to reuse space from removed entries.
///
/// Items are kept contiguously in memory, but indexes are not shifted when an individual item is
/// removed. Instead of always pushing items after the previously pushed item, this data structure
/// will reuse space from previously removed entries when possible. This makes removal cheaper than
/// a standard `Vec<T>` and, more importantly for the linked structures in this crate, it means a
/// `Ptr` keeps referring to the same value until that value is removed.
///
/// Cloning a slab reproduces the exact slot layout (including the free list), so every `Ptr` into
/// the original is also valid in the clone and refers to the cloned value.
#[derive(Debug, Clone)]
pub(crate) struct Slab<T> {
    entries: Vec<Entry<T>>,
    /// The index of the first entry in the free list or Ptr::null() if the free list is empty
    ///
    /// The free list is a linked list stored in `entries` that is used as a stack to track which
    /// entries have space that can be reused in calls to `push`.
    free_list_head: Ptr,
    /// The length of the free list
    free_len: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self {
            entries: Vec::default(),
            free_list_head: Ptr::null(),
            free_len: 0,
        }
    }
}

impl<T> Slab<T> {
    /// Creates an empty slab
    ///
    /// The slab is initially created with a capacity of 0, so it will not allocate until it is
    /// first inserted into.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty slab with the specified capacity.
    ///
    /// The slab will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the slab will not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the number of entries in the slab that contain values
    ///
    /// This is the number of items pushed minus the number of items removed
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_len
    }

    /// Returns true if the slab is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the slab can hold without reallocating.
    ///
    /// This number is a lower bound; the slab might be able to hold more, but is guaranteed to be
    /// able to hold at least this many.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The largest number of entries that could theoretically be allocated
    pub fn max_size(&self) -> usize {
        let entry_size = mem::size_of::<Entry<T>>().max(1);
        // `Vec` can never hold more than `isize::MAX` bytes and `usize::MAX` is the null `Ptr`
        (isize::MAX as usize / entry_size).min(usize::MAX - 1)
    }

    /// Returns a reference to the value at `ptr`, or `None` if the slot is null or vacant
    pub fn get(&self, ptr: Ptr) -> Option<&T> {
        match self.entries.get(ptr.into_index()?)? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Returns a mutable reference to the value at `ptr`, or `None` if the slot is null or vacant
    pub fn get_mut(&mut self, ptr: Ptr) -> Option<&mut T> {
        match self.entries.get_mut(ptr.into_index()?)? {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        }
    }

    /// Returns true if `ptr` refers to an entry that currently holds a value
    pub fn contains(&self, ptr: Ptr) -> bool {
        self.get(ptr).is_some()
    }

    /// Pushes a value into the slab and returns the index at which it was inserted.
    ///
    /// The item may be inserted at the end of the list, or in the space from an item was previously
    /// removed.
    pub fn push(&mut self, value: T) -> Ptr {
        // Check if we can reuse some space from the free list
        if let Some(free_list_head) = self.free_list_head.into_index() {
            let entry = &mut self.entries[free_list_head];
            let next_free = match *entry {
                Entry::Vacant {next} => next,
                Entry::Occupied(_) => unreachable!("bug: occupied entry on the free list"),
            };

            *entry = Entry::Occupied(value);
            self.free_list_head = next_free;
            self.free_len -= 1;

            return Ptr(free_list_head);
        }

        let index = self.entries.len();
        // Since `usize::MAX` is the null `Ptr`, it can never be a valid index into the slab
        if index >= usize::MAX - 1 {
            panic!("cannot have more than usize::MAX - 1 entries in slab");
        }

        self.entries.push(Entry::Occupied(value));

        Ptr(index)
    }

    /// Removes an item from the slab, returning its value, or `None` if the slot was null or
    /// already vacant.
    ///
    /// Note that this method has no effect on the allocated capacity of the slab.
    ///
    /// The space for the item will be reused in future calls to `push`. This does not move or
    /// modify any other entries in the slab. Their indexes remain the same and can still be used.
    pub fn remove(&mut self, ptr: Ptr) -> Option<T> {
        let index = ptr.into_index()?;
        let entry = self.entries.get_mut(index)?;
        if let Entry::Vacant {..} = entry {
            return None;
        }

        let prev = mem::replace(entry, Entry::Vacant {next: self.free_list_head});
        self.free_list_head = ptr;
        self.free_len += 1;

        match prev {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => unreachable!(),
        }
    }

    /// Clears the slab, removing all values.
    ///
    /// Note that this method has no effect on the allocated capacity of the slab.
    ///
    /// This invalidates all previous indexes returned from `push`.
    pub fn clear(&mut self) {
        // Clearing `entries` has the effect of marking every entry as free without affecting the
        // allocated capacity.
        self.entries.clear();
        // Need to clear the free list so we don't end up indexing out of bounds into `entries` now
        // that has been cleared
        self.free_list_head = Ptr::null();
        self.free_len = 0;
    }

    /// Reserves capacity for at least `additional` more elements to be inserted in the slab.
    ///
    /// Space on the free list counts towards the reservation.
    pub fn reserve(&mut self, additional: usize) {
        let needed = additional.saturating_sub(self.free_len);
        self.entries.reserve(needed)
    }

    /// Shrinks the capacity of the slab as much as possible.
    ///
    /// Trailing vacant slots are kept since they are threaded through the free list.
    pub fn shrink_to_fit(&mut self) {
        if self.is_empty() {
            self.clear();
        }
        self.entries.shrink_to_fit()
    }

    /// Returns an iterator over every slot in index order, yielding a mutable reference for each
    /// occupied slot and `None` for each vacant one
    pub fn slots_mut(&mut self) -> impl Iterator<Item=Option<&mut T>> {
        self.entries.iter_mut().map(|entry| match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant {..} => None,
        })
    }
}

impl<T> Index<Ptr> for Slab<T> {
    type Output = T;

    #[inline]
    fn index(&self, ptr: Ptr) -> &T {
        match self.get(ptr) {
            Some(value) => value,
            None => panic!("bug: dangling slab pointer {:?}", ptr),
        }
    }
}

impl<T> IndexMut<Ptr> for Slab<T> {
    #[inline]
    fn index_mut(&mut self, ptr: Ptr) -> &mut T {
        match self.get_mut(ptr) {
            Some(value) => value,
            None => panic!("bug: dangling slab pointer {:?}", ptr),
        }
    }
}
