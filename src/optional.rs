use core::mem::MaybeUninit;
use crate::error::*;


/// Zero or one `T`, stored inline.
///
/// `engaged` is the only record of whether `storage` holds a live `T`.
/// Every transition between the two states constructs or drops the payload
/// explicitly.
pub struct Optional<T> {
    storage: MaybeUninit<T>,
    engaged: bool,
}

impl<T> Optional<T> {
    pub const NONE: Optional<T> = Optional::new();

    #[inline(always)]
    pub const fn new() -> Self {
        Optional { storage: MaybeUninit::uninit(), engaged: false }
    }

    #[inline(always)]
    pub const fn some(value: T) -> Self {
        Optional { storage: MaybeUninit::new(value), engaged: true }
    }


    #[inline(always)]
    pub fn has_value(&self) -> bool {
        self.engaged
    }

    #[inline]
    pub fn value(&self) -> OptionalResult<&T> {
        if !self.engaged {
            return Err(BadOptionalAccess);
        }
        Ok(unsafe { self.storage.assume_init_ref() })
    }

    #[inline]
    pub fn value_mut(&mut self) -> OptionalResult<&mut T> {
        if !self.engaged {
            return Err(BadOptionalAccess);
        }
        Ok(unsafe { self.storage.assume_init_mut() })
    }

    /// # Safety
    /// `self` must be engaged. Only debug builds check.
    #[inline(always)]
    pub unsafe fn value_unchecked(&self) -> &T {
        debug_assert!(self.engaged);
        self.storage.assume_init_ref()
    }

    /// # Safety
    /// `self` must be engaged. Only debug builds check.
    #[inline(always)]
    pub unsafe fn value_unchecked_mut(&mut self) -> &mut T {
        debug_assert!(self.engaged);
        self.storage.assume_init_mut()
    }

    /// Pointer to the storage, engaged or not.
    /// Reading through it is only valid while `has_value()`.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    #[inline(always)]
    pub fn as_ref(&self) -> Option<&T> {
        self.value().ok()
    }

    #[inline(always)]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.value_mut().ok()
    }


    /// Assigns into the live value if engaged, otherwise constructs one.
    pub fn set(&mut self, value: T) -> &mut T {
        if self.engaged {
            let slot = unsafe { self.storage.assume_init_mut() };
            *slot = value;
            slot
        }
        else {
            let slot = self.storage.write(value);
            self.engaged = true;
            slot
        }
    }

    #[inline]
    pub fn emplace(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Drops the current value (if any), then constructs a new one from `f`.
    ///
    /// The flag is raised only once `f` returns, so a panic in `f` leaves
    /// the container disengaged.
    pub fn emplace_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        self.reset();
        let slot = self.storage.write(f());
        self.engaged = true;
        slot
    }

    /// Like `emplace_with`, for constructors that can fail.
    /// On `Err` the container is left disengaged.
    pub fn try_emplace_with<E, F: FnOnce() -> Result<T, E>>(&mut self, f: F) -> Result<&mut T, E> {
        self.reset();
        let value = f()?;
        let slot = self.storage.write(value);
        self.engaged = true;
        Ok(slot)
    }

    pub fn reset(&mut self) {
        if self.engaged {
            // cleared first: a panicking destructor must not run twice.
            self.engaged = false;
            unsafe { self.storage.assume_init_drop() };
        }
    }


    /// Moves the value out, leaving `self` disengaged.
    pub fn take_value(&mut self) -> OptionalResult<T> {
        if !self.engaged {
            return Err(BadOptionalAccess);
        }
        self.engaged = false;
        Ok(unsafe { self.storage.assume_init_read() })
    }

    #[inline]
    pub fn into_value(mut self) -> OptionalResult<T> {
        self.take_value()
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.into_value().ok()
    }

    /// Moves the whole container out. `self` is left disengaged.
    #[inline]
    pub fn take(&mut self) -> Optional<T> {
        core::mem::replace(self, Optional::new())
    }

    /// Move-assignment: transfers `other`'s state into `self`.
    /// `other` is always disengaged afterwards.
    pub fn move_from(&mut self, other: &mut Optional<T>) {
        match other.take_value() {
            Ok(value) => { self.set(value); }
            Err(_)    => self.reset(),
        }
    }
}


impl<T> Drop for Optional<T> {
    #[inline]
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for Optional<T> {
    #[inline(always)]
    fn default() -> Self {
        Optional::new()
    }
}

impl<T: Clone> Clone for Optional<T> {
    fn clone(&self) -> Self {
        match self.value() {
            Ok(value) => Optional::some(value.clone()),
            Err(_)    => Optional::new(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match (self.engaged, source.engaged) {
            (true, true) => unsafe {
                self.storage.assume_init_mut().clone_from(source.storage.assume_init_ref());
            },
            (false, true) => {
                let value = unsafe { source.storage.assume_init_ref() }.clone();
                self.storage.write(value);
                self.engaged = true;
            }
            (true, false)  => self.reset(),
            (false, false) => (),
        }
    }
}


impl<T> From<T> for Optional<T> {
    #[inline(always)]
    fn from(value: T) -> Self {
        Optional::some(value)
    }
}

impl<T> From<Option<T>> for Optional<T> {
    #[inline(always)]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Optional::some(value),
            None        => Optional::NONE,
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    #[inline(always)]
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}


impl<T: core::fmt::Debug> core::fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Some").field(value).finish(),
            None        => f.write_str("None"),
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        drops: Rc<Cell<u32>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }


    #[test]
    fn storage_layout() {
        use core::mem::{align_of, size_of};
        assert!(size_of::<Optional<u64>>() >= size_of::<u64>() + 1);
        assert_eq!(align_of::<Optional<u64>>(), align_of::<u64>());
        assert_eq!(align_of::<Optional<u8>>(), 1);
    }

    #[test]
    fn unchecked_access() {
        let mut a = Optional::some(7u32);
        unsafe {
            assert_eq!(*a.value_unchecked(), 7);
            *a.value_unchecked_mut() += 1;
            assert_eq!(*a.as_ptr(), 8);
            *a.as_mut_ptr() = 9;
        }
        assert_eq!(a.value(), Ok(&9));
    }

    #[test]
    fn ptr_points_into_storage() {
        let mut a = Optional::<u32>::new();
        let p = a.as_ptr();
        a.set(3);
        assert_eq!(p, a.as_ptr());
        assert_eq!(a.value().unwrap() as *const u32, p);
    }

    #[test]
    fn reset_clears_flag_before_drop() {
        let drops = Rc::new(Cell::new(0));
        let mut a = Optional::some(Tracked { drops: drops.clone() });
        a.reset();
        assert_eq!(a.has_value(), false);
        assert_eq!(drops.get(), 1);
        a.reset();
        drop(a);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn set_assigns_into_live_value() {
        let drops = Rc::new(Cell::new(0));
        let mut a = Optional::new();
        a.set(Tracked { drops: drops.clone() });
        assert_eq!(drops.get(), 0);
        a.set(Tracked { drops: drops.clone() });
        assert_eq!(drops.get(), 1);
        drop(a);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Optional::some(5)), "Some(5)");
        assert_eq!(format!("{:?}", Optional::<i32>::new()), "None");
    }
}

