//! Interrupt masking for the bit loop
//!
//! A lock is a raw enter/exit pair; [`InterruptGuard`] is the only safe way to
//! hold it and releases on every exit path, unwinding included.

/// Disables preemption and interrupts while held
pub trait InterruptLock {
    /// State needed to restore the previous interrupt level
    type State: Copy;

    /// Enter the masked section
    ///
    /// # Safety
    /// Must be balanced by exactly one [`InterruptLock::release`] with the
    /// returned state, with nested sections released in reverse order.
    unsafe fn acquire(&mut self) -> Self::State;

    /// Leave the masked section
    ///
    /// # Safety
    /// `state` must come from the matching [`InterruptLock::acquire`].
    unsafe fn release(&mut self, state: Self::State);
}

/// Scoped hold of an [`InterruptLock`]
pub struct InterruptGuard<'a, L: InterruptLock> {
    lock: &'a mut L,
    state: L::State,
}

impl<'a, L: InterruptLock> InterruptGuard<'a, L> {
    /// Mask interrupts until the guard is dropped
    #[inline(always)]
    pub fn new(lock: &'a mut L) -> Self {
        // Safety: released exactly once in `drop`; the guard borrows the lock
        // mutably, so sections on one lock cannot interleave
        let state = unsafe { lock.acquire() };
        Self { lock, state }
    }
}

impl<L: InterruptLock> Drop for InterruptGuard<'_, L> {
    #[inline(always)]
    fn drop(&mut self) {
        // Safety: state comes from the acquire in `new`
        unsafe { self.lock.release(self.state) }
    }
}

/// Lock backed by the global `critical-section` implementation
///
/// On single-core targets this masks interrupts, which also stops the
/// scheduler tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalInterruptLock;

impl InterruptLock for GlobalInterruptLock {
    type State = critical_section::RestoreState;

    #[inline(always)]
    unsafe fn acquire(&mut self) -> Self::State {
        unsafe { critical_section::acquire() }
    }

    #[inline(always)]
    unsafe fn release(&mut self, state: Self::State) {
        unsafe { critical_section::release(state) }
    }
}
