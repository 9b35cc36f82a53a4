//! Probe-then-fill retrieval of native arrays whose length is only known to
//! the runtime.
//!
//! The buffer handed to the fill call is wrapped in a [`PinnedBuffer`]: it is
//! mutably borrowed for exactly one native call, so it can neither move nor
//! reallocate while the runtime holds its address, and the release is
//! reported on every exit path, unwinding included.

use std::mem::size_of;

use thiserror::Error;

use crate::result::OvrResult;

/// Attempt bound for [`fetch_growing`] used by the bindings themselves.
pub const DEFAULT_MAX_PROBE_ATTEMPTS: u32 = 16;

/// Hook notified whenever a buffer is pinned for, and released after, a native call.
pub trait PinObserver {
    fn pinned(&self, _address: *const u8, _bytes: usize) {}
    fn unpinned(&self, _address: *const u8, _bytes: usize) {}
}

impl PinObserver for () {}

pub struct PinnedBuffer<'a, T> {
    buffer: &'a mut [T],
    observer: &'a dyn PinObserver,
}

impl<'a, T> PinnedBuffer<'a, T> {
    pub fn new(buffer: &'a mut [T], observer: &'a dyn PinObserver) -> Self {
        observer.pinned(buffer.as_ptr() as *const u8, size_of::<T>() * buffer.len());
        Self { buffer, observer }
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_mut_ptr()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<T> Drop for PinnedBuffer<'_, T> {
    fn drop(&mut self) {
        self.observer.unpinned(
            self.buffer.as_ptr() as *const u8,
            size_of::<T>() * self.buffer.len(),
        );
    }
}

/// Elements returned by a successful fetch, with the success code of the call
/// that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    pub code: OvrResult,
    pub items: Vec<T>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("native runtime call failed with {0}")]
    Native(OvrResult),
    #[error("runtime kept rejecting the buffer capacity after {attempts} attempts")]
    ProbeLimit { attempts: u32 },
    #[error("runtime reported a negative element count ({0})")]
    NegativeCount(i32),
}

impl FetchError {
    /// The native code behind the failure, if there is one.
    pub fn code(&self) -> Option<OvrResult> {
        match self {
            FetchError::Native(code) => Some(*code),
            _ => None,
        }
    }
}

/// Two-call protocol for entry points that report the exact element count.
///
/// `call` receives the output pointer (null on the probe) and the in/out
/// element count. The probe is accepted when it succeeds or reports
/// `ERROR_INSUFFICIENT_ARRAY_SIZE`; a count of zero returns an empty result
/// without a second call.
pub fn fetch_exact<T, F>(observer: &dyn PinObserver, mut call: F) -> Result<Fetched<T>, FetchError>
where
    T: Clone + Default,
    F: FnMut(*mut T, &mut u32) -> OvrResult,
{
    let mut count = 0u32;
    let probe = call(std::ptr::null_mut(), &mut count);
    let insufficient = probe == OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE;
    if probe.is_failure() && !insufficient {
        return Err(FetchError::Native(probe));
    }
    log::debug!("probe reported {} elements ({})", count, probe);

    if count == 0 {
        if insufficient {
            return Err(FetchError::Native(probe));
        }
        return Ok(Fetched {
            code: probe,
            items: Vec::new(),
        });
    }

    let mut items = vec![T::default(); count as usize];
    let mut filled = count;
    let code = {
        let mut pinned = PinnedBuffer::new(&mut items, observer);
        call(pinned.as_mut_ptr(), &mut filled)
    };
    if code.is_failure() {
        return Err(FetchError::Native(code));
    }

    items.truncate(filled.min(count) as usize);
    Ok(Fetched { code, items })
}

/// Growth protocol for entry points that only reject an insufficient capacity.
///
/// Every rejected attempt grows the capacity by at least one element, or
/// straight to the count the runtime wrote back if that is larger. A success
/// reporting more elements than the capacity held is retried at that count,
/// so nothing is cut off. Gives up
/// with [`FetchError::ProbeLimit`] after `max_attempts` calls.
pub fn fetch_growing<T, F>(
    observer: &dyn PinObserver,
    max_attempts: u32,
    mut call: F,
) -> Result<Fetched<T>, FetchError>
where
    T: Clone + Default,
    F: FnMut(*mut T, &mut u32) -> OvrResult,
{
    let mut capacity = 0u32;
    for attempt in 1..=max_attempts {
        let mut items = vec![T::default(); capacity as usize];
        let mut count = capacity;
        let code = if capacity == 0 {
            call(std::ptr::null_mut(), &mut count)
        } else {
            let mut pinned = PinnedBuffer::new(&mut items, observer);
            call(pinned.as_mut_ptr(), &mut count)
        };

        if code == OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE {
            let next = count.max(capacity + 1);
            log::debug!(
                "attempt {}: capacity {} rejected, retrying with {}",
                attempt,
                capacity,
                next
            );
            capacity = next;
            continue;
        }
        if code.is_failure() {
            return Err(FetchError::Native(code));
        }
        if count > capacity {
            // accepted, but more elements exist than fit
            log::debug!(
                "attempt {}: {} elements reported for capacity {}, retrying",
                attempt,
                count,
                capacity
            );
            capacity = count;
            continue;
        }

        items.truncate(count as usize);
        return Ok(Fetched { code, items });
    }

    log::warn!("giving up after {} capacity probes", max_attempts);
    Err(FetchError::ProbeLimit {
        attempts: max_attempts,
    })
}

/// Adapts a signed in/out count, as used by the boundary geometry query, to the
/// unsigned count [`fetch_exact`] works with.
pub(crate) fn signed_count<'a, T, F>(
    mut call: F,
    negative: &'a mut Option<i32>,
) -> impl FnMut(*mut T, &mut u32) -> OvrResult + 'a
where
    T: 'a,
    F: FnMut(*mut T, &mut i32) -> OvrResult + 'a,
{
    move |ptr, count| {
        let mut signed = i32::try_from(*count).unwrap_or(i32::MAX);
        let code = call(ptr, &mut signed);
        if signed < 0 {
            *negative = Some(signed);
            *count = 0;
        } else {
            *count = signed as u32;
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Balance {
        pins: Cell<u32>,
        unpins: Cell<u32>,
    }

    impl PinObserver for Balance {
        fn pinned(&self, _address: *const u8, _bytes: usize) {
            self.pins.set(self.pins.get() + 1);
        }
        fn unpinned(&self, _address: *const u8, _bytes: usize) {
            self.unpins.set(self.unpins.get() + 1);
        }
    }

    /// Native double that reports `available` elements and fills 10, 11, 12...
    fn exact_source(
        available: u32,
        calls: &Cell<u32>,
    ) -> impl FnMut(*mut u32, &mut u32) -> OvrResult + '_ {
        move |ptr, count| {
            calls.set(calls.get() + 1);
            if ptr.is_null() {
                *count = available;
                return OvrResult::SUCCESS;
            }
            if *count < available {
                return OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE;
            }
            let out = unsafe { std::slice::from_raw_parts_mut(ptr, available as usize) };
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = 10 + i as u32;
            }
            *count = available;
            OvrResult::SUCCESS
        }
    }

    #[test]
    fn exact_fetch_probes_then_fills() {
        for n in [1u32, 2, 7, 64] {
            let calls = Cell::new(0);
            let balance = Balance::default();
            let fetched = fetch_exact(&balance, exact_source(n, &calls)).unwrap();
            assert_eq!(calls.get(), 2);
            assert_eq!(fetched.items.len(), n as usize);
            assert_eq!(fetched.items[0], 10);
            assert_eq!(fetched.code, OvrResult::SUCCESS);
            assert_eq!(balance.pins.get(), 1);
            assert_eq!(balance.unpins.get(), 1);
        }
    }

    #[test]
    fn zero_elements_short_circuit() {
        let calls = Cell::new(0);
        let balance = Balance::default();
        let fetched = fetch_exact::<u32, _>(&balance, exact_source(0, &calls)).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(fetched.items.is_empty());
        assert!(fetched.code.is_success());
        assert_eq!(balance.pins.get(), 0);
    }

    #[test]
    fn probe_error_is_returned_verbatim() {
        let calls = Cell::new(0);
        let result = fetch_exact::<u32, _>(&(), |_, _| {
            calls.set(calls.get() + 1);
            OvrResult::ERROR_NO_EXTERNAL_CAMERA_INFO
        });
        assert_eq!(
            result,
            Err(FetchError::Native(OvrResult::ERROR_NO_EXTERNAL_CAMERA_INFO))
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn insufficient_probe_reports_the_count() {
        let fetched = fetch_exact::<u8, _>(&(), |ptr, count| {
            if ptr.is_null() {
                *count = 3;
                return OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE;
            }
            unsafe { std::ptr::copy_nonoverlapping(b"ab\0".as_ptr(), ptr, 3) };
            OvrResult::SUCCESS
        })
        .unwrap();
        assert_eq!(fetched.items, b"ab\0".to_vec());
    }

    #[test]
    fn failed_fill_still_unpins() {
        let balance = Balance::default();
        let result = fetch_exact::<u32, _>(&balance, |ptr, count| {
            if ptr.is_null() {
                *count = 4;
                OvrResult::SUCCESS
            } else {
                OvrResult::ERROR_DISPLAY_LOST
            }
        });
        assert_eq!(result, Err(FetchError::Native(OvrResult::ERROR_DISPLAY_LOST)));
        assert_eq!(balance.pins.get(), 1);
        assert_eq!(balance.unpins.get(), 1);
    }

    #[test]
    fn panicking_fill_still_unpins() {
        let balance = Balance::default();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = fetch_exact::<u32, _>(&balance, |ptr, count| {
                if ptr.is_null() {
                    *count = 2;
                    return OvrResult::SUCCESS;
                }
                panic!("native layer blew up");
            });
        }));
        assert!(outcome.is_err());
        assert_eq!(balance.pins.get(), balance.unpins.get());
        assert_eq!(balance.unpins.get(), 1);
    }

    #[test]
    fn fill_may_return_fewer_elements() {
        let fetched = fetch_exact::<u32, _>(&(), |ptr, count| {
            if ptr.is_null() {
                *count = 5;
            } else {
                *count = 2;
            }
            OvrResult::SUCCESS
        })
        .unwrap();
        assert_eq!(fetched.items.len(), 2);
    }

    #[test]
    fn growing_fetch_steps_one_at_a_time() {
        let balance = Balance::default();
        let calls = Cell::new(0);
        // only rejects, never writes the required count back
        let fetched = fetch_growing::<u32, _>(&balance, 8, |_, count| {
            calls.set(calls.get() + 1);
            if *count < 3 {
                return OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE;
            }
            *count = 3;
            OvrResult::SUCCESS
        })
        .unwrap();
        assert_eq!(fetched.items.len(), 3);
        assert_eq!(calls.get(), 4);
        assert_eq!(balance.pins.get(), 3);
        assert_eq!(balance.unpins.get(), 3);
    }

    #[test]
    fn growing_fetch_jumps_to_reported_count() {
        let calls = Cell::new(0);
        let fetched = fetch_growing::<u32, _>(&(), 8, |_, count| {
            calls.set(calls.get() + 1);
            if *count < 5 {
                *count = 5;
                return OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE;
            }
            OvrResult::SUCCESS
        })
        .unwrap();
        assert_eq!(fetched.items.len(), 5);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn growing_fetch_never_drops_reported_elements() {
        let balance = Balance::default();
        let calls = Cell::new(0);
        // accepts any capacity but reports the full count of 4
        let fetched = fetch_growing::<u32, _>(&balance, 8, |ptr, count| {
            calls.set(calls.get() + 1);
            if !ptr.is_null() {
                let out = unsafe { std::slice::from_raw_parts_mut(ptr, *count as usize) };
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = 20 + i as u32;
                }
            }
            *count = 4;
            OvrResult::SUCCESS
        })
        .unwrap();
        assert_eq!(fetched.items, vec![20, 21, 22, 23]);
        assert_eq!(calls.get(), 2);
        assert_eq!(balance.pins.get(), balance.unpins.get());

        let capped = fetch_growing::<u32, _>(&(), 3, |_, count| {
            *count += 1;
            OvrResult::SUCCESS
        });
        assert_eq!(capped, Err(FetchError::ProbeLimit { attempts: 3 }));
    }

    #[test]
    fn growing_fetch_is_bounded() {
        let balance = Balance::default();
        let calls = Cell::new(0);
        let result = fetch_growing::<u32, _>(&balance, 5, |_, _| {
            calls.set(calls.get() + 1);
            OvrResult::ERROR_INSUFFICIENT_ARRAY_SIZE
        });
        assert_eq!(result, Err(FetchError::ProbeLimit { attempts: 5 }));
        assert_eq!(calls.get(), 5);
        assert_eq!(balance.pins.get(), balance.unpins.get());
    }

    #[test]
    fn growing_fetch_empty_and_unavailable() {
        let empty = fetch_growing::<u32, _>(&(), 4, |_, count| {
            *count = 0;
            OvrResult::SUCCESS
        })
        .unwrap();
        assert!(empty.items.is_empty());

        let missing = fetch_growing::<u32, _>(&(), 4, |_, _| {
            OvrResult::ERROR_NO_EXTERNAL_CAMERA_INFO
        });
        assert_eq!(
            missing.unwrap_err().code(),
            Some(OvrResult::ERROR_NO_EXTERNAL_CAMERA_INFO)
        );
    }

    #[test]
    fn signed_counts_are_adapted() {
        let mut negative = None;
        let result = fetch_exact::<u32, _>(
            &(),
            signed_count(
                |_, count: &mut i32| {
                    *count = -4;
                    OvrResult::SUCCESS
                },
                &mut negative,
            ),
        );
        assert!(result.unwrap().items.is_empty());
        assert_eq!(negative, Some(-4));
    }
}
