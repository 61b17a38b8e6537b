// src/common/io_helpers.rs

use super::error::Error;
use super::hal_traits::Timer;
use core::fmt::Debug;
use core::time::Duration;
use nb::Result as NbResult;

/// Executes a non-blocking I/O operation (`f`) repeatedly until it
/// stops returning `WouldBlock`, returning the final result or a timeout error.
pub fn execute_blocking_io_with_timeout<TM, FN, T, E>(
    timer: &mut TM,
    timeout: Duration,
    poll_interval: Duration,
    f: FN,
) -> Result<T, Error<E>>
where
    TM: Timer,
    FN: FnMut() -> NbResult<T, E>,
    E: Debug,
{
    let deadline = timer.now() + timeout;
    execute_blocking_io_until(timer, deadline, poll_interval, f)
}

/// Same as [`execute_blocking_io_with_timeout`] but against an absolute deadline,
/// so several operations can share one time budget.
pub fn execute_blocking_io_until<TM, FN, T, E>(
    timer: &mut TM,
    deadline: TM::Instant,
    poll_interval: Duration,
    mut f: FN,
) -> Result<T, Error<E>>
where
    TM: Timer,
    FN: FnMut() -> NbResult<T, E>,
    E: Debug,
{
    loop {
        match f() {
            Ok(result) => return Ok(result),
            Err(nb::Error::WouldBlock) => {
                if timer.now() >= deadline {
                    return Err(Error::Timeout);
                }
                timer.delay_us(poll_interval.as_micros() as u32);
            }
            Err(nb::Error::Other(e)) => return Err(Error::Io(e)),
        }
    }
}

/// Sleeps until `deadline`, returning at once if it has already passed.
pub fn delay_until<TM: Timer>(timer: &mut TM, deadline: TM::Instant) {
    let now = timer.now();
    if now < deadline {
        let remaining = deadline - now;
        timer.delay_us(remaining.as_micros().min(u32::MAX as u128) as u32);
    }
}
