//! Counted and conditional variants of [`while_do`](crate::while_do)

use crate::config::LoopConfig;
use crate::while_do::while_do_with;
use strand_future::{make_future, Future};

/// Run `thunk` `n` times, one iteration at a time
///
/// Fails with the error of the first iteration that fails; later
/// iterations are not started.
pub fn times<F>(n: u64, thunk: F) -> Future<()>
where
    F: FnMut() -> Future<()> + Send + 'static,
{
    let mut started = 0u64;
    while_do_with(
        LoopConfig::new("times"),
        move || {
            if started < n {
                started += 1;
                true
            } else {
                false
            }
        },
        thunk,
    )
}

/// Run `thunk` once if `condition` holds, otherwise return a ready future
pub fn when<F>(condition: bool, thunk: F) -> Future<()>
where
    F: FnOnce() -> Future<()>,
{
    if condition {
        thunk()
    } else {
        make_future(())
    }
}
