//! Loops cut short by a failed iteration

use crate::*;

#[test]
fn test_failure_on_second_iteration() {
    init_tracing();
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(Observed::default());

    let f = observe(
        while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts)),
        &observed,
    );

    pop_and_fulfill(&queue);
    assert!(!observed.complete());
    assert!(!observed.failure());

    pop_promise(&queue).set_error(Eggs).unwrap();

    assert!(f.is_ready());
    assert!(!observed.complete());
    assert!(observed.failure());

    // No further passes after the failure
    assert_eq!(evaluations.load(Ordering::SeqCst), 2);
    assert!(queue.lock().is_empty());
}

#[test]
fn test_failure_keeps_error_identity() {
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts));
    pop_promise(&queue).set_error(Eggs).unwrap();

    let err = f.wait().unwrap_err();
    assert!(err.is::<Eggs>());
    assert_eq!(err.to_string(), "eggs");
}

#[test]
fn test_dropped_iteration_fails_loop() {
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts));
    drop(pop_promise(&queue));

    let err = f.wait().unwrap_err();
    assert_eq!(FutureError::find(&err), Some(FutureError::BrokenPromise));
    assert_eq!(evaluations.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fulfilling_iteration_twice_is_rejected() {
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts));
    let first = pop_promise(&queue);
    first.set_value(()).unwrap();
    assert_eq!(first.set_value(()), Err(FutureError::DoubleFulfillment));
    assert_eq!(
        first.set_error(Eggs),
        Err(FutureError::DoubleFulfillment)
    );

    // The rejected writes did not advance the loop
    assert_eq!(evaluations.load(Ordering::SeqCst), 2);
    assert_eq!(queue.lock().len(), 1);
    assert!(!f.is_ready());
}
