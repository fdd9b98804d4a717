//! Cancellation delivery through a loop
//!
//! A raise on the loop's future is a single point-in-time request: it
//! reaches the iteration in flight and nothing after it.

use crate::*;

#[test]
fn test_interrupt_delivered_once() {
    init_tracing();
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(Observed::default());

    let f = observe(
        while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts)),
        &observed,
    );

    assert_eq!(interrupts.load(Ordering::SeqCst), 0);

    f.raise(Eggs);

    for _ in 1..=3 {
        assert_eq!(interrupts.load(Ordering::SeqCst), 1);
        pop_and_fulfill(&queue);
    }
    assert_eq!(interrupts.load(Ordering::SeqCst), 1);
    assert!(f.is_ready());
    assert!(observed.complete());
}

#[test]
fn test_interrupt_with_always_true_predicate() {
    let queue = PromiseQueue::default();
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(|| true, make_thunk(&queue, &interrupts));
    f.raise(Eggs);
    assert_eq!(interrupts.load(Ordering::SeqCst), 1);

    for _ in 0..3 {
        pop_and_fulfill(&queue);
        assert_eq!(interrupts.load(Ordering::SeqCst), 1);
    }
    assert!(!f.is_ready());
}

#[test]
fn test_interrupt_payload_reaches_handler() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let pending: Arc<Mutex<Option<Arc<Promise<()>>>>> = Arc::default();
    let slot = Arc::clone(&pending);

    let f = while_do(
        || true,
        move || {
            let (promise, future) = contract();
            let log = Arc::clone(&log);
            promise.set_interrupt_handler(move |e| {
                log.lock().push(e.is::<Eggs>());
            });
            *slot.lock() = Some(Arc::new(promise));
            future
        },
    );

    f.raise(Eggs);
    assert_eq!(*seen.lock(), vec![true]);
    let last = pending.lock().take();
    drop(last);
}

#[test]
fn test_each_raise_is_a_separate_request() {
    let queue = PromiseQueue::default();
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(|| true, make_thunk(&queue, &interrupts));
    f.raise(Eggs);
    pop_and_fulfill(&queue);
    f.raise(Eggs);
    pop_and_fulfill(&queue);

    assert_eq!(interrupts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_handler_reacting_to_interrupt_ends_loop() {
    let queue = PromiseQueue::default();
    let queue_for_thunk = Arc::clone(&queue);

    let f = while_do(
        || true,
        move || {
            let (promise, future) = contract();
            let promise = Arc::new(promise);
            let target = Arc::clone(&promise);
            promise.set_interrupt_handler(move |e| {
                let _ = target.set_error(e);
            });
            queue_for_thunk.lock().push_back(promise);
            future
        },
    );

    pop_and_fulfill(&queue);
    f.cancel();

    let err = f.wait().unwrap_err();
    assert_eq!(FutureError::find(&err), Some(FutureError::Cancelled));
}

#[test]
fn test_interrupt_after_completion_is_ignored() {
    let queue = PromiseQueue::default();
    let evaluations = Arc::new(AtomicUsize::new(0));
    let interrupts = Arc::new(AtomicUsize::new(0));

    let f = while_do(make_pred(&evaluations), make_thunk(&queue, &interrupts));
    for _ in 0..3 {
        pop_and_fulfill(&queue);
    }
    assert!(f.is_ready());

    f.raise(Eggs);
    assert_eq!(interrupts.load(Ordering::SeqCst), 0);
    assert!(f.wait().is_ok());
}
