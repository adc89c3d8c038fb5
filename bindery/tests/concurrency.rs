use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use bindery::{Construct, Error, Registry, Shared};

static SLOW_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

struct SlowService;

impl Construct for SlowService {
    fn construct(_registry: &Registry) -> Result<Self, Error> {
        SLOW_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        // widen the race window for a first-call stampede
        thread::sleep(Duration::from_millis(50));
        Ok(SlowService)
    }
}

#[test]
fn concurrent_first_resolutions_construct_once() {
    let registry = Registry::new();
    registry.register_singleton_self::<SlowService>();

    let resolved: Vec<Shared<SlowService>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..20)
            .map(|_| scope.spawn(|| registry.resolve::<SlowService>().unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(SLOW_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    for instance in &resolved[1..] {
        assert!(Shared::ptr_eq(&resolved[0], instance));
    }
}

static GATE_OPEN: AtomicBool = AtomicBool::new(false);
static GATED_STARTED: AtomicBool = AtomicBool::new(false);

struct GatedService;

impl Construct for GatedService {
    fn construct(_registry: &Registry) -> Result<Self, Error> {
        GATED_STARTED.store(true, Ordering::SeqCst);
        while !GATE_OPEN.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        Ok(GatedService)
    }
}

struct QuickService;

impl Construct for QuickService {
    fn construct(_registry: &Registry) -> Result<Self, Error> {
        Ok(QuickService)
    }
}

#[test]
fn unrelated_singleton_bindings_do_not_contend() {
    let registry = Registry::new();
    registry.register_singleton_self::<GatedService>();
    registry.register_singleton_self::<QuickService>();

    thread::scope(|scope| {
        let gated = scope.spawn(|| registry.resolve::<GatedService>().unwrap());

        while !GATED_STARTED.load(Ordering::SeqCst) {
            thread::yield_now();
        }

        // the gated constructor still holds its own binding's lock, yet an
        // unrelated binding resolves without blocking on it
        assert!(registry.resolve::<QuickService>().is_ok());

        GATE_OPEN.store(true, Ordering::SeqCst);
        gated.join().unwrap();
    });
}

static TRANSIENT_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

struct DisposableService;

impl Construct for DisposableService {
    fn construct(_registry: &Registry) -> Result<Self, Error> {
        TRANSIENT_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Ok(DisposableService)
    }
}

#[test]
fn concurrent_per_request_resolutions_are_independent() {
    let registry = Registry::new();
    registry.register_transient_self::<DisposableService>();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..5 {
                    registry.resolve::<DisposableService>().unwrap();
                }
            });
        }
    });

    assert_eq!(TRANSIENT_CONSTRUCTIONS.load(Ordering::SeqCst), 40);
}
