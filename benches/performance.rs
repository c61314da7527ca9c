//! Performance benchmarks for the event bus.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use signalbus::{BusConfig, DispatchMode, Event, EventBus, EventState, EventType, Result};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::LazyLock;

trait MoveHandler {
    fn on_move(&self, x: i32, y: i32);
}

static MOUSE_MOVE: LazyLock<EventType<dyn MoveHandler>> =
    LazyLock::new(|| EventType::new("mouse-move"));

struct MouseMove {
    x: i32,
    y: i32,
    state: EventState,
}

impl Event for MouseMove {
    type Handler = dyn MoveHandler;

    fn associated_type(&self) -> &EventType<dyn MoveHandler> {
        &MOUSE_MOVE
    }

    fn dispatch(&self, handler: &dyn MoveHandler) -> Result<()> {
        handler.on_move(*self.checked(&self.x)?, *self.checked(&self.y)?);
        Ok(())
    }

    fn state(&self) -> &EventState {
        &self.state
    }
}

#[derive(Default)]
struct Tracker(Cell<i64>);

impl MoveHandler for Tracker {
    fn on_move(&self, x: i32, y: i32) {
        self.0.set(self.0.get() + (x + y) as i64);
    }
}

fn bus_with(handlers: usize, dispatch: DispatchMode) -> EventBus {
    let bus = EventBus::with_config(
        Rc::new("bench"),
        BusConfig {
            dispatch,
            ..Default::default()
        },
    );
    for _ in 0..handlers {
        bus.register(&*MOUSE_MOVE, Rc::new(Tracker::default()) as Rc<dyn MoveHandler>)
            .unwrap();
    }
    bus
}

/// Benchmark firing a pooled event with varying handler counts
fn bench_fire_pooled(c: &mut Criterion) {
    let mut group = c.benchmark_group("fire_pooled");

    for handlers in [1, 5, 6, 50] {
        for (label, mode) in [
            ("snapshot", DispatchMode::Snapshot),
            ("indexed", DispatchMode::Indexed),
        ] {
            group.bench_with_input(
                BenchmarkId::new(label, handlers),
                &handlers,
                |b, &handlers| {
                    let bus = bus_with(handlers, mode);
                    let event = MouseMove {
                        x: 3,
                        y: 4,
                        state: EventState::new(),
                    };

                    b.iter(|| {
                        event.revive();
                        bus.fire(black_box(&event)).unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the skip path when nobody listens
fn bench_is_handled(c: &mut Criterion) {
    let bus = bus_with(0, DispatchMode::Snapshot);

    c.bench_function("is_handled_empty", |b| {
        b.iter(|| black_box(bus.is_handled(&*MOUSE_MOVE)));
    });
}

/// Benchmark registration across the promotion boundary
fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register");

    for handlers in [3, 5, 20] {
        group.bench_with_input(
            BenchmarkId::new("handlers", handlers),
            &handlers,
            |b, &handlers| {
                b.iter(|| black_box(bus_with(handlers, DispatchMode::Snapshot)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fire_pooled, bench_is_handled, bench_register);
criterion_main!(benches);
