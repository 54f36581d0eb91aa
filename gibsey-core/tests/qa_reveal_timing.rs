//! QA tests for reveal pacing on the Tokio timer.
//!
//! The runtime clock is paused, so sleeps advance instantly but ordering
//! and elapsed time are still observable.
//! Run with: `cargo test -p gibsey-core --test qa_reveal_timing`

use std::sync::Arc;
use std::time::Duration;

use gibsey_core::testing::fixture_pages;
use gibsey_core::{
    Catalog, CharacterId, InteractionController, PageId, ReaderConfig, TickOutcome, TokioTicker,
};
use tokio::time::{self, Instant};

fn tokio_controller(
    interval: Duration,
) -> (
    InteractionController,
    tokio::sync::mpsc::UnboundedReceiver<gibsey_core::RevealTick>,
) {
    let (ticker, ticks) = TokioTicker::channel();
    let config = ReaderConfig::default().with_tick_interval(interval);
    let controller = InteractionController::new(
        Arc::new(Catalog::gibsey()),
        Arc::new(fixture_pages()),
        &config,
        Box::new(ticker),
    );
    (controller, ticks)
}

#[tokio::test(start_paused = true)]
async fn test_reveal_paced_by_interval() {
    let interval = Duration::from_millis(30);
    let (mut controller, mut ticks) = tokio_controller(interval);

    let started = Instant::now();
    controller.on_select_page(PageId(1)).unwrap();
    let total = controller.reveal().total_len;

    // Nothing is revealed before the first interval elapses.
    assert!(time::timeout(Duration::from_millis(29), ticks.recv())
        .await
        .is_err());
    assert_eq!(controller.reveal().revealed_len, 0);

    let mut previous = 0;
    loop {
        let tick = ticks.recv().await.expect("ticker alive");
        let outcome = controller.on_tick(tick);
        let revealed = controller.reveal().revealed_len;
        assert_eq!(revealed, previous + 1, "reveal advances one unit per tick");
        previous = revealed;
        if outcome == TickOutcome::Completed {
            break;
        }
    }

    assert_eq!(previous, total);
    assert!(started.elapsed() >= interval * total as u32);
    assert!(!controller.reveal().running);

    // The schedule stops once the text is fully shown.
    assert!(time::timeout(interval * 4, ticks.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_reveal_never_leaks() {
    let (mut controller, mut ticks) = tokio_controller(Duration::from_millis(30));

    controller.on_select_character(CharacterId(1)).unwrap();
    for _ in 0..3 {
        let tick = ticks.recv().await.expect("ticker alive");
        controller.on_tick(tick);
    }
    let first = controller.reveal().id;
    assert_eq!(controller.reveal().revealed_len, 3);

    controller.on_select_character(CharacterId(3)).unwrap();
    let second_text = controller.reveal().source_text.clone();
    assert_eq!(controller.reveal().revealed_len, 0);

    loop {
        let tick = ticks.recv().await.expect("ticker alive");
        let outcome = controller.on_tick(tick);
        if tick.session == first {
            assert_eq!(outcome, TickOutcome::Stale);
        }

        let view = controller.snapshot().reveal;
        assert!(second_text.starts_with(&view.revealed_text));
        if outcome == TickOutcome::Completed {
            break;
        }
    }

    assert_eq!(controller.snapshot().reveal.revealed_text, second_text);
}

#[tokio::test(start_paused = true)]
async fn test_reselect_same_text_restarts_from_zero() {
    let (mut controller, mut ticks) = tokio_controller(Duration::from_millis(10));

    controller.on_select_page(PageId(2)).unwrap();
    controller.on_tick(ticks.recv().await.expect("ticker alive"));
    controller.on_tick(ticks.recv().await.expect("ticker alive"));

    // Moving away and back begins a fresh session over the same text.
    controller.on_select_page(PageId(1)).unwrap();
    controller.on_select_page(PageId(2)).unwrap();
    assert_eq!(controller.reveal().revealed_len, 0);
    assert!(controller.reveal().running);

    let current = controller.reveal().id;
    let tick = loop {
        let tick = ticks.recv().await.expect("ticker alive");
        if tick.session == current {
            break tick;
        }
        assert_eq!(controller.on_tick(tick), TickOutcome::Stale);
    };
    assert_eq!(controller.on_tick(tick), TickOutcome::Advanced);
    assert_eq!(controller.reveal().revealed_text(), "A");
}
