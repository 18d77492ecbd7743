use menuboard_hive::{spawn_ticker, Signal, SignalHub, SHEET_CHANNEL, SHEET_UPDATED};

use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Signal Tests
// ============================================================================

#[test]
fn test_signal_sheet_updated() {
    let signal = Signal::sheet_updated();
    assert_eq!(signal.topic, "sheet-channel");
    assert_eq!(signal.event, "sheet-updated");
}

#[test]
fn test_signal_accepts_channel_alias() {
    let signal: Signal =
        serde_json::from_str(r#"{"channel": "sheet-channel", "event": "sheet-updated"}"#).unwrap();
    assert_eq!(signal, Signal::sheet_updated());
}

#[test]
fn test_signal_serializes_topic() {
    let json = serde_json::to_value(Signal::new("a", "b")).unwrap();
    assert_eq!(json["topic"], "a");
    assert_eq!(json["event"], "b");
}

// ============================================================================
// SignalHub Tests
// ============================================================================

#[test]
fn test_publish_without_subscribers() {
    let hub = SignalHub::new();
    assert_eq!(hub.publish(Signal::sheet_updated()), 0);
    assert_eq!(hub.subscriber_count(SHEET_CHANNEL), 0);
}

#[test]
fn test_hub_debug() {
    let hub = SignalHub::new();
    let _sub = hub.subscribe(SHEET_CHANNEL);
    let debug = format!("{:?}", hub);
    assert!(debug.contains("SignalHub"));
    assert!(debug.contains(SHEET_CHANNEL));
}

#[tokio::test]
async fn test_subscribe_and_publish() {
    let hub = SignalHub::new();
    let mut sub = hub.subscribe(SHEET_CHANNEL);
    assert_eq!(sub.topic(), SHEET_CHANNEL);

    assert_eq!(hub.publish(Signal::sheet_updated()), 1);
    let signal = sub.recv().await.unwrap();
    assert_eq!(signal.event, SHEET_UPDATED);
}

#[tokio::test]
async fn test_fan_out_to_every_subscriber() {
    let hub = SignalHub::new();
    let mut a = hub.subscribe(SHEET_CHANNEL);
    let mut b = hub.subscribe(SHEET_CHANNEL);
    assert_eq!(hub.subscriber_count(SHEET_CHANNEL), 2);

    assert_eq!(hub.publish(Signal::sheet_updated()), 2);
    assert_eq!(a.recv().await, Some(Signal::sheet_updated()));
    assert_eq!(b.recv().await, Some(Signal::sheet_updated()));
}

#[tokio::test]
async fn test_topics_are_isolated() {
    let hub = SignalHub::new();
    let mut sheet = hub.subscribe(SHEET_CHANNEL);
    let _other = hub.subscribe("other");

    assert_eq!(hub.publish(Signal::new("other", "ping")), 1);
    hub.publish(Signal::sheet_updated());

    // The first thing the sheet subscriber sees is its own topic.
    assert_eq!(sheet.recv().await.unwrap().topic, SHEET_CHANNEL);
}

#[tokio::test]
async fn test_late_subscriber_misses_earlier_signals() {
    let hub = SignalHub::new();
    let _early = hub.subscribe(SHEET_CHANNEL);
    hub.publish(Signal::new(SHEET_CHANNEL, "first"));

    let mut late = hub.subscribe(SHEET_CHANNEL);
    hub.publish(Signal::new(SHEET_CHANNEL, "second"));
    assert_eq!(late.recv().await.unwrap().event, "second");
}

#[tokio::test]
async fn test_unsubscribe_drops_receiver() {
    let hub = SignalHub::new();
    let sub = hub.subscribe(SHEET_CHANNEL);
    assert_eq!(hub.subscriber_count(SHEET_CHANNEL), 1);

    sub.unsubscribe();
    assert_eq!(hub.subscriber_count(SHEET_CHANNEL), 0);
    assert_eq!(hub.publish(Signal::sheet_updated()), 0);
}

#[tokio::test]
async fn test_close_drains_then_ends() {
    let hub = SignalHub::new();
    let mut sub = hub.subscribe(SHEET_CHANNEL);
    hub.publish(Signal::sheet_updated());

    hub.close();
    assert_eq!(sub.recv().await, Some(Signal::sheet_updated()));
    assert_eq!(sub.recv().await, None);
}

#[tokio::test]
async fn test_lagged_subscriber_keeps_receiving() {
    let hub = SignalHub::new();
    let mut sub = hub.subscribe(SHEET_CHANNEL);
    for i in 0..200 {
        hub.publish(Signal::new(SHEET_CHANNEL, &format!("e{}", i)));
    }

    // Overflowed signals are skipped; the newest are still delivered.
    let signal = sub.recv().await.unwrap();
    assert_ne!(signal.event, "e0");
    hub.close();
    let mut last = signal;
    while let Some(s) = sub.recv().await {
        last = s;
    }
    assert_eq!(last.event, "e199");
}

// ============================================================================
// Ticker Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_ticker_waits_one_period() {
    let hub = Arc::new(SignalHub::new());
    let mut sub = hub.subscribe(SHEET_CHANNEL);
    let period = Duration::from_secs(60);
    let ticker = spawn_ticker(hub.clone(), period);

    let early = tokio::time::timeout(period - Duration::from_millis(1), sub.recv()).await;
    assert!(early.is_err(), "ticker fired before one period");

    assert_eq!(sub.recv().await, Some(Signal::sheet_updated()));
    ticker.abort();
}

#[tokio::test(start_paused = true)]
async fn test_ticker_repeats() {
    let hub = Arc::new(SignalHub::new());
    let mut sub = hub.subscribe(SHEET_CHANNEL);
    let ticker = spawn_ticker(hub.clone(), Duration::from_secs(5));

    for _ in 0..3 {
        assert_eq!(sub.recv().await.unwrap().event, SHEET_UPDATED);
    }
    ticker.abort();
}
