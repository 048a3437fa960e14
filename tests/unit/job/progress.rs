use super::*;
use std::sync::{Arc, Mutex};

fn collector() -> (Arc<Mutex<Vec<u8>>>, impl FnMut(u8) + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |p| sink.lock().unwrap().push(p))
}

#[tokio::test(start_paused = true)]
async fn counts_to_cap_then_goes_quiet() {
    let (seen, on_tick) = collector();
    let handle = ProgressSimulator::default().start(&tokio::runtime::Handle::current(), on_tick);

    tokio::time::sleep(Duration::from_millis(5_025)).await;
    let got = seen.lock().unwrap().clone();
    assert_eq!(got, (1..=100).collect::<Vec<u8>>());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(seen.lock().unwrap().len(), 100);
    assert!(handle.is_stopped());
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn first_tick_arrives_after_one_interval() {
    let (seen, on_tick) = collector();
    let _handle = ProgressSimulator::default().start(&tokio::runtime::Handle::current(), on_tick);

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(seen.lock().unwrap().is_empty());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent_and_silences_ticks() {
    let (seen, on_tick) = collector();
    let handle = ProgressSimulator::default().start(&tokio::runtime::Handle::current(), on_tick);

    tokio::time::sleep(Duration::from_millis(275)).await;
    handle.stop();
    handle.stop();
    let at_stop = seen.lock().unwrap().len();
    assert_eq!(at_stop, 5);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(seen.lock().unwrap().len(), at_stop);
    assert!(handle.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn larger_step_saturates_at_cap() {
    let (seen, on_tick) = collector();
    let sim = ProgressSimulator::new(Duration::from_millis(10), 30);
    let _handle = sim.start(&tokio::runtime::Handle::current(), on_tick);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*seen.lock().unwrap(), vec![30, 60, 90, 100]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_ticks() {
    let (seen, on_tick) = collector();
    let handle = ProgressSimulator::default().start(&tokio::runtime::Handle::current(), on_tick);
    tokio::time::sleep(Duration::from_millis(125)).await;
    drop(handle);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn zero_step_is_clamped() {
    let sim = ProgressSimulator::new(Duration::from_millis(5), 0);
    assert_eq!(sim, ProgressSimulator::new(Duration::from_millis(5), 1));
}
