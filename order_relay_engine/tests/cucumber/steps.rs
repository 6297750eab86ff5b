use cucumber::{given, then, when};
use relay_common::MinorUnits;
use serde_json::Value;
use vtex_tools::{OrderDetail, OrderSummary};

use crate::cucumber::RelayWorld;

fn ids(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

#[given(expr = "the relay replicates sales channel {string}")]
async fn target_channel(world: &mut RelayWorld, channel: String) {
    world.target_channel = Some(channel);
}

#[given(expr = "order {word} in sales channel {string} worth {int} cents is ready for handling")]
async fn order_in_channel(world: &mut RelayWorld, order_id: String, channel: String, value: i64) {
    world.source.list(OrderSummary::new(order_id.clone()));
    world.source.serve(OrderDetail::new(order_id).with_sales_channel(channel).with_value(MinorUnits::from(value)));
}

#[given(expr = "order {word} in numeric sales channel {int} is ready for handling")]
async fn order_in_numeric_channel(world: &mut RelayWorld, order_id: String, channel: i64) {
    world.source.list(OrderSummary::new(order_id.clone()));
    world.source.serve(OrderDetail::new(order_id).with_sales_channel(channel));
}

#[given(expr = "order {word} is listed but its details cannot be fetched")]
async fn order_without_detail(world: &mut RelayWorld, order_id: String) {
    world.source.list(OrderSummary::new(order_id));
}

#[given("an order summary without an order id is listed")]
async fn summary_without_id(world: &mut RelayWorld) {
    world.source.list(OrderSummary::default());
}

#[given(expr = "the state file contains {string}")]
async fn state_file_contents(world: &mut RelayWorld, contents: String) {
    let path = world.state_file();
    std::fs::write(path, contents).expect("Could not write the state file");
}

#[given(expr = "the document store rejects writes with HTTP {int}")]
async fn store_rejects(world: &mut RelayWorld, status: u16) {
    world.store.reject_with(Some(status));
}

#[when("the document store recovers")]
async fn store_recovers(world: &mut RelayWorld) {
    world.store.reject_with(None);
}

#[when("a polling round runs")]
async fn polling_round(world: &mut RelayWorld) {
    world.worker().poll_once().await.expect("Polling round failed");
}

#[when(expr = "{int} polling rounds run")]
async fn polling_rounds(world: &mut RelayWorld, rounds: usize) {
    for _ in 0..rounds {
        world.worker().poll_once().await.expect("Polling round failed");
    }
}

#[then(expr = "{int} replica document(s) was/were created")]
async fn documents_created(world: &mut RelayWorld, count: usize) {
    assert_eq!(world.store.documents().len(), count, "Unexpected number of replica documents");
}

#[then(expr = "{int} write(s) was/were attempted")]
async fn writes_attempted(world: &mut RelayWorld, count: usize) {
    assert_eq!(world.store.attempts(), count, "Unexpected number of write attempts");
}

#[then(expr = "the replica of order {word} has a total value of {float}")]
async fn replica_total(world: &mut RelayWorld, order_id: String, total: f64) {
    let doc = world
        .store
        .documents()
        .into_iter()
        .find(|d| d.order_id == order_id)
        .unwrap_or_else(|| panic!("No replica for order {order_id}"));
    assert_eq!(doc.total_value, total);
}

#[then(expr = "the processed set is {string}")]
async fn processed_set(world: &mut RelayWorld, expected: String) {
    let path = world.state_file();
    let contents = std::fs::read_to_string(path).expect("Could not read the state file");
    let saved: Value = serde_json::from_str(&contents).expect("State file is not JSON");
    let mut saved = saved
        .as_array()
        .expect("State file is not a JSON array")
        .iter()
        .map(|v| v.as_str().expect("Order id is not a string").to_string())
        .collect::<Vec<_>>();
    saved.sort();
    let mut expected = ids(&expected);
    expected.sort();
    assert_eq!(saved, expected);
    assert_eq!(world.worker().processed_count(), expected.len());
}

#[then(expr = "the details of order {word} were fetched {int} time(s)")]
async fn detail_fetches(world: &mut RelayWorld, order_id: String, count: usize) {
    let fetches = world.source.fetched().into_iter().filter(|id| *id == order_id).count();
    assert_eq!(fetches, count, "Unexpected number of detail fetches for {order_id}");
}
