use cucumber::World;
use timexp_bdd::DailyLogWorld;

#[tokio::main]
async fn main() {
    DailyLogWorld::cucumber()
        .fail_on_skipped()
        .max_concurrent_scenarios(1)
        .run_and_exit("tests/features")
        .await;
}
