mod common;

use std::sync::Arc;

use common::{expect_news, expect_no_news, expect_no_state, expect_state, RECV_TIMEOUT};
use featureflow::config::Config;
use featureflow::counter::{CounterModel, CounterNews, CounterState, UiEvent};
use featureflow::saved_state::{
    FileSavedStateRegistry, MemorySavedStateRegistry, SavedStateRegistry, Snapshot,
};
use featureflow::FeatureScope;
use futures::{Stream, StreamExt};
use tempfile::TempDir;

fn counter(is_loading: bool, counter: i64) -> CounterState {
    CounterState {
        is_loading,
        counter,
    }
}

fn fast_config() -> Config {
    let mut config = Config::default();
    config.counter.step_delay_ms = 0;
    config
}

async fn next_value<S: Stream<Item = i64> + Unpin>(values: &mut S) -> Option<i64> {
    tokio::time::timeout(RECV_TIMEOUT, values.next())
        .await
        .expect("timed out waiting for counter")
}

async fn increment(model: &CounterModel) {
    let mut states = model.states();
    let before = expect_state(&mut states).await;
    model.accept(UiEvent::ButtonInc).unwrap();
    assert_eq!(expect_state(&mut states).await, counter(true, before.counter));
    assert_eq!(
        expect_state(&mut states).await,
        counter(false, before.counter + 1)
    );
}

#[tokio::test]
async fn counter_starts_at_zero() {
    let scope = FeatureScope::new();
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let model = CounterModel::new(&fast_config(), registry, &scope);

    assert_eq!(model.value(), CounterState::default());
    assert_eq!(model.feature().name(), "counter");
    assert_eq!(model.saved_state_key(), "CounterState");
}

#[tokio::test(start_paused = true)]
async fn button_press_shows_loading_then_increments() {
    let scope = FeatureScope::new();
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let model = CounterModel::new(&Config::default(), registry, &scope);
    let mut states = model.states();
    expect_state(&mut states).await;

    model.accept(UiEvent::ButtonInc).unwrap();
    assert_eq!(expect_state(&mut states).await, counter(true, 0));
    // Success only arrives after the configured step delay.
    expect_no_state(&mut states).await;
    assert_eq!(expect_state(&mut states).await, counter(false, 1));
}

#[tokio::test]
async fn counter_stream_skips_unchanged_values() {
    let scope = FeatureScope::new();
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let model = CounterModel::new(&fast_config(), registry, &scope);
    let mut values = Box::pin(model.counter());

    assert_eq!(next_value(&mut values).await, Some(0));
    model.accept(UiEvent::ButtonInc).unwrap();
    model.accept(UiEvent::ButtonInc).unwrap();
    // Loading states keep the value and are not repeated.
    assert_eq!(next_value(&mut values).await, Some(1));
    assert_eq!(next_value(&mut values).await, Some(2));
}

#[tokio::test]
async fn counter_survives_restart_through_memory_registry() {
    let first_registry = Arc::new(MemorySavedStateRegistry::new());
    {
        let scope = FeatureScope::new();
        let model = CounterModel::new(&fast_config(), first_registry.clone(), &scope);
        increment(&model).await;
        increment(&model).await;
        assert_eq!(first_registry.perform_save(), 1);
        scope.cancel();
    }

    let second_registry = Arc::new(MemorySavedStateRegistry::from_saved(first_registry.saved()));
    let scope = FeatureScope::new();
    let model = CounterModel::new(&fast_config(), second_registry, &scope);
    assert_eq!(model.value(), counter(false, 2));

    increment(&model).await;
    assert_eq!(model.value(), counter(false, 3));
}

#[tokio::test]
async fn counter_survives_restart_through_file_registry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("saved_state.json");

    {
        let registry = Arc::new(FileSavedStateRegistry::open(&path));
        let scope = FeatureScope::new();
        let model = CounterModel::new(&fast_config(), registry.clone(), &scope);
        for _ in 0..3 {
            increment(&model).await;
        }
        assert_eq!(registry.perform_save().unwrap(), 1);
    }
    assert!(path.exists());

    let registry = Arc::new(FileSavedStateRegistry::open(&path));
    let scope = FeatureScope::new();
    let model = CounterModel::new(&fast_config(), registry, &scope);
    assert_eq!(model.value(), counter(false, 3));
}

#[tokio::test]
async fn loading_flag_is_not_restored() {
    let registry = Arc::new(MemorySavedStateRegistry::from_saved(
        [(
            "CounterState".to_string(),
            Snapshot::new().with("counter", &7i64).unwrap(),
        )]
        .into_iter()
        .collect(),
    ));
    let scope = FeatureScope::new();
    let model = CounterModel::new(&fast_config(), registry, &scope);
    assert_eq!(model.value(), counter(false, 7));
}

#[tokio::test]
async fn mismatched_snapshot_falls_back_to_default() {
    let registry = Arc::new(MemorySavedStateRegistry::from_saved(
        [(
            "CounterState".to_string(),
            Snapshot::new().with("counter", "seven").unwrap(),
        )]
        .into_iter()
        .collect(),
    ));
    let scope = FeatureScope::new();
    let model = CounterModel::new(&fast_config(), registry, &scope);
    assert_eq!(model.value(), CounterState::default());
}

#[tokio::test]
async fn custom_key_keeps_models_apart() {
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let mut other = fast_config();
    other.saved_state.key = "OtherCounter".to_string();

    let scope = FeatureScope::new();
    let first = CounterModel::new(&fast_config(), registry.clone(), &scope);
    let second = CounterModel::new(&other, registry.clone(), &scope);
    increment(&first).await;

    assert_eq!(registry.perform_save(), 2);
    let saved = registry.saved();
    assert_eq!(saved["CounterState"].get::<i64>("counter"), Some(1));
    assert_eq!(saved["OtherCounter"].get::<i64>("counter"), Some(0));
    drop(second);
}

#[tokio::test]
async fn dropping_the_model_unregisters_its_provider() {
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let scope = FeatureScope::new();
    let model = CounterModel::new(&fast_config(), registry.clone(), &scope);
    drop(model);
    assert_eq!(registry.perform_save(), 0);
    assert!(registry.get("CounterState").is_none());
}

#[tokio::test]
async fn milestone_news_is_published() {
    let mut config = fast_config();
    config.counter.milestone = 2;
    let scope = FeatureScope::new();
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let model = CounterModel::new(&config, registry, &scope);
    let mut news = model.news();

    increment(&model).await;
    expect_no_news(&mut news).await;
    increment(&model).await;
    assert_eq!(
        expect_news(&mut news).await,
        CounterNews::Milestone { counter: 2 }
    );
}

#[tokio::test]
async fn rebuilt_model_keeps_saving_after_the_old_one_is_dropped() {
    let registry = Arc::new(MemorySavedStateRegistry::new());
    let scope = FeatureScope::new();
    let old = CounterModel::new(&fast_config(), registry.clone(), &scope);
    increment(&old).await;

    let rebuilt = CounterModel::new(&fast_config(), registry.clone(), &scope);
    increment(&rebuilt).await;
    increment(&rebuilt).await;
    drop(old);

    assert_eq!(registry.perform_save(), 1);
    let snapshot = registry.get("CounterState").expect("saved");
    assert_eq!(snapshot.get::<i64>("counter"), Some(2));
}
