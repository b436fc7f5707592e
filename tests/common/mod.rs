//! Shared test features and stream helpers.

#![allow(dead_code)]

use std::time::Duration;

use featureflow::mvi::{
    effects, Actor, EffectStream, Feature, FeatureState, Intent, NewsPublisher, NewsStream,
    Reducer, StateStream,
};
use featureflow::FeatureScope;

/// Upper bound for any single expected item.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing else is coming.
pub const QUIET_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestWish {
    Wish1,
    Wish2,
}

impl Intent for TestWish {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestAction {
    Action1,
    Action2,
    /// Only ever produced by post-processors.
    Bonus,
}

impl Intent for TestAction {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestEffect {
    StartLoading,
    Success { inc: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestState {
    pub loading: bool,
    pub value: i32,
}

impl FeatureState for TestState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestNews {
    Announce { message: String },
}

pub type TestFeature = Feature<TestWish, TestAction, TestEffect, TestState, TestNews>;

pub fn state(loading: bool, value: i32) -> TestState {
    TestState { loading, value }
}

pub struct TestReducer;

impl Reducer<TestState, TestEffect> for TestReducer {
    fn reduce(&self, state: &TestState, effect: &TestEffect) -> TestState {
        match effect {
            TestEffect::StartLoading => TestState {
                loading: true,
                ..state.clone()
            },
            TestEffect::Success { inc } => TestState {
                loading: false,
                value: state.value + inc,
            },
        }
    }
}

pub fn wish_to_action(wish: TestWish) -> TestAction {
    match wish {
        TestWish::Wish1 => TestAction::Action1,
        TestWish::Wish2 => TestAction::Action2,
    }
}

/// Action1 adds 1, Action2 adds 2 (each after a loading effect); Bonus adds
/// 100 with no loading effect. Ignores actions while loading.
pub struct TestActor;

impl Actor<TestState, TestAction, TestEffect> for TestActor {
    fn act(&self, state: &TestState, action: &TestAction) -> EffectStream<TestEffect> {
        if state.loading {
            return effects::none();
        }
        match action {
            TestAction::Action1 => effects::from_iter(vec![
                TestEffect::StartLoading,
                TestEffect::Success { inc: 1 },
            ]),
            TestAction::Action2 => effects::from_iter(vec![
                TestEffect::StartLoading,
                TestEffect::Success { inc: 2 },
            ]),
            TestAction::Bonus => effects::just(TestEffect::Success { inc: 100 }),
        }
    }
}

/// Announces odd values after a successful effect.
pub struct SnackMessagePublisher;

impl NewsPublisher<TestAction, TestEffect, TestState, TestNews> for SnackMessagePublisher {
    fn publish(
        &self,
        _action: &TestAction,
        effect: &TestEffect,
        state: &TestState,
    ) -> Option<TestNews> {
        match effect {
            TestEffect::Success { .. } if state.value % 2 != 0 => Some(TestNews::Announce {
                message: "Odd number, yaay!".to_string(),
            }),
            _ => None,
        }
    }
}

pub fn plain_feature(scope: &FeatureScope) -> TestFeature {
    Feature::new(
        TestState::default(),
        TestReducer,
        wish_to_action,
        TestActor,
        scope,
    )
}

pub fn feature_with_news_publisher(scope: &FeatureScope) -> TestFeature {
    Feature::builder(TestState::default(), TestReducer, wish_to_action, TestActor)
        .news_publisher(SnackMessagePublisher)
        .name("test-with-news")
        .spawn(scope)
}

pub async fn expect_state<S>(states: &mut StateStream<S>) -> S {
    tokio::time::timeout(RECV_TIMEOUT, states.recv())
        .await
        .expect("timed out waiting for state")
        .expect("state stream ended")
}

pub async fn expect_no_state<S: std::fmt::Debug>(states: &mut StateStream<S>) {
    if let Ok(item) = tokio::time::timeout(QUIET_PERIOD, states.recv()).await {
        panic!("expected no state, got {:?}", item);
    }
}

pub async fn expect_news<N: Clone + Send + 'static>(news: &mut NewsStream<N>) -> N {
    tokio::time::timeout(RECV_TIMEOUT, news.recv())
        .await
        .expect("timed out waiting for news")
        .expect("news stream ended")
}

pub async fn expect_no_news<N: Clone + Send + std::fmt::Debug + 'static>(news: &mut NewsStream<N>) {
    if let Ok(item) = tokio::time::timeout(QUIET_PERIOD, news.recv()).await {
        panic!("expected no news, got {:?}", item);
    }
}
