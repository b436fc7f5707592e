use crate::mvi::Intent;

/// What the host asks the counter to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterWish {
    IncrementCounter,
}

impl Intent for CounterWish {}

/// Internal form of a counter wish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterAction {
    IncrementCounter,
}

impl Intent for CounterAction {}

pub fn wish_to_action(wish: CounterWish) -> CounterAction {
    match wish {
        CounterWish::IncrementCounter => CounterAction::IncrementCounter,
    }
}
