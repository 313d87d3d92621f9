// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod activation;
pub mod bundle;
pub mod call;
pub mod notify;
pub mod secrets;
pub mod sim;
pub mod store;
pub mod timer;
pub mod traced;

pub use activation::{
    ActivationAdapter, ActivationError, Capabilities, CommandActivator, NoOpActivationAdapter,
    SubscriptionProvider,
};
pub use bundle::{AdapterSet, Adapters};
pub use call::{CallStateAdapter, CommandCallState, NoOpCallStateAdapter};
pub use notify::{LogNotifyAdapter, NoOpNotifyAdapter, Notification, NotifyAdapter, NotifyError};
pub use secrets::{CommandSecretStore, NoOpSecretStoreAdapter, SecretError, SecretStoreAdapter};
pub use sim::{
    CommandSimStatus, NoOpSimStatusAdapter, SimStatusAdapter, SimStatusError, StatusSignal,
    StatusWatch, SupplyResult,
};
pub use store::{JsonStoreAdapter, StoreAdapter, StoreError};
pub use timer::{NoOpTimerAdapter, TimerAdapter, TimerError, TokioTimer, WakeFired};
pub use traced::{TracedActivationAdapter, TracedSimStatusAdapter, TracedTimerAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use activation::{ActivationCall, FakeActivationAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use bundle::FakeAdapters;
#[cfg(any(test, feature = "test-support"))]
pub use call::FakeCallStateAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use secrets::{FakeSecretStoreAdapter, SecretCall};
#[cfg(any(test, feature = "test-support"))]
pub use sim::{FakeSimStatusAdapter, SupplyCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::FakeStoreAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use timer::{FakeTimerAdapter, TimerCall};
