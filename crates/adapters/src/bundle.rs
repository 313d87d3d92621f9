// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter bundle handed to the engine

use crate::activation::ActivationAdapter;
use crate::call::CallStateAdapter;
use crate::notify::NotifyAdapter;
use crate::secrets::SecretStoreAdapter;
use crate::sim::SimStatusAdapter;
use crate::store::StoreAdapter;
use crate::timer::TimerAdapter;

/// Collection of adapters for the engine
pub trait Adapters: Clone + Send + Sync + 'static {
    type Store: StoreAdapter;
    type Activation: ActivationAdapter;
    type CallState: CallStateAdapter;
    type Secrets: SecretStoreAdapter;
    type Timer: TimerAdapter;
    type SimStatus: SimStatusAdapter;
    type Notify: NotifyAdapter;

    fn store(&self) -> Self::Store;
    fn activation(&self) -> Self::Activation;
    fn call_state(&self) -> Self::CallState;
    fn secrets(&self) -> Self::Secrets;
    fn timer(&self) -> Self::Timer;
    fn sim_status(&self) -> Self::SimStatus;
    fn notify(&self) -> Self::Notify;
}

/// Adapters assembled from concrete parts
#[derive(Clone)]
pub struct AdapterSet<S, A, C, K, T, M, N> {
    pub store: S,
    pub activation: A,
    pub call_state: C,
    pub secrets: K,
    pub timer: T,
    pub sim_status: M,
    pub notify: N,
}

impl<S, A, C, K, T, M, N> Adapters for AdapterSet<S, A, C, K, T, M, N>
where
    S: StoreAdapter,
    A: ActivationAdapter,
    C: CallStateAdapter,
    K: SecretStoreAdapter,
    T: TimerAdapter,
    M: SimStatusAdapter,
    N: NotifyAdapter,
{
    type Store = S;
    type Activation = A;
    type CallState = C;
    type Secrets = K;
    type Timer = T;
    type SimStatus = M;
    type Notify = N;

    fn store(&self) -> S {
        self.store.clone()
    }

    fn activation(&self) -> A {
        self.activation.clone()
    }

    fn call_state(&self) -> C {
        self.call_state.clone()
    }

    fn secrets(&self) -> K {
        self.secrets.clone()
    }

    fn timer(&self) -> T {
        self.timer.clone()
    }

    fn sim_status(&self) -> M {
        self.sim_status.clone()
    }

    fn notify(&self) -> N {
        self.notify.clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAdapters;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    #![cfg_attr(coverage_nightly, coverage(off))]

    use super::Adapters;
    use crate::activation::FakeActivationAdapter;
    use crate::call::FakeCallStateAdapter;
    use crate::notify::FakeNotifyAdapter;
    use crate::secrets::FakeSecretStoreAdapter;
    use crate::sim::FakeSimStatusAdapter;
    use crate::store::FakeStoreAdapter;
    use crate::timer::FakeTimerAdapter;

    /// Fake adapters with call recording for testing
    #[derive(Clone, Default)]
    pub struct FakeAdapters {
        pub store: FakeStoreAdapter,
        pub activation: FakeActivationAdapter,
        pub call_state: FakeCallStateAdapter,
        pub secrets: FakeSecretStoreAdapter,
        pub timer: FakeTimerAdapter,
        pub sim_status: FakeSimStatusAdapter,
        pub notify: FakeNotifyAdapter,
    }

    impl FakeAdapters {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Adapters for FakeAdapters {
        type Store = FakeStoreAdapter;
        type Activation = FakeActivationAdapter;
        type CallState = FakeCallStateAdapter;
        type Secrets = FakeSecretStoreAdapter;
        type Timer = FakeTimerAdapter;
        type SimStatus = FakeSimStatusAdapter;
        type Notify = FakeNotifyAdapter;

        fn store(&self) -> FakeStoreAdapter {
            self.store.clone()
        }

        fn activation(&self) -> FakeActivationAdapter {
            self.activation.clone()
        }

        fn call_state(&self) -> FakeCallStateAdapter {
            self.call_state.clone()
        }

        fn secrets(&self) -> FakeSecretStoreAdapter {
            self.secrets.clone()
        }

        fn timer(&self) -> FakeTimerAdapter {
            self.timer.clone()
        }

        fn sim_status(&self) -> FakeSimStatusAdapter {
            self.sim_status.clone()
        }

        fn notify(&self) -> FakeNotifyAdapter {
            self.notify.clone()
        }
    }
}
