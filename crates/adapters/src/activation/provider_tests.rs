// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::activation::{ActivationCall, FakeActivationAdapter};

#[test]
fn select_follows_capability() {
    let modern = SubscriptionProvider::select(
        Capabilities {
            persistent_disable: true,
        },
        1,
        2,
    );
    assert!(modern.is_modern());

    let legacy = SubscriptionProvider::select(Capabilities::default(), 1, 2);
    assert!(!legacy.is_modern());
}

#[tokio::test]
async fn modern_forwards_keep_flag() {
    let fake = FakeActivationAdapter::new();
    let provider: SubscriptionProvider<_, FakeActivationAdapter> =
        SubscriptionProvider::Modern(fake.clone());

    provider.activate(ResourceId(2), false, true).await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![ActivationCall {
            resource_id: ResourceId(2),
            enabled: false,
            keep_disabled: true,
        }]
    );
}

#[tokio::test]
async fn legacy_never_persists_keep_flag() {
    let fake = FakeActivationAdapter::new();
    let provider: SubscriptionProvider<FakeActivationAdapter, _> =
        SubscriptionProvider::Legacy(fake.clone());

    provider.activate(ResourceId(2), false, true).await.unwrap();

    assert!(!fake.calls()[0].keep_disabled);
}
