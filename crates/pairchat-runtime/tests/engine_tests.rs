//! Integration tests for the Pairchat runtime
//!
//! These tests drive a live runtime through its channels the way a transport
//! would: commands in, effects out, with real (but short) search timers.

use std::time::Duration;

use pairchat_runtime::{
    create_test_runtime, Actor, Category, ChatId, Command, Effect, EffectReceiver, Notice,
    PairchatConfig, Profile, RuntimeBuilder, RuntimeHandle,
};

// ----------------------------------------------------------------------------
// Test Utilities
// ----------------------------------------------------------------------------

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Receive the next outbound effect or panic
async fn next_effect(rx: &mut EffectReceiver) -> Effect {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for effect")
        .expect("effect channel closed")
}

/// Drain effects until a notice addressed to `to` arrives
async fn next_notice_to(rx: &mut EffectReceiver, to: ChatId) -> Notice {
    loop {
        if let Effect::Notify { to: dest, notice } = next_effect(rx).await {
            if dest == to {
                return notice;
            }
        }
    }
}

/// Drain effects until both participants have received their `Matched`
/// notice, in whichever order the engine emitted them
async fn expect_matched(rx: &mut EffectReceiver, x: ChatId, y: ChatId) {
    let mut pending = vec![x, y];
    while !pending.is_empty() {
        if let Effect::Notify {
            to,
            notice: Notice::Matched,
        } = next_effect(rx).await
        {
            pending.retain(|id| *id != to);
        }
    }
}

/// Assert no further effect arrives within a settle window
async fn assert_silent(rx: &mut EffectReceiver, window: Duration) {
    let res = tokio::time::timeout(window, rx.recv()).await;
    assert!(res.is_err(), "expected silence, got {res:?}");
}

async fn join(runtime: &RuntimeHandle, id: i64, category: Category) {
    runtime
        .send_command(Command::Join {
            id: ChatId::new(id),
            category,
        })
        .await
        .unwrap();
}

// ----------------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn opposite_joiners_both_receive_matched() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Searching
    );

    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    // Both queues ended empty: the admin report shows one session, no waiters
    runtime
        .send_command(Command::Stats {
            actor: Actor::admin(ChatId::new(99)),
        })
        .await
        .unwrap();
    match next_notice_to(&mut effects, ChatId::new(99)).await {
        Notice::StatsReport(report) => {
            assert_eq!(report.active_session_count, 1);
            assert!(report.queues.iter().all(|q| q.waiting.is_empty()));
        }
        other => panic!("expected stats report, got {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn text_is_forwarded_verbatim_between_partners() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    runtime
        .send_command(Command::Text {
            id: ChatId::new(1),
            text: "Hey! How are you?".to_string(),
        })
        .await
        .unwrap();

    loop {
        match next_effect(&mut effects).await {
            Effect::Deliver { to, text } => {
                assert_eq!(to, ChatId::new(2));
                assert_eq!(text, "Hey! How are you?");
                break;
            }
            Effect::Notify { .. } => continue,
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn lone_waiter_times_out_and_is_evicted() {
    let mut config = PairchatConfig::testing();
    config.matching.search_timeout_ms = 50;
    let mut runtime = RuntimeBuilder::new()
        .with_config(config)
        .build_and_start()
        .await
        .unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Searching
    );
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::SearchTimedOut
    );

    // Queue membership is cleared: an opposite joiner now waits instead of
    // matching the evicted participant.
    join(&runtime, 2, Category::Female).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(2)).await,
        Notice::Searching
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn matched_participant_is_not_evicted_by_stale_timer() {
    let mut config = PairchatConfig::testing();
    config.matching.search_timeout_ms = 100;
    let mut runtime = RuntimeBuilder::new()
        .with_config(config)
        .build_and_start()
        .await
        .unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    // Sit out the timer window; the cancelled timer must not evict anyone.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_silent(&mut effects, Duration::from_millis(100)).await;

    // The pair still routes text.
    runtime
        .send_command(Command::Text {
            id: ChatId::new(2),
            text: "still here".to_string(),
        })
        .await
        .unwrap();
    match next_effect(&mut effects).await {
        Effect::Deliver { to, .. } => assert_eq!(to, ChatId::new(1)),
        other => panic!("unexpected effect: {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn banned_participant_partner_is_released() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();
    let admin = Actor::admin(ChatId::new(99));

    join(&runtime, 1, Category::Male).await;
    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    runtime
        .send_command(Command::Ban {
            actor: admin,
            target: ChatId::new(1),
            reason: Some("spam".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(2)).await,
        Notice::PartnerLeft
    );
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Banned {
            reason: Some("spam".to_string())
        }
    );
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(99)).await,
        Notice::BanApplied {
            target: ChatId::new(1)
        }
    );

    // The banned participant cannot re-enter a queue
    join(&runtime, 1, Category::Male).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Banned {
            reason: Some("spam".to_string())
        }
    );

    // An opposite joiner finds nobody waiting
    join(&runtime, 3, Category::Female).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(3)).await,
        Notice::Searching
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn blocked_content_never_reaches_partner() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    runtime
        .send_command(Command::Text {
            id: ChatId::new(1),
            text: "you are such a badword2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::BlockedContent
    );
    // Nothing was forwarded to the partner
    assert_silent(&mut effects, Duration::from_millis(100)).await;

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancel_search_clears_queue_membership() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    next_notice_to(&mut effects, ChatId::new(1)).await; // Searching

    runtime
        .send_command(Command::CancelSearch { id: ChatId::new(1) })
        .await
        .unwrap();
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::SearchCancelled
    );

    join(&runtime, 2, Category::Female).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(2)).await,
        Notice::Searching
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn commands_in_text_are_never_forwarded() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    join(&runtime, 1, Category::Male).await;
    join(&runtime, 2, Category::Female).await;
    expect_matched(&mut effects, ChatId::new(1), ChatId::new(2)).await;

    runtime
        .send_command(Command::Text {
            id: ChatId::new(1),
            text: "/end".to_string(),
        })
        .await
        .unwrap();

    // Neither forwarded nor answered
    assert_silent(&mut effects, Duration::from_millis(100)).await;

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn register_greets_by_name() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();

    runtime
        .send_command(Command::Register {
            id: ChatId::new(1),
            profile: Profile::new(Some("Ann".to_string()), Some("ann_92".to_string())),
        })
        .await
        .unwrap();

    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Welcome {
            name: Some("Ann".to_string())
        }
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unauthorized_admin_commands_are_silently_dropped() {
    let mut runtime = create_test_runtime().await.unwrap();
    let mut effects = runtime.subscribe_effects();
    let impostor = Actor::participant(ChatId::new(5));

    runtime
        .send_command(Command::Ban {
            actor: impostor,
            target: ChatId::new(1),
            reason: None,
        })
        .await
        .unwrap();
    runtime
        .send_command(Command::Stats { actor: impostor })
        .await
        .unwrap();

    assert_silent(&mut effects, Duration::from_millis(100)).await;

    // The target was never actually banned
    join(&runtime, 1, Category::Male).await;
    assert_eq!(
        next_notice_to(&mut effects, ChatId::new(1)).await,
        Notice::Searching
    );

    runtime.shutdown().await.unwrap();
}
