//! Chat adapter integration tests
//!
//! Exercise the session, directory, conversation, and presence services
//! together against the in-process remote.
//!
//! Run with: cargo test -p integration-tests --test adapter_tests

use buddy_core::{EventKind, Message, PresenceStatus, RemoteError};
use buddy_remote::{FetchOrder, RemoteOperation};
use buddy_service::{
    message_listener_id, ConversationStore, DirectoryService, Listener, PresenceTracker,
    ServiceError,
};
use integration_tests::{eventually, stored_message, ChatFixture};

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_login_twice_with_same_uid() {
    let fixture = ChatFixture::new().unwrap();
    let session = fixture.session();
    session.initialize().await.unwrap();

    let first = session.login("alice", "Alice").await.unwrap();
    let second = session.login("alice", "Alice").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(session.current_user().await.unwrap().uid, "alice");
}

#[tokio::test]
async fn test_failed_initialize_is_not_retried() {
    let fixture = ChatFixture::new().unwrap();
    fixture
        .remote
        .fail_next(RemoteOperation::Init, RemoteError::transport("dns failure"));
    let session = fixture.session();

    for _ in 0..3 {
        let err = session.initialize().await.unwrap_err();
        assert!(matches!(err, ServiceError::Initialization(_)));
    }
    assert_eq!(fixture.remote.call_count(RemoteOperation::Init), 1);

    let err = session.login("alice", "Alice").await.unwrap_err();
    assert!(matches!(err, ServiceError::Login(RemoteError::NotInitialized)));
}

#[tokio::test]
async fn test_logout_then_current_user() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let session = fixture.session();

    session.logout().await;

    assert!(session.current_user().await.is_none());
    assert!(session.cached_user().is_none());
}

// ============================================================================
// Conversation
// ============================================================================

#[tokio::test]
async fn test_end_to_end_conversation() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    fixture.remote.seed_message(stored_message("1", "did you finish the set?", "bob", "alice", 10));
    fixture.remote.seed_message(stored_message("2", "almost", "alice", "bob", 20));
    fixture.remote.seed_message(stored_message("3", "question 4 is hard", "bob", "alice", 30));
    let store = ConversationStore::new(&fixture.ctx);

    let history = store.fetch_history("bob", Some(50)).await.unwrap();
    let ids: Vec<&str> = history.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let sent = store
        .send(Some("bob"), "try the substitution")
        .await
        .unwrap()
        .unwrap();

    let history = store.history("bob");
    assert_eq!(history.len(), 4);
    assert_eq!(history.last().map(|m| m.text.as_str()), Some("try the substitution"));
    assert_eq!(history.last().map(|m| m.id.clone()), Some(sent.id));
}

#[tokio::test]
async fn test_history_is_ascending_regardless_of_remote_order() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    fixture.remote.set_fetch_order(FetchOrder::Stored);
    for (id, secs) in [("b", 20), ("c", 30), ("a", 10), ("d", 40)] {
        fixture.remote.seed_message(stored_message(id, id, "bob", "alice", secs));
    }
    let store = ConversationStore::new(&fixture.ctx);

    let history = store.fetch_history("bob", None).await.unwrap();

    assert!(history.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    assert_eq!(history.first().map(|m| m.id.as_str()), Some("a"));
}

#[tokio::test]
async fn test_blank_send_does_nothing() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let store = ConversationStore::new(&fixture.ctx);
    store.open("bob").await.unwrap();

    assert_eq!(store.send(Some("bob"), "").await.unwrap(), None);
    assert_eq!(store.send(Some("bob"), " \t ").await.unwrap(), None);

    assert_eq!(fixture.remote.call_count(RemoteOperation::SendMessage), 0);
    assert!(store.history("bob").is_empty());
}

#[tokio::test]
async fn test_send_failure_is_reported() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let store = ConversationStore::new(&fixture.ctx);
    fixture
        .remote
        .fail_next(RemoteOperation::SendMessage, RemoteError::api("ERR_BLOCKED", "blocked"));

    let err = store.send(Some("bob"), "hello").await.unwrap_err();

    assert_eq!(err.error_code(), "SEND_ERROR");
    assert_eq!(err.remote().map(RemoteError::code), Some("ERR_BLOCKED"));
    assert!(store.history("bob").is_empty());
}

#[tokio::test]
async fn test_incoming_messages_while_open() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let store = ConversationStore::new(&fixture.ctx);
    store.open("bob").await.unwrap();

    fixture.remote.deliver("bob", "first").unwrap();
    fixture.remote.deliver("bob", "second").unwrap();
    fixture.remote.deliver("carol", "elsewhere").unwrap();

    assert!(eventually(|| store.history("bob").len() == 2).await);
    let texts: Vec<String> = store.history("bob").into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn test_echoed_own_message_is_not_duplicated() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    fixture.remote.echo_own_messages(true);
    let store = ConversationStore::new(&fixture.ctx);
    store.open("bob").await.unwrap();

    store.send(Some("bob"), "one").await.unwrap();
    store.send(Some("bob"), "two").await.unwrap();
    fixture.remote.deliver("bob", "three").unwrap();

    assert!(eventually(|| store.history("bob").len() >= 3).await);
    let texts: Vec<String> = store.history("bob").into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_closing_conversation_stops_delivery() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let store = ConversationStore::new(&fixture.ctx);
    store.open("bob").await.unwrap();
    store.close();

    assert!(!fixture
        .ctx
        .registry()
        .contains(EventKind::Message, &message_listener_id("bob")));

    // A second, independent listener tells us when the event has been pumped
    let seen = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = seen.clone();
    let _probe = fixture.ctx.registry().add_listener(Listener::message(move |_: &Message| {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
    }));

    fixture.remote.deliver("bob", "too late").unwrap();

    assert!(eventually(|| seen.load(std::sync::atomic::Ordering::SeqCst)).await);
    assert!(store.history("bob").is_empty());
}

// ============================================================================
// Presence and directory
// ============================================================================

#[tokio::test]
async fn test_presence_net_effect() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let presence = PresenceTracker::start(&fixture.ctx);

    fixture.remote.set_online("bob");
    fixture.remote.set_online("carol");
    fixture.remote.set_offline("bob");

    assert!(eventually(|| presence.online_users() == vec!["carol".to_string()]).await);
    assert_eq!(presence.status("bob"), PresenceStatus::Offline);
}

#[tokio::test]
async fn test_roster() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let presence = PresenceTracker::start(&fixture.ctx);
    fixture.remote.set_online("carol");
    assert!(eventually(|| presence.is_online("carol")).await);

    let roster = DirectoryService::new(&fixture.ctx).roster(&presence).await.unwrap();

    let rows: Vec<(&str, bool)> = roster.iter().map(|r| (r.uid.as_str(), r.is_online())).collect();
    assert_eq!(rows, vec![("bob", false), ("carol", true)]);
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_unsubscribe_unknown_listener() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let _presence = PresenceTracker::start(&fixture.ctx);
    let registry = fixture.ctx.registry();

    assert!(!registry.unsubscribe(EventKind::Message, "NOT_REGISTERED"));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_replaced_subscription_guard() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let registry = fixture.ctx.registry();

    let old = registry.subscribe("chat", Listener::message(|_: &Message| {}));
    let _new = registry.subscribe("chat", Listener::message(|_: &Message| {}));
    drop(old);

    assert!(registry.contains(EventKind::Message, "chat"));
}

#[tokio::test]
async fn test_shutdown() {
    let fixture = ChatFixture::logged_in("alice", "Alice").await.unwrap();
    let _presence = PresenceTracker::start(&fixture.ctx);
    assert!(fixture.ctx.is_pump_running());

    fixture.ctx.shutdown();

    assert!(!fixture.ctx.is_pump_running());
    assert!(fixture.ctx.registry().is_empty());
    assert!(fixture.ctx.current_user().is_none());
}
