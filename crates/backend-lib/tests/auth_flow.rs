//! End-to-end authentication flow through the facade.
use std::sync::Arc;
use std::time::Duration;

use backend_lib::credential;
use backend_lib::identity::{MemoryIdentityStore, SubjectRecord};
use backend_lib::service_impl::DefaultAuth;
use backend_lib::{AuthOutcome, AuthService};
use examseat_common::{Role, SubjectKind};
use uuid::Uuid;

fn seeded_store() -> Arc<MemoryIdentityStore> {
    let store = Arc::new(MemoryIdentityStore::new());
    store.insert(SubjectRecord {
        subject_id: Uuid::new_v4(),
        identifier: "a@x.edu".to_string(),
        kind: SubjectKind::Learner,
        privileged: false,
        display_name: "Ada Lovelace".to_string(),
        active: true,
        secret_digest: credential::hash("Str0ng!Pass").unwrap(),
    });
    store
}

#[tokio::test]
async fn test_full_login_lifecycle() {
    let auth = DefaultAuth::new(
        seeded_store(),
        Duration::from_secs(30 * 60),
        Duration::from_secs(7 * 24 * 60 * 60),
    );

    // Wrong secret is rejected, not an error
    let rejected = auth
        .authenticate("a@x.edu", "wrong", SubjectKind::Learner)
        .await
        .unwrap();
    assert!(!rejected.is_granted());

    // Correct secret grants a session
    let AuthOutcome::Granted(grant) = auth
        .authenticate("a@x.edu", "Str0ng!Pass", SubjectKind::Learner)
        .await
        .unwrap()
    else {
        panic!("expected grant");
    };
    assert_eq!(grant.role, Role::Learner);
    assert!(!grant.session_id.is_empty());

    // The session resolves with the learner's identity
    let view = auth.resolve_session(&grant.session_id).await.unwrap();
    assert_eq!(view.role, Role::Learner);
    assert_eq!(view.subject_kind, SubjectKind::Learner);
    assert_eq!(view.display_name, "Ada Lovelace");
    assert_eq!(view.email, "a@x.edu");

    // Logout, then the handle is dead
    auth.terminate_session(&grant.session_id).await;
    assert!(auth.resolve_session(&grant.session_id).await.is_none());
}

#[tokio::test]
async fn test_sessions_are_isolated_per_login() {
    let auth = DefaultAuth::new(
        seeded_store(),
        Duration::from_secs(30 * 60),
        Duration::from_secs(7 * 24 * 60 * 60),
    );

    let AuthOutcome::Granted(first) = auth
        .authenticate("a@x.edu", "Str0ng!Pass", SubjectKind::Learner)
        .await
        .unwrap()
    else {
        panic!("expected grant");
    };
    let AuthOutcome::Granted(second) = auth
        .authenticate("a@x.edu", "Str0ng!Pass", SubjectKind::Learner)
        .await
        .unwrap()
    else {
        panic!("expected grant");
    };
    assert_ne!(first.session_id, second.session_id);

    auth.terminate_session(&first.session_id).await;
    assert!(auth.resolve_session(&second.session_id).await.is_some());
}

#[tokio::test]
async fn test_short_ttl_session_expires_without_activity() {
    let auth = DefaultAuth::new(
        seeded_store(),
        Duration::from_millis(80),
        Duration::from_secs(7 * 24 * 60 * 60),
    );

    let AuthOutcome::Granted(grant) = auth
        .authenticate("a@x.edu", "Str0ng!Pass", SubjectKind::Learner)
        .await
        .unwrap()
    else {
        panic!("expected grant");
    };

    // Activity inside the window keeps it alive past one full ttl
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(auth.resolve_session(&grant.session_id).await.is_some());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(auth.resolve_session(&grant.session_id).await.is_some());

    // Going idle past the window kills it
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(auth.resolve_session(&grant.session_id).await.is_none());
}

#[tokio::test]
async fn test_remember_token_prefills_but_never_logs_in() {
    let auth = DefaultAuth::new(
        seeded_store(),
        Duration::from_secs(30 * 60),
        Duration::from_secs(7 * 24 * 60 * 60),
    );

    let grant = auth.issue_remember_token("a@x.edu").await.unwrap();
    assert_eq!(
        auth.resolve_remember_token(&grant.token).await.as_deref(),
        Some("a@x.edu")
    );

    // Presenting the token as a secret must not authenticate
    let outcome = auth
        .authenticate("a@x.edu", &grant.token, SubjectKind::Learner)
        .await
        .unwrap();
    assert!(!outcome.is_granted());
}
