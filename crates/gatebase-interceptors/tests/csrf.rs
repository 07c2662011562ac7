use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use futures::FutureExt;
use gatebase_errors::prelude::codes;
use gatebase_interceptors::prelude::*;
use gatebase_types::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct MockCall {
    method: String,
    metadata: HashMap<String, String>,
    body: serde_json::Value,
}

impl MockCall {
    fn new(method: &str) -> Self {
        Self {
            method: method.into(),
            metadata: HashMap::new(),
            body: json!({}),
        }
    }

    fn with_metadata(mut self, name: &str, value: &str) -> Self {
        self.metadata.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait::async_trait]
impl ProtoCall for MockCall {
    fn method(&self) -> &str {
        &self.method
    }

    fn metadata(&self, name: &str) -> Option<String> {
        self.metadata.get(name).cloned()
    }

    fn append_metadata(&mut self, name: &str, value: &str) {
        self.metadata.insert(name.to_string(), value.to_string());
    }

    async fn read_json(&mut self) -> Result<serde_json::Value, InterceptError> {
        Ok(self.body.clone())
    }
}

struct MockReply {
    status: u16,
    metadata: HashMap<String, String>,
    body: Option<serde_json::Value>,
}

impl MockReply {
    fn new() -> Self {
        Self {
            status: 0,
            metadata: HashMap::new(),
            body: None,
        }
    }
}

#[async_trait::async_trait]
impl ProtoReply for MockReply {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    fn insert_metadata(&mut self, name: &str, value: &str) {
        self.metadata.insert(name.to_string(), value.to_string());
    }

    async fn write_json(&mut self, body: &serde_json::Value) -> Result<(), InterceptError> {
        self.body = Some(body.clone());
        Ok(())
    }
}

const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const CHECKOUT: &str = "/v1/cart/checkout";

fn config(single_use: bool) -> GovernanceConfig {
    GovernanceConfig {
        auth: AuthConfig {
            secret: SECRET.into(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604800,
            issuer: "gatebase-test".into(),
        },
        rate: RateLimitConfig {
            capacity: 100,
            window_secs: 900,
            overrides: Vec::new(),
        },
        csrf: CsrfConfig {
            ttl_secs: 600,
            single_use,
            protected_methods: vec![CHECKOUT.to_string()],
        },
    }
}

fn subject(id: &str) -> Subject {
    Subject {
        kind: SubjectKind::User,
        subject_id: Id(id.into()),
        display: format!("{id}@example.com"),
        role: Role::None,
    }
}

async fn run_call(
    governance: &Governance,
    call: &mut MockCall,
) -> Result<(), InterceptError> {
    let mut reply = MockReply::new();
    governance
        .chain()
        .run_with_handler(CallContext::default(), call, &mut reply, |_, _| {
            async move { Ok(json!({"ok": true})) }.boxed()
        })
        .await
}

fn authenticated_checkout(governance: &Governance, user: &str) -> MockCall {
    let token = governance
        .codec()
        .issue_access(user, &format!("{user}@example.com"))
        .expect("token");
    MockCall::new(CHECKOUT)
        .with_metadata(header::AUTHORIZATION, &format!("Bearer {token}"))
        .with_metadata(header::REAL_IP, "10.0.0.1")
}

#[tokio::test]
async fn unprotected_methods_pass_untouched() {
    let governance = Governance::new(&config(false)).expect("governance");

    let mut call = MockCall::new("/v1/cart/view").with_metadata(header::REAL_IP, "10.0.0.1");
    run_call(&governance, &mut call).await.expect("no CSRF check");
}

#[tokio::test]
async fn protected_method_without_token_is_refused() {
    let governance = Governance::new(&config(false)).expect("governance");

    let mut call = authenticated_checkout(&governance, "u1");
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("token required");

    assert_eq!(err.code(), codes::CSRF_TOKEN_MISSING);
    assert_eq!(err.0.grpc_status, Some(3));
}

#[tokio::test]
async fn protected_method_without_identity_is_unauthenticated() {
    let governance = Governance::new(&config(false)).expect("governance");

    let mut call = MockCall::new(CHECKOUT)
        .with_metadata(header::REAL_IP, "10.0.0.1")
        .with_metadata(header::CSRF_TOKEN, "whatever");
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("identity required");

    assert_eq!(err.code(), codes::AUTH_UNAUTHENTICATED);
    assert_eq!(err.0.grpc_status, Some(16));
}

#[tokio::test]
async fn token_unknown_to_the_store_is_reported_missing() {
    let governance = Governance::new(&config(false)).expect("governance");

    let mut call = authenticated_checkout(&governance, "u1")
        .with_metadata(header::CSRF_TOKEN, "never-issued");
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("unknown token");

    assert_eq!(err.code(), codes::CSRF_TOKEN_MISSING);
}

#[tokio::test]
async fn token_bound_to_another_identity_is_rejected() {
    let governance = Governance::new(&config(false)).expect("governance");
    let token = governance.issue_csrf(&subject("u2")).await.expect("issue");

    let mut call =
        authenticated_checkout(&governance, "u1").with_metadata(header::CSRF_TOKEN, &token);
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("identity mismatch");

    assert_eq!(err.code(), codes::CSRF_TOKEN_REJECTED);
    assert_eq!(err.0.grpc_status, Some(7));
}

#[tokio::test]
async fn valid_token_is_reusable_until_ttl_by_default() {
    let governance = Governance::new(&config(false)).expect("governance");
    let token = governance.issue_csrf(&subject("u1")).await.expect("issue");

    for _ in 0..2 {
        let mut call =
            authenticated_checkout(&governance, "u1").with_metadata(header::CSRF_TOKEN, &token);
        run_call(&governance, &mut call).await.expect("valid token");
    }
}

#[tokio::test]
async fn single_use_token_is_consumed_on_success() {
    let governance = Governance::new(&config(true)).expect("governance");
    let token = governance.issue_csrf(&subject("u1")).await.expect("issue");

    let mut call =
        authenticated_checkout(&governance, "u1").with_metadata(header::CSRF_TOKEN, &token);
    run_call(&governance, &mut call).await.expect("first use");

    let mut call =
        authenticated_checkout(&governance, "u1").with_metadata(header::CSRF_TOKEN, &token);
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("second use");
    assert_eq!(err.code(), codes::CSRF_TOKEN_MISSING);
}

#[tokio::test]
async fn explicit_invalidation_removes_the_token() {
    let governance = Governance::new(&config(false)).expect("governance");
    let token = governance.issue_csrf(&subject("u1")).await.expect("issue");

    governance.invalidate_csrf(&token).await;

    let mut call =
        authenticated_checkout(&governance, "u1").with_metadata(header::CSRF_TOKEN, &token);
    let err = run_call(&governance, &mut call)
        .await
        .expect_err("invalidated token");
    assert_eq!(err.code(), codes::CSRF_TOKEN_MISSING);
}

#[test]
fn tokens_expire_after_the_ttl() {
    let store = MemoryCsrfStore::new(Duration::from_secs(600));
    let now = Instant::now();
    let token = store.issue_at("u1", now).expect("issue");

    assert!(store
        .validate_at(&token, "u1", now + Duration::from_secs(599))
        .is_ok());
    assert_eq!(
        store.validate_at(&token, "u1", now + Duration::from_secs(601)),
        Err(CsrfFailure::Expired)
    );
}

#[test]
fn token_for_identity_a_fails_for_identity_b() {
    let store = MemoryCsrfStore::new(Duration::from_secs(600));
    let now = Instant::now();
    let token = store.issue_at("u1", now).expect("issue");

    assert_eq!(
        store.validate_at(&token, "u2", now + Duration::from_secs(1)),
        Err(CsrfFailure::IdentityMismatch)
    );
}

#[test]
fn sweep_evicts_only_expired_tokens() {
    let store = MemoryCsrfStore::new(Duration::from_secs(600));
    let now = Instant::now();

    let old = store.issue_at("u1", now).expect("issue");
    let fresh = store
        .issue_at("u2", now + Duration::from_secs(500))
        .expect("issue");
    assert_eq!(store.tracked(), 2);

    assert_eq!(store.sweep_once(now + Duration::from_secs(601)), 1);
    assert_eq!(
        store.validate_at(&old, "u1", now + Duration::from_secs(601)),
        Err(CsrfFailure::Missing)
    );
    assert!(store
        .validate_at(&fresh, "u2", now + Duration::from_secs(601))
        .is_ok());
}

#[test]
fn issued_tokens_carry_256_bits_and_are_unique() {
    let store = MemoryCsrfStore::new(Duration::from_secs(600));
    let now = Instant::now();

    let first = store.issue_at("u1", now).expect("issue");
    let second = store.issue_at("u1", now).expect("issue");

    assert_ne!(first, second);
    assert_eq!(URL_SAFE_NO_PAD.decode(&first).expect("base64url").len(), 32);
}
