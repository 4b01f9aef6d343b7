use async_trait::async_trait;
use faas_core::{
    Action, ActionConfig, ActionOutput, DynAction, ErrorKind, ExecutionError, FaasError,
    FaasResult, Payload,
};
use faas_registry::Registry;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    validated: AtomicUsize,
    executed: AtomicUsize,
}

struct MockFunction {
    name: String,
    fail_validation: bool,
    fail_execution: bool,
    counters: Arc<Counters>,
}

impl MockFunction {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_validation: false,
            fail_execution: false,
            counters: Arc::new(Counters::default()),
        }
    }

    fn failing_validation(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    fn failing_execution(mut self) -> Self {
        self.fail_execution = true;
        self
    }
}

#[async_trait]
impl Action for MockFunction {
    type Input = Option<String>;

    fn config(&self) -> ActionConfig {
        ActionConfig::new(self.name.clone())
    }

    fn parse_payload(&self, payload: &Payload) -> FaasResult<Option<String>> {
        payload.optional_str("tag")
    }

    fn validate(&self, _input: &Option<String>) -> FaasResult<()> {
        self.counters.validated.fetch_add(1, Ordering::SeqCst);
        if self.fail_validation {
            return Err(FaasError::validation("validation error"));
        }
        Ok(())
    }

    async fn execute(&self, input: Option<String>) -> FaasResult<ActionOutput> {
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        if self.fail_execution {
            return Err(ExecutionError::provider("mock", "execution error").into());
        }
        Ok(ActionOutput::new(json!({ "name": self.name, "tag": input })))
    }
}

fn erased(action: MockFunction) -> Arc<dyn DynAction> {
    Arc::new(action)
}

#[tokio::test]
async fn register_then_execute_succeeds() {
    let mut registry = Registry::new();
    registry.register(MockFunction::new("test1")).unwrap();

    let output = registry
        .execute("test1", &Payload::new().with("tag", "a"))
        .await
        .unwrap();

    assert_eq!(output.payload(), &json!({ "name": "test1", "tag": "a" }));
    assert!(registry.contains("test1"));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn duplicate_registration_keeps_original() {
    let mut registry = Registry::new();
    let original = MockFunction::new("test1");
    let counters = original.counters.clone();
    registry.register(original).unwrap();

    let err = registry
        .register(MockFunction::new("test1").failing_execution())
        .unwrap_err();
    assert!(matches!(err, FaasError::DuplicateName(ref n) if n == "test1"));
    assert_eq!(err.to_string(), "function with name test1 already exists");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The first registration is still the one that runs
    registry.execute("test1", &Payload::new()).await.unwrap();
    assert_eq!(counters.executed.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn unknown_function_is_not_found() {
    let registry = Registry::new();
    let err = registry
        .execute("nonexistent", &Payload::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FaasError::NotFound(_)));
    assert!(err
        .to_string()
        .contains("function with name nonexistent does not exist"));
    assert_eq!(err.kind().http_status(), 404);
}

#[tokio::test]
async fn validation_failure_skips_execution() {
    let mut registry = Registry::new();
    let action = MockFunction::new("validate_fail").failing_validation();
    let counters = action.counters.clone();
    registry.register(action).unwrap();

    let err = registry
        .execute("validate_fail", &Payload::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "validation error");
    assert_eq!(counters.validated.load(Ordering::SeqCst), 1);
    assert_eq!(counters.executed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn parse_failure_skips_validation() {
    let mut registry = Registry::new();
    let action = MockFunction::new("strict");
    let counters = action.counters.clone();
    registry.register(action).unwrap();

    let err = registry
        .execute("strict", &Payload::new().with("tag", 7))
        .await
        .unwrap_err();

    assert!(matches!(err, FaasError::Parse { ref field, .. } if field == "tag"));
    assert_eq!(counters.validated.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn execution_failure_is_downstream() {
    let mut registry = Registry::new();
    registry
        .register(MockFunction::new("exec_fail").failing_execution())
        .unwrap();

    let err = registry
        .execute_json("exec_fail", json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.kind().http_status(), 502);
}

#[test]
fn batch_registration_is_all_or_nothing() {
    let mut registry = Registry::new();
    registry.register(MockFunction::new("existing")).unwrap();

    let err = registry
        .register_all(vec![
            erased(MockFunction::new("fresh")),
            erased(MockFunction::new("existing")),
        ])
        .unwrap_err();
    assert!(matches!(err, FaasError::DuplicateName(ref n) if n == "existing"));
    assert!(!registry.contains("fresh"));

    let err = registry
        .register_all(vec![
            erased(MockFunction::new("twice")),
            erased(MockFunction::new("twice")),
        ])
        .unwrap_err();
    assert!(matches!(err, FaasError::DuplicateName(_)));
    assert_eq!(registry.names(), vec!["existing".to_string()]);

    registry
        .register_all(vec![
            erased(MockFunction::new("b")),
            erased(MockFunction::new("a")),
        ])
        .unwrap();
    assert_eq!(registry.names(), vec!["a", "b", "existing"]);
}

#[test]
fn empty_name_is_rejected() {
    let mut registry = Registry::new();
    assert!(registry.register(MockFunction::new("")).is_err());
    assert!(registry.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_registry_handles_concurrent_calls() {
    let mut registry = Registry::new();
    let action = MockFunction::new("shared");
    let counters = action.counters.clone();
    registry.register(action).unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let payload = Payload::new().with("tag", format!("call-{}", i));
                let output = registry.execute("shared", &payload).await.unwrap();
                assert_eq!(output.payload()["tag"], json!(format!("call-{}", i)));
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(counters.executed.load(Ordering::SeqCst), 16);
}
