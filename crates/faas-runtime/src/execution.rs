use std::time::{Duration, Instant};

use faas_core::{ExecutionError, FaasError, Payload};
use faas_registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::RuntimeResult;

/// Options for function execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Caller-side limit on the whole invocation; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Result of function execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: Option<Value>,
    pub error: Option<String>,
    /// HTTP-style status classifying `error`
    pub error_status: Option<u16>,
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub execution_id: String,
    pub function: String,
    pub duration_ms: u64,
    pub timed_out: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ExecutionResult {
    fn failed(error: String, error_status: Option<u16>, metadata: ExecutionMetadata) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error),
            error_status,
            metadata,
        }
    }
}

/// Execute a registered function by name.
///
/// Unknown names and malformed payloads are returned as errors. Anything that
/// fails once the function has been invoked is reported in the returned
/// [`ExecutionResult`].
pub async fn execute_function(
    registry: &Registry,
    name: &str,
    input: Value,
    options: ExecutionOptions,
) -> RuntimeResult<ExecutionResult> {
    if !registry.contains(name) {
        return Err(FaasError::NotFound(name.to_string()).into());
    }
    let payload = Payload::from_value(input)?;

    let start_time = Instant::now();
    let mut metadata = ExecutionMetadata {
        execution_id: Uuid::new_v4().to_string(),
        function: name.to_string(),
        duration_ms: 0,
        timed_out: false,
        timestamp: chrono::Utc::now(),
    };

    tracing::info!(
        function = %name,
        execution_id = %metadata.execution_id,
        "Starting function execution"
    );

    let execution_future = registry.execute(name, &payload);
    let result = match options.timeout {
        Some(timeout) => match tokio::time::timeout(timeout, execution_future).await {
            Ok(result) => result,
            Err(_) => {
                metadata.duration_ms = start_time.elapsed().as_millis() as u64;
                metadata.timed_out = true;
                tracing::warn!(
                    function = %name,
                    execution_id = %metadata.execution_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Function execution timed out"
                );
                let error = ExecutionError::TimedOut {
                    service: name.to_string(),
                    after: timeout,
                };
                return Ok(ExecutionResult::failed(
                    error.to_string(),
                    Some(504),
                    metadata,
                ));
            }
        },
        None => execution_future.await,
    };

    metadata.duration_ms = start_time.elapsed().as_millis() as u64;

    match result {
        Ok(output) => {
            tracing::info!(
                function = %name,
                execution_id = %metadata.execution_id,
                duration_ms = metadata.duration_ms,
                "Function execution completed successfully"
            );
            let output = (!output.is_empty()).then(|| output.into_payload());
            Ok(ExecutionResult {
                success: true,
                output,
                error: None,
                error_status: None,
                metadata,
            })
        }
        Err(e) => {
            tracing::error!(
                function = %name,
                execution_id = %metadata.execution_id,
                duration_ms = metadata.duration_ms,
                error = %e,
                "Function execution failed"
            );
            let status = e.kind().http_status();
            Ok(ExecutionResult::failed(e.to_string(), Some(status), metadata))
        }
    }
}
