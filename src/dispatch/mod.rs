//! Request dispatch: codec -> registry -> command -> response.
//!
//! `CommandDispatcher` is the in-process entry point once a transport has
//! produced a raw request string. Parse/validation failures answer without
//! touching the registry; command bodies block on the invocation bridge, so
//! they run on the blocking pool rather than an async worker.
//!
//! Notifications (requests without an id) are executed but never answered,
//! whatever the outcome.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::commands::CommandRegistry;
use crate::error::CommandError;
use crate::protocol::serializer;

/// Dispatches parsed-and-validated requests to registered commands.
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    /// The registry must be fully populated: registration is not safe
    /// against concurrent dispatch.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch one raw JSON-RPC request.
    ///
    /// Returns the serialized response, or `None` for notifications.
    pub async fn dispatch(&self, raw: &str) -> Option<String> {
        let request = match serializer::try_parse_request(raw) {
            Ok(request) => request,
            Err(error_response) => return Some(error_response),
        };

        let is_notification = request.is_notification();
        debug!(method = %request.method, id = ?request.id, "Dispatching request");

        let Some(command) = self.registry.lookup(&request.method) else {
            warn!(method = %request.method, "Unknown method");
            if is_notification {
                return None;
            }
            let err = CommandError::method_not_found(&request.method);
            return Some(serializer::error_response(request.id, err.code, err.message, None));
        };

        let params = request.params.clone().unwrap_or(Value::Null);
        let request_id = request.id.clone();
        let joined =
            tokio::task::spawn_blocking(move || command.execute(&params, request_id.as_deref()))
                .await;

        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(CommandError::internal(format!("command task failed: {}", e))),
        };

        if is_notification {
            if let Err(e) = &result {
                debug!(method = %request.method, code = e.code, "Notification failed: {}", e);
            }
            return None;
        }

        Some(match result {
            Ok(value) => serializer::success_response(request.id, value),
            Err(e) => {
                let CommandError { code, message, data } = e;
                serializer::error_response(request.id, code, message, data)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::protocol::error_codes;
    use serde_json::json;

    struct PingCommand;

    impl Command for PingCommand {
        fn name(&self) -> &str {
            "ping"
        }

        fn execute(&self, _params: &Value, _request_id: Option<&str>) -> Result<Value, CommandError> {
            Ok(json!("pong"))
        }
    }

    struct EchoCommand;

    impl Command for EchoCommand {
        fn name(&self) -> &str {
            "echo"
        }

        fn execute(&self, params: &Value, request_id: Option<&str>) -> Result<Value, CommandError> {
            Ok(json!({"params": params, "id": request_id}))
        }
    }

    struct FailingCommand;

    impl Command for FailingCommand {
        fn name(&self) -> &str {
            "fail"
        }

        fn execute(&self, _params: &Value, _request_id: Option<&str>) -> Result<Value, CommandError> {
            Err(CommandError::new(error_codes::DOCUMENT_NOT_AVAILABLE, "no active document")
                .with_data(json!({"retriable": false})))
        }
    }

    fn dispatcher() -> CommandDispatcher {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(PingCommand)).unwrap();
        registry.register(Arc::new(EchoCommand)).unwrap();
        registry.register(Arc::new(FailingCommand)).unwrap();
        CommandDispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_ping_roundtrip() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"ping","id":"1"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": "1", "result": "pong"}));
    }

    #[tokio::test]
    async fn test_id_is_preserved_verbatim() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"echo","params":{"a":1},"id":"req-007"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["id"], json!("req-007"));
        assert_eq!(value["result"]["params"], json!({"a": 1}));
        assert_eq!(value["result"]["id"], json!("req-007"));
    }

    #[tokio::test]
    async fn test_notification_yields_no_response() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"ping"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_notification_failure_yields_no_response() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"fail"}"#)
            .await;
        assert!(response.is_none());

        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"doesNotExist"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method_is_method_not_found() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"doesNotExist","id":"9"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(error_codes::METHOD_NOT_FOUND));
        assert_eq!(value["id"], json!("9"));
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_request() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"1.0","method":"ping","id":"1"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(error_codes::INVALID_REQUEST));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let response = dispatcher().dispatch("{oops").await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(error_codes::PARSE_ERROR));
        assert_eq!(value["id"], Value::Null);
    }

    mod end_to_end {
        use super::*;
        use crate::bridge::{EventBridge, HostScheduler, HostWork, ScheduleError};
        use crate::commands::decode_params;
        use crate::transaction::{
            FailurePolicy, FailureRecord, FailureResolution, TransactionHost, TransactionRunner,
            TransactionStatus,
        };
        use std::sync::mpsc;

        /// Toy host document with just enough transaction machinery.
        #[derive(Default)]
        struct Document {
            walls: Vec<f64>,
            open: bool,
        }

        impl TransactionHost for Document {
            fn begin(&mut self, _name: &str) -> bool {
                self.open = true;
                true
            }

            fn is_open(&self) -> bool {
                self.open
            }

            fn commit(&mut self) -> TransactionStatus {
                self.open = false;
                TransactionStatus::Committed
            }

            fn rollback(&mut self) -> TransactionStatus {
                self.open = false;
                TransactionStatus::RolledBack
            }

            fn take_failures(&mut self) -> Vec<FailureRecord> {
                Vec::new()
            }

            fn resolve(&mut self, _record: &FailureRecord, _resolution: FailureResolution) {}
        }

        struct ChannelScheduler {
            tx: mpsc::Sender<HostWork<Document>>,
        }

        impl HostScheduler<Document> for ChannelScheduler {
            fn signal(&self, work: HostWork<Document>) -> Result<(), ScheduleError> {
                self.tx
                    .send(work)
                    .map_err(|_| ScheduleError::new("host thread stopped"))
            }
        }

        #[derive(serde::Deserialize)]
        struct CreateWallParams {
            height: f64,
        }

        /// Mutating command: decodes params, hops to the host thread, and
        /// wraps the mutation in a transaction.
        struct CreateWallCommand {
            bridge: EventBridge<Document>,
        }

        impl Command for CreateWallCommand {
            fn name(&self) -> &str {
                "create_wall"
            }

            fn execute(
                &self,
                params: &Value,
                _request_id: Option<&str>,
            ) -> Result<Value, CommandError> {
                let params: CreateWallParams = decode_params(params)?;
                let height = params.height;
                self.bridge.invoke_for("create_wall", move |doc| {
                    let runner = TransactionRunner::new(FailurePolicy::default());
                    runner
                        .run(doc, "Create Wall", |doc| {
                            doc.walls.push(height);
                            Ok(())
                        })
                        .into_result()?;
                    Ok(json!({"index": doc.walls.len() - 1, "height": height}))
                })
            }
        }

        #[tokio::test]
        async fn test_full_flow_runs_on_host_thread() {
            let (tx, rx) = mpsc::channel::<HostWork<Document>>();
            let _host = std::thread::spawn(move || {
                let mut doc = Document::default();
                while let Ok(work) = rx.recv() {
                    work(&mut doc);
                }
                doc
            });

            let mut registry = CommandRegistry::new();
            registry
                .register(Arc::new(CreateWallCommand {
                    bridge: EventBridge::new(Arc::new(ChannelScheduler { tx })),
                }))
                .unwrap();
            let dispatcher = CommandDispatcher::new(Arc::new(registry));

            let response = dispatcher
                .dispatch(r#"{"jsonrpc":"2.0","method":"create_wall","params":{"height":3.2},"id":"w1"}"#)
                .await
                .unwrap();
            let value: Value = serde_json::from_str(&response).unwrap();
            assert_eq!(value["id"], json!("w1"));
            assert_eq!(value["result"]["index"], json!(0));
            assert_eq!(value["result"]["height"], json!(3.2));

            // Bad params never reach the host thread.
            let response = dispatcher
                .dispatch(r#"{"jsonrpc":"2.0","method":"create_wall","params":{"height":"tall"},"id":"w2"}"#)
                .await
                .unwrap();
            let value: Value = serde_json::from_str(&response).unwrap();
            assert_eq!(
                value["error"]["code"],
                json!(error_codes::PARAMETER_PARSING_FAILED)
            );
        }
    }

    #[tokio::test]
    async fn test_command_failure_maps_code_and_data() {
        let response = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"fail","id":"3"}"#)
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], json!(error_codes::DOCUMENT_NOT_AVAILABLE));
        assert_eq!(value["error"]["message"], json!("no active document"));
        assert_eq!(value["error"]["data"]["retriable"], json!(false));
        assert!(value.get("result").is_none());
    }
}
