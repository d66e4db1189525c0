//! JSON-RPC request matching over a framed transport.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::error::{AdapterError, TransportError};
use super::jsonrpc::{
    IncomingNotification, IncomingRequest, JsonRpcAcknowledgement, JsonRpcMessage,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
};
use super::lifecycle::ADAPTER_TARGET;
use super::transport::StdioTransport;

/// Maximum number of frames read while waiting for a matching response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// JSON-RPC endpoint that keeps server pushes for later.
///
/// Pushes that arrive while a request is outstanding are queued and handed
/// out by [`JsonRpcChannel::next_notification`] in arrival order.
#[derive(Debug)]
pub struct JsonRpcChannel<R, W> {
    transport: StdioTransport<R, W>,
    pending: VecDeque<IncomingNotification>,
    next_id: i64,
}

impl<R: BufRead, W: Write> JsonRpcChannel<R, W> {
    /// Wraps a transport.
    #[must_use]
    pub const fn new(transport: StdioTransport<R, W>) -> Self {
        Self {
            transport,
            pending: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &StdioTransport<R, W> {
        &self.transport
    }

    /// Sends a request and decodes its result.
    ///
    /// # Errors
    ///
    /// Returns an error when the exchange fails, the server answers with an
    /// error object, or the result does not decode as `T`.
    pub fn request<P, T>(&mut self, method: &str, params: P) -> Result<T, AdapterError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let response = self.request_raw(method, params)?;
        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(AdapterError::from)
    }

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or writing fails.
    pub fn notify<P>(&mut self, method: &str, params: P) -> Result<(), AdapterError>
    where
        P: Serialize,
    {
        let params = encode_params(params)?;
        let payload = serde_json::to_vec(&JsonRpcNotification::new(method, params))?;
        debug!(target: ADAPTER_TARGET, method, "sending notification");
        self.transport.send(&payload)?;
        Ok(())
    }

    /// Next server push, queued or freshly read; `None` once the stream closes.
    ///
    /// # Errors
    ///
    /// Returns an error when a frame cannot be read or decoded.
    pub fn next_notification(&mut self) -> Result<Option<IncomingNotification>, AdapterError> {
        if let Some(queued) = self.pending.pop_front() {
            return Ok(Some(queued));
        }
        loop {
            let bytes = match self.transport.receive() {
                Ok(bytes) => bytes,
                Err(TransportError::Closed) => return Ok(None),
                Err(error) => return Err(error.into()),
            };
            match JsonRpcMessage::from_bytes(&bytes)? {
                JsonRpcMessage::Notification(notification) => return Ok(Some(notification)),
                JsonRpcMessage::ServerRequest(request) => self.acknowledge(request)?,
                JsonRpcMessage::Response(response) => {
                    warn!(
                        target: ADAPTER_TARGET,
                        id = ?response.id,
                        "discarding unsolicited response"
                    );
                }
            }
        }
    }

    /// Number of pushes waiting to be handed out.
    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.pending.len()
    }

    fn request_raw<P>(&mut self, method: &str, params: P) -> Result<JsonRpcResponse, AdapterError>
    where
        P: Serialize,
    {
        let id = self.next_id;
        self.next_id += 1;
        let params = encode_params(params)?;
        let payload = serde_json::to_vec(&JsonRpcRequest::new(id, method, params))?;

        debug!(target: ADAPTER_TARGET, method, id, "sending request");
        self.transport.send(&payload)?;

        let response = self.receive_response(id)?;
        if let Some(error) = response.error {
            return Err(AdapterError::from_jsonrpc(error));
        }
        Ok(response)
    }

    fn receive_response(&mut self, request_id: i64) -> Result<JsonRpcResponse, AdapterError> {
        for _ in 0..MAX_RESPONSE_ITERATIONS {
            let bytes = self.transport.receive()?;
            match JsonRpcMessage::from_bytes(&bytes)? {
                JsonRpcMessage::Response(response) if response.id == Some(request_id) => {
                    return Ok(response);
                }
                JsonRpcMessage::Response(response) => {
                    warn!(
                        target: ADAPTER_TARGET,
                        expected = request_id,
                        received = ?response.id,
                        "skipping response with non-matching ID"
                    );
                }
                JsonRpcMessage::ServerRequest(request) => self.acknowledge(request)?,
                JsonRpcMessage::Notification(notification) => {
                    trace!(
                        target: ADAPTER_TARGET,
                        method = %notification.method,
                        "queueing notification received while awaiting response"
                    );
                    self.pending.push_back(notification);
                }
            }
        }
        warn!(
            target: ADAPTER_TARGET,
            request_id,
            max_iterations = MAX_RESPONSE_ITERATIONS,
            "giving up on response after reaching maximum iterations"
        );
        Err(AdapterError::NoResponse { request_id })
    }

    fn acknowledge(&mut self, request: IncomingRequest) -> Result<(), AdapterError> {
        debug!(
            target: ADAPTER_TARGET,
            method = %request.method,
            id = %request.id,
            "acknowledging server request"
        );
        let payload = serde_json::to_vec(&JsonRpcAcknowledgement::null(request.id))?;
        self.transport.send(&payload)?;
        Ok(())
    }
}

/// Encodes parameters, omitting them entirely when they serialise to `null`.
fn encode_params<P: Serialize>(params: P) -> Result<Option<Value>, serde_json::Error> {
    let value = serde_json::to_value(params)?;
    Ok(Some(value).filter(|value| !value.is_null()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    type MemoryChannel = JsonRpcChannel<Cursor<Vec<u8>>, Vec<u8>>;

    fn frame(value: &Value) -> Vec<u8> {
        let body = serde_json::to_vec(value).expect("encode frame");
        let mut framed = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
        framed.extend(body);
        framed
    }

    fn channel(frames: &[Value]) -> MemoryChannel {
        let input: Vec<u8> = frames.iter().flat_map(frame).collect();
        JsonRpcChannel::new(StdioTransport::new(Cursor::new(input), Vec::new()))
    }

    fn written(channel: &MemoryChannel) -> String {
        String::from_utf8(channel.transport().writer().clone()).expect("utf-8 output")
    }

    #[rstest]
    fn request_returns_matching_result() {
        let mut channel = channel(&[json!({"jsonrpc": "2.0", "id": 1, "result": {"ok": true}})]);

        let result: Value = channel.request("initialize", json!({})).expect("request");

        assert_eq!(result, json!({"ok": true}));
        assert!(written(&channel).contains(r#""method":"initialize""#));
    }

    #[rstest]
    fn notifications_during_request_are_queued_in_order() {
        let mut channel = channel(&[
            json!({"jsonrpc": "2.0", "method": "PIDE/progress", "params": {"nodes-status": []}}),
            json!({"jsonrpc": "2.0", "method": "PIDE/dynamic_output", "params": {"content": ""}}),
            json!({"jsonrpc": "2.0", "id": 1, "result": null}),
        ]);

        let _: Value = channel.request("shutdown", ()).expect("request");

        assert_eq!(channel.pending_notifications(), 2);
        let first = channel.next_notification().expect("read").expect("queued");
        let second = channel.next_notification().expect("read").expect("queued");
        assert_eq!(first.method, "PIDE/progress");
        assert_eq!(second.method, "PIDE/dynamic_output");
        assert!(channel.next_notification().expect("read").is_none());
    }

    #[rstest]
    fn error_response_becomes_server_error() {
        let mut channel = channel(&[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        })]);

        let result: Result<Value, _> = channel.request("bogus", ());

        assert!(matches!(
            result,
            Err(AdapterError::Rejected { code: -32601, .. })
        ));
    }

    #[rstest]
    fn server_requests_are_acknowledged_with_null() {
        let mut channel = channel(&[
            json!({"jsonrpc": "2.0", "id": 40, "method": "client/registerCapability"}),
            json!({"jsonrpc": "2.0", "method": "PIDE/decoration", "params": {}}),
        ]);

        let notification = channel.next_notification().expect("read").expect("push");

        assert_eq!(notification.method, "PIDE/decoration");
        assert!(written(&channel).contains(r#"{"jsonrpc":"2.0","id":40,"result":null}"#));
    }

    #[rstest]
    fn request_fails_when_stream_closes() {
        let mut channel = channel(&[]);

        let result: Result<Value, _> = channel.request("initialize", ());

        assert!(matches!(
            result,
            Err(AdapterError::Transport(TransportError::Closed))
        ));
    }

    #[rstest]
    fn unit_params_are_omitted() {
        let mut channel = channel(&[]);

        channel.notify("PIDE/progress_request", ()).expect("notify");

        let output = written(&channel);
        assert!(output.ends_with(r#"{"jsonrpc":"2.0","method":"PIDE/progress_request"}"#));
    }

    #[rstest]
    fn request_ids_increase() {
        let mut channel = channel(&[
            json!({"jsonrpc": "2.0", "id": 1, "result": null}),
            json!({"jsonrpc": "2.0", "id": 2, "result": null}),
        ]);

        let _: Value = channel.request("first", ()).expect("first");
        let _: Value = channel.request("second", ()).expect("second");

        let output = written(&channel);
        assert!(output.contains(r#""id":1"#));
        assert!(output.contains(r#""id":2"#));
    }
}
