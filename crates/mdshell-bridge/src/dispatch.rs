//! Host-side execution of capability calls made from the UI context.
//!
//! The UI stub for `fileUtils.isFile(p)` posts
//! `{"kind": "fileUtils::isFile", "payload": ["\"p\""], "_reqId": 3}`. The
//! dispatcher checks the kind against the operation tables, decodes the
//! arguments, runs the operation and answers on
//! [`channels::CAPABILITY_RESPONSE`].

use std::path::PathBuf;

use mdshell_common::{channels, new_correlation_id, BridgeError, CapabilityName};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::capability::{self, Capability, CapabilitySet, HostApi};
use crate::ipc::IpcMessage;
use crate::marshal::{decode_wire, encode, Arg};
use crate::relay::{EndpointSource, MessageRelay};

// =============================================================================
// ALLOWLIST
// =============================================================================

/// Split `<capability>::<operation>` into its parts.
pub fn parse_kind(kind: &str) -> Option<(CapabilityName, &str)> {
    let (cap, op) = kind.split_once("::")?;
    Some((CapabilityName::from_global_name(cap)?, op))
}

/// Whether `kind` names a capability rather than a message channel.
pub fn is_capability_kind(kind: &str) -> bool {
    parse_kind(kind).is_some()
}

/// Whether `kind` is one of the fixed capability operations.
pub fn is_operation_allowed(kind: &str) -> bool {
    parse_kind(kind).is_some_and(|(cap, op)| capability::operations(cap).contains(&op))
}

// =============================================================================
// ARGUMENTS
// =============================================================================

struct CallArgs<'a> {
    kind: &'a str,
    values: Vec<Value>,
}

impl<'a> CallArgs<'a> {
    fn new(kind: &'a str, raw: Vec<Value>) -> Self {
        Self {
            kind,
            values: raw.into_iter().map(decode_wire).collect(),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> BridgeError {
        BridgeError::InvalidArguments {
            op: self.kind.to_string(),
            reason: reason.into(),
        }
    }

    fn str_at(&self, index: usize) -> Result<&str, BridgeError> {
        match self.values.get(index) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(self.invalid(format!(
                "argument {index} must be a string, got {other}"
            ))),
            None => Err(self.invalid(format!("missing argument {index}"))),
        }
    }

    fn opt_str_at(&self, index: usize) -> Result<Option<&str>, BridgeError> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.str_at(index).map(Some),
        }
    }

    fn path_at(&self, index: usize) -> Result<PathBuf, BridgeError> {
        self.str_at(index).map(PathBuf::from)
    }

    /// Text, a byte array, or the `{"type": "Buffer", "data": [..]}` form.
    fn bytes_at(&self, index: usize) -> Result<Vec<u8>, BridgeError> {
        let data = match self.values.get(index) {
            Some(Value::String(s)) => return Ok(s.as_bytes().to_vec()),
            Some(Value::Object(obj)) if is_buffer(obj) => obj.get("data"),
            other => other,
        };
        match data {
            Some(Value::Array(items)) => items.iter().map(|v| self.byte(index, v)).collect(),
            Some(other) => Err(self.invalid(format!(
                "argument {index} must be text or bytes, got {other}"
            ))),
            None => Err(self.invalid(format!("missing argument {index}"))),
        }
    }

    fn byte(&self, index: usize, value: &Value) -> Result<u8, BridgeError> {
        value
            .as_u64()
            .and_then(|b| u8::try_from(b).ok())
            .ok_or_else(|| self.invalid(format!("argument {index} holds non-byte {value}")))
    }

    fn strings(&self) -> Result<Vec<&str>, BridgeError> {
        (0..self.values.len()).map(|i| self.str_at(i)).collect()
    }

    /// All arguments joined the way a console line would show them.
    fn message(&self) -> String {
        self.values
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Runs capability operations against the exposed capability set.
#[derive(Debug, Clone)]
pub struct CapabilityDispatcher {
    capabilities: CapabilitySet,
}

impl CapabilityDispatcher {
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self { capabilities }
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Run one call and return its result value.
    pub async fn dispatch(&self, kind: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        if !is_operation_allowed(kind) {
            return Err(BridgeError::UnknownOperation(kind.to_string()));
        }
        let Some((name, op)) = parse_kind(kind) else {
            return Err(BridgeError::UnknownOperation(kind.to_string()));
        };
        let Some(cap) = self.capabilities.get(name) else {
            return Err(BridgeError::UnknownOperation(kind.to_string()));
        };

        let args = CallArgs::new(kind, args);
        match cap {
            Capability::Bridge(host) => call_host(host, op, &args),
            Capability::FileUtils(fs) => call_file_utils(fs, op, &args).await,
            Capability::Path(path) => call_path(path, op, &args),
            Capability::CommandExists(probe) => match op {
                "exists" => Ok(Value::Bool(probe.exists(args.str_at(0)?))),
                _ => Err(BridgeError::UnknownOperation(kind.to_string())),
            },
            Capability::RgPath(_) => Err(BridgeError::UnknownOperation(kind.to_string())),
        }
    }

    /// Run the call carried by `message` and build the response payload.
    pub async fn handle_message(&self, message: IpcMessage) -> Value {
        let cid = new_correlation_id();
        debug!(cid = %cid, kind = %message.kind, req_id = ?message.req_id, "capability call");
        let outcome = self
            .dispatch(&message.kind, message.payload.into_args())
            .await;
        if let Err(e) = &outcome {
            warn!(cid = %cid, kind = %message.kind, error = %e, "capability call failed");
        }
        response_payload(message.req_id, outcome)
    }

    /// Run the call and send the response back to `endpoint`.
    ///
    /// Calls without a request id are fire-and-forget and get no reply.
    /// Returns whether a reply was delivered.
    pub async fn reply<S: EndpointSource>(
        &self,
        relay: &MessageRelay<S>,
        endpoint: Option<&S::Endpoint>,
        message: IpcMessage,
    ) -> bool {
        let wants_reply = message.req_id.is_some();
        let payload = self.handle_message(message).await;
        wants_reply && relay.send_to(endpoint, channels::CAPABILITY_RESPONSE, &payload)
    }
}

/// `{"_reqId", "result"}` on success, `{"_reqId", "error"}` on failure.
///
/// The result is marshalled like any other outbound argument.
pub fn response_payload(req_id: Option<u64>, outcome: Result<Value, BridgeError>) -> Value {
    match outcome {
        Ok(value) => {
            let result = encode(Arg::Value(value)).to_wire().unwrap_or(Value::Null);
            json!({ "_reqId": req_id, "result": result })
        }
        Err(e) => json!({ "_reqId": req_id, "error": e.to_string() }),
    }
}

fn call_host(host: &HostApi, op: &str, args: &CallArgs<'_>) -> Result<Value, BridgeError> {
    match op {
        "shell.openExternal" => host.shell.open_external(args.str_at(0)?)?,
        "shell.openPath" => host.shell.open_path(&args.path_at(0)?)?,
        "shell.showItemInFolder" => host.shell.show_item_in_folder(&args.path_at(0)?)?,
        "clipboard.readText" => return Ok(Value::String(host.clipboard.read_text()?)),
        "clipboard.writeText" => host.clipboard.write_text(args.str_at(0)?)?,
        "log.debug" => host.log.debug(&args.message()),
        "log.info" => host.log.info(&args.message()),
        "log.warn" => host.log.warn(&args.message()),
        "log.error" => host.log.error(&args.message()),
        _ => return Err(BridgeError::UnknownOperation(args.kind.to_string())),
    }
    Ok(Value::Null)
}

async fn call_file_utils(
    fs: &mdshell_platform::FileUtils,
    op: &str,
    args: &CallArgs<'_>,
) -> Result<Value, BridgeError> {
    let value = match op {
        "isFile" => json!(fs.is_file(&args.path_at(0)?)),
        "isDirectory" => json!(fs.is_directory(&args.path_at(0)?)),
        "pathExistsSync" => json!(fs.path_exists_sync(&args.path_at(0)?)),
        "ensureDirSync" => {
            fs.ensure_dir_sync(&args.path_at(0)?)?;
            Value::Null
        }
        "isChildOfDirectory" => {
            json!(fs.is_child_of_directory(&args.path_at(0)?, &args.path_at(1)?))
        }
        "hasMarkdownExtension" => json!(fs.has_markdown_extension(&args.path_at(0)?)),
        "isImageFile" => json!(fs.is_image_file(&args.path_at(0)?)),
        "isSamePathSync" => json!(fs.is_same_path_sync(&args.path_at(0)?, &args.path_at(1)?)),
        "emptyDir" => {
            fs.empty_dir(&args.path_at(0)?).await?;
            Value::Null
        }
        "copy" => {
            fs.copy(&args.path_at(0)?, &args.path_at(1)?).await?;
            Value::Null
        }
        "ensureDir" => {
            fs.ensure_dir(&args.path_at(0)?).await?;
            Value::Null
        }
        "outputFile" => {
            fs.output_file(&args.path_at(0)?, &args.bytes_at(1)?).await?;
            Value::Null
        }
        "move" => {
            fs.move_path(&args.path_at(0)?, &args.path_at(1)?).await?;
            Value::Null
        }
        "stat" => {
            let stat = fs.stat(&args.path_at(0)?).await?;
            serde_json::to_value(stat).map_err(|e| args.invalid(e.to_string()))?
        }
        "writeFile" => {
            fs.write_file(&args.path_at(0)?, &args.bytes_at(1)?).await?;
            Value::Null
        }
        "readFile" => file_contents(fs.read_file(&args.path_at(0)?).await?),
        _ => return Err(BridgeError::UnknownOperation(args.kind.to_string())),
    };
    Ok(value)
}

fn is_buffer(obj: &serde_json::Map<String, Value>) -> bool {
    obj.get("type").and_then(Value::as_str) == Some("Buffer")
}

/// Text when the bytes are UTF-8, otherwise the exact bytes in
/// `{"type": "Buffer", "data": [..]}` form.
fn file_contents(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::String(text),
        Err(e) => json!({ "type": "Buffer", "data": e.into_bytes() }),
    }
}

fn call_path(
    path: &mdshell_platform::PathUtils,
    op: &str,
    args: &CallArgs<'_>,
) -> Result<Value, BridgeError> {
    let value = match op {
        "join" => json!(path.join(&args.strings()?)),
        "dirname" => json!(path.dirname(args.str_at(0)?)),
        "basename" => json!(path.basename(args.str_at(0)?, args.opt_str_at(1)?)),
        "extname" => json!(path.extname(args.str_at(0)?)),
        "normalize" => json!(path.normalize(args.str_at(0)?)),
        "isAbsolute" => json!(path.is_absolute(args.str_at(0)?)),
        _ => return Err(BridgeError::UnknownOperation(args.kind.to_string())),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{MemoryEndpoint, MemoryEndpoints};
    use mdshell_config::BridgeConfig;
    use mdshell_platform::{CommandProbe, FileUtils, PathUtils};

    fn dispatcher() -> CapabilityDispatcher {
        CapabilityDispatcher::new(CapabilitySet::from_capabilities([
            Capability::Bridge(HostApi::new()),
            Capability::FileUtils(FileUtils::new()),
            Capability::Path(PathUtils::new()),
            Capability::RgPath(PathBuf::from("/opt/tools/rg")),
            Capability::CommandExists(CommandProbe::with_search_path("")),
        ]))
    }

    /// Arguments the way the UI stubs send them: each one JSON-encoded.
    fn wire(args: &[Value]) -> Vec<Value> {
        args.iter().map(|v| Value::String(v.to_string())).collect()
    }

    // -- allowlist --

    #[test]
    fn allowlist_accepts_known_operations() {
        for kind in [
            "fileUtils::isFile",
            "fileUtils::readFile",
            "path::join",
            "bridge::shell.openExternal",
            "bridge::clipboard.readText",
            "bridge::log.info",
            "commandExists::exists",
        ] {
            assert!(is_operation_allowed(kind), "{kind}");
        }
    }

    #[test]
    fn allowlist_rejects_everything_else() {
        for kind in [
            "fileUtils::rmrf",
            "rgPath::get",
            "mt::ping",
            "bridge::shell",
            "path:join",
            "",
            "process::exit",
        ] {
            assert!(!is_operation_allowed(kind), "{kind}");
        }
        assert!(!is_capability_kind("mt::ping"));
        assert!(is_capability_kind("path::whatever"));
    }

    // -- dispatch --

    #[cfg(unix)]
    #[tokio::test]
    async fn path_operations_decode_each_argument() {
        let d = dispatcher();
        let parts = wire(&[json!("/notes"), json!("a/../b"), json!("c.md")]);
        let joined = d.dispatch("path::join", parts).await.unwrap();
        assert_eq!(joined, json!("/notes/b/c.md"));

        let args = wire(&[json!("/notes/c.md"), json!(".md")]);
        let base = d.dispatch("path::basename", args).await.unwrap();
        assert_eq!(base, json!("c"));
    }

    #[tokio::test]
    async fn file_operations_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested/note.md");
        let file_arg = json!(file.to_string_lossy());
        let d = dispatcher();

        let args = wire(&[file_arg.clone(), json!("# Title")]);
        d.dispatch("fileUtils::outputFile", args).await.unwrap();

        let is_file = d.dispatch("fileUtils::isFile", wire(&[file_arg.clone()]));
        assert_eq!(is_file.await.unwrap(), json!(true));

        let text = d.dispatch("fileUtils::readFile", wire(&[file_arg.clone()]));
        assert_eq!(text.await.unwrap(), json!("# Title"));

        let stat = d
            .dispatch("fileUtils::stat", wire(&[file_arg]))
            .await
            .unwrap();
        assert_eq!(stat["size"], json!(7));
        assert_eq!(stat["isFile"], json!(true));
    }

    #[tokio::test]
    async fn binary_files_keep_every_byte() {
        const PNG_HEAD: [u8; 10] = [
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0xfe,
        ];
        let dir = tempfile::tempdir().unwrap();
        let shot = dir.path().join("shot.png");
        std::fs::write(&shot, PNG_HEAD).unwrap();
        let d = dispatcher();

        let args = wire(&[json!(shot.to_string_lossy())]);
        let read = d.dispatch("fileUtils::readFile", args).await.unwrap();
        assert_eq!(read, json!({ "type": "Buffer", "data": PNG_HEAD }));

        let copy = dir.path().join("copy.png");
        let copy_arg = json!(copy.to_string_lossy());
        let args = wire(&[copy_arg.clone(), read]);
        d.dispatch("fileUtils::writeFile", args).await.unwrap();
        assert_eq!(std::fs::read(&copy).unwrap(), PNG_HEAD);

        let args = wire(&[copy_arg, json!([0, 255])]);
        d.dispatch("fileUtils::outputFile", args).await.unwrap();
        assert_eq!(std::fs::read(&copy).unwrap(), [0x00, 0xff]);
    }

    #[tokio::test]
    async fn write_rejects_values_that_are_not_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let target_arg = json!(target.to_string_lossy());
        let d = dispatcher();

        for content in [
            json!([1, 256]),
            json!([-1]),
            json!(42),
            json!({ "data": "x" }),
        ] {
            let args = wire(&[target_arg.clone(), content]);
            let err = d.dispatch("fileUtils::writeFile", args).await.unwrap_err();
            assert!(matches!(err, BridgeError::InvalidArguments { .. }));
        }
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn unknown_and_unexposed_operations_are_rejected() {
        let d = dispatcher();
        assert!(matches!(
            d.dispatch("fileUtils::rmrf", vec![]).await,
            Err(BridgeError::UnknownOperation(_))
        ));

        let only_path = CapabilityDispatcher::new(CapabilitySet::from_capabilities([
            Capability::Path(PathUtils::new()),
        ]));
        let args = wire(&[json!("/x")]);
        assert!(matches!(
            only_path.dispatch("fileUtils::isFile", args).await,
            Err(BridgeError::UnknownOperation(_))
        ));
    }

    #[tokio::test]
    async fn bad_arguments_are_reported() {
        let d = dispatcher();
        let err = d.dispatch("path::dirname", vec![]).await.unwrap_err();
        assert!(
            matches!(err, BridgeError::InvalidArguments { ref op, .. } if op == "path::dirname")
        );

        let args = wire(&[json!(42)]);
        let err = d.dispatch("fileUtils::isFile", args).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn command_probe_with_empty_path_finds_nothing() {
        let d = dispatcher();
        let args = wire(&[json!("rg")]);
        let found = d.dispatch("commandExists::exists", args).await.unwrap();
        assert_eq!(found, json!(false));
    }

    #[tokio::test]
    async fn renderer_log_accepts_any_arguments() {
        let d = dispatcher();
        let args = wire(&[json!("disk"), json!({"free": 0})]);
        let out = d.dispatch("bridge::log.warn", args).await.unwrap();
        assert_eq!(out, Value::Null);
    }

    // -- responses --

    #[test]
    fn response_payload_shapes() {
        let ok = response_payload(Some(4), Ok(json!({"a": 1})));
        assert_eq!(ok, json!({"_reqId": 4, "result": "{\"a\":1}"}));

        let err = response_payload(Some(5), Err(BridgeError::UnknownOperation("x::y".into())));
        assert_eq!(err["_reqId"], json!(5));
        assert_eq!(err["error"], json!("unknown capability operation: x::y"));
        assert!(err.get("result").is_none());
    }

    #[tokio::test]
    async fn reply_goes_back_on_the_response_channel() {
        let source = MemoryEndpoints::new();
        let ep = source.add(MemoryEndpoint::new(1));
        let relay = MessageRelay::new(source);
        let d = CapabilityDispatcher::new(CapabilitySet::standard(&BridgeConfig {
            search_tool_path: Some(PathBuf::from("/opt/tools/rg")),
            ..BridgeConfig::default()
        }));

        let msg = IpcMessage::json("path::extname", json!(["\"a/b.md\""]))
            .with_req_id(9);
        assert!(d.reply(&relay, Some(&*ep), msg).await);

        let received = ep.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, channels::CAPABILITY_RESPONSE);
        assert_eq!(received[0].1, json!({"_reqId": 9, "result": "\".md\""}));
    }

    #[tokio::test]
    async fn fire_and_forget_calls_get_no_reply() {
        let source = MemoryEndpoints::new();
        let ep = source.add(MemoryEndpoint::new(1));
        let relay = MessageRelay::new(source);

        let msg = IpcMessage::json("bridge::log.info", json!(["\"hello\""]));
        assert!(!dispatcher().reply(&relay, Some(&*ep), msg).await);
        assert_eq!(ep.attempts(), 0);
    }
}
