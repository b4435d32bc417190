//! mpv JSON IPC client
//!
//! One JSON object per line in both directions. Requests carry a
//! `request_id`; replies echo it back. Lines with an `event` field are
//! unsolicited notifications and are skipped while waiting for a reply.
//!
//! ```text
//! > {"command":["get_property","time-pos"],"request_id":7}
//! < {"event":"playback-restart"}
//! < {"data":12.48,"request_id":7,"error":"success"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};

use super::WidgetError;

/// mpv's error string for a successful command
const SUCCESS: &str = "success";

/// mpv's error string for a property that has no value yet
const PROPERTY_UNAVAILABLE: &str = "property unavailable";

#[derive(Debug, Serialize)]
struct Request<'a> {
    command: &'a [Value],
    request_id: u64,
}

/// A single line received from mpv
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub request_id: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub event: Option<String>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        self.error.as_deref() == Some(SUCCESS)
    }
}

/// Encode a request as one newline-terminated line
pub fn encode_request(command: &[Value], request_id: u64) -> Result<String, WidgetError> {
    let mut line = serde_json::to_string(&Request {
        command,
        request_id,
    })?;
    line.push('\n');
    Ok(line)
}

/// Request/reply client over any byte stream
pub struct IpcClient<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    next_id: u64,
}

impl<S: AsyncRead + AsyncWrite> IpcClient<S> {
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(reader),
            writer,
            next_id: 1,
        }
    }

    /// Send a command and wait for its reply
    pub async fn request(&mut self, command: &[Value]) -> Result<Reply, WidgetError> {
        let id = self.next_id;
        self.next_id += 1;

        let line = encode_request(command, id)?;
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        self.read_reply(id).await
    }

    async fn read_reply(&mut self, want_id: u64) -> Result<Reply, WidgetError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Err(WidgetError::Closed);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let reply: Reply = serde_json::from_str(trimmed)?;
            if reply.event.is_some() {
                continue;
            }
            if reply.request_id == Some(want_id) {
                return Ok(reply);
            }
        }
    }

    /// Run a command, failing unless mpv reports success
    pub async fn command(&mut self, command: &[Value]) -> Result<Option<Value>, WidgetError> {
        let reply = self.request(command).await?;
        if reply.is_success() {
            Ok(reply.data)
        } else {
            Err(WidgetError::Command(
                reply.error.unwrap_or_else(|| "unknown error".into()),
            ))
        }
    }

    /// Read a property; unavailable properties read as `None`
    pub async fn get_property(&mut self, name: &str) -> Result<Option<Value>, WidgetError> {
        let reply = self
            .request(&[Value::from("get_property"), Value::from(name)])
            .await?;
        match reply.error.as_deref() {
            Some(SUCCESS) => Ok(reply.data),
            Some(PROPERTY_UNAVAILABLE) => Ok(None),
            other => Err(WidgetError::Command(
                other.unwrap_or("unknown error").to_string(),
            )),
        }
    }

    /// Read a numeric property
    pub async fn get_f64(&mut self, name: &str) -> Result<Option<f64>, WidgetError> {
        Ok(self.get_property(name).await?.and_then(|v| v.as_f64()))
    }

    /// Read a boolean property
    pub async fn get_bool(&mut self, name: &str) -> Result<Option<bool>, WidgetError> {
        Ok(self.get_property(name).await?.and_then(|v| v.as_bool()))
    }

    pub async fn set_property(&mut self, name: &str, value: Value) -> Result<(), WidgetError> {
        self.command(&[Value::from("set_property"), Value::from(name), value])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_request() {
        let line = encode_request(&[json!("get_property"), json!("pause")], 3).unwrap();
        assert_eq!(
            line,
            "{\"command\":[\"get_property\",\"pause\"],\"request_id\":3}\n"
        );
    }

    #[test]
    fn test_reply_parsing() {
        let reply: Reply =
            serde_json::from_str(r#"{"data":12.5,"request_id":7,"error":"success"}"#).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.request_id, Some(7));
        assert_eq!(reply.data, Some(json!(12.5)));

        let event: Reply = serde_json::from_str(r#"{"event":"idle"}"#).unwrap();
        assert_eq!(event.event.as_deref(), Some("idle"));
        assert!(!event.is_success());
    }
}
