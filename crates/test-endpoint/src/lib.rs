//! A local scripted endpoint for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_widget_protocol::{
    Endpoint, EndpointError, ErrorKind, ExchangeRequest, ExchangeResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl EndpointError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Recorder {
    requests: Vec<ExchangeRequest>,
}

/// A local scripted endpoint for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// endpoint should answer each request. The n-th request received gets the
/// n-th preset reply. If there are no enough replies in the script, an
/// error will be returned.
///
/// Clones share the record of received requests, so a test can keep one
/// clone for inspection after handing another to the widget.
#[derive(Clone, Default)]
pub struct ScriptedEndpoint {
    script: Vec<PresetReply>,
    delay: Option<Duration>,
    recorder: Arc<Mutex<Recorder>>,
}

impl ScriptedEndpoint {
    /// Creates an endpoint that answers with the given replies in order.
    #[inline]
    pub fn with_replies(replies: impl Into<Vec<PresetReply>>) -> Self {
        Self {
            script: replies.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.script.push(preset);
    }

    /// Sets the latency of every answer.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ExchangeRequest> {
        self.recorder
            .lock()
            .expect("recorder is poisoned")
            .requests
            .clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.recorder
            .lock()
            .expect("recorder is poisoned")
            .requests
            .len()
    }
}

impl Endpoint for ScriptedEndpoint {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ExchangeRequest,
    ) -> impl Future<Output = Result<ExchangeResponse, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut recorder =
                self.recorder.lock().expect("recorder is poisoned");
            let step_idx = recorder.requests.len();
            recorder.requests.push(req.clone());
            self.script.get(step_idx).cloned()
        };
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match preset {
                Some(PresetReply::Reply(text)) => {
                    Ok(ExchangeResponse::with_reply(text))
                }
                Some(PresetReply::Empty) => Ok(ExchangeResponse::default()),
                Some(PresetReply::Failure(kind)) => Err(Error {
                    message: "scripted failure",
                    kind,
                }),
                None => Err(Error {
                    message: "no enough replies",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
