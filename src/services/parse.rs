use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use tokio::sync::Mutex;
use tower::{BoxError, Layer, Service, ServiceExt};

use crate::types::cmd::Command;

/// Turns a raw input line into a [`Command`] for the inner service. Lines
/// that do not parse are answered here and never reach the fleet.
pub struct ParseService<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> ParseService<S> {
    fn new(inner: S) -> Self {
        ParseService {
            inner: Arc::new(Mutex::new(inner)),
        }
    }
}

impl<S> Service<String> for ParseService<S>
where
    S: Service<Command, Response = String> + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = String;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<String, BoxError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, line: String) -> Self::Future {
        let maybe_command = Command::try_from(line.as_str());
        let inner = self.inner.clone();

        Box::pin(async move {
            match maybe_command {
                Ok(command) => {
                    log::debug!("command received: {command}");
                    let mut inner = inner.lock().await;
                    let svc = ServiceExt::<Command>::ready(&mut *inner)
                        .await
                        .map_err(Into::<BoxError>::into)?;
                    svc.call(command).await.map_err(Into::<BoxError>::into)
                }
                Err(e) => {
                    log::debug!("invalid command {line:?}: {e:#}");
                    Ok(format!("Unknown command: {line}"))
                }
            }
        })
    }
}

pub struct ParseLayer;

impl<S> Layer<S> for ParseLayer {
    type Service = ParseService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ParseService::new(inner)
    }
}
