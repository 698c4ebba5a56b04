use crate::domain::ports::ApprovalSignal;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tokio::sync::Mutex;

/// Treats one line of operator input as the buyer's approval.
///
/// This stands in for a redirect or webhook: the operator approves the order
/// in a browser and presses Enter. Closed input before any line arrives
/// aborts the run instead of capturing.
pub struct LineApproval<R> {
    reader: Mutex<BufReader<R>>,
}

impl<R: AsyncRead + Unpin + Send> LineApproval<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Mutex::new(BufReader::new(source)),
        }
    }
}

impl LineApproval<Stdin> {
    /// Waits on the process's standard input.
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ApprovalSignal for LineApproval<R> {
    async fn wait_for_approval(&self) -> Result<()> {
        // Any bytes up to a newline count, whatever their encoding.
        let mut line = Vec::new();
        let read = self
            .reader
            .lock()
            .await
            .read_until(b'\n', &mut line)
            .await
            .map_err(CheckoutError::ApprovalInput)?;
        if read == 0 {
            return Err(CheckoutError::ApprovalAborted);
        }
        Ok(())
    }
}

/// Input whose every read fails.
#[cfg(test)]
pub(crate) struct BrokenInput;

#[cfg(test)]
impl AsyncRead for BrokenInput {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::other("input device went away")))
    }
}
