//! PipelineCore — composable line-oriented stream stages connected by
//! in-memory pipes, with per-stage tasks and cooperative cancellation
//! (spec.md §4.5).
//!
//! No direct teacher analog exists for stage composition; the task-spawn +
//! channel wiring style is grounded on the teacher's `tokio::spawn` +
//! `mpsc::unbounded_channel` pairing in `main.rs::run_single_shot` (see
//! DESIGN.md).
pub mod stages;

use crate::error::{Result, ToolboxError};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;

/// A pipeline transformation. Implementations read lines from `reader` and
/// write lines to `writer`; they never reopen files or sockets (spec.md
/// §4.5). `writer` is owned so dropping it at the end of `run` closes the
/// write side, signalling end-of-stream to the downstream stage.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()>;
}

/// An ordered list of stages, wired by `Pipeline::run` into a single
/// `stdin → stdout` transformation.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Runs every stage concurrently, wiring `len(stages)-1` in-memory
    /// duplex pipes between them. The first stage reads `stdin`; the last
    /// writes `stdout`. Returns the first non-nil error in stage order
    /// (upstream preferred on simultaneous failure, spec.md §4.5 step 4).
    pub async fn run<R, W>(self, cancel: CancellationToken, stdin: R, stdout: W) -> Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let n = self.stages.len();
        tracing::debug!(stage_count = n, "starting pipeline run");
        if n == 0 {
            return Ok(());
        }

        let mut readers: Vec<Box<dyn AsyncRead + Send + Unpin>> = Vec::with_capacity(n);
        let mut writers: Vec<Box<dyn AsyncWrite + Send + Unpin>> = Vec::with_capacity(n);

        readers.push(Box::new(stdin));
        for _ in 0..n - 1 {
            let (tx, rx) = tokio::io::duplex(64 * 1024);
            writers.push(Box::new(tx));
            readers.push(Box::new(rx));
        }
        writers.push(Box::new(stdout));

        let mut handles = Vec::with_capacity(n);
        for (idx, ((stage, reader), writer)) in self
            .stages
            .into_iter()
            .zip(readers)
            .zip(writers)
            .enumerate()
        {
            let cancel = cancel.clone();
            let stage_name = stage.name().to_string();
            handles.push(tokio::spawn(async move {
                let result = stage.run(cancel, reader, writer).await;
                tracing::trace!(stage = stage_name.as_str(), idx, ok = result.is_ok(), "stage finished");
                (idx, result)
            }));
        }

        let mut results: Vec<Option<Result<()>>> = (0..n).map(|_| None).collect();
        for handle in handles {
            let (idx, result) = handle
                .await
                .map_err(|e| ToolboxError::External(format!("stage task panicked: {e}")))?;
            results[idx] = Some(result);
        }

        for result in results {
            if let Some(Err(e)) = result {
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::stages::{Grep, Head, Sort};
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn three_stage_pipeline_filters_sorts_and_heads() {
        let input = "error: a\nok: b\nerror: c\nok: d\n".to_string();
        let pipeline = Pipeline::new(vec![
            Box::new(Grep::new("error").unwrap()),
            Box::new(Sort::default()),
            Box::new(Head::new(1)),
        ]);

        let (w, mut r) = tokio::io::duplex(64 * 1024);
        let run_task = tokio::spawn(async move {
            pipeline
                .run(
                    CancellationToken::new(),
                    std::io::Cursor::new(input.into_bytes()),
                    w,
                )
                .await
        });

        let mut output = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut r, &mut output)
            .await
            .unwrap();
        run_task.await.unwrap().unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "error: a\n");
    }

    #[tokio::test]
    async fn cancellation_propagates_within_bounded_time() {
        use super::stages::Cat;
        use tokio::io::AsyncWrite;
        use std::pin::Pin;
        use std::task::{Context, Poll};

        // An endless producer: never returns Ready(0), simulating an
        // infinite stream for the cancellation test.
        struct Infinite;
        impl AsyncRead for Infinite {
            fn poll_read(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
                buf: &mut tokio::io::ReadBuf<'_>,
            ) -> Poll<std::io::Result<()>> {
                buf.put_slice(b"x\n");
                Poll::Ready(Ok(()))
            }
        }

        struct Sink;
        impl AsyncWrite for Sink {
            fn poll_write(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
                buf: &[u8],
            ) -> Poll<std::io::Result<usize>> {
                Poll::Ready(Ok(buf.len()))
            }
            fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
                Poll::Ready(Ok(()))
            }
            fn poll_shutdown(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
            ) -> Poll<std::io::Result<()>> {
                Poll::Ready(Ok(()))
            }
        }

        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let pipeline = Pipeline::new(vec![Box::new(Cat)]);
        let handle = tokio::spawn(async move { pipeline.run(child, Infinite, Sink).await });

        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(2), handle)
            .await
            .expect("pipeline did not observe cancellation in time")
            .unwrap();
        assert!(matches!(result, Err(ToolboxError::Cancelled)));
    }
}
