//! Built-in pipeline stages (spec.md §4.5 glossary: "streaming" stages emit
//! each record on arrival; "buffering" stages must consume all input
//! before emitting).
use super::Stage;
use crate::error::{Result, ToolboxError};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Reads the next line, racing against cancellation. `Ok(None)` on EOF.
async fn next_line<R: AsyncBufRead + Unpin>(
    lines: &mut tokio::io::Lines<R>,
    cancel: &CancellationToken,
) -> Result<Option<String>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ToolboxError::Cancelled),
        line = lines.next_line() => line.map_err(ToolboxError::Io),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

/// Passes every line through unchanged (streaming).
pub struct Cat;

#[async_trait]
impl Stage for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            write_line(&mut writer, &line).await?;
        }
        Ok(())
    }
}

/// Emits only lines containing `pattern` (streaming).
pub struct Grep {
    pattern: regex::Regex,
}

impl Grep {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = regex::Regex::new(pattern)
            .map_err(|e| ToolboxError::Usage(format!("invalid grep pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

#[async_trait]
impl Stage for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            if self.pattern.is_match(&line) {
                write_line(&mut writer, &line).await?;
            }
        }
        Ok(())
    }
}

/// Emits only the first `n` lines, then drains the rest of input without
/// emitting (streaming: each emitted line arrives as soon as it's read).
pub struct Head {
    n: usize,
}

impl Head {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

#[async_trait]
impl Stage for Head {
    fn name(&self) -> &str {
        "head"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut emitted = 0usize;
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            if emitted >= self.n {
                continue;
            }
            write_line(&mut writer, &line).await?;
            emitted += 1;
        }
        Ok(())
    }
}

/// Emits only the last `n` lines (buffering: must see all input first).
pub struct Tail {
    n: usize,
}

impl Tail {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

#[async_trait]
impl Stage for Tail {
    fn name(&self) -> &str {
        "tail"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut buf: std::collections::VecDeque<String> = std::collections::VecDeque::with_capacity(self.n);
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            if buf.len() == self.n {
                buf.pop_front();
            }
            buf.push_back(line);
        }
        for line in buf {
            write_line(&mut writer, &line).await?;
        }
        Ok(())
    }
}

/// Lexicographic ascending sort (buffering).
#[derive(Default)]
pub struct Sort;

#[async_trait]
impl Stage for Sort {
    fn name(&self) -> &str {
        "sort"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut collected = Vec::new();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            collected.push(line);
        }
        collected.sort();
        for line in collected {
            write_line(&mut writer, &line).await?;
        }
        Ok(())
    }
}

/// Emits each distinct line once, in first-seen order — correct over
/// unsorted input, unlike the classic adjacent-only `uniq` (buffering,
/// spec.md §4.5 glossary example).
#[derive(Default)]
pub struct Uniq;

#[async_trait]
impl Stage for Uniq {
    fn name(&self) -> &str {
        "uniq"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut seen = std::collections::HashSet::new();
        let mut ordered = Vec::new();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            if seen.insert(line.clone()) {
                ordered.push(line);
            }
        }
        for line in ordered {
            write_line(&mut writer, &line).await?;
        }
        Ok(())
    }
}

/// Emits all input lines in reverse order (buffering).
#[derive(Default)]
pub struct Reverse;

#[async_trait]
impl Stage for Reverse {
    fn name(&self) -> &str {
        "reverse"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut collected = Vec::new();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            collected.push(line);
        }
        for line in collected.into_iter().rev() {
            write_line(&mut writer, &line).await?;
        }
        Ok(())
    }
}

/// Translates every occurrence of `from` to `to`, character-for-character
/// like the classic `tr` (streaming).
pub struct Tr {
    from: Vec<char>,
    to: Vec<char>,
}

impl Tr {
    pub fn new(from: &str, to: &str) -> Result<Self> {
        let from: Vec<char> = from.chars().collect();
        let to: Vec<char> = to.chars().collect();
        if from.len() != to.len() || from.is_empty() {
            return Err(ToolboxError::Usage(
                "tr requires equal-length, non-empty from/to sets".to_string(),
            ));
        }
        Ok(Self { from, to })
    }
}

#[async_trait]
impl Stage for Tr {
    fn name(&self) -> &str {
        "tr"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            let translated: String = line
                .chars()
                .map(|c| match self.from.iter().position(|f| *f == c) {
                    Some(idx) => self.to[idx],
                    None => c,
                })
                .collect();
            write_line(&mut writer, &translated).await?;
        }
        Ok(())
    }
}

/// Prefixes each line with a 1-based line number, like `nl` (streaming).
#[derive(Default)]
pub struct LineNumber;

#[async_trait]
impl Stage for LineNumber {
    fn name(&self) -> &str {
        "nl"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut n = 1u64;
        while let Some(line) = next_line(&mut lines, &cancel).await? {
            write_line(&mut writer, &format!("{n:>6}\t{line}")).await?;
            n += 1;
        }
        Ok(())
    }
}

/// Emits a single summary line with the input's line count, like `wc -l`
/// (buffering).
#[derive(Default)]
pub struct LineCount;

#[async_trait]
impl Stage for LineCount {
    fn name(&self) -> &str {
        "wc"
    }

    async fn run(
        &self,
        cancel: CancellationToken,
        reader: Box<dyn AsyncRead + Send + Unpin>,
        mut writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        let mut count = 0u64;
        while (next_line(&mut lines, &cancel).await?).is_some() {
            count += 1;
        }
        write_line(&mut writer, &count.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    async fn run_stage(stage: impl Stage + 'static, input: &str) -> String {
        let input = input.to_string();
        let (w, mut r) = tokio::io::duplex(64 * 1024);
        let task = tokio::spawn(async move {
            stage
                .run(
                    CancellationToken::new(),
                    Box::new(std::io::Cursor::new(input.into_bytes())),
                    Box::new(w),
                )
                .await
        });
        let mut output = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut r, &mut output)
            .await
            .unwrap();
        task.await.unwrap().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn grep_filters_matching_lines() {
        let out = run_stage(Grep::new("error").unwrap(), "error: a\nok: b\nerror: c\n").await;
        assert_eq!(out, "error: a\nerror: c\n");
    }

    #[tokio::test]
    async fn uniq_dedupes_unsorted_input() {
        let out = run_stage(Uniq, "b\na\nb\nc\na\n").await;
        assert_eq!(out, "b\na\nc\n");
    }

    #[tokio::test]
    async fn reverse_flips_line_order() {
        let out = run_stage(Reverse, "1\n2\n3\n").await;
        assert_eq!(out, "3\n2\n1\n");
    }

    #[tokio::test]
    async fn tr_translates_characters() {
        let out = run_stage(Tr::new("ab", "xy").unwrap(), "abc\n").await;
        assert_eq!(out, "xyc\n");
    }

    #[tokio::test]
    async fn tail_keeps_last_n_lines() {
        let out = run_stage(Tail::new(2), "1\n2\n3\n4\n").await;
        assert_eq!(out, "3\n4\n");
    }
}
