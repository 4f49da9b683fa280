//! Dispatcher handler for `toolbox pipeline ...` (spec.md §6), parsing
//! stage tokens like `grep error` `sort` `head 1` into [`Stage`]
//! implementations and running them as a [`Pipeline`].
use crate::error::{Result, ToolboxError};
use crate::pipeline::stages::{Cat, Grep, Head, LineCount, LineNumber, Reverse, Sort, Tail, Tr, Uniq};
use crate::pipeline::{Pipeline, Stage};
use tokio_util::sync::CancellationToken;

/// Groups flat CLI stage tokens into one `Vec<String>` per stage: each
/// recognized stage name starts a new group, and subsequent tokens (until
/// the next recognized name) are its arguments.
fn group_stage_tokens(tokens: &[String]) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    for token in tokens {
        if is_stage_name(token) {
            groups.push(vec![token.clone()]);
        } else if let Some(last) = groups.last_mut() {
            last.push(token.clone());
        }
    }
    groups
}

fn is_stage_name(token: &str) -> bool {
    matches!(
        token,
        "cat" | "grep" | "head" | "tail" | "sort" | "uniq" | "reverse" | "tr" | "nl" | "wc"
    )
}

fn build_stage(tokens: &[String]) -> Result<Box<dyn Stage>> {
    let name = tokens
        .first()
        .ok_or_else(|| ToolboxError::Usage("empty pipeline stage".to_string()))?
        .as_str();

    match name {
        "cat" => Ok(Box::new(Cat)),
        "grep" => {
            let pattern = tokens
                .get(1)
                .ok_or_else(|| ToolboxError::Usage("grep requires a pattern argument".to_string()))?;
            Ok(Box::new(Grep::new(pattern)?))
        }
        "head" => Ok(Box::new(Head::new(parse_count(tokens, "head")?))),
        "tail" => Ok(Box::new(Tail::new(parse_count(tokens, "tail")?))),
        "sort" => Ok(Box::new(Sort)),
        "uniq" => Ok(Box::new(Uniq)),
        "reverse" => Ok(Box::new(Reverse)),
        "nl" => Ok(Box::new(LineNumber)),
        "wc" => Ok(Box::new(LineCount)),
        "tr" => {
            let from = tokens
                .get(1)
                .ok_or_else(|| ToolboxError::Usage("tr requires from/to arguments".to_string()))?;
            let to = tokens
                .get(2)
                .ok_or_else(|| ToolboxError::Usage("tr requires from/to arguments".to_string()))?;
            Ok(Box::new(Tr::new(from, to)?))
        }
        other => Err(ToolboxError::Usage(format!("unknown pipeline stage: {other}"))),
    }
}

fn parse_count(tokens: &[String], stage: &str) -> Result<usize> {
    tokens
        .get(1)
        .ok_or_else(|| ToolboxError::Usage(format!("{stage} requires a count argument")))?
        .parse()
        .map_err(|_| ToolboxError::Usage(format!("{stage}: invalid count")))
}

/// Builds the pipeline from `stage_tokens` and runs it over `input`,
/// returning the collected output. `input` is read upfront (rather than
/// hooked up to live stdin) so the Dispatcher's handler stays synchronous
/// until it awaits this call once (spec.md §4.7).
pub async fn run(stage_tokens: &[String], input: Vec<u8>) -> Result<Vec<u8>> {
    let groups = group_stage_tokens(stage_tokens);
    if groups.is_empty() {
        return Err(ToolboxError::Usage(
            "pipeline requires at least one stage".to_string(),
        ));
    }

    let stages: Result<Vec<Box<dyn Stage>>> = groups.iter().map(|g| build_stage(g)).collect();
    let pipeline = Pipeline::new(stages?);

    let (writer, mut reader) = tokio::io::duplex(64 * 1024);
    let cancel = CancellationToken::new();
    let run_task = tokio::spawn(pipeline.run(cancel, std::io::Cursor::new(input), writer));

    let mut output = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut output)
        .await
        .map_err(ToolboxError::Io)?;

    run_task
        .await
        .map_err(|e| ToolboxError::External(format!("pipeline task panicked: {e}")))??;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_and_runs_grep_sort_head_chain() {
        let tokens: Vec<String> = ["grep", "error", "sort", "head", "1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let input = b"error: b\nok: a\nerror: a\n".to_vec();

        let output = run(&tokens, input).await.unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "error: a\n");
    }

    #[tokio::test]
    async fn rejects_unknown_stage_name() {
        let tokens = vec!["bogus".to_string()];
        let err = run(&tokens, Vec::new()).await.unwrap_err();
        assert!(matches!(err, ToolboxError::Usage(_)));
    }
}
