//! Chat Command
//!
//! Interactive recommendation chat over stdin. `exit` or `quit` (or EOF)
//! ends the session. Ctrl-C abandons the answer in flight, or leaves the
//! session when pressed at the prompt.

use std::future::Future;
use std::path::Path;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::assistant::{ChatAssistant, ChatSession};
use crate::cli::ui::Output;
use crate::cli::{CommandContext, load_catalog};
use crate::types::Result;

pub async fn run(ctx: CommandContext, catalog_path: &Path) -> Result<()> {
    let output = Output::new();
    let catalog = load_catalog(catalog_path)?;
    info!(venues = catalog.len(), catalog = %catalog_path.display(), "Catalog loaded");

    let assistant = ChatAssistant::new(ctx.client.clone(), catalog, ctx.policy)?
        .with_greeting(ctx.config.messages.greeting.clone());
    let mut session = assistant.new_session();

    output.assistant(session.greeting());
    output.info("Type 'exit' to leave.");

    repl(
        &assistant,
        &mut session,
        BufReader::new(tokio::io::stdin()),
        || async {
            let _ = tokio::signal::ctrl_c().await;
        },
        &output,
    )
    .await
}

/// Read-answer loop over `input`
///
/// `interrupt` is polled while waiting for input and while an answer is in
/// flight. At the prompt it ends the loop; during an answer it drops only
/// that answer.
pub(crate) async fn repl<R, F, Fut>(
    assistant: &ChatAssistant,
    session: &mut ChatSession,
    input: R,
    mut interrupt: F,
    output: &Output,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                info!("Interrupted at prompt");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        let input = line.trim();
        if matches!(input, "exit" | "quit") {
            break;
        }

        let reply = tokio::select! {
            reply = assistant.send(session, input) => reply.map(Some),
            _ = interrupt() => Ok(None),
        };

        match reply? {
            None => output.warning("Cancelled"),
            Some(None) => {}
            Some(Some(reply)) => {
                output.assistant(&reply.text);
                for venue in &reply.venues {
                    output.venue(venue);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerateContentRequest, GenerationTransport, RetryPolicy, StructuredClient};
    use crate::venue::VenueCatalog;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedTransport;

    #[async_trait]
    impl GenerationTransport for FixedTransport {
        async fn send(&self, _payload: &GenerateContentRequest) -> Result<String> {
            Ok(r#"{"text":"Try Nook.","mentionedPlacesIds":["1"]}"#.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn assistant() -> ChatAssistant {
        let catalog = VenueCatalog::from_json_str(r#"[{"id":"1","name":"Nook"}]"#).unwrap();
        let client = StructuredClient::new(Arc::new(FixedTransport));
        ChatAssistant::new(client, Arc::new(catalog), RetryPolicy::immediate(3)).unwrap()
    }

    #[tokio::test]
    async fn test_interrupt_at_idle_prompt_ends_session() {
        let assistant = assistant();
        let mut session = assistant.new_session();
        // Open stream with no input: the prompt stays idle
        let (_writer, reader) = tokio::io::duplex(64);

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            repl(
                &assistant,
                &mut session,
                BufReader::new(reader),
                || async {},
                &Output::new(),
            ),
        )
        .await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert_eq!(session.turns().len(), 1);
    }

    #[tokio::test]
    async fn test_lines_are_answered_until_exit() {
        let assistant = assistant();
        let mut session = assistant.new_session();

        repl(
            &assistant,
            &mut session,
            &b"quiet coffee?\n\nexit\nignored\n"[..],
            std::future::pending::<()>,
            &Output::new(),
        )
        .await
        .unwrap();

        // Greeting, then one user turn and one answer; blank line skipped
        assert_eq!(session.turns().len(), 3);
        assert_eq!(session.turns()[2].text, "Try Nook.");
    }
}
