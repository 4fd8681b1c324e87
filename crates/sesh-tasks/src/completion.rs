//! The `shell_completion` task.

use async_trait::async_trait;
use sesh_core::{Session, SessionResult, Task};

/// How to enable shell completion for `sesh`.
pub const SHELL_COMPLETION_DESC: &str = r#"
# Shell Completion

- Bash:
  `eval "$(sesh completions bash)"`
- Zsh:
  ``` shell
  # To activate completions for zsh you need to have
  # bashcompinit enabled in zsh:
  autoload -U bashcompinit
  bashcompinit

  # Afterwards you can enable completion for sesh:
  eval "$(sesh completions bash)"
  ```

For more shells refer to:
`sesh completions --help`
"#;

/// Prints [`SHELL_COMPLETION_DESC`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCompletion;

#[async_trait]
impl Task for ShellCompletion {
    fn name(&self) -> &str {
        "shell_completion"
    }

    fn description(&self) -> &str {
        "Print instructions for enabling shell completion"
    }

    async fn run(&self, session: &Session) -> SessionResult<()> {
        session.run_silent("echo", [SHELL_COMPLETION_DESC]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesh_core::testing::RecordingRunner;
    use sesh_core::RunOptions;
    use std::sync::Arc;

    #[test]
    fn test_description_mentions_shells() {
        assert!(SHELL_COMPLETION_DESC.contains("Bash:"));
        assert!(SHELL_COMPLETION_DESC.contains("Zsh:"));
        assert!(SHELL_COMPLETION_DESC.contains("bashcompinit"));
        assert!(SHELL_COMPLETION_DESC.contains(r#"eval "$(sesh completions bash)""#));
    }

    #[tokio::test]
    async fn test_echoes_description_silently() {
        let runner = Arc::new(RecordingRunner::new());
        let session = Session::new(std::env::temp_dir(), runner.clone())
            .with_options(RunOptions::new());

        ShellCompletion.run(&session).await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].silent);
        assert_eq!(calls[0].argv(), vec!["echo", SHELL_COMPLETION_DESC]);
    }
}
