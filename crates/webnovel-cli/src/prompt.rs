use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

/// Line reader over stdin for interactive commands
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Shows `label` and reads one trimmed line, `None` once stdin is closed
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>, anyhow::Error> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;

        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

/// Uses `given` or asks for it on stdin
pub async fn password(given: Option<String>) -> Result<String, anyhow::Error> {
    if let Some(password) = given {
        return Ok(password);
    }
    Prompt::new()
        .ask("password: ")
        .await?
        .ok_or_else(|| anyhow::anyhow!("no password given"))
}
