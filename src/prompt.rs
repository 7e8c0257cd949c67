//! Interactive terminal prompts: candidate disambiguation and save confirmation

use crate::chapters::MovieResult;
use crate::error::{ChapterLookupError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::debug;

/// Line-oriented prompt over any async reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

/// Prompt bound to the process terminal
pub type TerminalPrompt = Prompt<BufReader<Stdin>, Stdout>;

impl TerminalPrompt {
    pub fn terminal() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Release the underlying reader and writer
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Write one line of output to the user
    pub async fn print_line(&mut self, text: &str) -> Result<()> {
        self.write(text).await?;
        self.write("\n").await
    }

    /// Undecodable bytes become replacement characters, which no answer matches
    async fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line).await? == 0 {
            return Err(ChapterLookupError::InputClosed);
        }
        Ok(String::from_utf8_lossy(&line)
            .trim_end_matches(['\r', '\n'])
            .to_string())
    }

    /// Pick one candidate.
    ///
    /// No candidates yields `None`, a single candidate is returned without
    /// prompting, otherwise the numbered list is shown until a number in
    /// `1..=len` is entered.
    pub async fn choose(&mut self, mut candidates: Vec<MovieResult>) -> Result<Option<MovieResult>> {
        match candidates.len() {
            0 => return Ok(None),
            1 => return Ok(candidates.pop()),
            _ => {}
        }

        let menu = render_menu(&candidates);
        loop {
            self.write(&menu).await?;
            self.write("Select movie: ").await?;

            let answer = self.read_line().await?;
            match parse_choice(&answer, candidates.len()) {
                Some(choice) => {
                    debug!("Selected candidate {}", choice);
                    return Ok(Some(candidates.swap_remove(choice - 1)));
                }
                None => debug!("Rejected selection '{}'", answer),
            }
        }
    }

    /// Ask before writing; only an exact `YES` confirms
    pub async fn confirm_save(&mut self) -> Result<bool> {
        self.write("Save to file? (Type YES uppercase, defaults NO) ").await?;
        match self.read_line().await {
            Ok(answer) => Ok(answer == "YES"),
            Err(ChapterLookupError::InputClosed) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Numbered candidate list, numbers right-aligned to the widest index
pub fn render_menu(candidates: &[MovieResult]) -> String {
    let width = candidates.len().to_string().len();
    let mut menu = String::from("Multiple choices found! Please select from:\n");
    for (idx, candidate) in candidates.iter().enumerate() {
        menu.push_str(&format!("{:>width$}. {}\n", idx + 1, candidate.summary(), width = width));
    }
    menu
}

/// A selection is valid when it is all digits and within `1..=count`
pub fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    answer
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=count).contains(choice))
}
