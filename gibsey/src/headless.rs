//! Headless mode for the reader.
//!
//! A line-oriented interface for scripted reading sessions and automated
//! testing. Every reveal runs to completion before the next line is read.

use std::io::{self, BufRead, Write};

use gibsey_core::{
    ChapterId, CharacterId, InteractionController, PageId, QueryOutcome, RevealTick, TickOutcome,
    VaultId, VaultTarget, VaultToggle,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A controller plus the tick stream that drives its reveals.
pub struct HeadlessSession {
    controller: InteractionController,
    ticks: UnboundedReceiver<RevealTick>,
}

impl HeadlessSession {
    pub fn new(controller: InteractionController, ticks: UnboundedReceiver<RevealTick>) -> Self {
        Self { controller, ticks }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Apply ticks until the live reveal finishes.
    async fn finish_reveal(&mut self) {
        while self.controller.reveal().running {
            let Some(tick) = self.ticks.recv().await else {
                break;
            };
            if self.controller.on_tick(tick) == TickOutcome::Completed {
                break;
            }
        }
    }

    /// Run one input line, writing its output to `out`.
    pub async fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = line.strip_prefix('#') else {
            self.ask(line, out)?;
            return Ok(Flow::Continue);
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        match name {
            "quit" | "exit" => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Quit);
            }
            "chapter" => match rest.parse() {
                Ok(n) => match self.controller.on_select_chapter(ChapterId(n)) {
                    Ok(()) => {
                        let title = self
                            .controller
                            .selection()
                            .chapter
                            .as_ref()
                            .map(|c| c.title.clone())
                            .unwrap_or_default();
                        writeln!(out, "[CHAPTER] {title}")?;
                        self.print_theme(out)?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                },
                Err(_) => writeln!(out, "[ERROR] Usage: #chapter <id>")?,
            },
            "character" => match rest.parse() {
                Ok(n) => match self.controller.on_select_character(CharacterId(n)) {
                    Ok(()) => {
                        let name = self
                            .controller
                            .selection()
                            .character
                            .as_ref()
                            .map(|c| c.name.clone())
                            .unwrap_or_default();
                        writeln!(out, "[CHARACTER] {name}")?;
                        self.print_theme(out)?;
                        self.print_reveal(out).await?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                },
                Err(_) => writeln!(out, "[ERROR] Usage: #character <id>")?,
            },
            "page" => match rest.parse() {
                Ok(n) => match self.controller.on_select_page(PageId(n)) {
                    Ok(()) => {
                        writeln!(out, "[PAGE] {n}")?;
                        self.print_reveal(out).await?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                },
                Err(_) => writeln!(out, "[ERROR] Usage: #page <number>")?,
            },
            "next" | "prev" => {
                let result = if name == "next" {
                    self.controller.on_next_page()
                } else {
                    self.controller.on_previous_page()
                };
                match result {
                    Ok(page) => {
                        writeln!(out, "[PAGE] {page}")?;
                        self.print_reveal(out).await?;
                    }
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                }
            }
            "vault" => {
                let mut args = rest.splitn(2, char::is_whitespace);
                match args.next().filter(|id| !id.is_empty()) {
                    Some(id) => {
                        let label = args.next().map(str::trim).unwrap_or(id);
                        match self.controller.on_toggle_vault(id, label) {
                            Ok(VaultToggle::Added) => writeln!(out, "[VAULT] Added {id}")?,
                            Ok(VaultToggle::Removed) => writeln!(out, "[VAULT] Removed {id}")?,
                            Err(e) => writeln!(out, "[ERROR] {e}")?,
                        }
                    }
                    None => {
                        let entries = self.controller.vault().list();
                        if entries.is_empty() {
                            writeln!(out, "[VAULT] No pages saved.")?;
                        } else {
                            writeln!(out, "[VAULT]")?;
                            for entry in entries {
                                writeln!(out, "  {} - {}", entry.id, entry.label)?;
                            }
                        }
                    }
                }
            }
            "goto" => {
                let id = VaultId::new(rest);
                match self.controller.on_navigate_vault(&id) {
                    Ok(Some(VaultTarget::Page(page))) => {
                        writeln!(out, "[PAGE] {page}")?;
                        self.print_reveal(out).await?;
                    }
                    Ok(Some(VaultTarget::Chapter(chapter))) => {
                        writeln!(out, "[CHAPTER] {chapter}")?;
                        self.print_theme(out)?;
                    }
                    Ok(None) => writeln!(out, "[IGNORED] {id} is not in the vault")?,
                    Err(e) => writeln!(out, "[ERROR] {e}")?,
                }
            }
            "status" => {
                let json = serde_json::to_string(&self.controller.snapshot())
                    .map_err(io::Error::other)?;
                writeln!(out, "[STATUS] {json}")?;
            }
            "help" => print_help(out)?,
            _ => writeln!(out, "[ERROR] Unknown command. Type #help for help.")?,
        }

        out.flush()?;
        Ok(Flow::Continue)
    }

    fn ask(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        match self.controller.on_submit_query(text) {
            Ok(QueryOutcome::Recorded(n)) => writeln!(out, "[QUERY {n}] {}", text.trim()),
            Ok(QueryOutcome::Ignored) => Ok(()),
            Err(e) => writeln!(out, "[ERROR] {e}"),
        }
    }

    async fn print_reveal(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.finish_reveal().await;
        writeln!(out, "{}", self.controller.reveal().revealed_text())
    }

    fn print_theme(&self, out: &mut impl Write) -> io::Result<()> {
        let theme = self.controller.theme();
        match &theme.symbol {
            Some(symbol) => writeln!(out, "[THEME] {} {}", theme.color, symbol.as_str()),
            None => writeln!(out, "[THEME] {}", theme.color),
        }
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[HELP]")?;
    writeln!(out, "  #chapter <id>        - Select a chapter")?;
    writeln!(out, "  #character <id>      - Select a character and read their description")?;
    writeln!(out, "  #page <n>            - Read a page")?;
    writeln!(out, "  #next / #prev        - Read the next or previous page")?;
    writeln!(out, "  #vault <id> [label]  - Save or remove a vault entry")?;
    writeln!(out, "  #vault               - List the vault")?;
    writeln!(out, "  #goto <id>           - Open a vault entry")?;
    writeln!(out, "  #status              - Print the current view as JSON")?;
    writeln!(out, "  #quit                - Exit")?;
    writeln!(out, "  (anything else is asked of the selected character)")
}

/// Run the reader in headless mode over stdin and stdout.
pub async fn run_headless(mut session: HeadlessSession) -> io::Result<()> {
    let mut stdout = io::stdout();

    writeln!(stdout, "=== Gibsey Headless Mode ===")?;
    writeln!(
        stdout,
        "{} chapters, {} characters, {} pages",
        session.controller().catalog().chapters().len(),
        session.controller().catalog().characters().len(),
        session.controller().pages().len()
    )?;
    writeln!(stdout)?;
    print_help(&mut stdout)?;
    writeln!(stdout)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        if session.execute(&line, &mut stdout).await? == Flow::Quit {
            break;
        }
    }

    Ok(())
}
