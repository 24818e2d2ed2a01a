use langsync_core::{FileChange, RunSummary, TranslatedEvent};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

/// How a console line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Note,
    Warn,
    Error,
    Success,
}

/// Line-oriented console writer. Coloring is all-or-nothing per line.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn line(&mut self, level: Level, text: &str) -> io::Result<()> {
        if !self.color {
            return writeln!(self.out, "{text}");
        }
        match level {
            Level::Info => writeln!(self.out, "{text}"),
            Level::Note => writeln!(self.out, "{}", text.bright_black()),
            Level::Warn => writeln!(self.out, "{}", text.yellow()),
            Level::Error => writeln!(self.out, "{}", text.red()),
            Level::Success => writeln!(self.out, "{}", text.green()),
        }
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn display_rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub struct TextReport<'a> {
    pub summary: &'a RunSummary,
    pub translated_root: &'a Path,
    pub ignore_obsolete: bool,
}

impl TextReport<'_> {
    pub fn render<W: Write>(&self, console: &mut Console<W>) -> io::Result<()> {
        let s = self.summary;

        for event in &s.translated_events {
            match *event {
                TranslatedEvent::Orphaned(i) => {
                    if let Some(orphan) = s.obsolete_files.get(i) {
                        console.line(
                            Level::Error,
                            &format!(
                                "The translation file {} doesn't exist in the reference translation files!",
                                orphan.expected.display()
                            ),
                        )?;
                    }
                }
                TranslatedEvent::Changed(i) => {
                    if let Some(change) = s.changes.get(i) {
                        self.render_change(change, console)?;
                    }
                }
            }
        }

        for missing in &s.missing_files {
            console.line(
                Level::Error,
                &format!(
                    "The translation file {} doesn't exist in your translation files!",
                    missing.expected.display()
                ),
            )?;
        }

        for moved in s.moved_phrases() {
            console.line(
                Level::Warn,
                &format!("{} was moved to {}", moved.key, moved.moved_to.display()),
            )?;
        }

        self.render_summary(console)
    }

    fn render_change<W: Write>(&self, change: &FileChange, console: &mut Console<W>) -> io::Result<()> {
        console.blank()?;
        console.line(
            Level::Warn,
            &format!(
                "There are differences in {}",
                display_rel(&change.translated, self.translated_root)
            ),
        )?;
        if !self.ignore_obsolete {
            for key in &change.obsolete {
                console.line(Level::Note, &format!("- {key} was removed"))?;
            }
        }
        for (key, value) in &change.missing {
            console.line(
                Level::Error,
                &format!("! {key}=\"{value}\" is missing in translation"),
            )?;
        }
        Ok(())
    }

    fn render_summary<W: Write>(&self, console: &mut Console<W>) -> io::Result<()> {
        let c = &self.summary.counters;
        console.blank()?;
        if self.summary.passed() {
            console.line(Level::Success, "Translation test passed.")?;
        } else {
            console.line(Level::Error, "Translation test not passed!")?;
        }
        console.line(
            Level::Info,
            &format!("- Total phrases found: {}", group_thousands(c.total_phrases)),
        )?;
        if c.changed_files > 0 {
            console.line(
                Level::Info,
                &format!("- Found {} translation files changed", c.changed_files),
            )?;
        }
        if c.missing_phrases > 0 {
            console.line(
                Level::Error,
                &format!("- Missing {} translation phrases", c.missing_phrases),
            )?;
        }
        if c.missing_files > 0 {
            console.line(
                Level::Error,
                &format!("- Missing {} translation files", c.missing_files),
            )?;
        }
        if c.obsolete_phrases > 0 && !self.ignore_obsolete {
            console.line(
                Level::Warn,
                &format!("- Found {} obsolete phrases", c.obsolete_phrases),
            )?;
        }
        if c.obsolete_files > 0 {
            console.line(
                Level::Warn,
                &format!("- Found {} obsolete translation files", c.obsolete_files),
            )?;
        }
        Ok(())
    }
}
