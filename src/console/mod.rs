//! Line-oriented terminal front end
//!
//! Reads records interactively or from a file, prompts for missing
//! ancestors, and prints the final report with a sideways tree view.
//! Generic over the input and output streams so tests can script it.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::info;

use crate::ingest::{Coordinator, GapValueError, LineOutcome, SourceError, ValueSource};
use crate::path::TreePath;
use crate::tree::ValidationReport;
use crate::{SessionConfig, SessionError};

/// How the start menu was left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// Input was read; the tree is ready for validation
    Built,
    /// User asked to quit (or input ended at the menu)
    Quit,
}

/// Terminal session over arbitrary streams
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
    config: SessionConfig,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wrap an input and an output stream
    pub fn new(input: R, output: W, config: SessionConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Recover the output stream
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>, SourceError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>, SourceError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn report(&mut self, outcome: &LineOutcome) -> io::Result<()> {
        match outcome {
            LineOutcome::Blank | LineOutcome::Inserted { .. } => Ok(()),
            LineOutcome::Rejected(err) => writeln!(self.output, "{err}"),
            LineOutcome::Conflict { record, error } => {
                writeln!(self.output, "error on line {}: {error}", record.line)
            }
        }
    }

    fn fill_gaps(&mut self, coordinator: &mut Coordinator) -> Result<(), SessionError> {
        coordinator.end_input()?;
        coordinator.resolve_gaps(self)?;
        Ok(())
    }

    /// Read records until the sentinel, then fill gaps
    ///
    /// The sentinel is ignored until at least one record was seen. End of
    /// input acts like the sentinel once there is data.
    pub fn run_interactive(&mut self, coordinator: &mut Coordinator) -> Result<(), SessionError> {
        writeln!(self.output, "\nEnter records as `<value> <path>`, for example: 15 101")?;
        writeln!(self.output, "Type '{}' to finish.", self.config.sentinel)?;

        loop {
            let prompt = format!("[{}]> ", coordinator.line_number());
            let Some(line) = self.prompt(&prompt)? else {
                if coordinator.tree().is_empty() {
                    return Err(SourceError::Exhausted("at least one record".to_string()).into());
                }
                break;
            };

            if self.config.is_sentinel(&line) {
                if coordinator.tree().is_empty() {
                    writeln!(self.output, "No data yet. Enter at least one record.")?;
                    continue;
                }
                break;
            }

            let outcome = coordinator.ingest_line(&line)?;
            self.report(&outcome)?;
        }

        self.fill_gaps(coordinator)
    }

    /// Read records from `path`, then fill gaps from this console
    ///
    /// Returns `Ok(false)` when the file held no usable record. A file that
    /// cannot be opened or read yields [`SourceError::Unavailable`].
    pub fn load_file(
        &mut self,
        coordinator: &mut Coordinator,
        path: &Path,
    ) -> Result<bool, SessionError> {
        let unavailable = |source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        info!(path = %path.display(), "Loading records");
        for line in BufReader::new(file).lines() {
            let line = line.map_err(unavailable)?;
            let outcome = coordinator.ingest_line(&line)?;
            self.report(&outcome)?;
        }

        if coordinator.tree().is_empty() {
            writeln!(self.output, "{} contains no valid records.", path.display())?;
            return Ok(false);
        }

        self.fill_gaps(coordinator)?;
        Ok(true)
    }

    /// Start menu: manual input, file input or quit
    ///
    /// A failed file load resets line numbering and shows the prompt again.
    pub fn run_menu(&mut self, coordinator: &mut Coordinator) -> Result<MenuExit, SessionError> {
        writeln!(self.output, "Binary tree builder")?;
        writeln!(self.output, "-------------------")?;
        writeln!(self.output, "1. Manual input")?;
        writeln!(self.output, "2. Load from file")?;
        writeln!(self.output, "3. Exit")?;

        loop {
            let Some(choice) = self.prompt("\nChoose an action (1-3): ")? else {
                return Ok(MenuExit::Quit);
            };

            match choice.trim() {
                "1" => {
                    self.run_interactive(coordinator)?;
                    return Ok(MenuExit::Built);
                }
                "2" => {
                    let Some(name) = self.prompt("File name: ")? else {
                        return Ok(MenuExit::Quit);
                    };
                    match self.load_file(coordinator, Path::new(name.trim())) {
                        Ok(true) => return Ok(MenuExit::Built),
                        Ok(false) => {}
                        Err(SessionError::Source(err @ SourceError::Unavailable { .. })) => {
                            writeln!(self.output, "{err}")?;
                        }
                        Err(err) => return Err(err),
                    }
                    coordinator.reset_line_counter();
                }
                "3" => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(MenuExit::Quit);
                }
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    /// Validate, print the report and the tree, and close the session
    pub fn show_results(
        &mut self,
        coordinator: &mut Coordinator,
    ) -> Result<ValidationReport, SessionError> {
        coordinator.validate()?;
        let report = coordinator.finish()?;

        writeln!(self.output, "\n{}", "=".repeat(40))?;
        if report.is_clean() {
            writeln!(self.output, "Tree built successfully!")?;
        } else {
            writeln!(self.output, "Problems found:")?;
            write!(self.output, "{}", report.render(self.config.bullet))?;
        }

        if self.config.verbose {
            let tree = coordinator.tree();
            writeln!(
                self.output,
                "{} valued nodes, {} known paths, {} conflicts",
                tree.len(),
                tree.known_paths().len(),
                tree.conflicts().len()
            )?;
        }

        writeln!(self.output, "\nSideways view of the tree:")?;
        write!(self.output, "{}", coordinator.tree().sideways())?;
        self.output.flush()?;
        Ok(report)
    }
}

impl<R: BufRead, W: Write> ValueSource for Console<R, W> {
    fn announce(&mut self, missing: &BTreeSet<TreePath>) -> Result<(), SourceError> {
        writeln!(
            self.output,
            "\n{} intermediate node(s) need a value:",
            missing.len()
        )?;
        Ok(())
    }

    fn request(&mut self, path: &TreePath) -> Result<String, SourceError> {
        self.prompt(&format!("Value for node '{path}': "))?
            .ok_or_else(|| SourceError::Exhausted(format!("a value for node '{path}'")))
    }

    fn rejected(&mut self, _path: &TreePath, reason: &GapValueError) -> Result<(), SourceError> {
        writeln!(self.output, "Rejected: {reason}. Enter an integer.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            SessionConfig::default(),
        )
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_custom_sentinel_ends_input() {
        let config = SessionConfig::default().with_sentinel("done");
        let input = Cursor::new(b"5 0\nend 1\nDone\n".to_vec());
        let mut console = Console::new(input, Vec::new(), config);
        assert_eq!(console.config().sentinel, "done");

        let mut coordinator = Coordinator::new();
        console.run_interactive(&mut coordinator).unwrap();
        assert!(coordinator.is_input_closed());
        assert_eq!(coordinator.tree().known_paths().len(), 1);

        let text = output(console);
        assert!(text.contains("Type 'done' to finish."));
        assert!(text.contains("non-numeric value on line 2: 'end'"));
    }

    #[test]
    fn test_sentinel_ignored_without_data() {
        let mut console = console("end\n5 0\nEND\n");
        let mut coordinator = Coordinator::new();
        console.run_interactive(&mut coordinator).unwrap();

        assert_eq!(coordinator.tree().known_paths().len(), 1);
        let text = output(console);
        assert!(text.contains("No data yet"));
        assert!(text.contains("[1]> "));
        assert!(text.contains("[2]> "));
    }

    #[test]
    fn test_interactive_reports_rejections() {
        let mut console = console("abc 01\n5 012\n5 0\n9 0\nend\n");
        let mut coordinator = Coordinator::new();
        console.run_interactive(&mut coordinator).unwrap();

        let text = output(console);
        assert!(text.contains("non-numeric value on line 1: 'abc'"));
        assert!(text.contains("invalid path on line 2"));
        assert!(text.contains("error on line 4: conflict at node '0': 9 != 5"));
    }

    #[test]
    fn test_gap_prompts_repeat_until_valid() {
        let mut console = console("5 01\nend\n\nnope\n7\n");
        let mut coordinator = Coordinator::new();
        console.run_interactive(&mut coordinator).unwrap();

        assert_eq!(coordinator.tree().value_at(&"0".parse().unwrap()), Some(7));
        let text = output(console);
        assert_eq!(text.matches("Value for node '0': ").count(), 3);
        assert!(text.contains("Rejected: value cannot be empty"));
        assert!(text.contains("Rejected: 'nope' is not an integer"));
    }

    #[test]
    fn test_eof_without_data_is_exhausted() {
        let mut console = console("");
        let mut coordinator = Coordinator::new();
        assert!(matches!(
            console.run_interactive(&mut coordinator),
            Err(SessionError::Source(SourceError::Exhausted(_)))
        ));
    }

    #[test]
    fn test_menu_quit_and_invalid_choice() {
        let mut console = console("9\n3\n");
        let mut coordinator = Coordinator::new();
        assert_eq!(console.run_menu(&mut coordinator).unwrap(), MenuExit::Quit);
        let text = output(console);
        assert!(text.contains("Invalid choice."));
        assert!(text.contains("Goodbye."));
    }

    #[test]
    fn test_show_results_prints_report_and_tree() {
        let mut console = console("");
        let mut coordinator = Coordinator::new();
        coordinator.ingest_line("5 01").unwrap();

        let report = console.show_results(&mut coordinator).unwrap();
        assert_eq!(report.len(), 2);

        let text = output(console);
        assert!(text.contains("Problems found:"));
        assert!(text.contains("• node '0' has no value"));
        assert!(text.contains("• missing intermediate node '0'"));
        assert!(text.contains("└── 0\n"));
    }
}
