use crate::error::Error;
use ahash::AHashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    File,
    EmptyDir,
}

/// What happened to a path handed to [`ConfirmationGate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Removed,
    /// The user declined; nothing was touched.
    Kept,
    /// Nothing was touched and the rest of this directory should not be evaluated.
    SkipDir(PathBuf),
    /// The user asked to quit the whole run.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
    Skip,
    Quit,
}

/// Every deletion of the run passes through here.
pub struct ConfirmationGate<'io> {
    interactive: bool,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
    removed: AHashSet<PathBuf>,
}

impl ConfirmationGate<'static> {
    /// Deletes without asking.
    pub fn unattended() -> Self {
        Self::with_io(false, io::empty(), io::sink())
    }

    /// Prompts on stdout and reads answers from stdin when `interactive`.
    pub fn stdio(interactive: bool) -> Self {
        Self::with_io(interactive, io::stdin().lock(), io::stdout())
    }
}

impl<'io> ConfirmationGate<'io> {
    pub fn with_io(
        interactive: bool,
        input: impl BufRead + 'io,
        output: impl Write + 'io,
    ) -> Self {
        Self {
            interactive,
            input: Box::new(input),
            output: Box::new(output),
            removed: AHashSet::new(),
        }
    }

    /// Delete `path` (a file, or an empty directory) unless the user says otherwise.
    pub fn resolve(&mut self, path: &Path, kind: RemovalKind) -> Result<Verdict, Error> {
        if self.removed.contains(path) {
            return Err(Error::DoubleRemoval(path.to_path_buf()));
        }

        if self.interactive {
            match self.ask(path, kind)? {
                Answer::Yes => {}
                Answer::No => return Ok(Verdict::Kept),
                Answer::Skip => {
                    let dir = path.parent().unwrap_or(path).to_path_buf();
                    return Ok(Verdict::SkipDir(dir));
                }
                Answer::Quit => return Ok(Verdict::Abort),
            }
        }

        let result = match kind {
            RemovalKind::File => fs::remove_file(path),
            RemovalKind::EmptyDir => fs::remove_dir(path),
        };
        result.map_err(|source| Error::Remove {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Removed {}", path.display());
        self.removed.insert(path.to_path_buf());
        Ok(Verdict::Removed)
    }

    fn ask(&mut self, path: &Path, kind: RemovalKind) -> Result<Answer, Error> {
        // Full paths on purpose: no ambiguity about what is being deleted.
        let (prompt, hint) = match kind {
            RemovalKind::File => (
                format!("  Delete duplicate file {}? (y/n/q/s) ", path.display()),
                "  Please enter y(es), n(o), q(uit), or s(kip).",
            ),
            RemovalKind::EmptyDir => (
                format!("  Remove empty directory {}? (y/n/q) ", path.display()),
                "  Please enter y(es), n(o), or q(uit).",
            ),
        };

        let mut line = String::new();
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed while waiting for confirmation",
                )));
            }

            match line.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Ok(Answer::Yes),
                Some('n') => return Ok(Answer::No),
                Some('q') => return Ok(Answer::Quit),
                Some('s') if kind == RemovalKind::File => return Ok(Answer::Skip),
                _ => writeln!(self.output, "{}", hint)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_unattended_removes_file_and_dir() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("dup.txt");
        let dir = tmp.path().join("empty");
        fs::write(&file, "x").unwrap();
        fs::create_dir(&dir).unwrap();

        let mut gate = ConfirmationGate::unattended();
        assert_eq!(gate.resolve(&file, RemovalKind::File).unwrap(), Verdict::Removed);
        assert_eq!(gate.resolve(&dir, RemovalKind::EmptyDir).unwrap(), Verdict::Removed);
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_answers_are_case_insensitive_first_character() {
        let tmp = tempdir().unwrap();
        let keep = tmp.path().join("keep");
        let gone = tmp.path().join("gone");
        fs::write(&keep, "x").unwrap();
        fs::write(&gone, "x").unwrap();

        let mut output = Vec::new();
        {
            let mut gate =
                ConfirmationGate::with_io(true, Cursor::new("Nope\nYES\n"), &mut output);
            assert_eq!(gate.resolve(&keep, RemovalKind::File).unwrap(), Verdict::Kept);
            assert_eq!(gate.resolve(&gone, RemovalKind::File).unwrap(), Verdict::Removed);
        }
        assert!(keep.exists());
        assert!(!gone.exists());
        let prompts = String::from_utf8(output).unwrap();
        assert!(prompts.contains(&format!("Delete duplicate file {}? (y/n/q/s)", keep.display())));
    }

    #[test]
    fn test_invalid_answer_reprompts() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        let mut output = Vec::new();
        {
            let mut gate =
                ConfirmationGate::with_io(true, Cursor::new("\nmaybe\ny\n"), &mut output);
            assert_eq!(gate.resolve(&file, RemovalKind::File).unwrap(), Verdict::Removed);
        }
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Please enter y(es), n(o), q(uit), or s(kip).").count(), 2);
        assert_eq!(text.matches("Delete duplicate file").count(), 3);
    }

    #[test]
    fn test_skip_returns_parent_directory() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("sub").join("f");
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(&file, "x").unwrap();

        let mut gate = ConfirmationGate::with_io(true, Cursor::new("skip\n"), io::sink());
        assert_eq!(
            gate.resolve(&file, RemovalKind::File).unwrap(),
            Verdict::SkipDir(tmp.path().join("sub"))
        );
        assert!(file.exists());
    }

    #[test]
    fn test_skip_is_not_offered_for_directories() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("empty");
        fs::create_dir(&dir).unwrap();

        let mut output = Vec::new();
        {
            let mut gate =
                ConfirmationGate::with_io(true, Cursor::new("s\nq\n"), &mut output);
            assert_eq!(gate.resolve(&dir, RemovalKind::EmptyDir).unwrap(), Verdict::Abort);
        }
        assert!(dir.exists());
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Remove empty directory"));
        assert!(text.contains("Please enter y(es), n(o), or q(uit)."));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        let mut gate = ConfirmationGate::with_io(true, Cursor::new(""), io::sink());
        assert!(matches!(
            gate.resolve(&file, RemovalKind::File),
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::UnexpectedEof
        ));
        assert!(file.exists());
    }

    #[test]
    fn test_second_removal_of_same_path_is_rejected() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        let mut gate = ConfirmationGate::unattended();
        gate.resolve(&file, RemovalKind::File).unwrap();
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            gate.resolve(&file, RemovalKind::File),
            Err(Error::DoubleRemoval(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_remove_error() {
        let tmp = tempdir().unwrap();
        let mut gate = ConfirmationGate::unattended();
        let err = gate
            .resolve(&tmp.path().join("missing"), RemovalKind::File)
            .unwrap_err();
        assert!(matches!(err, Error::Remove { .. }));
    }
}
