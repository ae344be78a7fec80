use crate::error::{ConvertError, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Reduces the curves of an SVG file to move/line/close path data.
pub trait Flattener {
    /// Returns the flattened document as XML. Only the paths named in `ids`
    /// need to be flattened; `flatness` is the maximum deviation allowed.
    fn flatten(&self, svg_file: &Path, ids: &[String], flatness: f64) -> Result<String>;
}

/// Runs an external flattening program and captures its standard output:
/// `program [args] --flatness <f> --id <id>... <file>`.
#[derive(Clone, Debug)]
pub struct ExternalFlattener {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ExternalFlattener {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ExternalFlattener {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command(&self, svg_file: &Path, ids: &[String], flatness: f64) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg("--flatness").arg(flatness.to_string());
        for id in ids {
            cmd.arg("--id").arg(id);
        }
        cmd.arg(svg_file);
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }
}

impl Flattener for ExternalFlattener {
    fn flatten(&self, svg_file: &Path, ids: &[String], flatness: f64) -> Result<String> {
        let program = self.program.display().to_string();
        info!(
            "flattening {} ({} paths) with {}",
            svg_file.display(),
            ids.len(),
            program
        );
        // Blocks until the child exits and both pipes are drained.
        let output = self
            .command(svg_file, ids, flatness)
            .output()
            .map_err(|e| ConvertError::io(format!("running flattener '{}'", program), e))?;
        if !output.status.success() {
            return Err(ConvertError::Flatten {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!("flattener produced {} bytes", output.stdout.len());
        String::from_utf8(output.stdout).map_err(|e| {
            ConvertError::io(
                format!("reading output of flattener '{}'", program),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

/// Hands the file back untouched, for documents that already contain only
/// straight-line path data.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughFlattener;

impl Flattener for PassthroughFlattener {
    fn flatten(&self, svg_file: &Path, _ids: &[String], _flatness: f64) -> Result<String> {
        std::fs::read_to_string(svg_file)
            .map_err(|e| ConvertError::io(format!("reading {}", svg_file.display()), e))
    }
}

impl<F: Flattener + ?Sized> Flattener for &F {
    fn flatten(&self, svg_file: &Path, ids: &[String], flatness: f64) -> Result<String> {
        (**self).flatten(svg_file, ids, flatness)
    }
}

impl<F: Flattener + ?Sized> Flattener for Box<F> {
    fn flatten(&self, svg_file: &Path, ids: &[String], flatness: f64) -> Result<String> {
        (**self).flatten(svg_file, ids, flatness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn command_line_layout() {
        let f = ExternalFlattener::new("flatten.py").with_args(vec!["-q".to_string()]);
        let cmd = f.command(Path::new("a.svg"), &["p1".to_string(), "p2".to_string()], 0.1);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "flatten.py");
        assert_eq!(args, vec!["-q", "--flatness", "0.1", "--id", "p1", "--id", "p2", "a.svg"]);
    }

    #[test]
    fn missing_program_is_io_error() {
        let f = ExternalFlattener::new("/nonexistent/arenascript-flatten");
        let err = f.flatten(Path::new("a.svg"), &[], 0.1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[cfg(unix)]
    fn shell(script: &str) -> ExternalFlattener {
        ExternalFlattener::new("sh").with_args(vec!["-c".to_string(), script.to_string(), "sh".to_string()])
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_flatten_error_with_stderr() {
        let err = shell("echo oops >&2; exit 3")
            .flatten(Path::new("a.svg"), &["p".to_string()], 0.1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Flatten);
        match err {
            ConvertError::Flatten { program, status, stderr } => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_of_successful_run() {
        // the generated arguments arrive as "$@"; the last one is the file
        let f = shell(r#"for a; do last=$a; done; [ "$last" = a.svg ] || exit 1; printf '<svg/>'"#);
        let xml = f.flatten(Path::new("a.svg"), &["p1".to_string()], 0.1).unwrap();
        assert_eq!(xml, "<svg/>");
        assert_eq!(crate::layers::SvgDocument::parse(&xml).unwrap().path_count(), 0);
    }

    #[test]
    fn passthrough_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"<svg/>").unwrap();
        let xml = PassthroughFlattener.flatten(file.path(), &[], 0.1).unwrap();
        assert_eq!(xml, "<svg/>");
    }
}
