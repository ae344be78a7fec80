//! Script dispatcher: reads behavioral-script lines, expands the SVG-backed
//! commands into plain simulator commands and echoes everything else.

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result, ScriptError};
use crate::flatten::Flattener;
use crate::geometry::path_length::{heading, path_length, sample, sample_length};
use crate::geometry::transform::Transform;
use crate::geometry::wkt::multipolygon_wkt;
use crate::layers::{self, SvgDocument, SvgQuery};
use crate::model::{TrajectoryIndex, Vertex};
use log::{debug, info};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Simulator commands copied to the output unchanged.
pub const PASS_THROUGH: &[&str] = &[
    "trigger-reward",
    "seek-reward",
    "place-agent",
    "set-trial-phase",
    "goto",
    "set-title",
    "set-origin",
    "set-fence",
    "add-label",
    "set-scale-bars",
];

#[derive(Clone, Debug, PartialEq)]
pub enum Command<'a> {
    PassThrough,
    LoadSvg { file: &'a str, scale: f64 },
    SetArenaFromLayer { label: &'a str },
    AddLabelsFromLayer { label: &'a str },
    FollowTrajectory { id: &'a str },
    SamplePerimeter { id: &'a str },
    PlaceAgentAtStart { id: &'a str },
    SetFenceFromPath { id: &'a str },
}

fn arg<'a>(tokens: &[&'a str], i: usize, name: &str) -> Result<&'a str> {
    tokens.get(i).copied().ok_or_else(|| ConvertError::Syntax {
        command: tokens[0].to_string(),
        reason: format!("missing <{}>", name),
    })
}

impl<'a> Command<'a> {
    /// Recognizes a command from the whitespace-separated tokens of a line.
    /// `tokens` must not be empty.
    pub fn parse(tokens: &[&'a str]) -> Result<Self> {
        let keyword = tokens[0];
        if PASS_THROUGH.contains(&keyword) {
            return Ok(Command::PassThrough);
        }
        let cmd = match keyword {
            "load-svg" => {
                let file = arg(tokens, 1, "file")?;
                let raw = arg(tokens, 2, "scale")?;
                let scale = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .ok_or_else(|| ConvertError::Syntax {
                        command: keyword.to_string(),
                        reason: format!("scale '{}' is not a number", raw),
                    })?;
                Command::LoadSvg { file, scale }
            }
            "set-arena-from-svg-layer" => Command::SetArenaFromLayer {
                label: arg(tokens, 1, "layer")?,
            },
            "add-labels-from-svg-layer" => Command::AddLabelsFromLayer {
                label: arg(tokens, 1, "layer")?,
            },
            "follow-trajectory-from-svg-path" => Command::FollowTrajectory {
                id: arg(tokens, 1, "path")?,
            },
            "sample-perimeter-from-svg-path" => Command::SamplePerimeter {
                id: arg(tokens, 1, "path")?,
            },
            "place-agent-at-start-of-svg-path" => Command::PlaceAgentAtStart {
                id: arg(tokens, 1, "path")?,
            },
            "set-fence-from-svg-path" => Command::SetFenceFromPath {
                id: arg(tokens, 1, "path")?,
            },
            other => return Err(ConvertError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }

    /// Whether the command reads the document loaded by `load-svg`.
    pub fn needs_document(&self) -> bool {
        !matches!(self, Command::PassThrough | Command::LoadSvg { .. })
    }
}

struct Loaded {
    doc: Box<dyn SvgQuery>,
    transform: Transform,
}

/// One conversion run. Holds the document loaded by `load-svg` for the rest
/// of the run; nothing else is kept between lines.
pub struct Compiler<F> {
    options: ConvertOptions,
    base_dir: PathBuf,
    trajectory: TrajectoryIndex,
    flattener: F,
    loaded: Option<Loaded>,
}

impl<F: Flattener> Compiler<F> {
    pub fn new(flattener: F, options: ConvertOptions) -> Self {
        Compiler {
            options,
            base_dir: PathBuf::new(),
            trajectory: TrajectoryIndex::default(),
            flattener,
            loaded: None,
        }
    }

    /// Directory that `load-svg` file names are relative to, normally the
    /// directory of the script.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn trajectory(mut self, index: TrajectoryIndex) -> Self {
        self.trajectory = index;
        self
    }

    pub fn has_document(&self) -> bool {
        self.loaded.is_some()
    }

    fn fmt(&self, v: f64) -> String {
        self.options.fmt_num(v)
    }

    fn gotos(&self, path: &[Vertex]) -> Vec<String> {
        path.iter()
            .map(|v| format!("goto {} {}", self.fmt(v.x), self.fmt(v.y)))
            .collect()
    }

    fn document(&self, keyword: &str) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or_else(|| ConvertError::Ordering {
            command: keyword.to_string(),
            reason: "used before load-svg",
        })
    }

    fn load_svg(&mut self, file: &str, scale: f64) -> Result<Vec<String>> {
        if self.loaded.is_some() {
            return Err(ConvertError::Ordering {
                command: "load-svg".to_string(),
                reason: "repeated, a document is already loaded",
            });
        }
        let full = self.base_dir.join(file);
        let original = std::fs::read_to_string(&full)
            .map_err(|e| ConvertError::io(format!("reading {}", full.display()), e))?;
        let ids = layers::path_ids(&original)?;
        let flattened = self.flattener.flatten(&full, &ids, self.options.flatness)?;
        let doc = SvgDocument::parse(&flattened)?;
        info!(
            "loaded {} at scale {} ({} layers, {} paths)",
            full.display(),
            scale,
            doc.layer_count(),
            doc.path_count()
        );
        self.loaded = Some(Loaded {
            doc: Box::new(doc),
            transform: Transform::new(scale),
        });
        Ok(vec![format!(
            "set-arena-size {}",
            self.fmt(self.options.arena_size * scale)
        )])
    }

    /// Output lines for one script line. Comments and blank lines give none.
    pub fn compile_line(&mut self, line: &str) -> Result<Vec<String>> {
        if line.starts_with('#') {
            return Ok(Vec::new());
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        let keyword = tokens[0];
        let command = Command::parse(&tokens)?;
        debug!("{:?}", command);
        if command.needs_document() {
            self.document(keyword)?;
        }

        match command {
            Command::PassThrough => Ok(vec![tokens.join(" ")]),
            Command::LoadSvg { file, scale } => self.load_svg(file, scale),
            Command::SetArenaFromLayer { label } => {
                let l = self.document(keyword)?;
                let paths = layers::paths_in_layer(l.doc.as_ref(), label, &l.transform)?;
                Ok(vec![format!(
                    "set-arena {}",
                    multipolygon_wkt(&paths, self.options.precision)
                )])
            }
            Command::AddLabelsFromLayer { label } => {
                let l = self.document(keyword)?;
                let labels = layers::labels_in_layer(l.doc.as_ref(), label, &l.transform)?;
                Ok(labels
                    .iter()
                    .map(|lb| {
                        format!("add-label {} {} {}", self.fmt(lb.at.x), self.fmt(lb.at.y), lb.text)
                    })
                    .collect())
            }
            Command::FollowTrajectory { id } => {
                let l = self.document(keyword)?;
                let path = layers::path_by_id(l.doc.as_ref(), id, &l.transform)?;
                Ok(self.gotos(&path))
            }
            Command::SamplePerimeter { id } => {
                self.trajectory.validate()?;
                let l = self.document(keyword)?;
                let path = layers::path_by_id(l.doc.as_ref(), id, &l.transform)?;
                let target = sample_length(path_length(&path), self.trajectory)?;
                debug!(
                    "sampling '{}' to arc length {} for trajectory {}/{}",
                    id, target, self.trajectory.current, self.trajectory.total
                );
                let sampled = sample(&path, target).map_err(|e| e.for_path(id))?;
                Ok(self.gotos(&sampled))
            }
            Command::PlaceAgentAtStart { id } => {
                let l = self.document(keyword)?;
                let path = layers::path_by_id(l.doc.as_ref(), id, &l.transform)?;
                let h = heading(&path).map_err(|e| e.for_path(id))?;
                Ok(vec![format!(
                    "place-agent {} {} {}",
                    self.fmt(path[0].x),
                    self.fmt(path[0].y),
                    self.fmt(h)
                )])
            }
            Command::SetFenceFromPath { id } => {
                let l = self.document(keyword)?;
                let path = layers::path_by_id(l.doc.as_ref(), id, &l.transform)?;
                Ok(vec![format!(
                    "set-fence {} {}",
                    id,
                    multipolygon_wkt(&[path], self.options.precision)
                )])
            }
        }
    }

    /// Compiles every line of `input` into `out`, stopping at the first error.
    /// A failing line writes nothing; earlier output stays written.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<(), ScriptError> {
        let mut line_no = 0;
        for line in input.lines() {
            line_no += 1;
            let line = line.map_err(|e| ScriptError {
                line: line_no,
                command: None,
                error: ConvertError::io("reading script", e),
            })?;
            let keyword = || line.split_whitespace().next().map(str::to_string);
            let emitted = self.compile_line(&line).map_err(|error| ScriptError {
                line: line_no,
                command: keyword(),
                error,
            })?;
            for l in &emitted {
                writeln!(out, "{}", l).map_err(|e| ScriptError {
                    line: line_no,
                    command: keyword(),
                    error: ConvertError::io("writing output", e),
                })?;
            }
        }
        out.flush().map_err(|e| ScriptError {
            line: line_no,
            command: None,
            error: ConvertError::io("flushing output", e),
        })
    }
}
