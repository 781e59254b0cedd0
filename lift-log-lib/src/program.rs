//src/program.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const BUILTIN_PROGRAM: &str = include_str!("default_program.json");

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading program file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse program (JSON): {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid exercise identifier: '{0}' (expected d<day>_s<section>_e<exercise>)")]
    InvalidExerciseId(String),
}

/// Position of one exercise inside the program tree.
///
/// Identifiers only depend on structure, never on names, so renaming an
/// exercise keeps its logged entries. The textual form is the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExerciseId {
    pub day: usize,
    pub section: usize,
    pub exercise: usize,
}

impl ExerciseId {
    pub const fn new(day: usize, section: usize, exercise: usize) -> Self {
        Self {
            day,
            section,
            exercise,
        }
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_s{}_e{}", self.day, self.section, self.exercise)
    }
}

impl FromStr for ExerciseId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidExerciseId(s.to_string());
        let mut parts = s.trim().split('_');
        let mut next = |prefix: char| -> Result<usize, Error> {
            parts
                .next()
                .and_then(|p| p.strip_prefix(prefix))
                .and_then(|n| n.parse().ok())
                .ok_or_else(invalid)
        };
        let id = Self::new(next('d')?, next('s')?, next('e')?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(id)
    }
}

// Program files write sets/reps as either 4 or "6–8"; both end up as text.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub sets: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub reps: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub tempo: Option<String>,
}

impl Exercise {
    /// Prescription line, e.g. `4 sets • 6–8 reps • Tempo: 4-0-1-0`.
    pub fn details(&self) -> String {
        let mut parts = Vec::new();
        if let Some(sets) = self.sets.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("{sets} sets"));
        }
        if let Some(reps) = self.reps.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("{reps} reps"));
        }
        if let Some(tempo) = self.tempo.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Tempo: {tempo}"));
        }
        parts.join(" • ")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    MainLift(Exercise),
    Superset {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        exercises: Vec<Exercise>,
    },
}

impl Section {
    /// The exercises this section contributes, in sub-index order.
    pub fn exercises(&self) -> &[Exercise] {
        match self {
            Self::MainLift(exercise) => std::slice::from_ref(exercise),
            Self::Superset { exercises, .. } => exercises,
        }
    }

    /// Group label for supersets, `None` for a main lift.
    pub fn group_label(&self) -> Option<&str> {
        match self {
            Self::MainLift(_) => None,
            Self::Superset { name, .. } => Some(
                name.as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or("Superset"),
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub day: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Day {
    pub fn title(&self) -> String {
        if self.focus.is_empty() {
            self.day.clone()
        } else {
            format!("{}: {}", self.day, self.focus)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub weeks: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub tempo: Option<String>,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Program {
    /// The program bundled with the library.
    /// # Errors
    /// Only fails if the embedded document is broken.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_json_str(BUILTIN_PROGRAM)
    }

    /// # Errors
    /// Returns `Error::Parse` if the text is not a valid program document.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(Error::Parse)
    }

    /// Loads a program from a JSON file.
    /// # Errors
    /// Returns `Error::Io` or `Error::Parse`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Every exercise in render order with its structural identifier.
    pub fn exercises(&self) -> impl Iterator<Item = (ExerciseId, &Exercise)> + '_ {
        self.days.iter().enumerate().flat_map(|(day_idx, day)| {
            day.sections
                .iter()
                .enumerate()
                .flat_map(move |(section_idx, section)| {
                    section
                        .exercises()
                        .iter()
                        .enumerate()
                        .map(move |(ex_idx, exercise)| {
                            (ExerciseId::new(day_idx, section_idx, ex_idx), exercise)
                        })
                })
        })
    }

    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.days
            .get(id.day)?
            .sections
            .get(id.section)?
            .exercises()
            .get(id.exercise)
    }
}
