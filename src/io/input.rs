//! Serialized inputs: the analyzer dump and the execution data dump.
//!
//! Both are JSON. The analyzer dump stands in for the bytecode analyzer's
//! callbacks: one entry per class with its method records, in discovery
//! order. The execution data dump maps class ids to probe arrays.

use crate::coverage::{ClassDescriptor, ClassId, ExecutionDataSource, MethodCoverage};
use crate::errors::{Result, SanitizeError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// One class as reported by the bytecode analyzer.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassDump {
    #[serde(flatten)]
    pub descriptor: ClassDescriptor,
    /// Class file path relative to the classes directory
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodCoverage>,
}

impl ClassDump {
    /// Location used for include/exclude matching.
    pub fn location(&self) -> String {
        self.location
            .clone()
            .unwrap_or_else(|| format!("{}.class", self.descriptor.name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisDump {
    /// Report bundle name, usually the project name
    #[serde(default)]
    pub bundle: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassDump>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub dump: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionData {
    pub id: ClassId,
    pub name: String,
    pub probes: Vec<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExecutionDump {
    #[serde(default)]
    sessions: Vec<SessionInfo>,
    #[serde(default)]
    classes: Vec<ExecutionData>,
}

/// Probe arrays keyed by class id.
///
/// Entries recorded more than once for the same id (several sessions) are
/// merged: a probe counts as hit if any session hit it.
#[derive(Debug, Clone, Default)]
pub struct ExecutionDataStore {
    sessions: Vec<SessionInfo>,
    entries: HashMap<ClassId, ExecutionData>,
    names: HashSet<String>,
}

impl ExecutionDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, data: ExecutionData) -> Result<()> {
        self.names.insert(data.name.clone());
        match self.entries.get_mut(&data.id) {
            Some(existing) => merge_probes(existing, &data),
            None => {
                self.entries.insert(data.id, data);
                Ok(())
            }
        }
    }

    pub fn add_session(&mut self, session: SessionInfo) {
        self.sessions.push(session);
    }

    pub fn sessions(&self) -> &[SessionInfo] {
        &self.sessions
    }

    pub fn get(&self, id: ClassId) -> Option<&ExecutionData> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(contents: &str, path: &Path) -> Result<Self> {
        let dump: ExecutionDump =
            serde_json::from_str(contents).map_err(|e| SanitizeError::json(path, e))?;
        let mut store = Self::new();
        for session in dump.sessions {
            store.add_session(session);
        }
        for data in dump.classes {
            store.put(data)?;
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SanitizeError::file_system("Unable to read execution data file", path, e)
        })?;
        let store = Self::from_json(&contents, path)?;
        tracing::debug!(
            "Loaded execution data for {} class(es) from {} session(s)",
            store.len(),
            store.sessions.len()
        );
        Ok(store)
    }
}

fn merge_probes(existing: &mut ExecutionData, other: &ExecutionData) -> Result<()> {
    if existing.name != other.name || existing.probes.len() != other.probes.len() {
        return Err(SanitizeError::IncompatibleExecutionData {
            name: other.name.clone(),
            id: other.id.to_string(),
        });
    }
    for (hit, other_hit) in existing.probes.iter_mut().zip(&other.probes) {
        *hit |= *other_hit;
    }
    Ok(())
}

impl ExecutionDataSource for ExecutionDataStore {
    fn probes_for(&self, id: ClassId) -> Option<&[bool]> {
        self.entries.get(&id).map(|data| data.probes.as_slice())
    }

    fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl AnalysisDump {
    pub fn from_json(contents: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| SanitizeError::json(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SanitizeError::file_system("Unable to read class analysis dump", path, e))?;
        Self::from_json(&contents, path)
    }
}
