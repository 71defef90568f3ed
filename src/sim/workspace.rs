//! Simulation workspaces.
//!
//! Each simulator run gets an exclusively-owned, uniquely named temporary
//! directory holding exactly one generated input file. The directory is
//! removed when the [`Workspace`] is dropped, which covers every exit path
//! of the run, including timeout and launch failure.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the generated input file, passed to the simulator by relative name
pub const INPUT_FILE_NAME: &str = "circuit.cir";

/// An isolated temporary directory scoped to one simulation invocation.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh, uniquely named workspace directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("ngspice-run-").tempdir()?;
        Ok(Self { dir })
    }

    /// Path of the workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the simulator input file: netlist first, control block last.
    ///
    /// The control block must follow the circuit description to reference
    /// it, so the order is fixed.
    pub fn write_input(&self, netlist: &str, command: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(INPUT_FILE_NAME);
        std::fs::write(&path, render_input(netlist, command))?;
        Ok(path)
    }
}

/// Render the simulator input file contents.
fn render_input(netlist: &str, command: &str) -> String {
    format!("{}\n.control\n{}\nquit\n.endc\n", netlist, command)
}
