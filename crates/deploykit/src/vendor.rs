//! Pre-push dependency vendoring.
//!
//! Applications that cannot fetch their dependencies while staging ship a
//! `package.sh` next to their sources. When present it is run from the
//! source directory before anything is pushed; when absent vendoring is a
//! no-op.

use std::env;
use std::path::{Path, PathBuf};

use crate::backend::RemoteExecutor;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::types::Application;

/// Name of the vendoring script, relative to the application's sources
pub const VENDOR_SCRIPT: &str = "package.sh";

/// Decides whether an application has a vendoring script.
pub trait VendorScript: Send + Sync {
    /// Whether the script exists in `dir`
    fn is_present(&self, dir: &Path) -> bool;

    /// Command that runs the script from inside `dir`
    fn command(&self) -> String {
        format!("./{VENDOR_SCRIPT}")
    }
}

/// Looks for [`VENDOR_SCRIPT`] on disk.
pub struct PackageScript;

impl VendorScript for PackageScript {
    fn is_present(&self, dir: &Path) -> bool {
        dir.join(VENDOR_SCRIPT).is_file()
    }
}

/// Scoped change of the process working directory.
///
/// The previous directory is restored when the guard drops, whichever way
/// the scope is left.
#[derive(Debug)]
pub struct WorkingDir {
    previous: PathBuf,
    current: PathBuf,
}

impl WorkingDir {
    /// Change into `dir`, remembering where we were.
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        let current = env::current_dir()?;
        Ok(Self { previous, current })
    }

    /// The directory entered
    pub fn path(&self) -> &Path {
        &self.current
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            log::warn!(
                "Could not return to {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}

/// Runs the vendoring script, if any, before a push.
pub struct VendorStep {
    script: Box<dyn VendorScript>,
}

impl VendorStep {
    /// Vendoring driven by `package.sh` on disk.
    pub fn new() -> Self {
        Self::with_script(Box::new(PackageScript))
    }

    /// Vendoring with a custom presence check (useful for testing).
    pub fn with_script(script: Box<dyn VendorScript>) -> Self {
        Self { script }
    }

    /// Vendor `app`'s dependencies.
    ///
    /// # Errors
    ///
    /// - `Io`: the source directory cannot be entered
    /// - `VendorFailure`: the script exited non-zero; carries its output
    pub fn execute(
        &self,
        app: &Application,
        executor: &dyn RemoteExecutor,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        let cwd = WorkingDir::enter(&app.src_directory)?;

        if !self.script.is_present(cwd.path()) {
            log::debug!("No {VENDOR_SCRIPT} in {}", cwd.path().display());
            return Ok(());
        }

        reporter.action("Vendoring dependencies before push");
        let command = self.script.command();
        reporter.info(&format!("$ {command}"));

        let result = executor.run(&command)?;
        if !result.is_success() {
            return Err(Error::VendorFailure {
                output: result.output,
            });
        }

        Ok(())
    }
}

impl Default for VendorStep {
    fn default() -> Self {
        Self::new()
    }
}
