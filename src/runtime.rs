use std::ffi::c_void;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use libloading::Library;

use crate::api::Ovr;
use crate::config::RuntimeConfig;
use crate::dispatch::create_api;
use crate::entry::EntryPoints;
use crate::result::BindingError;

/// The loaded runtime library and the entry points resolved from it.
///
/// Everything that calls into the library borrows from this value, so it can
/// only be unloaded once no API object or session is left.
pub struct Runtime {
    entry_points: EntryPoints,
    library: Library,
    path: PathBuf,
}

impl Runtime {
    pub fn load(config: &RuntimeConfig) -> Result<Self> {
        let path = config.resolve_library_path();
        log::info!("Loading VR runtime from {}", path.display());

        let library = unsafe { Library::new(&path) }
            .map_err(BindingError::Load)
            .with_context(|| format!("failed to load {}", path.display()))?;

        let entry_points = unsafe {
            EntryPoints::load(|name| {
                library
                    .get::<unsafe extern "C" fn()>(name.to_bytes_with_nul())
                    .map(|symbol| *symbol as *const c_void)
                    .unwrap_or(std::ptr::null())
            })
        };

        Ok(Self {
            entry_points,
            library,
            path,
        })
    }

    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api(&self) -> Result<Box<dyn Ovr + '_>, BindingError> {
        create_api(&self.entry_points)
    }

    pub fn unload(self) -> Result<(), BindingError> {
        log::info!("Unloading VR runtime {}", self.path.display());
        self.library.close().map_err(BindingError::Load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_surfaces_the_platform_error() {
        let config = RuntimeConfig::with_library_path("./definitely/not/a/runtime.so");
        let err = Runtime::load(&config).err().unwrap();
        assert!(err.to_string().contains("definitely"));
        assert!(matches!(
            err.downcast_ref::<BindingError>(),
            Some(BindingError::Load(_))
        ));
    }
}
