use anyhow::{bail, Result};

use crate::api::{Ovr, SessionHandle};
use crate::config::InitConfig;
use crate::ffi::{GraphicsLuid, HmdDesc, SessionStatus};
use crate::result::OvrError;
use crate::runtime::Runtime;

/// Turns a failed call into an error carrying the runtime's own description.
pub fn check<T>(api: &dyn Ovr, result: Result<T, OvrError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let info = api.last_error_info();
            let message = info.message();
            if message.is_empty() {
                bail!("{}", err);
            }
            bail!("{}: {}", err, message);
        }
    }
}

/// An initialized runtime. Shuts the runtime down when dropped.
pub struct Context<'a> {
    api: Box<dyn Ovr + 'a>,
}

impl<'a> Context<'a> {
    pub fn new(runtime: &'a Runtime, config: &InitConfig) -> Result<Self> {
        Self::with_api(runtime.api()?, config)
    }

    pub fn with_api(api: Box<dyn Ovr + 'a>, config: &InitConfig) -> Result<Self> {
        let params = config.to_init_params();
        let result = api.initialize(&params);
        let code = check(api.as_ref(), result)?;
        log::info!(
            "Initialized VR runtime {} ({}, {})",
            api.version_string().unwrap_or_default(),
            api.pointer_width(),
            code
        );
        Ok(Self { api })
    }

    pub fn api(&self) -> &dyn Ovr {
        self.api.as_ref()
    }
}

impl Drop for Context<'_> {
    fn drop(&mut self) {
        log::debug!("Shutting down VR runtime");
        self.api.shutdown();
    }
}

/// A session on an initialized runtime, destroyed when dropped.
///
/// Borrowing the [`Context`] keeps the runtime alive for as long as any
/// session is open.
pub struct Session<'c> {
    context: &'c Context<'c>,
    handle: SessionHandle,
    luid: GraphicsLuid,
}

impl<'c> Session<'c> {
    pub fn new(context: &'c Context<'c>) -> Result<Self> {
        let api = context.api();
        let (handle, luid) = check(api, api.create())?;
        log::info!("Created session {:?}", handle.as_raw());
        Ok(Self {
            context,
            handle,
            luid,
        })
    }

    pub fn api(&self) -> &dyn Ovr {
        self.context.api()
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn luid(&self) -> &GraphicsLuid {
        &self.luid
    }

    pub fn hmd_desc(&self) -> HmdDesc {
        self.api().hmd_desc(self.handle())
    }

    pub fn status(&self) -> Result<SessionStatus> {
        check(self.api(), self.api().session_status(self.handle()))
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        log::info!("Destroying session {:?}", self.handle.as_raw());
        // the field itself is never used again
        let handle = unsafe { SessionHandle::from_raw(self.handle.as_raw()) };
        self.context.api().destroy(handle);
    }
}
