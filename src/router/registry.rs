//! Keyword → handler table.
//!
//! [`CommandRegistry`] is built once at start-up and never mutated
//! afterwards, so it can be shared across connection tasks behind an `Arc`
//! without locking.

use std::collections::HashMap;
use std::fmt;

use crate::domain::Origin;
use crate::error::ControlError;
use crate::protocol::{Command, Keyword};
use crate::subsystem::Subsystems;

/// Function invoked for a matched keyword.
pub type CommandHandler = fn(&Subsystems, Origin, &Command) -> Result<(), ControlError>;

/// Immutable mapping from wire keyword to subsystem operation.
pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandHandler>,
}

impl CommandRegistry {
    /// Creates a registry with no keywords.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Creates the registry for the full tracker protocol.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .register(Keyword::CalibrationStart, |s, origin, _| {
                s.calibration.start(origin)
            })
            .register(Keyword::CalibrationAbort, |s, origin, _| {
                s.calibration.abort(origin)
            })
            .register(Keyword::CalibrationParameters, |s, origin, cmd| {
                s.calibration.parameters(origin, cmd.param(0))
            })
            .register(Keyword::CalibrationAreaSize, |s, origin, cmd| {
                let width = int_param(cmd, 0, "width")?;
                let height = int_param(cmd, 1, "height")?;
                s.calibration.area_size(origin, width, height)
            })
            .register(Keyword::CalibrationValidate, |s, origin, _| {
                s.calibration.accept(origin)
            })
            .register(Keyword::CalibrationUpdateMethod, |s, origin, cmd| {
                let method = int_param(cmd, 0, "method")?;
                s.calibration.update_method(origin, method)
            })
            .register(Keyword::StreamStart, |s, origin, _| s.stream.start(origin))
            .register(Keyword::StreamStop, |s, origin, _| s.stream.stop(origin))
            .register(Keyword::LogStart, |s, origin, _| s.log.start(origin))
            .register(Keyword::LogStop, |s, origin, _| s.log.stop(origin))
            .register(Keyword::LogPathGet, |s, origin, _| s.log.path_get(origin))
            .register(Keyword::LogPathSet, |s, origin, cmd| {
                s.log.path_set(origin, cmd.param(0))
            })
            .register(Keyword::LogWriteLine, |s, origin, cmd| {
                s.log.write_line(origin, cmd.tail())
            })
            .register(Keyword::UiMinimize, |s, origin, _| s.window.minimize(origin))
            .register(Keyword::UiRestore, |s, origin, _| s.window.restore(origin))
            .register(Keyword::UiSettings, |s, origin, _| {
                s.window.show_settings(origin)
            })
            .register(Keyword::CameraChange, |s, origin, cmd| {
                let device = int_param(cmd, 0, "device")?;
                let mode = int_param(cmd, 1, "mode")?;
                s.camera.change(origin, device, mode)
            })
            .register(Keyword::VideoDetach, |s, origin, _| {
                s.viewer.detach_video(origin)
            })
            .register(Keyword::TrackBoxShow, |s, origin, _| {
                s.viewer.show_track_box(origin)
            })
            .register(Keyword::TrackBoxHide, |s, origin, _| {
                s.viewer.hide_track_box(origin)
            })
            .register(Keyword::Autotune, |s, origin, _| s.autotune.run(origin))
    }

    /// Adds (or replaces) the handler for `keyword`.
    #[must_use]
    pub fn register(mut self, keyword: Keyword, handler: CommandHandler) -> Self {
        self.handlers.insert(keyword.as_str(), handler);
        self
    }

    /// Looks up the handler for a wire keyword. Case-sensitive.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<CommandHandler> {
        self.handlers.get(keyword).copied()
    }

    /// Number of registered keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no keyword is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keywords: Vec<&str> = self.handlers.keys().copied().collect();
        keywords.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("keywords", &keywords)
            .finish()
    }
}

/// Strictly parses positional parameter `index` as an `i32`.
///
/// # Errors
///
/// Returns [`ControlError::InvalidParameter`] for an empty or non-numeric
/// token.
pub fn int_param(cmd: &Command, index: usize, name: &'static str) -> Result<i32, ControlError> {
    let raw = cmd.param(index);
    raw.parse::<i32>()
        .map_err(|source| ControlError::InvalidParameter {
            keyword: cmd.keyword().to_string(),
            name,
            value: raw.to_string(),
            source,
        })
}
