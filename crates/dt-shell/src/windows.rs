//! Desktop window host.
//!
//! The shell never draws windows. It asks a [`WindowHost`] to open, close,
//! minimize or toggle fullscreen on an app by id. [`WindowRegistry`] is the
//! in-memory host used by the binary and by tests: it knows the desktop's
//! apps and records open state and z-order.

use thiserror::Error;

/// App ids the desktop knows how to launch.
pub const KNOWN_APPS: &[&str] = &[
    "about",
    "projects",
    "terminal",
    "pdfviewer",
    "browser",
    "mail",
    "2048",
    "deptcollector",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("unknown app: {0}")]
    UnknownApp(String),
}

/// Window operations the shell can request.
pub trait WindowHost {
    /// Open `app`, or raise it if already open. `document` is the file or
    /// URL the app should show.
    ///
    /// # Errors
    ///
    /// [`WindowError::UnknownApp`] for an id the host cannot launch.
    fn open(&mut self, app: &str, document: Option<&str>) -> Result<(), WindowError>;

    /// # Errors
    ///
    /// [`WindowError::UnknownApp`] for an id the host cannot launch.
    fn close(&mut self, app: &str) -> Result<(), WindowError>;

    /// # Errors
    ///
    /// [`WindowError::UnknownApp`] for an id the host cannot launch.
    fn minimize(&mut self, app: &str) -> Result<(), WindowError>;

    /// # Errors
    ///
    /// [`WindowError::UnknownApp`] for an id the host cannot launch.
    fn toggle_fullscreen(&mut self, app: &str) -> Result<(), WindowError>;
}

// ---------------------------------------------------------------------------
// WindowRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub app: String,
    pub z: u32,
    pub minimized: bool,
    pub fullscreen: bool,
    pub document: Option<String>,
}

impl Window {
    fn new(app: &str, z: u32, document: Option<&str>) -> Self {
        Self {
            app: app.to_owned(),
            z,
            minimized: false,
            fullscreen: false,
            document: document.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowRegistry {
    windows: Vec<Window>,
    next_z: u32,
}

impl Default for WindowRegistry {
    /// The desktop as it boots: the mail window is open.
    fn default() -> Self {
        Self {
            windows: vec![Window::new("mail", 1, None)],
            next_z: 2,
        }
    }
}

impl WindowRegistry {
    /// A registry with nothing open.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            windows: Vec::new(),
            next_z: 1,
        }
    }

    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[must_use]
    pub fn get(&self, app: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.app == app)
    }

    /// The open window with the highest z.
    #[must_use]
    pub fn front(&self) -> Option<&Window> {
        self.windows.iter().max_by_key(|w| w.z)
    }

    fn check(app: &str) -> Result<(), WindowError> {
        if KNOWN_APPS.contains(&app) {
            Ok(())
        } else {
            Err(WindowError::UnknownApp(app.to_owned()))
        }
    }

    fn get_mut(&mut self, app: &str) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.app == app)
    }

    fn bump_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }
}

impl WindowHost for WindowRegistry {
    fn open(&mut self, app: &str, document: Option<&str>) -> Result<(), WindowError> {
        Self::check(app)?;
        let z = self.bump_z();
        if let Some(window) = self.get_mut(app) {
            window.minimized = false;
            window.z = z;
            if document.is_some() {
                window.document = document.map(str::to_owned);
            }
        } else {
            self.windows.push(Window::new(app, z, document));
        }
        tracing::debug!(app, z, "window opened");
        Ok(())
    }

    fn close(&mut self, app: &str) -> Result<(), WindowError> {
        Self::check(app)?;
        self.windows.retain(|w| w.app != app);
        tracing::debug!(app, "window closed");
        Ok(())
    }

    fn minimize(&mut self, app: &str) -> Result<(), WindowError> {
        Self::check(app)?;
        if let Some(window) = self.get_mut(app) {
            window.minimized = true;
        }
        Ok(())
    }

    fn toggle_fullscreen(&mut self, app: &str) -> Result<(), WindowError> {
        Self::check(app)?;
        if let Some(window) = self.get_mut(app) {
            window.fullscreen = !window.fullscreen;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_with_mail_open() {
        let reg = WindowRegistry::default();
        assert_eq!(reg.windows().len(), 1);
        assert_eq!(reg.front().map(|w| w.app.as_str()), Some("mail"));
    }

    #[test]
    fn open_adds_and_raises() {
        let mut reg = WindowRegistry::default();
        reg.open("about", None).unwrap();
        assert_eq!(reg.front().unwrap().app, "about");
        reg.open("mail", None).unwrap();
        assert_eq!(reg.front().unwrap().app, "mail");
        assert_eq!(reg.windows().len(), 2);
    }

    #[test]
    fn reopen_restores_minimized_window() {
        let mut reg = WindowRegistry::empty();
        reg.open("projects", None).unwrap();
        reg.minimize("projects").unwrap();
        assert!(reg.get("projects").unwrap().minimized);
        reg.open("projects", None).unwrap();
        assert!(!reg.get("projects").unwrap().minimized);
    }

    #[test]
    fn open_with_document() {
        let mut reg = WindowRegistry::empty();
        reg.open("pdfviewer", Some("~/Documents/CV_Lucas_Colaco.pdf"))
            .unwrap();
        assert_eq!(
            reg.get("pdfviewer").unwrap().document.as_deref(),
            Some("~/Documents/CV_Lucas_Colaco.pdf")
        );
    }

    #[test]
    fn close_and_fullscreen() {
        let mut reg = WindowRegistry::default();
        reg.toggle_fullscreen("mail").unwrap();
        assert!(reg.get("mail").unwrap().fullscreen);
        reg.toggle_fullscreen("mail").unwrap();
        assert!(!reg.get("mail").unwrap().fullscreen);
        reg.close("mail").unwrap();
        assert!(reg.windows().is_empty());
        // Closing something that is not open is fine.
        reg.close("mail").unwrap();
    }

    #[test]
    fn unknown_apps_are_rejected() {
        let mut reg = WindowRegistry::default();
        assert_eq!(
            reg.open("photoshop", None),
            Err(WindowError::UnknownApp("photoshop".into()))
        );
        assert!(reg.close("photoshop").is_err());
        assert!(reg.minimize("photoshop").is_err());
        assert!(reg.toggle_fullscreen("photoshop").is_err());
        assert_eq!(reg.windows().len(), 1);
    }
}
