use gtk::{gdk, gdk_pixbuf::Pixbuf, glib, prelude::*};
use log::{debug, warn};

use std::{
    thread,
    time::{Duration, Instant},
};

use application::{ResourceDirs, Status, StatusKind, APP_NAME};

const SPLASH_IMAGE: &str = "splash.svg";
const STATUS_CLASS: &str = "splash-status";
const WARNING_CLASS: &str = "splash-warning";

// The theme isn't applied yet when the splash shows up
const SPLASH_CSS: &str = "
.splash-status {
    color: #1e3a8a;
    font-weight: bold;
    padding: 8px;
}
.splash-status.splash-warning {
    color: #ff0000;
}
";

const DWELL_POLL: Duration = Duration::from_millis(10);

/// Undecorated window displaying the startup progress.
pub struct Splash {
    window: gtk::Window,
    label: gtk::Label,
}

impl Splash {
    pub fn new(resources: &ResourceDirs) -> Self {
        let window = gtk::Window::new(gtk::WindowType::Toplevel);
        window.set_decorated(false);
        window.set_resizable(false);
        window.set_keep_above(true);
        window.set_skip_taskbar_hint(true);
        window.set_position(gtk::WindowPosition::Center);
        window.set_type_hint(gdk::WindowTypeHint::Splashscreen);
        window.set_title(APP_NAME);

        let vbox = gtk::Box::new(gtk::Orientation::Vertical, 0);

        match resources.find(SPLASH_IMAGE) {
            Some(path) => match Pixbuf::from_file(&path) {
                Ok(pixbuf) => {
                    vbox.pack_start(&gtk::Image::from_pixbuf(Some(&pixbuf)), true, true, 0);
                }
                Err(err) => warn!("Couldn't load splash image {}: {}", path.display(), err),
            },
            None => warn!("Splash image {} not found", SPLASH_IMAGE),
        }

        let label = gtk::Label::new(None);
        label.set_halign(gtk::Align::Center);
        label.set_valign(gtk::Align::End);

        let provider = gtk::CssProvider::new();
        match provider.load_from_data(SPLASH_CSS.as_bytes()) {
            Ok(()) => label
                .style_context()
                .add_provider(&provider, gtk::STYLE_PROVIDER_PRIORITY_APPLICATION),
            Err(err) => warn!("Couldn't load splash style: {}", err),
        }
        label.style_context().add_class(STATUS_CLASS);

        vbox.pack_end(&label, false, false, 0);
        window.add(&vbox);

        Splash { window, label }
    }

    pub fn window(&self) -> &gtk::Window {
        &self.window
    }

    pub fn show(&self) {
        self.window.show_all();
        pump_events();
    }

    pub fn show_status(&self, status: &Status) {
        debug!("splash: {}", status.message);

        let style_context = self.label.style_context();
        match status.kind {
            StatusKind::Info => style_context.remove_class(WARNING_CLASS),
            StatusKind::Warning => style_context.add_class(WARNING_CLASS),
        }
        self.label.set_text(&status.message);

        pump_events();
        if !status.min_display.is_zero() {
            dwell(status.min_display);
        }
    }

    pub fn hide(&self) {
        self.window.hide();
        pump_events();
    }

    /// Retires the splash once the main window is up.
    pub fn finish(&self) {
        self.window.close();
    }
}

/// Keeps the UI responsive between blocking startup steps.
fn pump_events() {
    let main_context = glib::MainContext::default();
    while main_context.pending() {
        main_context.iteration(false);
    }
}

fn dwell(min_display: Duration) {
    let deadline = Instant::now() + min_display;
    while Instant::now() < deadline {
        pump_events();
        thread::sleep(DWELL_POLL);
    }
}
