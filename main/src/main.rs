use gettextrs::gettext;
use gtk::glib;
use log::{debug, error};

use application::{command_line, init_environment, Stage};

fn main() -> glib::ExitCode {
    env_logger::init();

    let args = command_line();

    // GStreamer and GTK read these when they initialize
    debug!("bootstrap: {:?}", Stage::EnvSetup);
    init_environment();

    // Character encoding is broken unless gtk (glib) is initialized
    let is_gtk_ok = gtk::init().is_ok();

    if is_gtk_ok {
        ui::run(args)
    } else {
        error!("{}", gettext("Failed to initialize GTK"));
        glib::ExitCode::FAILURE
    }
}
