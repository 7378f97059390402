mod context;
use self::context::AppContext;

mod main_window;
mod splash;
mod theme;

use gettextrs::gettext;
use gtk::{gio, glib, prelude::*};
use log::{debug, error, info, warn};

use std::{cell::RefCell, error::Error, rc::Rc};

use application::{
    Bootstrap, CommandLineArguments, ConfigError, ResourceDirs, Stage, APP_ID, APP_NAME,
    TEXT_DOMAIN,
};

const ICON: &str = "xfb.svg";

fn set_default_icon(resources: &ResourceDirs) {
    if let Some(path) = resources.find(ICON) {
        match gtk::Window::set_default_icon_from_file(&path) {
            Ok(()) => return,
            Err(err) => warn!("Couldn't load icon {}: {}", path.display(), err),
        }
    }

    gtk::Window::set_default_icon_name(APP_ID.as_str());
}

fn show_fatal_error(err: &ConfigError) {
    error!("{}", err);

    let msg = match err {
        ConfigError::LocationUnavailable => {
            gettext("Cannot find writable location for configuration.")
        }
        ConfigError::CreateDir { path, .. } => {
            gettext("Could not create configuration directory:\n{}").replacen(
                "{}",
                &path.display().to_string(),
                1,
            )
        }
        ConfigError::CopyDefault { .. } => gettext("Could not copy default configuration file."),
    };

    let dialog = gtk::MessageDialog::new(
        None::<&gtk::Window>,
        gtk::DialogFlags::MODAL,
        gtk::MessageType::Error,
        gtk::ButtonsType::Close,
        &msg,
    );
    dialog.set_title(&gettext("Configuration Error"));
    if let Some(source) = err.source() {
        dialog.set_secondary_text(Some(&source.to_string()));
    }

    dialog.run();
    dialog.close();
}

pub fn run(args: CommandLineArguments) -> glib::ExitCode {
    debug!("bootstrap: {:?} -> {:?}", Stage::EnvSetup, Stage::AppInit);

    glib::set_prgname(Some(TEXT_DOMAIN));
    glib::set_application_name(APP_NAME);

    let bootstrap = Bootstrap::from_args(&args);
    set_default_icon(bootstrap.resources());

    let gtk_app = gtk::Application::new(Some(APP_ID.as_str()), gio::ApplicationFlags::empty());

    let context: Rc<RefCell<Option<AppContext>>> = Rc::new(RefCell::new(None));
    let failure: Rc<RefCell<Option<ConfigError>>> = Rc::new(RefCell::new(None));

    let context_cb = Rc::clone(&context);
    let failure_cb = Rc::clone(&failure);
    gtk_app.connect_activate(move |gtk_app| {
        if let Some(context) = context_cb.borrow().as_ref() {
            // already running
            context.present();
            return;
        }

        let mut context = AppContext::new(gtk_app, bootstrap.resources());
        context.show_splash();

        match bootstrap.run(&mut context) {
            Ok(launch) => {
                info!(
                    "{} started with {} (created dir: {}, seeded: {})",
                    APP_NAME,
                    launch.config_path.display(),
                    launch.created_config_dir,
                    launch.seeded_config,
                );
                *context_cb.borrow_mut() = Some(context);
            }
            Err(err) => {
                context.hide_splash();
                show_fatal_error(&err);
                *failure_cb.borrow_mut() = Some(err);
                gtk_app.quit();
            }
        }
    });

    // The arguments were handled by `command_line`
    let exit_code = gtk_app.run_with_args(&[TEXT_DOMAIN]);

    match failure.borrow_mut().take() {
        Some(err) => {
            debug!("exiting with code {}", err.exit_code());
            glib::ExitCode::FAILURE
        }
        None => {
            debug!("bootstrap: {:?} ended", Stage::EventLoop);
            exit_code
        }
    }
}
