use gtk::prelude::*;
use log::debug;

use application::{Catalog, CatalogError, ResourceDirs, Shell, Stage, Status, Theme};

use crate::{main_window::MainWindow, splash::Splash, theme};

/// Process-wide application state: the GTK application,
/// the splash screen while starting, then the main window.
pub struct AppContext {
    app: gtk::Application,
    splash: Splash,
    css_provider: Option<gtk::CssProvider>,
    main_window: Option<MainWindow>,
}

impl AppContext {
    pub fn new(app: &gtk::Application, resources: &ResourceDirs) -> Self {
        let splash = Splash::new(resources);
        // keeps the application running until the main window is up
        app.add_window(splash.window());

        AppContext {
            app: app.clone(),
            splash,
            css_provider: None,
            main_window: None,
        }
    }

    pub fn show_splash(&self) {
        self.splash.show();
    }

    pub fn hide_splash(&self) {
        self.splash.hide();
    }

    pub fn present(&self) {
        if let Some(main_window) = self.main_window.as_ref() {
            main_window.present();
        }
    }
}

impl Shell for AppContext {
    fn enter_stage(&mut self, stage: Stage) {
        debug!("entering {:?}", stage);
    }

    fn show_status(&mut self, status: Status) {
        self.splash.show_status(&status);
    }

    fn install_catalog(&mut self, catalog: &Catalog) -> Result<(), CatalogError> {
        debug!("installing {}", catalog.path().display());
        catalog.install()
    }

    fn apply_theme(&mut self, theme: &Theme) {
        self.css_provider = theme::apply(theme);
    }

    fn build_main_window(&mut self) {
        self.main_window = Some(MainWindow::new(&self.app));
    }

    fn show_main_window(&mut self, full_screen: bool) {
        if let Some(main_window) = self.main_window.as_ref() {
            if full_screen {
                main_window.show_full_screen();
            } else {
                main_window.show();
            }
        }

        self.splash.finish();
    }
}
