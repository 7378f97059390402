use gettextrs::gettext;
use gtk::{gdk, prelude::*};
use log::debug;

use std::{cell::RefCell, rc::Rc};

use application::{WindowStateStore, APP_NAME};

/// The player's main window.
///
/// Owns its state store: the geometry is restored on creation
/// and saved when the window is destroyed.
pub struct MainWindow {
    window: gtk::ApplicationWindow,
}

impl MainWindow {
    pub fn new(app: &gtk::Application) -> Self {
        let store = Rc::new(RefCell::new(WindowStateStore::open()));

        let window = gtk::ApplicationWindow::new(app);
        window.set_title(APP_NAME);

        let header_bar = gtk::HeaderBar::new();
        header_bar.set_title(Some(APP_NAME));
        header_bar.set_subtitle(Some(&gettext("Radio automation")));
        header_bar.set_show_close_button(true);
        window.set_titlebar(Some(&header_bar));

        let placeholder = gtk::Label::new(Some(&gettext("No playlist loaded")));
        placeholder.set_vexpand(true);
        placeholder.set_hexpand(true);
        window.add(&placeholder);

        {
            let state = store.borrow();
            if state.width > 0 && state.height > 0 {
                window.set_default_size(state.width, state.height);
            } else {
                window.set_default_size(1024, 768);
            }
            if state.is_maximized {
                window.maximize();
            }
        }

        let store_cb = Rc::clone(&store);
        window.connect_size_allocate(move |window, _| {
            let is_full_screen = window
                .window()
                .map_or(false, |gdk_window| {
                    gdk_window.state().contains(gdk::WindowState::FULLSCREEN)
                });
            if is_full_screen {
                return;
            }

            let mut state = store_cb.borrow_mut();
            state.is_maximized = window.is_maximized();
            if !state.is_maximized {
                let (width, height) = window.size();
                state.width = width;
                state.height = height;
            }
        });

        window.connect_destroy(move |_| {
            debug!("main window destroyed");
            store.borrow_mut().save();
        });

        MainWindow { window }
    }

    pub fn show(&self) {
        self.window.show_all();
    }

    pub fn show_full_screen(&self) {
        self.window.show_all();
        self.window.fullscreen();
    }

    pub fn present(&self) {
        self.window.present();
    }
}
