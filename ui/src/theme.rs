use gtk::{gdk, prelude::*};
use log::{debug, warn};

use application::Theme;

/// Installs the palette and stylesheet for the whole screen.
///
/// Returns the provider so that it stays alive with the application.
pub fn apply(theme: &Theme) -> Option<gtk::CssProvider> {
    if let Some(settings) = gtk::Settings::default() {
        settings.set_property("gtk-application-prefer-dark-theme", theme.variant.is_dark());
    }

    let screen = match gdk::Screen::default() {
        Some(screen) => screen,
        None => {
            warn!("No screen available, theme not applied");
            return None;
        }
    };

    let palette_css = theme.palette.to_css();
    let provider = gtk::CssProvider::new();

    let res = match theme.stylesheet.as_ref() {
        Some(stylesheet) => {
            let css = format!("{}\n{}", palette_css, stylesheet);
            provider.load_from_data(css.as_bytes()).or_else(|err| {
                warn!("Invalid stylesheet, using palette only: {}", err);
                provider.load_from_data(palette_css.as_bytes())
            })
        }
        None => provider.load_from_data(palette_css.as_bytes()),
    };

    if let Err(err) = res {
        warn!("Couldn't load palette: {}", err);
        return None;
    }

    gtk::StyleContext::add_provider_for_screen(
        &screen,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
    debug!("applied {:?} theme", theme.variant);

    Some(provider)
}
