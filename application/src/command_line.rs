use clap::{Arg, ArgAction, Command};
use gettextrs::gettext;

use std::path::PathBuf;

use crate::TEXT_DOMAIN;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandLineArguments {
    pub config_dir: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
}

const CONFIG_DIR_ARG: &str = "CONFIG_DIR";
const RESOURCE_DIR_ARG: &str = "RESOURCE_DIR";

fn command() -> Command {
    Command::new(TEXT_DOMAIN)
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(gettext("XFB radio automation and media player"))
        .arg(
            Arg::new(CONFIG_DIR_ARG)
                .short('c')
                .long("config-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set)
                .help(gettext("Use DIR instead of the default configuration directory")),
        )
        .arg(
            Arg::new(RESOURCE_DIR_ARG)
                .short('r')
                .long("resource-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set)
                .help(gettext("Look for stylesheets and images in DIR first")),
        )
}

fn from_matches(matches: &clap::ArgMatches) -> CommandLineArguments {
    CommandLineArguments {
        config_dir: matches.get_one::<PathBuf>(CONFIG_DIR_ARG).cloned(),
        resource_dir: matches.get_one::<PathBuf>(RESOURCE_DIR_ARG).cloned(),
    }
}

pub fn command_line() -> CommandLineArguments {
    from_matches(&command().get_matches())
}
