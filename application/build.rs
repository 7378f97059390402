use std::fs::{create_dir_all, File};
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::Command;

const TEXT_DOMAIN: &str = "xfb";

fn po_path() -> PathBuf {
    PathBuf::from("..").join("po")
}

fn target_path() -> PathBuf {
    PathBuf::from("..").join("target")
}

fn generate_translations() {
    let linguas_path = po_path().join("LINGUAS");
    println!("cargo:rerun-if-changed={}", linguas_path.display());

    let mut linguas = String::new();
    match File::open(&linguas_path) {
        Ok(mut linguas_file) => {
            if let Err(err) = linguas_file.read_to_string(&mut linguas) {
                println!("cargo:warning=Couldn't read po/LINGUAS as string: {}", err);
                return;
            }
        }
        Err(_) => return,
    }

    for lingua in linguas.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let po_file = po_path().join(format!("{}.po", lingua));
        println!("cargo:rerun-if-changed={}", po_file.display());

        let mo_path = target_path()
            .join("locale")
            .join(lingua)
            .join("LC_MESSAGES");
        if let Err(err) = create_dir_all(&mo_path) {
            println!("cargo:warning=Couldn't create {}: {}", mo_path.display(), err);
            return;
        }

        let mut msgfmt = Command::new("msgfmt");
        msgfmt
            .arg(format!(
                "--output-file={}",
                mo_path.join(format!("{}.mo", TEXT_DOMAIN)).display()
            ))
            .arg(po_file.as_os_str());

        match msgfmt.status() {
            Ok(status) => {
                // a missing catalog is handled at runtime, don't fail the build
                if !status.success() {
                    println!(
                        "cargo:warning=Failed to generate mo file for lingua {}: {:?}",
                        lingua, msgfmt,
                    );
                }
            }
            Err(ref error) => match error.kind() {
                ErrorKind::NotFound => {
                    println!("cargo:warning=Can't generate translations: command `msgfmt` not available");
                    return;
                }
                _ => println!("cargo:warning=Error invoking `msgfmt`: {}", error),
            },
        }
    }
}

fn main() {
    generate_translations();
}
