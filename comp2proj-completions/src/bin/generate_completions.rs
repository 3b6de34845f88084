// SPDX-License-Identifier: GPL-3.0-or-later

//! Writes the shell completion scripts of `comp2proj` into a directory.
//!
//! The directory is the first argument, `completions` when it's not given.

use clap_complete::{Shell, generate_to};
use std::path::PathBuf;
use std::{env, fs, io};

const SHELLS: [Shell; 5] = [Shell::Bash, Shell::Elvish, Shell::Fish, Shell::PowerShell, Shell::Zsh];

fn main() -> io::Result<()> {
    let directory = env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("completions"));
    fs::create_dir_all(&directory)?;

    let mut command = comp2proj::args::cli();
    for shell in SHELLS {
        let path = generate_to(shell, &mut command, "comp2proj", &directory)?;
        println!("{shell} completion is written to {}", path.display());
    }
    Ok(())
}
