// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

/// A workspace with an SDK tree and an application tree, the build log is
/// in the build directory of the application.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(log: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let sdk = dir.path().join("sdk").display().to_string();
        let app = dir.path().join("app").display().to_string();
        let log = log.replace("$SDK", &sdk).replace("$APP", &app);
        dir.child("sdk").create_dir_all()?;
        dir.child("app/build/records.txt").write_str(&log)?;
        Ok(Self { dir })
    }

    fn command(&self) -> Result<Command> {
        let mut command = Command::cargo_bin("comp2proj")?;
        command
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("IDF_PATH", self.dir.path().join("sdk"))
            .env("CROSS_COMPILE", "xtensa-esp32-elf-")
            .env_remove("RUST_LOG");
        Ok(command)
    }

    fn project(&self) -> Result<Value> {
        let content = fs::read_to_string(self.dir.path().join("project.json"))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[test]
fn help_is_printed() -> Result<()> {
    let workspace = Workspace::new("")?;

    workspace
        .command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: comp2proj"));
    workspace
        .command()?
        .args(["describe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("describe"));
    Ok(())
}

#[test]
fn project_is_written() -> Result<()> {
    let workspace = Workspace::new(concat!(
        "core -DFOO -DBAR=1 -I$SDK/inc -o build/core.o $SDK/src/core/main.c\n",
        "main -DFOO -mlongcalls -o build/main.o $APP/main/app_main.cpp\n",
        "linker -T$SDK/ld/app.ld -Lbuild/lib -lm -o build/app.elf build/app.map\n",
    ))?;

    workspace
        .command()?
        .args(["-p", "Demo", "-t", "coide", "app/build/records.txt"])
        .assert()
        .success();

    let project = workspace.project()?;
    assert_eq!(project["name"], "Demo");
    assert_eq!(project["tool"], "coide");
    assert_eq!(project["toolchain"]["prefix"], "xtensa-esp32-elf-");
    assert_eq!(project["common"]["macros"], serde_json::json!(["FOO"]));
    assert_eq!(project["c"]["macros"], serde_json::json!(["BAR=1"]));
    assert_eq!(project["cxx"]["flags"], serde_json::json!(["-mlongcalls"]));
    assert_eq!(project["files"]["sources"]["src/core"], serde_json::json!(["../../sdk/src/core/main.c"]));
    assert_eq!(project["files"]["sources"]["main"], serde_json::json!(["../main/app_main.cpp"]));
    assert_eq!(project["files"]["includes"]["inc"], serde_json::json!(["../../sdk/inc"]));
    assert_eq!(project["linker"]["libraries"], serde_json::json!(["m"]));
    assert_eq!(project["linker"]["searchPaths"], serde_json::json!(["build/lib"]));
    workspace.dir.child("project.json.tmp").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn records_are_described_to_stdout() -> Result<()> {
    let workspace = Workspace::new(concat!(
        "core -DFOO -o build/core.o $SDK/src/core/main.c\n",
        "linker -lm -o build/app.elf build/app.map\n",
    ))?;

    let output = workspace
        .command()?
        .args(["describe", "-o", "-", "app/build/records.txt"])
        .env_remove("CROSS_COMPILE")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<Value> =
        stdout.lines().map(serde_json::from_str::<Value>).collect::<Result<Vec<_>, _>>()?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "compile");
    assert_eq!(lines[0]["group"], "src/core");
    assert_eq!(lines[0]["macros"], serde_json::json!(["FOO"]));
    assert_eq!(lines[1]["kind"], "link");
    assert_eq!(lines[1]["libraries"], serde_json::json!(["m"]));
    Ok(())
}

#[test]
fn invalid_configuration_is_logged() -> Result<()> {
    let workspace = Workspace::new("main -DX $APP/main/a.c\n")?;
    workspace.dir.child("comp2proj.yml").write_str("schema: \"1.0\"\nroots:\n  sdk: relative/sdk\n")?;

    workspace
        .command()?
        .args(["describe", "-v", "app/build/records.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("comp2proj.yml"))
        .stderr(predicate::str::contains("Error: ").not());
    Ok(())
}

#[test]
fn source_outside_of_roots_fails() -> Result<()> {
    let workspace = Workspace::new(concat!(
        "main -DX -o build/a.o $APP/main/a.c\n",
        "main -DX -o build/b.o /elsewhere/b.c\n",
    ))?;

    workspace
        .command()?
        .arg("app/build/records.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/elsewhere/b.c"));

    workspace.dir.child("project.json").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn include_outside_of_roots_is_skipped() -> Result<()> {
    let workspace = Workspace::new("main -I/usr/include -I$APP/main -o build/a.o $APP/main/a.c\n")?;

    workspace
        .command()?
        .arg("app/build/records.txt")
        .assert()
        .success()
        .stderr(predicate::str::contains("Include directory /usr/include"));

    let project = workspace.project()?;
    assert_eq!(project["files"]["includes"], serde_json::json!({"main": ["../main"]}));
    Ok(())
}

#[test]
fn missing_toolchain_prefix_fails() -> Result<()> {
    let workspace = Workspace::new("main -DX $APP/main/a.c\n")?;

    workspace
        .command()?
        .arg("app/build/records.txt")
        .env_remove("CROSS_COMPILE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("CROSS_COMPILE"))
        .stderr(predicate::str::contains("Error: ").not());

    workspace.dir.child("project.json").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn configuration_file_overrides_environment() -> Result<()> {
    let workspace = Workspace::new("main -DX -o build/a.o $APP/main/a.c\n")?;
    workspace.dir.child("comp2proj.yml").write_str(concat!(
        "schema: \"1.0\"\n",
        "toolchain:\n",
        "  prefix: riscv32-esp-elf-\n",
        "project:\n",
        "  name: Configured\n",
    ))?;

    workspace.command()?.arg("app/build/records.txt").assert().success();

    let project = workspace.project()?;
    assert_eq!(project["name"], "Configured");
    assert_eq!(project["toolchain"]["prefix"], "riscv32-esp-elf-");
    assert_eq!(project["tool"], "gnu_mcu_eclipse");
    Ok(())
}
