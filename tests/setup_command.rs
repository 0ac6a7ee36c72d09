#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `setup` command.
//!
//! These tests exercise the phase list produced by [`all_setup_tasks`], the
//! profile flags generated from the embedded document, and a complete run of
//! [`commands::setup::run`] against a generated project.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use cubepp_cli::cli;
use cubepp_cli::commands;
use cubepp_cli::config::{self, profiles};
use cubepp_cli::logging::{Logger, TaskStatus};
use cubepp_cli::tasks;

use common::FixtureBuilder;

fn selected(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Snapshot: full setup task list
// ---------------------------------------------------------------------------

/// Snapshot of every setup task name, in execution order, with both stock
/// profiles selected.
///
/// Any addition, removal, rename or reordering of a phase fails this test,
/// prompting a deliberate snapshot update.
#[test]
fn setup_task_names() {
    let doc = config::embedded().unwrap();
    let selection = profiles::resolve(&doc, &selected(&["dsp", "armmath"]));
    let all_tasks = tasks::all_setup_tasks(&Arc::new(doc), &selection);
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("setup_task_names", task_names.join("\n"));
}

// ---------------------------------------------------------------------------
// Structural invariants
// ---------------------------------------------------------------------------

/// Three passes per document plus three overlay phases and one injection.
#[test]
fn setup_task_count() {
    let doc = config::embedded().unwrap();
    let base_only = profiles::resolve(&doc, &[]);
    let both = profiles::resolve(&doc, &selected(&["armmath", "dsp"]));
    let doc = Arc::new(doc);

    assert_eq!(tasks::all_setup_tasks(&doc, &base_only).len(), 7);
    assert_eq!(tasks::all_setup_tasks(&doc, &both).len(), 13);
}

/// No two setup tasks may share the same name.
#[test]
fn setup_task_names_are_unique() {
    let doc = config::embedded().unwrap();
    let selection = profiles::resolve(&doc, &selected(&["armmath", "dsp"]));
    let all_tasks = tasks::all_setup_tasks(&Arc::new(doc), &selection);
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &all_tasks {
        assert!(
            seen.insert(task.name()),
            "duplicate setup task name: '{}'",
            task.name()
        );
    }
}

/// Unknown profiles are reported and contribute no passes.
#[test]
fn unknown_profile_adds_no_passes() {
    let doc = config::embedded().unwrap();
    let selection = profiles::resolve(&doc, &selected(&["fpu"]));
    assert_eq!(selection.unknown, ["fpu"]);
    assert_eq!(tasks::all_setup_tasks(&Arc::new(doc), &selection).len(), 7);
}

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Every stock profile gets a flag.
#[test]
fn stock_profiles_have_flags() {
    let doc = config::embedded().unwrap();
    let args = cli::parse_with_profiles(&doc.profile_names(), ["cubepp", "--armmath", "--dsp"])
        .unwrap();
    assert_eq!(args.profiles, ["armmath", "dsp"]);
}

// ---------------------------------------------------------------------------
// End-to-end runs
// ---------------------------------------------------------------------------

#[test]
fn setup_run_patches_every_file() {
    let fx = FixtureBuilder::new().build();
    let args = cli::parse_with_profiles(&fx.document().profile_names(), ["cubepp", "--armmath"])
        .unwrap();
    let log = Arc::new(Logger::new("setup"));

    commands::setup::run(fx.document(), &args, &fx.root(), &log).unwrap();

    let cmake = fx.read("CMakeLists.txt");
    assert!(cmake.contains("set(CMAKE_CXX_STANDARD 20)"));
    assert!(cmake.contains("file(GLOB_RECURSE SOURCES\n  ${PROJECT_SOURCE_DIR}/app/src/**.c**\n)"));
    assert!(cmake.contains("    ARM_MATH_CM4"));
    assert!(cmake.contains("    arm_cortexM4lf_math"));
    assert!(cmake.trim_end().ends_with("endforeach()"));

    assert!(fx.read("CMakePresets.json").contains("\"binaryDir\": \"${sourceDir}/.build/${presetName}\""));
    assert_eq!(
        fx.read("app/include/blinky/main_exec.h"),
        "#pragma once\n// blinky for STM32G431xx\nvoid Setup(void);\nvoid Loop(void);\n"
    );
    assert!(fx.read("Core/Src/main.c").contains("#include \"blinky/main_exec.h\""));

    assert!(!log.has_failures());
    let statuses: Vec<TaskStatus> = log.entries().iter().map(|t| t.status).collect();
    assert_eq!(statuses.len(), 10);
    assert!(
        statuses
            .iter()
            .all(|s| matches!(s, TaskStatus::Changed | TaskStatus::Unchanged))
    );
    assert_eq!(statuses[0], TaskStatus::Changed);
}

#[test]
fn missing_presets_aborts_the_run() {
    let fx = FixtureBuilder::new().without("CMakePresets.json").build();
    let args = cli::parse_with_profiles(&fx.document().profile_names(), ["cubepp"]).unwrap();
    let log = Arc::new(Logger::new("setup"));

    let err = commands::setup::run(fx.document(), &args, &fx.root(), &log).unwrap_err();

    assert_eq!(err.to_string(), "1 task(s) failed");
    let entries = log.entries();
    assert_eq!(entries.len(), 1, "no task may start after a failure");
    assert_eq!(entries[0].status, TaskStatus::Failed);
    assert_eq!(fx.read("CMakeLists.txt"), common::CMAKE_LISTS);
    assert!(!fx.path("app").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let fx = FixtureBuilder::new().build();
    let before = fx.tree();
    let args = cli::parse_with_profiles(&fx.document().profile_names(), ["cubepp", "-d", "--dsp"])
        .unwrap();
    let log = Arc::new(Logger::new("setup"));

    commands::setup::run(fx.document(), &args, &fx.root(), &log).unwrap();

    assert_eq!(fx.tree(), before);
    assert!(!log.has_failures());
    assert!(log.entries().iter().all(|e| e.status != TaskStatus::Changed));
}
