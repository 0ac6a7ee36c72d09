use anyhow::Result;
use std::sync::Arc;

use super::{Context, Task, TaskResult, pass_name, process_resources};
use crate::cmake::{ExtraSectionPatch, FunctionsPatch, SourceGlobPatch, VariablesPatch};
use crate::config::{CMAKE_LISTS_FILE, Document};
use crate::resources::text_file::PatchedFileResource;

/// Upsert variables, regenerate the source glob and merge function arguments
/// in the top-level `CMakeLists.txt`.
///
/// The three mutations run in that order against one buffer and the file is
/// written once.
#[derive(Debug)]
pub struct UpdateCMakeLists {
    name: String,
    document: Arc<Document>,
}

impl UpdateCMakeLists {
    /// Create the task for one pass.
    #[must_use]
    pub fn new(document: Arc<Document>, profile: Option<&str>) -> Self {
        Self {
            name: pass_name("Update CMakeLists.txt", profile),
            document,
        }
    }

    fn resource(&self, ctx: &Context) -> PatchedFileResource {
        let doc = &self.document;
        PatchedFileResource::new(
            ctx.project_path(CMAKE_LISTS_FILE),
            "variables, source glob, functions",
        )
        .required()
        .with_patch(VariablesPatch {
            variables: doc.variables.clone(),
        })
        .with_patch(SourceGlobPatch {
            target: doc.target.clone(),
            patterns: doc.source_patterns.clone(),
        })
        .with_patch(FunctionsPatch {
            target: doc.target.clone(),
            functions: doc.functions.clone(),
        })
    }
}

impl Task for UpdateCMakeLists {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        let doc = &self.document;
        !doc.variables.is_empty() || !doc.source_patterns.is_empty() || !doc.functions.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        process_resources(ctx, [self.resource(ctx)], "patch")
    }
}

/// Rebuild the managed extra section at the end of `CMakeLists.txt`.
#[derive(Debug)]
pub struct UpdateExtraSection {
    name: String,
    document: Arc<Document>,
}

impl UpdateExtraSection {
    /// Create the task for one pass.
    #[must_use]
    pub fn new(document: Arc<Document>, profile: Option<&str>) -> Self {
        Self {
            name: pass_name("Update extra section", profile),
            document,
        }
    }
}

impl Task for UpdateExtraSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        !self.document.extra.trim().is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = PatchedFileResource::new(ctx.project_path(CMAKE_LISTS_FILE), "extra section")
            .required()
            .with_patch(ExtraSectionPatch {
                extra: self.document.extra.clone(),
            });
        process_resources(ctx, [resource], "rebuild")
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cmake::{EXTRA_HEADER, SOURCES_HEADER};
    use crate::tasks::test_helpers::{make_context, read_project_file, write_project_file};

    const GENERATED: &str = "\
cmake_minimum_required(VERSION 3.22)

# Setup compiler settings
set(CMAKE_C_STANDARD 11)
set(CMAKE_CXX_STANDARD 17)

project(blinky)

add_executable(${CMAKE_PROJECT_NAME})

# Add sources to executable
target_sources(${CMAKE_PROJECT_NAME} PRIVATE
    # Add user sources here
)

target_link_libraries(${CMAKE_PROJECT_NAME}
    stm32cubemx
)
";

    fn document() -> Document {
        let mut doc = Document::default();
        doc.variables
            .insert("CMAKE_CXX_STANDARD".into(), "20".into());
        doc.functions.insert(
            "target_link_libraries".into(),
            vec!["stm32cubemx".into(), "nosys".into()],
        );
        doc.functions.insert(
            "target_compile_options".into(),
            vec!["-Wall".into()],
        );
        doc.extra = "message(STATUS \"hi\")\n".into();
        doc
    }

    #[test]
    fn patches_cmake_lists_in_one_pass() {
        let doc = document();
        let (ctx, _dir) = make_context(doc.clone());
        write_project_file(&ctx, CMAKE_LISTS_FILE, GENERATED);

        let result = UpdateCMakeLists::new(Arc::new(doc), None).run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Done(t) if t.written == 1));
        let out = read_project_file(&ctx, CMAKE_LISTS_FILE);
        assert!(out.contains("set(CMAKE_CXX_STANDARD 20)"));
        assert!(!out.contains("set(CMAKE_CXX_STANDARD 17)"));
        assert!(out.contains("    stm32cubemx\n    nosys\n)"));
        assert!(out.contains("target_compile_options(${CMAKE_PROJECT_NAME} PUBLIC\n    -Wall\n)"));
        assert_eq!(out.matches("stm32cubemx").count(), 1);
    }

    #[test]
    fn second_run_is_a_fixed_point() {
        let doc = document();
        let (ctx, _dir) = make_context(doc.clone());
        write_project_file(&ctx, CMAKE_LISTS_FILE, GENERATED);
        let doc = Arc::new(doc);

        UpdateCMakeLists::new(Arc::clone(&doc), None).run(&ctx).unwrap();
        UpdateExtraSection::new(Arc::clone(&doc), None).run(&ctx).unwrap();
        let once = read_project_file(&ctx, CMAKE_LISTS_FILE);
        UpdateCMakeLists::new(Arc::clone(&doc), None).run(&ctx).unwrap();
        UpdateExtraSection::new(doc, None).run(&ctx).unwrap();

        assert_eq!(read_project_file(&ctx, CMAKE_LISTS_FILE), once);
    }

    #[test]
    fn extra_section_is_appended() {
        let doc = document();
        let (ctx, _dir) = make_context(doc.clone());
        write_project_file(&ctx, CMAKE_LISTS_FILE, GENERATED);

        UpdateExtraSection::new(Arc::new(doc), None).run(&ctx).unwrap();

        let out = read_project_file(&ctx, CMAKE_LISTS_FILE);
        assert!(out.ends_with(&format!("{EXTRA_HEADER}\nmessage(STATUS \"hi\")\n")));
        assert!(out.contains(SOURCES_HEADER));
    }

    #[test]
    fn missing_cmake_lists_fails() {
        let doc = document();
        let (ctx, _dir) = make_context(doc.clone());
        assert!(UpdateCMakeLists::new(Arc::new(doc), None).run(&ctx).is_err());
    }

    #[test]
    fn not_applicable_for_empty_document() {
        let (ctx, _dir) = make_context(Document::default());
        let doc = Arc::new(Document::default());
        assert!(!UpdateCMakeLists::new(Arc::clone(&doc), None).should_run(&ctx));
        assert!(!UpdateExtraSection::new(doc, None).should_run(&ctx));
    }

    #[test]
    fn dry_run_does_not_write() {
        let doc = document();
        let (mut ctx, _dir) = make_context(doc.clone());
        ctx.dry_run = true;
        write_project_file(&ctx, CMAKE_LISTS_FILE, GENERATED);

        let result = UpdateCMakeLists::new(Arc::new(doc), Some("dsp")).run(&ctx).unwrap();

        assert!(matches!(result, TaskResult::Preview(_)));
        assert_eq!(read_project_file(&ctx, CMAKE_LISTS_FILE), GENERATED);
    }
}
