// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed CubeMX project and a fluent builder so
// each integration test can set up an isolated generated project without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cubepp_cli::config::{self, Document};
use cubepp_cli::logging::{Log, Logger};
use cubepp_cli::tasks::Context;

/// Name of the generated project directory, and so the project name.
pub const PROJECT: &str = "blinky";

/// Top-level `CMakeLists.txt` as CubeMX generates it.
pub const CMAKE_LISTS: &str = "\
cmake_minimum_required(VERSION 3.22)

#
# This file is generated only once,
# and is not re-generated if converter is called multiple times.
#
# User is free to modify the file as much as necessary
#

# Setup compiler settings
set(CMAKE_C_STANDARD 11)
set(CMAKE_C_STANDARD_REQUIRED ON)
set(CMAKE_C_EXTENSIONS ON)

# Define the build type
if(NOT CMAKE_BUILD_TYPE)
    set(CMAKE_BUILD_TYPE \"Debug\")
endif()

# Set the project name
set(CMAKE_PROJECT_NAME blinky)

# Include toolchain file
include(\"cmake/gcc-arm-none-eabi.cmake\")

# Enable compile command to ease indexing with e.g. clangd
set(CMAKE_EXPORT_COMPILE_COMMANDS TRUE)

# Core project settings
project(${CMAKE_PROJECT_NAME})
message(\"Build type: \" ${CMAKE_BUILD_TYPE})

# Enable CMake support for ASM and C languages
enable_language(C ASM)

# Create an executable object type
add_executable(${CMAKE_PROJECT_NAME})

# Add STM32CubeMX generated sources
add_subdirectory(cmake/stm32cubemx)

# Link directories setup
target_link_directories(${CMAKE_PROJECT_NAME} PRIVATE
    # Add user defined library search paths
)

# Add sources to executable
target_sources(${CMAKE_PROJECT_NAME} PRIVATE
    # Add user sources here
)

# Add include paths
target_include_directories(${CMAKE_PROJECT_NAME} PRIVATE
    # Add user defined include paths
)

# Add project symbols (macros)
target_compile_definitions(${CMAKE_PROJECT_NAME} PRIVATE
    # Add user defined symbols
)

# Add linked libraries
target_link_libraries(${CMAKE_PROJECT_NAME}
    stm32cubemx

    # Add user defined libraries
)
";

/// `CMakePresets.json` as CubeMX generates it.
pub const PRESETS: &str = r#"{
    "version": 3,
    "configurePresets": [
        {
            "name": "default",
            "hidden": true,
            "generator": "Ninja",
            "binaryDir": "${sourceDir}/build/${presetName}",
            "toolchainFile": "${sourceDir}/cmake/gcc-arm-none-eabi.cmake",
            "cacheVariables": {}
        },
        {
            "name": "Debug",
            "inherits": "default",
            "cacheVariables": {
                "CMAKE_BUILD_TYPE": "Debug"
            }
        }
    ]
}
"#;

/// Generated `cmake/stm32cubemx/CMakeLists.txt` declaring the chip.
pub const CUBEMX_CMAKE: &str = "\
cmake_minimum_required(VERSION 3.22)

project(stm32cubemx)
add_library(stm32cubemx INTERFACE)

target_compile_definitions(stm32cubemx INTERFACE
\tUSE_HAL_DRIVER
\tSTM32G431xx
    $<$<CONFIG:Debug>:DEBUG>
)
";

/// Generated `Core/Src/main.c` with the user-code markers.
pub const MAIN_C: &str = "\
/* USER CODE BEGIN Header */
/* USER CODE END Header */
#include \"main.h\"

/* Private includes ----------------------------------------------------------*/
/* USER CODE BEGIN Includes */

/* USER CODE END Includes */

int main(void)
{
  HAL_Init();
  SystemClock_Config();
  MX_GPIO_Init();
  /* USER CODE BEGIN 2 */

  /* USER CODE END 2 */

  /* Infinite loop */
  /* USER CODE BEGIN WHILE */
  while (1)
  {
    /* USER CODE END WHILE */

    /* USER CODE BEGIN 3 */
  }
  /* USER CODE END 3 */
}
";

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write fixture file");
}

/// A generated project plus an install directory holding the template tree,
/// both inside one [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct ProjectFixture {
    /// Temporary directory containing `blinky/` and `install/`.
    pub dir: tempfile::TempDir,
}

impl ProjectFixture {
    /// Path to the generated project (the destination root).
    pub fn root(&self) -> PathBuf {
        self.dir.path().join(PROJECT)
    }

    /// Path standing in for the directory of the installed executable.
    pub fn install_dir(&self) -> PathBuf {
        self.dir.path().join("install")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read project file")
    }

    pub fn write(&self, rel: &str, content: &str) {
        write(&self.path(rel), content);
    }

    /// Snapshot of every file under the project root, sorted by path.
    pub fn tree(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let root = self.root();
        let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.expect("walk project"))
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(&root).expect("strip root").to_path_buf();
                let bytes = std::fs::read(e.path()).expect("read file");
                (rel, bytes)
            })
            .collect();
        files.sort();
        files
    }

    /// The embedded document with its resource path pointed at the fixture's
    /// install directory.
    pub fn document(&self) -> Document {
        let mut doc = config::embedded().expect("embedded document");
        doc.resource_paths = vec![self.install_dir().join("resources").display().to_string()];
        doc
    }

    /// A fresh run context over the fixture, logging to `log`.
    pub fn context(&self, document: Document, log: &Arc<Logger>, dry_run: bool) -> Context {
        Context::new(
            Arc::new(document),
            self.root(),
            self.install_dir(),
            Arc::clone(log) as Arc<dyn Log>,
            dry_run,
        )
        .expect("create context")
    }
}

/// Fluent builder for [`ProjectFixture`].
pub struct FixtureBuilder {
    fixture: ProjectFixture,
}

impl FixtureBuilder {
    /// Begin with a freshly generated project and the stock template tree.
    pub fn new() -> Self {
        let fixture = ProjectFixture {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        fixture.write("CMakeLists.txt", CMAKE_LISTS);
        fixture.write("CMakePresets.json", PRESETS);
        fixture.write("cmake/stm32cubemx/CMakeLists.txt", CUBEMX_CMAKE);
        fixture.write("Core/Src/main.c", MAIN_C);

        let res = fixture.install_dir().join("resources");
        write(
            &res.join("app/include/projectname/main_exec.h"),
            "#pragma once\n// {{PROJECTNAME}} for {{STM32TYPE}}\nvoid Setup(void);\nvoid Loop(void);\n",
        );
        write(
            &res.join("app/src/main_exec.cpp"),
            "#include \"{{PROJECTNAME}}/main_exec.h\"\n\nvoid Setup(void) {}\nvoid Loop(void) {}\n",
        );
        Self { fixture }
    }

    /// Drop a project file, e.g. to simulate a project generated without it.
    pub fn without(self, rel: &str) -> Self {
        std::fs::remove_file(self.fixture.path(rel)).expect("remove fixture file");
        self
    }

    /// Overwrite or create a project file.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        self.fixture.write(rel, content);
        self
    }

    /// Add a file to the template tree.
    pub fn with_resource(self, rel: &str, content: &str) -> Self {
        write(&self.fixture.install_dir().join("resources").join(rel), content);
        self
    }

    /// Finish building and return the fixture.
    pub fn build(self) -> ProjectFixture {
        self.fixture
    }
}
