use diversitybase::catalog::CategoryCatalog;
use diversitybase::config::HOME_ENV;
use diversitybase::generation::OutputLayout;
use diversitybase::profiles::ProfileAssembler;
use diversitybase::selection::SamplingPolicies;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        env::set_var(HOME_ENV, workspace.path());
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn output_root(&self) -> PathBuf {
        self.workspace.path().join("output")
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(self.output_root())
    }

    pub fn assembler(&self) -> ProfileAssembler {
        self.assembler_with(CategoryCatalog::builtin())
    }

    pub fn assembler_with(&self, catalog: CategoryCatalog) -> ProfileAssembler {
        ProfileAssembler::new(Arc::new(catalog), SamplingPolicies::default())
    }
}

mod balanced_batches;
mod catalog_overrides;
mod generation_flow;
mod job_control;
pub mod support;
