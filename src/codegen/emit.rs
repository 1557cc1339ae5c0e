//! Module finalization and textual IR emission.

use std::path::Path;

use inkwell::targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine};
use inkwell::OptimizationLevel;

use super::Codegen;
use super::error::CodegenError;
use crate::token::Span;

impl Codegen<'_, '_> {
    /// Verifies the module, stamps it with the host's default target
    /// triple and data layout, and writes textual `.ll` IR to `path`.
    /// No object file or linking step happens here (out of scope).
    pub fn emit(&self, path: &Path, file_span: &Span) -> Result<(), CodegenError> {
        self.module
            .verify()
            .map_err(|e| CodegenError::new(format!("module failed verification: {e}"), file_span.clone()))?;

        Target::initialize_native(&InitializationConfig::default())
            .map_err(|e| CodegenError::without_span(format!("failed to initialize native target: {e}")))?;

        let triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&triple)
            .map_err(|e| CodegenError::without_span(format!("failed to resolve target triple: {e}")))?;
        let machine = target
            .create_target_machine(
                &triple,
                &TargetMachine::get_host_cpu_name().to_string(),
                &TargetMachine::get_host_cpu_features().to_string(),
                OptimizationLevel::None,
                RelocMode::Default,
                CodeModel::Default,
            )
            .ok_or_else(|| CodegenError::without_span("failed to create a target machine for this host"))?;

        self.module.set_triple(&triple);
        self.module.set_data_layout(&machine.get_target_data().get_data_layout());

        self.module
            .print_to_file(path)
            .map_err(|e| CodegenError::without_span(format!("failed to write IR to {}: {}", path.display(), e)))?;
        Ok(())
    }
}
