use bindweave_generate_core::EmitterOptions;

/// Fortran-specific emitter configuration.
#[derive(Debug, Clone, Default)]
pub struct FortranOptions {
    pub common: EmitterOptions,
    /// Name of the emitted Fortran module, also the output file stem.
    pub module_name: String,
}
