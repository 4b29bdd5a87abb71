use bindweave_generate_core::EmitterOptions;

/// MATLAB-specific emitter configuration. The MEX gateway the wrappers call
/// is named `<prefix>_matlab`.
#[derive(Debug, Clone, Default)]
pub struct MatlabOptions {
    pub common: EmitterOptions,
}
