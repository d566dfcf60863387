//! Shader module loading and caching.
//!
//! Modules are compiled from embedded WGSL by default. When a shader directory
//! is configured, a `<name>.wgsl` file found there replaces the embedded source.

use log::{debug, info};
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Error types for shader loading operations.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },

    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no shader directory configured for file-based loading")]
    NoShaderDir,
}

/// Registry of compiled shader modules keyed by name.
#[derive(Default)]
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
    shader_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory to look for `.wgsl` overrides in.
    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    /// Compile WGSL source and cache it under `name`.
    ///
    /// Compilation errors reported by the device are returned as
    /// [`ShaderError::CompilationFailed`] instead of surfacing later at pipeline creation.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        debug!("Loading shader '{}' from source", name);

        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ShaderError::CompilationFailed {
                name: name.to_string(),
                message: errors.join("; "),
            });
        }

        let module = Arc::new(module);
        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{}'", name);
        } else {
            info!("Loaded shader '{}'", name);
        }
        Ok(module)
    }

    /// Load `<shader_dir>/<filename>` and cache it under `name`.
    pub fn load_from_file(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        filename: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let shader_dir = self.shader_dir.as_ref().ok_or(ShaderError::NoShaderDir)?;
        let path = shader_dir.join(filename);

        debug!("Loading shader '{}' from file: {:?}", name, path);

        if !path.exists() {
            return Err(ShaderError::FileNotFound { path });
        }

        let source = std::fs::read_to_string(&path)?;
        self.load_from_source(device, name, &source)
    }

    /// Load `<name>.wgsl` from the shader directory if present, else compile `embedded`.
    pub fn load_or_embedded(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        embedded: &str,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let filename = format!("{name}.wgsl");
        match self.load_from_file(device, name, &filename) {
            Ok(module) => Ok(module),
            Err(ShaderError::NoShaderDir | ShaderError::FileNotFound { .. }) => {
                self.load_from_source(device, name, embedded)
            }
            Err(err) => Err(err),
        }
    }

    /// Get a previously loaded shader by name.
    pub fn get(&self, name: &str) -> Option<Arc<wgpu::ShaderModule>> {
        self.modules.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::create_test_device_queue;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(0.0, 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn test_shader_library_starts_empty() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert!(library.get("planet").is_none());
    }

    #[test]
    fn test_load_valid_shader_is_cached() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        let module = library
            .load_from_source(&device, "valid", VALID_SHADER)
            .unwrap();
        assert!(Arc::ptr_eq(&module, &library.get("valid").unwrap()));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_load_from_file_without_shader_dir_returns_error() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        let result = library.load_from_file(&device, "test", "test.wgsl");
        assert!(matches!(result, Err(ShaderError::NoShaderDir)));
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sun.wgsl"), VALID_SHADER).unwrap();
        let mut library = ShaderLibrary::new().with_shader_dir(dir.path());

        assert!(library.load_or_embedded(&device, "sun", VALID_SHADER).is_ok());
        assert!(library.load_or_embedded(&device, "orbit", VALID_SHADER).is_ok());
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_missing_file_in_shader_dir() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut library = ShaderLibrary::new().with_shader_dir(dir.path());
        let result = library.load_from_file(&device, "planet", "planet.wgsl");
        assert!(matches!(result, Err(ShaderError::FileNotFound { .. })));
    }
}
