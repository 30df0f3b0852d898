use crate::utils::error::Result;
use crate::utils::validation::validate_output_path;
use std::fs;
use std::io::Write;
use std::path::Path;

/// 輸出到檔案或 stdout
#[derive(Debug, Clone, Default)]
pub struct LocalOutput {
    path: Option<String>,
}

impl LocalOutput {
    pub fn new(path: Option<String>) -> Self {
        Self { path }
    }

    pub fn write(&self, data: &[u8]) -> Result<String> {
        match &self.path {
            Some(path) => {
                validate_output_path("output", path)?;
                let full_path = Path::new(path);
                if let Some(parent) = full_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(full_path, data)?;
                Ok(path.clone())
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(data)?;
                stdout.write_all(b"\n")?;
                Ok("stdout".to_string())
            }
        }
    }
}
