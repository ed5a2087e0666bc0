use std::path::{Path, PathBuf};

use crate::{PulselinkError, Result};

/// Files currently being loaded, outermost first
#[derive(Debug, Default)]
pub(super) struct ImportChain {
    files: Vec<PathBuf>,
}

impl ImportChain {
    /// Runs `load` with `path` pushed onto the chain
    ///
    /// Fails without calling `load` if `path` is already being loaded
    /// further up the chain.
    pub(super) fn visit<T>(
        &mut self,
        path: &Path,
        load: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.files.iter().any(|file| file == path) {
            return Err(PulselinkError::ConfigValidation {
                component: "imports".to_string(),
                details: format!("circular import: {}", self.describe(path)),
            });
        }

        self.files.push(path.to_path_buf());
        let result = load(self);
        self.files.pop();
        result
    }

    fn describe(&self, repeated: &Path) -> String {
        self.files
            .iter()
            .map(PathBuf::as_path)
            .chain([repeated])
            .map(|file| {
                file.file_name()
                    .unwrap_or(file.as_os_str())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_file_is_rejected_with_chain() {
        let mut chain = ImportChain::default();

        let result = chain.visit(Path::new("/c/main.toml"), |chain| {
            chain.visit(Path::new("/c/a.toml"), |chain| {
                chain.visit(Path::new("/c/main.toml"), |_| Ok(()))
            })
        });

        let message = result.unwrap_err().to_string();
        assert!(message.contains("main.toml -> a.toml -> main.toml"));
    }

    #[test]
    fn siblings_may_share_an_import() {
        let mut chain = ImportChain::default();

        let result = chain.visit(Path::new("/c/main.toml"), |chain| {
            chain.visit(Path::new("/c/shared.toml"), |_| Ok(()))?;
            chain.visit(Path::new("/c/shared.toml"), |_| Ok(()))
        });

        assert!(result.is_ok());
    }
}
