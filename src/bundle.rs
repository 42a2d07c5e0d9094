//! Lee recursos de deployment desde el sistema de archivos.
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::AppError;

/// Cada archivo regular bajo `dir`, nombrado por su ruta relativa a `dir` con
/// separadores `/`, ordenado por nombre. No sigue enlaces simbólicos.
pub fn read_dir(dir: &Path) -> Result<Vec<(String, Vec<u8>)>, AppError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(dir)
                           .map_err(|_| AppError::InvalidArgument(format!("{} escapes {}", path.display(), dir.display())))?;
        let name = relative.components()
                           .map(|c| c.as_os_str().to_string_lossy().into_owned())
                           .collect::<Vec<_>>()
                           .join("/");
        out.push((name, fs::read(path)?));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

/// Nombrado solo por el nombre de archivo.
pub fn read_files(files: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>, AppError> {
    files.iter()
         .map(|path| {
             let name = path.file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .ok_or_else(|| AppError::InvalidArgument(format!("{} is not a file", path.display())))?;
             Ok((name, fs::read(path)?))
         })
         .collect()
}
