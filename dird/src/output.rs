use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::{wrap_io_err, Error};

/// Replace `path` with `data`, or leave it untouched.
///
/// The data goes to a `.mkinitrd.*` file in the same directory which is
/// renamed over `path` once complete. On any error the temporary file is
/// removed when it is dropped.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Error> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = Builder::new()
        .prefix(".mkinitrd.")
        .tempfile_in(parent)
        .map_err(wrap_io_err!(parent, "Create temporary archive"))?;
    let tmp_path = tmp.path().to_path_buf();
    debug!(tmp = %tmp_path.display(), "writing archive");

    tmp.write_all(data)
        .map_err(wrap_io_err!(tmp_path, "Write temporary archive"))?;

    // Temp files are created 0600; give the archive the permissions a plain
    // create would have, or keep those of the file being replaced
    let permissions = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Some(metadata.permissions()),
        _ => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(wrap_io_err!(tmp_path, "Set archive permissions"))?;
    }

    tmp.as_file()
        .sync_all()
        .map_err(wrap_io_err!(tmp_path, "Sync temporary archive"))?;

    tmp.persist(path).map_err(|err| Error::Io {
        source: err.error,
        path: Some(path.to_path_buf()),
        context: "Rename archive into place",
    })?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
