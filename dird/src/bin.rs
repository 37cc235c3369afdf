use std::path::Path;

use tracing::info;

use crate::{write_atomic, ArchiveBuilder, BuildOptions, Error};

/// Pack the regular files directly inside `source_dir` into a DIRD archive
/// at `output_path`, returning the size of the archive.
///
/// Names longer than the name field are silently truncated; see
/// [`build_with`] and [`NamePolicy::Strict`](crate::NamePolicy::Strict)
/// to reject them instead.
pub fn build(
    source_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<u64, Error> {
    build_with(source_dir, output_path, BuildOptions::default())
}

pub fn build_with(
    source_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: BuildOptions,
) -> Result<u64, Error> {
    let source_dir = source_dir.as_ref();
    let output_path = output_path.as_ref();

    let mut builder = ArchiveBuilder::new(options);
    builder.dir(source_dir)?;
    let archive = builder.into_bytes()?;

    write_atomic(output_path, &archive)?;
    info!(
        source = %source_dir.display(),
        output = %output_path.display(),
        size = archive.len(),
        "wrote archive"
    );
    Ok(archive.len() as u64)
}
