use super::blocks::Block;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `blocks` in order to `{work_dir}/{stream_name}.str`, replacing any
/// existing file, and returns the path written.
pub fn write_stream(work_dir: &Path, stream_name: &str, blocks: &[Block]) -> io::Result<PathBuf> {
    let path = work_dir.join(format!("{}.str", stream_name));
    let mut writer = BufWriter::new(File::create(&path)?);
    for block in blocks {
        writer.write_all(block.as_str().as_bytes())?;
    }
    writer.flush()?;
    debug!("Wrote {} blocks to {}", blocks.len(), path.display());
    Ok(path)
}
