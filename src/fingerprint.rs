use std::{fs::File, io, path::Path};

use log::debug;
use sha2::{Digest, Sha256};

use crate::model::{Checksum, Fingerprint};

/// Fingerprints the file backing a dependency. Never fails: a missing file yields
/// [`Fingerprint::NoFile`] and a read error [`Fingerprint::Failed`].
pub fn fingerprint(file: Option<&Path>) -> Fingerprint {
    let Some(file) = file else {
        return Fingerprint::NoFile;
    };
    if !file.is_file() {
        debug!("No artifact file at {}", file.display());
        return Fingerprint::NoFile;
    }
    match checksum(file) {
        Ok(checksum) => Fingerprint::Computed(checksum),
        Err(err) => {
            debug!("Error calculating checksum for {}: {err}", file.display());
            Fingerprint::Failed(err.to_string())
        }
    }
}

/// SHA-256 of the file content, hex encoded.
pub fn checksum(file: &Path) -> io::Result<Checksum> {
    let mut hasher = Sha256::new();
    io::copy(&mut File::open(file)?, &mut hasher)?;
    Ok(Checksum::new(hex::encode(hasher.finalize())))
}
