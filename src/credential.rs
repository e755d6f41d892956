use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CREDENTIAL_FILE_NAME: &str = ".q";

/// `<home>/.q`, where the API key lives.
pub fn credential_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
    Ok(home.join(CREDENTIAL_FILE_NAME))
}

pub fn load() -> Result<String> {
    read_key(&credential_path()?)
}

/// Reads the whole file and trims surrounding whitespace. The contents are
/// otherwise opaque.
pub fn read_key(path: &Path) -> Result<String> {
    let raw = fs::read(path)
        .with_context(|| format!("failed to read credential file '{}'", path.display()))?;
    let key = String::from_utf8(raw)
        .with_context(|| format!("credential file '{}' is not valid UTF-8", path.display()))?;
    debug!(path = %path.display(), "loaded API key");
    Ok(key.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{CREDENTIAL_FILE_NAME, read_key};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock should be after unix epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "q-credential-{suffix}-{stamp}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temp directory");
        dir
    }

    #[test]
    fn read_key_trims_surrounding_whitespace() {
        let dir = unique_temp_dir("trim");
        let path = dir.join(CREDENTIAL_FILE_NAME);
        fs::write(&path, "\n  AIza-test-key \r\n").expect("failed to write key file");

        assert_eq!(read_key(&path).expect("key should load"), "AIza-test-key");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_key_reports_missing_file_with_path() {
        let dir = unique_temp_dir("missing");
        let path = dir.join(CREDENTIAL_FILE_NAME);

        let err = read_key(&path).expect_err("missing file should fail");
        let msg = format!("{err:#}");
        assert!(
            msg.contains("failed to read credential file"),
            "unexpected message: {msg}"
        );
        assert!(
            msg.contains(&path.display().to_string()),
            "unexpected message: {msg}"
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_key_rejects_non_utf8_contents() {
        let dir = unique_temp_dir("binary");
        let path = dir.join(CREDENTIAL_FILE_NAME);
        fs::write(&path, [0xff, 0xfe, 0x00]).expect("failed to write key file");

        let err = read_key(&path).expect_err("binary key should fail");
        assert!(format!("{err:#}").contains("not valid UTF-8"));

        let _ = fs::remove_dir_all(&dir);
    }
}
