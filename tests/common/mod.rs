use std::fs;
use std::path::{Path, PathBuf};

/// Create an executable shell script at dir/name and return its path.
#[allow(dead_code)]
pub fn write_executable(dir: &Path, name: &str) -> PathBuf {
    write_script(dir, name, "#!/bin/sh\nexit 0\n")
}

/// Create an executable script with the given body.
#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write helper executable");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod helper");
    }
    path
}
