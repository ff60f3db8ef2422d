//! Where the backend socket, config file and mock backend logs live

use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "account-harness";

/// Default backend socket: `$XDG_RUNTIME_DIR/<app>/backend.sock`, else `/tmp/<app>-<uid>/backend.sock`
#[cfg(unix)]
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir)
            .join(APP_NAME)
            .join("backend.sock");
    }

    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/tmp/{}-{}", APP_NAME, uid)).join("backend.sock")
}

#[cfg(windows)]
pub fn socket_path() -> PathBuf {
    PathBuf::from(socket_name())
}

/// Default value for `--socket`
#[cfg(unix)]
pub fn socket_name() -> String {
    socket_path().to_string_lossy().into_owned()
}

#[cfg(windows)]
pub fn socket_name() -> String {
    let username = std::env::var("USERNAME").unwrap_or_else(|_| "default".to_string());
    format!("{}-{}", APP_NAME, username)
}

/// Create the socket's parent directory (mode 0700) when missing
#[cfg(unix)]
pub fn ensure_socket_dir(socket: &Path) -> io::Result<()> {
    let dir = socket.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Invalid socket path")
    })?;

    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

#[cfg(windows)]
pub fn ensure_socket_dir(_socket: &Path) -> io::Result<()> {
    Ok(())
}

/// Remove a socket left behind by a backend that did not shut down cleanly
#[cfg(unix)]
pub fn remove_socket(socket: &Path) -> io::Result<()> {
    if socket.exists() {
        std::fs::remove_file(socket)?;
    }
    Ok(())
}

#[cfg(windows)]
pub fn remove_socket(_socket: &Path) -> io::Result<()> {
    Ok(())
}

pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Harness configuration read by `Config::load`
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Directory for `mock_backend.log`
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_path_is_valid() {
        let path = socket_path();
        assert!(!path.as_os_str().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_and_remove_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("nested").join("backend.sock");

        ensure_socket_dir(&socket).unwrap();
        assert!(socket.parent().unwrap().is_dir());

        std::fs::write(&socket, b"").unwrap();
        remove_socket(&socket).unwrap();
        assert!(!socket.exists());
    }
}
