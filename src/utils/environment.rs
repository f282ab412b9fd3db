use std::env;
use std::io;
use std::path::PathBuf;

/// Directory a command ran in: the explicit override if given, else the
/// process working directory
pub fn resolve_current_directory(directory_override: Option<&str>) -> io::Result<String> {
    if let Some(directory) = directory_override
        && !directory.is_empty()
    {
        return Ok(directory.to_string());
    }
    let cwd = env::current_dir()?;
    Ok(cwd.to_string_lossy().into_owned())
}

/// Name of the machine, empty when it cannot be determined
#[cfg(unix)]
pub fn hostname() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: buf is valid for buf.len() bytes; gethostname NUL-terminates
    // on success for names shorter than the buffer.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        tracing::debug!(error = %io::Error::last_os_error(), "gethostname failed");
        return hostname_from_env();
    }
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

#[cfg(not(unix))]
pub fn hostname() -> String {
    hostname_from_env()
}

fn hostname_from_env() -> String {
    first_env(&["HOSTNAME", "COMPUTERNAME"])
}

/// Login name of the current user
pub fn username() -> String {
    first_env(&["USER", "USERNAME"])
}

/// Controlling terminal as exported by the shell
pub fn tty() -> String {
    first_env(&["TTY"])
}

/// Home directory, used to expand and abbreviate paths
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

fn first_env(names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}
